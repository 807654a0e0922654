//! Brand industry taxonomy.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Industry category a brand belongs to (one per brand).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndustryCategory {
    /// Beer, wine, spirits, hard seltzer
    AlcoholicBeverages,
    /// Soft drinks, coffee, tea, energy drinks
    NonAlcoholicBeverages,
    /// Restaurants, QSR, coffee chains
    Restaurants,
    /// Packaged foods and snacks
    PackagedFoods,
    /// Pet food, supplies and care
    PetCare,
    /// Film, live events and theaters
    Entertainment,
    /// Video and audio streaming
    Streaming,
    /// Publishing, broadcast and podcasts
    Media,
    /// Airlines and travel services
    Travel,
    /// Hotels and hospitality
    Hospitality,
    /// Vehicles and automotive services
    Automotive,
    /// Tobacco, vaping and nicotine
    Tobacco,
    /// Cosmetics and beauty
    Beauty,
    /// Personal care and hygiene
    PersonalCare,
    /// General and discount retail, grocery
    Retail,
    /// Household goods and cleaning
    HouseholdGoods,
    /// Banking, payments and investing
    FinancialServices,
    /// Insurance
    Insurance,
    /// Home improvement and tools
    HomeImprovement,
    /// Video games and esports
    Gaming,
    /// Sports leagues, teams and equipment
    Sports,
    /// Apparel and footwear
    Apparel,
    /// Premium and luxury goods
    Luxury,
    /// Consumer technology and electronics
    Technology,
    /// Wireless and telecommunications
    Telecommunications,
    /// Anything not covered above
    Other,
}

/// Accepted spellings (lowercase) beyond the display name.
const INDUSTRY_ALIASES: &[(&str, IndustryCategory)] = &[
    ("beer, wine, liquor", IndustryCategory::AlcoholicBeverages),
    ("beer", IndustryCategory::AlcoholicBeverages),
    ("wine", IndustryCategory::AlcoholicBeverages),
    ("spirits", IndustryCategory::AlcoholicBeverages),
    ("liquor", IndustryCategory::AlcoholicBeverages),
    ("beverages", IndustryCategory::NonAlcoholicBeverages),
    ("beverage", IndustryCategory::NonAlcoholicBeverages),
    ("non-alcoholic", IndustryCategory::NonAlcoholicBeverages),
    ("soft drinks", IndustryCategory::NonAlcoholicBeverages),
    ("coffee", IndustryCategory::NonAlcoholicBeverages),
    ("tea", IndustryCategory::NonAlcoholicBeverages),
    ("qsr", IndustryCategory::Restaurants),
    ("fast food", IndustryCategory::Restaurants),
    ("dining", IndustryCategory::Restaurants),
    ("snacks", IndustryCategory::PackagedFoods),
    ("food", IndustryCategory::PackagedFoods),
    ("cpg", IndustryCategory::PackagedFoods),
    ("pet supplies", IndustryCategory::PetCare),
    ("pet food", IndustryCategory::PetCare),
    ("theaters", IndustryCategory::Entertainment),
    ("film", IndustryCategory::Entertainment),
    ("audio", IndustryCategory::Streaming),
    ("publishing", IndustryCategory::Media),
    ("broadcast", IndustryCategory::Media),
    ("airlines", IndustryCategory::Travel),
    ("hotels", IndustryCategory::Hospitality),
    ("vehicles", IndustryCategory::Automotive),
    ("auto", IndustryCategory::Automotive),
    ("vaping", IndustryCategory::Tobacco),
    ("nicotine", IndustryCategory::Tobacco),
    ("cosmetics", IndustryCategory::Beauty),
    ("grocery", IndustryCategory::Retail),
    ("discount", IndustryCategory::Retail),
    ("household", IndustryCategory::HouseholdGoods),
    ("financial", IndustryCategory::FinancialServices),
    ("banking", IndustryCategory::FinancialServices),
    ("tools", IndustryCategory::HomeImprovement),
    ("video games", IndustryCategory::Gaming),
    ("esports", IndustryCategory::Gaming),
    ("fashion", IndustryCategory::Apparel),
    ("footwear", IndustryCategory::Apparel),
    ("premium", IndustryCategory::Luxury),
    ("electronics", IndustryCategory::Technology),
    ("tech", IndustryCategory::Technology),
    ("wireless", IndustryCategory::Telecommunications),
    ("telecom", IndustryCategory::Telecommunications),
];

impl IndustryCategory {
    /// Returns all industry categories.
    pub fn all() -> Vec<Self> {
        vec![
            Self::AlcoholicBeverages,
            Self::NonAlcoholicBeverages,
            Self::Restaurants,
            Self::PackagedFoods,
            Self::PetCare,
            Self::Entertainment,
            Self::Streaming,
            Self::Media,
            Self::Travel,
            Self::Hospitality,
            Self::Automotive,
            Self::Tobacco,
            Self::Beauty,
            Self::PersonalCare,
            Self::Retail,
            Self::HouseholdGoods,
            Self::FinancialServices,
            Self::Insurance,
            Self::HomeImprovement,
            Self::Gaming,
            Self::Sports,
            Self::Apparel,
            Self::Luxury,
            Self::Technology,
            Self::Telecommunications,
            Self::Other,
        ]
    }

    /// Returns the display name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AlcoholicBeverages => "Alcoholic Beverages",
            Self::NonAlcoholicBeverages => "Non-Alcoholic Beverages",
            Self::Restaurants => "Restaurants",
            Self::PackagedFoods => "Packaged Foods",
            Self::PetCare => "Pet Care",
            Self::Entertainment => "Entertainment",
            Self::Streaming => "Streaming",
            Self::Media => "Media",
            Self::Travel => "Travel",
            Self::Hospitality => "Hospitality",
            Self::Automotive => "Automotive",
            Self::Tobacco => "Tobacco",
            Self::Beauty => "Beauty",
            Self::PersonalCare => "Personal Care",
            Self::Retail => "Retail",
            Self::HouseholdGoods => "Household Goods",
            Self::FinancialServices => "Financial Services",
            Self::Insurance => "Insurance",
            Self::HomeImprovement => "Home Improvement",
            Self::Gaming => "Gaming",
            Self::Sports => "Sports",
            Self::Apparel => "Apparel",
            Self::Luxury => "Luxury",
            Self::Technology => "Technology",
            Self::Telecommunications => "Telecommunications",
            Self::Other => "Other",
        }
    }

    /// Resolve an industry label, accepting the display name (any case) or a
    /// known alias such as `"beer, wine, liquor"` or `"QSR"`.
    pub fn parse(raw: &str) -> Option<Self> {
        let key = raw.trim().to_lowercase();
        Self::all()
            .into_iter()
            .find(|category| category.name().to_lowercase() == key)
            .or_else(|| {
                INDUSTRY_ALIASES
                    .iter()
                    .find(|(alias, _)| *alias == key)
                    .map(|(_, category)| *category)
            })
    }
}

impl fmt::Display for IndustryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

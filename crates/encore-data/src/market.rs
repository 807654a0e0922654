//! Geographic markets.
//!
//! Tour markets and brand markets are resolved against a fixed table of US
//! metro markets, the four census regions and a national market. Each entry
//! has a centroid so that non-overlapping markets can still be compared by
//! great-circle distance.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean Earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// US census region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Region {
    /// Northeast
    Northeast,
    /// Midwest
    Midwest,
    /// South
    South,
    /// West
    West,
}

/// Kind of market entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketKind {
    /// Whole-country coverage
    National,
    /// One census region
    Region(Region),
    /// A metro market inside a region
    Metro(Region),
}

#[derive(Debug)]
struct MarketInfo {
    name: &'static str,
    aliases: &'static [&'static str],
    kind: MarketKind,
    latitude: f64,
    longitude: f64,
}

const fn metro(
    name: &'static str,
    aliases: &'static [&'static str],
    region: Region,
    latitude: f64,
    longitude: f64,
) -> MarketInfo {
    MarketInfo {
        name,
        aliases,
        kind: MarketKind::Metro(region),
        latitude,
        longitude,
    }
}

const MARKETS: &[MarketInfo] = &[
    MarketInfo {
        name: "National",
        aliases: &["us", "usa", "united states", "nationwide"],
        kind: MarketKind::National,
        latitude: 39.83,
        longitude: -98.58,
    },
    MarketInfo {
        name: "Northeast",
        aliases: &["northeast region"],
        kind: MarketKind::Region(Region::Northeast),
        latitude: 42.0,
        longitude: -74.5,
    },
    MarketInfo {
        name: "Midwest",
        aliases: &["midwest region"],
        kind: MarketKind::Region(Region::Midwest),
        latitude: 41.5,
        longitude: -90.0,
    },
    MarketInfo {
        name: "South",
        aliases: &["south region", "southeast"],
        kind: MarketKind::Region(Region::South),
        latitude: 33.0,
        longitude: -87.0,
    },
    MarketInfo {
        name: "West",
        aliases: &["west region", "west coast"],
        kind: MarketKind::Region(Region::West),
        latitude: 40.0,
        longitude: -114.0,
    },
    metro("New York", &["nyc", "new york city"], Region::Northeast, 40.71, -74.01),
    metro("Boston", &[], Region::Northeast, 42.36, -71.06),
    metro("Philadelphia", &["philly"], Region::Northeast, 39.95, -75.17),
    metro("Pittsburgh", &[], Region::Northeast, 40.44, -79.99),
    metro("Chicago", &[], Region::Midwest, 41.88, -87.63),
    metro("Detroit", &[], Region::Midwest, 42.33, -83.05),
    metro("Minneapolis", &["minneapolis-st paul", "twin cities"], Region::Midwest, 44.98, -93.27),
    metro("Cleveland", &[], Region::Midwest, 41.50, -81.69),
    metro("Columbus", &[], Region::Midwest, 39.96, -83.00),
    metro("St Louis", &["saint louis"], Region::Midwest, 38.63, -90.20),
    metro("Kansas City", &[], Region::Midwest, 39.10, -94.58),
    metro("Washington DC", &["washington, dc", "dc", "washington"], Region::South, 38.91, -77.04),
    metro("Baltimore", &[], Region::South, 39.29, -76.61),
    metro("Atlanta", &[], Region::South, 33.75, -84.39),
    metro("Miami", &["miami-fort lauderdale"], Region::South, 25.76, -80.19),
    metro("Orlando", &[], Region::South, 28.54, -81.38),
    metro("Tampa", &["tampa bay"], Region::South, 27.95, -82.46),
    metro("Charlotte", &[], Region::South, 35.23, -80.84),
    metro("Nashville", &[], Region::South, 36.16, -86.78),
    metro("New Orleans", &["nola"], Region::South, 29.95, -90.07),
    metro("Dallas-Fort Worth", &["dallas", "dfw", "fort worth"], Region::South, 32.78, -96.80),
    metro("Houston", &[], Region::South, 29.76, -95.37),
    metro("Austin", &[], Region::South, 30.27, -97.74),
    metro("Los Angeles", &["la", "l a"], Region::West, 34.05, -118.24),
    metro("San Francisco", &["sf", "bay area", "san francisco bay area"], Region::West, 37.77, -122.42),
    metro("San Diego", &[], Region::West, 32.72, -117.16),
    metro("Sacramento", &[], Region::West, 38.58, -121.49),
    metro("Seattle", &[], Region::West, 47.61, -122.33),
    metro("Portland", &[], Region::West, 45.52, -122.68),
    metro("Denver", &[], Region::West, 39.74, -104.99),
    metro("Phoenix", &[], Region::West, 33.45, -112.07),
    metro("Las Vegas", &["vegas"], Region::West, 36.17, -115.14),
    metro("Salt Lake City", &["slc"], Region::West, 40.76, -111.89),
];

/// A resolved geographic market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Market {
    index: usize,
}

impl Market {
    fn info(&self) -> &'static MarketInfo {
        &MARKETS[self.index]
    }

    /// All markets in the table.
    pub fn all() -> Vec<Self> {
        (0..MARKETS.len()).map(|index| Self { index }).collect()
    }

    /// Resolve a market name or alias (case-insensitive, periods ignored).
    pub fn parse(raw: &str) -> Option<Self> {
        let key = raw.trim().to_lowercase().replace('.', "");
        MARKETS
            .iter()
            .position(|info| {
                info.name.to_lowercase().replace('.', "") == key || info.aliases.contains(&key.as_str())
            })
            .map(|index| Self { index })
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        self.info().name
    }

    /// Kind of market.
    pub fn kind(&self) -> MarketKind {
        self.info().kind
    }

    /// Centroid as (latitude, longitude) in degrees.
    pub fn centroid(&self) -> (f64, f64) {
        let info = self.info();
        (info.latitude, info.longitude)
    }

    /// Whether two markets cover any common territory.
    pub fn overlaps(&self, other: &Self) -> bool {
        if self == other {
            return true;
        }
        match (self.kind(), other.kind()) {
            (MarketKind::National, _) | (_, MarketKind::National) => true,
            (MarketKind::Region(region), MarketKind::Metro(inside))
            | (MarketKind::Metro(inside), MarketKind::Region(region)) => region == inside,
            _ => false,
        }
    }

    /// Great-circle distance between market centroids in kilometres.
    pub fn distance_km(&self, other: &Self) -> f64 {
        let (lat1, lon1) = self.centroid();
        let (lat2, lon2) = other.centroid();
        let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
        let d_phi = (lat2 - lat1).to_radians();
        let d_lambda = (lon2 - lon1).to_radians();

        let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

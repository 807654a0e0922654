//! End-to-end tests: raw profiles through the engine to the exported table.

use approx::assert_relative_eq;
use encore::data::{
    ArtistProfile, BrandProfile, ConsumerAttribute, Demographics, IndexConvention, IndustryCategory,
    JsonExtract, JsonSource, ProfileKind, SqliteSource,
};
use encore::output::{ExportFormat, Exporter, MatchTable};
use encore::scoring::{IndustryLink, ScoringError};
use encore::{EngineConfig, EngineError, MatchEngine};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstest::rstest;

fn open_config() -> EngineConfig {
    EngineConfig {
        min_media_spend: 0.0,
        ..Default::default()
    }
}

fn full_demographics(female: f64, young: f64) -> Demographics {
    let mut demographics = Demographics::default();
    demographics.gender.insert("Female".to_string(), female);
    demographics.gender.insert("Male".to_string(), 1.0 - female);
    for (label, value) in [
        ("18-24", 100.0 + young),
        ("25-34", 110.0),
        ("35-44", 100.0),
        ("45-54", 90.0),
        ("55-64", 80.0),
        ("65+", 70.0),
    ] {
        demographics.age.insert(label.to_string(), value);
    }
    for (label, value) in [
        ("Under $25,000", 95.0),
        ("$25,000 - $50,000", 105.0),
        ("$50,000 - $100,000", 110.0),
        ("$100,000 - $150,000", 95.0),
        ("$150,000+", 85.0),
    ] {
        demographics.income.insert(label.to_string(), value);
    }
    for (label, value) in [
        ("White", 90.0),
        ("Hispanic", 120.0),
        ("African American", 115.0),
        ("Asian", 100.0),
        ("Other", 95.0),
    ] {
        demographics.ethnicity.insert(label.to_string(), value);
    }
    demographics
}

fn artist(id: &str, name: &str, young: f64) -> ArtistProfile {
    let mut artist = ArtistProfile::new(id, name);
    artist.demographics = Some(full_demographics(0.6, young));
    artist.attributes = vec![
        ConsumerAttribute::new("Coffee Houses", 0.6),
        ConsumerAttribute::new("Gamers", 0.3),
    ];
    artist.markets = vec!["Chicago".to_string()];
    artist
}

fn brand(id: &str, name: &str, industry: &str, young: f64) -> BrandProfile {
    let mut brand = BrandProfile::new(id, name, industry);
    brand.media_spend = Some(10_000_000.0);
    brand.demographics = Some(full_demographics(0.5, young));
    brand.audience_description = Some("Coffee lovers and gamers in the Midwest".to_string());
    brand.markets = vec!["Midwest".to_string()];
    brand
}

fn two_by_three() -> (Vec<ArtistProfile>, Vec<BrandProfile>) {
    let artists = vec![artist("a1", "Velvet", 40.0), artist("a2", "Aster", -20.0)];
    let mut no_ethnicity = brand("b3", "Quench", "Non-Alcoholic Beverages", 10.0);
    if let Some(demographics) = no_ethnicity.demographics.as_mut() {
        demographics.ethnicity.clear();
    }
    let brands = vec![
        brand("b1", "Roastery", "Restaurants", 30.0),
        brand("b2", "Pixel", "Gaming", -10.0),
        no_ethnicity,
    ];
    (artists, brands)
}

#[test]
fn test_two_by_three_with_missing_ethnicity() {
    let (artists, brands) = two_by_three();
    let run = MatchEngine::new(open_config()).unwrap().run(&artists, &brands).unwrap();

    assert!(run.rejections.is_empty());
    assert_eq!(run.total_matches(), 6);
    let names: Vec<&str> = run.ranked.iter().map(|r| r.artist_name()).collect();
    assert_eq!(names, vec!["Aster", "Velvet"]);

    for artist in &run.ranked {
        assert_eq!(artist.matches().len(), 3);
        for score in artist.matches() {
            assert!(score.is_scored());
            let components = score.components().unwrap();
            if score.brand_id() == "b3" {
                assert_eq!(components.ethnicity, None);
            } else {
                assert!(components.ethnicity.is_some());
            }
        }
        let ranks: Vec<usize> = artist.matches().iter().filter_map(|m| m.rank()).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    let table = MatchTable::from_ranked(&run.ranked);
    let json: serde_json::Value =
        serde_json::from_str(&table.export_to_string(ExportFormat::Json).unwrap()).unwrap();
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 6);
    for row in rows {
        assert!(row["Composite_Match_Score"].is_number());
        if row["Brand_Name"] == "Quench" {
            assert!(row["Ethnicity_Similarity"].is_null());
        } else {
            assert!(row["Ethnicity_Similarity"].is_number());
        }
    }
}

#[test]
fn test_brand_missing_one_ethnicity_bucket() {
    let (artists, _) = two_by_three();
    let mut partial = brand("b4", "Harbor", "Restaurants", 10.0);
    if let Some(demographics) = partial.demographics.as_mut() {
        demographics.ethnicity.remove("Other");
    }
    let brands = vec![brand("b1", "Roastery", "Restaurants", 30.0), partial];

    let run = MatchEngine::new(open_config()).unwrap().run(&artists, &brands).unwrap();
    assert!(run.rejections.is_empty());
    assert_eq!(run.total_matches(), 4);
    for artist in &run.ranked {
        for score in artist.matches() {
            let components = score.components().unwrap();
            assert!(score.composite_score().is_some());
            if score.brand_id() == "b4" {
                assert_eq!(components.ethnicity, None);
            } else {
                assert!(components.ethnicity.is_some());
            }
        }
    }
}

#[test]
fn test_weighted_composite_example() {
    // age vectors with cosine 0.8 -> demographic 0.9; half the attribute
    // relevance matched -> 0.5; no markets and affinity 0.4 -> context 0.2
    let mut artist = ArtistProfile::new("a1", "Velvet");
    let mut artist_demo = Demographics {
        index_convention: IndexConvention::Signed,
        ..Default::default()
    };
    artist_demo.age.insert("18-24".to_string(), 1.0);
    artist.demographics = Some(artist_demo);
    artist.attributes = vec![
        ConsumerAttribute::new("Dog Owners", 0.5),
        ConsumerAttribute::new("Gamers", 0.5),
    ];

    let mut brand = BrandProfile::new("b1", "Kibble Co", "Pet Care");
    let mut brand_demo = Demographics {
        index_convention: IndexConvention::Signed,
        ..Default::default()
    };
    brand_demo.age.insert("18-24".to_string(), 0.8);
    brand_demo.age.insert("25-34".to_string(), 0.6);
    brand.demographics = Some(brand_demo);
    brand.attributes = vec![ConsumerAttribute::new("dog owners", 1.0)];

    let config = EngineConfig {
        industry_map: Some(vec![IndustryLink::new("dog owners", IndustryCategory::PetCare, 0.4)]),
        ..open_config()
    };
    let run = MatchEngine::new(config).unwrap().run(&[artist], &[brand]).unwrap();
    let score = &run.ranked[0].matches()[0];
    let components = score.components().unwrap();

    assert_relative_eq!(components.demographic, 0.9, epsilon = 1e-9);
    assert_relative_eq!(components.attribute, 0.5, epsilon = 1e-12);
    assert_eq!(components.attribute_matches, 1);
    assert_relative_eq!(components.geographic, 0.0);
    assert_relative_eq!(components.industry_affinity, 0.4, epsilon = 1e-12);
    assert_relative_eq!(score.composite_score().unwrap(), 71.0, epsilon = 1e-6);
    // single scored brand: no spread
    assert_eq!(score.z_score(), Some(0.0));
    assert_eq!(score.p_value(), Some(1.0));
    assert_eq!(score.rank(), Some(1));
}

#[test]
fn test_schema_mismatch_isolates_profile() {
    let (mut artists, brands) = two_by_three();
    let mut broken = artist("a3", "Broken", 0.0);
    if let Some(demographics) = broken.demographics.as_mut() {
        demographics.age.insert("Teens".to_string(), 120.0);
    }
    artists.push(broken);

    let run = MatchEngine::new(open_config()).unwrap().run(&artists, &brands).unwrap();
    assert_eq!(run.rejections.len(), 1);
    let rejection = &run.rejections[0];
    assert_eq!(rejection.kind, ProfileKind::Artist);
    assert_eq!(rejection.id, "a3");
    assert!(matches!(rejection.error, ScoringError::SchemaMismatch { .. }));

    assert_eq!(run.ranked.len(), 2);
    assert_eq!(run.total_matches(), 6);

    let summary = run.summary();
    assert_eq!(summary.rejections.len(), 1);
    assert_eq!(summary.rejections[0].id, "a3");
}

#[rstest]
#[case(0.6, 0.3, 0.2)]
#[case(0.5, 0.3, 0.1)]
#[case(-0.1, 0.6, 0.5)]
fn test_bad_weights_fail_before_scoring(
    #[case] demographic: f64,
    #[case] attribute: f64,
    #[case] context: f64,
) {
    let mut config = open_config();
    config.scoring.weights.demographic = demographic;
    config.scoring.weights.attribute = attribute;
    config.scoring.weights.context = context;
    assert!(matches!(
        MatchEngine::new(config),
        Err(EngineError::Scoring(ScoringError::WeightConfiguration(_)))
    ));
}

#[test]
fn test_insufficient_data_rows_are_unscored() {
    let (artists, mut brands) = two_by_three();
    let mut bare = BrandProfile::new("b0", "Bare", "Retail");
    bare.media_spend = Some(10_000_000.0);
    brands.push(bare);

    let run = MatchEngine::new(open_config()).unwrap().run(&artists, &brands).unwrap();
    assert_eq!(run.total_matches(), 8);
    for artist in &run.ranked {
        let last = artist.matches().last().unwrap();
        assert_eq!(last.brand_id(), "b0");
        assert!(!last.is_scored());
        assert_eq!(last.composite_score(), None);
        assert_eq!(last.rank(), None);
        assert_eq!(last.tier(), None);
    }

    let csv = MatchTable::from_ranked(&run.ranked)
        .export_to_string(ExportFormat::Csv)
        .unwrap();
    assert!(csv.contains("Aster,Bare,Retail,,"));
}

#[test]
fn test_identical_runs_produce_identical_csv() {
    let (artists, brands) = two_by_three();
    let engine = MatchEngine::new(open_config()).unwrap();

    let first = engine.run(&artists, &brands).unwrap();
    let second = engine.run(&artists, &brands).unwrap();
    let csv = |run: &encore::MatchRun| {
        MatchTable::from_ranked(&run.ranked)
            .export_to_string(ExportFormat::Csv)
            .unwrap()
    };
    assert_eq!(csv(&first), csv(&second));
}

#[test]
fn test_generated_profiles() {
    let mut rng = StdRng::seed_from_u64(314);
    let artists: Vec<ArtistProfile> = (0..5)
        .map(|i| {
            let mut artist = artist(&format!("a{i}"), &format!("Artist {i}"), 0.0);
            artist.demographics = Some(full_demographics(
                rng.gen_range(0.05..0.95),
                rng.gen_range(-50.0..80.0),
            ));
            artist
        })
        .collect();
    let industries = ["Restaurants", "Gaming", "Pet Care", "Travel", "Retail"];
    let brands: Vec<BrandProfile> = (0..40)
        .map(|i| {
            let mut brand = brand(
                &format!("b{i:02}"),
                &format!("Brand {i}"),
                industries[i % industries.len()],
                rng.gen_range(-50.0..80.0),
            );
            brand.media_spend = Some(rng.gen_range(1.0e6..2.0e7));
            brand
        })
        .collect();

    let engine = MatchEngine::new(EngineConfig::default()).unwrap();
    let run = engine.run(&artists, &brands).unwrap();
    let eligible = brands.iter().filter(|b| b.media_spend.unwrap() > 5.0e6).count();
    assert_eq!(run.filtered_brands, brands.len() - eligible);
    assert_eq!(run.total_matches(), artists.len() * eligible);

    for artist in &run.ranked {
        let scores: Vec<f64> = artist.matches().iter().filter_map(|m| m.composite_score()).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        assert!(scores.iter().all(|s| (0.0..=100.0).contains(s)));
        for (i, m) in artist.matches().iter().enumerate() {
            assert_eq!(m.rank(), Some(i + 1));
            let composite = m.composite().unwrap();
            assert!(composite.ci_lower <= composite.score && composite.score <= composite.ci_upper);
        }
    }
}

#[test]
fn test_run_from_json_and_sqlite_sources() {
    let (artists, brands) = two_by_three();
    let extract = JsonExtract {
        artists: artists.clone(),
        brands: brands.clone(),
    };
    let path = std::env::temp_dir().join(format!("encore_engine_{}.json", std::process::id()));
    std::fs::write(&path, extract.to_json().unwrap()).unwrap();

    let engine = MatchEngine::new(open_config()).unwrap();
    let from_json = engine.run_source(&JsonSource::new(&path)).unwrap();
    std::fs::remove_file(&path).ok();

    let sqlite = SqliteSource::in_memory().unwrap();
    for artist in &artists {
        sqlite.upsert_artist(artist).unwrap();
    }
    for brand in &brands {
        sqlite.upsert_brand(brand).unwrap();
    }
    let from_sqlite = engine.run_source(&sqlite).unwrap();

    let in_memory = engine.run(&artists, &brands).unwrap();
    let csv = |run: &encore::MatchRun| {
        MatchTable::from_ranked(&run.ranked)
            .export_to_string(ExportFormat::Csv)
            .unwrap()
    };
    assert_eq!(csv(&from_json), csv(&in_memory));
    assert_eq!(csv(&from_sqlite), csv(&in_memory));
}

#[test]
fn test_undecodable_source_record_is_rejected() {
    let (artists, _) = two_by_three();
    let brands: Vec<BrandProfile> = (1..=5)
        .map(|i| brand(&format!("b{i}"), &format!("Brand {i}"), "Restaurants", 0.0))
        .collect();
    let extract = JsonExtract { artists, brands };
    let mut json: serde_json::Value = serde_json::from_str(&extract.to_json().unwrap()).unwrap();
    json["brands"].as_array_mut().unwrap().push(serde_json::json!({
        "id": "b9",
        "name": "Broken",
        "industry": "Restaurants",
        "markets": "not a list"
    }));
    let path = std::env::temp_dir().join(format!("encore_bad_record_{}.json", std::process::id()));
    std::fs::write(&path, json.to_string()).unwrap();

    let run = MatchEngine::new(open_config())
        .unwrap()
        .run_source(&JsonSource::new(&path))
        .unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(run.scored_brands, 5);
    assert_eq!(run.total_matches(), 10);
    assert_eq!(run.rejections.len(), 1);
    let rejection = &run.rejections[0];
    assert_eq!(rejection.kind, ProfileKind::Brand);
    assert_eq!(rejection.id, "b9");
    assert!(matches!(rejection.error, ScoringError::Data(_)));
    assert_eq!(run.summary().rejections.len(), 1);
}

#[test]
fn test_export_writes_run_directory() {
    let (artists, brands) = two_by_three();
    let run = MatchEngine::new(open_config()).unwrap().run(&artists, &brands).unwrap();
    let dir = std::env::temp_dir().join(format!("encore_engine_out_{}", std::process::id()));

    let files = run.export(&dir, 2, ExportFormat::Csv).unwrap();
    let top = std::fs::read_to_string(&files.top_matches).unwrap();
    assert_eq!(top.lines().count(), 1 + 2 * 2);
    assert!(files.summary.exists());
    assert!(files.data_dictionary.exists());

    std::fs::remove_dir_all(dir).ok();
}

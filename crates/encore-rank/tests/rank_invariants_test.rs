//! Rank invariants over generated score sets.

use encore_data::IndustryCategory;
use encore_rank::{MatchTier, rank_by_artist};
use encore_scoring::{ComponentScores, CompositeScore, PairScore};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn generated_pairs(rng: &mut StdRng, artists: usize, brands: usize) -> Vec<PairScore> {
    let mut pairs = Vec::new();
    for a in 0..artists {
        for b in 0..brands {
            // roughly one pair in ten is unscored; scores are coarse to force ties
            let score = (rng.gen_range(0..10) != 0).then(|| f64::from(rng.gen_range(0..40_u32)) * 2.5);
            pairs.push(PairScore {
                artist_id: format!("artist-{a:02}"),
                artist_name: format!("Artist {}", artists - a),
                brand_id: format!("brand-{b:03}"),
                brand_name: format!("Brand {b}"),
                industry: IndustryCategory::Other,
                components: score.map(|_| ComponentScores {
                    demographic: 0.5,
                    age: Some(0.5),
                    gender: Some(0.5),
                    income: None,
                    ethnicity: None,
                    attribute: 0.5,
                    attribute_matches: 1,
                    geographic: 0.0,
                    industry_affinity: 0.0,
                }),
                composite: score.map(|score| CompositeScore {
                    score,
                    standard_error: 4.69,
                    ci_lower: (score - 9.19).max(0.0),
                    ci_upper: (score + 9.19).min(100.0),
                    context: 0.0,
                }),
            });
        }
    }
    pairs
}

#[test]
fn test_ranks_are_contiguous_and_scores_non_increasing() {
    let mut rng = StdRng::seed_from_u64(2024);
    let ranked = rank_by_artist(generated_pairs(&mut rng, 6, 40)).unwrap();
    assert_eq!(ranked.len(), 6);

    for artist in &ranked {
        let scored: Vec<_> = artist.matches().iter().filter(|m| m.is_scored()).collect();
        let ranks: Vec<usize> = scored.iter().filter_map(|m| m.rank()).collect();
        assert_eq!(ranks, (1..=scored.len()).collect::<Vec<_>>());

        for window in scored.windows(2) {
            let (first, second) = (window[0], window[1]);
            let (a, b) = (first.composite_score().unwrap(), second.composite_score().unwrap());
            assert!(a >= b);
            if a == b {
                assert!(first.brand_id() < second.brand_id());
            }
        }

        // unscored rows trail with no rank
        let first_unscored = artist.matches().iter().position(|m| !m.is_scored());
        if let Some(position) = first_unscored {
            assert_eq!(position, scored.len());
            assert!(artist.matches()[position..].iter().all(|m| m.rank().is_none()));
        }
    }
}

#[test]
fn test_tiers_follow_z_scores() {
    let mut rng = StdRng::seed_from_u64(99);
    for artist in rank_by_artist(generated_pairs(&mut rng, 3, 60)).unwrap() {
        for score in artist.matches().iter().filter(|m| m.is_scored()) {
            let z = score.z_score().unwrap();
            assert_eq!(score.tier(), Some(MatchTier::from_z_score(z)));
            let p = score.p_value().unwrap();
            assert!((0.0..=1.0).contains(&p));
        }
    }
}

#[test]
fn test_artists_ordered_by_name() {
    let mut rng = StdRng::seed_from_u64(5);
    let ranked = rank_by_artist(generated_pairs(&mut rng, 4, 3)).unwrap();
    let names: Vec<&str> = ranked.iter().map(|r| r.artist_name()).collect();
    assert_eq!(names, vec!["Artist 1", "Artist 2", "Artist 3", "Artist 4"]);
}

#[test]
fn test_ranking_is_deterministic() {
    let first = rank_by_artist(generated_pairs(&mut StdRng::seed_from_u64(11), 3, 25)).unwrap();
    let mut shuffled = generated_pairs(&mut StdRng::seed_from_u64(11), 3, 25);
    shuffled.reverse();
    let second = rank_by_artist(shuffled).unwrap();

    let layout = |ranked: &[encore_rank::RankedMatches]| -> Vec<(String, String, Option<usize>)> {
        ranked
            .iter()
            .flat_map(|artist| artist.matches())
            .map(|m| (m.artist_id().to_string(), m.brand_id().to_string(), m.rank()))
            .collect()
    };
    assert_eq!(layout(&first), layout(&second));
}

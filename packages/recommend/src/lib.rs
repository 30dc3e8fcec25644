#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Value-for-money locality recommender.
//!
//! Given prepared listings and a target locality, [`recommend`] returns
//! localities that offer a larger median floor area at a comparable
//! price per square foot:
//!
//! 1. listings are aggregated into per-locality [`LocalityProfile`]s,
//! 2. profiles are clustered with seeded k-means on
//!    `(median_price_per_area, median_area)`,
//! 3. the target's cluster becomes the candidate set, unless it is too
//!    small, in which case every profile inside the price tolerance band
//!    is used instead,
//! 4. candidates without a strictly larger median area are dropped, and
//!    the rest are ranked by area gain.
//!
//! Every call is a pure function of its inputs. Nothing is cached and the
//! caller's listings are only read.

pub mod aggregate;
pub mod kmeans;

use std::cmp::Ordering;

use house_price_listing_models::PreparedListing;
use house_price_recommend_models::{FeatureScaling, LocalityProfile, RecommendParams, Suggestion};

pub use aggregate::aggregate;

/// Errors that can occur during a recommendation request.
#[derive(Debug, thiserror::Error)]
pub enum RecommendError {
    /// A tuning parameter is out of range.
    #[error("Invalid parameter `{name}`: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of what went wrong.
        message: String,
    },

    /// Listing or profile data contains unusable numbers.
    #[error("Malformed input: {message}")]
    MalformedInput {
        /// Description of what went wrong.
        message: String,
    },
}

/// Where the candidate set for a request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    /// The target's k-means cluster.
    Cluster,
    /// The price tolerance band around the target.
    PriceBand,
}

/// Checks the request parameters before any work is done.
///
/// # Errors
///
/// Returns [`RecommendError::InvalidParameter`] if `top_k` or
/// `cluster_count` is zero, or `price_tolerance` is negative or not finite.
pub fn validate_params(params: &RecommendParams) -> Result<(), RecommendError> {
    if params.top_k < 1 {
        return Err(RecommendError::InvalidParameter {
            name: "top_k",
            message: "must be at least 1".to_owned(),
        });
    }
    if params.cluster_count < 1 {
        return Err(RecommendError::InvalidParameter {
            name: "cluster_count",
            message: "must be at least 1".to_owned(),
        });
    }
    if !params.price_tolerance.is_finite() || params.price_tolerance < 0.0 {
        return Err(RecommendError::InvalidParameter {
            name: "price_tolerance",
            message: format!(
                "must be a finite number >= 0, got {}",
                params.price_tolerance
            ),
        });
    }
    Ok(())
}

fn check_profiles(profiles: &[LocalityProfile]) -> Result<(), RecommendError> {
    for profile in profiles {
        let finite = profile.median_price_per_area.is_finite() && profile.median_area.is_finite();
        if !finite || profile.median_price_per_area <= 0.0 || profile.median_area <= 0.0 {
            return Err(RecommendError::MalformedInput {
                message: format!(
                    "profile {} has median_price_per_area = {}, median_area = {}",
                    profile.locality, profile.median_price_per_area, profile.median_area
                ),
            });
        }
    }
    Ok(())
}

/// Labels every profile with a cluster index.
fn cluster_profiles(profiles: &[LocalityProfile], params: &RecommendParams) -> Vec<usize> {
    let points: Vec<kmeans::Point> = profiles
        .iter()
        .map(|p| [p.median_price_per_area, p.median_area])
        .collect();

    let points = match params.scaling {
        FeatureScaling::Raw => points,
        FeatureScaling::Standardized => kmeans::standardize(&points),
    };

    let k = params.cluster_count.min(profiles.len());
    kmeans::fit(&points, k, params.seed).labels
}

/// Picks the candidate profiles for `target_idx`: its cluster, or the
/// price band when the cluster has fewer than
/// `params.min_cluster_candidates` members.
#[must_use]
pub fn candidate_set<'a>(
    profiles: &'a [LocalityProfile],
    target_idx: usize,
    params: &RecommendParams,
) -> (Vec<&'a LocalityProfile>, CandidateSource) {
    let labels = cluster_profiles(profiles, params);
    let target_label = labels.get(target_idx).copied();

    let cluster: Vec<&LocalityProfile> = profiles
        .iter()
        .zip(&labels)
        .filter(|(_, label)| Some(**label) == target_label)
        .map(|(p, _)| p)
        .collect();

    if cluster.len() >= params.min_cluster_candidates {
        return (cluster, CandidateSource::Cluster);
    }

    let target_price = profiles[target_idx].median_price_per_area;
    let lo = target_price * (1.0 - params.price_tolerance);
    let hi = target_price * (1.0 + params.price_tolerance);

    log::debug!(
        "Cluster for {} has {} member(s); using price band [{lo:.2}, {hi:.2}]",
        profiles[target_idx].locality,
        cluster.len()
    );

    let band = profiles
        .iter()
        .filter(|p| p.median_price_per_area >= lo && p.median_price_per_area <= hi)
        .collect();

    (band, CandidateSource::PriceBand)
}

/// Keeps candidates with a strictly larger median area than `target`,
/// ranks them by area gain (largest first, ties by locality name), and
/// truncates to `top_k`.
#[must_use]
pub fn rank_suggestions<'a>(
    target: &LocalityProfile,
    candidates: impl IntoIterator<Item = &'a LocalityProfile>,
    top_k: usize,
) -> Vec<Suggestion> {
    let mut suggestions: Vec<Suggestion> = candidates
        .into_iter()
        .filter(|c| c.median_area > target.median_area)
        .map(|c| Suggestion {
            recommended_locality: c.locality.clone(),
            median_price_per_area: c.median_price_per_area,
            median_area: c.median_area,
            area_gain: c.median_area - target.median_area,
        })
        .collect();

    suggestions.sort_by(|a, b| match b.area_gain.total_cmp(&a.area_gain) {
        Ordering::Equal => a.recommended_locality.cmp(&b.recommended_locality),
        other => other,
    });
    suggestions.truncate(top_k);

    suggestions
}

/// Recommends alternatives to `target_locality` from an already-built
/// profile table.
///
/// Returns an empty list if the target is not in `profiles`.
///
/// # Errors
///
/// Returns [`RecommendError`] if `params` are out of range or a profile
/// carries non-finite or non-positive medians.
pub fn recommend_from_profiles(
    profiles: &[LocalityProfile],
    target_locality: &str,
    params: &RecommendParams,
) -> Result<Vec<Suggestion>, RecommendError> {
    validate_params(params)?;
    check_profiles(profiles)?;

    let target_locality = target_locality.trim();
    let Some(target_idx) = profiles.iter().position(|p| p.locality == target_locality) else {
        log::debug!("No listings for locality {target_locality:?}");
        return Ok(Vec::new());
    };

    let (candidates, source) = candidate_set(profiles, target_idx, params);
    let target = &profiles[target_idx];
    let suggestions = rank_suggestions(target, candidates, params.top_k);

    log::debug!(
        "{} suggestion(s) for {target_locality} from {source:?} candidates",
        suggestions.len()
    );

    Ok(suggestions)
}

/// Recommends localities offering more floor area than `target_locality`
/// at a comparable price per square foot.
///
/// Returns an empty list when the target has no listings or no candidate
/// beats its median area.
///
/// # Errors
///
/// Returns [`RecommendError::InvalidParameter`] for out-of-range
/// parameters and [`RecommendError::MalformedInput`] for listings with
/// non-finite or non-positive numbers.
pub fn recommend(
    listings: &[PreparedListing],
    target_locality: &str,
    params: &RecommendParams,
) -> Result<Vec<Suggestion>, RecommendError> {
    validate_params(params)?;
    let profiles = aggregate(listings)?;
    recommend_from_profiles(&profiles, target_locality, params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(locality: &str, median_price_per_area: f64, median_area: f64) -> LocalityProfile {
        LocalityProfile {
            locality: locality.to_owned(),
            median_price_per_area,
            median_area,
            listing_count: 1,
        }
    }

    fn sample_profiles() -> Vec<LocalityProfile> {
        vec![
            profile("A", 5000.0, 900.0),
            profile("B", 5100.0, 1100.0),
            profile("C", 4900.0, 1050.0),
            profile("D", 9000.0, 2000.0),
        ]
    }

    fn listing(locality: &str, area_sqft: f64, price_per_area: f64) -> PreparedListing {
        PreparedListing {
            locality: locality.to_owned(),
            bhk: None,
            area_sqft,
            price: area_sqft * price_per_area,
            price_per_area,
        }
    }

    fn names(suggestions: &[Suggestion]) -> Vec<&str> {
        suggestions
            .iter()
            .map(|s| s.recommended_locality.as_str())
            .collect()
    }

    #[test]
    fn sample_scenario_suggests_b_then_c() {
        let params = RecommendParams::default()
            .with_price_tolerance(0.10)
            .with_top_k(5)
            .with_cluster_count(2);

        let suggestions = recommend_from_profiles(&sample_profiles(), "A", &params).unwrap();

        assert_eq!(names(&suggestions), vec!["B", "C"]);
        assert!((suggestions[0].area_gain - 200.0).abs() < f64::EPSILON);
        assert!((suggestions[1].area_gain - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn recommends_from_raw_listings() {
        let listings = vec![
            listing("A", 850.0, 5000.0),
            listing("A", 950.0, 5000.0),
            listing("B", 1100.0, 5100.0),
            listing("C", 1000.0, 4900.0),
            listing("C", 1100.0, 4900.0),
            listing("D", 2000.0, 9000.0),
        ];
        let params = RecommendParams::default().with_cluster_count(2);

        let suggestions = recommend(&listings, "A", &params).unwrap();
        assert_eq!(names(&suggestions), vec!["B", "C"]);
        assert!((suggestions[1].median_area - 1050.0).abs() < f64::EPSILON);
    }

    #[test]
    fn is_deterministic() {
        let params = RecommendParams::default().with_cluster_count(3);
        let mut profiles = sample_profiles();
        profiles.push(profile("E", 5050.0, 1300.0));
        profiles.push(profile("F", 7000.0, 1500.0));

        let first = recommend_from_profiles(&profiles, "A", &params).unwrap();
        let second = recommend_from_profiles(&profiles, "A", &params).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_locality_yields_empty() {
        let suggestions =
            recommend_from_profiles(&sample_profiles(), "NoSuchPlace", &RecommendParams::default())
                .unwrap();
        assert!(suggestions.is_empty());

        let suggestions = recommend(&[], "NoSuchPlace", &RecommendParams::default()).unwrap();
        assert!(suggestions.is_empty());
    }

    #[test]
    fn never_recommends_target_or_smaller_areas() {
        let mut profiles = sample_profiles();
        profiles.push(profile("Same", 5000.0, 900.0));
        profiles.push(profile("Smaller", 5000.0, 800.0));
        let params = RecommendParams::default().with_cluster_count(1);

        let suggestions = recommend_from_profiles(&profiles, "A", &params).unwrap();
        assert!(!suggestions.is_empty());
        for s in &suggestions {
            assert_ne!(s.recommended_locality, "A");
            assert!(s.median_area > 900.0);
            assert!(s.area_gain > 0.0);
        }
    }

    #[test]
    fn single_cluster_uses_every_locality() {
        let params = RecommendParams::default().with_cluster_count(1);
        let suggestions = recommend_from_profiles(&sample_profiles(), "A", &params).unwrap();
        assert_eq!(names(&suggestions), vec!["D", "B", "C"]);
    }

    #[test]
    fn falls_back_to_price_band_when_cluster_is_tiny() {
        // One cluster per locality, so the target's cluster has one member.
        let profiles = vec![
            profile("T", 5000.0, 1000.0),
            profile("X", 5200.0, 1300.0),
            profile("Y", 4800.0, 1200.0),
            profile("Z", 5400.0, 1100.0),
            profile("W", 9000.0, 2500.0),
        ];
        let params = RecommendParams::default()
            .with_price_tolerance(0.10)
            .with_cluster_count(10);

        let (candidates, source) = candidate_set(&profiles, 0, &params);
        assert_eq!(source, CandidateSource::PriceBand);
        assert_eq!(candidates.len(), 4);

        let suggestions = recommend_from_profiles(&profiles, "T", &params).unwrap();
        assert_eq!(names(&suggestions), vec!["X", "Y", "Z"]);
    }

    #[test]
    fn price_band_bounds_are_inclusive() {
        let profiles = vec![
            profile("T", 1000.0, 1000.0),
            profile("Lo", 500.0, 1100.0),
            profile("Hi", 1500.0, 1200.0),
        ];
        let params = RecommendParams::default()
            .with_price_tolerance(0.5)
            .with_cluster_count(3);

        let (candidates, source) = candidate_set(&profiles, 0, &params);
        assert_eq!(source, CandidateSource::PriceBand);
        assert_eq!(candidates.len(), 3);
    }

    #[test]
    fn uses_cluster_when_large_enough() {
        let params = RecommendParams::default().with_cluster_count(2);
        let profiles = sample_profiles();
        let (candidates, source) = candidate_set(&profiles, 0, &params);
        assert_eq!(source, CandidateSource::Cluster);
        let mut found: Vec<&str> = candidates.iter().map(|p| p.locality.as_str()).collect();
        found.sort_unstable();
        assert_eq!(found, vec!["A", "B", "C"]);
    }

    #[test]
    fn identical_profiles_do_not_error() {
        let profiles = vec![
            profile("P", 5000.0, 1000.0),
            profile("Q", 5000.0, 1000.0),
            profile("R", 5000.0, 1000.0),
            profile("S", 5000.0, 1000.0),
        ];
        let suggestions =
            recommend_from_profiles(&profiles, "P", &RecommendParams::default()).unwrap();
        assert!(suggestions.is_empty());
    }

    #[test]
    fn ranks_by_area_gain_descending() {
        let target = profile("T", 5000.0, 1000.0);
        let candidates = [
            profile("G50", 5000.0, 1050.0),
            profile("G200", 5000.0, 1200.0),
            profile("G10", 5000.0, 1010.0),
            profile("G75", 5000.0, 1075.0),
        ];

        let gains: Vec<f64> = rank_suggestions(&target, &candidates, 10)
            .iter()
            .map(|s| s.area_gain)
            .collect();
        assert_eq!(gains, vec![200.0, 75.0, 50.0, 10.0]);
    }

    #[test]
    fn breaks_ties_by_locality_name() {
        let target = profile("T", 5000.0, 1000.0);
        let candidates = [profile("Zeta", 5000.0, 1100.0), profile("Alpha", 5000.0, 1100.0)];
        let suggestions = rank_suggestions(&target, &candidates, 10);
        assert_eq!(names(&suggestions), vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn truncates_to_top_k() {
        let params = RecommendParams::default().with_cluster_count(1).with_top_k(2);
        let suggestions = recommend_from_profiles(&sample_profiles(), "A", &params).unwrap();
        assert_eq!(suggestions.len(), 2);
        assert_eq!(names(&suggestions), vec!["D", "B"]);
    }

    #[test]
    fn rejects_invalid_parameters() {
        let profiles = sample_profiles();

        let err = recommend_from_profiles(&profiles, "A", &RecommendParams::default().with_top_k(0))
            .unwrap_err();
        assert!(matches!(err, RecommendError::InvalidParameter { name: "top_k", .. }));

        let err = recommend_from_profiles(
            &profiles,
            "A",
            &RecommendParams::default().with_cluster_count(0),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RecommendError::InvalidParameter {
                name: "cluster_count",
                ..
            }
        ));

        let err = recommend_from_profiles(
            &profiles,
            "A",
            &RecommendParams::default().with_price_tolerance(-0.1),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RecommendError::InvalidParameter {
                name: "price_tolerance",
                ..
            }
        ));
    }

    #[test]
    fn invalid_parameters_rejected_even_for_unknown_locality() {
        let err = recommend(&[], "Nowhere", &RecommendParams::default().with_top_k(0)).unwrap_err();
        assert!(matches!(err, RecommendError::InvalidParameter { .. }));
    }

    #[test]
    fn rejects_non_finite_listings() {
        let listings = vec![listing("A", 900.0, 5000.0), listing("B", f64::INFINITY, 5000.0)];
        let err = recommend(&listings, "A", &RecommendParams::default()).unwrap_err();
        assert!(matches!(err, RecommendError::MalformedInput { .. }));
    }

    #[test]
    fn rejects_non_finite_profiles() {
        let mut profiles = sample_profiles();
        profiles[2].median_area = f64::NAN;
        let err =
            recommend_from_profiles(&profiles, "A", &RecommendParams::default()).unwrap_err();
        assert!(matches!(err, RecommendError::MalformedInput { .. }));
    }

    #[test]
    fn standardized_scaling_still_honours_invariants() {
        let params = RecommendParams::default()
            .with_cluster_count(2)
            .with_scaling(FeatureScaling::Standardized);
        let suggestions = recommend_from_profiles(&sample_profiles(), "A", &params).unwrap();
        assert!(suggestions.len() <= params.top_k);
        assert!(suggestions.iter().all(|s| s.median_area > 900.0));
        assert!(suggestions.iter().all(|s| s.recommended_locality != "A"));
    }

    #[test]
    fn does_not_modify_listings() {
        let listings = vec![
            listing("A", 900.0, 5000.0),
            listing("B", 1100.0, 5100.0),
            listing("C", 1050.0, 4900.0),
        ];
        let before = listings.clone();
        let _ = recommend(&listings, "A", &RecommendParams::default()).unwrap();
        assert_eq!(listings, before);
    }
}

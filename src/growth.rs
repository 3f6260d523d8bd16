//! Establishment curves: the fraction of the mature annual rate a planting
//! reaches in a given year after planting, plus the age-based variant used
//! when standing trees are removed.

use serde::Serialize;

use crate::error::{ImpactError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthTrack {
    Carbon,
    /// Shared by biodiversity and resilience.
    Canopy,
}

const CARBON_CURVE: [f64; 6] = [0.05, 0.15, 0.30, 0.50, 0.70, 0.85];
const CANOPY_CURVE: [f64; 6] = [0.10, 0.25, 0.45, 0.65, 0.80, 0.90];
const PLATEAU: f64 = 0.95;
const OLDER_MATURE: f64 = 0.90;
const VERY_OLD: f64 = 0.85;

pub fn growth_factor(track: GrowthTrack, year: u32) -> Result<f64> {
    if year == 0 {
        return Err(ImpactError::InvalidGrowthYear(year));
    }
    let curve = match track {
        GrowthTrack::Carbon => &CARBON_CURVE,
        GrowthTrack::Canopy => &CANOPY_CURVE,
    };
    Ok(curve.get(year as usize - 1).copied().unwrap_or(PLATEAU))
}

/// Relative efficiency of a stand of the given age. Young trees follow the
/// carbon curve, then efficiency declines as trees senesce.
pub fn age_growth_factor(age_years: u32) -> Result<f64> {
    match age_years {
        0 => Err(ImpactError::InvalidGrowthYear(0)),
        1..=6 => growth_factor(GrowthTrack::Carbon, age_years),
        7..=20 => Ok(PLATEAU),
        21..=50 => Ok(OLDER_MATURE),
        _ => Ok(VERY_OLD),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_carbon_track_values() {
        let expected = [0.05, 0.15, 0.30, 0.50, 0.70, 0.85, 0.95, 0.95];
        for (index, value) in expected.iter().enumerate() {
            let year = index as u32 + 1;
            assert_eq!(growth_factor(GrowthTrack::Carbon, year).unwrap(), *value);
        }
    }

    #[test]
    fn test_canopy_track_values() {
        assert_eq!(growth_factor(GrowthTrack::Canopy, 1).unwrap(), 0.10);
        assert_eq!(growth_factor(GrowthTrack::Canopy, 4).unwrap(), 0.65);
        assert_eq!(growth_factor(GrowthTrack::Canopy, 6).unwrap(), 0.90);
        assert_eq!(growth_factor(GrowthTrack::Canopy, 7).unwrap(), 0.95);
    }

    #[test]
    fn test_tracks_are_monotonic_and_plateau() {
        for track in [GrowthTrack::Carbon, GrowthTrack::Canopy] {
            let mut previous = 0.0;
            for year in 1..=100 {
                let factor = growth_factor(track, year).unwrap();
                assert!(factor > 0.0 && factor <= 1.0);
                assert!(factor >= previous, "{track:?} decreased at year {year}");
                if year >= 7 {
                    assert_eq!(factor, 0.95);
                }
                previous = factor;
            }
        }
    }

    #[test]
    fn test_year_zero_is_rejected() {
        assert_eq!(
            growth_factor(GrowthTrack::Carbon, 0),
            Err(ImpactError::InvalidGrowthYear(0))
        );
        assert!(age_growth_factor(0).is_err());
    }

    #[test]
    fn test_age_variant_declines_with_senescence() {
        assert_abs_diff_eq!(age_growth_factor(3).unwrap(), 0.30);
        assert_eq!(age_growth_factor(7).unwrap(), 0.95);
        assert_eq!(age_growth_factor(20).unwrap(), 0.95);
        assert_eq!(age_growth_factor(21).unwrap(), 0.90);
        assert_eq!(age_growth_factor(50).unwrap(), 0.90);
        assert_eq!(age_growth_factor(51).unwrap(), 0.85);
        assert_eq!(age_growth_factor(200).unwrap(), 0.85);
    }
}

use serde::Serialize;

use crate::error::{ImpactError, Result};
use crate::mix::SpeciesMix;

const SQUARE_METERS_PER_HECTARE: f64 = 10_000.0;
const PLANTING_SEASONS_PER_YEAR: u64 = 2;

pub fn trees_per_hectare(spacing_m: f64) -> Result<f64> {
    if !(spacing_m.is_finite() && spacing_m > 0.0) {
        return Err(ImpactError::InvalidSpacing(spacing_m));
    }
    Ok(SQUARE_METERS_PER_HECTARE / (spacing_m * spacing_m))
}

pub fn total_trees(area_hectares: f64, spacing_m: f64) -> Result<u64> {
    let density = trees_per_hectare(spacing_m)?;
    Ok((area_hectares.max(0.0) * density).floor() as u64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectScale {
    Small,
    Medium,
    Large,
    VeryLarge,
    Massive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CrewProfile {
    pub trees_per_person_per_day: u64,
    pub crew_size: u64,
    pub planting_days_per_year: u64,
}

impl ProjectScale {
    pub fn for_tree_count(trees: u64) -> Self {
        match trees {
            0..=999 => ProjectScale::Small,
            1_000..=9_999 => ProjectScale::Medium,
            10_000..=99_999 => ProjectScale::Large,
            100_000..=1_000_000 => ProjectScale::VeryLarge,
            _ => ProjectScale::Massive,
        }
    }

    pub fn crew(self) -> CrewProfile {
        let (trees_per_person_per_day, crew_size, planting_days_per_year) = match self {
            ProjectScale::Small => (50, 5, 60),
            ProjectScale::Medium => (75, 10, 90),
            ProjectScale::Large => (100, 25, 120),
            ProjectScale::VeryLarge => (150, 100, 150),
            ProjectScale::Massive => (200, 500, 180),
        };
        CrewProfile {
            trees_per_person_per_day,
            crew_size,
            planting_days_per_year,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlantingTimeline {
    pub scale: ProjectScale,
    pub crew: CrewProfile,
    pub trees_per_year: u64,
    pub trees_per_season: u64,
    pub years_to_complete: u64,
}

impl PlantingTimeline {
    pub fn for_tree_count(trees: u64) -> Self {
        let scale = ProjectScale::for_tree_count(trees);
        let crew = scale.crew();
        let trees_per_year =
            crew.trees_per_person_per_day * crew.crew_size * crew.planting_days_per_year;
        let years_to_complete = trees.div_ceil(trees_per_year).max(1);
        Self {
            scale,
            crew,
            trees_per_year,
            trees_per_season: trees_per_year / PLANTING_SEASONS_PER_YEAR,
            years_to_complete,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeciesAllocation {
    pub species_id: String,
    pub share: f64,
    pub trees: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlantingPlan {
    pub area_hectares: f64,
    pub spacing_m: f64,
    pub trees_per_hectare: f64,
    pub total_trees: u64,
    pub allocation: Vec<SpeciesAllocation>,
    pub timeline: PlantingTimeline,
}

impl PlantingPlan {
    /// Spacing defaults to the widest recommendation among the mix's species.
    pub fn new(area_hectares: f64, spacing_m: Option<f64>, mix: &SpeciesMix<'_>) -> Result<Self> {
        let spacing_m = spacing_m.unwrap_or_else(|| mix.recommended_spacing().meters());
        let density = trees_per_hectare(spacing_m)?;
        let total = total_trees(area_hectares, spacing_m)?;
        let allocation = mix
            .entries()
            .iter()
            .zip(mix.shares())
            .map(|(entry, share)| SpeciesAllocation {
                species_id: entry.species.id.to_string(),
                share,
                trees: (total as f64 * share).floor() as u64,
            })
            .collect();
        Ok(Self {
            area_hectares: area_hectares.max(0.0),
            spacing_m,
            trees_per_hectare: density,
            total_trees: total,
            allocation,
            timeline: PlantingTimeline::for_tree_count(total),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species;

    #[test]
    fn test_density_from_spacing() {
        assert_eq!(trees_per_hectare(2.0).unwrap(), 2_500.0);
        assert_eq!(trees_per_hectare(5.0).unwrap(), 400.0);
        assert_eq!(trees_per_hectare(0.0), Err(ImpactError::InvalidSpacing(0.0)));
        assert!(trees_per_hectare(-3.0).is_err());
    }

    #[test]
    fn test_total_trees_floors() {
        assert_eq!(total_trees(1.5, 3.0).unwrap(), 1_666);
        assert_eq!(total_trees(0.0, 3.0).unwrap(), 0);
    }

    #[test]
    fn test_scale_boundaries() {
        assert_eq!(ProjectScale::for_tree_count(999), ProjectScale::Small);
        assert_eq!(ProjectScale::for_tree_count(1_000), ProjectScale::Medium);
        assert_eq!(ProjectScale::for_tree_count(99_999), ProjectScale::Large);
        assert_eq!(ProjectScale::for_tree_count(1_000_000), ProjectScale::VeryLarge);
        assert_eq!(ProjectScale::for_tree_count(1_000_001), ProjectScale::Massive);
    }

    #[test]
    fn test_timeline_rounds_up_with_minimum_of_one_year() {
        let empty = PlantingTimeline::for_tree_count(0);
        assert_eq!(empty.years_to_complete, 1);

        let small = PlantingTimeline::for_tree_count(500);
        assert_eq!(small.trees_per_year, 15_000);
        assert_eq!(small.trees_per_season, 7_500);
        assert_eq!(small.years_to_complete, 1);

        let massive = PlantingTimeline::for_tree_count(40_000_000);
        assert_eq!(massive.trees_per_year, 18_000_000);
        assert_eq!(massive.years_to_complete, 3);
    }

    #[test]
    fn test_plan_allocates_by_share() {
        let oak = species::find("oak").unwrap();
        let pine = species::find("scots_pine").unwrap();
        let mix = SpeciesMix::new()
            .with_percentage(oak, 75.0)
            .and_then(|mix| mix.with_percentage(pine, 25.0))
            .unwrap();
        let plan = PlantingPlan::new(10.0, Some(2.0), &mix).unwrap();
        assert_eq!(plan.total_trees, 25_000);
        assert_eq!(plan.allocation[0].trees, 18_750);
        assert_eq!(plan.allocation[1].trees, 6_250);
        assert_eq!(plan.timeline.scale, ProjectScale::Large);
    }

    #[test]
    fn test_plan_uses_recommended_spacing() {
        let olive = species::find("olive").unwrap();
        let plan = PlantingPlan::new(1.0, None, &SpeciesMix::single(olive)).unwrap();
        assert_eq!(plan.spacing_m, 8.0);
        assert_eq!(plan.total_trees, 156);
    }
}

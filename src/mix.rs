use serde::Serialize;

use crate::error::{ImpactError, Result};
use crate::species::{SpacingClass, TreeSpecies};

/// Allowed deviation of a multi-species percentage total from 100.
pub const PERCENTAGE_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeciesMixEntry<'a> {
    pub species: &'a TreeSpecies,
    pub percentage: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeciesMix<'a> {
    entries: Vec<SpeciesMixEntry<'a>>,
}

impl<'a> SpeciesMix<'a> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn single(species: &'a TreeSpecies) -> Self {
        Self::new().with_species(species)
    }

    pub fn with_species(mut self, species: &'a TreeSpecies) -> Self {
        self.entries.push(SpeciesMixEntry {
            species,
            percentage: None,
        });
        self
    }

    pub fn with_percentage(mut self, species: &'a TreeSpecies, percentage: f64) -> Result<Self> {
        self.push(species, Some(percentage))?;
        Ok(self)
    }

    pub fn push(&mut self, species: &'a TreeSpecies, percentage: Option<f64>) -> Result<()> {
        if let Some(value) = percentage {
            if !(0.0..=100.0).contains(&value) {
                return Err(ImpactError::InvalidPercentage {
                    species: species.id.to_string(),
                    value,
                });
            }
        }
        self.entries.push(SpeciesMixEntry {
            species,
            percentage,
        });
        Ok(())
    }

    pub fn entries(&self) -> &[SpeciesMixEntry<'a>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of the percentages entered, or `None` when any entry has none.
    pub fn percentage_total(&self) -> Option<f64> {
        self.entries.iter().map(|entry| entry.percentage).sum()
    }

    pub fn is_balanced(&self) -> bool {
        self.percentage_total()
            .is_some_and(|total| (total - 100.0).abs() <= PERCENTAGE_TOLERANCE)
    }

    pub fn weighting(&self) -> MixWeighting {
        match self.entries.len() {
            0 => MixWeighting::Empty,
            1 => MixWeighting::Single,
            _ if self.is_balanced() => MixWeighting::Weighted,
            _ => MixWeighting::EqualFallback {
                percentage_total: self.percentage_total(),
            },
        }
    }

    /// Share of the mix (0..=1) assigned to each entry, in entry order.
    pub fn shares(&self) -> Vec<f64> {
        match self.weighting() {
            MixWeighting::Empty => Vec::new(),
            MixWeighting::Single => vec![1.0],
            MixWeighting::Weighted => self
                .entries
                .iter()
                .map(|entry| entry.percentage.unwrap_or(0.0) / 100.0)
                .collect(),
            MixWeighting::EqualFallback { .. } => {
                vec![1.0 / self.entries.len() as f64; self.entries.len()]
            }
        }
    }

    /// Widest recommended spacing in the mix.
    pub fn recommended_spacing(&self) -> SpacingClass {
        self.entries
            .iter()
            .map(|entry| entry.species.spacing)
            .max()
            .unwrap_or(SpacingClass::Standard)
    }
}

/// How per-species rates were combined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum MixWeighting {
    Empty,
    Single,
    Weighted,
    /// Percentages were missing or did not total 100; every species counts
    /// equally.
    EqualFallback { percentage_total: Option<f64> },
}

impl MixWeighting {
    pub fn is_fallback(&self) -> bool {
        matches!(self, MixWeighting::EqualFallback { .. })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BlendedRates {
    pub carbon: f64,
    pub biodiversity: f64,
    pub resilience: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MixAggregate {
    pub rates: BlendedRates,
    pub weighting: MixWeighting,
}

pub fn aggregate(mix: &SpeciesMix<'_>) -> MixAggregate {
    let mut rates = BlendedRates::default();
    for (entry, share) in mix.entries().iter().zip(mix.shares()) {
        rates.carbon += entry.species.carbon_sequestration * share;
        rates.biodiversity += entry.species.biodiversity_value * share;
        rates.resilience += entry.species.resilience_score * share;
    }
    MixAggregate {
        rates,
        weighting: mix.weighting(),
    }
}

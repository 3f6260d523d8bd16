use std::fmt;

use serde::Serialize;

use crate::comparison::compare;
use crate::error::Result;
use crate::impact::{
    compute_impact_with_hook, ImpactResult, SimulationMode, SimulationParameters, YearlyImpact,
};
use crate::location::Location;
use crate::mix::{MixWeighting, SpeciesMix};
use crate::observation::{EnvironmentalDataProvider, EnvironmentalObservation};
use crate::planting::{trees_per_hectare, PlantingPlan};

/// Everything one simulation call needs. Owned by the caller for the
/// duration of the call.
#[derive(Debug, Clone)]
pub struct SimulationRequest<'a> {
    pub location: Location,
    pub mix: SpeciesMix<'a>,
    pub observation: EnvironmentalObservation,
    pub parameters: SimulationParameters,
    /// Overrides the mix's recommended spacing for the planting plan.
    pub spacing_m: Option<f64>,
}

impl<'a> SimulationRequest<'a> {
    pub fn new(location: Location, mix: SpeciesMix<'a>, parameters: SimulationParameters) -> Self {
        Self {
            location,
            mix,
            observation: EnvironmentalObservation::unknown(),
            parameters,
            spacing_m: None,
        }
    }

    pub fn with_observation(mut self, observation: EnvironmentalObservation) -> Self {
        self.observation = observation;
        self
    }

    /// Fills the observation from `provider` at the location's centroid.
    pub fn observed_by(mut self, provider: &mut impl EnvironmentalDataProvider) -> Self {
        self.observation = provider.fetch(self.location.centroid());
        self
    }

    pub fn with_spacing(mut self, spacing_m: f64) -> Self {
        self.spacing_m = Some(spacing_m);
        self
    }
}

/// Conditions worth surfacing to a user; none of them stop a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SimulationWarning {
    /// Several species without percentages totalling 100; weighted equally.
    DegenerateMix { percentage_total: Option<f64> },
    EmptyMix,
    /// Regional defaults stood in for every observation.
    NoObservationData,
}

impl fmt::Display for SimulationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationWarning::DegenerateMix {
                percentage_total: Some(total),
            } => write!(
                f,
                "species percentages total {total:.1}%, not 100%; species were weighted equally"
            ),
            SimulationWarning::DegenerateMix {
                percentage_total: None,
            } => write!(
                f,
                "not every species has a percentage; species were weighted equally"
            ),
            SimulationWarning::EmptyMix => write!(f, "no species selected"),
            SimulationWarning::NoObservationData => {
                write!(f, "no soil or climate observations; regional defaults used")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub impact: ImpactResult,
    pub planting: Option<PlantingPlan>,
    pub comparisons: Vec<String>,
    pub warnings: Vec<SimulationWarning>,
}

/// Stateless front door to the impact model; any number of runs may share
/// one engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct Engine;

impl Engine {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&self, request: &SimulationRequest<'_>) -> Result<SimulationReport> {
        self.run_with_hook(request, |_| {})
    }

    pub fn run_with_hook<F>(
        &self,
        request: &SimulationRequest<'_>,
        hook: F,
    ) -> Result<SimulationReport>
    where
        F: FnMut(&YearlyImpact),
    {
        if let Some(spacing_m) = request.spacing_m {
            trees_per_hectare(spacing_m)?;
        }

        let impact = compute_impact_with_hook(
            &request.location,
            &request.mix,
            &request.observation,
            &request.parameters,
            hook,
        )?;
        tracing::debug!(
            carbon = impact.base_rates.carbon,
            biodiversity = impact.base_rates.biodiversity,
            resilience = impact.base_rates.resilience,
            trend = ?impact.climate.trend.source,
            "blended base rates"
        );

        let planting = match (request.parameters.mode, request.location.area_hectares()) {
            (SimulationMode::Planting, Some(area)) => {
                Some(PlantingPlan::new(area, request.spacing_m, &request.mix)?)
            }
            _ => None,
        };

        let warnings = collect_warnings(&impact.weighting, &request.observation);
        for warning in &warnings {
            tracing::warn!(%warning, "simulation warning");
        }

        tracing::debug!(
            years = impact.years,
            total_carbon = impact.total_carbon,
            "simulation complete"
        );
        Ok(SimulationReport {
            comparisons: compare(impact.total_carbon),
            impact,
            planting,
            warnings,
        })
    }
}

fn collect_warnings(
    weighting: &MixWeighting,
    observation: &EnvironmentalObservation,
) -> Vec<SimulationWarning> {
    let mut warnings = Vec::new();
    match *weighting {
        MixWeighting::Empty => warnings.push(SimulationWarning::EmptyMix),
        MixWeighting::EqualFallback { percentage_total } => {
            warnings.push(SimulationWarning::DegenerateMix { percentage_total })
        }
        MixWeighting::Single | MixWeighting::Weighted => {}
    }
    if observation.is_empty() {
        warnings.push(SimulationWarning::NoObservationData);
    }
    warnings
}

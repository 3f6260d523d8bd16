//! Year-by-year impact of a species mix at one location.
//!
//! Inputs are validated up front; after that every step has a defined
//! fallback, so missing observation data never stops a run. The two
//! simulation modes differ only through their [`TrajectoryPolicy`].

use serde::Serialize;

use crate::climate::ClimateProjection;
use crate::error::{ImpactError, Result};
use crate::growth::{age_growth_factor, growth_factor, GrowthTrack};
use crate::location::Location;
use crate::mix::{aggregate, BlendedRates, MixAggregate, MixWeighting, SpeciesMix};
use crate::observation::EnvironmentalObservation;

pub const MAX_YEARS: u32 = 100;
pub const MAX_TREE_AGE: u32 = 200;
pub const MAX_SCORE: f64 = 5.0;
pub const MAX_PERCENT: f64 = 95.0;
pub const MIN_CLEAR_CUT_AIR_QUALITY: f64 = -80.0;

const PLANTING_AIR_QUALITY_BASE: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SimulationMode {
    Planting,
    /// Removal of a standing forest whose trees are `tree_age_years` old.
    ClearCutting { tree_age_years: u32 },
}

/// Which headline figure a consumer shows. Never changes the math.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportingMode {
    Annual,
    #[default]
    Cumulative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SimulationParameters {
    pub years: u32,
    pub mode: SimulationMode,
    pub reporting: ReportingMode,
}

impl SimulationParameters {
    pub fn planting(years: u32) -> Self {
        Self {
            years,
            mode: SimulationMode::Planting,
            reporting: ReportingMode::default(),
        }
    }

    pub fn clear_cutting(years: u32, tree_age_years: u32) -> Self {
        Self {
            years,
            mode: SimulationMode::ClearCutting { tree_age_years },
            reporting: ReportingMode::default(),
        }
    }

    pub fn with_reporting(mut self, reporting: ReportingMode) -> Self {
        self.reporting = reporting;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_YEARS).contains(&self.years) {
            return Err(ImpactError::InvalidYears(self.years));
        }
        if let SimulationMode::ClearCutting { tree_age_years } = self.mode {
            if !(1..=MAX_TREE_AGE).contains(&tree_age_years) {
                return Err(ImpactError::InvalidTreeAge(tree_age_years));
            }
        }
        Ok(())
    }
}

/// `start + step * year`, held inside `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearTrajectory {
    pub start: f64,
    pub step: f64,
    pub min: f64,
    pub max: f64,
}

impl LinearTrajectory {
    pub fn at(&self, year: u32) -> f64 {
        (self.start + self.step * f64::from(year)).clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum GrowthCurve {
    /// Fresh planting following the establishment curves.
    Establishment,
    /// Standing trees that keep ageing from `initial_age`.
    Ageing { initial_age: u32 },
}

impl GrowthCurve {
    /// (carbon factor, canopy factor) for an elapsed year.
    pub fn factors(&self, year: u32) -> Result<(f64, f64)> {
        match *self {
            GrowthCurve::Establishment => Ok((
                growth_factor(GrowthTrack::Carbon, year)?,
                growth_factor(GrowthTrack::Canopy, year)?,
            )),
            GrowthCurve::Ageing { initial_age } => {
                if year == 0 {
                    return Err(ImpactError::InvalidGrowthYear(year));
                }
                let factor = age_growth_factor(initial_age.saturating_add(year - 1))?;
                Ok((factor, factor))
            }
        }
    }
}

struct ModeCoefficients {
    air_quality_step: f64,
    air_quality_min: f64,
    air_quality_max: f64,
    water_step: f64,
}

const PLANTING: ModeCoefficients = ModeCoefficients {
    air_quality_step: 0.7,
    air_quality_min: 0.0,
    air_quality_max: MAX_PERCENT,
    water_step: 0.3,
};

const CLEAR_CUTTING: ModeCoefficients = ModeCoefficients {
    air_quality_step: -1.0,
    air_quality_min: MIN_CLEAR_CUT_AIR_QUALITY,
    air_quality_max: 0.0,
    water_step: -0.3,
};

/// Immediate air-quality loss from clearing, by affected area.
fn clear_cut_air_quality_offset(area_hectares: f64) -> f64 {
    if area_hectares < 10.0 {
        -10.0
    } else if area_hectares < 100.0 {
        -20.0
    } else {
        -30.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrajectoryPolicy {
    pub curve: GrowthCurve,
    pub air_quality: LinearTrajectory,
    pub water_retention: LinearTrajectory,
}

impl SimulationMode {
    pub fn policy(&self, water_base: f64, area_hectares: f64) -> TrajectoryPolicy {
        let (curve, coefficients, air_quality_start) = match *self {
            SimulationMode::Planting => (
                GrowthCurve::Establishment,
                &PLANTING,
                PLANTING_AIR_QUALITY_BASE,
            ),
            SimulationMode::ClearCutting { tree_age_years } => (
                GrowthCurve::Ageing {
                    initial_age: tree_age_years,
                },
                &CLEAR_CUTTING,
                clear_cut_air_quality_offset(area_hectares),
            ),
        };
        TrajectoryPolicy {
            curve,
            air_quality: LinearTrajectory {
                start: air_quality_start,
                step: coefficients.air_quality_step,
                min: coefficients.air_quality_min,
                max: coefficients.air_quality_max,
            },
            water_retention: LinearTrajectory {
                start: water_base,
                step: coefficients.water_step,
                min: 0.0,
                max: MAX_PERCENT,
            },
        }
    }
}

/// Soil carbon and precipitation bonuses, then the 0..=5 score range.
pub fn apply_environment(
    rates: BlendedRates,
    observation: &EnvironmentalObservation,
) -> BlendedRates {
    let mut adjusted = rates;
    if let Some(soil_carbon) = observation.soil_carbon() {
        adjusted.carbon += soil_carbon / 10.0;
    }
    if let Some(precipitation) = observation.precipitation() {
        adjusted.resilience += precipitation / 1_000.0;
    }
    BlendedRates {
        carbon: adjusted.carbon.max(0.0),
        biodiversity: adjusted.biodiversity.clamp(0.0, MAX_SCORE),
        resilience: adjusted.resilience.clamp(0.0, MAX_SCORE),
    }
}

/// Percentage of rainfall retained before any trees are counted.
pub fn water_retention_base(lat: f64, observation: &EnvironmentalObservation) -> f64 {
    let lat = lat.abs();
    let base = if lat < 30.0 {
        85.0
    } else if lat < 60.0 {
        75.0
    } else {
        70.0
    };
    base + observation.precipitation().map_or(0.0, |p| p / 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearlyImpact {
    pub year: u32,
    pub carbon: f64,
    pub cumulative_carbon: f64,
    pub biodiversity: f64,
    pub resilience: f64,
    pub water_retention: f64,
    pub air_quality: f64,
    pub climate_modifier: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AnnualImpact {
    pub carbon: f64,
    pub biodiversity: f64,
    pub resilience: f64,
    pub water_retention: f64,
    pub air_quality: f64,
}

impl From<&YearlyImpact> for AnnualImpact {
    fn from(year: &YearlyImpact) -> Self {
        Self {
            carbon: year.carbon,
            biodiversity: year.biodiversity,
            resilience: year.resilience,
            water_retention: year.water_retention,
            air_quality: year.air_quality,
        }
    }
}

/// Carbon figures are kg CO2. In clear-cutting mode carbon, biodiversity and
/// resilience are the magnitudes lost rather than gained.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactResult {
    pub mode: SimulationMode,
    pub reporting: ReportingMode,
    pub years: u32,
    pub weighting: MixWeighting,
    pub base_rates: BlendedRates,
    pub climate: ClimateProjection,
    pub annual: AnnualImpact,
    pub total_carbon: f64,
    pub average_biodiversity: f64,
    pub average_resilience: f64,
    pub final_water_retention: f64,
    pub final_air_quality: f64,
    pub trajectory: Vec<YearlyImpact>,
}

impl ImpactResult {
    pub fn headline_carbon(&self) -> f64 {
        match self.reporting {
            ReportingMode::Annual => self.annual.carbon,
            ReportingMode::Cumulative => self.total_carbon,
        }
    }
}

pub fn compute_impact(
    location: &Location,
    mix: &SpeciesMix<'_>,
    observation: &EnvironmentalObservation,
    parameters: &SimulationParameters,
) -> Result<ImpactResult> {
    compute_impact_with_hook(location, mix, observation, parameters, |_| {})
}

/// Like [`compute_impact`], calling `hook` with each simulated year in order.
pub fn compute_impact_with_hook<F>(
    location: &Location,
    mix: &SpeciesMix<'_>,
    observation: &EnvironmentalObservation,
    parameters: &SimulationParameters,
    mut hook: F,
) -> Result<ImpactResult>
where
    F: FnMut(&YearlyImpact),
{
    location.validate()?;
    parameters.validate()?;

    let centroid = location.centroid();
    let MixAggregate { rates, weighting } = aggregate(mix);
    let base = apply_environment(rates, observation);
    let climate = ClimateProjection::from_observation(centroid.lat, observation);
    let policy = parameters.mode.policy(
        water_retention_base(centroid.lat, observation),
        location.area_hectares().unwrap_or(0.0),
    );

    let years = parameters.years;
    let mut trajectory = Vec::with_capacity(years as usize);
    let mut cumulative_carbon = 0.0;
    let mut biodiversity_sum = 0.0;
    let mut resilience_sum = 0.0;
    for year in 1..=years {
        let (carbon_factor, canopy_factor) = policy.curve.factors(year)?;
        let climate_modifier = climate.growth_modifier(year);
        let carbon = (base.carbon * carbon_factor * climate_modifier).max(0.0);
        cumulative_carbon += carbon;
        let biodiversity =
            (base.biodiversity * canopy_factor * climate_modifier).clamp(0.0, MAX_SCORE);
        let resilience =
            (base.resilience * canopy_factor * climate_modifier).clamp(0.0, MAX_SCORE);
        biodiversity_sum += biodiversity;
        resilience_sum += resilience;

        let record = YearlyImpact {
            year,
            carbon,
            cumulative_carbon,
            biodiversity,
            resilience,
            water_retention: policy.water_retention.at(year),
            air_quality: policy.air_quality.at(year),
            climate_modifier,
        };
        hook(&record);
        trajectory.push(record);
    }

    let annual = trajectory.first().map(AnnualImpact::from).unwrap_or_default();
    let span = f64::from(years);
    Ok(ImpactResult {
        mode: parameters.mode,
        reporting: parameters.reporting,
        years,
        weighting,
        base_rates: base,
        climate,
        annual,
        total_carbon: cumulative_carbon,
        average_biodiversity: (biodiversity_sum / span).clamp(0.0, MAX_SCORE),
        average_resilience: (resilience_sum / span).clamp(0.0, MAX_SCORE),
        final_water_retention: policy.water_retention.at(years),
        final_air_quality: policy.air_quality.at(years),
        trajectory,
    })
}

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::{
    engine::SimulationRequest,
    impact::{ReportingMode, SimulationParameters},
    location::{Bounds, Coordinate, Location},
    mix::SpeciesMix,
    observation::EnvironmentalObservation,
    species,
};

fn default_years() -> u32 {
    20
}

fn default_tree_age_years() -> u32 {
    30
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioMode {
    #[default]
    Planting,
    ClearCutting,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioReporting {
    Annual,
    #[default]
    Cumulative,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioSpecies {
    pub id: String,
    #[serde(default)]
    pub percentage: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_years")]
    pub years: u32,
    #[serde(default)]
    pub mode: ScenarioMode,
    #[serde(default = "default_tree_age_years")]
    pub tree_age_years: u32,
    #[serde(default)]
    pub reporting: ScenarioReporting,
    #[serde(default)]
    pub spacing_m: Option<f64>,
    #[serde(default)]
    pub point: Option<Coordinate>,
    #[serde(default)]
    pub region: Option<Bounds>,
    pub species: Vec<ScenarioSpecies>,
    #[serde(default)]
    pub observation: EnvironmentalObservation,
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario = Scenario::from_yaml(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!(
            scenario = %scenario.name,
            species = scenario.species.len(),
            years = scenario.years,
            "loaded scenario"
        );
        Ok(scenario)
    }
}

impl Scenario {
    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn years(&self, override_years: Option<u32>) -> u32 {
        override_years.unwrap_or(self.years)
    }

    pub fn location(&self) -> Result<Location> {
        let location = match (self.point, self.region) {
            (Some(point), None) => Location::Point(point),
            (None, Some(bounds)) => Location::Region(bounds),
            (Some(_), Some(_)) => bail!("scenario '{}' sets both point and region", self.name),
            (None, None) => bail!("scenario '{}' needs a point or a region", self.name),
        };
        location.validate()?;
        Ok(location)
    }

    /// Resolves species ids against the built-in catalog.
    pub fn mix(&self) -> Result<SpeciesMix<'static>> {
        let mut mix = SpeciesMix::new();
        for entry in &self.species {
            let Some(found) = species::find(&entry.id) else {
                bail!("unknown species id '{}'", entry.id);
            };
            mix.push(found, entry.percentage)?;
        }
        Ok(mix)
    }

    pub fn parameters(&self, override_years: Option<u32>) -> SimulationParameters {
        let years = self.years(override_years);
        let parameters = match self.mode {
            ScenarioMode::Planting => SimulationParameters::planting(years),
            ScenarioMode::ClearCutting => {
                SimulationParameters::clear_cutting(years, self.tree_age_years)
            }
        };
        parameters.with_reporting(match self.reporting {
            ScenarioReporting::Annual => ReportingMode::Annual,
            ScenarioReporting::Cumulative => ReportingMode::Cumulative,
        })
    }

    pub fn build_request(&self, override_years: Option<u32>) -> Result<SimulationRequest<'static>> {
        let parameters = self.parameters(override_years);
        parameters.validate()?;
        let mut request = SimulationRequest::new(self.location()?, self.mix()?, parameters)
            .with_observation(self.observation.clone());
        request.spacing_m = self.spacing_m;
        Ok(request)
    }
}

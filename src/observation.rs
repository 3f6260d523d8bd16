//! Observation snapshots and the provider seam that supplies them.
//!
//! Every field of an [`EnvironmentalObservation`] is optional. Providers never
//! fail into the engine: anything they cannot deliver comes back unknown.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::location::Coordinate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SoilObservation {
    /// Soil organic carbon content in g/kg.
    #[serde(default)]
    pub carbon_g_per_kg: Option<f64>,
    #[serde(default)]
    pub ph: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClimateObservation {
    #[serde(default)]
    pub temperature_c: Option<f64>,
    /// Annual precipitation in mm.
    #[serde(default)]
    pub precipitation_mm: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalYear {
    pub year: i32,
    pub temperature_c: f64,
    pub precipitation_mm: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalObservation {
    #[serde(default)]
    pub soil: SoilObservation,
    #[serde(default)]
    pub climate: ClimateObservation,
    #[serde(default)]
    pub history: Vec<HistoricalYear>,
}

impl EnvironmentalObservation {
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn soil_carbon(&self) -> Option<f64> {
        self.soil.carbon_g_per_kg.filter(|v| v.is_finite() && *v >= 0.0)
    }

    pub fn soil_ph(&self) -> Option<f64> {
        self.soil.ph.filter(|v| v.is_finite())
    }

    pub fn temperature(&self) -> Option<f64> {
        self.climate.temperature_c.filter(|v| v.is_finite())
    }

    pub fn precipitation(&self) -> Option<f64> {
        self.climate
            .precipitation_mm
            .filter(|v| v.is_finite() && *v >= 0.0)
    }

    /// Historical years with finite readings, in the order supplied.
    pub fn usable_history(&self) -> Vec<HistoricalYear> {
        self.history
            .iter()
            .filter(|h| {
                h.temperature_c.is_finite()
                    && h.precipitation_mm.is_finite()
                    && h.precipitation_mm >= 0.0
            })
            .copied()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.soil_carbon().is_none()
            && self.soil_ph().is_none()
            && self.temperature().is_none()
            && self.precipitation().is_none()
            && self.usable_history().is_empty()
    }
}

/// Supplies observations for a coordinate. Retries, caching and rate limits
/// belong to the implementation, never to the engine.
pub trait EnvironmentalDataProvider {
    fn name(&self) -> &str;
    fn fetch(&mut self, at: Coordinate) -> EnvironmentalObservation;
}

/// Serves one fixed snapshot regardless of coordinate.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    observation: EnvironmentalObservation,
}

impl StaticProvider {
    pub fn new(observation: EnvironmentalObservation) -> Self {
        Self { observation }
    }
}

impl EnvironmentalDataProvider for StaticProvider {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch(&mut self, _at: Coordinate) -> EnvironmentalObservation {
        self.observation.clone()
    }
}

pub trait RequestGate {
    fn is_allowed(&mut self, key: &str) -> bool;
}

/// Allows a key at most once per `interval`.
#[derive(Debug, Clone)]
pub struct MinIntervalGate {
    interval: Duration,
    last_allowed: HashMap<String, Instant>,
}

impl MinIntervalGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_allowed: HashMap::new(),
        }
    }
}

impl RequestGate for MinIntervalGate {
    fn is_allowed(&mut self, key: &str) -> bool {
        let now = Instant::now();
        match self.last_allowed.get(key) {
            Some(last) if now.duration_since(*last) < self.interval => false,
            _ => {
                self.last_allowed.insert(key.to_string(), now);
                true
            }
        }
    }
}

/// Wraps a provider behind a [`RequestGate`]; denied requests come back as an
/// all-unknown observation.
pub struct GatedProvider<P, G> {
    inner: P,
    gate: G,
}

impl<P, G> GatedProvider<P, G>
where
    P: EnvironmentalDataProvider,
    G: RequestGate,
{
    pub fn new(inner: P, gate: G) -> Self {
        Self { inner, gate }
    }
}

impl<P, G> EnvironmentalDataProvider for GatedProvider<P, G>
where
    P: EnvironmentalDataProvider,
    G: RequestGate,
{
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn fetch(&mut self, at: Coordinate) -> EnvironmentalObservation {
        let key = format!("{}:{:.4},{:.4}", self.inner.name(), at.lat, at.lon);
        if self.gate.is_allowed(&key) {
            self.inner.fetch(at)
        } else {
            tracing::debug!(key = %key, "provider request denied by gate");
            EnvironmentalObservation::unknown()
        }
    }
}

pub mod climate;
pub mod comparison;
pub mod engine;
pub mod error;
pub mod growth;
pub mod impact;
pub mod location;
pub mod mix;
pub mod observation;
pub mod planting;
pub mod scenario;
pub mod species;

pub use engine::{Engine, SimulationReport, SimulationRequest, SimulationWarning};
pub use error::{ImpactError, Result};
pub use impact::{ImpactResult, SimulationMode, SimulationParameters};

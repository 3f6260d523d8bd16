use thiserror::Error;

/// Invalid parameters, rejected before any computation begins. Values are
/// never clamped into range in place of one of these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImpactError {
    #[error("latitude {0} is outside [-90, 90]")]
    InvalidLatitude(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    InvalidLongitude(f64),
    #[error("simulation length of {0} years is outside [1, 100]")]
    InvalidYears(u32),
    #[error("tree age of {0} years is outside [1, 200]")]
    InvalidTreeAge(u32),
    #[error("malformed region bounds: {0}")]
    InvalidBounds(String),
    #[error("percentage {value} for species '{species}' is outside [0, 100]")]
    InvalidPercentage { species: String, value: f64 },
    #[error("tree spacing must be a positive number of meters, got {0}")]
    InvalidSpacing(f64),
    #[error("growth curves start at year 1, got year {0}")]
    InvalidGrowthYear(u32),
}

pub type Result<T> = std::result::Result<T, ImpactError>;

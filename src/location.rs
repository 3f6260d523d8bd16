use serde::{Deserialize, Serialize};

use crate::error::{ImpactError, Result};

const METERS_PER_DEGREE: f64 = 111_000.0;
const SQUARE_METERS_PER_HECTARE: f64 = 10_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        let coordinate = Self { lat, lon };
        coordinate.validate()?;
        Ok(coordinate)
    }

    pub fn validate(&self) -> Result<()> {
        check_latitude(self.lat)?;
        check_longitude(self.lon)
    }
}

/// Rectangular lat/lon bounding box. `east` may be smaller than `west`; such
/// a box is accepted but measures zero hectares.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl Bounds {
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Result<Self> {
        let bounds = Self {
            north,
            south,
            east,
            west,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    pub fn validate(&self) -> Result<()> {
        check_latitude(self.north)?;
        check_latitude(self.south)?;
        check_longitude(self.east)?;
        check_longitude(self.west)?;
        if self.north <= self.south {
            return Err(ImpactError::InvalidBounds(format!(
                "north ({}) must be greater than south ({})",
                self.north, self.south
            )));
        }
        Ok(())
    }

    pub fn centroid(&self) -> Coordinate {
        Coordinate {
            lat: (self.north + self.south) / 2.0,
            lon: (self.east + self.west) / 2.0,
        }
    }

    /// Equirectangular approximation, good enough for planting estimates.
    pub fn area_hectares(&self) -> f64 {
        let avg_lat = ((self.north + self.south) / 2.0).to_radians();
        let lat_meters = (self.north - self.south) * METERS_PER_DEGREE;
        let lng_meters = (self.east - self.west) * METERS_PER_DEGREE * avg_lat.cos();
        (lat_meters * lng_meters / SQUARE_METERS_PER_HECTARE).max(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Point(Coordinate),
    Region(Bounds),
}

impl Location {
    pub fn validate(&self) -> Result<()> {
        match self {
            Location::Point(coordinate) => coordinate.validate(),
            Location::Region(bounds) => bounds.validate(),
        }
    }

    /// Impact formulas work on a single coordinate; regions reduce to their
    /// centroid.
    pub fn centroid(&self) -> Coordinate {
        match self {
            Location::Point(coordinate) => *coordinate,
            Location::Region(bounds) => bounds.centroid(),
        }
    }

    pub fn area_hectares(&self) -> Option<f64> {
        match self {
            Location::Point(_) => None,
            Location::Region(bounds) => Some(bounds.area_hectares()),
        }
    }
}

fn check_latitude(lat: f64) -> Result<()> {
    if (-90.0..=90.0).contains(&lat) {
        Ok(())
    } else {
        Err(ImpactError::InvalidLatitude(lat))
    }
}

fn check_longitude(lon: f64) -> Result<()> {
    if (-180.0..=180.0).contains(&lon) {
        Ok(())
    } else {
        Err(ImpactError::InvalidLongitude(lon))
    }
}

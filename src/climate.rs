//! Linear climate-trend extrapolation and the growth modifier derived from it.

use serde::Serialize;

use crate::observation::{EnvironmentalObservation, HistoricalYear};

const FALLBACK_TEMPERATURE_SLOPE: f64 = 0.02;
const FALLBACK_PRECIPITATION_RATE: f64 = 0.01;
const TEMPERATURE_SENSITIVITY: f64 = 0.02;
const PRECIPITATION_SENSITIVITY: f64 = 0.5;
pub const MIN_GROWTH_MODIFIER: f64 = 0.5;
pub const MAX_GROWTH_MODIFIER: f64 = 2.0;

/// Ordinary least-squares slope of `points` as (x, y) pairs. Fewer than two
/// points or a zero denominator yield a flat trend.
pub fn ols_slope(points: &[(f64, f64)]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let n = points.len() as f64;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_xx) = (0.0, 0.0, 0.0, 0.0);
    for &(x, y) in points {
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }
    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return 0.0;
    }
    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    if slope.is_finite() {
        slope
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LatitudeBand {
    Tropical,
    Temperate,
    Boreal,
    Arctic,
}

impl LatitudeBand {
    pub fn for_latitude(lat: f64) -> Self {
        let lat = lat.abs();
        if lat < 23.5 {
            LatitudeBand::Tropical
        } else if lat < 50.0 {
            LatitudeBand::Temperate
        } else if lat < 66.5 {
            LatitudeBand::Boreal
        } else {
            LatitudeBand::Arctic
        }
    }

    pub fn default_temperature(self) -> f64 {
        match self {
            LatitudeBand::Tropical => 25.0,
            LatitudeBand::Temperate => 15.0,
            LatitudeBand::Boreal => 5.0,
            LatitudeBand::Arctic => -5.0,
        }
    }

    pub fn default_precipitation(self) -> f64 {
        match self {
            LatitudeBand::Tropical => 2_000.0,
            LatitudeBand::Temperate => 800.0,
            LatitudeBand::Boreal => 500.0,
            LatitudeBand::Arctic => 250.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendSource {
    /// Not enough history for any trend.
    Flat,
    /// Too little history to trust a regression.
    Fallback,
    Regression,
}

/// Temperature change in degrees C per year and relative precipitation change
/// per year (0.01 means +1% compounding).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClimateTrend {
    pub temperature_per_year: f64,
    pub precipitation_rate: f64,
    pub source: TrendSource,
}

impl ClimateTrend {
    pub fn flat() -> Self {
        Self {
            temperature_per_year: 0.0,
            precipitation_rate: 0.0,
            source: TrendSource::Flat,
        }
    }

    pub fn fallback() -> Self {
        Self {
            temperature_per_year: FALLBACK_TEMPERATURE_SLOPE,
            precipitation_rate: FALLBACK_PRECIPITATION_RATE,
            source: TrendSource::Fallback,
        }
    }

    pub fn estimate(history: &[HistoricalYear]) -> Self {
        match history.len() {
            0 | 1 => Self::flat(),
            2 => Self::fallback(),
            _ => {
                let temperatures: Vec<(f64, f64)> = history
                    .iter()
                    .map(|h| (f64::from(h.year), h.temperature_c))
                    .collect();
                let precipitation: Vec<(f64, f64)> = history
                    .iter()
                    .map(|h| (f64::from(h.year), h.precipitation_mm))
                    .collect();
                let mean_precipitation =
                    precipitation.iter().map(|(_, p)| p).sum::<f64>() / history.len() as f64;
                let precipitation_rate = if mean_precipitation > 0.0 {
                    ols_slope(&precipitation) / mean_precipitation
                } else {
                    0.0
                };
                Self {
                    temperature_per_year: ols_slope(&temperatures),
                    precipitation_rate,
                    source: TrendSource::Regression,
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSource {
    Observed,
    Regional,
}

/// Current growing conditions at a coordinate, observed or regional default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClimateBaseline {
    pub temperature_c: f64,
    pub precipitation_mm: f64,
    pub temperature_source: ValueSource,
    pub precipitation_source: ValueSource,
}

impl ClimateBaseline {
    pub fn regional(lat: f64) -> Self {
        let band = LatitudeBand::for_latitude(lat);
        Self {
            temperature_c: band.default_temperature(),
            precipitation_mm: band.default_precipitation(),
            temperature_source: ValueSource::Regional,
            precipitation_source: ValueSource::Regional,
        }
    }

    pub fn resolve(lat: f64, observation: &EnvironmentalObservation) -> Self {
        let mut baseline = Self::regional(lat);
        if let Some(temperature) = observation.temperature() {
            baseline.temperature_c = temperature;
            baseline.temperature_source = ValueSource::Observed;
        }
        if let Some(precipitation) = observation.precipitation() {
            baseline.precipitation_mm = precipitation;
            baseline.precipitation_source = ValueSource::Observed;
        }
        baseline
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClimateProjection {
    pub baseline: ClimateBaseline,
    pub trend: ClimateTrend,
}

impl ClimateProjection {
    pub fn new(baseline: ClimateBaseline, trend: ClimateTrend) -> Self {
        Self { baseline, trend }
    }

    pub fn from_observation(lat: f64, observation: &EnvironmentalObservation) -> Self {
        let history = observation.usable_history();
        Self::new(
            ClimateBaseline::resolve(lat, observation),
            ClimateTrend::estimate(&history),
        )
    }

    pub fn predicted_temperature(&self, years: u32) -> f64 {
        self.baseline.temperature_c + self.trend.temperature_per_year * f64::from(years)
    }

    pub fn predicted_precipitation(&self, years: u32) -> f64 {
        let factor = (1.0 + self.trend.precipitation_rate)
            .max(0.0)
            .powi(years as i32);
        (self.baseline.precipitation_mm * factor).max(0.0)
    }

    pub fn growth_modifier(&self, years: u32) -> f64 {
        growth_modifier(
            self.baseline.temperature_c,
            self.predicted_temperature(years),
            self.baseline.precipitation_mm,
            self.predicted_precipitation(years),
        )
    }
}

/// Geometric mean of the temperature and precipitation responses, clamped to
/// [`MIN_GROWTH_MODIFIER`, `MAX_GROWTH_MODIFIER`]. A non-positive current
/// precipitation leaves the precipitation response at 1.
pub fn growth_modifier(
    current_temperature: f64,
    predicted_temperature: f64,
    current_precipitation: f64,
    predicted_precipitation: f64,
) -> f64 {
    let temperature = 1.0 + TEMPERATURE_SENSITIVITY * (predicted_temperature - current_temperature);
    let precipitation = if current_precipitation > 0.0 {
        1.0 + PRECIPITATION_SENSITIVITY
            * ((predicted_precipitation - current_precipitation) / current_precipitation)
    } else {
        1.0
    };
    let product = temperature * precipitation;
    if product.is_nan() {
        return 1.0;
    }
    product
        .max(0.0)
        .sqrt()
        .clamp(MIN_GROWTH_MODIFIER, MAX_GROWTH_MODIFIER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::ClimateObservation;
    use approx::assert_abs_diff_eq;

    fn history(points: &[(i32, f64, f64)]) -> Vec<HistoricalYear> {
        points
            .iter()
            .map(|&(year, temperature_c, precipitation_mm)| HistoricalYear {
                year,
                temperature_c,
                precipitation_mm,
            })
            .collect()
    }

    #[test]
    fn test_ols_slope_of_exact_line() {
        let points = [(2000.0, 10.0), (2001.0, 10.5), (2002.0, 11.0), (2003.0, 11.5)];
        assert_abs_diff_eq!(ols_slope(&points), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_ols_slope_degenerate_inputs_are_flat() {
        assert_eq!(ols_slope(&[]), 0.0);
        assert_eq!(ols_slope(&[(2000.0, 3.0)]), 0.0);
        assert_eq!(ols_slope(&[(2000.0, 3.0), (2000.0, 5.0)]), 0.0);
    }

    #[test]
    fn test_trend_thresholds() {
        assert_eq!(ClimateTrend::estimate(&[]).source, TrendSource::Flat);
        let one = history(&[(2020, 10.0, 800.0)]);
        assert_eq!(ClimateTrend::estimate(&one), ClimateTrend::flat());
        let two = history(&[(2020, 10.0, 800.0), (2021, 30.0, 100.0)]);
        assert_eq!(ClimateTrend::estimate(&two), ClimateTrend::fallback());
    }

    #[test]
    fn test_regression_trend_from_history() {
        let series = history(&[
            (2018, 10.0, 900.0),
            (2019, 10.1, 1_000.0),
            (2020, 10.2, 1_100.0),
        ]);
        let trend = ClimateTrend::estimate(&series);
        assert_eq!(trend.source, TrendSource::Regression);
        assert_abs_diff_eq!(trend.temperature_per_year, 0.1, epsilon = 1e-9);
        assert_abs_diff_eq!(trend.precipitation_rate, 0.1, epsilon = 1e-9);
    }

    #[test]
    fn test_latitude_band_defaults() {
        assert_eq!(LatitudeBand::for_latitude(5.0).default_temperature(), 25.0);
        assert_eq!(LatitudeBand::for_latitude(-40.0).default_temperature(), 15.0);
        assert_eq!(LatitudeBand::for_latitude(60.0).default_temperature(), 5.0);
        assert_eq!(LatitudeBand::for_latitude(-80.0).default_temperature(), -5.0);
        assert!(
            LatitudeBand::Tropical.default_precipitation()
                > LatitudeBand::Arctic.default_precipitation()
        );
    }

    #[test]
    fn test_baseline_prefers_observations() {
        let observation = EnvironmentalObservation {
            climate: ClimateObservation {
                temperature_c: Some(9.0),
                precipitation_mm: None,
            },
            ..EnvironmentalObservation::unknown()
        };
        let baseline = ClimateBaseline::resolve(45.0, &observation);
        assert_eq!(baseline.temperature_c, 9.0);
        assert_eq!(baseline.temperature_source, ValueSource::Observed);
        assert_eq!(baseline.precipitation_mm, 800.0);
        assert_eq!(baseline.precipitation_source, ValueSource::Regional);
    }

    #[test]
    fn test_predictions_follow_trend() {
        let projection =
            ClimateProjection::new(ClimateBaseline::regional(45.0), ClimateTrend::fallback());
        assert_abs_diff_eq!(projection.predicted_temperature(10), 15.2, epsilon = 1e-9);
        assert_abs_diff_eq!(
            projection.predicted_precipitation(2),
            800.0 * 1.01 * 1.01,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_flat_projection_has_unit_modifier() {
        let projection =
            ClimateProjection::from_observation(12.0, &EnvironmentalObservation::unknown());
        for year in [1, 7, 50, 100] {
            assert_eq!(projection.growth_modifier(year), 1.0);
        }
    }

    #[test]
    fn test_growth_modifier_geometric_mean() {
        // temperature +5 -> 1.1, precipitation +20% -> 1.1
        let modifier = growth_modifier(10.0, 15.0, 1_000.0, 1_200.0);
        assert_abs_diff_eq!(modifier, 1.1, epsilon = 1e-9);
    }

    #[test]
    fn test_growth_modifier_is_always_clamped() {
        let temperatures = [-60.0, -10.0, 0.0, 12.5, 40.0, 500.0];
        let precipitation = [1.0, 300.0, 2_500.0];
        for &current_t in &temperatures {
            for &predicted_t in &temperatures {
                for &current_p in &precipitation {
                    for predicted_p in [0.0, current_p, current_p * 10.0, 1e9] {
                        let m = growth_modifier(current_t, predicted_t, current_p, predicted_p);
                        assert!((MIN_GROWTH_MODIFIER..=MAX_GROWTH_MODIFIER).contains(&m));
                    }
                }
            }
        }
    }

    #[test]
    fn test_steep_decline_dries_out_monotonically() {
        let history: Vec<HistoricalYear> = [3_000.0, 0.0, 0.0]
            .iter()
            .enumerate()
            .map(|(i, &precipitation_mm)| HistoricalYear {
                year: 2020 + i as i32,
                temperature_c: 10.0,
                precipitation_mm,
            })
            .collect();
        let trend = ClimateTrend::estimate(&history);
        assert!(trend.precipitation_rate < -1.0);

        let projection = ClimateProjection::new(ClimateBaseline::regional(45.0), trend);
        let mut previous = projection.growth_modifier(1);
        for year in 1..=6 {
            assert_eq!(projection.predicted_precipitation(year), 0.0);
            let modifier = projection.growth_modifier(year);
            assert!(modifier <= previous + 1e-12);
            previous = modifier;
        }
    }

    #[test]
    fn test_zero_precipitation_is_guarded() {
        assert_eq!(growth_modifier(10.0, 10.0, 0.0, 500.0), 1.0);
    }
}

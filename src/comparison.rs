use std::fmt;

use serde::Serialize;

const CAR_KG_PER_YEAR: f64 = 4_600.0;
const FLIGHT_NY_LONDON_ROUND_TRIP_KG: f64 = 986.0;
const HOUSEHOLD_ELECTRICITY_KG_PER_YEAR: f64 = 7_500.0;
const MIN_RATIO: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Equivalent {
    CarYears,
    Flights,
    HouseholdYears,
}

impl Equivalent {
    const ORDER: [Equivalent; 3] = [
        Equivalent::CarYears,
        Equivalent::Flights,
        Equivalent::HouseholdYears,
    ];

    pub fn kg_per_unit(self) -> f64 {
        match self {
            Equivalent::CarYears => CAR_KG_PER_YEAR,
            Equivalent::Flights => FLIGHT_NY_LONDON_ROUND_TRIP_KG,
            Equivalent::HouseholdYears => HOUSEHOLD_ELECTRICITY_KG_PER_YEAR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CarbonComparison {
    pub equivalent: Equivalent,
    pub ratio: f64,
}

impl fmt::Display for CarbonComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = format!("{:.1}", self.ratio);
        let singular = value == "1.0";
        match self.equivalent {
            Equivalent::CarYears => write!(
                f,
                "{value} {} of average car emissions",
                if singular { "year" } else { "years" }
            ),
            Equivalent::Flights => write!(
                f,
                "{value} round-trip {} from New York to London",
                if singular { "flight" } else { "flights" }
            ),
            Equivalent::HouseholdYears => write!(
                f,
                "{value} {} of household electricity use",
                if singular { "year" } else { "years" }
            ),
        }
    }
}

/// Equivalents worth mentioning for `total_carbon_kg`, in fixed order.
pub fn comparisons(total_carbon_kg: f64) -> Vec<CarbonComparison> {
    Equivalent::ORDER
        .iter()
        .map(|&equivalent| CarbonComparison {
            equivalent,
            ratio: total_carbon_kg / equivalent.kg_per_unit(),
        })
        .filter(|comparison| comparison.ratio >= MIN_RATIO)
        .collect()
}

pub fn compare(total_carbon_kg: f64) -> Vec<String> {
    comparisons(total_carbon_kg)
        .iter()
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_car_comparison_leads() {
        let lines = compare(9_200.0);
        assert_eq!(lines[0], "2.0 years of average car emissions");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "9.3 round-trip flights from New York to London");
        assert_eq!(lines[2], "1.2 years of household electricity use");
    }

    #[test]
    fn test_singular_wording() {
        assert_eq!(compare(4_600.0)[0], "1.0 year of average car emissions");
        assert_eq!(
            compare(986.0)[1],
            "1.0 round-trip flight from New York to London"
        );
    }

    #[test]
    fn test_small_ratios_are_omitted() {
        assert!(compare(50.0).is_empty());
        // 0.1 flights but under 0.1 car-years
        let lines = compare(100.0);
        assert_eq!(lines, vec!["0.1 round-trip flights from New York to London"]);
    }
}

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeciesCategory {
    Deciduous,
    Coniferous,
    Tropical,
    Mediterranean,
    Boreal,
    Arid,
    Subtropical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClimateZone {
    Tropical,
    Subtropical,
    Temperate,
    Mediterranean,
    Boreal,
    Arid,
}

/// Recommended planting distance between trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpacingClass {
    Dense,
    Standard,
    Open,
    Wide,
}

impl SpacingClass {
    pub fn meters(self) -> f64 {
        match self {
            SpacingClass::Dense => 2.0,
            SpacingClass::Standard => 3.0,
            SpacingClass::Open => 5.0,
            SpacingClass::Wide => 8.0,
        }
    }
}

/// Reference data for one species. Carbon is the mature annual rate in kg
/// CO2/year; biodiversity and resilience are scores on a 0-5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TreeSpecies {
    pub id: &'static str,
    pub name: &'static str,
    pub scientific_name: &'static str,
    pub category: SpeciesCategory,
    pub carbon_sequestration: f64,
    pub biodiversity_value: f64,
    pub resilience_score: f64,
    pub climate_zones: &'static [ClimateZone],
    pub spacing: SpacingClass,
}

const CATALOG: &[TreeSpecies] = &[
    TreeSpecies {
        id: "oak",
        name: "English Oak",
        scientific_name: "Quercus robur",
        category: SpeciesCategory::Deciduous,
        carbon_sequestration: 22.0,
        biodiversity_value: 5.0,
        resilience_score: 4.5,
        climate_zones: &[ClimateZone::Temperate],
        spacing: SpacingClass::Open,
    },
    TreeSpecies {
        id: "beech",
        name: "European Beech",
        scientific_name: "Fagus sylvatica",
        category: SpeciesCategory::Deciduous,
        carbon_sequestration: 20.0,
        biodiversity_value: 4.0,
        resilience_score: 3.5,
        climate_zones: &[ClimateZone::Temperate],
        spacing: SpacingClass::Open,
    },
    TreeSpecies {
        id: "silver_birch",
        name: "Silver Birch",
        scientific_name: "Betula pendula",
        category: SpeciesCategory::Deciduous,
        carbon_sequestration: 15.0,
        biodiversity_value: 3.5,
        resilience_score: 4.0,
        climate_zones: &[ClimateZone::Temperate, ClimateZone::Boreal],
        spacing: SpacingClass::Standard,
    },
    TreeSpecies {
        id: "scots_pine",
        name: "Scots Pine",
        scientific_name: "Pinus sylvestris",
        category: SpeciesCategory::Coniferous,
        carbon_sequestration: 18.0,
        biodiversity_value: 3.0,
        resilience_score: 4.0,
        climate_zones: &[ClimateZone::Temperate, ClimateZone::Boreal],
        spacing: SpacingClass::Standard,
    },
    TreeSpecies {
        id: "norway_spruce",
        name: "Norway Spruce",
        scientific_name: "Picea abies",
        category: SpeciesCategory::Coniferous,
        carbon_sequestration: 19.0,
        biodiversity_value: 2.5,
        resilience_score: 3.0,
        climate_zones: &[ClimateZone::Temperate, ClimateZone::Boreal],
        spacing: SpacingClass::Dense,
    },
    TreeSpecies {
        id: "siberian_larch",
        name: "Siberian Larch",
        scientific_name: "Larix sibirica",
        category: SpeciesCategory::Boreal,
        carbon_sequestration: 13.0,
        biodiversity_value: 2.5,
        resilience_score: 4.5,
        climate_zones: &[ClimateZone::Boreal],
        spacing: SpacingClass::Standard,
    },
    TreeSpecies {
        id: "mahogany",
        name: "Big-leaf Mahogany",
        scientific_name: "Swietenia macrophylla",
        category: SpeciesCategory::Tropical,
        carbon_sequestration: 35.0,
        biodiversity_value: 4.5,
        resilience_score: 3.0,
        climate_zones: &[ClimateZone::Tropical],
        spacing: SpacingClass::Wide,
    },
    TreeSpecies {
        id: "teak",
        name: "Teak",
        scientific_name: "Tectona grandis",
        category: SpeciesCategory::Tropical,
        carbon_sequestration: 30.0,
        biodiversity_value: 3.0,
        resilience_score: 3.5,
        climate_zones: &[ClimateZone::Tropical, ClimateZone::Subtropical],
        spacing: SpacingClass::Open,
    },
    TreeSpecies {
        id: "cork_oak",
        name: "Cork Oak",
        scientific_name: "Quercus suber",
        category: SpeciesCategory::Mediterranean,
        carbon_sequestration: 14.0,
        biodiversity_value: 4.0,
        resilience_score: 4.5,
        climate_zones: &[ClimateZone::Mediterranean],
        spacing: SpacingClass::Wide,
    },
    TreeSpecies {
        id: "olive",
        name: "Olive",
        scientific_name: "Olea europaea",
        category: SpeciesCategory::Mediterranean,
        carbon_sequestration: 11.0,
        biodiversity_value: 3.0,
        resilience_score: 5.0,
        climate_zones: &[ClimateZone::Mediterranean, ClimateZone::Arid],
        spacing: SpacingClass::Wide,
    },
    TreeSpecies {
        id: "acacia",
        name: "Umbrella Thorn Acacia",
        scientific_name: "Vachellia tortilis",
        category: SpeciesCategory::Arid,
        carbon_sequestration: 9.0,
        biodiversity_value: 3.5,
        resilience_score: 5.0,
        climate_zones: &[ClimateZone::Arid],
        spacing: SpacingClass::Wide,
    },
    TreeSpecies {
        id: "camphor",
        name: "Camphor Laurel",
        scientific_name: "Cinnamomum camphora",
        category: SpeciesCategory::Subtropical,
        carbon_sequestration: 24.0,
        biodiversity_value: 3.0,
        resilience_score: 4.0,
        climate_zones: &[ClimateZone::Subtropical],
        spacing: SpacingClass::Open,
    },
];

pub fn catalog() -> &'static [TreeSpecies] {
    CATALOG
}

pub fn find(id: &str) -> Option<&'static TreeSpecies> {
    CATALOG.iter().find(|species| species.id == id)
}

pub fn by_category(category: SpeciesCategory) -> impl Iterator<Item = &'static TreeSpecies> {
    CATALOG
        .iter()
        .filter(move |species| species.category == category)
}

pub fn for_zone(zone: ClimateZone) -> impl Iterator<Item = &'static TreeSpecies> {
    CATALOG
        .iter()
        .filter(move |species| species.climate_zones.contains(&zone))
}

//! Static catalogs: car models, car types, fuel types, engine classes and
//! the narrative tables used to flavour generated records.

use serde::{Deserialize, Serialize};

// ============================================================================
// CAR TYPES
// ============================================================================

/// Body class of a space car. Drives weight ranges and rotational inertia.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CarType {
    Micro,
    Coupe,
    Sedan,
    #[serde(rename = "SUV")]
    Suv,
    Transport,
}

impl CarType {
    pub const ALL: [CarType; 5] = [
        Self::Micro,
        Self::Coupe,
        Self::Sedan,
        Self::Suv,
        Self::Transport,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Micro => "Micro",
            Self::Coupe => "Coupe",
            Self::Sedan => "Sedan",
            Self::Suv => "SUV",
            Self::Transport => "Transport",
        }
    }

    /// Relative moment of inertia used for turn fuel penalties.
    pub fn moment_of_inertia(self) -> f64 {
        match self {
            Self::Micro => 0.8,
            Self::Coupe => 1.0,
            Self::Sedan => 1.2,
            Self::Suv => 1.5,
            Self::Transport => 2.0,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

/// Moment of inertia for a car type by name; unknown types get 1.0.
pub fn moment_of_inertia_for(car_type: &str) -> f64 {
    CarType::from_name(car_type).map_or(1.0, CarType::moment_of_inertia)
}

// ============================================================================
// CAR MODELS
// ============================================================================

/// Production car models available to the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CarModel {
    StratosM2,
    VortexR7,
    NimbusX1,
}

/// Car model metadata.
#[derive(Debug, Clone)]
pub struct CarModelInfo {
    pub name: &'static str,
    pub car_type: CarType,
    pub chassis_weight_kg: u32,
    /// Inclusive engine weight range in kg.
    pub engine_weight_kg: (u32, u32),
    /// Inclusive thruster weight range in kg.
    pub thruster_weight_kg: (u32, u32),
}

impl CarModel {
    pub const ALL: [CarModel; 3] = [Self::StratosM2, Self::VortexR7, Self::NimbusX1];

    pub fn info(self) -> CarModelInfo {
        match self {
            Self::StratosM2 => CarModelInfo {
                name: "Stratos M2",
                car_type: CarType::Sedan,
                chassis_weight_kg: 950,
                engine_weight_kg: (180, 260),
                thruster_weight_kg: (100, 150),
            },
            Self::VortexR7 => CarModelInfo {
                name: "Vortex R7",
                car_type: CarType::Suv,
                chassis_weight_kg: 1250,
                engine_weight_kg: (250, 340),
                thruster_weight_kg: (140, 200),
            },
            Self::NimbusX1 => CarModelInfo {
                name: "Nimbus X1",
                car_type: CarType::Micro,
                chassis_weight_kg: 700,
                engine_weight_kg: (120, 180),
                thruster_weight_kg: (80, 120),
            },
        }
    }
}

// ============================================================================
// FUEL TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuelType {
    IonGel,
    FusionCore,
    PlasmaCell,
}

#[derive(Debug, Clone)]
pub struct FuelTypeInfo {
    pub name: &'static str,
    pub energy_density_mj_per_kg: f64,
    pub mass_density_kg_per_l: f64,
}

impl FuelType {
    pub const ALL: [FuelType; 3] = [Self::IonGel, Self::FusionCore, Self::PlasmaCell];

    pub fn info(self) -> FuelTypeInfo {
        match self {
            Self::IonGel => FuelTypeInfo {
                name: "IonGel",
                energy_density_mj_per_kg: 5.2,
                mass_density_kg_per_l: 1.1,
            },
            Self::FusionCore => FuelTypeInfo {
                name: "FusionCore",
                energy_density_mj_per_kg: 8.4,
                mass_density_kg_per_l: 1.6,
            },
            Self::PlasmaCell => FuelTypeInfo {
                name: "PlasmaCell",
                energy_density_mj_per_kg: 6.7,
                mass_density_kg_per_l: 1.3,
            },
        }
    }
}

// ============================================================================
// ENGINE CLASSES
// ============================================================================

/// Engine class; each has a fuel efficiency multiplier (lower is better).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineClass {
    #[serde(rename = "Ion-A")]
    IonA,
    #[serde(rename = "Ion-B")]
    IonB,
    #[serde(rename = "Fusion-B")]
    FusionB,
    #[serde(rename = "Fusion-C")]
    FusionC,
    #[serde(rename = "Plasma-A")]
    PlasmaA,
}

impl EngineClass {
    pub const ALL: [EngineClass; 5] = [
        Self::IonA,
        Self::IonB,
        Self::FusionB,
        Self::FusionC,
        Self::PlasmaA,
    ];

    /// Classes fitted to generated cars.
    pub const GENERATED: [EngineClass; 3] = [Self::IonA, Self::FusionB, Self::PlasmaA];

    pub fn name(self) -> &'static str {
        match self {
            Self::IonA => "Ion-A",
            Self::IonB => "Ion-B",
            Self::FusionB => "Fusion-B",
            Self::FusionC => "Fusion-C",
            Self::PlasmaA => "Plasma-A",
        }
    }

    pub fn fuel_efficiency(self) -> f64 {
        match self {
            Self::IonA => 0.7,
            Self::IonB => 0.75,
            Self::FusionB => 1.0,
            Self::FusionC => 1.1,
            Self::PlasmaA => 1.3,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

// ============================================================================
// NARRATIVE TABLES
// ============================================================================

pub static STATIONS: &[&str] = &[
    "Lunaris Port",
    "Vega Spire",
    "Orryx Haven",
    "Cryon Reach",
    "Zenthar Relay",
    "Helion Hub",
    "Cerebra Ring",
    "Thalos Crossing",
];

pub static ADMINISTRATORS: &[&str] = &[
    "Dr. Calix Renner",
    "Elia Vorn",
    "Marshal Keir",
    "Tamsin Ryx",
    "Axel Orov",
    "Captain Kael",
    "Zara Strix",
    "Commander Yulo",
];

pub static TELEMETRY_MESSAGES: &[&str] = &[
    "Power levels nominal. Adjusting trajectory.",
    "Fuel low. Navigating around debris.",
    "Re-routing due to unstable path.",
    "Clear path confirmed. Continuing cruise.",
    "Minor vibration detected. Monitoring systems.",
];

pub static COLOR_NAMES: &[&str] = &[
    "AliceBlue",
    "Amethyst",
    "Aquamarine",
    "Azure",
    "Beige",
    "Black",
    "BlueViolet",
    "Brown",
    "CadetBlue",
    "Chartreuse",
    "Coral",
    "Crimson",
    "DarkCyan",
    "DarkOrange",
    "DeepSkyBlue",
    "FireBrick",
    "ForestGreen",
    "Gold",
    "GoldenRod",
    "HotPink",
    "Indigo",
    "Ivory",
    "Khaki",
    "Lavender",
    "LightSlateGray",
    "Magenta",
    "Maroon",
    "MidnightBlue",
    "Navy",
    "Olive",
    "Orchid",
    "PaleTurquoise",
    "Peru",
    "Plum",
    "RebeccaPurple",
    "SaddleBrown",
    "Salmon",
    "SeaGreen",
    "Sienna",
    "Silver",
    "SlateBlue",
    "SteelBlue",
    "Teal",
    "Thistle",
    "Tomato",
    "Turquoise",
    "Violet",
    "White",
    "Yellow",
];

pub const MISSION_TYPE: &str = "commute";
pub const CREW_STATUS: &str = "automated";
pub const NAVIGATION_MODE: &str = "auto";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moment_of_inertia_by_type() {
        assert_eq!(moment_of_inertia_for("Micro"), 0.8);
        assert_eq!(moment_of_inertia_for("SUV"), 1.5);
        assert_eq!(moment_of_inertia_for("Transport"), 2.0);
        assert_eq!(moment_of_inertia_for("Hovercraft"), 1.0);
    }

    #[test]
    fn test_car_models_match_types() {
        assert_eq!(CarModel::StratosM2.info().car_type, CarType::Sedan);
        assert_eq!(CarModel::VortexR7.info().car_type, CarType::Suv);
        assert_eq!(CarModel::NimbusX1.info().chassis_weight_kg, 700);
    }

    #[test]
    fn test_weight_ranges_are_ordered() {
        for model in CarModel::ALL {
            let info = model.info();
            assert!(info.engine_weight_kg.0 <= info.engine_weight_kg.1);
            assert!(info.thruster_weight_kg.0 <= info.thruster_weight_kg.1);
        }
    }

    #[test]
    fn test_engine_class_names_roundtrip() {
        for class in EngineClass::ALL {
            assert_eq!(EngineClass::from_name(class.name()), Some(class));
        }
        assert_eq!(EngineClass::from_name("Warp-Z"), None);
    }

    #[test]
    fn test_stations_are_distinct() {
        let mut names: Vec<_> = STATIONS.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), STATIONS.len());
    }
}

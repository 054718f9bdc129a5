use crate::error::LoadError;
use crate::fixed::Fixed;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Reserves below this while shrinking raise a "reserves low" warning.
    pub low_reserve_threshold: Fixed,

    /// Steering bonus for nations that do not supply their own.
    pub default_steering_bonus: Fixed,

    /// Production and consumption coefficients.
    pub economy: EconomyConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            low_reserve_threshold: Fixed::from_int(20),
            default_steering_bonus: Fixed::ZERO,
            economy: EconomyConfig::default(),
        }
    }
}

impl SimConfig {
    /// Reads a JSON config. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: display.clone(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| LoadError::Json {
            path: display,
            source,
        })
    }
}

/// Configuration for the resource ledger.
/// Externalized constants that can be adjusted without recompiling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    // Treasury
    pub treasury_per_economy: Fixed,
    pub treasury_per_territory: Fixed,
    pub army_upkeep: Fixed,
    pub court_upkeep: Fixed,

    // Manpower
    pub manpower_per_territory: Fixed,
    /// Each point of stability scales manpower recovery by this fraction.
    pub stability_manpower_factor: Fixed,
    pub army_manpower_reinforce: Fixed,

    // Food
    pub food_per_territory: Fixed,
    pub food_per_territory_pop: Fixed,
    pub army_food: Fixed,

    // Iron
    pub iron_per_territory: Fixed,
    pub army_iron: Fixed,

    // Coal
    pub coal_per_territory: Fixed,
    pub coal_per_innovation: Fixed,

    // Textiles
    pub textiles_per_economy: Fixed,
    pub court_textiles: Fixed,

    // Luxuries
    pub luxuries_per_economy: Fixed,
    pub court_luxuries: Fixed,
    pub luxuries_per_prestige: Fixed,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            treasury_per_economy: Fixed::from_int(2),
            treasury_per_territory: Fixed::HALF,
            army_upkeep: Fixed::from_f32(0.2),
            court_upkeep: Fixed::from_int(1),

            manpower_per_territory: Fixed::from_int(2),
            stability_manpower_factor: Fixed::from_f32(0.1),
            army_manpower_reinforce: Fixed::from_f32(0.5),

            food_per_territory: Fixed::from_int(3),
            food_per_territory_pop: Fixed::from_int(2),
            army_food: Fixed::from_f32(0.5),

            iron_per_territory: Fixed::from_f32(0.5),
            army_iron: Fixed::from_f32(0.1),

            coal_per_territory: Fixed::from_f32(0.3),
            coal_per_innovation: Fixed::from_f32(0.5),

            textiles_per_economy: Fixed::ONE,
            court_textiles: Fixed::HALF,

            luxuries_per_economy: Fixed::HALF,
            court_luxuries: Fixed::HALF,
            luxuries_per_prestige: Fixed::from_f32(0.05),
        }
    }
}

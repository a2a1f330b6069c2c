//! Commodities, quality tiers and the fixed base-yield table.
//!
//! The base yields come from observed game data for a single worker at eco
//! skill zero. They are a game constant, not something the engine derives.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::bonus::BonusType;

/// The two building categories that host production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingType {
    /// Hosts raw-material production.
    ProductionField,
    /// Hosts finished-product production.
    IndustrialZone,
}

impl fmt::Display for BuildingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProductionField => write!(f, "Production Field"),
            Self::IndustrialZone => write!(f, "Industrial Zone"),
        }
    }
}

/// Discrete quality levels Q1-Q5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QualityTier {
    Q1,
    Q2,
    Q3,
    Q4,
    Q5,
}

impl QualityTier {
    pub const ALL: [QualityTier; 5] = [Self::Q1, Self::Q2, Self::Q3, Self::Q4, Self::Q5];

    /// Map a company tier (1-5) onto a quality tier. Out-of-range tiers fall
    /// back to Q5, matching the game's behavior for max-tier companies.
    pub fn from_company_tier(tier: i64) -> Self {
        match tier {
            1 => Self::Q1,
            2 => Self::Q2,
            3 => Self::Q3,
            4 => Self::Q4,
            _ => Self::Q5,
        }
    }

    pub fn level(&self) -> u32 {
        match self {
            Self::Q1 => 1,
            Self::Q2 => 2,
            Self::Q3 => 3,
            Self::Q4 => 4,
            Self::Q5 => 5,
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.level())
    }
}

/// Every producible commodity the engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Commodity {
    Grain,
    Iron,
    Titanium,
    Fuel,
    Food,
    Weapon,
    Aircraft,
    AirplaneTicket,
}

impl Commodity {
    pub const ALL: [Commodity; 8] = [
        Self::Grain,
        Self::Iron,
        Self::Titanium,
        Self::Fuel,
        Self::Food,
        Self::Weapon,
        Self::Aircraft,
        Self::AirplaneTicket,
    ];

    /// Parse a commodity from its API name. Returns `None` for unknown
    /// commodities; callers skip those rather than failing the batch.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "grain" => Some(Self::Grain),
            "iron" => Some(Self::Iron),
            "titanium" => Some(Self::Titanium),
            "fuel" | "oil" => Some(Self::Fuel),
            "food" => Some(Self::Food),
            "weapon" => Some(Self::Weapon),
            "aircraft" | "air-weapon" => Some(Self::Aircraft),
            "airplane ticket" | "ticket" => Some(Self::AirplaneTicket),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Grain => "grain",
            Self::Iron => "iron",
            Self::Titanium => "titanium",
            Self::Fuel => "fuel",
            Self::Food => "food",
            Self::Weapon => "weapon",
            Self::Aircraft => "aircraft",
            Self::AirplaneTicket => "airplane ticket",
        }
    }

    /// Which building category hosts production of this commodity.
    pub fn building_type(&self) -> BuildingType {
        match self {
            Self::Grain | Self::Iron | Self::Titanium | Self::Fuel => BuildingType::ProductionField,
            _ => BuildingType::IndustrialZone,
        }
    }

    /// Base yield per tier for a single worker at eco skill zero.
    ///
    /// Raw materials share one table; products each have their own. Note the
    /// tables run in opposite directions: raw yields rise with tier while
    /// product yields fall.
    pub fn base_yield(&self, tier: QualityTier) -> i64 {
        use QualityTier::*;
        match self {
            Self::Grain | Self::Iron | Self::Titanium | Self::Fuel => match tier {
                Q1 => 19,
                Q2 => 29,
                Q3 => 58,
                Q4 => 78,
                Q5 => 97,
            },
            Self::Food => match tier {
                Q1 => 60,
                Q2 => 49,
                Q3 => 38,
                Q4 => 27,
                Q5 => 16,
            },
            Self::Weapon => match tier {
                Q1 => 197,
                Q2 => 143,
                Q3 => 105,
                Q4 => 77,
                Q5 => 56,
            },
            Self::Aircraft => match tier {
                Q1 => 90,
                Q2 => 65,
                Q3 => 47,
                Q4 => 34,
                Q5 => 25,
            },
            Self::AirplaneTicket => match tier {
                Q1 => 40,
                Q2 => 29,
                Q3 => 21,
                Q4 => 15,
                Q5 => 11,
            },
        }
    }

    /// Ordered list of bonus types this commodity accepts. Resolution takes
    /// the first type present in a region, not a sum across types.
    pub fn accepted_bonus_types(&self) -> &'static [BonusType] {
        use BonusType::*;
        match self {
            Self::Grain => &[Grain, Food, General],
            Self::Iron => &[Iron, Weapons, Aircraft, General],
            Self::Titanium => &[Titanium, Aircraft, General],
            Self::Fuel => &[Oil, Aircraft, General],
            Self::Food => &[Food, Grain, General],
            Self::Weapon => &[Weapons, Iron, General],
            Self::Aircraft => &[Aircraft, Titanium, Iron, General],
            Self::AirplaneTicket => &[Tickets, Aircraft, General],
        }
    }
}

impl fmt::Display for Commodity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_accepts_aliases() {
        assert_eq!(Commodity::from_name("oil"), Some(Commodity::Fuel));
        assert_eq!(Commodity::from_name("air-weapon"), Some(Commodity::Aircraft));
        assert_eq!(
            Commodity::from_name("Airplane Ticket"),
            Some(Commodity::AirplaneTicket)
        );
    }

    #[test]
    fn from_name_rejects_unknown() {
        assert_eq!(Commodity::from_name("moon rocks"), None);
    }

    #[test]
    fn raw_materials_use_production_fields() {
        assert_eq!(
            Commodity::Titanium.building_type(),
            BuildingType::ProductionField
        );
        assert_eq!(
            Commodity::Weapon.building_type(),
            BuildingType::IndustrialZone
        );
    }

    #[test]
    fn company_tier_maps_to_quality_with_q5_fallback() {
        assert_eq!(QualityTier::from_company_tier(1), QualityTier::Q1);
        assert_eq!(QualityTier::from_company_tier(3), QualityTier::Q3);
        assert_eq!(QualityTier::from_company_tier(9), QualityTier::Q5);
        assert_eq!(QualityTier::from_company_tier(0), QualityTier::Q5);
    }

    #[test]
    fn base_yield_matches_game_table() {
        assert_eq!(Commodity::Grain.base_yield(QualityTier::Q1), 19);
        assert_eq!(Commodity::Grain.base_yield(QualityTier::Q5), 97);
        assert_eq!(Commodity::Weapon.base_yield(QualityTier::Q1), 197);
        assert_eq!(Commodity::Food.base_yield(QualityTier::Q5), 16);
    }

    #[test]
    fn accepted_bonus_types_start_with_own_type() {
        assert_eq!(
            Commodity::Aircraft.accepted_bonus_types()[0],
            BonusType::Aircraft
        );
        assert_eq!(
            Commodity::Aircraft.accepted_bonus_types()[1],
            BonusType::Titanium
        );
    }
}

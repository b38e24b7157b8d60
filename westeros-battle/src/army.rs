//! Per-battle army input and its validation boundary.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{DEFAULT_COMMANDER, NEUTRAL_RATIO};
use crate::error::{ArmyViolation, BattleError};
use crate::faction::{FactionId, FactionTraits};
use crate::numbers::i64_to_f64;
use crate::terrain::Terrain;

/// Unit categories fielded by every army.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    Infantry,
    Cavalry,
    Archers,
}

impl UnitType {
    pub const ALL: [Self; 3] = [Self::Infantry, Self::Cavalry, Self::Archers];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Infantry => "infantry",
            Self::Cavalry => "cavalry",
            Self::Archers => "archers",
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One participant in a battle, as supplied by the caller.
///
/// Counts are signed so that malformed caller input survives until
/// [`Army::validate`] rejects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Army {
    pub faction: FactionId,
    pub infantry: i64,
    pub cavalry: i64,
    pub archers: i64,
    pub commander: String,
    #[serde(default)]
    pub terrain: Terrain,
    pub morale: f64,
    pub discipline: f64,
    pub equipment: f64,
}

impl Army {
    /// Army with neutral 0.5 ratios on open ground.
    #[must_use]
    pub fn new(faction: impl Into<FactionId>, infantry: i64, cavalry: i64, archers: i64) -> Self {
        Self {
            faction: faction.into(),
            infantry,
            cavalry,
            archers,
            commander: DEFAULT_COMMANDER.to_string(),
            terrain: Terrain::default(),
            morale: NEUTRAL_RATIO,
            discipline: NEUTRAL_RATIO,
            equipment: NEUTRAL_RATIO,
        }
    }

    /// Army whose runtime ratios start at the faction baseline.
    #[must_use]
    pub fn from_baseline(
        faction: impl Into<FactionId>,
        traits: &FactionTraits,
        infantry: i64,
        cavalry: i64,
        archers: i64,
    ) -> Self {
        Self::new(faction, infantry, cavalry, archers).with_ratios(
            traits.morale,
            traits.discipline,
            traits.equipment,
        )
    }

    #[must_use]
    pub fn with_commander(mut self, commander: impl Into<String>) -> Self {
        self.commander = commander.into();
        self
    }

    #[must_use]
    pub fn with_terrain(mut self, terrain: Terrain) -> Self {
        self.terrain = terrain;
        self
    }

    #[must_use]
    pub fn with_ratios(mut self, morale: f64, discipline: f64, equipment: f64) -> Self {
        self.morale = morale;
        self.discipline = discipline;
        self.equipment = equipment;
        self
    }

    #[must_use]
    pub const fn count(&self, unit: UnitType) -> i64 {
        match unit {
            UnitType::Infantry => self.infantry,
            UnitType::Cavalry => self.cavalry,
            UnitType::Archers => self.archers,
        }
    }

    #[must_use]
    pub const fn total_troops(&self) -> i64 {
        self.infantry
            .saturating_add(self.cavalry)
            .saturating_add(self.archers)
    }

    /// Share of the army fielded as cavalry, 0 for an empty army.
    #[must_use]
    pub fn cavalry_ratio(&self) -> f64 {
        self.share_of(self.cavalry)
    }

    /// Share of the army fielded as archers, 0 for an empty army.
    #[must_use]
    pub fn archer_ratio(&self) -> f64 {
        self.share_of(self.archers)
    }

    fn share_of(&self, count: i64) -> f64 {
        let total = self.total_troops();
        if total <= 0 {
            return 0.0;
        }
        i64_to_f64(count) / i64_to_f64(total)
    }

    /// Check the per-army invariants required before strength computation.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::InvalidArmy`] when the troop total is not
    /// positive or overflows `i64`, a unit count is negative, or a ratio
    /// lies outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), BattleError> {
        self.check().map_err(|violation| BattleError::InvalidArmy {
            faction: self.faction.clone(),
            violation,
        })
    }

    fn check(&self) -> Result<(), ArmyViolation> {
        let total = self.total_troops();
        if total <= 0 {
            return Err(ArmyViolation::NoTroops { total });
        }
        for unit in UnitType::ALL {
            let count = self.count(unit);
            if count < 0 {
                return Err(ArmyViolation::NegativeUnitCount { unit, count });
            }
        }
        if self
            .infantry
            .checked_add(self.cavalry)
            .and_then(|sum| sum.checked_add(self.archers))
            .is_none()
        {
            return Err(ArmyViolation::TroopOverflow {
                infantry: self.infantry,
                cavalry: self.cavalry,
                archers: self.archers,
            });
        }
        for (field, value) in [
            ("morale", self.morale),
            ("discipline", self.discipline),
            ("equipment", self.equipment),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ArmyViolation::RatioOutOfRange { field, value });
            }
        }
        Ok(())
    }
}

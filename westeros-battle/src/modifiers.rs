//! Named modifier stack applied on top of an army's base strength.
use serde::{Deserialize, Serialize};

use crate::army::Army;
use crate::config::{BattleConfig, ModifierCfg, TacticalCfg};
use crate::faction::FactionTraits;
use crate::registry::TraitRegistry;
use crate::terrain::Terrain;

/// Additive contributions to an army's strength multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct BattleModifiers {
    pub terrain_advantage: f64,
    pub commander_bonus: f64,
    pub morale_bonus: f64,
    pub equipment_bonus: f64,
    pub tactical_advantage: f64,
}

impl BattleModifiers {
    /// All-zero stack used when a faction has no registry entry.
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            terrain_advantage: 0.0,
            commander_bonus: 0.0,
            morale_bonus: 0.0,
            equipment_bonus: 0.0,
            tactical_advantage: 0.0,
        }
    }

    #[must_use]
    pub fn sum(&self) -> f64 {
        self.terrain_advantage
            + self.commander_bonus
            + self.morale_bonus
            + self.equipment_bonus
            + self.tactical_advantage
    }

    /// `1 + Σ modifiers`.
    #[must_use]
    pub fn total_multiplier(&self) -> f64 {
        1.0 + self.sum()
    }
}

/// Build the modifier stack for `army` fighting `opponent` on `terrain`.
///
/// Factions missing from the registry get [`BattleModifiers::neutral`],
/// including a zero tactical term.
#[must_use]
pub fn compute_modifiers(
    army: &Army,
    terrain: Terrain,
    opponent: &Army,
    registry: &TraitRegistry,
    cfg: &BattleConfig,
) -> BattleModifiers {
    let Some(traits) = registry.lookup(&army.faction) else {
        log::warn!("faction traits not found for {}", army.faction);
        return BattleModifiers::neutral();
    };

    BattleModifiers {
        terrain_advantage: terrain_advantage(traits, terrain),
        commander_bonus: traits.commander_bonus,
        morale_bonus: morale_bonus(army.morale, &cfg.modifiers),
        equipment_bonus: equipment_bonus(army.equipment, &cfg.modifiers),
        tactical_advantage: tactical_advantage(army, opponent, terrain, &cfg.tactical),
    }
}

fn terrain_advantage(traits: &FactionTraits, terrain: Terrain) -> f64 {
    traits.terrain_bonus(terrain)
}

fn morale_bonus(morale: f64, cfg: &ModifierCfg) -> f64 {
    (morale - cfg.morale_baseline) * cfg.morale_multiplier
}

fn equipment_bonus(equipment: f64, cfg: &ModifierCfg) -> f64 {
    (equipment - cfg.equipment_baseline) * cfg.equipment_multiplier
}

/// Composition-based bonus from comparing troop ratios with the opponent.
#[must_use]
pub fn tactical_advantage(
    army: &Army,
    opponent: &Army,
    terrain: Terrain,
    cfg: &TacticalCfg,
) -> f64 {
    if army.total_troops() <= 0 || opponent.total_troops() <= 0 {
        return 0.0;
    }

    let mut advantage = 0.0;
    if terrain == cfg.open_field
        && army.cavalry_ratio() > opponent.cavalry_ratio() + cfg.cavalry_threshold
    {
        advantage += cfg.cavalry_bonus;
    }
    if army.archer_ratio() > opponent.archer_ratio() + cfg.archer_threshold {
        advantage += cfg.archer_bonus;
    }
    advantage
}

//! Effective strength: weighted troop sum scaled by the modifier stack.
use serde::{Deserialize, Serialize};

use crate::army::Army;
use crate::casualties::CasualtyBreakdown;
use crate::config::{BattleConfig, UnitWeights};
use crate::modifiers::{BattleModifiers, compute_modifiers};
use crate::numbers::i64_to_f64;
use crate::registry::TraitRegistry;
use crate::terrain::Terrain;

/// Derived per-army state for a single battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmyStrengthData {
    pub army: Army,
    pub strength: f64,
    pub modifiers: BattleModifiers,
    pub casualties: CasualtyBreakdown,
}

/// Weighted troop sum before modifiers.
#[must_use]
pub fn base_strength(army: &Army, weights: &UnitWeights) -> f64 {
    i64_to_f64(army.infantry) * weights.infantry
        + i64_to_f64(army.cavalry) * weights.cavalry
        + i64_to_f64(army.archers) * weights.archers
}

/// Compute strength for an already validated army.
///
/// A modifier stack summing below -1 floors the strength at zero.
#[must_use]
pub fn compute_strength(
    army: &Army,
    terrain: Terrain,
    opponent: &Army,
    registry: &TraitRegistry,
    cfg: &BattleConfig,
) -> ArmyStrengthData {
    let modifiers = compute_modifiers(army, terrain, opponent, registry, cfg);
    let base = base_strength(army, &cfg.weights);
    let strength = (base * modifiers.total_multiplier()).max(0.0);
    log::debug!(
        "{} strength {strength:.1} (base {base:.1} x {:.3})",
        army.faction,
        modifiers.total_multiplier()
    );

    ArmyStrengthData {
        army: army.clone(),
        strength,
        modifiers,
        casualties: CasualtyBreakdown::default(),
    }
}

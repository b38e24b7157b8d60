//! Side-by-side comparison of two armies before battle.
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::army::{Army, UnitType};
use crate::config::BattleConfig;
use crate::numbers::i64_to_f64;
use crate::registry::TraitRegistry;
use crate::strength::{base_strength, compute_strength};
use crate::terrain::Terrain;

/// Outcome of comparing one statistic, from the left army's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advantage {
    Advantage,
    Disadvantage,
    Equal,
}

impl Advantage {
    /// Compare `left` against `right`. Unordered values (NaN) are equal.
    #[must_use]
    pub fn between(left: f64, right: f64) -> Self {
        match left.partial_cmp(&right) {
            Some(Ordering::Greater) => Self::Advantage,
            Some(Ordering::Less) => Self::Disadvantage,
            Some(Ordering::Equal) | None => Self::Equal,
        }
    }

    /// The same comparison seen from the other side.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Advantage => Self::Disadvantage,
            Self::Disadvantage => Self::Advantage,
            Self::Equal => Self::Equal,
        }
    }
}

impl fmt::Display for Advantage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Advantage => "advantage",
            Self::Disadvantage => "disadvantage",
            Self::Equal => "equal",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatComparison {
    pub label: &'static str,
    pub left: f64,
    pub right: f64,
    pub advantage: Advantage,
}

impl StatComparison {
    fn new(label: &'static str, left: f64, right: f64) -> Self {
        Self {
            label,
            left,
            right,
            advantage: Advantage::between(left, right),
        }
    }
}

/// Which side is expected to prevail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Favourite {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArmyComparison {
    pub terrain: Terrain,
    pub rows: Vec<StatComparison>,
    pub favourite: Favourite,
}

impl ArmyComparison {
    #[must_use]
    pub fn row(&self, label: &str) -> Option<&StatComparison> {
        self.rows.iter().find(|row| row.label == label)
    }

    /// Number of rows where the left army is ahead.
    #[must_use]
    pub fn left_advantages(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.advantage == Advantage::Advantage)
            .count()
    }
}

/// Compare two armies stat by stat, each paired against the other.
///
/// The favourite is the side with the higher effective strength; the left
/// army is favoured on a tie.
#[must_use]
pub fn compare_armies(
    left: &Army,
    right: &Army,
    terrain: Terrain,
    registry: &TraitRegistry,
    cfg: &BattleConfig,
) -> ArmyComparison {
    let left_eff = compute_strength(left, terrain, right, registry, cfg).strength;
    let right_eff = compute_strength(right, terrain, left, registry, cfg).strength;

    let mut rows = vec![StatComparison::new(
        "Total Forces",
        i64_to_f64(left.total_troops()),
        i64_to_f64(right.total_troops()),
    )];
    for (label, unit) in [
        ("Infantry", UnitType::Infantry),
        ("Cavalry", UnitType::Cavalry),
        ("Archers", UnitType::Archers),
    ] {
        rows.push(StatComparison::new(
            label,
            i64_to_f64(left.count(unit)),
            i64_to_f64(right.count(unit)),
        ));
    }
    rows.extend([
        StatComparison::new("Discipline", left.discipline, right.discipline),
        StatComparison::new("Morale", left.morale, right.morale),
        StatComparison::new("Equipment", left.equipment, right.equipment),
        StatComparison::new(
            "Base Strength",
            base_strength(left, &cfg.weights),
            base_strength(right, &cfg.weights),
        ),
        StatComparison::new("Effective Strength", left_eff, right_eff),
    ]);

    let favourite = if right_eff > left_eff {
        Favourite::Right
    } else {
        Favourite::Left
    };

    ArmyComparison {
        terrain,
        rows,
        favourite,
    }
}

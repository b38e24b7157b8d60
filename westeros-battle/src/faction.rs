//! Faction identifiers and their baseline military traits.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::terrain::Terrain;

/// Key into the trait registry. Unregistered identifiers are legal and
/// resolve to neutral modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactionId(String);

impl FactionId {
    pub const STARK: &'static str = "House Stark";
    pub const LANNISTER: &'static str = "House Lannister";
    pub const TYRELL: &'static str = "House Tyrell";
    pub const BARATHEON: &'static str = "House Baratheon";
    pub const MARTELL: &'static str = "House Martell";
    pub const ARRYN: &'static str = "House Arryn";

    /// The six Great Houses in their canonical display order.
    pub const GREAT_HOUSES: [&'static str; 6] = [
        Self::STARK,
        Self::LANNISTER,
        Self::TYRELL,
        Self::BARATHEON,
        Self::MARTELL,
        Self::ARRYN,
    ];

    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FactionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for FactionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Baseline military characteristics of a faction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactionTraits {
    pub specialty: String,
    pub discipline: f64,
    pub morale: f64,
    pub equipment: f64,
    /// Bonus ratio per terrain; unlisted terrain contributes nothing.
    #[serde(default)]
    pub terrain_bonuses: BTreeMap<Terrain, f64>,
    pub commander_bonus: f64,
    pub description: String,
}

impl FactionTraits {
    #[must_use]
    pub fn terrain_bonus(&self, terrain: Terrain) -> f64 {
        self.terrain_bonuses.get(&terrain).copied().unwrap_or(0.0)
    }
}

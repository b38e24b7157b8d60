//! Immutable faction trait registry.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::faction::{FactionId, FactionTraits};

const DEFAULT_HOUSE_DATA: &str = include_str!("../assets/data/houses.json");

/// Lookup table from faction identifier to baseline traits.
///
/// Built once and never mutated; share it by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct TraitRegistry {
    factions: HashMap<FactionId, FactionTraits>,
}

impl TraitRegistry {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a registry from explicit entries. Later duplicates replace earlier ones.
    #[must_use]
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (FactionId, FactionTraits)>,
    {
        Self {
            factions: entries.into_iter().collect(),
        }
    }

    /// Load a registry from a JSON object keyed by faction identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into faction traits.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse the embedded Great House table.
    #[must_use]
    pub fn load_from_static() -> Self {
        Self::from_json(DEFAULT_HOUSE_DATA).unwrap_or_default()
    }

    /// Process-wide copy of the embedded table.
    #[must_use]
    pub fn default_registry() -> &'static Self {
        static REGISTRY: OnceLock<TraitRegistry> = OnceLock::new();
        REGISTRY.get_or_init(Self::load_from_static)
    }

    #[must_use]
    pub fn lookup(&self, faction: &FactionId) -> Option<&FactionTraits> {
        self.factions.get(faction)
    }

    #[must_use]
    pub fn contains(&self, faction: &FactionId) -> bool {
        self.factions.contains_key(faction)
    }

    /// Registered identifiers in sorted order.
    #[must_use]
    pub fn faction_ids(&self) -> Vec<&FactionId> {
        let mut ids: Vec<&FactionId> = self.factions.keys().collect();
        ids.sort();
        ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.factions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factions.is_empty()
    }
}

/// Platform-specific source of faction traits.
pub trait RegistryLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the trait registry from the platform-specific source.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry cannot be loaded or parsed.
    fn load_registry(&self) -> Result<TraitRegistry, Self::Error>;
}

/// Loader backed by the table compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticRegistryLoader;

impl RegistryLoader for StaticRegistryLoader {
    type Error = serde_json::Error;

    fn load_registry(&self) -> Result<TraitRegistry, Self::Error> {
        TraitRegistry::from_json(DEFAULT_HOUSE_DATA)
    }
}

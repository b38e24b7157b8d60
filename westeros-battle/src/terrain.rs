//! Battlefield terrain tags.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of battlefield types that feed the modifier stack.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Terrain {
    #[default]
    Plains,
    Mountains,
    Forest,
    Desert,
    Riverlands,
}

impl Terrain {
    pub const ALL: [Self; 5] = [
        Self::Plains,
        Self::Mountains,
        Self::Forest,
        Self::Desert,
        Self::Riverlands,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plains => "plains",
            Self::Mountains => "mountains",
            Self::Forest => "forest",
            Self::Desert => "desert",
            Self::Riverlands => "riverlands",
        }
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Terrain {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plains" => Ok(Self::Plains),
            "mountains" => Ok(Self::Mountains),
            "forest" => Ok(Self::Forest),
            "desert" => Ok(Self::Desert),
            "riverlands" => Ok(Self::Riverlands),
            _ => Err(()),
        }
    }
}

impl From<Terrain> for String {
    fn from(value: Terrain) -> Self {
        value.as_str().to_string()
    }
}

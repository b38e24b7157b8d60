//! Westeros Battle Engine
//!
//! Platform-agnostic battle resolution for the Seven Kingdoms: army strength,
//! modifier stacking, casualties and the phase narrative.
//! This crate has no UI or platform-specific dependencies.

pub mod army;
pub mod casualties;
pub mod comparison;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod faction;
pub mod modifiers;
pub mod narrative;
pub mod numbers;
pub mod registry;
pub mod rng;
pub mod strength;
pub mod terrain;

// Re-export commonly used types
pub use army::{Army, UnitType};
pub use casualties::{CasualtyBreakdown, calculate_battle_casualties};
pub use comparison::{Advantage, ArmyComparison, Favourite, StatComparison, compare_armies};
pub use config::{
    BattleConfig, BattleConfigError, BattleLimits, CasualtyCfg, ModifierCfg, RateRange,
    TacticalCfg, UnitWeights,
};
pub use engine::{BattleEngine, BattleResult, resolve_battle, select_winner};
pub use error::{ArmyViolation, BattleError};
pub use faction::{FactionId, FactionTraits};
pub use modifiers::{BattleModifiers, compute_modifiers};
pub use narrative::{BattlePhase, KeyMoments, Narrative, generate_narrative, tactical_analysis};
pub use registry::{RegistryLoader, StaticRegistryLoader, TraitRegistry};
pub use rng::{BattleRng, CountingRng};
pub use strength::{ArmyStrengthData, compute_strength};
pub use terrain::Terrain;

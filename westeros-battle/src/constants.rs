//! Centralized balance and tuning constants for battle resolution.
//!
//! These values define the deterministic math for the engine. Keeping them
//! together ensures that balance can only be adjusted through reviewed code
//! changes or an explicit [`crate::BattleConfig`] override.

// Unit effectiveness -------------------------------------------------------
pub const INFANTRY_EFFECTIVENESS: f64 = 1.0;
pub const CAVALRY_EFFECTIVENESS: f64 = 1.5;
pub const ARCHER_EFFECTIVENESS: f64 = 0.8;

// Modifier stack -----------------------------------------------------------
pub const MORALE_BASELINE: f64 = 0.5;
pub const MORALE_IMPACT_MULTIPLIER: f64 = 0.3;
pub const EQUIPMENT_BASELINE: f64 = 0.5;
pub const EQUIPMENT_IMPACT_MULTIPLIER: f64 = 0.2;

// Tactical composition -----------------------------------------------------
pub const CAVALRY_ADVANTAGE_THRESHOLD: f64 = 0.1;
pub const ARCHER_ADVANTAGE_THRESHOLD: f64 = 0.05;
pub const CAVALRY_OPEN_FIELD_BONUS: f64 = 0.15;
pub const ARCHER_SUPERIORITY_BONUS: f64 = 0.10;

// Casualties ---------------------------------------------------------------
pub const WINNER_CASUALTY_MIN: f64 = 0.15;
pub const WINNER_CASUALTY_MAX: f64 = 0.25;
pub const LOSER_CASUALTY_MIN: f64 = 0.35;
pub const LOSER_CASUALTY_MAX: f64 = 0.55;

// Battle shape -------------------------------------------------------------
pub const MIN_ARMIES_PER_BATTLE: usize = 2;
pub const MAX_ARMIES_PER_BATTLE: usize = 6;
pub const BATTLE_DURATION_MIN_HOURS: u32 = 2;
pub const BATTLE_DURATION_MAX_HOURS: u32 = 8;

// Army defaults ------------------------------------------------------------
pub(crate) const NEUTRAL_RATIO: f64 = 0.5;
pub(crate) const DEFAULT_COMMANDER: &str = "Unknown Commander";

// RNG stream domains -------------------------------------------------------
pub(crate) const RNG_DOMAIN_CASUALTY: &[u8] = b"casualty";
pub(crate) const RNG_DOMAIN_DURATION: &[u8] = b"duration";

// Narrative ----------------------------------------------------------------
pub(crate) const FALLBACK_TACTICAL_ANALYSIS: &str =
    "Victory achieved through superior tactics and battlefield coordination.";

//! Tunable battle configuration with defaults drawn from [`crate::constants`].
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants;
use crate::terrain::Terrain;

/// Errors raised when battle configuration invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum BattleConfigError {
    #[error("{field} must be at least {min:.2} (got {value:.2})")]
    MinViolation {
        field: &'static str,
        min: f64,
        value: f64,
    },
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("{field} minimum {min} exceeds maximum {max}")]
    Inverted {
        field: &'static str,
        min: f64,
        max: f64,
    },
}

/// Combat weight per unit type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitWeights {
    #[serde(default = "UnitWeights::default_infantry")]
    pub infantry: f64,
    #[serde(default = "UnitWeights::default_cavalry")]
    pub cavalry: f64,
    #[serde(default = "UnitWeights::default_archers")]
    pub archers: f64,
}

impl UnitWeights {
    const fn default_infantry() -> f64 {
        constants::INFANTRY_EFFECTIVENESS
    }

    const fn default_cavalry() -> f64 {
        constants::CAVALRY_EFFECTIVENESS
    }

    const fn default_archers() -> f64 {
        constants::ARCHER_EFFECTIVENESS
    }
}

impl Default for UnitWeights {
    fn default() -> Self {
        Self {
            infantry: Self::default_infantry(),
            cavalry: Self::default_cavalry(),
            archers: Self::default_archers(),
        }
    }
}

/// Centering and scale for the morale and equipment contributions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModifierCfg {
    #[serde(default = "ModifierCfg::default_morale_baseline")]
    pub morale_baseline: f64,
    #[serde(default = "ModifierCfg::default_morale_multiplier")]
    pub morale_multiplier: f64,
    #[serde(default = "ModifierCfg::default_equipment_baseline")]
    pub equipment_baseline: f64,
    #[serde(default = "ModifierCfg::default_equipment_multiplier")]
    pub equipment_multiplier: f64,
}

impl ModifierCfg {
    const fn default_morale_baseline() -> f64 {
        constants::MORALE_BASELINE
    }

    const fn default_morale_multiplier() -> f64 {
        constants::MORALE_IMPACT_MULTIPLIER
    }

    const fn default_equipment_baseline() -> f64 {
        constants::EQUIPMENT_BASELINE
    }

    const fn default_equipment_multiplier() -> f64 {
        constants::EQUIPMENT_IMPACT_MULTIPLIER
    }
}

impl Default for ModifierCfg {
    fn default() -> Self {
        Self {
            morale_baseline: Self::default_morale_baseline(),
            morale_multiplier: Self::default_morale_multiplier(),
            equipment_baseline: Self::default_equipment_baseline(),
            equipment_multiplier: Self::default_equipment_multiplier(),
        }
    }
}

/// Composition thresholds and the bonuses they unlock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TacticalCfg {
    #[serde(default = "TacticalCfg::default_cavalry_threshold")]
    pub cavalry_threshold: f64,
    #[serde(default = "TacticalCfg::default_archer_threshold")]
    pub archer_threshold: f64,
    #[serde(default = "TacticalCfg::default_cavalry_bonus")]
    pub cavalry_bonus: f64,
    #[serde(default = "TacticalCfg::default_archer_bonus")]
    pub archer_bonus: f64,
    /// Terrain on which cavalry superiority pays off.
    #[serde(default)]
    pub open_field: Terrain,
}

impl TacticalCfg {
    const fn default_cavalry_threshold() -> f64 {
        constants::CAVALRY_ADVANTAGE_THRESHOLD
    }

    const fn default_archer_threshold() -> f64 {
        constants::ARCHER_ADVANTAGE_THRESHOLD
    }

    const fn default_cavalry_bonus() -> f64 {
        constants::CAVALRY_OPEN_FIELD_BONUS
    }

    const fn default_archer_bonus() -> f64 {
        constants::ARCHER_SUPERIORITY_BONUS
    }
}

impl Default for TacticalCfg {
    fn default() -> Self {
        Self {
            cavalry_threshold: Self::default_cavalry_threshold(),
            archer_threshold: Self::default_archer_threshold(),
            cavalry_bonus: Self::default_cavalry_bonus(),
            archer_bonus: Self::default_archer_bonus(),
            open_field: Terrain::Plains,
        }
    }
}

/// Inclusive-exclusive casualty rate band `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateRange {
    pub min: f64,
    pub max: f64,
}

impl RateRange {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Map a unit draw `u` in `[0, 1)` onto the band.
    #[must_use]
    pub fn sample(self, unit: f64) -> f64 {
        self.min + unit * (self.max - self.min)
    }

    fn validate(self, field: &'static str) -> Result<(), BattleConfigError> {
        for value in [self.min, self.max] {
            if !(0.0..=1.0).contains(&value) {
                return Err(BattleConfigError::RangeViolation {
                    field,
                    min: 0.0,
                    max: 1.0,
                    value,
                });
            }
        }
        if self.min > self.max {
            return Err(BattleConfigError::Inverted {
                field,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Win/loss dependent casualty bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CasualtyCfg {
    #[serde(default = "CasualtyCfg::default_winner")]
    pub winner: RateRange,
    #[serde(default = "CasualtyCfg::default_loser")]
    pub loser: RateRange,
}

impl CasualtyCfg {
    const fn default_winner() -> RateRange {
        RateRange::new(
            constants::WINNER_CASUALTY_MIN,
            constants::WINNER_CASUALTY_MAX,
        )
    }

    const fn default_loser() -> RateRange {
        RateRange::new(constants::LOSER_CASUALTY_MIN, constants::LOSER_CASUALTY_MAX)
    }

    #[must_use]
    pub const fn band(&self, won: bool) -> RateRange {
        if won { self.winner } else { self.loser }
    }
}

impl Default for CasualtyCfg {
    fn default() -> Self {
        Self {
            winner: Self::default_winner(),
            loser: Self::default_loser(),
        }
    }
}

/// Participant bounds and duration window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleLimits {
    #[serde(default = "BattleLimits::default_min_armies")]
    pub min_armies: usize,
    #[serde(default = "BattleLimits::default_max_armies")]
    pub max_armies: usize,
    #[serde(default = "BattleLimits::default_duration_min_hours")]
    pub duration_min_hours: u32,
    #[serde(default = "BattleLimits::default_duration_max_hours")]
    pub duration_max_hours: u32,
}

impl BattleLimits {
    const fn default_min_armies() -> usize {
        constants::MIN_ARMIES_PER_BATTLE
    }

    const fn default_max_armies() -> usize {
        constants::MAX_ARMIES_PER_BATTLE
    }

    const fn default_duration_min_hours() -> u32 {
        constants::BATTLE_DURATION_MIN_HOURS
    }

    const fn default_duration_max_hours() -> u32 {
        constants::BATTLE_DURATION_MAX_HOURS
    }
}

impl Default for BattleLimits {
    fn default() -> Self {
        Self {
            min_armies: Self::default_min_armies(),
            max_armies: Self::default_max_armies(),
            duration_min_hours: Self::default_duration_min_hours(),
            duration_max_hours: Self::default_duration_max_hours(),
        }
    }
}

/// Complete set of balance knobs consumed by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct BattleConfig {
    #[serde(default)]
    pub weights: UnitWeights,
    #[serde(default)]
    pub modifiers: ModifierCfg,
    #[serde(default)]
    pub tactical: TacticalCfg,
    #[serde(default)]
    pub casualties: CasualtyCfg,
    #[serde(default)]
    pub limits: BattleLimits,
}

impl BattleConfig {
    /// Parse a configuration, filling omitted fields from the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check that every knob is usable by the engine.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), BattleConfigError> {
        for (field, value) in [
            ("weights.infantry", self.weights.infantry),
            ("weights.cavalry", self.weights.cavalry),
            ("weights.archers", self.weights.archers),
            ("tactical.cavalry_bonus", self.tactical.cavalry_bonus),
            ("tactical.archer_bonus", self.tactical.archer_bonus),
        ] {
            if !(value >= 0.0) {
                return Err(BattleConfigError::MinViolation {
                    field,
                    min: 0.0,
                    value,
                });
            }
        }
        self.casualties.winner.validate("casualties.winner")?;
        self.casualties.loser.validate("casualties.loser")?;

        let limits = &self.limits;
        if limits.min_armies < constants::MIN_ARMIES_PER_BATTLE {
            return Err(BattleConfigError::MinViolation {
                field: "limits.min_armies",
                min: 2.0,
                value: usize_to_f64(limits.min_armies),
            });
        }
        if limits.min_armies > limits.max_armies {
            return Err(BattleConfigError::Inverted {
                field: "limits.armies",
                min: usize_to_f64(limits.min_armies),
                max: usize_to_f64(limits.max_armies),
            });
        }
        if limits.duration_min_hours > limits.duration_max_hours {
            return Err(BattleConfigError::Inverted {
                field: "limits.duration_hours",
                min: f64::from(limits.duration_min_hours),
                max: f64::from(limits.duration_max_hours),
            });
        }
        Ok(())
    }
}

#[allow(clippy::cast_precision_loss)]
const fn usize_to_f64(value: usize) -> f64 {
    value as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_mirror_named_constants() {
        let cfg = BattleConfig::default();
        assert!((cfg.weights.cavalry - constants::CAVALRY_EFFECTIVENESS).abs() < f64::EPSILON);
        assert!((cfg.casualties.loser.max - constants::LOSER_CASUALTY_MAX).abs() < f64::EPSILON);
        assert_eq!(cfg.tactical.open_field, Terrain::Plains);
        assert_eq!(cfg.limits.max_armies, constants::MAX_ARMIES_PER_BATTLE);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let cfg = BattleConfig::from_json(
            r#"{"weights": {"cavalry": 2.0}, "tactical": {"open_field": "riverlands"}}"#,
        )
        .unwrap();
        assert!((cfg.weights.cavalry - 2.0).abs() < f64::EPSILON);
        assert!((cfg.weights.infantry - 1.0).abs() < f64::EPSILON);
        assert_eq!(cfg.tactical.open_field, Terrain::Riverlands);
        assert_eq!(cfg.casualties, CasualtyCfg::default());
    }

    #[test]
    fn inverted_casualty_band_is_rejected() {
        let mut cfg = BattleConfig::default();
        cfg.casualties.winner = RateRange::new(0.3, 0.1);
        assert!(matches!(
            cfg.validate(),
            Err(BattleConfigError::Inverted {
                field: "casualties.winner",
                ..
            })
        ));
    }

    #[test]
    fn out_of_range_rate_and_negative_weight_are_rejected() {
        let mut cfg = BattleConfig::default();
        cfg.casualties.loser = RateRange::new(0.35, 1.4);
        assert!(matches!(
            cfg.validate(),
            Err(BattleConfigError::RangeViolation { .. })
        ));

        let mut cfg = BattleConfig::default();
        cfg.weights.archers = -0.8;
        assert!(matches!(
            cfg.validate(),
            Err(BattleConfigError::MinViolation {
                field: "weights.archers",
                ..
            })
        ));
    }

    #[test]
    fn army_limits_must_allow_a_battle() {
        let mut cfg = BattleConfig::default();
        cfg.limits.min_armies = 1;
        assert!(cfg.validate().is_err());

        let mut cfg = BattleConfig::default();
        cfg.limits.min_armies = 4;
        cfg.limits.max_armies = 3;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rate_range_sample_spans_band() {
        let band = RateRange::new(0.35, 0.55);
        assert!((band.sample(0.0) - 0.35).abs() < 1e-12);
        assert!((band.sample(0.5) - 0.45).abs() < 1e-12);
        assert!(band.sample(0.999_999) < 0.55);
    }
}

//! Errors raised before any battle work begins.
use thiserror::Error;

use crate::army::UnitType;
use crate::faction::FactionId;

/// The per-army invariant that failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArmyViolation {
    #[error("must have at least one unit (total {total})")]
    NoTroops { total: i64 },
    #[error("cannot have a negative {unit} count (got {count})")]
    NegativeUnitCount { unit: UnitType, count: i64 },
    #[error("troop counts {infantry} + {cavalry} + {archers} exceed the representable total")]
    TroopOverflow {
        infantry: i64,
        cavalry: i64,
        archers: i64,
    },
    #[error("{field} must be between 0 and 1 (got {value:.3})")]
    RatioOutOfRange { field: &'static str, value: f64 },
}

/// Errors surfaced by battle resolution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BattleError {
    #[error("army {faction} is invalid: {violation}")]
    InvalidArmy {
        faction: FactionId,
        violation: ArmyViolation,
    },
    #[error("battle requires between {min} and {max} armies (got {count})")]
    InvalidBattleSize {
        count: usize,
        min: usize,
        max: usize,
    },
}

impl BattleError {
    #[must_use]
    pub const fn is_invalid_army(&self) -> bool {
        matches!(self, Self::InvalidArmy { .. })
    }

    #[must_use]
    pub const fn is_invalid_battle_size(&self) -> bool {
        matches!(self, Self::InvalidBattleSize { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_faction_and_violation() {
        let err = BattleError::InvalidArmy {
            faction: FactionId::new("House Stark"),
            violation: ArmyViolation::RatioOutOfRange {
                field: "morale",
                value: 1.5,
            },
        };
        assert_eq!(
            err.to_string(),
            "army House Stark is invalid: morale must be between 0 and 1 (got 1.500)"
        );
        assert!(err.is_invalid_army());
    }

    #[test]
    fn battle_size_message_reports_bounds() {
        let err = BattleError::InvalidBattleSize {
            count: 7,
            min: 2,
            max: 6,
        };
        assert_eq!(
            err.to_string(),
            "battle requires between 2 and 6 armies (got 7)"
        );
        assert!(err.is_invalid_battle_size());
    }
}

//! Win/loss dependent casualty draws.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::army::{Army, UnitType};
use crate::config::{CasualtyCfg, RateRange};
use crate::faction::FactionId;
use crate::numbers::{floor_f64_to_i64, i64_to_f64};
use crate::strength::ArmyStrengthData;

/// Losses per unit type; `total` always equals the sum of the parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CasualtyBreakdown {
    pub infantry: i64,
    pub cavalry: i64,
    pub archers: i64,
    pub total: i64,
}

impl CasualtyBreakdown {
    #[must_use]
    pub const fn new(infantry: i64, cavalry: i64, archers: i64) -> Self {
        Self {
            infantry,
            cavalry,
            archers,
            total: infantry.saturating_add(cavalry).saturating_add(archers),
        }
    }

    /// Apply one rate to every unit type, flooring each result.
    ///
    /// Losses never exceed the fielded count of a unit type.
    #[must_use]
    pub fn from_rate(army: &Army, rate: f64) -> Self {
        let lost = |unit: UnitType| {
            let count = army.count(unit).max(0);
            floor_f64_to_i64(i64_to_f64(count) * rate).clamp(0, count)
        };
        Self::new(
            lost(UnitType::Infantry),
            lost(UnitType::Cavalry),
            lost(UnitType::Archers),
        )
    }

    #[must_use]
    pub const fn get(&self, unit: UnitType) -> i64 {
        match unit {
            UnitType::Infantry => self.infantry,
            UnitType::Cavalry => self.cavalry,
            UnitType::Archers => self.archers,
        }
    }

    /// Fold another breakdown into this one, saturating at `i64::MAX`.
    pub fn accumulate(&mut self, other: &Self) {
        *self = Self::new(
            self.infantry.saturating_add(other.infantry),
            self.cavalry.saturating_add(other.cavalry),
            self.archers.saturating_add(other.archers),
        );
    }
}

/// Draw a casualty rate uniformly from the band for this outcome.
pub fn draw_casualty_rate<R>(rng: &mut R, band: RateRange) -> f64
where
    R: Rng + ?Sized,
{
    let unit: f64 = rng.r#gen();
    band.sample(unit)
}

/// Populate every army's casualties and collect them per faction.
///
/// One rate is drawn per army in input order. Armies sharing a faction
/// identifier are summed into a single entry.
pub fn calculate_battle_casualties<R>(
    strengths: &mut [ArmyStrengthData],
    winner: usize,
    cfg: &CasualtyCfg,
    rng: &mut R,
) -> BTreeMap<FactionId, CasualtyBreakdown>
where
    R: Rng + ?Sized,
{
    let mut by_faction: BTreeMap<FactionId, CasualtyBreakdown> = BTreeMap::new();
    for (index, data) in strengths.iter_mut().enumerate() {
        let won = index == winner;
        let rate = draw_casualty_rate(rng, cfg.band(won));
        log::trace!(
            "{} casualty rate {rate:.4} ({})",
            data.army.faction,
            if won { "winner" } else { "loser" }
        );
        data.casualties = CasualtyBreakdown::from_rate(&data.army, rate);
        by_faction
            .entry(data.army.faction.clone())
            .or_default()
            .accumulate(&data.casualties);
    }
    by_faction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifiers::BattleModifiers;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use rand::rngs::mock::StepRng;

    fn data(army: Army) -> ArmyStrengthData {
        ArmyStrengthData {
            army,
            strength: 1.0,
            modifiers: BattleModifiers::neutral(),
            casualties: CasualtyBreakdown::default(),
        }
    }

    #[test]
    fn from_rate_floors_each_unit_independently() {
        let army = Army::new("House Stark", 999, 99, 9);
        let losses = CasualtyBreakdown::from_rate(&army, 0.5);
        assert_eq!(losses, CasualtyBreakdown::new(499, 49, 4));
        assert_eq!(losses.total, 552);
    }

    #[test]
    fn zero_draw_hits_band_floor() {
        let mut rng = StepRng::new(0, 0);
        let rate = draw_casualty_rate(&mut rng, CasualtyCfg::default().winner);
        assert!((rate - 0.15).abs() < 1e-12);
    }

    #[test]
    fn max_draw_stays_below_band_ceiling() {
        let mut rng = StepRng::new(u64::MAX, 0);
        let rate = draw_casualty_rate(&mut rng, CasualtyCfg::default().loser);
        assert!(rate <= 0.55);
        assert!(rate > 0.549);
    }

    #[test]
    fn winner_and_losers_use_their_bands() {
        let cfg = CasualtyCfg::default();
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..200 {
            let mut armies = vec![
                data(Army::new("House Tyrell", 10_000, 10_000, 10_000)),
                data(Army::new("House Stark", 10_000, 10_000, 10_000)),
            ];
            let map = calculate_battle_casualties(&mut armies, 0, &cfg, &mut rng);
            let winner = map[&FactionId::new("House Tyrell")];
            let loser = map[&FactionId::new("House Stark")];
            assert!((1_500..=2_500).contains(&winner.infantry));
            assert!((3_500..=5_500).contains(&loser.infantry));
            for losses in [winner, loser] {
                assert_eq!(losses.total, losses.infantry + losses.cavalry + losses.archers);
            }
        }
    }

    #[test]
    fn repeated_faction_accumulates_losses() {
        let cfg = CasualtyCfg::default();
        let mut rng = StepRng::new(0, 0);
        let mut armies = vec![
            data(Army::new("House Frey", 1_000, 0, 0)),
            data(Army::new("House Frey", 2_000, 0, 0)),
            data(Army::new("House Tully", 500, 0, 0)),
        ];
        let map = calculate_battle_casualties(&mut armies, 2, &cfg, &mut rng);
        assert_eq!(map.len(), 2);
        // both Frey armies lose at the loser floor of 35%
        assert_eq!(map[&FactionId::new("House Frey")].infantry, 350 + 700);
        assert_eq!(armies[0].casualties.infantry, 350);
        assert_eq!(armies[2].casualties.infantry, 75);
    }

    #[test]
    fn full_rate_never_exceeds_fielded_units() {
        let army = Army::new("House Stark", i64::MAX - 1, 3, 0);
        let losses = CasualtyBreakdown::from_rate(&army, 1.0);
        assert_eq!(losses.infantry, i64::MAX - 1);
        assert_eq!(losses.cavalry, 3);
        assert_eq!(losses.archers, 0);
    }

    #[test]
    fn huge_repeated_factions_saturate_instead_of_overflowing() {
        let half = i64::MAX / 2 + 1;
        let mut armies = vec![
            data(Army::new("House Frey", half, 0, 0)),
            data(Army::new("House Frey", half, 0, 0)),
        ];
        let cfg = CasualtyCfg {
            winner: RateRange::new(1.0, 1.0),
            loser: RateRange::new(1.0, 1.0),
        };
        let map = calculate_battle_casualties(&mut armies, 0, &cfg, &mut StepRng::new(0, 0));
        let frey = map[&FactionId::new("House Frey")];
        assert_eq!(frey.infantry, i64::MAX);
        assert_eq!(frey.total, i64::MAX);
    }
}

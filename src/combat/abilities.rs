use crate::army::{TierInput, TroopType};
use crate::rng::TrialRng;

/// Result of one side's ability rolls for a single troop type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbilityOutcome {
    pub dmg_mult: f64,
    pub tank_mult: f64,
    pub backline_shift: f64,
}

impl Default for AbilityOutcome {
    fn default() -> Self {
        Self {
            dmg_mult: 1.0,
            tank_mult: 1.0,
            backline_shift: 0.0,
        }
    }
}

/// Roll the tier-gated combat abilities for one troop type.
///
/// The evaluation order is fixed and each satisfied gate consumes exactly
/// one draw from the stream, whether or not the ability triggers. The draw
/// count per call therefore depends only on troop type and tier/tg, which
/// keeps the deterministic stream aligned across runs.
pub fn roll(troop: TroopType, tier: TierInput, rng: &mut TrialRng) -> AbilityOutcome {
    let mut out = AbilityOutcome::default();
    match troop {
        TroopType::Infantry => {
            if tier.tg >= 3 {
                if rng.next_fraction() < 0.25 {
                    out.tank_mult *= 1.06;
                }
            }
        }
        TroopType::Cavalry => {
            if tier.tier >= 7 {
                if rng.next_fraction() < 0.20 {
                    out.backline_shift += 0.25;
                }
            }
            if tier.tg >= 3 {
                if rng.next_fraction() < 0.10 {
                    out.dmg_mult *= 2.0;
                }
            }
        }
        TroopType::Archers => {
            if tier.tier >= 7 {
                if rng.next_fraction() < 0.10 {
                    out.dmg_mult *= 2.0;
                }
            }
            if tier.tg >= 3 {
                if rng.next_fraction() < 0.20 {
                    out.dmg_mult *= 1.5;
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOW: TierInput = TierInput { tier: 1, tg: 0 };
    const HIGH: TierInput = TierInput { tier: 11, tg: 5 };

    fn drained(troop: TroopType, tier: TierInput, seed: u32) -> u32 {
        // Count consumed draws by replaying the stream next to the roll.
        let mut rolled = TrialRng::new(seed);
        let _ = roll(troop, tier, &mut rolled);
        let mut reference = TrialRng::new(seed);
        for n in 0..8 {
            if rolled.clone().next_fraction() == reference.clone().next_fraction() {
                return n;
            }
            let _ = reference.next_fraction();
        }
        panic!("stream diverged by more than 8 draws");
    }

    #[test]
    fn ungated_rolls_consume_nothing() {
        for troop in TroopType::ALL {
            assert_eq!(drained(troop, LOW, 42), 0);
            assert_eq!(roll(troop, LOW, &mut TrialRng::new(42)), AbilityOutcome::default());
        }
    }

    #[test]
    fn draw_counts_follow_the_gates() {
        assert_eq!(drained(TroopType::Infantry, HIGH, 42), 1);
        assert_eq!(drained(TroopType::Cavalry, HIGH, 42), 2);
        assert_eq!(drained(TroopType::Archers, HIGH, 42), 2);

        // tier gate alone: cavalry and archers roll once, infantry none
        let tier_only = TierInput { tier: 7, tg: 0 };
        assert_eq!(drained(TroopType::Infantry, tier_only, 42), 0);
        assert_eq!(drained(TroopType::Cavalry, tier_only, 42), 1);
        assert_eq!(drained(TroopType::Archers, tier_only, 42), 1);

        // tg gate alone
        let tg_only = TierInput { tier: 1, tg: 3 };
        assert_eq!(drained(TroopType::Infantry, tg_only, 42), 1);
        assert_eq!(drained(TroopType::Cavalry, tg_only, 42), 1);
        assert_eq!(drained(TroopType::Archers, tg_only, 42), 1);
    }

    #[test]
    fn a_missed_trigger_still_consumes_its_draw() {
        // Whatever the outcome, the draw count for a given gate set is fixed.
        for seed in [0, 1, 2, 3, 4, 5, 6, 7] {
            assert_eq!(drained(TroopType::Cavalry, HIGH, seed), 2);
        }
    }

    #[test]
    fn multipliers_stay_within_catalog_bounds() {
        for seed in 0..64 {
            let out = roll(TroopType::Archers, HIGH, &mut TrialRng::new(seed));
            assert!(
                [1.0, 1.5, 2.0, 3.0].iter().any(|m| (out.dmg_mult - m).abs() < 1e-12),
                "unexpected archer dmg_mult {}",
                out.dmg_mult
            );
            assert_eq!(out.tank_mult, 1.0);
            assert_eq!(out.backline_shift, 0.0);
        }
        for seed in 0..64 {
            let out = roll(TroopType::Infantry, HIGH, &mut TrialRng::new(seed));
            assert!(out.tank_mult == 1.0 || (out.tank_mult - 1.06).abs() < 1e-12);
            assert_eq!(out.dmg_mult, 1.0);
        }
        for seed in 0..64 {
            let out = roll(TroopType::Cavalry, HIGH, &mut TrialRng::new(seed));
            assert!(out.backline_shift == 0.0 || (out.backline_shift - 0.25).abs() < 1e-12);
            assert!(out.dmg_mult == 1.0 || (out.dmg_mult - 2.0).abs() < 1e-12);
        }
    }
}

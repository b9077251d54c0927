use crate::army::{Side, TroopType};
use crate::rng::TrialRng;

use super::{abilities, matchup, pressure::pressure};

/// Total pressure one side exerts against the other for a single simulated
/// trial.
///
/// Draw discipline: only attacker types with a nonzero count roll abilities,
/// and they roll in `TroopType::ALL` order before any pressure arithmetic,
/// so the stream position after this call depends only on the attacker's
/// composition and tier gates.
pub fn side_pressure(
    attacker: &Side,
    defender: &Side,
    rng: &mut TrialRng,
    exponent: f64,
    skill_factor: f64,
) -> f64 {
    let defender_total = defender.total_troops();
    let ratios: [f64; 3] = if defender_total == 0 {
        [1.0 / 3.0; 3]
    } else {
        let total = defender_total as f64;
        [
            defender.troops[0] as f64 / total,
            defender.troops[1] as f64 / total,
            defender.troops[2] as f64 / total,
        ]
    };

    let seen = TroopType::ALL
        .map(|target| defender.effective_stats_against(target, &attacker.special));

    let mut total_pressure = 0.0;
    for troop in TroopType::ALL {
        let count = attacker.count(troop);
        if count == 0 {
            continue;
        }

        let eff = attacker.effective_stats(troop);
        let outcome = abilities::roll(troop, attacker.tier, rng);
        let final_dmg_mult = outcome.dmg_mult * skill_factor;

        let mut weights =
            TroopType::ALL.map(|target| ratios[target.index()] * matchup::multiplier(troop, target));
        if outcome.backline_shift > 0.0 && troop == TroopType::Cavalry {
            let shift = weights[TroopType::Infantry.index()].min(outcome.backline_shift);
            weights[TroopType::Infantry.index()] -= shift;
            weights[TroopType::Archers.index()] += shift;
        }

        let weight_sum: f64 = weights.iter().sum();
        if weight_sum <= 0.0 {
            continue;
        }

        for target in TroopType::ALL {
            let weight = weights[target.index()] / weight_sum;
            let target_stats = seen[target.index()];
            total_pressure += weight
                * pressure(
                    count,
                    eff.atk,
                    eff.leth,
                    target_stats.dfn,
                    target_stats.hp,
                    final_dmg_mult,
                    outcome.tank_mult,
                    exponent,
                );
        }
    }
    total_pressure
}

use crate::army::Side;
use crate::catalog::BattleCatalog;
use crate::combat::pressure::EPSILON;
use crate::combat::side_pressure;
use crate::rng::{battle_seed, TrialRng};

/// Monte Carlo trial count used when the caller does not override it.
pub const DEFAULT_SIMS: u32 = 350;

/// Estimate the probability that `me` beats `enemy`, as a fraction in
/// [0, 1].
///
/// Pure function: the seed is derived from the troop counts alone, so
/// identical arguments always return the bit-identical float. Per trial the
/// draw order is fixed (`me`'s ability rolls, then `enemy`'s, then one
/// win-sample draw) and must stay that way for results to replay.
pub fn estimate_win_pct(
    me: &Side,
    enemy: &Side,
    catalog: &BattleCatalog,
    battle_type_id: u32,
    sims: u32,
    exponent: f64,
) -> f64 {
    let battle_type = catalog.get(battle_type_id);
    let skill_factor = battle_type.extra_skill_factor;
    let seed = battle_seed(me, enemy);
    let sims = sims.max(1);

    let mut wins = 0u32;
    for trial in 0..sims {
        let mut rng = TrialRng::for_trial(seed, trial);
        let pressure_me = side_pressure(me, enemy, &mut rng, exponent, skill_factor);
        let pressure_enemy = side_pressure(enemy, me, &mut rng, exponent, skill_factor);
        let advantage = ((pressure_me + EPSILON) / (pressure_enemy + EPSILON)).ln();
        let prob = 1.0 / (1.0 + (-3.0 * battle_type.intensity * advantage).exp());
        if rng.next_fraction() < prob {
            wins += 1;
        }
    }
    wins as f64 / sims as f64
}

use serde::Serialize;

use crate::army::Side;
use crate::catalog::BattleCatalog;
use crate::combat::pressure::DEFAULT_EXPONENT;
use crate::estimator::{estimate_win_pct, DEFAULT_SIMS};

/// Win rate the search aims for before recommending a bigger march.
pub const DEFAULT_TARGET_WIN: f64 = 0.55;

/// Integer percentage split of a march. Always sums to exactly 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Formation {
    pub infantry: u32,
    pub cavalry: u32,
    pub archers: u32,
}

/// Absolute troop counts for a formation at a given march size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TroopCounts {
    pub infantry: u64,
    pub cavalry: u64,
    pub archers: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendResult {
    pub win_pct: f64,
    pub formation: Formation,
    pub troops: TroopCounts,
    /// Smallest scaled march size (up to 10x) that reaches the target win
    /// rate. `None` when the best formation already meets the target at the
    /// current size, or when no scale up to 10x reaches it; callers
    /// distinguish the two by also checking `win_pct`.
    pub required_march_size: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchPhase {
    Coarse,
    Refine,
    Scale,
}

/// One scored candidate, reported through the progress hook.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SearchProgress {
    pub phase: SearchPhase,
    pub infantry_pct: u32,
    pub cavalry_pct: u32,
    pub march_size: u64,
    pub win_pct: f64,
}

fn split_counts(march_size: u64, infantry_pct: u32, cavalry_pct: u32) -> [u64; 3] {
    let archers_pct = 100 - infantry_pct - cavalry_pct;
    let count = |pct: u32| (march_size as f64 * pct as f64 / 100.0).round() as u64;
    [count(infantry_pct), count(cavalry_pct), count(archers_pct)]
}

/// Search composition space for the split that maximizes the estimated win
/// rate, then scan march size if the target is still out of reach.
///
/// Runs a step-5 coarse grid over (infantry%, cavalry%), a step-1 refine
/// pass within +-6 of the coarse winner, and, only if the best win rate
/// still falls short of `target_win`, a 1.1x..10.0x scale scan that
/// records the first size to reach the target. A zero `march_size` is a
/// known degenerate case: every candidate and every scaled size stays
/// empty, so the scan can never cross the target and the result keeps the
/// default split near a 0.5 win rate.
pub fn recommend_formation(
    my: &Side,
    enemy: &Side,
    catalog: &BattleCatalog,
    battle_type_id: u32,
    march_size: u64,
    target_win: f64,
) -> RecommendResult {
    recommend_formation_with_hook(
        my,
        enemy,
        catalog,
        battle_type_id,
        march_size,
        target_win,
        DEFAULT_SIMS,
        |_| {},
    )
}

#[allow(clippy::too_many_arguments)]
pub fn recommend_formation_with_hook(
    my: &Side,
    enemy: &Side,
    catalog: &BattleCatalog,
    battle_type_id: u32,
    march_size: u64,
    target_win: f64,
    sims: u32,
    mut hook: impl FnMut(SearchProgress),
) -> RecommendResult {
    let resolved_id = catalog.get(battle_type_id).id;
    let (mut best_inf, mut best_cav) = if resolved_id <= 2 { (50, 20) } else { (60, 20) };
    let mut best_win = 0.0_f64;

    let mut score = |inf: u32, cav: u32, size: u64, phase: SearchPhase,
                     hook: &mut dyn FnMut(SearchProgress)| {
        let candidate = my.with_troops(split_counts(size, inf, cav));
        let win = estimate_win_pct(
            &candidate,
            enemy,
            catalog,
            battle_type_id,
            sims,
            DEFAULT_EXPONENT,
        );
        hook(SearchProgress {
            phase,
            infantry_pct: inf,
            cavalry_pct: cav,
            march_size: size,
            win_pct: win,
        });
        win
    };

    // Coarse pass: step-5 grid over the whole simplex. Strictly-greater
    // replacement, so the battle-type default split survives a fully tied
    // grid.
    for inf in (0..=100).step_by(5) {
        for cav in (0..=100 - inf).step_by(5) {
            let win = score(inf as u32, cav as u32, march_size, SearchPhase::Coarse, &mut hook);
            if win > best_win {
                best_win = win;
                best_inf = inf as u32;
                best_cav = cav as u32;
            }
        }
    }

    // Refine pass: step-1 within +-6 of the coarse winner.
    let inf_lo = best_inf.saturating_sub(6);
    let inf_hi = (best_inf + 6).min(100);
    let cav_lo = best_cav.saturating_sub(6);
    let cav_hi = (best_cav + 6).min(100);
    for inf in inf_lo..=inf_hi {
        for cav in cav_lo..=cav_hi {
            if inf + cav > 100 {
                continue;
            }
            let win = score(inf, cav, march_size, SearchPhase::Refine, &mut hook);
            if win > best_win {
                best_win = win;
                best_inf = inf;
                best_cav = cav;
            }
        }
    }

    // Scale scan: only when the best split still misses the target.
    let mut required_march_size = None;
    if best_win < target_win {
        for step in 11..=100u32 {
            let scale = step as f64 / 10.0;
            let scaled_size = (march_size as f64 * scale).round() as u64;
            let win = score(best_inf, best_cav, scaled_size, SearchPhase::Scale, &mut hook);
            if win >= target_win {
                required_march_size = Some(scaled_size);
                break;
            }
        }
    }

    let troops = split_counts(march_size, best_inf, best_cav);
    RecommendResult {
        win_pct: best_win,
        formation: Formation {
            infantry: best_inf,
            cavalry: best_cav,
            archers: 100 - best_inf - best_cav,
        },
        troops: TroopCounts {
            infantry: troops[0],
            cavalry: troops[1],
            archers: troops[2],
        },
        required_march_size,
    }
}

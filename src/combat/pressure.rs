/// Floor applied to denominators so a zero defense never divides by zero.
pub const EPSILON: f64 = 1e-9;

/// Diminishing-returns exponent applied to troop count; 0.5 gives
/// square-root scaling.
pub const DEFAULT_EXPONENT: f64 = 0.5;

/// Offense-vs-defense score for a single troop type.
///
/// Monotonic increasing in `count`, `atk`, `leth`, `dmg_mult`; decreasing in
/// `dfn`, `hp`, `tank_mult`. Zero troops exert zero pressure.
#[allow(clippy::too_many_arguments)]
pub fn pressure(
    count: u64,
    atk: f64,
    leth: f64,
    dfn: f64,
    hp: f64,
    dmg_mult: f64,
    tank_mult: f64,
    exponent: f64,
) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let scale = (count as f64).powf(exponent);
    scale * (atk * leth * dmg_mult) / (dfn * hp * tank_mult).max(EPSILON)
}

use crate::army::TroopType;

/// Multiplier against the countered type.
pub const ADVANTAGE: f64 = 1.12;
/// Multiplier against the countering type.
pub const DISADVANTAGE: f64 = 0.95;

/// Fixed troop-type effectiveness: infantry > cavalry > archers > infantry.
/// Self-matchups are neutral.
pub fn multiplier(attacker: TroopType, defender: TroopType) -> f64 {
    use TroopType::*;
    match (attacker, defender) {
        (Infantry, Cavalry) | (Cavalry, Archers) | (Archers, Infantry) => ADVANTAGE,
        (Cavalry, Infantry) | (Archers, Cavalry) | (Infantry, Archers) => DISADVANTAGE,
        _ => 1.0,
    }
}

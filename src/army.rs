use serde::{Deserialize, Serialize};

/// The three troop classes a march can field.
///
/// `ALL` fixes the iteration order (infantry, cavalry, archers); every loop
/// over troop types in the crate walks this array so the deterministic
/// random stream stays aligned between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TroopType {
    Infantry,
    Cavalry,
    Archers,
}

impl TroopType {
    pub const ALL: [TroopType; 3] = [TroopType::Infantry, TroopType::Cavalry, TroopType::Archers];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            TroopType::Infantry => "infantry",
            TroopType::Cavalry => "cavalry",
            TroopType::Archers => "archers",
        }
    }
}

/// Progression tier of a side's troops. `tier` is 1..=11, `tg` (tier grade)
/// is 0..=5; the setup loader clamps raw input into range before a
/// `TierInput` is ever constructed, so the combat code does not re-validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierInput {
    pub tier: u8,
    pub tg: u8,
}

/// Per-troop-type percentage bonuses. +150 means a 2.5x multiplier;
/// negative values are debuffs and are legal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BonusesPct {
    #[serde(default)]
    pub atk: f64,
    #[serde(default)]
    pub dfn: f64,
    #[serde(default)]
    pub leth: f64,
    #[serde(default)]
    pub hp: f64,
}

/// Side-wide percentage modifiers: self buffs plus the debuffs this side
/// inflicts on its opponent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecialBonusesPct {
    #[serde(default)]
    pub squads_atk: f64,
    #[serde(default)]
    pub squads_dfn: f64,
    #[serde(default)]
    pub squads_leth: f64,
    #[serde(default)]
    pub squads_hp: f64,
    #[serde(default)]
    pub pet_atk_bonus: f64,
    #[serde(default)]
    pub enemy_squads_atk: f64,
    #[serde(default)]
    pub enemy_squads_dfn: f64,
    #[serde(default)]
    pub enemy_leth_pen: f64,
    #[serde(default)]
    pub enemy_hp_pen: f64,
}

/// Effective stat multipliers for one troop type after bonus aggregation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveStats {
    pub atk: f64,
    pub dfn: f64,
    pub leth: f64,
    pub hp: f64,
}

/// One army in a battle. A `Side` is a value: the optimizer derives new
/// candidates with [`Side::with_troops`] instead of mutating counts in
/// place, so a built `Side` is never shared mutably across trials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Side {
    /// Troop counts indexed by `TroopType::index()`.
    pub troops: [u64; 3],
    /// Per-type bonuses indexed by `TroopType::index()`.
    pub bonuses: [BonusesPct; 3],
    pub special: SpecialBonusesPct,
    pub tier: TierInput,
}

fn pct(value: f64) -> f64 {
    1.0 + value / 100.0
}

impl Side {
    pub fn new(
        troops: [u64; 3],
        bonuses: [BonusesPct; 3],
        special: SpecialBonusesPct,
        tier: TierInput,
    ) -> Self {
        Self {
            troops,
            bonuses,
            special,
            tier,
        }
    }

    pub fn count(&self, troop: TroopType) -> u64 {
        self.troops[troop.index()]
    }

    pub fn total_troops(&self) -> u64 {
        self.troops.iter().sum()
    }

    /// Copy-with-override: same bonuses, special modifiers, and tier, but
    /// different troop counts.
    pub fn with_troops(&self, troops: [u64; 3]) -> Side {
        Side {
            troops,
            bonuses: self.bonuses,
            special: self.special,
            tier: self.tier,
        }
    }

    /// Effective multipliers for one troop type, self buffs only.
    pub fn effective_stats(&self, troop: TroopType) -> EffectiveStats {
        let bonus = self.bonuses[troop.index()];
        let special = &self.special;
        EffectiveStats {
            atk: pct(bonus.atk) * pct(special.squads_atk) * pct(special.pet_atk_bonus),
            dfn: pct(bonus.dfn) * pct(special.squads_dfn),
            leth: pct(bonus.leth) * pct(special.squads_leth),
            hp: pct(bonus.hp) * pct(special.squads_hp),
        }
    }

    /// Effective multipliers for one troop type as seen by an attacker that
    /// inflicts `attacker` debuffs. Penetration magnitudes are taken as
    /// absolute values: the stored sign never flips the direction of the
    /// penalty, only its size.
    pub fn effective_stats_against(
        &self,
        troop: TroopType,
        attacker: &SpecialBonusesPct,
    ) -> EffectiveStats {
        let mut eff = self.effective_stats(troop);
        eff.dfn *= pct(attacker.enemy_squads_dfn);
        eff.atk *= pct(attacker.enemy_squads_atk);
        eff.leth *= 1.0 - attacker.enemy_leth_pen.abs() / 100.0;
        eff.hp *= 1.0 - attacker.enemy_hp_pen.abs() / 100.0;
        eff
    }
}

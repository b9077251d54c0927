use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use crate::army::{BonusesPct, Side, SpecialBonusesPct, TierInput, TroopType};
use crate::estimator::DEFAULT_SIMS;
use crate::optimizer::DEFAULT_TARGET_WIN;

fn default_battle_type() -> u32 {
    1
}

fn default_target_win() -> f64 {
    DEFAULT_TARGET_WIN
}

fn default_sims() -> u32 {
    DEFAULT_SIMS
}

/// A battle setup file: two armies plus the battle parameters. This is the
/// boundary owned by the parsing collaborator: troop counts are validated
/// non-negative and tier/tg are clamped into range here, so the combat core
/// never re-checks them.
#[derive(Debug, Clone, Deserialize)]
pub struct BattleSetup {
    pub name: String,
    #[serde(default = "default_battle_type")]
    pub battle_type: u32,
    pub march_size: u64,
    #[serde(default = "default_target_win")]
    pub target_win: f64,
    #[serde(default = "default_sims")]
    pub sims: u32,
    pub my: SideSetup,
    pub enemy: SideSetup,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SideSetup {
    pub tier: TierSetup,
    pub troops: TroopSetup,
    #[serde(default)]
    pub bonuses: BonusSetup,
    #[serde(default)]
    pub special: SpecialBonusesPct,
}

/// Raw tier numbers as typed by the player; clamped on build.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TierSetup {
    pub tier: i64,
    #[serde(default)]
    pub tg: i64,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TroopSetup {
    #[serde(default)]
    pub infantry: i64,
    #[serde(default)]
    pub cavalry: i64,
    #[serde(default)]
    pub archers: i64,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct BonusSetup {
    #[serde(default)]
    pub infantry: BonusesPct,
    #[serde(default)]
    pub cavalry: BonusesPct,
    #[serde(default)]
    pub archers: BonusesPct,
}

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("negative troop count {count} for {troop} on side '{side}'")]
    NegativeTroops {
        side: &'static str,
        troop: &'static str,
        count: i64,
    },
    #[error("target win rate {0} must lie in (0, 1]")]
    TargetWinOutOfRange(f64),
}

/// Loads battle setup files relative to a base directory.
pub struct SetupLoader {
    base_dir: PathBuf,
}

impl SetupLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<BattleSetup> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read battle setup {}", path.display()))?;
        let setup: BattleSetup = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(setup)
    }
}

impl SideSetup {
    fn build(&self, side_label: &'static str) -> Result<Side, SetupError> {
        let raw = [
            (TroopType::Infantry, self.troops.infantry),
            (TroopType::Cavalry, self.troops.cavalry),
            (TroopType::Archers, self.troops.archers),
        ];
        let mut troops = [0u64; 3];
        for (troop, count) in raw {
            if count < 0 {
                return Err(SetupError::NegativeTroops {
                    side: side_label,
                    troop: troop.label(),
                    count,
                });
            }
            troops[troop.index()] = count as u64;
        }

        let tier = TierInput {
            tier: self.tier.tier.clamp(1, 11) as u8,
            tg: self.tier.tg.clamp(0, 5) as u8,
        };
        let bonuses = [self.bonuses.infantry, self.bonuses.cavalry, self.bonuses.archers];
        Ok(Side::new(troops, bonuses, self.special, tier))
    }
}

impl BattleSetup {
    /// Build the two validated `Side` values this setup describes.
    pub fn build_sides(&self) -> Result<(Side, Side), SetupError> {
        if self.target_win <= 0.0 || self.target_win > 1.0 {
            return Err(SetupError::TargetWinOutOfRange(self.target_win));
        }
        let my = self.my.build("my")?;
        let enemy = self.enemy.build("enemy")?;
        Ok((my, enemy))
    }
}

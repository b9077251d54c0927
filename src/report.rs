use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::optimizer::RecommendResult;

/// JSON envelope written by the CLI after a recommendation run.
#[derive(Debug, Clone, Serialize)]
pub struct BattleReport {
    pub setup: String,
    pub battle_type: String,
    pub generated_at: String,
    pub march_size: u64,
    pub target_win: f64,
    pub result: RecommendResult,
}

impl BattleReport {
    pub fn new(
        setup: impl Into<String>,
        battle_type: impl Into<String>,
        march_size: u64,
        target_win: f64,
        result: RecommendResult,
    ) -> Self {
        Self {
            setup: setup.into(),
            battle_type: battle_type.into(),
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            march_size,
            target_win,
            result,
        }
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        Ok(path.to_path_buf())
    }
}

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

fn default_extra_skill_factor() -> f64 {
    1.0
}

/// One battle mode: how hard the logistic curve punishes a pressure gap
/// (`intensity`) and how much combat skills are amplified
/// (`extra_skill_factor`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleType {
    pub id: u32,
    pub label: String,
    pub intensity: f64,
    #[serde(default = "default_extra_skill_factor")]
    pub extra_skill_factor: f64,
}

/// Immutable catalog of battle types, passed into the estimator and
/// optimizer rather than read from a module global, so alternative rule
/// sets can coexist side by side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleCatalog {
    pub battle_types: Vec<BattleType>,
}

impl Default for BattleCatalog {
    fn default() -> Self {
        Self {
            battle_types: vec![
                BattleType {
                    id: 1,
                    label: "Field skirmish".into(),
                    intensity: 1.0,
                    extra_skill_factor: 1.0,
                },
                BattleType {
                    id: 2,
                    label: "Rally assault".into(),
                    intensity: 1.25,
                    extra_skill_factor: 1.1,
                },
                BattleType {
                    id: 3,
                    label: "Garrison defense".into(),
                    intensity: 0.9,
                    extra_skill_factor: 1.0,
                },
                BattleType {
                    id: 4,
                    label: "Fortress siege".into(),
                    intensity: 1.4,
                    extra_skill_factor: 1.2,
                },
            ],
        }
    }
}

impl BattleCatalog {
    /// Look up a battle type by id. Unknown ids fall back to the first
    /// catalog entry; this permissive default is deliberate, not an error.
    pub fn get(&self, id: u32) -> &BattleType {
        self.battle_types
            .iter()
            .find(|bt| bt.id == id)
            .unwrap_or(&self.battle_types[0])
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read battle catalog {}", path.display()))?;
        let catalog: BattleCatalog = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        anyhow::ensure!(
            !catalog.battle_types.is_empty(),
            "battle catalog {} defines no battle types",
            path.display()
        );
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_has_four_modes() {
        let catalog = BattleCatalog::default();
        assert_eq!(catalog.battle_types.len(), 4);
        assert_eq!(
            catalog.battle_types.iter().map(|bt| bt.id).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
    }

    #[test]
    fn unknown_id_falls_back_to_first_entry() {
        let catalog = BattleCatalog::default();
        assert_eq!(catalog.get(99).id, 1);
        assert_eq!(catalog.get(0).id, 1);
        assert_eq!(catalog.get(3).id, 3);
    }

    #[test]
    fn catalog_parses_from_yaml() {
        let yaml = "
battle_types:
  - id: 1
    label: duel
    intensity: 0.8
  - id: 7
    label: brawl
    intensity: 1.1
    extra_skill_factor: 1.3
";
        let catalog: BattleCatalog = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(catalog.get(7).extra_skill_factor, 1.3);
        // omitted factor defaults to neutral
        assert_eq!(catalog.get(1).extra_skill_factor, 1.0);
    }
}

pub mod army;
pub mod catalog;
pub mod combat;
pub mod estimator;
pub mod optimizer;
pub mod report;
pub mod rng;
pub mod setup;
pub mod web;

pub use army::{BonusesPct, Side, SpecialBonusesPct, TierInput, TroopType};
pub use catalog::{BattleCatalog, BattleType};
pub use estimator::estimate_win_pct;
pub use optimizer::{recommend_formation, recommend_formation_with_hook, RecommendResult};

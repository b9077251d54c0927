pub mod abilities;
pub mod matchup;
pub mod pressure;
pub mod trial;

pub use abilities::AbilityOutcome;
pub use trial::side_pressure;

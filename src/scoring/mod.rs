pub mod config;
pub mod engine;
pub mod exclusions;
pub mod validation;

pub use config::ScoringConfig;
pub use engine::{
    race_results, recompute, sprint_results, FastestLapHolder, RecomputedResult, SessionOutcome,
};
pub use exclusions::Exclusions;
pub use validation::validate_scoring;

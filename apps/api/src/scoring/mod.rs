pub mod engine;
pub mod policy;

pub use engine::{report, ScoreReport};
pub use policy::ScoringPolicy;

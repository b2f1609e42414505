// Weekly topic trend detection.

pub mod engine;
pub mod week;

pub use engine::{compute_trends, Observation, TrendRecord, TrendSummary};

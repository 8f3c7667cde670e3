// Analysis pipeline: single-review and batch trust scoring.

pub mod batch;
pub mod engine;

pub use batch::{BatchAnalysis, BatchItem, ScoredReview};
pub use engine::{EngineConfig, TrustEngine};

// src/types/mod.rs
pub mod assessment;
pub mod job;

pub use assessment::{MatchAssessment, Recommendation, ScoredJob};
pub use job::{JobPosting, JobQuery, JobSource};

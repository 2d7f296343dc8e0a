//! Daily job digest: scrape job boards, drop duplicates, score each posting
//! against a resume with a language model, and email the ranked matches.

pub mod collectors;
pub mod config;
pub mod digest;
pub mod enricher;
pub mod mailer;
pub mod pipeline;
pub mod ranking;
pub mod scoring;
pub mod types;
pub mod utils;

pub use config::{DigestConfig, Pacing};
pub use pipeline::{DigestPipeline, RunSummary};
pub use ranking::{deduplicate, filter_and_rank};
pub use types::{JobPosting, JobQuery, JobSource, MatchAssessment, Recommendation, ScoredJob};

/// Log through `tracing` at the given level: `app_log!(info, "Found {} jobs", n)`
#[macro_export]
macro_rules! app_log {
    ($level:ident, $($arg:tt)+) => {
        ::tracing::$level!($($arg)+)
    };
}

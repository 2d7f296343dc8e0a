// src/ranking.rs
//! Deduplication and threshold ranking: the only stages with no I/O

use std::collections::HashSet;

use crate::types::{JobPosting, ScoredJob};

/// Keep the first posting seen for each title + company, preserving input order.
pub fn deduplicate(jobs: Vec<JobPosting>) -> Vec<JobPosting> {
    let mut seen = HashSet::new();
    jobs.into_iter()
        .filter(|job| seen.insert(job.dedup_key()))
        .collect()
}

/// Keep jobs scoring at least `threshold`, best first. Ties keep their input order.
pub fn filter_and_rank(jobs: Vec<ScoredJob>, threshold: u8) -> Vec<ScoredJob> {
    let mut kept: Vec<ScoredJob> = jobs
        .into_iter()
        .filter(|job| job.match_score() >= threshold)
        .collect();
    // sort_by is stable
    kept.sort_by(|a, b| b.match_score().cmp(&a.match_score()));
    kept
}

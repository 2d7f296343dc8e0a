// src/scoring/mod.rs
//! Resume-to-posting scoring through a language model.
//!
//! The model is treated as an opaque text completion. Whatever it returns, the
//! scorer hands back a `MatchAssessment`: anything unusable becomes
//! `MatchAssessment::fallback()`, so one bad answer never stops the run.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::app_log;
use crate::types::{JobPosting, MatchAssessment, ScoredJob};

pub mod claude;
pub mod prompt;

pub use claude::ClaudeBackend;
pub use prompt::build_prompt;

#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Raw text answer for a single-turn prompt
    async fn complete(&self, prompt: &str) -> anyhow::Result<String>;
}

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("completion failed: {0:#}")]
    Backend(anyhow::Error),

    #[error("no JSON object in response")]
    NoJsonObject,

    #[error("invalid assessment JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse the first `{` .. last `}` span of a model answer.
pub fn parse_assessment(raw: &str) -> Result<MatchAssessment, ScoreError> {
    let start = raw.find('{').ok_or(ScoreError::NoJsonObject)?;
    let end = raw.rfind('}').ok_or(ScoreError::NoJsonObject)?;
    if end < start {
        return Err(ScoreError::NoJsonObject);
    }
    Ok(serde_json::from_str(&raw[start..=end])?)
}

pub struct JobScorer {
    backend: Box<dyn CompletionBackend>,
}

impl JobScorer {
    pub fn new(backend: Box<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    async fn try_score(
        &self,
        job: &JobPosting,
        resume_text: &str,
        keywords: &str,
    ) -> Result<MatchAssessment, ScoreError> {
        let prompt = build_prompt(job, resume_text, keywords);
        let raw = self
            .backend
            .complete(&prompt)
            .await
            .map_err(ScoreError::Backend)?;
        parse_assessment(&raw)
    }

    /// Score one posting. Never fails.
    pub async fn score(&self, job: &JobPosting, resume_text: &str, keywords: &str) -> MatchAssessment {
        match self.try_score(job, resume_text, keywords).await {
            Ok(assessment) => assessment,
            Err(e) => {
                app_log!(warn, "Scoring error for {}: {}", job.title, e);
                MatchAssessment::fallback()
            }
        }
    }

    /// Score postings one at a time, waiting `delay` after each call
    pub async fn score_all(
        &self,
        jobs: Vec<JobPosting>,
        resume_text: &str,
        keywords: &str,
        delay: Duration,
    ) -> Vec<ScoredJob> {
        let total = jobs.len();
        let mut scored = Vec::with_capacity(total);

        for (i, job) in jobs.into_iter().enumerate() {
            app_log!(info, "[{}/{}] Analyzing: {}", i + 1, total, job.label());
            let assessment = self.score(&job, resume_text, keywords).await;
            app_log!(
                info,
                "Score: {}% ({})",
                assessment.match_score,
                assessment.recommendation
            );
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            scored.push(ScoredJob::new(job, assessment));
        }

        scored
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Backend replaying canned answers in order; `Err` entries simulate failures
    pub struct ScriptedBackend {
        answers: Mutex<VecDeque<Result<String, String>>>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedBackend {
        pub fn new(answers: Vec<Result<&str, &str>>) -> Self {
            Self {
                answers: Mutex::new(
                    answers
                        .into_iter()
                        .map(|a| a.map(str::to_string).map_err(str::to_string))
                        .collect(),
                ),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionBackend for ScriptedBackend {
        async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match self.answers.lock().unwrap().pop_front() {
                Some(Ok(text)) => Ok(text),
                Some(Err(e)) => Err(anyhow::anyhow!(e)),
                None => Err(anyhow::anyhow!("no scripted answer left")),
            }
        }
    }

    /// Backend scoring the n-th call as (n * 5) % 100
    pub struct SequenceBackend {
        calls: Mutex<usize>,
    }

    impl SequenceBackend {
        pub fn new() -> Self {
            Self {
                calls: Mutex::new(0),
            }
        }

        pub fn score_for(index: usize) -> u8 {
            ((index * 5) % 100) as u8
        }
    }

    #[async_trait]
    impl CompletionBackend for SequenceBackend {
        async fn complete(&self, _prompt: &str) -> anyhow::Result<String> {
            let mut calls = self.calls.lock().unwrap();
            let score = Self::score_for(*calls);
            *calls += 1;
            Ok(format!(
                r#"{{"match_score": {}, "keyword_match": {}, "recommendation": "Consider Applying"}}"#,
                score, score
            ))
        }
    }
}

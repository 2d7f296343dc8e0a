// src/config.rs
//! Run configuration, loaded once from the environment and passed into the pipeline

use anyhow::{Context, Result};
use std::time::Duration;

use crate::app_log;
use crate::types::JobQuery;

pub const DEFAULT_KEYWORDS: &str = "software engineer";
pub const DEFAULT_LOCATION: &str = "Remote";
pub const DEFAULT_MIN_MATCH_SCORE: u8 = 60;
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 465;
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5";

#[derive(Debug, Clone)]
pub struct DigestConfig {
    pub keywords: String,
    pub location: String,
    pub min_match_score: u8,
    pub resume_text: String,
    pub smtp: SmtpConfig,
    pub scoring: ScoringConfig,
    pub pacing: Pacing,
}

#[derive(Clone)]
pub struct SmtpConfig {
    pub email: String,
    pub password: String,
    pub host: String,
    pub port: u16,
}

#[derive(Clone)]
pub struct ScoringConfig {
    pub api_key: String,
    pub model: String,
}

/// Delays between network calls and per-request timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub enrich_delay: Duration,
    pub score_delay: Duration,
    pub collector_timeout: Duration,
    pub page_timeout: Duration,
    pub llm_timeout: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            enrich_delay: Duration::from_secs(2),
            score_delay: Duration::from_secs(1),
            collector_timeout: Duration::from_secs(15),
            page_timeout: Duration::from_secs(10),
            llm_timeout: Duration::from_secs(30),
        }
    }
}

impl Pacing {
    /// No delays; timeouts unchanged
    pub fn none() -> Self {
        Self {
            enrich_delay: Duration::ZERO,
            score_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

// Credentials stay out of logs.
impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("email", &self.email)
            .field("password", &redact(&self.password))
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

impl std::fmt::Debug for ScoringConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringConfig")
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

impl DigestConfig {
    /// Load configuration from the process environment (and an optional `.env` file)
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            app_log!(info, "Loaded environment overrides from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let min_match_score = match lookup("MIN_MATCH_SCORE") {
            Some(raw) => parse_min_score(&raw)?,
            None => DEFAULT_MIN_MATCH_SCORE,
        };

        let port = var("SMTP_PORT", &DEFAULT_SMTP_PORT.to_string());
        let port = port
            .trim()
            .parse::<u16>()
            .with_context(|| format!("SMTP_PORT must be a valid port number, got '{}'", port))?;

        Ok(Self {
            keywords: var("JOB_KEYWORDS", DEFAULT_KEYWORDS),
            location: var("JOB_LOCATION", DEFAULT_LOCATION),
            min_match_score,
            resume_text: var("RESUME_TEXT", ""),
            smtp: SmtpConfig {
                email: var("YOUR_EMAIL", ""),
                password: var("GMAIL_APP_PASSWORD", ""),
                host: var("SMTP_HOST", DEFAULT_SMTP_HOST),
                port,
            },
            scoring: ScoringConfig {
                api_key: var("ANTHROPIC_API_KEY", ""),
                model: var("ANTHROPIC_MODEL", DEFAULT_MODEL),
            },
            pacing: Pacing::default(),
        })
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_min_match_score(mut self, score: u8) -> Self {
        self.min_match_score = score.min(100);
        self
    }

    pub fn query(&self) -> JobQuery {
        JobQuery::new(&self.keywords, &self.location)
    }

    /// Warn about settings that will make the run useless without aborting it
    pub fn log_warnings(&self) {
        if self.resume_text.trim().is_empty() {
            app_log!(warn, "RESUME_TEXT is empty; scores will not reflect a resume");
        }
        if self.scoring.api_key.is_empty() {
            app_log!(warn, "ANTHROPIC_API_KEY is empty; every job will fall back to manual review");
        }
        if self.smtp.email.is_empty() {
            app_log!(warn, "YOUR_EMAIL is empty; delivery will fail");
        }
    }
}

fn parse_min_score(raw: &str) -> Result<u8> {
    let score = raw
        .trim()
        .parse::<i64>()
        .with_context(|| format!("MIN_MATCH_SCORE must be an integer, got '{}'", raw))?;
    if !(0..=100).contains(&score) {
        anyhow::bail!("MIN_MATCH_SCORE must be between 0 and 100, got {}", score);
    }
    Ok(score as u8)
}

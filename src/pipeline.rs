// src/pipeline.rs
//! One digest run: collect → dedupe → enrich → score → rank → render → send

use anyhow::Result;
use chrono::{Local, NaiveDate};

use crate::app_log;
use crate::collectors::{collect_all, default_collectors, JobCollector};
use crate::config::DigestConfig;
use crate::digest::{digest_subject, render_digest};
use crate::enricher::{enrich_descriptions, DescriptionSource, HttpDescriptionFetcher};
use crate::mailer::{DigestSender, SmtpMailer};
use crate::ranking::{deduplicate, filter_and_rank};
use crate::scoring::{ClaudeBackend, JobScorer};
use crate::types::ScoredJob;

/// Counts reported at the end of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub collected: usize,
    pub unique: usize,
    pub matched: usize,
}

pub struct DigestPipeline {
    config: DigestConfig,
    collectors: Vec<Box<dyn JobCollector>>,
    descriptions: Box<dyn DescriptionSource>,
    scorer: JobScorer,
    sender: Box<dyn DigestSender>,
}

impl DigestPipeline {
    pub fn new(
        config: DigestConfig,
        collectors: Vec<Box<dyn JobCollector>>,
        descriptions: Box<dyn DescriptionSource>,
        scorer: JobScorer,
        sender: Box<dyn DigestSender>,
    ) -> Self {
        Self {
            config,
            collectors,
            descriptions,
            scorer,
            sender,
        }
    }

    /// Wire up the live job boards, Claude and SMTP
    pub fn from_config(config: DigestConfig) -> Result<Self> {
        let pacing = config.pacing;
        let collectors = default_collectors(pacing.collector_timeout)?;
        let descriptions = HttpDescriptionFetcher::new(pacing.page_timeout)?;
        let backend = ClaudeBackend::new(
            &config.scoring.api_key,
            &config.scoring.model,
            pacing.llm_timeout,
        )?;
        let sender = SmtpMailer::new(config.smtp.clone());

        Ok(Self::new(
            config,
            collectors,
            Box::new(descriptions),
            JobScorer::new(Box::new(backend)),
            Box::new(sender),
        ))
    }

    pub async fn run(&self) -> Result<RunSummary> {
        self.run_on(Local::now().date_naive()).await
    }

    /// Run with an explicit digest date
    pub async fn run_on(&self, date: NaiveDate) -> Result<RunSummary> {
        let config = &self.config;
        app_log!(info, "Job search starting");
        app_log!(info, "Keywords : {}", config.keywords);
        app_log!(info, "Location : {}", config.location);
        app_log!(info, "Min Score: {}%", config.min_match_score);

        let collected = collect_all(&self.collectors, &config.query()).await;
        let collected_count = collected.len();

        let unique = deduplicate(collected);
        let unique_count = unique.len();
        app_log!(info, "Total unique jobs: {} (from {})", unique_count, collected_count);

        app_log!(info, "Fetching full job descriptions...");
        let enriched =
            enrich_descriptions(unique, self.descriptions.as_ref(), config.pacing.enrich_delay)
                .await;

        app_log!(info, "Scoring jobs...");
        let scored = self
            .scorer
            .score_all(
                enriched,
                &config.resume_text,
                &config.keywords,
                config.pacing.score_delay,
            )
            .await;

        let matches = self.rank(scored);

        let html = render_digest(&matches, unique_count, date)?;
        let subject = digest_subject(matches.len(), date);
        app_log!(info, "Sending email digest...");
        self.sender.send(&subject, &html).await?;

        Ok(RunSummary {
            collected: collected_count,
            unique: unique_count,
            matched: matches.len(),
        })
    }

    fn rank(&self, scored: Vec<ScoredJob>) -> Vec<ScoredJob> {
        let threshold = self.config.min_match_score;
        for job in scored.iter().filter(|job| job.match_score() < threshold) {
            app_log!(
                info,
                "Below threshold, skipping: {} ({}%)",
                job.posting.label(),
                job.match_score()
            );
        }
        let matches = filter_and_rank(scored, threshold);
        app_log!(info, "{} jobs passed the threshold", matches.len());
        for job in &matches {
            match serde_json::to_string(job) {
                Ok(json) => app_log!(debug, "Match: {}", json),
                Err(e) => app_log!(warn, "Could not serialize match {}: {}", job.posting.label(), e),
            }
        }
        matches
    }
}

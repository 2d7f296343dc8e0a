// src/collectors/mod.rs
//! Job board collectors. Each source sits behind `JobCollector` so a broken
//! board only ever costs its own postings.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::app_log;
use crate::types::{JobPosting, JobQuery, JobSource};

pub mod indeed;
pub mod linkedin;
pub mod remoteok;

pub use indeed::IndeedCollector;
pub use linkedin::LinkedInCollector;
pub use remoteok::RemoteOkCollector;

pub const MAX_JOBS_PER_SOURCE: usize = 20;

pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[async_trait]
pub trait JobCollector: Send + Sync {
    fn source(&self) -> JobSource;

    async fn collect(&self, query: &JobQuery) -> Result<Vec<JobPosting>>;
}

/// Shared HTTP client setup for scraping
pub fn build_http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .context("Failed to create HTTP client")
}

/// GET a page and return its body, treating non-2xx as an error
pub async fn fetch_text(client: &Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch {}", url))?;

    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("HTTP error {} from {}", status, url);
    }

    response
        .text()
        .await
        .context("Failed to read response body")
}

/// The production collectors, in the order they run
pub fn default_collectors(timeout: Duration) -> Result<Vec<Box<dyn JobCollector>>> {
    let client = build_http_client(timeout)?;
    Ok(vec![
        Box::new(RemoteOkCollector::new(client.clone())),
        Box::new(IndeedCollector::new(client.clone())),
        Box::new(LinkedInCollector::new(client)),
    ])
}

/// Run every collector in turn. A failing source contributes nothing.
pub async fn collect_all(collectors: &[Box<dyn JobCollector>], query: &JobQuery) -> Vec<JobPosting> {
    let mut all_jobs = Vec::new();

    for collector in collectors {
        let source = collector.source();
        app_log!(info, "Scraping {}...", source);

        match collector.collect(query).await {
            Ok(mut jobs) => {
                jobs.truncate(MAX_JOBS_PER_SOURCE);
                app_log!(info, "Found {} jobs on {}", jobs.len(), source);
                all_jobs.extend(jobs);
            }
            Err(e) => {
                app_log!(error, "{} error: {:#}", source, e);
            }
        }
    }

    all_jobs
}

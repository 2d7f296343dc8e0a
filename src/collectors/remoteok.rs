// src/collectors/remoteok.rs
//! RemoteOK exposes a public JSON feed, so no markup scraping is needed here.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use super::{fetch_text, JobCollector, MAX_JOBS_PER_SOURCE};
use crate::types::{JobPosting, JobQuery, JobSource};
use crate::utils::{html_to_text, truncate_chars};

const API_URL: &str = "https://remoteok.com/api";
const FEED_DESCRIPTION_CHARS: usize = 2000;

pub struct RemoteOkCollector {
    client: Client,
}

#[derive(Debug, Deserialize)]
struct Listing {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    position: Option<String>,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    salary: Option<serde_json::Value>,
    #[serde(default)]
    salary_min: Option<serde_json::Value>,
    #[serde(default)]
    salary_max: Option<serde_json::Value>,
}

impl RemoteOkCollector {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn feed_url(keywords: &str) -> Result<Url> {
        let tag = keywords.trim().replace(' ', "-");
        Url::parse_with_params(API_URL, &[("tag", tag)]).context("Failed to build RemoteOK URL")
    }

    /// Parse the API body. The first array element is a legal notice, not a job;
    /// the cap applies to the raw entries that follow it.
    pub fn parse_feed(body: &str) -> Result<Vec<JobPosting>> {
        let entries: Vec<serde_json::Value> =
            serde_json::from_str(body).context("RemoteOK returned invalid JSON")?;

        let jobs = entries
            .into_iter()
            .skip(1)
            .take(MAX_JOBS_PER_SOURCE)
            .filter_map(|entry| serde_json::from_value::<Listing>(entry).ok())
            .filter_map(Self::to_posting)
            .collect();

        Ok(jobs)
    }

    fn to_posting(listing: Listing) -> Option<JobPosting> {
        let title = non_empty(listing.position)?;
        let company = non_empty(listing.company).unwrap_or_else(|| "Unknown".to_string());
        let location = non_empty(listing.location).unwrap_or_else(|| "Remote".to_string());

        let description = listing
            .description
            .map(|html| truncate_chars(&html_to_text(&html), FEED_DESCRIPTION_CHARS))
            .unwrap_or_default();

        let url = non_empty(listing.url).unwrap_or_else(|| {
            let id = match listing.id {
                Some(serde_json::Value::String(s)) => s,
                Some(serde_json::Value::Number(n)) => n.to_string(),
                _ => String::new(),
            };
            format!("https://remoteok.com/remote-jobs/{}", id)
        });

        let salary = non_empty(listing.salary.and_then(|v| v.as_str().map(str::to_string)))
            .or_else(|| salary_range(amount(listing.salary_min), amount(listing.salary_max)));

        Some(
            JobPosting::new(&title, &company, JobSource::RemoteOk)
                .with_location(&location)
                .with_description(&description)
                .with_url(&url)
                .with_salary(salary),
        )
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn amount(value: Option<serde_json::Value>) -> Option<u64> {
    value.and_then(|v| v.as_f64()).map(|f| f as u64)
}

fn salary_range(min: Option<u64>, max: Option<u64>) -> Option<String> {
    match (min.filter(|v| *v > 0), max.filter(|v| *v > 0)) {
        (Some(lo), Some(hi)) if lo != hi => Some(format!("${} - ${}", lo, hi)),
        (Some(v), _) | (None, Some(v)) => Some(format!("${}", v)),
        (None, None) => None,
    }
}

#[async_trait]
impl JobCollector for RemoteOkCollector {
    fn source(&self) -> JobSource {
        JobSource::RemoteOk
    }

    async fn collect(&self, query: &JobQuery) -> Result<Vec<JobPosting>> {
        let url = Self::feed_url(&query.keywords)?;
        let body = fetch_text(&self.client, url.as_str()).await?;
        Self::parse_feed(&body)
    }
}

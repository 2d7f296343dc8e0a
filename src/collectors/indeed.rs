// src/collectors/indeed.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use scraper::Html;

use super::{fetch_text, JobCollector, MAX_JOBS_PER_SOURCE};
use crate::types::{JobPosting, JobQuery, JobSource};
use crate::utils::{select_attr, select_text, selector};

const SEARCH_URL: &str = "https://www.indeed.com/jobs";
const BASE_URL: &str = "https://indeed.com";

const CARD_SELECTORS: [&str; 2] = [".job_seen_beacon", "[data-jk]"];
const TITLE_SELECTOR: &str = ".jobTitle span, h2.jobTitle";
const COMPANY_SELECTOR: &str = ".companyName, [data-testid='company-name']";
const LOCATION_SELECTOR: &str = ".companyLocation, [data-testid='text-location']";
const LINK_SELECTOR: &str = "a[href*='/rc/clk'], a[id*='job_']";

pub struct IndeedCollector {
    client: Client,
}

impl IndeedCollector {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Search restricted to postings from the last 24 hours
    pub fn search_url(query: &JobQuery) -> Result<Url> {
        Url::parse_with_params(
            SEARCH_URL,
            &[
                ("q", query.keywords.as_str()),
                ("l", query.location.as_str()),
                ("fromage", "1"),
            ],
        )
        .context("Failed to build Indeed URL")
    }

    /// Extract job cards from a results page. Cards without a title are dropped.
    pub fn parse_results(html: &str, fallback_location: &str) -> Vec<JobPosting> {
        let document = Html::parse_document(html);

        // First selector that yields any card wins
        let cards = CARD_SELECTORS
            .iter()
            .filter_map(|css| selector(css))
            .map(|sel| document.select(&sel).collect::<Vec<_>>())
            .find(|cards| !cards.is_empty())
            .unwrap_or_default();

        cards
            .iter()
            .take(MAX_JOBS_PER_SOURCE)
            .filter_map(|card| {
                let title = select_text(card, TITLE_SELECTOR)?;
                let company =
                    select_text(card, COMPANY_SELECTOR).unwrap_or_else(|| "Unknown".to_string());
                let location = select_text(card, LOCATION_SELECTOR)
                    .unwrap_or_else(|| fallback_location.to_string());
                let url = select_attr(card, LINK_SELECTOR, "href")
                    .map(|href| absolute_url(&href))
                    .unwrap_or_default();

                Some(
                    JobPosting::new(&title, &company, JobSource::Indeed)
                        .with_location(&location)
                        .with_url(&url),
                )
            })
            .collect()
    }
}

fn absolute_url(href: &str) -> String {
    if href.starts_with('/') {
        format!("{}{}", BASE_URL, href)
    } else {
        href.to_string()
    }
}

#[async_trait]
impl JobCollector for IndeedCollector {
    fn source(&self) -> JobSource {
        JobSource::Indeed
    }

    async fn collect(&self, query: &JobQuery) -> Result<Vec<JobPosting>> {
        let url = Self::search_url(query)?;
        let html = fetch_text(&self.client, url.as_str()).await?;
        Ok(Self::parse_results(&html, &query.location))
    }
}

// src/collectors/linkedin.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use scraper::Html;

use super::{fetch_text, JobCollector, MAX_JOBS_PER_SOURCE};
use crate::types::{JobPosting, JobQuery, JobSource};
use crate::utils::{select_attr, select_text, selector};

const SEARCH_URL: &str = "https://www.linkedin.com/jobs/search/";

const CARD_SELECTOR: &str = ".jobs-search__results-list li, .base-card";
const TITLE_SELECTOR: &str = ".base-search-card__title, h3.base-search-card__title";
const COMPANY_SELECTOR: &str = ".base-search-card__subtitle, a.hidden-nested-link";
const LOCATION_SELECTOR: &str = ".job-search-card__location";
const LINK_SELECTOR: &str = "a.base-card__full-link, a[href*='linkedin.com/jobs/view']";

pub struct LinkedInCollector {
    client: Client,
}

impl LinkedInCollector {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Public guest search, last 24 hours, first page
    pub fn search_url(query: &JobQuery) -> Result<Url> {
        Url::parse_with_params(
            SEARCH_URL,
            &[
                ("keywords", query.keywords.as_str()),
                ("location", query.location.as_str()),
                ("f_TPR", "r86400"),
                ("position", "1"),
                ("pageNum", "0"),
            ],
        )
        .context("Failed to build LinkedIn URL")
    }

    pub fn parse_results(html: &str, fallback_location: &str) -> Vec<JobPosting> {
        let document = Html::parse_document(html);
        let Some(card_selector) = selector(CARD_SELECTOR) else {
            return Vec::new();
        };

        // `li` and `.base-card` often match the same card twice; cards nested in an
        // already-matched card are skipped so each posting is read once.
        let mut cards: Vec<scraper::ElementRef> = Vec::new();
        for card in document.select(&card_selector) {
            let nested = card
                .ancestors()
                .any(|ancestor| cards.iter().any(|seen| seen.id() == ancestor.id()));
            if !nested {
                cards.push(card);
            }
        }

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
                    .map(|href| strip_query(&href))
                    .unwrap_or_default();

                Some(
                    JobPosting::new(&title, &company, JobSource::LinkedIn)
                        .with_location(&location)
                        .with_url(&url),
                )
            })
            .collect()
    }
}

fn strip_query(href: &str) -> String {
    href.split('?').next().unwrap_or_default().to_string()
}

#[async_trait]
impl JobCollector for LinkedInCollector {
    fn source(&self) -> JobSource {
        JobSource::LinkedIn
    }

    async fn collect(&self, query: &JobQuery) -> Result<Vec<JobPosting>> {
        let url = Self::search_url(query)?;
        let html = fetch_text(&self.client, url.as_str()).await?;
        Ok(Self::parse_results(&html, &query.location))
    }
}

// src/types/job.rs
use serde::Serialize;
use std::fmt;

/// One tag per collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum JobSource {
    #[serde(rename = "RemoteOK")]
    RemoteOk,
    Indeed,
    LinkedIn,
}

impl JobSource {
    pub fn display_name(&self) -> &'static str {
        match self {
            JobSource::RemoteOk => "RemoteOK",
            JobSource::Indeed => "Indeed",
            JobSource::LinkedIn => "LinkedIn",
        }
    }
}

impl fmt::Display for JobSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A raw posting as produced by a collector.
///
/// `title` and `company` are always populated; collectors drop cards without a
/// title and substitute `"Unknown"` for a missing company.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobPosting {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String, // empty until enriched
    pub url: String,
    pub source: JobSource,
    pub salary: Option<String>,
}

impl JobPosting {
    pub fn new(title: &str, company: &str, source: JobSource) -> Self {
        Self {
            title: title.to_string(),
            company: company.to_string(),
            location: String::new(),
            description: String::new(),
            url: String::new(),
            source,
            salary: None,
        }
    }

    pub fn with_location(mut self, location: &str) -> Self {
        self.location = location.to_string();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self
    }

    pub fn with_salary(mut self, salary: Option<String>) -> Self {
        self.salary = salary.filter(|s| !s.trim().is_empty());
        self
    }

    /// Identity used for deduplication: exact, case-insensitive title + company.
    pub fn dedup_key(&self) -> String {
        format!("{}|{}", self.title.to_lowercase(), self.company.to_lowercase())
    }

    /// Whether the enricher should fetch a full description for this posting.
    pub fn needs_description(&self) -> bool {
        self.source != JobSource::RemoteOk && self.description.is_empty()
    }

    /// Short label used in progress logs
    pub fn label(&self) -> String {
        format!("{} @ {}", self.title, self.company)
    }
}

/// What the collectors search for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobQuery {
    pub keywords: String,
    pub location: String,
}

impl JobQuery {
    pub fn new(keywords: &str, location: &str) -> Self {
        Self {
            keywords: keywords.to_string(),
            location: location.to_string(),
        }
    }
}

// src/enricher.rs
//! Fills in long-form descriptions for postings the collectors left empty

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Node};
use std::time::Duration;

use crate::app_log;
use crate::collectors::{build_http_client, fetch_text};
use crate::types::{JobPosting, JobSource};
use crate::utils::{clean_text, element_text, selector, truncate_chars};

pub const MAX_DESCRIPTION_CHARS: usize = 2500;

const SKIPPED_TAGS: [&str; 5] = ["script", "style", "nav", "header", "footer"];

#[async_trait]
pub trait DescriptionSource: Send + Sync {
    async fn fetch_description(&self, posting: &JobPosting) -> Result<String>;
}

pub struct HttpDescriptionFetcher {
    client: Client,
}

impl HttpDescriptionFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
        })
    }
}

#[async_trait]
impl DescriptionSource for HttpDescriptionFetcher {
    async fn fetch_description(&self, posting: &JobPosting) -> Result<String> {
        if posting.url.is_empty() {
            return Ok(String::new());
        }
        let html = fetch_text(&self.client, &posting.url).await?;
        Ok(extract_description(&html, posting.source))
    }
}

fn source_selectors(source: JobSource) -> &'static [&'static str] {
    match source {
        JobSource::LinkedIn => &[".description__text", ".show-more-less-html__markup"],
        JobSource::Indeed => &["#jobDescriptionText", ".jobsearch-jobDescriptionText"],
        JobSource::RemoteOk => &[".description"],
    }
}

/// Pull the description out of a job page: source-specific containers first,
/// then the page's visible text minus scripts and navigation chrome.
pub fn extract_description(html: &str, source: JobSource) -> String {
    let document = Html::parse_document(html);

    for css in source_selectors(source) {
        if let Some(sel) = selector(css) {
            if let Some(element) = document.select(&sel).next() {
                return truncate_chars(&element_text(&element), MAX_DESCRIPTION_CHARS);
            }
        }
    }

    let root = selector("body")
        .and_then(|sel| document.select(&sel).next())
        .unwrap_or_else(|| document.root_element());

    let mut parts = Vec::new();
    for node in root.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| SKIPPED_TAGS.contains(&el.name()))
        });
        if !hidden {
            parts.push(&**text);
        }
    }

    truncate_chars(&clean_text(&parts.join(" ")), MAX_DESCRIPTION_CHARS)
}

/// Fetch descriptions for every non-RemoteOK posting that lacks one, pausing
/// `delay` before each request. Failures leave the description empty.
pub async fn enrich_descriptions(
    mut postings: Vec<JobPosting>,
    source: &dyn DescriptionSource,
    delay: Duration,
) -> Vec<JobPosting> {
    let total = postings.len();

    for (i, posting) in postings.iter_mut().enumerate() {
        if !posting.needs_description() || posting.url.is_empty() {
            continue;
        }

        app_log!(info, "[{}/{}] {}", i + 1, total, posting.label());
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match source.fetch_description(posting).await {
            Ok(description) => {
                posting.description = truncate_chars(&description, MAX_DESCRIPTION_CHARS);
            }
            Err(e) => {
                app_log!(warn, "Could not fetch description for {}: {:#}", posting.label(), e);
            }
        }
    }

    postings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct ScriptedSource {
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedSource {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl DescriptionSource for ScriptedSource {
        async fn fetch_description(&self, posting: &JobPosting) -> Result<String> {
            self.calls.lock().unwrap().push(posting.url.clone());
            if posting.url.contains("broken") {
                anyhow::bail!("connection refused");
            }
            Ok(format!("Full text for {}", posting.title))
        }
    }

    #[test]
    fn test_extract_source_specific() {
        let html = r#"<html><body><nav>Menu</nav>
            <div id="jobDescriptionText"><p>We need a <b>Rust</b> engineer.</p></div>
            </body></html>"#;
        assert_eq!(
            extract_description(html, JobSource::Indeed),
            "We need a Rust engineer."
        );
    }

    #[test]
    fn test_extract_linkedin_second_selector() {
        let html = r#"<div class="show-more-less-html__markup">Own the payments stack.</div>"#;
        assert_eq!(
            extract_description(html, JobSource::LinkedIn),
            "Own the payments stack."
        );
    }

    #[test]
    fn test_extract_falls_back_to_body_text() {
        let html = r#"<html><head><title>Job</title><style>p { color: red }</style></head>
            <body>
              <header>Site header</header>
              <nav>Jobs | Companies</nav>
              <main><h1>Platform Engineer</h1><p>Kubernetes and Go.</p></main>
              <script>var tracking = 1;</script>
              <footer>© 2024</footer>
            </body></html>"#;
        assert_eq!(
            extract_description(html, JobSource::LinkedIn),
            "Platform Engineer Kubernetes and Go."
        );
    }

    #[test]
    fn test_extract_truncates() {
        let long = "word ".repeat(2000);
        let html = format!(r#"<div class="description">{}</div>"#, long);
        let text = extract_description(&html, JobSource::RemoteOk);
        assert_eq!(text.chars().count(), MAX_DESCRIPTION_CHARS);
    }

    #[tokio::test]
    async fn test_enrich_only_missing_non_remoteok() {
        let postings = vec![
            JobPosting::new("Remote", "A", JobSource::RemoteOk).with_url("https://r/1"),
            JobPosting::new("Indeed", "B", JobSource::Indeed).with_url("https://i/1"),
            JobPosting::new("Done", "C", JobSource::LinkedIn)
                .with_url("https://l/1")
                .with_description("Already there"),
            JobPosting::new("NoUrl", "D", JobSource::LinkedIn),
        ];
        let source = ScriptedSource::new();
        let enriched = enrich_descriptions(postings, &source, Duration::ZERO).await;

        assert_eq!(*source.calls.lock().unwrap(), vec!["https://i/1".to_string()]);
        assert_eq!(enriched[0].description, "");
        assert_eq!(enriched[1].description, "Full text for Indeed");
        assert_eq!(enriched[2].description, "Already there");
        assert_eq!(enriched[3].description, "");
    }

    #[tokio::test]
    async fn test_enrich_failure_is_isolated() {
        let postings = vec![
            JobPosting::new("First", "A", JobSource::Indeed).with_url("https://broken/1"),
            JobPosting::new("Second", "B", JobSource::LinkedIn).with_url("https://ok/2"),
        ];
        let enriched = enrich_descriptions(postings, &ScriptedSource::new(), Duration::ZERO).await;
        assert_eq!(enriched[0].description, "");
        assert_eq!(enriched[1].description, "Full text for Second");
    }

    #[tokio::test(start_paused = true)]
    async fn test_enrich_waits_between_requests() {
        let postings = vec![
            JobPosting::new("One", "A", JobSource::Indeed).with_url("https://i/1"),
            JobPosting::new("Two", "B", JobSource::Indeed).with_url("https://i/2"),
            JobPosting::new("Three", "C", JobSource::LinkedIn).with_url("https://l/3"),
        ];
        let start = tokio::time::Instant::now();
        enrich_descriptions(postings, &ScriptedSource::new(), Duration::from_secs(2)).await;
        assert!(start.elapsed() >= Duration::from_secs(6));
    }
}

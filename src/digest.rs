// src/digest.rs
//! HTML digest email rendering

use anyhow::{Context, Result};
use askama::Template;
use chrono::NaiveDate;

use crate::types::{JobSource, ScoredJob};

const SOURCES: [JobSource; 3] = [JobSource::LinkedIn, JobSource::Indeed, JobSource::RemoteOk];

#[derive(Template)]
#[template(path = "digest.html")]
struct DigestTemplate {
    date: String,
    match_count: usize,
    total_scraped: usize,
    sources: String,
    rows: Vec<DigestRow>,
    has_rows: bool,
}

struct DigestRow {
    url: String,
    title: String,
    company: String,
    location: String,
    source: String,
    salary: String,
    has_salary: bool,
    score: u8,
    color: &'static str,
    recommendation: String,
    match_reasons: String,
    skills: String,
    missing_skills: String,
    has_missing_skills: bool,
    cover_letter_hook: String,
}

impl From<&ScoredJob> for DigestRow {
    fn from(job: &ScoredJob) -> Self {
        let posting = &job.posting;
        let assessment = &job.assessment;
        let salary = posting.salary.clone().unwrap_or_default();
        let skills = if assessment.top_matching_skills.trim().is_empty() {
            "N/A".to_string()
        } else {
            assessment.top_matching_skills.clone()
        };

        Self {
            url: posting.url.clone(),
            title: posting.title.clone(),
            company: posting.company.clone(),
            location: posting.location.clone(),
            source: posting.source.to_string(),
            has_salary: !salary.is_empty(),
            salary,
            score: assessment.match_score,
            color: score_color(assessment.match_score),
            recommendation: assessment.recommendation.to_string(),
            match_reasons: assessment.match_reasons.clone(),
            skills,
            has_missing_skills: !assessment.missing_skills.trim().is_empty(),
            missing_skills: assessment.missing_skills.clone(),
            cover_letter_hook: assessment.cover_letter_hook.clone(),
        }
    }
}

/// Badge colour: green from 80, amber from 60, red below
pub fn score_color(score: u8) -> &'static str {
    match score {
        80.. => "#27ae60",
        60..=79 => "#f39c12",
        _ => "#e74c3c",
    }
}

/// Render the ranked matches. An empty slice renders the explicit no-match row.
pub fn render_digest(jobs: &[ScoredJob], total_scraped: usize, date: NaiveDate) -> Result<String> {
    let rows: Vec<DigestRow> = jobs.iter().map(DigestRow::from).collect();
    let template = DigestTemplate {
        date: date.format("%B %d, %Y").to_string(),
        match_count: jobs.len(),
        total_scraped,
        sources: SOURCES
            .iter()
            .map(JobSource::display_name)
            .collect::<Vec<_>>()
            .join(", "),
        has_rows: !rows.is_empty(),
        rows,
    };

    template.render().context("Failed to render digest template")
}

pub fn digest_subject(match_count: usize, date: NaiveDate) -> String {
    format!(
        "🎯 {} Job Matches Today — {}",
        match_count,
        date.format("%b %d, %Y")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{JobPosting, MatchAssessment, Recommendation};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    fn scored(title: &str, score: u8) -> ScoredJob {
        let posting = JobPosting::new(title, "Acme", JobSource::Indeed)
            .with_location("Remote")
            .with_url("https://indeed.com/rc/clk?jk=1");
        let assessment = MatchAssessment {
            match_score: score,
            keyword_match: 50,
            recommendation: Recommendation::StrongMatch,
            match_reasons: "Good overlap.".to_string(),
            top_matching_skills: "Rust".to_string(),
            missing_skills: String::new(),
            cover_letter_hook: "Hello there.".to_string(),
        };
        ScoredJob::new(posting, assessment)
    }

    #[test]
    fn test_score_color() {
        assert_eq!(score_color(100), "#27ae60");
        assert_eq!(score_color(80), "#27ae60");
        assert_eq!(score_color(79), "#f39c12");
        assert_eq!(score_color(60), "#f39c12");
        assert_eq!(score_color(59), "#e74c3c");
        assert_eq!(score_color(0), "#e74c3c");
    }

    #[test]
    fn test_render_rows() {
        let html = render_digest(&[scored("Rust Engineer", 85), scored("Go Engineer", 65)], 18, date())
            .unwrap();
        assert!(html.contains("March 05, 2024"));
        assert!(html.contains("2 matches from 18 jobs scraped"));
        assert!(html.contains("Rust Engineer"));
        assert!(html.contains("85%"));
        assert!(html.contains("Strong Match"));
        assert!(html.contains("#27ae60"));
        assert!(html.contains("#f39c12"));
        assert!(!html.contains("No jobs matched"));
        assert!(!html.contains("Missing:"));
        assert!(!html.contains("💰"));
        assert!(html.contains("Sources: LinkedIn, Indeed, RemoteOK"));
        assert!(html.contains("Runs daily at 5 AM"));
    }

    #[test]
    fn test_render_empty_state() {
        let html = render_digest(&[], 12, date()).unwrap();
        assert!(html.contains("0 matches from 12 jobs scraped"));
        assert!(html.contains("No jobs matched your minimum score today"));
        assert!(html.contains("Sources: LinkedIn, Indeed, RemoteOK"));
    }

    #[test]
    fn test_render_optional_fields_and_escaping() {
        let mut job = scored("<script>alert(1)</script>", 90);
        job.posting.salary = Some("$120k".to_string());
        job.assessment.missing_skills = "Kubernetes".to_string();
        job.assessment.top_matching_skills = String::new();
        job.posting.url = r#"https://x/?a=1&b="2""#.to_string();

        let html = render_digest(&[job], 1, date()).unwrap();
        assert!(html.contains("💰 $120k"));
        assert!(html.contains("Kubernetes"));
        assert!(html.contains("<strong>Skills:</strong> N/A"));
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&#60;script&#62;alert(1)&#60;/script&#62;"));
        assert!(html.contains(r#"href="https://x/?a=1&#38;b=&#34;2&#34;""#));
        assert!(!html.contains(r#"b="2""#));
    }

    #[test]
    fn test_subject() {
        assert_eq!(digest_subject(3, date()), "🎯 3 Job Matches Today — Mar 05, 2024");
    }
}

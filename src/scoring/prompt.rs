// src/scoring/prompt.rs
use crate::types::JobPosting;
use crate::utils::truncate_chars;

pub const RESUME_PROMPT_CHARS: usize = 3500;
pub const DESCRIPTION_PROMPT_CHARS: usize = 2000;

/// Prompt asking for a bare JSON assessment of one posting against the resume
pub fn build_prompt(job: &JobPosting, resume_text: &str, keywords: &str) -> String {
    let description = if job.description.trim().is_empty() {
        "Not available".to_string()
    } else {
        truncate_chars(&job.description, DESCRIPTION_PROMPT_CHARS)
    };

    format!(
        r#"You are an expert career advisor. Analyze this job posting against the candidate's resume and keywords.

## CANDIDATE RESUME:
{resume}

## TARGET KEYWORDS:
{keywords}

## JOB POSTING:
Title: {title}
Company: {company}
Location: {location}
Source: {source}
Description: {description}

## YOUR TASK:
Return ONLY a valid JSON object with NO markdown, NO backticks, NO explanation:

{{
  "match_score": <integer 0-100>,
  "keyword_match": <integer 0-100>,
  "recommendation": "<Apply Now | Strong Match | Consider Applying | Low Match | Skip>",
  "match_reasons": "<2-3 sentence explanation>",
  "top_matching_skills": "<comma-separated skills that match>",
  "missing_skills": "<comma-separated important skills the candidate may lack>",
  "cover_letter_hook": "<one compelling opening sentence for a cover letter>"
}}"#,
        resume = truncate_chars(resume_text, RESUME_PROMPT_CHARS),
        keywords = keywords,
        title = job.title,
        company = job.company,
        location = job.location,
        source = job.source,
        description = description,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::JobSource;

    #[test]
    fn test_prompt_contains_job_and_resume() {
        let job = JobPosting::new("Rust Engineer", "Oxide", JobSource::RemoteOk)
            .with_location("Remote")
            .with_description("Hypervisors and firmware.");
        let prompt = build_prompt(&job, "Wrote a kernel", "rust, systems");

        assert!(prompt.contains("Title: Rust Engineer"));
        assert!(prompt.contains("Company: Oxide"));
        assert!(prompt.contains("Source: RemoteOK"));
        assert!(prompt.contains("Description: Hypervisors and firmware."));
        assert!(prompt.contains("Wrote a kernel"));
        assert!(prompt.contains("rust, systems"));
        assert!(prompt.contains("\"match_score\": <integer 0-100>"));
    }

    #[test]
    fn test_prompt_truncates_inputs() {
        let job = JobPosting::new("Dev", "Co", JobSource::Indeed).with_description(&"d".repeat(5000));
        let prompt = build_prompt(&job, &"r".repeat(9000), "kw");
        assert!(prompt.contains(&"r".repeat(RESUME_PROMPT_CHARS)));
        assert!(!prompt.contains(&"r".repeat(RESUME_PROMPT_CHARS + 1)));
        assert!(!prompt.contains(&"d".repeat(DESCRIPTION_PROMPT_CHARS + 1)));
    }

    #[test]
    fn test_prompt_missing_description() {
        let job = JobPosting::new("Dev", "Co", JobSource::Indeed);
        assert!(build_prompt(&job, "", "kw").contains("Description: Not available"));
    }
}

// src/types/assessment.rs
//! Match assessment returned by the scorer, and the scored job used for ranking

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::job::JobPosting;

/// Closed set of labels the model may answer with, plus the manual-review sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Recommendation {
    ApplyNow,
    StrongMatch,
    ConsiderApplying,
    LowMatch,
    Skip,
    #[default]
    ReviewManually,
}

impl Recommendation {
    pub const ALL: [Recommendation; 6] = [
        Recommendation::ApplyNow,
        Recommendation::StrongMatch,
        Recommendation::ConsiderApplying,
        Recommendation::LowMatch,
        Recommendation::Skip,
        Recommendation::ReviewManually,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::ApplyNow => "Apply Now",
            Recommendation::StrongMatch => "Strong Match",
            Recommendation::ConsiderApplying => "Consider Applying",
            Recommendation::LowMatch => "Low Match",
            Recommendation::Skip => "Skip",
            Recommendation::ReviewManually => "Review Manually",
        }
    }

    /// Unknown labels collapse to `ReviewManually`.
    pub fn from_label(label: &str) -> Self {
        let wanted = label.trim();
        Self::ALL
            .into_iter()
            .find(|r| r.label().eq_ignore_ascii_case(wanted))
            .unwrap_or_default()
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Recommendation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Recommendation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(label.map(|l| Self::from_label(&l)).unwrap_or_default())
    }
}

/// Structured answer from the scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchAssessment {
    #[serde(default, deserialize_with = "percentage")]
    pub match_score: u8,
    #[serde(default, deserialize_with = "percentage")]
    pub keyword_match: u8,
    #[serde(default)]
    pub recommendation: Recommendation,
    #[serde(default, deserialize_with = "lenient_text")]
    pub match_reasons: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub top_matching_skills: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub missing_skills: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub cover_letter_hook: String,
}

impl MatchAssessment {
    /// Assessment used whenever the scorer cannot produce a valid result.
    pub fn fallback() -> Self {
        Self {
            match_score: 0,
            keyword_match: 0,
            recommendation: Recommendation::ReviewManually,
            match_reasons: "Could not analyze.".to_string(),
            top_matching_skills: String::new(),
            missing_skills: String::new(),
            cover_letter_hook: String::new(),
        }
    }
}

/// Accepts integers, floats and numeric strings, clamped into 0..=100.
fn percentage<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    let number = match &value {
        serde_json::Value::Null => return Ok(0),
        serde_json::Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| de::Error::custom(format!("invalid score: {}", n)))?,
        serde_json::Value::String(s) => s
            .trim()
            .trim_end_matches('%')
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("invalid score: {}", s)))?,
        other => return Err(de::Error::custom(format!("invalid score: {}", other))),
    };
    Ok(number.round().clamp(0.0, 100.0) as u8)
}

/// Accepts strings, null, and arrays of strings (joined with ", ").
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        serde_json::Value::Array(items) => items
            .iter()
            .map(|item| match item {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    })
}

/// A posting paired with its assessment. Only this participates in ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredJob {
    #[serde(flatten)]
    pub posting: JobPosting,
    #[serde(flatten)]
    pub assessment: MatchAssessment,
}

impl ScoredJob {
    pub fn new(posting: JobPosting, assessment: MatchAssessment) -> Self {
        Self {
            posting,
            assessment,
        }
    }

    pub fn match_score(&self) -> u8 {
        self.assessment.match_score
    }
}

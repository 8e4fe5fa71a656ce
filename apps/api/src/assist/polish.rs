//! Offline polish: deterministic wording fixes that need no credential.
//!
//! Weak phrases are swapped for stronger action verbs on word boundaries,
//! case-insensitively. Experience text with no measurable result gets a
//! bracketed suggestion appended. An empty summary gets a template summary
//! built from the title, experience count and top skills.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::assist::{AssistError, TextTarget};
use crate::models::content::{ContentDocument, ProfileContent};
use crate::scoring::engine::METRIC_RE;

pub const METRICS_SUGGESTION: &str =
    " [AI Suggestion: Add metrics or percentages to strengthen impact]";

const GENERIC_SUMMARY: &str =
    "Dynamic professional with proven track record of delivering results.";

/// Applied in order; multi-word phrases come before the single words they contain.
const VERB_UPGRADES: &[(&str, &str)] = &[
    ("worked on", "spearheaded"),
    ("was responsible for", "managed"),
    ("helped", "facilitated"),
    ("made", "engineered"),
    ("did", "executed"),
    ("created", "developed"),
    ("used", "leveraged"),
    ("improved", "optimized"),
    ("changed", "transformed"),
    ("handled", "orchestrated"),
];

static VERB_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    VERB_UPGRADES
        .iter()
        .map(|(weak, strong)| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(weak));
            (
                Regex::new(&pattern).expect("verb pattern is valid"),
                *strong,
            )
        })
        .collect()
});

#[derive(Debug, Clone, Serialize)]
pub struct PolishOutcome {
    pub target: TextTarget,
    pub original: String,
    pub polished: String,
    pub changed: bool,
}

/// Swaps weak phrases for action verbs.
pub fn strengthen_verbs(text: &str) -> String {
    VERB_PATTERNS
        .iter()
        .fold(text.to_string(), |acc, (re, strong)| {
            re.replace_all(&acc, *strong).into_owned()
        })
}

/// Polishes a piece of experience text, flagging missing metrics.
pub fn polish_experience(text: &str) -> String {
    let mut polished = strengthen_verbs(text);
    if !METRIC_RE.is_match(&polished) {
        polished.push_str(METRICS_SUGGESTION);
    }
    polished
}

/// Template summary for profiles that have none yet.
pub fn template_summary(profile: &ProfileContent) -> String {
    let title = profile.personal.title.trim();
    if title.is_empty() {
        return GENERIC_SUMMARY.to_string();
    }
    let skills = profile.skill_items();
    let skills = if skills.is_empty() {
        "various skills".to_string()
    } else {
        skills.iter().take(3).copied().collect::<Vec<_>>().join(", ")
    };
    let years = if profile.experience.is_empty() {
        "multiple".to_string()
    } else {
        format!("{}+", profile.experience.len())
    };
    format!(
        "Results-driven {title} with {years} years of experience. Expertise in {skills}. \
         Proven ability to drive innovation and deliver exceptional outcomes."
    )
}

pub fn polish(
    content: &ContentDocument,
    target: TextTarget,
) -> Result<PolishOutcome, AssistError> {
    let original = target.read(content).ok_or_else(|| {
        AssistError::InvalidTarget(format!(
            "this {} has no {}",
            content.kind().key(),
            target.label()
        ))
    })?;

    let polished = match (target, content.profile()) {
        (TextTarget::Summary, Some(profile)) if original.trim().is_empty() => {
            template_summary(profile)
        }
        _ if original.trim().is_empty() => original.to_string(),
        (TextTarget::Experience { .. }, _) => polish_experience(original),
        _ => strengthen_verbs(original),
    };

    Ok(PolishOutcome {
        target,
        changed: polished != original,
        original: original.to_string(),
        polished,
    })
}

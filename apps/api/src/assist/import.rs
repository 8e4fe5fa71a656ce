//! Import: plain text to profile content.
//!
//! Two strategies:
//! - `Heuristic`: regex and keyword scanning, offline, best effort.
//! - `Ai`: the text-generation service fills a JSON shape; needs a credential.
//!
//! Both refuse input with fewer than `MIN_MEANINGFUL_CHARS` visible characters.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::assist::llm_client::{parse_json, TextGenerator};
use crate::assist::prompts::{fill_template, IMPORT_PROMPT_TEMPLATE, IMPORT_SYSTEM};
use crate::assist::{meaningful_chars, AssistError, MIN_MEANINGFUL_CHARS};
use crate::models::content::ProfileContent;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._-]+@[a-zA-Z0-9._-]+\.[a-zA-Z0-9._-]+")
        .expect("email pattern is valid")
});

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}")
        .expect("phone pattern is valid")
});

static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

const SKILLS_KEYWORD: &str = "skills";
const SKILLS_WINDOW: usize = 300;
const SUMMARY_KEYWORDS: &[&str] = &["summary", "profile", "about me"];
const SUMMARY_WINDOW: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportMode {
    #[default]
    Heuristic,
    Ai,
}

/// Rejects text that carries too little to import.
pub fn ensure_meaningful(text: &str) -> Result<(), AssistError> {
    if meaningful_chars(text) < MIN_MEANINGFUL_CHARS {
        return Err(AssistError::TextEmpty(
            "no readable text found; the file may be a scanned image".to_string(),
        ));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Heuristic
// ────────────────────────────────────────────────────────────────────────────

/// Best-effort extraction of contact details, name, skills and summary.
///
/// - email and phone: first match anywhere
/// - name: first non-blank line
/// - skills: up to 300 chars after the first "skills", newlines become commas
/// - summary: text after the first "summary" / "profile" / "about me" up to the
///   next blank line, capped at 500 chars
pub fn parse_resume_text(text: &str) -> ProfileContent {
    let mut profile = ProfileContent::default();
    // ASCII lowercasing keeps byte offsets aligned with `text`.
    let lower = text.to_ascii_lowercase();

    if let Some(m) = EMAIL_RE.find(text) {
        profile.personal.email = m.as_str().to_string();
    }
    if let Some(m) = PHONE_RE.find(text) {
        profile.personal.phone = m.as_str().trim().to_string();
    }
    if let Some(first) = text.lines().map(str::trim).find(|l| !l.is_empty()) {
        profile.personal.full_name = first.to_string();
    }

    if let Some(idx) = lower.find(SKILLS_KEYWORD) {
        let window = take_chars(&text[idx + SKILLS_KEYWORD.len()..], SKILLS_WINDOW);
        let joined = window.replace('\n', ", ");
        profile.skills = WHITESPACE_RE.replace_all(&joined, " ").trim().to_string();
    }

    let summary_start = SUMMARY_KEYWORDS
        .iter()
        .find_map(|k| lower.find(k).map(|idx| idx + k.len()));
    if let Some(start) = summary_start {
        let rest = &text[start..];
        let section = match rest.find("\n\n") {
            Some(end) => &rest[..end],
            None => take_chars(rest, SUMMARY_WINDOW),
        };
        profile.personal.summary = section.trim().to_string();
    }

    profile
}

/// Longest prefix of `s` holding at most `n` chars.
fn take_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// AI
// ────────────────────────────────────────────────────────────────────────────

pub async fn import_with_ai(
    generator: &dyn TextGenerator,
    credential: Option<&str>,
    text: &str,
) -> Result<ProfileContent, AssistError> {
    ensure_meaningful(text)?;
    let api_key = credential
        .filter(|k| !k.trim().is_empty())
        .ok_or(AssistError::MissingCredential)?;

    let prompt = fill_template(IMPORT_PROMPT_TEMPLATE, &[("text", text.trim())]);
    let raw = generator.generate(api_key, IMPORT_SYSTEM, &prompt).await?;

    let profile: ProfileContent = parse_json(&raw).map_err(|e| {
        warn!("AI import returned unparseable JSON: {e}");
        AssistError::Service(format!("structured extraction returned invalid JSON: {e}"))
    })?;

    info!(
        experience = profile.experience.len(),
        education = profile.education.len(),
        "AI import parsed"
    );
    Ok(profile)
}

/// Runs the requested strategy over `text`.
pub async fn import_text(
    mode: ImportMode,
    generator: &dyn TextGenerator,
    credential: Option<&str>,
    text: &str,
) -> Result<ProfileContent, AssistError> {
    match mode {
        ImportMode::Heuristic => {
            ensure_meaningful(text)?;
            Ok(parse_resume_text(text))
        }
        ImportMode::Ai => import_with_ai(generator, credential, text).await,
    }
}

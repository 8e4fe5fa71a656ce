// Prompt constants for the assist module.
// Templates use `{placeholder}` markers filled by `fill_template`.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([a-z_]+)\}").expect("placeholder pattern is valid"));

/// Fills every `{name}` marker of `template` in one pass. Substituted values
/// are never scanned again, so user text containing `{text}` stays literal.
/// Unknown markers are left as they are.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures| {
            values
                .iter()
                .find(|(name, _)| *name == &caps[1])
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

pub const REWRITE_SYSTEM: &str = "You are an expert resume and cover letter editor. \
    Rewrite the text you are given so it is concise, specific and written with strong \
    action verbs. Keep every fact the author stated and do NOT invent employers, \
    numbers, dates or achievements. Respond with the rewritten text only: no preamble, \
    no quotes, no markdown.";

pub const REWRITE_PROMPT_TEMPLATE: &str = "\
Rewrite this {label} for a {kind}.

Role context: {title}

Text:
{text}";

pub const SUMMARY_SYSTEM: &str = "You are an expert resume writer. Write a professional \
    summary of two to three sentences from the facts provided. Do NOT invent employers, \
    numbers or credentials. Respond with the summary text only.";

pub const SUMMARY_PROMPT_TEMPLATE: &str = "\
Write a professional summary.

Title: {title}
Experience:
{experience}
Skills: {skills}";

pub const IMPORT_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

pub const IMPORT_PROMPT_TEMPLATE: &str = r#"Extract the resume below into this JSON shape.
Use empty strings for anything not present. Do not invent content.

{
  "personal": {"full_name": "", "title": "", "email": "", "phone": "", "summary": ""},
  "experience": [{"role": "", "company": "", "start": "", "end": "", "description": ""}],
  "education": [{"school": "", "degree": "", "field": "", "year": ""}],
  "skills": "comma, separated, skills"
}

Resume:
{text}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_template_is_single_pass() {
        let prompt = fill_template(
            REWRITE_PROMPT_TEMPLATE,
            &[
                ("label", "summary"),
                ("kind", "resume"),
                ("title", "Engineer {text}"),
                ("text", "Shipped the {label} service."),
            ],
        );
        assert!(prompt.contains("Role context: Engineer {text}"));
        assert!(prompt.ends_with("Shipped the {label} service."));
        assert!(prompt.starts_with("Rewrite this summary for a resume."));
    }

    #[test]
    fn test_unknown_marker_is_kept() {
        assert_eq!(fill_template("a {b} {c}", &[("b", "x")]), "a x {c}");
    }
}

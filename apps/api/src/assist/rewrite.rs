//! AI rewrite of one piece of prose.
//!
//! The credential is checked before any network call. An empty summary is not
//! rewritten but generated from the title, experience and skills. If the model
//! hands back nothing usable the original text is kept.

use serde::Serialize;
use tracing::{info, warn};

use crate::assist::llm_client::TextGenerator;
use crate::assist::prompts::{
    fill_template, REWRITE_PROMPT_TEMPLATE, REWRITE_SYSTEM, SUMMARY_PROMPT_TEMPLATE,
    SUMMARY_SYSTEM,
};
use crate::assist::{AssistError, TextTarget};
use crate::models::content::{ContentDocument, ProfileContent};

#[derive(Debug, Clone, Serialize)]
pub struct RewriteOutcome {
    pub target: TextTarget,
    pub original: String,
    pub rewritten: String,
    /// False when the model returned nothing usable and the original was kept.
    pub changed: bool,
}

pub async fn rewrite(
    generator: &dyn TextGenerator,
    credential: Option<&str>,
    content: &ContentDocument,
    target: TextTarget,
) -> Result<RewriteOutcome, AssistError> {
    let original = target
        .read(content)
        .ok_or_else(|| {
            AssistError::InvalidTarget(format!(
                "this {} has no {}",
                content.kind().key(),
                target.label()
            ))
        })?
        .to_string();

    let api_key = credential
        .filter(|k| !k.trim().is_empty())
        .ok_or(AssistError::MissingCredential)?;

    let (system, prompt) = match (target, content.profile()) {
        (TextTarget::Summary, Some(profile)) if original.trim().is_empty() => {
            (SUMMARY_SYSTEM, summary_prompt(profile))
        }
        _ if original.trim().is_empty() => {
            return Err(AssistError::TextEmpty(format!(
                "the {} is empty; write a draft first",
                target.label()
            )));
        }
        _ => (REWRITE_SYSTEM, rewrite_prompt(content, target, &original)),
    };

    let generated = generator.generate(api_key, system, &prompt).await?;
    let generated = generated.trim();

    if generated.is_empty() {
        warn!(part = target.label(), "model returned empty text; keeping original");
        return Ok(RewriteOutcome {
            target,
            rewritten: original.clone(),
            original,
            changed: false,
        });
    }

    info!(part = target.label(), chars = generated.len(), "text rewritten");
    Ok(RewriteOutcome {
        target,
        original,
        rewritten: generated.to_string(),
        changed: true,
    })
}

fn rewrite_prompt(content: &ContentDocument, target: TextTarget, text: &str) -> String {
    let title = match content.profile() {
        Some(p) => p.personal.title.trim().to_string(),
        None => content
            .letter()
            .map(|l| l.content.subject.trim().to_string())
            .unwrap_or_default(),
    };
    let title = if title.is_empty() { "unspecified" } else { &title };
    fill_template(
        REWRITE_PROMPT_TEMPLATE,
        &[
            ("label", target.label()),
            ("kind", content.kind().key()),
            ("title", title),
            ("text", text.trim()),
        ],
    )
}

fn summary_prompt(profile: &ProfileContent) -> String {
    let experience = profile
        .experience
        .iter()
        .filter(|e| !e.role.trim().is_empty() || !e.company.trim().is_empty())
        .map(|e| format!("- {} at {}", e.role.trim(), e.company.trim()))
        .collect::<Vec<_>>()
        .join("\n");
    let skills = profile.skill_items().join(", ");
    fill_template(
        SUMMARY_PROMPT_TEMPLATE,
        &[
            ("title", profile.personal.title.trim()),
            ("experience", &experience),
            ("skills", &skills),
        ],
    )
}

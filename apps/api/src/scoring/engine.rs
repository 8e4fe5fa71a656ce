//! Scoring Engine: completeness score and recommendations from content alone.
//!
//! Total over every well-formed document: an all-empty document scores 0 and gets
//! the full recommendation list. Design and section order never influence the result.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::models::content::{split_skills, ContentDocument, Education, Experience, ProfileContent};
use crate::scoring::policy::{ScoringPolicy, Severity};

/// A number followed by `%`, or a number followed by a word.
pub(crate) static METRIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\d+%|\d+ [a-z]+").expect("metric pattern is valid"));

const REC_SUMMARY: &str = "Add a professional summary (at least 50 characters)";
const REC_LETTER_BODY: &str = "Write a letter body of at least 50 characters";
const REC_EXPERIENCE: &str = "Add work experience to strengthen your resume";
const REC_EXPERIENCE_DETAIL: &str =
    "Give every experience entry a role, company and a description longer than 30 characters";
const REC_EDUCATION: &str = "Include your educational background";
const REC_EDUCATION_DETAIL: &str = "Fill in school, degree and field for every education entry";
const REC_SKILLS: &str = "List more skills (aim for at least 5-10)";
const REC_SKILLS_MORE: &str = "Round out your skills list to 10 or more entries";
const REC_METRICS: &str = "Add quantifiable achievements (numbers, percentages) to experience";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreArea {
    Summary,
    Experience,
    Education,
    Skills,
    Metrics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub area: ScoreArea,
    pub severity: Severity,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreCategory {
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub score: u32,
    pub category: ScoreCategory,
    pub recommendations: Vec<String>,
    pub policy_version: String,
}

impl ScoreReport {
    /// Keeps only the first `n` recommendations.
    pub fn truncated(mut self, n: Option<usize>) -> Self {
        if let Some(n) = n {
            self.recommendations.truncate(n);
        }
        self
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring subject
// ────────────────────────────────────────────────────────────────────────────

/// The fields scoring reads, projected out of any document kind.
struct Subject<'a> {
    personal: [&'a str; 4],
    summary: &'a str,
    experience: &'a [Experience],
    education: &'a [Education],
    skills: &'a str,
    text_chars: usize,
    is_letter: bool,
}

impl<'a> Subject<'a> {
    fn of(content: &'a ContentDocument) -> Self {
        match content {
            ContentDocument::Resume(p) | ContentDocument::Cv(p) => Subject {
                personal: [
                    p.personal.full_name.as_str(),
                    p.personal.email.as_str(),
                    p.personal.phone.as_str(),
                    p.personal.title.as_str(),
                ],
                summary: &p.personal.summary,
                experience: &p.experience,
                education: &p.education,
                skills: &p.skills,
                text_chars: profile_text_chars(p),
                is_letter: false,
            },
            // Letters: sender block stands in for personal, body for summary.
            ContentDocument::CoverLetter(l) => Subject {
                personal: [
                    l.sender.full_name.as_str(),
                    l.sender.email.as_str(),
                    l.sender.phone.as_str(),
                    l.sender.address.as_str(),
                ],
                summary: &l.content.body,
                experience: &[],
                education: &[],
                skills: "",
                text_chars: [
                    &l.sender.full_name,
                    &l.sender.email,
                    &l.sender.phone,
                    &l.sender.address,
                    &l.recipient.name,
                    &l.recipient.title,
                    &l.recipient.company,
                    &l.recipient.address,
                    &l.content.subject,
                    &l.content.greeting,
                    &l.content.body,
                    &l.content.closing,
                ]
                .iter()
                .map(|s| s.chars().count())
                .sum(),
                is_letter: true,
            },
        }
    }
}

/// Characters across every text field of a profile.
fn profile_text_chars(p: &ProfileContent) -> usize {
    let personal = &p.personal;
    let mut fields: Vec<&str> = vec![
        personal.full_name.as_str(),
        personal.title.as_str(),
        personal.email.as_str(),
        personal.phone.as_str(),
        personal.address.as_deref().unwrap_or(""),
        personal.summary.as_str(),
        p.skills.as_str(),
    ];
    for e in &p.experience {
        fields.extend([&*e.role, &*e.company, &*e.start, &*e.end, &*e.description]);
    }
    for e in &p.education {
        fields.extend([&*e.school, &*e.degree, &*e.field, &*e.year]);
    }
    for e in &p.publications {
        fields.extend([&*e.title, &*e.publisher, &*e.year]);
    }
    for e in &p.awards {
        fields.extend([&*e.name, &*e.issuer, &*e.year]);
    }
    fields.iter().map(|s| s.chars().count()).sum()
}

fn filled(s: &str) -> bool {
    !s.trim().is_empty()
}

fn experience_complete(e: &Experience, min_desc: usize) -> bool {
    filled(&e.role) && filled(&e.company) && e.description.trim().chars().count() > min_desc
}

fn education_complete(e: &Education) -> bool {
    filled(&e.school) && filled(&e.degree) && filled(&e.field)
}

fn has_metrics(experience: &[Experience]) -> bool {
    experience.iter().any(|e| METRIC_RE.is_match(&e.description))
}

fn fraction(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Public entry points
// ────────────────────────────────────────────────────────────────────────────

/// Weighted completeness score in [0, 100].
pub fn score(content: &ContentDocument, policy: &ScoringPolicy) -> u32 {
    let s = Subject::of(content);
    let mut total = 0.0_f64;

    let personal_filled = s.personal.iter().filter(|f| filled(f)).count();
    total += policy.personal * fraction(personal_filled, s.personal.len());

    let summary_chars = s.summary.trim().chars().count();
    if summary_chars > policy.summary_min_chars {
        total += policy.summary_full;
    } else if summary_chars > 0 {
        total += policy.summary_partial;
    }

    if !s.experience.is_empty() {
        total += policy.experience_present;
        let complete = s
            .experience
            .iter()
            .filter(|e| experience_complete(e, policy.experience_description_min_chars))
            .count();
        total += policy.experience_quality * fraction(complete, s.experience.len());
        if has_metrics(s.experience) {
            total += policy.metrics_bonus;
        }
    }

    if !s.education.is_empty() {
        total += policy.education_present;
        let complete = s.education.iter().filter(|e| education_complete(e)).count();
        total += policy.education_quality * fraction(complete, s.education.len());
    }

    total += policy.skill_points(split_skills(s.skills).len());
    total += policy.length_points(s.text_chars);

    total.round().clamp(0.0, 100.0) as u32
}

/// Recommendations at or above the policy cutoff, in the fixed order
/// summary → experience → education → skills → metrics.
pub fn recommendations(content: &ContentDocument, policy: &ScoringPolicy) -> Vec<Recommendation> {
    let s = Subject::of(content);
    let mut out = Vec::new();

    let summary_chars = s.summary.trim().chars().count();
    if summary_chars <= policy.summary_min_chars {
        out.push(Recommendation {
            area: ScoreArea::Summary,
            severity: if summary_chars == 0 {
                Severity::High
            } else {
                Severity::Medium
            },
            message: if s.is_letter {
                REC_LETTER_BODY
            } else {
                REC_SUMMARY
            },
        });
    }

    if !s.is_letter {
        if s.experience.is_empty() {
            out.push(Recommendation {
                area: ScoreArea::Experience,
                severity: Severity::High,
                message: REC_EXPERIENCE,
            });
        } else if !s
            .experience
            .iter()
            .all(|e| experience_complete(e, policy.experience_description_min_chars))
        {
            out.push(Recommendation {
                area: ScoreArea::Experience,
                severity: Severity::Low,
                message: REC_EXPERIENCE_DETAIL,
            });
        }

        if s.education.is_empty() {
            out.push(Recommendation {
                area: ScoreArea::Education,
                severity: Severity::High,
                message: REC_EDUCATION,
            });
        } else if !s.education.iter().all(education_complete) {
            out.push(Recommendation {
                area: ScoreArea::Education,
                severity: Severity::Low,
                message: REC_EDUCATION_DETAIL,
            });
        }

        let skill_count = split_skills(s.skills).len();
        if skill_count < 5 {
            out.push(Recommendation {
                area: ScoreArea::Skills,
                severity: Severity::Medium,
                message: REC_SKILLS,
            });
        } else if skill_count < 10 {
            out.push(Recommendation {
                area: ScoreArea::Skills,
                severity: Severity::Low,
                message: REC_SKILLS_MORE,
            });
        }

        if !s.experience.is_empty() && !has_metrics(s.experience) {
            out.push(Recommendation {
                area: ScoreArea::Metrics,
                severity: Severity::Medium,
                message: REC_METRICS,
            });
        }
    }

    out.retain(|r| r.severity >= policy.recommendation_cutoff);
    out
}

pub fn category(score: u32, policy: &ScoringPolicy) -> ScoreCategory {
    let (label, color) = policy
        .categories
        .iter()
        .find(|(threshold, _, _)| score >= *threshold)
        .map(|(_, label, color)| (label.clone(), color.clone()))
        .unwrap_or_else(|| ("Needs Improvement".to_string(), "#ef4444".to_string()));
    ScoreCategory { label, color }
}

/// Score, category and recommendation strings in one pass.
pub fn report(content: &ContentDocument, policy: &ScoringPolicy) -> ScoreReport {
    let score = score(content, policy);
    ScoreReport {
        score,
        category: category(score, policy),
        recommendations: recommendations(content, policy)
            .into_iter()
            .map(|r| r.message.to_string())
            .collect(),
        policy_version: policy.version.clone(),
    }
}

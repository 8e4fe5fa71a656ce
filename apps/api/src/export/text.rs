//! Plain-text transcript of a document.
//!
//! Reads content only: no tree, no design, no surface. Sections appear in a
//! fixed reading order regardless of the document's section order, and empty
//! sections are left out.

use std::fmt::Write as _;

use crate::models::content::{ContentDocument, LetterContent, ProfileContent};

pub const CONTENT_TYPE: &str = "text/plain; charset=utf-8";

pub fn export_text(content: &ContentDocument) -> String {
    match content {
        ContentDocument::Resume(p) | ContentDocument::Cv(p) => profile_text(p),
        ContentDocument::CoverLetter(l) => letter_text(l),
    }
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn all_blank(fields: &[&String]) -> bool {
    fields.iter().all(|f| blank(f))
}

// `write!` into a String cannot fail; results are discarded below.

fn profile_text(p: &ProfileContent) -> String {
    let personal = &p.personal;
    let mut out = String::new();
    let _ = write!(
        out,
        "Name: {}\nTitle: {}\nContact: {} | {}\n",
        personal.full_name.trim(),
        personal.title.trim(),
        personal.email.trim(),
        personal.phone.trim()
    );
    if let Some(address) = personal.address.as_deref().filter(|a| !blank(a)) {
        let _ = writeln!(out, "Address: {}", address.trim());
    }
    out.push('\n');

    if !blank(&personal.summary) {
        let _ = write!(out, "SUMMARY\n{}\n\n", personal.summary.trim());
    }

    let experience: Vec<_> = p
        .experience
        .iter()
        .filter(|e| !all_blank(&[&e.role, &e.company, &e.start, &e.end, &e.description]))
        .collect();
    if !experience.is_empty() {
        out.push_str("EXPERIENCE\n");
        for e in experience {
            let _ = writeln!(
                out,
                "{} at {} ({} – {})",
                e.role.trim(),
                e.company.trim(),
                e.start.trim(),
                e.end.trim()
            );
            if !blank(&e.description) {
                let _ = writeln!(out, "{}", e.description.trim());
            }
            out.push('\n');
        }
    }

    let education: Vec<_> = p
        .education
        .iter()
        .filter(|e| !all_blank(&[&e.school, &e.degree, &e.field, &e.year]))
        .collect();
    if !education.is_empty() {
        out.push_str("EDUCATION\n");
        for e in education {
            let _ = writeln!(
                out,
                "{} in {} from {} ({})",
                e.degree.trim(),
                e.field.trim(),
                e.school.trim(),
                e.year.trim()
            );
        }
        out.push('\n');
    }

    let publications: Vec<_> = p
        .publications
        .iter()
        .filter(|e| !all_blank(&[&e.title, &e.publisher, &e.year]))
        .collect();
    if !publications.is_empty() {
        out.push_str("PUBLICATIONS\n");
        for e in publications {
            let _ = writeln!(out, "{}, {} ({})", e.title.trim(), e.publisher.trim(), e.year.trim());
        }
        out.push('\n');
    }

    let awards: Vec<_> = p
        .awards
        .iter()
        .filter(|e| !all_blank(&[&e.name, &e.issuer, &e.year]))
        .collect();
    if !awards.is_empty() {
        out.push_str("AWARDS\n");
        for e in awards {
            let _ = writeln!(out, "{}, {} ({})", e.name.trim(), e.issuer.trim(), e.year.trim());
        }
        out.push('\n');
    }

    if !blank(&p.skills) {
        let _ = writeln!(out, "SKILLS\n{}", p.skills.trim());
    }

    out
}

fn letter_text(l: &LetterContent) -> String {
    let mut blocks: Vec<String> = Vec::new();

    let sender: Vec<&str> = [
        l.sender.full_name.as_str(),
        l.sender.address.as_str(),
        l.sender.email.as_str(),
        l.sender.phone.as_str(),
    ]
    .into_iter()
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .collect();
    if !sender.is_empty() {
        blocks.push(sender.join("\n"));
    }

    if let Some(date) = l.date {
        blocks.push(date.format("%B %-d, %Y").to_string());
    }

    let recipient: Vec<&str> = [
        l.recipient.name.as_str(),
        l.recipient.title.as_str(),
        l.recipient.company.as_str(),
        l.recipient.address.as_str(),
    ]
    .into_iter()
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .collect();
    if !recipient.is_empty() {
        blocks.push(recipient.join("\n"));
    }

    let body = &l.content;
    if !blank(&body.subject) {
        blocks.push(format!("RE: {}", body.subject.trim()));
    }
    if !blank(&body.greeting) {
        blocks.push(body.greeting.trim().to_string());
    }
    if !blank(&body.body) {
        blocks.push(body.body.trim().to_string());
    }

    let signature: Vec<&str> = [body.closing.trim(), l.sender.full_name.trim()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
    if !signature.is_empty() {
        blocks.push(signature.join("\n"));
    }

    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::content::{
        Award, DocumentKind, Education, Experience, Personal, Recipient, Sender,
    };
    use chrono::NaiveDate;

    fn make_profile() -> ProfileContent {
        ProfileContent {
            personal: Personal {
                full_name: "Jane Doe".into(),
                title: "Engineer".into(),
                email: "jane@example.com".into(),
                phone: "555-0100".into(),
                address: None,
                summary: "Builds things.".into(),
            },
            experience: vec![Experience {
                role: "Lead".into(),
                company: "Acme".into(),
                start: "2020".into(),
                end: "Present".into(),
                description: "Shipped 3 products".into(),
            }],
            education: vec![Education {
                school: "MIT".into(),
                degree: "BSc".into(),
                field: "CS".into(),
                year: "2015".into(),
            }],
            skills: "Rust, Go".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_resume_transcript_in_reading_order() {
        let text = export_text(&ContentDocument::Resume(make_profile()));
        let expected = "Name: Jane Doe\nTitle: Engineer\nContact: jane@example.com | 555-0100\n\n\
                        SUMMARY\nBuilds things.\n\n\
                        EXPERIENCE\nLead at Acme (2020 – Present)\nShipped 3 products\n\n\
                        EDUCATION\nBSc in CS from MIT (2015)\n\n\
                        SKILLS\nRust, Go\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_empty_sections_are_left_out() {
        let text = export_text(&ContentDocument::new(DocumentKind::Resume));
        assert_eq!(text, "Name: \nTitle: \nContact:  | \n\n");
        assert!(!text.contains("SUMMARY"));
        assert!(!text.contains("EXPERIENCE"));
    }

    #[test]
    fn test_cv_includes_awards() {
        let mut profile = make_profile();
        profile.awards.push(Award {
            name: "Best Paper".into(),
            issuer: "ACM".into(),
            year: "2019".into(),
        });
        let text = export_text(&ContentDocument::Cv(profile));
        let awards = text.find("AWARDS").unwrap();
        assert!(awards > text.find("EDUCATION").unwrap());
        assert!(awards < text.find("SKILLS").unwrap());
        assert!(text.contains("Best Paper, ACM (2019)"));
    }

    #[test]
    fn test_letter_transcript() {
        let mut letter = LetterContent {
            sender: Sender {
                full_name: "Jane Doe".into(),
                email: "jane@example.com".into(),
                ..Default::default()
            },
            recipient: Recipient {
                name: "Sam Lee".into(),
                company: "Acme".into(),
                ..Default::default()
            },
            date: NaiveDate::from_ymd_opt(2024, 3, 5),
            ..Default::default()
        };
        letter.content.subject = "Platform Engineer".into();
        letter.content.greeting = "Dear Sam,".into();
        letter.content.body = "I am writing to apply.".into();

        let text = export_text(&ContentDocument::CoverLetter(letter));
        assert_eq!(
            text,
            "Jane Doe\njane@example.com\n\nMarch 5, 2024\n\nSam Lee\nAcme\n\n\
             RE: Platform Engineer\n\nDear Sam,\n\nI am writing to apply.\n\nSincerely,\nJane Doe\n"
        );
    }
}

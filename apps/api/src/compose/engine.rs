//! Composition Engine: (content, resolved style, section order) → render tree.
//!
//! Pure and deterministic: no clock reads, no registry lookups, no hash-ordered
//! iteration. Identical inputs produce identical trees.

use crate::compose::placement::{rule_for, HeaderTreatment, PlacementRule, SidebarFill, SidebarItem};
use crate::compose::tree::{
    Align, Block, BlockStyle, ContactItem, EntryBlock, LetterPart, Placement, Region, RenderTree,
    SectionBody, SidebarFrame,
};
use crate::design::resolver::ResolvedStyle;
use crate::models::content::{ContentDocument, LetterContent, ProfileContent};
use crate::models::design::{rgb, Rgb};
use crate::models::section::{SectionId, SectionOrder};

const BODY_TEXT: Rgb = rgb(0x1f2937);
const MUTED_TEXT: Rgb = rgb(0x6b7280);
const LETTER_DATE_FORMAT: &str = "%B %-d, %Y";

pub fn compose(
    content: &ContentDocument,
    style: &ResolvedStyle,
    order: &SectionOrder,
) -> RenderTree {
    let rule = rule_for(style.layout);
    match content {
        ContentDocument::Resume(profile) | ContentDocument::Cv(profile) => {
            compose_profile(content, profile, style, rule, order)
        }
        ContentDocument::CoverLetter(letter) => compose_letter(content, letter, style, rule),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Resume / CV
// ────────────────────────────────────────────────────────────────────────────

fn compose_profile(
    content: &ContentDocument,
    profile: &ProfileContent,
    style: &ResolvedStyle,
    rule: &PlacementRule,
    order: &SectionOrder,
) -> RenderTree {
    let header_style = header_style(style, rule);
    let main_style = main_style(style, rule);
    let mut placements = Vec::new();

    let personal = &profile.personal;
    let header_contact = if rule.sidebar_has_contact() {
        Vec::new()
    } else {
        contact_items(&personal.email, &personal.phone, personal.address.as_deref())
            .into_iter()
            .map(|c| c.value)
            .collect()
    };
    if let Some(identity) = identity_block(&personal.full_name, &personal.title, header_contact) {
        placements.push(Placement {
            region: Region::Header,
            block: identity,
            style: header_style,
        });
    }

    // Sidebar, in the table's fixed order.
    let mut sidebar = None;
    if let Some(side_rule) = rule.sidebar {
        let side_style = sidebar_style(style, rule, side_rule.fill);
        sidebar = side_style.background.map(|background| SidebarFrame {
            side: side_rule.side,
            width_ratio: side_rule.width_ratio,
            background,
        });
        for item in side_rule.items {
            let block = match item {
                SidebarItem::Monogram => {
                    let initials = initials(&personal.full_name);
                    (!initials.is_empty()).then_some(Block::Monogram { initials })
                }
                SidebarItem::Contact => {
                    let items = contact_items(
                        &personal.email,
                        &personal.phone,
                        personal.address.as_deref(),
                    );
                    (!items.is_empty()).then_some(Block::Contact { items })
                }
                SidebarItem::Section(id) if order.contains(*id) => section_block(profile, *id),
                SidebarItem::Section(_) => None,
            };
            if let Some(block) = block {
                placements.push(Placement {
                    region: Region::Sidebar,
                    block,
                    style: side_style.clone(),
                });
            }
        }
    }

    // Main column: ordered sections minus anything the sidebar claimed.
    for id in order.ids() {
        if rule.claims(*id) {
            continue;
        }
        if let Some(block) = section_block(profile, *id) {
            placements.push(Placement {
                region: Region::Main,
                block,
                style: main_style.clone(),
            });
        }
    }

    RenderTree {
        kind: content.kind(),
        layout: style.layout,
        sidebar,
        placements,
    }
}

/// Builds the block for one section, or `None` when it has nothing to show.
fn section_block(profile: &ProfileContent, id: SectionId) -> Option<Block> {
    let body = match id {
        SectionId::Summary => {
            let summary = profile.personal.summary.trim();
            (!summary.is_empty()).then(|| SectionBody::Paragraph(summary.to_string()))
        }
        SectionId::Experience => entries(profile.experience.iter().map(|e| EntryBlock {
            heading: e.role.trim().to_string(),
            subheading: non_empty(&e.company),
            dates: join_non_empty(&[e.start.as_str(), e.end.as_str()], " – "),
            detail: non_empty(&e.description),
        })),
        SectionId::Education => entries(profile.education.iter().map(|e| EntryBlock {
            heading: e.school.trim().to_string(),
            subheading: join_non_empty(&[e.degree.as_str(), e.field.as_str()], " in "),
            dates: non_empty(&e.year),
            detail: None,
        })),
        SectionId::Skills => {
            let tags: Vec<String> = profile.skill_items().into_iter().map(String::from).collect();
            (!tags.is_empty()).then_some(SectionBody::Tags(tags))
        }
        SectionId::Publications => entries(profile.publications.iter().map(|p| EntryBlock {
            heading: p.title.trim().to_string(),
            subheading: join_non_empty(&[p.publisher.as_str(), p.year.as_str()], " | "),
            dates: None,
            detail: None,
        })),
        SectionId::Awards => entries(profile.awards.iter().map(|a| EntryBlock {
            heading: a.name.trim().to_string(),
            subheading: non_empty(&a.issuer),
            dates: non_empty(&a.year),
            detail: None,
        })),
    }?;
    Some(Block::Section {
        id,
        title: id.title(),
        body,
    })
}

/// Keeps entries with at least one non-blank field; `None` if none remain.
fn entries(items: impl Iterator<Item = EntryBlock>) -> Option<SectionBody> {
    let kept: Vec<EntryBlock> = items
        .filter(|e| {
            !e.heading.is_empty()
                || e.subheading.is_some()
                || e.dates.is_some()
                || e.detail.is_some()
        })
        .collect();
    (!kept.is_empty()).then_some(SectionBody::Entries(kept))
}

// ────────────────────────────────────────────────────────────────────────────
// Cover letter
// ────────────────────────────────────────────────────────────────────────────

fn compose_letter(
    content: &ContentDocument,
    letter: &LetterContent,
    style: &ResolvedStyle,
    rule: &PlacementRule,
) -> RenderTree {
    let header_style = header_style(style, rule);
    let body_style = main_style(style, rule);
    let mut placements = Vec::new();

    let sender = &letter.sender;
    let contact = contact_items(&sender.email, &sender.phone, Some(sender.address.as_str()))
        .into_iter()
        .map(|c| c.value)
        .collect();
    if let Some(identity) = identity_block(&sender.full_name, "", contact) {
        placements.push(Placement {
            region: Region::Header,
            block: identity,
            style: header_style,
        });
    }

    let recipient = &letter.recipient;
    let recipient_lines: Vec<String> = [
        &recipient.name,
        &recipient.title,
        &recipient.company,
        &recipient.address,
    ]
    .iter()
    .filter_map(|s| non_empty(s))
    .collect();

    let body = &letter.content;
    let paragraphs: Vec<String> = body
        .body
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect();

    let parts = [
        letter.date.map(|d| LetterPart::Date {
            text: d.format(LETTER_DATE_FORMAT).to_string(),
        }),
        (!recipient_lines.is_empty()).then_some(LetterPart::Recipient {
            lines: recipient_lines,
        }),
        non_empty(&body.subject).map(|s| LetterPart::Subject {
            text: format!("RE: {s}"),
        }),
        non_empty(&body.greeting).map(|text| LetterPart::Greeting { text }),
        (!paragraphs.is_empty()).then_some(LetterPart::Body { paragraphs }),
        closing_part(&body.closing, &sender.full_name),
    ];

    for part in parts.into_iter().flatten() {
        placements.push(Placement {
            region: Region::Main,
            block: Block::Letter { part },
            style: body_style.clone(),
        });
    }

    RenderTree {
        kind: content.kind(),
        layout: style.layout,
        sidebar: None,
        placements,
    }
}

fn closing_part(closing: &str, signature: &str) -> Option<LetterPart> {
    let closing = closing.trim();
    let signature = signature.trim();
    if closing.is_empty() && signature.is_empty() {
        return None;
    }
    Some(LetterPart::Closing {
        closing: closing.to_string(),
        signature: signature.to_string(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Shared pieces
// ────────────────────────────────────────────────────────────────────────────

fn identity_block(name: &str, title: &str, contact: Vec<String>) -> Option<Block> {
    let name = name.trim();
    let title = title.trim();
    if name.is_empty() && title.is_empty() && contact.is_empty() {
        return None;
    }
    Some(Block::Identity {
        name: name.to_string(),
        title: title.to_string(),
        contact,
    })
}

fn contact_items(email: &str, phone: &str, address: Option<&str>) -> Vec<ContactItem> {
    let mut items = Vec::new();
    if let Some(value) = non_empty(email) {
        items.push(ContactItem {
            label: "Email",
            value,
        });
    }
    if let Some(value) = non_empty(phone) {
        items.push(ContactItem {
            label: "Phone",
            value,
        });
    }
    if let Some(value) = address.and_then(non_empty) {
        items.push(ContactItem {
            label: "Address",
            value,
        });
    }
    items
}

fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|w| w.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn join_non_empty(parts: &[&str], sep: &str) -> Option<String> {
    let kept: Vec<&str> = parts.iter().map(|s| s.trim()).filter(|s| !s.is_empty()).collect();
    (!kept.is_empty()).then(|| kept.join(sep))
}

// ── region styles ──

fn base_style(style: &ResolvedStyle, rule: &PlacementRule) -> BlockStyle {
    BlockStyle {
        heading_font: style.heading_font.clone(),
        body_font: style.body_font.clone(),
        heading_color: style.primary,
        text_color: BODY_TEXT,
        muted_color: MUTED_TEXT,
        rule_color: style.secondary,
        background: None,
        align: Align::Left,
        scale: rule.scale,
    }
}

fn header_style(style: &ResolvedStyle, rule: &PlacementRule) -> BlockStyle {
    let base = base_style(style, rule);
    match rule.header {
        HeaderTreatment::Ruled => base,
        HeaderTreatment::Centered => BlockStyle {
            align: Align::Center,
            ..base
        },
        HeaderTreatment::Banner => BlockStyle {
            heading_color: Rgb::WHITE,
            text_color: Rgb::WHITE,
            muted_color: style.accent,
            rule_color: style.accent,
            background: Some(style.primary),
            align: Align::Center,
            ..base
        },
    }
}

fn main_style(style: &ResolvedStyle, rule: &PlacementRule) -> BlockStyle {
    base_style(style, rule)
}

fn sidebar_style(style: &ResolvedStyle, rule: &PlacementRule, fill: SidebarFill) -> BlockStyle {
    let base = base_style(style, rule);
    match fill {
        SidebarFill::Primary => BlockStyle {
            heading_color: Rgb::WHITE,
            text_color: Rgb::WHITE,
            muted_color: style.accent,
            rule_color: style.secondary,
            background: Some(style.primary),
            ..base
        },
        SidebarFill::Accent => BlockStyle {
            background: Some(style.accent),
            ..base
        },
    }
}

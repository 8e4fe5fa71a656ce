use serde::Serialize;

use crate::design::resolver::FontSpec;
use crate::models::content::DocumentKind;
use crate::models::design::{LayoutKind, Rgb};
use crate::models::section::SectionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    /// Identity block. Full width on single-region layouts, top of the main
    /// column on two-region layouts.
    Header,
    Sidebar,
    Main,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Left,
    Center,
}

/// Everything the painter needs for one block. Copied into every placement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockStyle {
    pub heading_font: FontSpec,
    pub body_font: FontSpec,
    pub heading_color: Rgb,
    pub text_color: Rgb,
    pub muted_color: Rgb,
    pub rule_color: Rgb,
    pub background: Option<Rgb>,
    pub align: Align,
    /// Multiplier on the base type sizes.
    pub scale: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactItem {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryBlock {
    pub heading: String,
    pub subheading: Option<String>,
    pub dates: Option<String>,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SectionBody {
    Paragraph(String),
    Entries(Vec<EntryBlock>),
    Tags(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "part", rename_all = "snake_case")]
pub enum LetterPart {
    Date { text: String },
    Recipient { lines: Vec<String> },
    Subject { text: String },
    Greeting { text: String },
    Body { paragraphs: Vec<String> },
    Closing { closing: String, signature: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "block", rename_all = "snake_case")]
pub enum Block {
    Identity {
        name: String,
        title: String,
        /// Contact line printed under the name; empty when contact lives in the sidebar.
        contact: Vec<String>,
    },
    Monogram {
        initials: String,
    },
    Contact {
        items: Vec<ContactItem>,
    },
    Section {
        id: SectionId,
        title: &'static str,
        body: SectionBody,
    },
    Letter {
        part: LetterPart,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub region: Region,
    pub block: Block,
    pub style: BlockStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SidebarFrame {
    pub side: Side,
    /// Fraction of the page width.
    pub width_ratio: f32,
    pub background: Rgb,
}

/// Ordered region placements for one document. Painting walks `placements` in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderTree {
    pub kind: DocumentKind,
    pub layout: LayoutKind,
    pub sidebar: Option<SidebarFrame>,
    pub placements: Vec<Placement>,
}

impl RenderTree {
    /// Section ids placed in `region`, in placement order.
    pub fn sections_in(&self, region: Region) -> Vec<SectionId> {
        self.placements
            .iter()
            .filter(|p| p.region == region)
            .filter_map(|p| match &p.block {
                Block::Section { id, .. } => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn placements_in(&self, region: Region) -> impl Iterator<Item = &Placement> {
        self.placements.iter().filter(move |p| p.region == region)
    }
}

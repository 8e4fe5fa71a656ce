//! Per-layout placement table.
//!
//! Adding a layout means adding a row here; the engine has no layout branches.

use serde::Serialize;

use crate::compose::tree::Side;
use crate::models::design::LayoutKind;
use crate::models::section::SectionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SidebarItem {
    Monogram,
    Contact,
    Section(SectionId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SidebarFill {
    /// Solid primary color with light text.
    Primary,
    /// Pale accent color with dark text.
    Accent,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SidebarRule {
    pub side: Side,
    pub width_ratio: f32,
    pub fill: SidebarFill,
    /// Sidebar contents in paint order. Sections listed here are claimed from
    /// the main column when they appear in the section order.
    pub items: &'static [SidebarItem],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderTreatment {
    /// Left-aligned, name in primary, rule underneath.
    Ruled,
    /// Full-width primary band, light centered text.
    Banner,
    /// Centered on white with a primary rule.
    Centered,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlacementRule {
    pub layout: LayoutKind,
    /// `None` for single-region layouts.
    pub sidebar: Option<SidebarRule>,
    pub header: HeaderTreatment,
    pub scale: f32,
}

impl PlacementRule {
    pub fn is_two_region(&self) -> bool {
        self.sidebar.is_some()
    }

    /// Section ids this layout routes to the sidebar.
    pub fn sidebar_sections(&self) -> impl Iterator<Item = SectionId> + '_ {
        self.sidebar
            .iter()
            .flat_map(|s| s.items.iter())
            .filter_map(|item| match item {
                SidebarItem::Section(id) => Some(*id),
                _ => None,
            })
    }

    pub fn claims(&self, id: SectionId) -> bool {
        self.sidebar_sections().any(|s| s == id)
    }

    pub fn sidebar_has_contact(&self) -> bool {
        self.sidebar
            .map(|s| s.items.contains(&SidebarItem::Contact))
            .unwrap_or(false)
    }
}

pub static PLACEMENT_TABLE: &[PlacementRule] = &[
    PlacementRule {
        layout: LayoutKind::SingleColumnModern,
        sidebar: None,
        header: HeaderTreatment::Ruled,
        scale: 1.0,
    },
    PlacementRule {
        layout: LayoutKind::SidebarLeft,
        sidebar: Some(SidebarRule {
            side: Side::Left,
            width_ratio: 0.32,
            fill: SidebarFill::Primary,
            items: &[
                SidebarItem::Monogram,
                SidebarItem::Contact,
                SidebarItem::Section(SectionId::Skills),
            ],
        }),
        header: HeaderTreatment::Ruled,
        scale: 1.0,
    },
    PlacementRule {
        layout: LayoutKind::TwoColumnSplit,
        sidebar: Some(SidebarRule {
            side: Side::Right,
            width_ratio: 0.34,
            fill: SidebarFill::Accent,
            items: &[SidebarItem::Contact, SidebarItem::Section(SectionId::Skills)],
        }),
        header: HeaderTreatment::Ruled,
        scale: 1.0,
    },
    PlacementRule {
        layout: LayoutKind::CenteredMinimal,
        sidebar: None,
        header: HeaderTreatment::Centered,
        scale: 1.0,
    },
    PlacementRule {
        layout: LayoutKind::HeaderHeavy,
        sidebar: None,
        header: HeaderTreatment::Banner,
        scale: 1.0,
    },
    PlacementRule {
        layout: LayoutKind::Compact,
        sidebar: None,
        header: HeaderTreatment::Ruled,
        scale: 0.88,
    },
];

/// Rule row for `layout`. Falls back to the first row, which the table tests
/// guarantee is never needed.
pub fn rule_for(layout: LayoutKind) -> &'static PlacementRule {
    PLACEMENT_TABLE
        .iter()
        .find(|r| r.layout == layout)
        .unwrap_or(&PLACEMENT_TABLE[0])
}

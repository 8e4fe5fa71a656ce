//! Paint step: lays a render tree out at page width and records a display list.
//!
//! Regions are laid out top-down with independent cursors. On two-region layouts
//! the header and main sections share the main column while the sidebar runs
//! alongside it; the final surface height is the taller of the two, rounded up
//! to at least one page.

use crate::compose::tree::{
    Align, Block, BlockStyle, ContactItem, EntryBlock, LetterPart, Placement, Region, RenderTree,
    SectionBody, Side,
};
use crate::models::design::Rgb;
use crate::render::fonts::{FontFace, FontLibrary, Weight};
use crate::render::metrics::{line_height, text_width, wrap_lines};
use crate::render::surface::{DrawOp, Surface};
use crate::render::Paper;

const MARGIN: f32 = 40.0;
const SIDEBAR_PADDING: f32 = 24.0;
const COLUMN_GAP: f32 = 28.0;
const SECTION_GAP: f32 = 18.0;
const ENTRY_GAP: f32 = 10.0;
const MONOGRAM_RADIUS: f32 = 36.0;

// Base type sizes in CSS px, multiplied by the block's scale.
const NAME_SIZE: f32 = 28.0;
const TITLE_SIZE: f32 = 15.0;
const SECTION_SIZE: f32 = 14.0;
const ENTRY_SIZE: f32 = 12.5;
const BODY_SIZE: f32 = 11.0;
const SMALL_SIZE: f32 = 10.0;

#[derive(Debug, Clone, Copy)]
struct Column {
    x0: f32,
    x1: f32,
    y: f32,
}

impl Column {
    fn width(&self) -> f32 {
        self.x1 - self.x0
    }
}

struct Painter<'a> {
    fonts: &'a FontLibrary,
    ops: Vec<DrawOp>,
}

pub fn paint(tree: &RenderTree, fonts: &FontLibrary, paper: Paper) -> Surface {
    let width = paper.width_px();
    let mut painter = Painter {
        fonts,
        ops: Vec::new(),
    };

    let (mut main, mut side) = match &tree.sidebar {
        Some(frame) => {
            let side_w = (width * frame.width_ratio).round();
            match frame.side {
                Side::Left => (
                    Column {
                        x0: side_w + COLUMN_GAP,
                        x1: width - MARGIN,
                        y: MARGIN,
                    },
                    Some(Column {
                        x0: SIDEBAR_PADDING,
                        x1: side_w - SIDEBAR_PADDING,
                        y: MARGIN,
                    }),
                ),
                Side::Right => (
                    Column {
                        x0: MARGIN,
                        x1: width - side_w - COLUMN_GAP,
                        y: MARGIN,
                    },
                    Some(Column {
                        x0: width - side_w + SIDEBAR_PADDING,
                        x1: width - SIDEBAR_PADDING,
                        y: MARGIN,
                    }),
                ),
            }
        }
        None => (
            Column {
                x0: MARGIN,
                x1: width - MARGIN,
                y: MARGIN,
            },
            None,
        ),
    };
    let full_width = tree.sidebar.is_none();

    for placement in &tree.placements {
        match placement.region {
            Region::Header => painter.header(placement, &mut main, full_width, width),
            Region::Main => painter.block(placement, &mut main),
            Region::Sidebar => {
                if let Some(col) = side.as_mut() {
                    painter.block(placement, col);
                }
            }
        }
    }

    let content_bottom = side.map(|s| s.y).unwrap_or(0.0).max(main.y) + MARGIN;
    let height = content_bottom.max(paper.height_px()).ceil();

    if let Some(frame) = &tree.sidebar {
        let side_w = (width * frame.width_ratio).round();
        let x = match frame.side {
            Side::Left => 0.0,
            Side::Right => width - side_w,
        };
        painter.ops.insert(
            0,
            DrawOp::Rect {
                x,
                y: 0.0,
                w: side_w,
                h: height,
                color: frame.background,
            },
        );
    }

    Surface {
        width,
        height,
        background: Rgb::WHITE,
        ops: painter.ops,
    }
}

impl<'a> Painter<'a> {
    // ── primitives ──

    #[allow(clippy::too_many_arguments)]
    fn text(
        &mut self,
        col: &mut Column,
        text: &str,
        size: f32,
        face: FontFace,
        weight: Weight,
        color: Rgb,
        align: Align,
    ) {
        let font = self.fonts.get(face, weight);
        for line in wrap_lines(font, size, text, col.width()) {
            let x = match align {
                Align::Left => col.x0,
                Align::Center => col.x0 + (col.width() - text_width(font, size, &line)) / 2.0,
            };
            self.ops.push(DrawOp::Text {
                x,
                y: col.y,
                size,
                face,
                weight,
                color,
                text: line,
            });
            col.y += line_height(size);
        }
    }

    fn rule(&mut self, col: &mut Column, thickness: f32, color: Rgb) {
        self.ops.push(DrawOp::Rect {
            x: col.x0,
            y: col.y,
            w: col.width(),
            h: thickness,
            color,
        });
        col.y += thickness;
    }

    // ── header ──

    fn header(&mut self, placement: &Placement, col: &mut Column, full_width: bool, page_w: f32) {
        let Block::Identity {
            name,
            title,
            contact,
        } = &placement.block
        else {
            return self.block(placement, col);
        };
        let s = &placement.style;
        let band_mark = self.ops.len();
        let band_top = 0.0;

        if s.background.is_some() {
            col.y += 8.0;
        }
        if !name.is_empty() {
            self.text(
                col,
                name,
                NAME_SIZE * s.scale,
                s.heading_font.face,
                Weight::Bold,
                s.heading_color,
                s.align,
            );
        }
        if !title.is_empty() {
            self.text(
                col,
                title,
                TITLE_SIZE * s.scale,
                s.body_font.face,
                Weight::Regular,
                if s.background.is_some() {
                    s.text_color
                } else {
                    s.muted_color
                },
                s.align,
            );
        }
        if !contact.is_empty() {
            col.y += 4.0;
            self.text(
                col,
                &contact.join("  •  "),
                BODY_SIZE * s.scale,
                s.body_font.face,
                Weight::Regular,
                s.text_color,
                s.align,
            );
        }

        match s.background {
            Some(band) => {
                col.y += 16.0;
                let (x, w) = if full_width {
                    (0.0, page_w)
                } else {
                    (col.x0, col.width())
                };
                self.ops.insert(
                    band_mark,
                    DrawOp::Rect {
                        x,
                        y: band_top,
                        w,
                        h: col.y - band_top,
                        color: band,
                    },
                );
            }
            None => {
                col.y += 8.0;
                self.rule(col, 2.0, s.heading_color);
            }
        }
        col.y += SECTION_GAP;
    }

    // ── blocks ──

    fn block(&mut self, placement: &Placement, col: &mut Column) {
        let s = &placement.style;
        match &placement.block {
            Block::Identity { name, title, .. } => {
                self.text(
                    col,
                    name,
                    ENTRY_SIZE * s.scale,
                    s.heading_font.face,
                    Weight::Bold,
                    s.heading_color,
                    s.align,
                );
                self.text(
                    col,
                    title,
                    BODY_SIZE * s.scale,
                    s.body_font.face,
                    Weight::Regular,
                    s.muted_color,
                    s.align,
                );
                col.y += SECTION_GAP;
            }
            Block::Monogram { initials } => self.monogram(col, initials, s),
            Block::Contact { items } => self.contact(col, items, s),
            Block::Section { title, body, .. } => {
                self.section_heading(col, title, s);
                match body {
                    SectionBody::Paragraph(text) => self.paragraph(col, text, s),
                    SectionBody::Entries(entries) => {
                        for (i, entry) in entries.iter().enumerate() {
                            if i > 0 {
                                col.y += ENTRY_GAP;
                            }
                            self.entry(col, entry, s);
                        }
                    }
                    SectionBody::Tags(tags) => self.paragraph(col, &tags.join("  •  "), s),
                }
                col.y += SECTION_GAP;
            }
            Block::Letter { part } => self.letter_part(col, part, s),
        }
    }

    fn section_heading(&mut self, col: &mut Column, title: &str, s: &BlockStyle) {
        self.text(
            col,
            &title.to_uppercase(),
            SECTION_SIZE * s.scale,
            s.heading_font.face,
            Weight::Bold,
            s.heading_color,
            Align::Left,
        );
        col.y += 2.0;
        self.rule(col, 1.0, s.rule_color);
        col.y += 8.0;
    }

    fn paragraph(&mut self, col: &mut Column, text: &str, s: &BlockStyle) {
        self.text(
            col,
            text,
            BODY_SIZE * s.scale,
            s.body_font.face,
            Weight::Regular,
            s.text_color,
            Align::Left,
        );
    }

    fn entry(&mut self, col: &mut Column, entry: &EntryBlock, s: &BlockStyle) {
        let size = ENTRY_SIZE * s.scale;
        let small = SMALL_SIZE * s.scale;

        // Dates sit right-aligned on the heading's first line.
        let mut heading_col = *col;
        if let Some(dates) = &entry.dates {
            let font = self.fonts.get(s.body_font.face, Weight::Regular);
            let w = text_width(font, small, dates);
            if w < col.width() / 2.0 {
                self.ops.push(DrawOp::Text {
                    x: col.x1 - w,
                    y: col.y + (size - small) / 2.0,
                    size: small,
                    face: s.body_font.face,
                    weight: Weight::Regular,
                    color: s.muted_color,
                    text: dates.clone(),
                });
                heading_col.x1 -= w + 12.0;
            } else {
                let mut dates_col = *col;
                self.text(
                    &mut dates_col,
                    dates,
                    small,
                    s.body_font.face,
                    Weight::Regular,
                    s.muted_color,
                    Align::Left,
                );
                col.y = dates_col.y;
                heading_col.y = col.y;
            }
        }

        if !entry.heading.is_empty() {
            self.text(
                &mut heading_col,
                &entry.heading,
                size,
                s.heading_font.face,
                Weight::Bold,
                s.text_color,
                Align::Left,
            );
            col.y = heading_col.y;
        } else if entry.dates.is_some() {
            col.y += line_height(size);
        }
        if let Some(sub) = &entry.subheading {
            self.text(
                col,
                sub,
                BODY_SIZE * s.scale,
                s.body_font.face,
                Weight::Bold,
                s.heading_color,
                Align::Left,
            );
        }
        if let Some(detail) = &entry.detail {
            col.y += 2.0;
            self.paragraph(col, detail, s);
        }
    }

    fn monogram(&mut self, col: &mut Column, initials: &str, s: &BlockStyle) {
        let r = MONOGRAM_RADIUS * s.scale;
        let cx = col.x0 + col.width() / 2.0;
        let cy = col.y + r;
        self.ops.push(DrawOp::Disc {
            cx,
            cy,
            r,
            color: s.text_color,
        });
        let size = 26.0 * s.scale;
        let font = self.fonts.get(s.heading_font.face, Weight::Bold);
        let w = text_width(font, size, initials);
        self.ops.push(DrawOp::Text {
            x: cx - w / 2.0,
            y: cy - line_height(size) / 2.0,
            size,
            face: s.heading_font.face,
            weight: Weight::Bold,
            color: s.background.unwrap_or(s.heading_color),
            text: initials.to_string(),
        });
        col.y += 2.0 * r + SECTION_GAP;
    }

    fn contact(&mut self, col: &mut Column, items: &[ContactItem], s: &BlockStyle) {
        self.section_heading(col, "Contact", s);
        for item in items {
            self.text(
                col,
                item.label,
                SMALL_SIZE * s.scale,
                s.body_font.face,
                Weight::Bold,
                s.muted_color,
                Align::Left,
            );
            self.paragraph(col, &item.value, s);
            col.y += 4.0;
        }
        col.y += SECTION_GAP;
    }

    fn letter_part(&mut self, col: &mut Column, part: &LetterPart, s: &BlockStyle) {
        let body = BODY_SIZE * s.scale * 1.1;
        match part {
            LetterPart::Date { text } => {
                self.text(
                    col,
                    text,
                    body,
                    s.body_font.face,
                    Weight::Regular,
                    s.muted_color,
                    Align::Left,
                );
            }
            LetterPart::Recipient { lines } => {
                for line in lines {
                    self.text(
                        col,
                        line,
                        body,
                        s.body_font.face,
                        Weight::Regular,
                        s.text_color,
                        Align::Left,
                    );
                }
            }
            LetterPart::Subject { text } => {
                self.text(
                    col,
                    text,
                    body,
                    s.heading_font.face,
                    Weight::Bold,
                    s.heading_color,
                    Align::Left,
                );
            }
            LetterPart::Greeting { text } => {
                self.text(
                    col,
                    text,
                    body,
                    s.body_font.face,
                    Weight::Regular,
                    s.text_color,
                    Align::Left,
                );
            }
            LetterPart::Body { paragraphs } => {
                for (i, p) in paragraphs.iter().enumerate() {
                    if i > 0 {
                        col.y += line_height(body) * 0.6;
                    }
                    self.text(
                        col,
                        p,
                        body,
                        s.body_font.face,
                        Weight::Regular,
                        s.text_color,
                        Align::Left,
                    );
                }
            }
            LetterPart::Closing { closing, signature } => {
                self.text(
                    col,
                    closing,
                    body,
                    s.body_font.face,
                    Weight::Regular,
                    s.text_color,
                    Align::Left,
                );
                col.y += line_height(body) * 1.5;
                self.text(
                    col,
                    signature,
                    body,
                    s.heading_font.face,
                    Weight::Bold,
                    s.text_color,
                    Align::Left,
                );
            }
        }
        col.y += SECTION_GAP;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::compose;
    use crate::design::{resolve_design, DesignRegistry};
    use crate::models::content::{ContentDocument, DocumentKind, Experience, ProfileContent};
    use crate::models::design::{DesignConfiguration, DesignInput};
    use crate::models::section::SectionOrder;

    fn make_tree(layout: &str, profile: ProfileContent) -> RenderTree {
        let style = resolve_design(
            &DesignRegistry::builtin(),
            DesignInput::Full(DesignConfiguration {
                layout: Some(layout.to_string()),
                ..Default::default()
            }),
        );
        compose(
            &ContentDocument::Resume(profile),
            &style,
            &SectionOrder::default_for(DocumentKind::Resume),
        )
    }

    fn make_profile(entries: usize) -> ProfileContent {
        let mut p = ProfileContent::default();
        p.personal.full_name = "Jane Doe".to_string();
        p.personal.title = "Engineer".to_string();
        p.personal.email = "jane@example.com".to_string();
        p.personal.summary = "Builds reliable systems.".to_string();
        p.skills = "Rust, Go".to_string();
        p.experience = (0..entries)
            .map(|i| Experience {
                role: format!("Role {i}"),
                company: "Acme".to_string(),
                start: "2020".to_string(),
                end: "2021".to_string(),
                description: "Shipped features and reduced costs by 20% ".repeat(6),
            })
            .collect();
        p
    }

    #[test]
    fn test_short_document_is_one_page_tall() {
        let fonts = FontLibrary::load().unwrap();
        let surface = paint(&make_tree("classic", make_profile(1)), &fonts, Paper::A4);
        assert_eq!(surface.width, 794.0);
        assert_eq!(surface.height, Paper::A4.height_px().ceil());
    }

    #[test]
    fn test_long_document_grows_past_one_page() {
        let fonts = FontLibrary::load().unwrap();
        let surface = paint(&make_tree("classic", make_profile(40)), &fonts, Paper::A4);
        assert!(surface.height > Paper::A4.height_px() * 2.0);
    }

    #[test]
    fn test_all_text_stays_inside_page_width() {
        let fonts = FontLibrary::load().unwrap();
        for layout in ["sidebar-left", "two-column-split", "header-heavy", "centered-minimal"] {
            let surface = paint(&make_tree(layout, make_profile(3)), &fonts, Paper::A4);
            for op in &surface.ops {
                if let DrawOp::Text {
                    x,
                    size,
                    face,
                    weight,
                    text,
                    ..
                } = op
                {
                    let w = text_width(fonts.get(*face, *weight), *size, text);
                    assert!(*x >= 0.0, "{layout}: '{text}' starts left of page");
                    assert!(x + w <= surface.width + 0.5, "{layout}: '{text}' overflows");
                }
            }
        }
    }

    #[test]
    fn test_sidebar_background_painted_first_and_full_height() {
        let fonts = FontLibrary::load().unwrap();
        let surface = paint(&make_tree("sidebar-left", make_profile(2)), &fonts, Paper::A4);
        match &surface.ops[0] {
            DrawOp::Rect { x, y, h, .. } => {
                assert_eq!(*x, 0.0);
                assert_eq!(*y, 0.0);
                assert_eq!(*h, surface.height);
            }
            other => panic!("expected sidebar rect, got {other:?}"),
        }
    }

    #[test]
    fn test_paint_is_deterministic() {
        let fonts = FontLibrary::load().unwrap();
        let tree = make_tree("two-column-split", make_profile(4));
        assert_eq!(paint(&tree, &fonts, Paper::A4), paint(&tree, &fonts, Paper::A4));
    }

    #[test]
    fn test_section_titles_are_painted() {
        let fonts = FontLibrary::load().unwrap();
        let surface = paint(&make_tree("classic", make_profile(1)), &fonts, Paper::A4);
        let runs: Vec<&str> = surface.text_runs().collect();
        assert!(runs.contains(&"EXPERIENCE"));
        assert!(runs.contains(&"Jane Doe"));
    }
}

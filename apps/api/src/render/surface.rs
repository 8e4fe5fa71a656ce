use serde::Serialize;

use crate::models::design::Rgb;
use crate::render::fonts::{FontFace, Weight};

/// One drawing instruction in surface coordinates (CSS px, origin top-left).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Rgb,
    },
    Disc {
        cx: f32,
        cy: f32,
        r: f32,
        color: Rgb,
    },
    /// `y` is the top of the line box.
    Text {
        x: f32,
        y: f32,
        size: f32,
        face: FontFace,
        weight: Weight,
        color: Rgb,
        text: String,
    },
}

/// A painted page-width document. Height follows content and is never shorter
/// than one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Surface {
    pub width: f32,
    pub height: f32,
    pub background: Rgb,
    pub ops: Vec<DrawOp>,
}

impl Surface {
    pub fn text_runs(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

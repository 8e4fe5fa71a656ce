pub mod fonts;
pub mod metrics;
pub mod paint;
pub mod surface;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::compose::RenderTree;
use crate::render::fonts::FontLibrary;

pub use paint::paint;
pub use surface::Surface;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("embedded font '{0}' could not be parsed")]
    FontLoad(&'static str),
}

/// Target paper. The surface is laid out at 96 CSS px per inch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Paper {
    #[default]
    A4,
    Letter,
}

impl Paper {
    pub fn from_key(key: &str) -> Option<Paper> {
        match key.trim().to_ascii_lowercase().as_str() {
            "a4" => Some(Paper::A4),
            "letter" | "us-letter" => Some(Paper::Letter),
            _ => None,
        }
    }

    /// Page size in PDF points (1/72 in).
    pub fn size_pt(&self) -> (f32, f32) {
        match self {
            Paper::A4 => (595.28, 841.89),
            Paper::Letter => (612.0, 792.0),
        }
    }

    /// height / width
    pub fn aspect(&self) -> f32 {
        let (w, h) = self.size_pt();
        h / w
    }

    /// Page width in CSS px.
    pub fn width_px(&self) -> f32 {
        let (w, _) = self.size_pt();
        (w * 96.0 / 72.0).round()
    }

    /// Page height in CSS px at `width_px`.
    pub fn height_px(&self) -> f32 {
        self.width_px() * self.aspect()
    }
}

/// Everything the painter needs besides the tree: shared faces and paper size.
#[derive(Clone)]
pub struct Canvas {
    pub fonts: Arc<FontLibrary>,
    pub paper: Paper,
}

impl Canvas {
    pub fn new(fonts: Arc<FontLibrary>, paper: Paper) -> Self {
        Self { fonts, paper }
    }

    pub fn paint(&self, tree: &RenderTree) -> Surface {
        paint(tree, &self.fonts, self.paper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a4_geometry() {
        assert_eq!(Paper::A4.width_px(), 794.0);
        assert!((Paper::A4.aspect() - 1.4142).abs() < 1e-3);
    }

    #[test]
    fn test_letter_geometry() {
        assert_eq!(Paper::Letter.width_px(), 816.0);
        assert!((Paper::Letter.height_px() - 1056.0).abs() < 1e-3);
    }

    #[test]
    fn test_paper_keys() {
        assert_eq!(Paper::from_key("A4"), Some(Paper::A4));
        assert_eq!(Paper::from_key("letter"), Some(Paper::Letter));
        assert_eq!(Paper::from_key("legal"), None);
    }
}

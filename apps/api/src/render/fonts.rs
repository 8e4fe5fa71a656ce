//! Embedded raster faces.
//!
//! The registry names CSS families for clients; the painter only ever draws with
//! the DejaVu faces bundled here, picked by `FontFace` and weight.

use ab_glyph::FontRef;
use serde::{Deserialize, Serialize};

use crate::render::RenderError;

static SANS_REGULAR: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
static SANS_BOLD: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");
static SERIF_REGULAR: &[u8] = include_bytes!("../../assets/fonts/DejaVuSerif.ttf");
static SERIF_BOLD: &[u8] = include_bytes!("../../assets/fonts/DejaVuSerif-Bold.ttf");
static MONO_REGULAR: &[u8] = include_bytes!("../../assets/fonts/DejaVuSansMono.ttf");
static MONO_BOLD: &[u8] = include_bytes!("../../assets/fonts/DejaVuSansMono-Bold.ttf");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontFace {
    Sans,
    Serif,
    Mono,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weight {
    Regular,
    Bold,
}

/// All six faces, parsed once at startup and shared read-only.
pub struct FontLibrary {
    sans: [FontRef<'static>; 2],
    serif: [FontRef<'static>; 2],
    mono: [FontRef<'static>; 2],
}

impl FontLibrary {
    pub fn load() -> Result<Self, RenderError> {
        Ok(Self {
            sans: [parse("sans", SANS_REGULAR)?, parse("sans-bold", SANS_BOLD)?],
            serif: [parse("serif", SERIF_REGULAR)?, parse("serif-bold", SERIF_BOLD)?],
            mono: [parse("mono", MONO_REGULAR)?, parse("mono-bold", MONO_BOLD)?],
        })
    }

    pub fn get(&self, face: FontFace, weight: Weight) -> &FontRef<'static> {
        let pair = match face {
            FontFace::Sans => &self.sans,
            FontFace::Serif => &self.serif,
            FontFace::Mono => &self.mono,
        };
        match weight {
            Weight::Regular => &pair[0],
            Weight::Bold => &pair[1],
        }
    }
}

impl std::fmt::Debug for FontLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FontLibrary { sans, serif, mono }")
    }
}

fn parse(name: &'static str, data: &'static [u8]) -> Result<FontRef<'static>, RenderError> {
    FontRef::try_from_slice(data).map_err(|_| RenderError::FontLoad(name))
}

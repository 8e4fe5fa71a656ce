//! Immutable palette and font-pairing registries.
//!
//! A registry is built once and handed to the resolver explicitly. The first entry of
//! each table is its default, which is what unknown keys fall back to.

use serde::Serialize;

use crate::models::design::{rgb, LayoutKind, Rgb};
use crate::render::fonts::FontFace;

pub const DEFAULT_PALETTE: &str = "neutral-slate";
pub const DEFAULT_FONT: &str = "default-sans";

#[derive(Debug, Clone, Serialize)]
pub struct Palette {
    pub key: &'static str,
    pub name: &'static str,
    #[serde(skip)]
    pub aliases: &'static [&'static str],
    pub primary: Rgb,
    pub secondary: Rgb,
    /// Missing accents are derived from `primary` at resolve time.
    pub accent: Option<Rgb>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FontPairing {
    pub key: &'static str,
    pub name: &'static str,
    #[serde(skip)]
    pub aliases: &'static [&'static str],
    pub heading_family: &'static str,
    pub heading_face: FontFace,
    pub body_family: &'static str,
    pub body_face: FontFace,
}

#[derive(Debug, Clone)]
pub struct DesignRegistry {
    palettes: Vec<Palette>,
    fonts: Vec<FontPairing>,
}

/// One entry of the template gallery.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DesignVariation {
    pub id: String,
    pub layout: &'static str,
    pub theme: &'static str,
    pub font: &'static str,
}

impl DesignRegistry {
    /// The shipped design tables. Both are non-empty; their first rows are the
    /// defaults.
    pub fn builtin() -> Self {
        Self {
            palettes: builtin_palettes(),
            fonts: builtin_fonts(),
        }
    }

    pub fn palettes(&self) -> &[Palette] {
        &self.palettes
    }

    pub fn fonts(&self) -> &[FontPairing] {
        &self.fonts
    }

    pub fn default_palette(&self) -> &Palette {
        &self.palettes[0]
    }

    pub fn default_font(&self) -> &FontPairing {
        &self.fonts[0]
    }

    pub fn palette(&self, key: &str) -> Option<&Palette> {
        let key = normalize(key);
        self.palettes
            .iter()
            .find(|p| p.key == key || p.aliases.contains(&key.as_str()))
    }

    pub fn font(&self, key: &str) -> Option<&FontPairing> {
        let key = normalize(key);
        self.fonts
            .iter()
            .find(|f| f.key == key || f.aliases.contains(&key.as_str()))
    }

    /// Every layout × palette × font combination, in table order.
    pub fn variations(&self) -> Vec<DesignVariation> {
        let mut out =
            Vec::with_capacity(LayoutKind::ALL.len() * self.palettes.len() * self.fonts.len());
        for layout in LayoutKind::ALL {
            for palette in &self.palettes {
                for font in &self.fonts {
                    out.push(DesignVariation {
                        id: format!("{}-{}-{}", layout.key(), palette.key, font.key),
                        layout: layout.key(),
                        theme: palette.key,
                        font: font.key,
                    });
                }
            }
        }
        out
    }
}

fn normalize(key: &str) -> String {
    key.trim().to_ascii_lowercase()
}

// ────────────────────────────────────────────────────────────────────────────
// Builtin tables
// ────────────────────────────────────────────────────────────────────────────

fn builtin_palettes() -> Vec<Palette> {
    const fn p(
        key: &'static str,
        name: &'static str,
        aliases: &'static [&'static str],
        primary: u32,
        secondary: u32,
        accent: Option<u32>,
    ) -> Palette {
        Palette {
            key,
            name,
            aliases,
            primary: rgb(primary),
            secondary: rgb(secondary),
            accent: match accent {
                Some(a) => Some(rgb(a)),
                None => None,
            },
        }
    }

    vec![
        p(DEFAULT_PALETTE, "Slate", &["slate"], 0x475569, 0x94a3b8, Some(0xe2e8f0)),
        p("ocean-blue", "Ocean Blue", &["blue"], 0x2563eb, 0x60a5fa, Some(0xdbeafe)),
        p("emerald", "Emerald", &[], 0x059669, 0x34d399, Some(0xd1fae5)),
        p("violet", "Violet", &[], 0x7c3aed, 0xa78bfa, Some(0xede9fe)),
        p("rose", "Rose", &[], 0xe11d48, 0xfb7185, Some(0xffe4e6)),
        p("amber", "Amber", &[], 0xd97706, 0xfbbf24, Some(0xfef3c7)),
        p("cyan", "Cyan", &[], 0x0891b2, 0x22d3ee, Some(0xcffafe)),
        p("fuchsia", "Fuchsia", &[], 0xc026d3, 0xe879f9, Some(0xfae8ff)),
        p("lime", "Lime", &[], 0x65a30d, 0xa3e635, Some(0xecfccb)),
        p("charcoal", "Charcoal", &["neutral"], 0x262626, 0x525252, Some(0xe5e5e5)),
        p("teal", "Teal", &[], 0x0d9488, 0x2dd4bf, None),
        p("sky", "Sky", &[], 0x0284c7, 0x38bdf8, None),
        p("monochrome", "Monochrome", &["black"], 0x000000, 0x525252, None),
    ]
}

fn builtin_fonts() -> Vec<FontPairing> {
    const fn f(
        key: &'static str,
        name: &'static str,
        aliases: &'static [&'static str],
        heading: (&'static str, FontFace),
        body: (&'static str, FontFace),
    ) -> FontPairing {
        FontPairing {
            key,
            name,
            aliases,
            heading_family: heading.0,
            heading_face: heading.1,
            body_family: body.0,
            body_face: body.1,
        }
    }

    use FontFace::*;
    vec![
        f(
            DEFAULT_FONT,
            "Modern Sans",
            &["inter", "sans"],
            ("\"Inter\", sans-serif", Sans),
            ("\"Inter\", sans-serif", Sans),
        ),
        f(
            "classic-serif",
            "Classic Serif",
            &["merriweather", "serif"],
            ("\"Merriweather\", serif", Serif),
            ("\"Open Sans\", sans-serif", Sans),
        ),
        f(
            "modern-slab",
            "Modern Slab",
            &["roboto"],
            ("\"Roboto\", sans-serif", Sans),
            ("\"Roboto Slab\", serif", Serif),
        ),
        f(
            "elegant-display",
            "Elegant Display",
            &["playfair", "hybrid"],
            ("\"Playfair Display\", serif", Serif),
            ("\"Lato\", sans-serif", Sans),
        ),
        f(
            "bold-condensed",
            "Bold Condensed",
            &["oswald"],
            ("\"Oswald\", sans-serif", Sans),
            ("\"Raleway\", sans-serif", Sans),
        ),
        f(
            "tech-mono",
            "Tech Mono",
            &["mono"],
            ("\"JetBrains Mono\", monospace", Mono),
            ("\"JetBrains Mono\", monospace", Mono),
        ),
        f(
            "executive",
            "Executive",
            &[],
            ("Garamond, serif", Serif),
            ("Arial, sans-serif", Sans),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_first_entries() {
        let reg = DesignRegistry::builtin();
        assert_eq!(reg.default_palette().key, DEFAULT_PALETTE);
        assert_eq!(reg.default_font().key, DEFAULT_FONT);
    }

    #[test]
    fn test_lookup_by_alias_and_case() {
        let reg = DesignRegistry::builtin();
        assert_eq!(reg.palette("Blue").map(|p| p.key), Some("ocean-blue"));
        assert_eq!(reg.palette(" slate ").map(|p| p.key), Some(DEFAULT_PALETTE));
        assert_eq!(reg.font("merriweather").map(|f| f.key), Some("classic-serif"));
        assert!(reg.palette("plaid").is_none());
    }

    #[test]
    fn test_keys_and_aliases_are_unique() {
        let reg = DesignRegistry::builtin();
        let mut seen: Vec<&str> = Vec::new();
        for p in reg.palettes() {
            for k in std::iter::once(&p.key).chain(p.aliases.iter()) {
                assert!(!seen.contains(k), "duplicate palette key {k}");
                seen.push(*k);
            }
        }
        seen.clear();
        for f in reg.fonts() {
            for k in std::iter::once(&f.key).chain(f.aliases.iter()) {
                assert!(!seen.contains(k), "duplicate font key {k}");
                seen.push(*k);
            }
        }
    }

    #[test]
    fn test_variations_cover_every_combination() {
        let reg = DesignRegistry::builtin();
        let all = reg.variations();
        assert_eq!(
            all.len(),
            LayoutKind::ALL.len() * reg.palettes().len() * reg.fonts().len()
        );
        assert_eq!(all[0].id, "single-column-modern-neutral-slate-default-sans");
    }
}

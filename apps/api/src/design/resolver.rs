use serde::Serialize;
use tracing::debug;

use crate::design::registry::DesignRegistry;
use crate::models::design::{DesignConfiguration, DesignInput, LayoutKind, Rgb};
use crate::render::fonts::FontFace;

/// How far a missing accent is lifted toward white from `primary`.
const DERIVED_ACCENT_TINT: f32 = 0.85;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FontSpec {
    /// CSS family string for clients that render themselves.
    pub family: String,
    /// Embedded face the painter draws with.
    pub face: FontFace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DesignAxis {
    Layout,
    Theme,
    Font,
    Accent,
}

/// A silent substitution made while resolving. Informational only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigFallback {
    pub axis: DesignAxis,
    /// `None` when the axis was not supplied at all.
    pub requested: Option<String>,
    pub substituted: String,
}

/// Fully concrete style set. Composition and painting need nothing else.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedStyle {
    pub layout: LayoutKind,
    pub theme: String,
    pub font: String,
    pub primary: Rgb,
    pub secondary: Rgb,
    pub accent: Rgb,
    pub heading_font: FontSpec,
    pub body_font: FontSpec,
    pub fallbacks: Vec<ConfigFallback>,
}

/// Resolves a design input against a registry. Never fails: every unknown or
/// missing axis falls back to the registry default.
pub fn resolve_design(registry: &DesignRegistry, input: DesignInput) -> ResolvedStyle {
    resolve_configuration(registry, &input.into_configuration())
}

pub fn resolve_configuration(
    registry: &DesignRegistry,
    config: &DesignConfiguration,
) -> ResolvedStyle {
    let mut fallbacks = Vec::new();

    let layout = match config.layout.as_deref().and_then(LayoutKind::from_key) {
        Some(layout) => layout,
        None => {
            let layout = LayoutKind::default();
            fallbacks.push(ConfigFallback {
                axis: DesignAxis::Layout,
                requested: config.layout.clone(),
                substituted: layout.key().to_string(),
            });
            layout
        }
    };

    let palette = match config.theme.as_deref().and_then(|k| registry.palette(k)) {
        Some(palette) => palette,
        None => {
            let palette = registry.default_palette();
            fallbacks.push(ConfigFallback {
                axis: DesignAxis::Theme,
                requested: config.theme.clone(),
                substituted: palette.key.to_string(),
            });
            palette
        }
    };

    let fonts = match config.font.as_deref().and_then(|k| registry.font(k)) {
        Some(fonts) => fonts,
        None => {
            let fonts = registry.default_font();
            fallbacks.push(ConfigFallback {
                axis: DesignAxis::Font,
                requested: config.font.clone(),
                substituted: fonts.key.to_string(),
            });
            fonts
        }
    };

    let accent = match palette.accent {
        Some(accent) => accent,
        None => {
            let accent = palette.primary.tint(DERIVED_ACCENT_TINT);
            fallbacks.push(ConfigFallback {
                axis: DesignAxis::Accent,
                requested: None,
                substituted: accent.to_hex(),
            });
            accent
        }
    };

    for fb in &fallbacks {
        debug!(
            "Design fallback on {:?}: requested {:?}, using '{}'",
            fb.axis, fb.requested, fb.substituted
        );
    }

    ResolvedStyle {
        layout,
        theme: palette.key.to_string(),
        font: fonts.key.to_string(),
        primary: palette.primary,
        secondary: palette.secondary,
        accent,
        heading_font: FontSpec {
            family: fonts.heading_family.to_string(),
            face: fonts.heading_face,
        },
        body_font: FontSpec {
            family: fonts.body_family.to_string(),
            face: fonts.body_face,
        },
        fallbacks,
    }
}

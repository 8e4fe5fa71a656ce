use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ────────────────────────────────────────────────────────────────────────────
// Layout skeletons
// ────────────────────────────────────────────────────────────────────────────

/// Closed set of page skeletons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutKind {
    #[default]
    SingleColumnModern,
    SidebarLeft,
    TwoColumnSplit,
    CenteredMinimal,
    HeaderHeavy,
    Compact,
}

impl LayoutKind {
    pub const ALL: [LayoutKind; 6] = [
        LayoutKind::SingleColumnModern,
        LayoutKind::SidebarLeft,
        LayoutKind::TwoColumnSplit,
        LayoutKind::CenteredMinimal,
        LayoutKind::HeaderHeavy,
        LayoutKind::Compact,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            LayoutKind::SingleColumnModern => "single-column-modern",
            LayoutKind::SidebarLeft => "sidebar-left",
            LayoutKind::TwoColumnSplit => "two-column-split",
            LayoutKind::CenteredMinimal => "centered-minimal",
            LayoutKind::HeaderHeavy => "header-heavy",
            LayoutKind::Compact => "compact",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LayoutKind::SingleColumnModern => "Classic Professional",
            LayoutKind::SidebarLeft => "Modern Sidebar",
            LayoutKind::TwoColumnSplit => "Executive Split",
            LayoutKind::CenteredMinimal => "Minimalist",
            LayoutKind::HeaderHeavy => "Creative Header",
            LayoutKind::Compact => "Compact",
        }
    }

    /// Short keys accepted alongside the canonical ones.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            LayoutKind::SingleColumnModern => &["classic", "single-column", "full-width"],
            LayoutKind::SidebarLeft => &["modern", "sidebar"],
            LayoutKind::TwoColumnSplit => &["executive", "two-column"],
            LayoutKind::CenteredMinimal => &["minimal", "centered"],
            LayoutKind::HeaderHeavy => &["creative"],
            LayoutKind::Compact => &["dense"],
        }
    }

    /// Case-insensitive lookup over canonical keys and aliases.
    pub fn from_key(key: &str) -> Option<LayoutKind> {
        let key = key.trim().to_ascii_lowercase();
        LayoutKind::ALL
            .into_iter()
            .find(|l| l.key() == key || l.aliases().contains(&key.as_str()))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Colors
// ────────────────────────────────────────────────────────────────────────────

/// sRGB color, serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Builds a color from a `0xRRGGBB` literal.
pub const fn rgb(hex: u32) -> Rgb {
    Rgb {
        r: ((hex >> 16) & 0xff) as u8,
        g: ((hex >> 8) & 0xff) as u8,
        b: (hex & 0xff) as u8,
    }
}

impl Rgb {
    pub const WHITE: Rgb = rgb(0xffffff);
    pub const BLACK: Rgb = rgb(0x000000);

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn parse_hex(s: &str) -> Option<Rgb> {
        let digits = s.trim().strip_prefix('#')?;
        if digits.len() != 6 {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(rgb)
    }

    /// Linear blend toward white; `amount` in [0, 1].
    pub fn tint(&self, amount: f32) -> Rgb {
        let amount = amount.clamp(0.0, 1.0);
        let mix = |c: u8| (c as f32 + (255.0 - c as f32) * amount).round() as u8;
        Rgb {
            r: mix(self.r),
            g: mix(self.g),
            b: mix(self.b),
        }
    }

    pub fn to_rgba(&self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgb::parse_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color '{s}'")))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Design input
// ────────────────────────────────────────────────────────────────────────────

/// The (layout, theme, font) triple. Every axis may be missing or unknown;
/// the resolver substitutes defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignConfiguration {
    pub layout: Option<String>,
    pub theme: Option<String>,
    pub font: Option<String>,
}

/// Design input as callers send it: either a bare layout name (older clients)
/// or a full configuration object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DesignInput {
    LegacyLayoutName(String),
    Full(DesignConfiguration),
}

impl Default for DesignInput {
    fn default() -> Self {
        DesignInput::Full(DesignConfiguration::default())
    }
}

impl DesignInput {
    /// Normalizes both input shapes into a configuration.
    pub fn into_configuration(self) -> DesignConfiguration {
        match self {
            DesignInput::LegacyLayoutName(layout) => DesignConfiguration {
                layout: Some(layout),
                theme: None,
                font: None,
            },
            DesignInput::Full(config) => config,
        }
    }
}

impl From<DesignInput> for DesignConfiguration {
    fn from(input: DesignInput) -> Self {
        input.into_configuration()
    }
}

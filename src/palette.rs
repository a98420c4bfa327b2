use crate::error::DashboardError;
use crate::types::Gender;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An RGB color, parsed from and printed as an `#rrggbb` hex value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbColor {
    r: u8,
    g: u8,
    b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the leading `#` may be omitted, case is ignored).
    pub fn parse(s: &str) -> Result<Self, DashboardError> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DashboardError::InvalidColor {
                value: s.trim().to_string(),
            });
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).expect("validated hex digits")
        };
        Ok(Self {
            r: channel(0..2),
            g: channel(2..4),
            b: channel(4..6),
        })
    }

    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

impl FromStr for RgbColor {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RgbColor::parse(s)
    }
}

impl Serialize for RgbColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex())
    }
}

// Fixed triples in gender order (Female, Male, Diverse).
const DEFAULT_TRIPLE: [RgbColor; 3] = [
    RgbColor::new(0xFF, 0x6B, 0x6B),
    RgbColor::new(0x41, 0x69, 0xE1),
    RgbColor::new(0x95, 0xB8, 0xD1),
];

// Representative first three colors of ColorBrewer 'Paired', used for the
// legend; the chart scale itself names the scheme.
const PAIRED_TRIPLE: [RgbColor; 3] = [
    RgbColor::new(0xA6, 0xCE, 0xE3),
    RgbColor::new(0x1F, 0x78, 0xB4),
    RgbColor::new(0xB2, 0xDF, 0x8A),
];

/// Okabe-Ito: orange / blue / green, distinguishable under common
/// color-vision deficiencies.
pub const OKABE_ITO_TRIPLE: [RgbColor; 3] = [
    RgbColor::new(0xE6, 0x9F, 0x00),
    RgbColor::new(0x00, 0x72, 0xB2),
    RgbColor::new(0x00, 0x9E, 0x73),
];

/// The closed set of palette sources the viewer can pick from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteSource {
    Default,
    ColorBrewerPaired,
    OkabeIto,
    Custom,
}

impl PaletteSource {
    pub const ALL: [PaletteSource; 4] = [
        PaletteSource::Default,
        PaletteSource::ColorBrewerPaired,
        PaletteSource::OkabeIto,
        PaletteSource::Custom,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PaletteSource::Default => "Default (red/blue/lightblue)",
            PaletteSource::ColorBrewerPaired => "ColorBrewer (Paired)",
            PaletteSource::OkabeIto => "Okabe-Ito (Colorblind-friendly)",
            PaletteSource::Custom => "Custom",
        }
    }
}

impl fmt::Display for PaletteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaletteSource {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "default" | "default (red/blue/lightblue)" => Ok(PaletteSource::Default),
            "paired" | "colorbrewer" | "colorbrewer-paired" | "colorbrewer (paired)" => {
                Ok(PaletteSource::ColorBrewerPaired)
            }
            "okabe-ito" | "okabeito" | "okabe-ito (colorblind-friendly)" => {
                Ok(PaletteSource::OkabeIto)
            }
            "custom" => Ok(PaletteSource::Custom),
            _ => Err(DashboardError::UnknownPalette {
                name: s.trim().to_string(),
            }),
        }
    }
}

/// The viewer's three independently picked colors, used when the palette
/// source is `Custom`. Defaults match the default palette, like the pickers
/// they stand in for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomColors {
    pub female: RgbColor,
    pub male: RgbColor,
    pub diverse: RgbColor,
}

impl Default for CustomColors {
    fn default() -> Self {
        Self {
            female: DEFAULT_TRIPLE[0],
            male: DEFAULT_TRIPLE[1],
            diverse: DEFAULT_TRIPLE[2],
        }
    }
}

/// A total mapping from the gender domain to colors, plus an optional named
/// scheme the chart scale may prefer over the explicit range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorMapping {
    pub female: RgbColor,
    pub male: RgbColor,
    pub diverse: RgbColor,
    /// Vega scheme name; set only by the ColorBrewer palette.
    pub scheme: Option<&'static str>,
}

impl ColorMapping {
    fn from_triple(triple: [RgbColor; 3]) -> Self {
        Self {
            female: triple[0],
            male: triple[1],
            diverse: triple[2],
            scheme: None,
        }
    }

    pub fn color(&self, gender: Gender) -> RgbColor {
        match gender {
            Gender::Female => self.female,
            Gender::Male => self.male,
            Gender::Diverse => self.diverse,
        }
    }

    /// Hex values in the fixed gender order, for chart color ranges.
    pub fn range(&self) -> [String; 3] {
        [self.female.hex(), self.male.hex(), self.diverse.hex()]
    }
}

/// Resolve the active color mapping from the viewer's palette choices.
///
/// Pure and total: the colorblind override always wins and always yields the
/// Okabe-Ito triple; otherwise the named source decides, with `Custom`
/// honoring the viewer's three picks. Out-of-domain names never reach this
/// function — they are rejected when parsed into [`PaletteSource`].
pub fn resolve(
    source: PaletteSource,
    colorblind_override: bool,
    custom: &CustomColors,
) -> ColorMapping {
    if colorblind_override {
        return ColorMapping::from_triple(OKABE_ITO_TRIPLE);
    }
    match source {
        PaletteSource::Default => ColorMapping::from_triple(DEFAULT_TRIPLE),
        PaletteSource::ColorBrewerPaired => ColorMapping {
            scheme: Some("paired"),
            ..ColorMapping::from_triple(PAIRED_TRIPLE)
        },
        PaletteSource::OkabeIto => ColorMapping::from_triple(OKABE_ITO_TRIPLE),
        PaletteSource::Custom => ColorMapping {
            female: custom.female,
            male: custom.male,
            diverse: custom.diverse,
            scheme: None,
        },
    }
}

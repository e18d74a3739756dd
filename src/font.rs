//! Font and text-alignment state for text drawing.
//!
//! These mirror the font shorthand and alignment properties of a 2D canvas
//! context. Unrecognised keywords parse to `None`; the text renderer then
//! leaves the corresponding surface state untouched.

use cosmic_text::{Family, Style, Weight};

/// Font style keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

impl FontStyle {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "normal" => Some(Self::Normal),
            "italic" => Some(Self::Italic),
            "oblique" => Some(Self::Oblique),
            _ => None,
        }
    }

    pub fn as_css(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Italic => "italic",
            Self::Oblique => "oblique",
        }
    }

    pub fn to_cosmic(self) -> Style {
        match self {
            Self::Normal => Style::Normal,
            Self::Italic => Style::Italic,
            Self::Oblique => Style::Oblique,
        }
    }
}

/// Font variant keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontVariant {
    #[default]
    Normal,
    SmallCaps,
}

impl FontVariant {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "normal" => Some(Self::Normal),
            "small-caps" => Some(Self::SmallCaps),
            _ => None,
        }
    }

    pub fn as_css(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::SmallCaps => "small-caps",
        }
    }
}

/// Font weight: an absolute CSS value, or one of the relative keywords.
///
/// Relative keywords are kept as written so the font shorthand reads back the
/// way the caller spelled it. For rendering they resolve against a normal
/// parent weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontWeight {
    Absolute(u16),
    Bolder,
    Lighter,
}

impl FontWeight {
    pub const NORMAL: Self = Self::Absolute(400);
    pub const BOLD: Self = Self::Absolute(700);

    /// Parse a keyword (`normal`, `bold`, `bolder`, `lighter`) or a number.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "normal" => Some(Self::NORMAL),
            "bold" => Some(Self::BOLD),
            "bolder" => Some(Self::Bolder),
            "lighter" => Some(Self::Lighter),
            other => other.parse::<u16>().ok().and_then(Self::from_number),
        }
    }

    /// Accept numeric weights in the 1-1000 range.
    pub fn from_number(value: u16) -> Option<Self> {
        (1..=1000).contains(&value).then_some(Self::Absolute(value))
    }

    /// Numeric weight used for rendering.
    pub fn value(self) -> u16 {
        match self {
            Self::Absolute(n) => n,
            Self::Bolder => 700,
            Self::Lighter => 100,
        }
    }

    pub fn as_css(self) -> String {
        match self {
            Self::Absolute(400) => "normal".to_string(),
            Self::Absolute(700) => "bold".to_string(),
            Self::Absolute(n) => n.to_string(),
            Self::Bolder => "bolder".to_string(),
            Self::Lighter => "lighter".to_string(),
        }
    }

    pub fn to_cosmic(self) -> Weight {
        Weight(self.value())
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Complete font description for text drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    /// Size in logical pixels
    pub size: f32,
    pub style: FontStyle,
    pub variant: FontVariant,
    pub weight: FontWeight,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            style: FontStyle::Normal,
            variant: FontVariant::Normal,
            weight: FontWeight::NORMAL,
        }
    }

    /// The CSS font shorthand, e.g. `normal normal bold 16px arial`.
    pub fn to_css(&self) -> String {
        format!(
            "{} {} {} {}px {}",
            self.style.as_css(),
            self.variant.as_css(),
            self.weight.as_css(),
            self.size,
            self.family
        )
    }

    /// Convert the family to cosmic-text's family type. Generic CSS family
    /// names map to cosmic-text's generic families.
    pub fn family_to_cosmic(&self) -> Family<'_> {
        match self.family.as_str() {
            "sans-serif" => Family::SansSerif,
            "serif" => Family::Serif,
            "monospace" => Family::Monospace,
            "cursive" => Family::Cursive,
            "fantasy" => Family::Fantasy,
            name => Family::Name(name),
        }
    }
}

impl Default for FontSpec {
    /// The initial font of a fresh drawing context: `10px sans-serif`.
    fn default() -> Self {
        Self::new("sans-serif", 10.0)
    }
}

/// Horizontal text alignment relative to the drawing point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextAlign {
    #[default]
    Start,
    End,
    Left,
    Right,
    Center,
}

impl TextAlign {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "start" => Some(Self::Start),
            "end" => Some(Self::End),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "center" => Some(Self::Center),
            _ => None,
        }
    }

    pub fn as_css(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
            Self::Left => "left",
            Self::Right => "right",
            Self::Center => "center",
        }
    }

    /// Fraction of the text width to shift left, for left-to-right text.
    pub fn offset_factor(self) -> f32 {
        match self {
            Self::Start | Self::Left => 0.0,
            Self::Center => 0.5,
            Self::End | Self::Right => 1.0,
        }
    }
}

/// Vertical text alignment relative to the drawing point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextBaseline {
    Top,
    Hanging,
    Middle,
    #[default]
    Alphabetic,
    Ideographic,
    Bottom,
}

impl TextBaseline {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "top" => Some(Self::Top),
            "hanging" => Some(Self::Hanging),
            "middle" => Some(Self::Middle),
            "alphabetic" => Some(Self::Alphabetic),
            "ideographic" => Some(Self::Ideographic),
            "bottom" => Some(Self::Bottom),
            _ => None,
        }
    }

    pub fn as_css(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Hanging => "hanging",
            Self::Middle => "middle",
            Self::Alphabetic => "alphabetic",
            Self::Ideographic => "ideographic",
            Self::Bottom => "bottom",
        }
    }
}

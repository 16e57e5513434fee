/// Text content: frames, paragraphs, runs and run-level font attributes.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Font size in hundredths of a point (the DrawingML `sz` unit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FontSize(pub u32);

impl FontSize {
    /// Create a font size from points, rounded to the nearest hundredth.
    pub fn from_points(points: f64) -> Self {
        FontSize((points * 100.0).round().max(0.0) as u32)
    }

    /// Size in points.
    #[inline]
    pub fn points(self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

/// An explicit 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RgbColor(pub u8, pub u8, pub u8);

impl RgbColor {
    /// Parse a six-digit hex string such as `"4472C4"` (a leading `#` is accepted).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(RgbColor(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Uppercase hex form, e.g. `"FF0000"`.
    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for RgbColor {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        RgbColor::from_hex(&value).ok_or_else(|| format!("invalid RGB color: {:?}", value))
    }
}

impl From<RgbColor> for String {
    fn from(color: RgbColor) -> Self {
        color.to_hex()
    }
}

/// Run color: either explicit RGB or a reference into the theme color scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    /// Explicit `a:srgbClr`
    Rgb(RgbColor),
    /// Theme reference `a:schemeClr`, e.g. `accent1`
    Scheme(String),
}

impl Color {
    /// The explicit RGB value, if this is not a theme reference.
    #[inline]
    pub fn rgb(&self) -> Option<RgbColor> {
        match self {
            Color::Rgb(rgb) => Some(*rgb),
            Color::Scheme(_) => None,
        }
    }
}

/// Run-level font attributes.
///
/// Every attribute is optional; `None` means "inherit from the paragraph,
/// layout or theme" and must never be replaced by an arbitrary fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Font {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub size: Option<FontSize>,
    pub family: Option<String>,
    pub color: Option<Color>,
}

impl Font {
    /// Whether no attribute is set explicitly.
    pub fn is_inherited(&self) -> bool {
        *self == Font::default()
    }
}

/// Paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
    Distributed,
}

/// The smallest unit of formatted text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Run {
    pub text: String,
    pub font: Font,
}

impl Run {
    /// A run with inherited formatting.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: Font::default(),
        }
    }

    /// A run with explicit font attributes.
    pub fn with_font(text: impl Into<String>, font: Font) -> Self {
        Self {
            text: text.into(),
            font,
        }
    }
}

/// A paragraph: ordered runs plus paragraph-level attributes.
///
/// `default_font` models the paragraph's inherited run defaults
/// (`a:pPr/a:defRPr` and `a:endParaRPr`). Placeholders created from a layout
/// receive the layout's defaults on their first paragraph; a freshly appended
/// paragraph has none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Paragraph {
    pub alignment: Option<Alignment>,
    pub level: u8,
    pub runs: Vec<Run>,
    pub default_font: Font,
}

impl Paragraph {
    /// An empty paragraph with no runs.
    pub fn new() -> Self {
        Self::default()
    }

    /// A paragraph holding a single run.
    pub fn from_run(run: Run) -> Self {
        Self {
            runs: vec![run],
            ..Self::default()
        }
    }

    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Replace all runs with a single run holding `text` and inherited formatting.
    pub fn set_text(&mut self, text: &str) {
        self.runs.clear();
        self.runs.push(Run::new(text));
    }

    /// Remove all runs, keeping paragraph attributes.
    pub fn clear(&mut self) {
        self.runs.clear();
    }
}

/// Text body of a shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFrame {
    pub paragraphs: Vec<Paragraph>,
}

impl Default for TextFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl TextFrame {
    /// A text frame holding one empty paragraph (a text body always has at least one).
    pub fn new() -> Self {
        Self {
            paragraphs: vec![Paragraph::new()],
        }
    }

    /// A text frame with one plain paragraph per line of `text`.
    pub fn from_text(text: &str) -> Self {
        let paragraphs: Vec<Paragraph> = text
            .split('\n')
            .map(|line| Paragraph::from_run(Run::new(line)))
            .collect();
        Self { paragraphs }
    }

    /// Paragraph texts joined with newlines.
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether any run carries non-whitespace text.
    pub fn has_visible_text(&self) -> bool {
        self.paragraphs
            .iter()
            .flat_map(|p| p.runs.iter())
            .any(|r| !r.text.trim().is_empty())
    }

    /// First paragraph, created if the frame is empty.
    pub fn first_paragraph_mut(&mut self) -> &mut Paragraph {
        if self.paragraphs.is_empty() {
            self.paragraphs.push(Paragraph::new());
        }
        &mut self.paragraphs[0]
    }

    /// Append a new empty paragraph and return it.
    pub fn add_paragraph(&mut self) -> &mut Paragraph {
        self.paragraphs.push(Paragraph::new());
        let last = self.paragraphs.len() - 1;
        &mut self.paragraphs[last]
    }
}

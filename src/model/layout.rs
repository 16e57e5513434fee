/// Slide layouts: named templates that slides are bound to.
use crate::model::shape::{Geometry, PlaceholderRole, Shape};
use crate::model::text::{Font, TextFrame};
use serde::{Deserialize, Serialize};

/// Identifier of a layout within its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutId(pub u32);

/// A placeholder slot defined by a layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderTemplate {
    pub idx: u32,
    pub role: PlaceholderRole,
    pub name: String,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    /// Run defaults inherited by the first paragraph of the placeholder
    #[serde(default)]
    pub default_font: Font,
}

impl PlaceholderTemplate {
    pub fn new(idx: u32, role: PlaceholderRole, name: impl Into<String>) -> Self {
        Self {
            idx,
            role,
            name: name.into(),
            geometry: None,
            default_font: Font::default(),
        }
    }

    /// Builder method: set the inherited run defaults.
    pub fn with_default_font(mut self, font: Font) -> Self {
        self.default_font = font;
        self
    }

    /// Instantiate this slot as a placeholder shape on a new slide.
    pub(crate) fn instantiate(&self, shape_id: u32) -> Shape {
        let mut shape = Shape::placeholder(shape_id, self.name.clone(), self.idx, self.role);
        shape.geometry = self.geometry;
        if let Some(frame) = shape.text_frame.as_mut() {
            *frame = TextFrame::new();
            frame.first_paragraph_mut().default_font = self.default_font.clone();
        }
        shape
    }
}

/// A named slide template (e.g. "Title and Content").
///
/// Read-only from the editor's point of view and shared by any number of slides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub id: LayoutId,
    pub name: String,
    #[serde(default)]
    pub placeholders: Vec<PlaceholderTemplate>,
}

impl Layout {
    /// Placeholder template with the given index.
    pub fn placeholder(&self, idx: u32) -> Option<&PlaceholderTemplate> {
        self.placeholders.iter().find(|p| p.idx == idx)
    }
}

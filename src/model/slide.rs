/// A single slide: shapes, an optional background override and its relationships.
use crate::model::background::BackgroundOverride;
use crate::model::layout::LayoutId;
use crate::model::rels::Relationships;
use crate::model::shape::Shape;
use serde::{Deserialize, Serialize};

/// A slide in a presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    /// Layout the slide is bound to
    pub layout: LayoutId,
    /// Shapes in z-order
    #[serde(default)]
    pub shapes: Vec<Shape>,
    /// Background replacing the layout's, if any
    #[serde(default)]
    pub background: Option<BackgroundOverride>,
    /// Relationships from this slide to image, chart and media parts
    #[serde(default)]
    pub relationships: Relationships,
}

impl Slide {
    /// An empty slide bound to `layout`.
    pub fn new(layout: LayoutId) -> Self {
        Self {
            layout,
            shapes: Vec::new(),
            background: None,
            relationships: Relationships::new(),
        }
    }

    /// Background override, if the slide carries one.
    #[inline]
    pub fn background_override(&self) -> Option<&BackgroundOverride> {
        self.background.as_ref()
    }

    /// Attach a background override, replacing any existing one.
    pub fn set_background_override(&mut self, background: BackgroundOverride) {
        self.background = Some(background);
    }

    /// Drop the override so the layout background applies again.
    pub fn clear_background_override(&mut self) {
        self.background = None;
    }

    /// Placeholder shape with the given layout index.
    pub fn placeholder(&self, idx: u32) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.placeholder_index() == Some(idx))
    }

    /// Mutable placeholder shape with the given layout index.
    pub fn placeholder_mut(&mut self, idx: u32) -> Option<&mut Shape> {
        self.shapes
            .iter_mut()
            .find(|s| s.placeholder_index() == Some(idx))
    }

    /// Next unused shape ID. ID 1 is reserved for the shape tree root.
    pub fn next_shape_id(&self) -> u32 {
        self.shapes.iter().map(Shape::max_id).fold(1, u32::max) + 1
    }

    /// All visible text, one shape per line.
    pub fn text(&self) -> String {
        self.shapes
            .iter()
            .filter_map(Shape::text_frame)
            .flat_map(|frame| frame.paragraphs.iter())
            .map(|p| p.text())
            .filter(|t| !t.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

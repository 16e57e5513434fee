//! In-memory presentation tree.
//!
//! This is the document model the editor mutates: a [`Document`] owns
//! [`Layout`]s and an ordered list of [`Slide`]s; slides hold [`Shape`]s whose
//! text lives in [`TextFrame`] → [`Paragraph`] → [`Run`]. Slides are addressed
//! by 1-indexed position, which is not a stable identity: it shifts whenever
//! slides are inserted, deleted or reordered.

pub mod background;
pub mod document;
pub mod layout;
pub mod rels;
pub mod shape;
pub mod slide;
pub mod text;

pub use background::{BackgroundFill, BackgroundOverride};
pub use document::{Document, DocumentState, SlideId};
pub use layout::{Layout, LayoutId, PlaceholderTemplate};
pub use rels::{RelKind, Relationship, Relationships};
pub use shape::{Geometry, GraphicKind, PlaceholderFormat, PlaceholderRole, Shape, ShapeKind};
pub use slide::Slide;
pub use text::{Alignment, Color, Font, FontSize, Paragraph, RgbColor, Run, TextFrame};

use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

static XML_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\"", "'"])
        .expect("Failed to build XML escaper")
});

/// Escape XML special characters for use in an attribute value.
#[inline]
pub(crate) fn escape_attr(s: &str) -> String {
    XML_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr("a & b"), "a &amp; b");
        assert_eq!(escape_attr("\"x\"<y>"), "&quot;x&quot;&lt;y&gt;");
        assert_eq!(escape_attr("rId1"), "rId1");
    }
}

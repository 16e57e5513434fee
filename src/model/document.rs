/// The presentation document: layouts, the ordered slide list and slide parts.
///
/// The slide sequence mirrors the presentation's `sldIdLst`: an ordered list of
/// `(slide id, relationship id)` entries, where the relationship ID resolves to
/// the slide part. Order lives only in the list, so moving a slide never
/// touches the part itself, and removing a slide means removing both the list
/// entry and the relationship.
use crate::error::{EditError, Result};
use crate::model::layout::{Layout, LayoutId, PlaceholderTemplate};
use crate::model::rels::next_r_id;
use crate::model::slide::Slide;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

/// First slide ID handed out; lower values are reserved by the format.
const MIN_SLIDE_ID: u32 = 256;

/// Entry of the ordered slide list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlideId {
    pub id: u32,
    pub rel_id: String,
}

/// Whether the in-memory tree matches what was last loaded or saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentState {
    #[default]
    Clean,
    Dirty,
}

/// A presentation document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    layouts: Vec<Layout>,
    #[serde(default)]
    slide_ids: Vec<SlideId>,
    #[serde(default)]
    parts: BTreeMap<String, Slide>,
    #[serde(skip)]
    state: DocumentState,
    #[serde(skip)]
    source_path: Option<PathBuf>,
}

impl Document {
    /// Create an empty, clean document.
    pub fn new() -> Self {
        Self::default()
    }

    // --- state -----------------------------------------------------------

    #[inline]
    pub fn state(&self) -> DocumentState {
        self.state
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.state == DocumentState::Dirty
    }

    #[inline]
    pub(crate) fn mark_dirty(&mut self) {
        self.state = DocumentState::Dirty;
    }

    /// Mark the tree as persisted. Called by package adapters after load/save.
    pub fn mark_clean(&mut self) {
        self.state = DocumentState::Clean;
    }

    /// Path of the package this document was loaded from, if any.
    #[inline]
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub(crate) fn set_source_path(&mut self, path: PathBuf) {
        self.source_path = Some(path);
    }

    // --- layouts ---------------------------------------------------------

    /// Register a layout and return its ID.
    pub fn add_layout(
        &mut self,
        name: impl Into<String>,
        placeholders: Vec<PlaceholderTemplate>,
    ) -> LayoutId {
        let id = LayoutId(self.layouts.iter().map(|l| l.id.0).max().unwrap_or(0) + 1);
        self.layouts.push(Layout {
            id,
            name: name.into(),
            placeholders,
        });
        self.mark_dirty();
        id
    }

    #[inline]
    pub fn layouts(&self) -> &[Layout] {
        &self.layouts
    }

    pub fn layout(&self, id: LayoutId) -> Option<&Layout> {
        self.layouts.iter().find(|l| l.id == id)
    }

    pub fn layout_by_name(&self, name: &str) -> Option<&Layout> {
        self.layouts.iter().find(|l| l.name == name)
    }

    /// Layout a slide is bound to.
    pub fn layout_of(&self, slide: &Slide) -> Result<&Layout> {
        self.layout(slide.layout)
            .ok_or_else(|| EditError::NotFound(format!("layout {}", slide.layout.0)))
    }

    // --- slides ----------------------------------------------------------

    #[inline]
    pub fn slide_count(&self) -> usize {
        self.slide_ids.len()
    }

    /// The ordered slide list.
    #[inline]
    pub fn slide_ids(&self) -> &[SlideId] {
        &self.slide_ids
    }

    /// Convert a 1-indexed position into a list index.
    pub fn check_position(&self, position: usize) -> Result<usize> {
        if position == 0 || position > self.slide_count() {
            return Err(EditError::out_of_range(position, self.slide_count()));
        }
        Ok(position - 1)
    }

    /// Slide at a 1-indexed position.
    pub fn slide(&self, position: usize) -> Result<&Slide> {
        let index = self.check_position(position)?;
        let rel_id = &self.slide_ids[index].rel_id;
        self.parts
            .get(rel_id)
            .ok_or_else(|| EditError::NotFound(format!("slide part {}", rel_id)))
    }

    /// Mutable slide at a 1-indexed position. Marks the document dirty.
    pub fn slide_mut(&mut self, position: usize) -> Result<&mut Slide> {
        let index = self.check_position(position)?;
        let rel_id = self.slide_ids[index].rel_id.clone();
        self.mark_dirty();
        self.parts
            .get_mut(&rel_id)
            .ok_or_else(|| EditError::NotFound(format!("slide part {}", rel_id)))
    }

    /// Slides in presentation order.
    pub fn slides(&self) -> impl Iterator<Item = &Slide> {
        self.slide_ids
            .iter()
            .filter_map(|entry| self.parts.get(&entry.rel_id))
    }

    /// Create a new slide from `layout` and append it to the slide list.
    ///
    /// Every placeholder template of the layout is instantiated with an empty
    /// text body carrying the layout's defaults. Free shapes and background
    /// overrides are not part of a layout and are never created here.
    /// Returns the new slide's position.
    pub fn add_slide_with_layout(&mut self, layout: LayoutId) -> Result<usize> {
        let template = self
            .layout(layout)
            .ok_or_else(|| EditError::NotFound(format!("layout {}", layout.0)))?;

        let mut slide = Slide::new(layout);
        for placeholder in &template.placeholders {
            let shape_id = slide.next_shape_id();
            slide.shapes.push(placeholder.instantiate(shape_id));
        }

        let rel_id = next_r_id(self.parts.keys().map(String::as_str));
        let id = self
            .slide_ids
            .iter()
            .map(|s| s.id + 1)
            .max()
            .unwrap_or(MIN_SLIDE_ID)
            .max(MIN_SLIDE_ID);

        self.parts.insert(rel_id.clone(), slide);
        self.slide_ids.push(SlideId { id, rel_id });
        self.mark_dirty();
        Ok(self.slide_count())
    }

    /// Insert a list entry at a 1-indexed position (`slide_count + 1` appends).
    pub fn insert_at(&mut self, position: usize, entry: SlideId) -> Result<()> {
        if position == 0 || position > self.slide_count() + 1 {
            return Err(EditError::out_of_range(position, self.slide_count()));
        }
        if !self.parts.contains_key(&entry.rel_id) {
            return Err(EditError::NotFound(format!("slide part {}", entry.rel_id)));
        }
        self.slide_ids.insert(position - 1, entry);
        self.mark_dirty();
        Ok(())
    }

    /// Remove and return the list entry at a 1-indexed position.
    ///
    /// The slide part stays in the relationship table; see [`Document::drop_rel`].
    pub fn remove_at(&mut self, position: usize) -> Result<SlideId> {
        let index = self.check_position(position)?;
        self.mark_dirty();
        Ok(self.slide_ids.remove(index))
    }

    /// Replace the whole slide list with a new ordering of the same entries.
    pub fn replace_sequence(&mut self, new_order: Vec<SlideId>) -> Result<()> {
        let current: HashSet<&SlideId> = self.slide_ids.iter().collect();
        let proposed: HashSet<&SlideId> = new_order.iter().collect();
        if new_order.len() != self.slide_ids.len() || current != proposed {
            return Err(EditError::InvalidOrder(
                "new sequence must contain exactly the current slides".to_string(),
            ));
        }
        self.slide_ids = new_order;
        self.mark_dirty();
        Ok(())
    }

    /// Release a slide part's relationship, returning the part.
    ///
    /// A part still referenced from the slide list is not released.
    pub fn drop_rel(&mut self, rel_id: &str) -> Option<Slide> {
        if self.slide_ids.iter().any(|s| s.rel_id == rel_id) {
            return None;
        }
        let slide = self.parts.remove(rel_id)?;
        self.mark_dirty();
        Some(slide)
    }

    /// Whether a slide part is reachable through relationship `rel_id`.
    #[inline]
    pub fn has_part(&self, rel_id: &str) -> bool {
        self.parts.contains_key(rel_id)
    }

    // --- integrity -------------------------------------------------------

    /// Check the structural invariants of the tree.
    ///
    /// Every list entry resolves to a part and every part is listed exactly
    /// once; every slide references an existing layout; placeholder indices
    /// are unique within a slide. Violations are reported as
    /// [`EditError::Parse`] since they can only come from a bad package.
    pub fn validate(&self) -> Result<()> {
        let mut layout_ids = HashSet::new();
        for layout in &self.layouts {
            if !layout_ids.insert(layout.id) {
                return Err(EditError::Parse(format!("duplicate layout id {}", layout.id.0)));
            }
        }

        let mut seen_ids = HashSet::new();
        let mut seen_rels = HashSet::new();
        for entry in &self.slide_ids {
            if !seen_ids.insert(entry.id) {
                return Err(EditError::Parse(format!("duplicate slide id {}", entry.id)));
            }
            if !seen_rels.insert(entry.rel_id.as_str()) {
                return Err(EditError::Parse(format!(
                    "slide relationship {} listed twice",
                    entry.rel_id
                )));
            }
            if !self.parts.contains_key(&entry.rel_id) {
                return Err(EditError::Parse(format!(
                    "slide list references missing part {}",
                    entry.rel_id
                )));
            }
        }

        for (rel_id, slide) in &self.parts {
            if !seen_rels.contains(rel_id.as_str()) {
                return Err(EditError::Parse(format!(
                    "slide part {} is not in the slide list",
                    rel_id
                )));
            }
            if !layout_ids.contains(&slide.layout) {
                return Err(EditError::Parse(format!(
                    "slide {} references missing layout {}",
                    rel_id, slide.layout.0
                )));
            }
            let mut indices = HashSet::new();
            for idx in slide.shapes.iter().filter_map(|s| s.placeholder_index()) {
                if !indices.insert(idx) {
                    return Err(EditError::Parse(format!(
                        "slide {} has placeholder index {} twice",
                        rel_id, idx
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::shape::PlaceholderRole;

    fn two_slide_document() -> Document {
        let mut doc = Document::new();
        let layout = doc.add_layout(
            "Title and Content",
            vec![
                PlaceholderTemplate::new(0, PlaceholderRole::Title, "Title 1"),
                PlaceholderTemplate::new(1, PlaceholderRole::Body, "Content Placeholder 2"),
            ],
        );
        doc.add_slide_with_layout(layout).unwrap();
        doc.add_slide_with_layout(layout).unwrap();
        doc
    }

    #[test]
    fn test_new_document_is_clean() {
        let doc = Document::new();
        assert_eq!(doc.slide_count(), 0);
        assert_eq!(doc.state(), DocumentState::Clean);
    }

    #[test]
    fn test_add_slide_with_layout() {
        let doc = two_slide_document();
        assert_eq!(doc.slide_count(), 2);
        assert!(doc.is_dirty());
        assert_eq!(doc.slide_ids()[0].id, 256);
        assert_eq!(doc.slide_ids()[1].id, 257);
        assert_eq!(doc.slide_ids()[1].rel_id, "rId2");

        let slide = doc.slide(1).unwrap();
        assert_eq!(slide.shapes.len(), 2);
        assert_eq!(slide.shapes[0].id, 2);
        assert_eq!(slide.shapes[1].placeholder_index(), Some(1));
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn test_add_slide_unknown_layout() {
        let mut doc = Document::new();
        assert!(matches!(
            doc.add_slide_with_layout(LayoutId(9)),
            Err(EditError::NotFound(_))
        ));
    }

    #[test]
    fn test_positions_are_one_indexed() {
        let doc = two_slide_document();
        assert!(doc.slide(1).is_ok());
        assert!(matches!(
            doc.slide(0),
            Err(EditError::OutOfRange {
                position: 0,
                slide_count: 2
            })
        ));
        assert!(doc.slide(3).is_err());
    }

    #[test]
    fn test_remove_then_insert() {
        let mut doc = two_slide_document();
        let entry = doc.remove_at(2).unwrap();
        assert_eq!(doc.slide_count(), 1);
        doc.insert_at(1, entry.clone()).unwrap();
        assert_eq!(doc.slide_ids()[0], entry);
        assert!(doc.insert_at(5, entry).is_err());
    }

    #[test]
    fn test_drop_rel_refuses_listed_part() {
        let mut doc = two_slide_document();
        assert!(doc.drop_rel("rId1").is_none());

        let entry = doc.remove_at(1).unwrap();
        assert!(doc.drop_rel(&entry.rel_id).is_some());
        assert!(!doc.has_part(&entry.rel_id));
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn test_replace_sequence_rejects_foreign_entries() {
        let mut doc = two_slide_document();
        let mut order: Vec<SlideId> = doc.slide_ids().iter().rev().cloned().collect();
        doc.replace_sequence(order.clone()).unwrap();
        assert_eq!(doc.slide_ids()[0].rel_id, "rId2");

        order[0].rel_id = "rId99".to_string();
        assert!(matches!(
            doc.replace_sequence(order),
            Err(EditError::InvalidOrder(_))
        ));
    }

    #[test]
    fn test_validate_detects_orphan_part() {
        let mut doc = two_slide_document();
        doc.remove_at(1).unwrap();
        assert!(matches!(doc.validate(), Err(EditError::Parse(_))));
    }

    #[test]
    fn test_mark_clean() {
        let mut doc = two_slide_document();
        doc.mark_clean();
        assert!(!doc.is_dirty());
        doc.slide_mut(1).unwrap();
        assert!(doc.is_dirty());
    }
}

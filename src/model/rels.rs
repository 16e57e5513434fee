/// Per-slide relationship table.
///
/// A slide refers to the parts it depends on (images, charts, embedded
/// objects) through relationship IDs such as `rId3`. Shapes and background
/// fragments store only the ID, so copying content between slides must carry
/// the relationships along or the copy ends up pointing at nothing.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of part a relationship points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelKind {
    /// Image part, shareable between slides
    Image,
    /// Audio/video part, shareable between slides
    Media,
    /// Chart part, owned by exactly one slide
    Chart,
    /// Embedded OLE object, owned by exactly one slide
    OleObject,
    /// SmartArt diagram data, owned by exactly one slide
    Diagram,
    /// External hyperlink
    Hyperlink,
}

impl RelKind {
    /// Whether the target part may be referenced from several slides.
    ///
    /// Exclusive parts cannot be shared by a cloned shape without copying
    /// the part itself.
    #[inline]
    pub fn is_shareable(self) -> bool {
        matches!(self, RelKind::Image | RelKind::Media | RelKind::Hyperlink)
    }
}

/// A single relationship from a slide to a target part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub kind: RelKind,
    /// Target partname (e.g. `/ppt/media/image1.png`) or external URL
    pub target: String,
}

/// Relationships of one slide, keyed by relationship ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Relationships {
    rels: BTreeMap<String, Relationship>,
}

impl Relationships {
    /// Create an empty relationship table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a relationship by its ID.
    #[inline]
    pub fn get(&self, r_id: &str) -> Option<&Relationship> {
        self.rels.get(r_id)
    }

    /// Add a relationship under an explicit ID, replacing any previous one.
    pub fn insert(&mut self, r_id: impl Into<String>, kind: RelKind, target: impl Into<String>) {
        self.rels.insert(
            r_id.into(),
            Relationship {
                kind,
                target: target.into(),
            },
        );
    }

    /// Get or add a relationship to a target part.
    ///
    /// If a relationship of the same kind to the target already exists its ID
    /// is returned; otherwise a new one is created with the next free rId.
    pub fn get_or_add(&mut self, kind: RelKind, target: &str) -> String {
        if let Some((r_id, _)) = self
            .rels
            .iter()
            .find(|(_, rel)| rel.kind == kind && rel.target == target)
        {
            return r_id.clone();
        }

        let r_id = next_r_id(self.rels.keys().map(String::as_str));
        self.insert(r_id.clone(), kind, target);
        r_id
    }

    /// Remove a relationship by its ID.
    pub fn remove(&mut self, r_id: &str) -> Option<Relationship> {
        self.rels.remove(r_id)
    }

    /// Iterate over `(rId, relationship)` pairs in ID order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Relationship)> {
        self.rels.iter().map(|(id, rel)| (id.as_str(), rel))
    }

    /// Number of relationships.
    #[inline]
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    /// Whether the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }
}

/// Next available relationship ID in the `rIdN` format, filling gaps.
pub(crate) fn next_r_id<'a>(used: impl Iterator<Item = &'a str>) -> String {
    let mut used_numbers: Vec<u32> = used
        .filter_map(|r_id| {
            if r_id.len() > 3 && &r_id[..3] == "rId" {
                atoi_simd::parse::<u32, false, false>(&r_id.as_bytes()[3..]).ok()
            } else {
                None
            }
        })
        .collect();

    used_numbers.sort_unstable();

    let mut next_num = 1u32;
    for &num in &used_numbers {
        match num.cmp(&next_num) {
            std::cmp::Ordering::Equal => next_num += 1,
            std::cmp::Ordering::Greater => break,
            std::cmp::Ordering::Less => {},
        }
    }

    format!("rId{}", next_num)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_r_id_fills_gaps() {
        assert_eq!(next_r_id(["rId1", "rId2", "rId4"].into_iter()), "rId3");
        assert_eq!(next_r_id(["rId2"].into_iter()), "rId1");
        assert_eq!(next_r_id(std::iter::empty()), "rId1");
        assert_eq!(next_r_id(["rId1", "custom"].into_iter()), "rId2");
    }

    #[test]
    fn test_get_or_add_reuses_existing() {
        let mut rels = Relationships::new();
        let first = rels.get_or_add(RelKind::Image, "/ppt/media/image1.png");
        let again = rels.get_or_add(RelKind::Image, "/ppt/media/image1.png");
        let other = rels.get_or_add(RelKind::Image, "/ppt/media/image2.png");

        assert_eq!(first, "rId1");
        assert_eq!(again, "rId1");
        assert_eq!(other, "rId2");
        assert_eq!(rels.len(), 2);
    }

    #[test]
    fn test_shareable_kinds() {
        assert!(RelKind::Image.is_shareable());
        assert!(!RelKind::Chart.is_shareable());
        assert!(!RelKind::OleObject.is_shareable());
    }
}

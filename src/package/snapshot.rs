/// YAML snapshot package adapter.
use crate::error::{EditError, Result};
use crate::model::Document;
use crate::package::PackageAdapter;
use log::info;
use std::path::Path;

/// Stores the document tree as a YAML snapshot.
///
/// Loading validates the tree, so a snapshot whose slide list references
/// missing parts, whose slides point at unknown layouts, or whose slides
/// repeat a placeholder index is rejected with [`EditError::Parse`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotPackage;

impl SnapshotPackage {
    pub fn new() -> Self {
        Self
    }

    /// Parse a snapshot from YAML text.
    pub fn from_yaml_str(&self, yaml: &str) -> Result<Document> {
        let mut document: Document = serde_saphyr::from_str(yaml)
            .map_err(|e| EditError::Parse(format!("Invalid document snapshot: {}", e)))?;
        document.validate()?;
        document.mark_clean();
        Ok(document)
    }

    /// Render a document as YAML text.
    pub fn to_yaml_string(&self, document: &Document) -> Result<String> {
        serde_saphyr::to_string(document)
            .map_err(|e| EditError::Parse(format!("Failed to serialize document: {}", e)))
    }
}

impl PackageAdapter for SnapshotPackage {
    fn load(&self, path: &Path) -> Result<Document> {
        info!(path = path.display().to_string(); "Loading document snapshot");
        let text = std::fs::read_to_string(path)?;
        let mut document = self.from_yaml_str(&text)?;
        document.set_source_path(path.to_path_buf());
        Ok(document)
    }

    fn save(&self, document: &mut Document, path: &Path) -> Result<()> {
        let yaml = self.to_yaml_string(document)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, yaml)?;
        document.mark_clean();
        info!(
            path = path.display().to_string(),
            slides = document.slide_count();
            "Saved document snapshot"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        BackgroundOverride, Color, Font, FontSize, PlaceholderRole, PlaceholderTemplate,
        RelKind, RgbColor, Run, Shape,
    };

    fn sample_document() -> Document {
        let mut doc = Document::new();
        let layout = doc.add_layout(
            "Title and Content",
            vec![
                PlaceholderTemplate::new(0, PlaceholderRole::Title, "Title 1"),
                PlaceholderTemplate::new(1, PlaceholderRole::Body, "Content Placeholder 2"),
            ],
        );
        doc.add_slide_with_layout(layout).unwrap();
        let slide = doc.slide_mut(1).unwrap();
        let title = slide.placeholder_mut(0).unwrap().text_frame_mut().unwrap();
        title.paragraphs[0].runs.push(Run::with_font(
            "Intro",
            Font {
                bold: Some(true),
                size: Some(FontSize::from_points(24.0)),
                color: Some(Color::Rgb(RgbColor(0x1F, 0x38, 0x64))),
                ..Font::default()
            },
        ));
        slide.relationships.insert("rId2", RelKind::Image, "/ppt/media/image1.png");
        slide.shapes.push(Shape::picture(4, "Logo", "rId2"));
        slide.set_background_override(BackgroundOverride::picture("rId2").unwrap());
        doc
    }

    #[test]
    fn test_save_and_load_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.yaml");
        let adapter = SnapshotPackage::new();

        let mut doc = sample_document();
        assert!(doc.is_dirty());
        adapter.save(&mut doc, &path).unwrap();
        assert!(!doc.is_dirty());

        let loaded = adapter.load(&path).unwrap();
        assert!(!loaded.is_dirty());
        assert_eq!(loaded.source_path(), Some(path.as_path()));
        assert_eq!(loaded.slide_count(), 1);
        assert_eq!(loaded.slide(1).unwrap(), doc.slide(1).unwrap());
        assert_eq!(loaded.layouts(), doc.layouts());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SnapshotPackage::new()
            .load(&dir.path().join("absent.yaml"))
            .unwrap_err();
        assert!(matches!(err, EditError::Io(_)));
    }

    #[test]
    fn test_load_garbage_is_parse_error() {
        let err = SnapshotPackage::new()
            .from_yaml_str("slide_ids: [1, 2")
            .unwrap_err();
        assert!(matches!(err, EditError::Parse(_)));
    }

    #[test]
    fn test_load_rejects_dangling_slide_reference() {
        let adapter = SnapshotPackage::new();
        let mut doc = sample_document();
        let yaml = adapter.to_yaml_string(&doc).unwrap();
        assert!(adapter.from_yaml_str(&yaml).is_ok());

        doc.remove_at(1).unwrap();
        let yaml = adapter.to_yaml_string(&doc).unwrap();
        assert!(matches!(
            adapter.from_yaml_str(&yaml),
            Err(EditError::Parse(_))
        ));
    }
}

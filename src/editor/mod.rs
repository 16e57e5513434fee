//! Design-preserving slide editing.
//!
//! [`Editor`] owns one [`Document`] for the duration of an edit session and
//! exposes every editing operation as a method. All operations change text
//! content and slide order only; layouts, backgrounds, geometry and
//! decorative shapes are carried over untouched.
//!
//! # Example
//!
//! ```rust,no_run
//! use deckwright::{Editor, EditorConfig, Scope, SnapshotPackage};
//!
//! let adapter = SnapshotPackage::new();
//! let (mut editor, _copy) =
//!     Editor::open_working_copy(&adapter, "deck.yaml", EditorConfig::default())?;
//!
//! let new_position = editor.duplicate_slide(1, None)?;
//! editor.set_title(new_position, "Roadmap")?;
//! editor.replace_text(Scope::Document, "2024", "2025")?;
//!
//! editor.save(&adapter, "output/deck_edited.yaml")?;
//! # Ok::<(), deckwright::EditError>(())
//! ```

mod analyze;
mod batch;
mod duplicate;
mod merge;
mod structure;
mod text_ops;


pub use analyze::{DocumentReport, EditableElement, ElementKind, SlideReport};
pub use batch::SlideUpdate;
pub use duplicate::SlideContent;
pub use merge::merge_text;
pub use structure::{LayoutRole, StructureInfo, classify};
pub use text_ops::{Occurrence, Scope};

use crate::config::EditorConfig;
use crate::error::{EditError, Result};
use crate::model::Document;
use crate::package::{PackageAdapter, WorkingCopy};
use log::info;
use std::path::{Path, PathBuf};

/// Exclusive editing handle over a document.
#[derive(Debug, Clone)]
pub struct Editor {
    document: Document,
    config: EditorConfig,
    /// Packages that must never be written to
    protected: Vec<PathBuf>,
}

impl Editor {
    /// Edit an in-memory document with the default configuration.
    pub fn new(document: Document) -> Self {
        let protected = document.source_path().map(Path::to_path_buf).into_iter().collect();
        Self {
            document,
            config: EditorConfig::default(),
            protected,
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }

    /// Load the package at `path` through `adapter`.
    pub fn open<A, P>(adapter: &A, path: P, config: EditorConfig) -> Result<Self>
    where
        A: PackageAdapter + ?Sized,
        P: AsRef<Path>,
    {
        let document = adapter.load(path.as_ref())?;
        Ok(Self::new(document).with_config(config))
    }

    /// Copy `source` into the configured working directory and load the copy.
    ///
    /// Both the original and the copy are protected from in-place saves.
    pub fn open_working_copy<A, P>(
        adapter: &A,
        source: P,
        config: EditorConfig,
    ) -> Result<(Self, WorkingCopy)>
    where
        A: PackageAdapter + ?Sized,
        P: AsRef<Path>,
    {
        let copy = WorkingCopy::create(source, &config.working_dir, true)?;
        let mut editor = Self::open(adapter, copy.path(), config)?;
        editor.protected.push(copy.original().to_path_buf());
        Ok((editor, copy))
    }

    #[inline]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    #[inline]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Direct access to the tree for edits the editor does not cover.
    #[inline]
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    #[inline]
    pub fn into_document(self) -> Document {
        self.document
    }

    /// Serialize the document to `path` through `adapter`.
    ///
    /// Writing onto the package the document was loaded from (or the original
    /// of its working copy) fails with [`EditError::WouldOverwriteSource`]
    /// unless [`EditorConfig::allow_in_place_save`] is set.
    pub fn save<A, P>(&mut self, adapter: &A, path: P) -> Result<()>
    where
        A: PackageAdapter + ?Sized,
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        if !self.config.allow_in_place_save
            && self.protected.iter().any(|p| same_file(p, path))
        {
            return Err(EditError::WouldOverwriteSource(path.to_path_buf()));
        }
        adapter.save(&mut self.document, path)?;
        info!(
            path = path.display().to_string(),
            slides = self.document.slide_count();
            "Saved edited document"
        );
        Ok(())
    }

    /// Classify the slide at `position`.
    pub fn classify(&self, position: usize) -> Result<StructureInfo> {
        let slide = self.document.slide(position)?;
        let layout = self.document.layout_of(slide)?;
        Ok(classify(
            slide,
            &layout.name,
            self.config.short_text_threshold,
        ))
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

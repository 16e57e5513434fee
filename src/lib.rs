//! Deckwright - design-preserving slide editing
//!
//! This library edits presentation documents without touching their design:
//! themes, layouts, backgrounds, geometry and decorative shapes are carried
//! over as they are, and only text content and slide order change.
//!
//! # Features
//!
//! - **Slide duplication**: new slides are always copies of existing ones,
//!   bound to the same layout, with placeholder text, free shapes and
//!   background overrides carried over
//! - **Format-preserving text edits**: find/replace and title/body/bullet
//!   updates that mutate runs in place so their formatting survives
//! - **Batch updates**: ordered per-slide directives, tolerant of bad entries
//! - **Integrity-preserving delete and reorder**: validated up front, applied
//!   as whole-sequence transformations
//! - **Structure analysis**: per-slide reports of what is safe to edit
//! - **Working copies**: edits never write over the source package
//!
//! # Example
//!
//! ```no_run
//! use deckwright::{Editor, EditorConfig, Scope, SlideUpdate, SnapshotPackage};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let adapter = SnapshotPackage::new();
//! let mut editor = Editor::open(&adapter, "deck.yaml", EditorConfig::default())?;
//!
//! // Copy slide 2 and retitle the copy
//! let position = editor.duplicate_slide(2, None)?;
//! editor.set_title(position, "Next steps")?;
//!
//! // Apply several edits at once
//! let applied = editor.batch_update(&[
//!     SlideUpdate::new(1).title("Quarterly review"),
//!     SlideUpdate::new(3).bullets(["Hire", "Ship", "Measure"]),
//! ])?;
//! println!("Applied {} updates", applied);
//!
//! editor.replace_text(Scope::Document, "ACME", "Acme Corp")?;
//! editor.save(&adapter, "deck_edited.yaml")?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod editor;
pub mod error;
pub mod model;
pub mod package;

pub use config::EditorConfig;
pub use editor::{
    DocumentReport, Editor, LayoutRole, Occurrence, Scope, SlideContent, SlideReport,
    SlideUpdate, StructureInfo, merge_text,
};
pub use error::{EditError, Result};
pub use model::Document;
pub use package::{PackageAdapter, SnapshotPackage, WorkingCopy};

//! Loading and saving documents.
//!
//! The editor only needs two things from a package format: turn a file into a
//! [`Document`] and write a [`Document`] back. [`PackageAdapter`] is that seam.
//! [`SnapshotPackage`] is the built-in adapter, storing the tree as YAML.
//! [`WorkingCopy`] implements the copy-before-edit discipline: edits run on a
//! private copy so a crash mid-edit never damages the caller's original.

mod snapshot;
mod working_copy;

pub use snapshot::SnapshotPackage;
pub use working_copy::WorkingCopy;

use crate::error::Result;
use crate::model::Document;
use std::path::Path;

/// Converts between on-disk packages and in-memory documents.
pub trait PackageAdapter {
    /// Parse the package at `path`.
    ///
    /// Malformed content fails with [`crate::EditError::Parse`], filesystem
    /// problems with [`crate::EditError::Io`]. The returned document is clean
    /// and remembers `path` as its source.
    fn load(&self, path: &Path) -> Result<Document>;

    /// Serialize `document` to `path` and mark it clean.
    fn save(&self, document: &mut Document, path: &Path) -> Result<()>;
}

/// Error types for slide editing operations.
use std::path::PathBuf;
use thiserror::Error;

/// Result type for slide editing operations.
pub type Result<T> = std::result::Result<T, EditError>;

/// Error types for slide editing operations.
#[derive(Error, Debug)]
pub enum EditError {
    /// Position argument outside `[1, slide_count]`
    #[error("Slide position {position} is out of range (document has {slide_count} slides)")]
    OutOfRange { position: usize, slide_count: usize },

    /// Referenced slide, layout, shape or part is absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Reorder input is not a permutation of the slide positions
    #[error("Invalid slide order: {0}")]
    InvalidOrder(String),

    /// A free shape could not be faithfully duplicated
    #[error("Unsupported clone: {0}")]
    UnsupportedClone(String),

    /// Package content could not be turned into a valid document
    #[error("Parse error: {0}")]
    Parse(String),

    /// Malformed XML fragment
    #[error("XML error: {0}")]
    Xml(String),

    /// Refused to overwrite the package the document was loaded from
    #[error("Refusing to overwrite source package in place: {}", .0.display())]
    WouldOverwriteSource(PathBuf),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EditError {
    /// Shorthand for an [`EditError::OutOfRange`] error.
    #[inline]
    pub(crate) fn out_of_range(position: usize, slide_count: usize) -> Self {
        EditError::OutOfRange {
            position,
            slide_count,
        }
    }

    /// Whether the error stems from bad input (a caller bug).
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            EditError::OutOfRange { .. }
                | EditError::NotFound(_)
                | EditError::InvalidOrder(_)
                | EditError::WouldOverwriteSource(_)
        )
    }

    /// Whether the error stems from the environment (package content or filesystem).
    pub fn is_environment_error(&self) -> bool {
        matches!(
            self,
            EditError::Parse(_) | EditError::Xml(_) | EditError::Io(_)
        )
    }
}

impl From<quick_xml::Error> for EditError {
    fn from(err: quick_xml::Error) -> Self {
        EditError::Xml(err.to_string())
    }
}

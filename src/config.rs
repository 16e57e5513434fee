//! Editor configuration.
//!
//! Settings are plain data and can be loaded from YAML:
//!
//! ```yaml
//! short_text_threshold: 30
//! working_dir: scratch/working
//! allow_in_place_save: false
//! ```

use crate::error::{EditError, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default cut-off (in characters) between decorative labels and content text.
pub const DEFAULT_SHORT_TEXT_THRESHOLD: usize = 20;

/// Configuration shared by all editing operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Free text shapes whose trimmed text is longer than this many characters
    /// classify as content; shorter ones are decorative labels.
    pub short_text_threshold: usize,
    /// Directory that receives working copies of source packages.
    pub working_dir: PathBuf,
    /// Allow saving onto the package the document was loaded from.
    pub allow_in_place_save: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            short_text_threshold: DEFAULT_SHORT_TEXT_THRESHOLD,
            working_dir: PathBuf::from("output/working"),
            allow_in_place_save: false,
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from YAML text. Missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_saphyr::from_str(yaml)
            .map_err(|e| EditError::Parse(format!("Invalid editor configuration: {}", e)))
    }

    /// Load a configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading editor configuration");
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.short_text_threshold, 20);
        assert_eq!(config.working_dir, PathBuf::from("output/working"));
        assert!(!config.allow_in_place_save);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = EditorConfig::from_yaml_str("short_text_threshold: 40\n").unwrap();
        assert_eq!(config.short_text_threshold, 40);
        assert_eq!(config.working_dir, PathBuf::from("output/working"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = EditorConfig::from_yaml_str("colour_theme: dark\n").unwrap_err();
        assert!(matches!(err, EditError::Parse(_)));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.yaml");
        std::fs::write(&path, "allow_in_place_save: true\nworking_dir: tmp/wc\n").unwrap();

        let config = EditorConfig::from_file(&path).unwrap();
        assert!(config.allow_in_place_save);
        assert_eq!(config.working_dir, PathBuf::from("tmp/wc"));
    }
}

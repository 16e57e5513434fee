/// Private working copies of source packages.
use crate::error::Result;
use chrono::{DateTime, Local};
use log::info;
use std::io;
use std::path::{Path, PathBuf};

/// A copy of a source package made before any edit.
///
/// The original is never opened for writing; edits load the copy and results
/// are saved to a new path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingCopy {
    original: PathBuf,
    copy: PathBuf,
    created_at: DateTime<Local>,
}

impl WorkingCopy {
    /// Copy `source` into `work_dir`.
    ///
    /// With `preserve_name` the copy is named `<stem>_copy.<ext>` (replacing a
    /// previous copy of the same file); otherwise a timestamp is added:
    /// `<stem>_<YYYYmmdd_HHMMSS>_copy.<ext>`. A missing source fails with an
    /// IO error of kind `NotFound`.
    pub fn create<P: AsRef<Path>, W: AsRef<Path>>(
        source: P,
        work_dir: W,
        preserve_name: bool,
    ) -> Result<Self> {
        let source = source.as_ref();
        let work_dir = work_dir.as_ref();

        if !source.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Source file not found: {}", source.display()),
            )
            .into());
        }

        std::fs::create_dir_all(work_dir)?;

        let created_at = Local::now();
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        let extension = source
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        let copy_name = if preserve_name {
            format!("{}_copy{}", stem, extension)
        } else {
            format!(
                "{}_{}_copy{}",
                stem,
                created_at.format("%Y%m%d_%H%M%S"),
                extension
            )
        };
        let copy = work_dir.join(copy_name);

        std::fs::copy(source, &copy)?;
        info!(
            original = source.display().to_string(),
            copy = copy.display().to_string();
            "Created working copy, original is left untouched"
        );

        Ok(Self {
            original: source.to_path_buf(),
            copy,
            created_at,
        })
    }

    /// The protected original.
    #[inline]
    pub fn original(&self) -> &Path {
        &self.original
    }

    /// The copy edits should load from.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.copy
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EditError;

    #[test]
    fn test_copy_preserving_name() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("deck.yaml");
        std::fs::write(&source, "layouts: []\n").unwrap();

        let copy = WorkingCopy::create(&source, dir.path().join("working"), true).unwrap();
        assert_eq!(copy.original(), source.as_path());
        assert_eq!(copy.path().file_name().unwrap(), "deck_copy.yaml");
        assert_eq!(std::fs::read_to_string(copy.path()).unwrap(), "layouts: []\n");
    }

    #[test]
    fn test_copy_with_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("deck.yaml");
        std::fs::write(&source, "x").unwrap();

        let copy = WorkingCopy::create(&source, dir.path(), false).unwrap();
        let name = copy.path().file_name().unwrap().to_string_lossy().into_owned();
        let stamp = copy.created_at().format("%Y%m%d_%H%M%S").to_string();
        assert_eq!(name, format!("deck_{}_copy.yaml", stamp));
    }

    #[test]
    fn test_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = WorkingCopy::create(dir.path().join("nope.yaml"), dir.path(), true).unwrap_err();
        match err {
            EditError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
            other => panic!("unexpected error: {other}"),
        }
    }
}

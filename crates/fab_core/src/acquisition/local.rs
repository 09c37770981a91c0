//! Files chosen from the local filesystem, without a dialog.
//!
//! Reads go through `tokio::fs`, so callers need a tokio runtime.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::errors::{AcquisitionResult, FileAcquisitionError};
use super::picker::{FilePicker, FileSelection, PickRequest};

/// A file on the local filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSelection {
    path: PathBuf,
}

impl PathSelection {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_failed(&self, error: std::io::Error) -> FileAcquisitionError {
        FileAcquisitionError::read_failed(self.name(), error.to_string())
    }
}

impl FileSelection for PathSelection {
    fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    async fn size(&self) -> AcquisitionResult<usize> {
        let metadata = tokio::fs::metadata(&self.path)
            .await
            .map_err(|e| self.read_failed(e))?;
        Ok(usize::try_from(metadata.len()).unwrap_or(usize::MAX))
    }

    async fn read_bytes(&self) -> AcquisitionResult<Vec<u8>> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|e| self.read_failed(e))
    }
}

/// Picker that answers prompts from a pre-set list instead of asking.
///
/// Each prompt consumes the next entry; `None` entries and an exhausted
/// list behave like a dialog closed without a file.
#[derive(Debug, Default)]
pub struct PresetPicker {
    answers: Mutex<VecDeque<Option<PathBuf>>>,
}

impl PresetPicker {
    pub fn new(answers: impl IntoIterator<Item = Option<PathBuf>>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
        }
    }

    /// Picker that selects `path` once.
    pub fn single(path: impl Into<PathBuf>) -> Self {
        Self::new([Some(path.into())])
    }
}

impl FilePicker for PresetPicker {
    type Selection = PathSelection;

    async fn pick(&self, request: &PickRequest) -> Option<PathSelection> {
        let answer = self.answers.lock().pop_front().flatten();
        tracing::debug!(
            "Preset prompt {:?} answered with {:?}",
            request.title.as_deref().unwrap_or("<default>"),
            answer
        );
        answer.map(PathSelection::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn path_selection_reads_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("level.txt");
        fs::write(&path, "wall\nfloor\n").unwrap();

        let selection = PathSelection::new(&path);
        assert_eq!(selection.name(), "level.txt");
        assert_eq!(selection.read_bytes().await.unwrap(), b"wall\nfloor\n");
        assert_eq!(selection.read_text().await.unwrap(), "wall\nfloor\n");
        assert_eq!(selection.size().await.unwrap(), 11);
    }

    #[tokio::test]
    async fn native_text_read_substitutes_invalid_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bin.dat");
        fs::write(&path, [b'a', 0xFE, b'b']).unwrap();

        let text = PathSelection::new(&path).read_text().await.unwrap();
        assert_eq!(text, "a\u{FFFD}b");
    }

    #[tokio::test]
    async fn missing_file_is_read_failure() {
        let dir = tempdir().unwrap();
        let selection = PathSelection::new(dir.path().join("gone.txt"));
        let err = selection.read_bytes().await.unwrap_err();
        assert!(matches!(
            err,
            FileAcquisitionError::ReadFailed { ref file, .. } if file == "gone.txt"
        ));
        assert!(selection.size().await.is_err());
    }

    #[tokio::test]
    async fn preset_picker_answers_in_order() {
        let picker = PresetPicker::new([Some(PathBuf::from("a.txt")), None]);
        let request = PickRequest::default();

        assert_eq!(picker.pick(&request).await, Some(PathSelection::new("a.txt")));
        assert_eq!(picker.pick(&request).await, None);
        assert_eq!(picker.pick(&request).await, None);
    }
}

//! File picker seam.
//!
//! A picker shows one single-file prompt with no type restriction and
//! yields the chosen file, or `None` when the prompt closed empty. Platform
//! pickers live in `fab_bridge`.

use super::decode::decode_lossy;
use super::errors::AcquisitionResult;

/// A file chosen by the user. Dropped once its contents are read.
#[allow(async_fn_in_trait)]
pub trait FileSelection {
    /// File name as reported by the picker (no directory components).
    fn name(&self) -> String;

    /// Size of the file in bytes, before any decoding.
    async fn size(&self) -> AcquisitionResult<usize>;

    /// Read the raw bytes of the file.
    async fn read_bytes(&self) -> AcquisitionResult<Vec<u8>>;

    /// Read the file as text using the platform's own reader.
    ///
    /// The default decodes the raw bytes lossily.
    async fn read_text(&self) -> AcquisitionResult<String> {
        let bytes = self.read_bytes().await?;
        Ok(decode_lossy(&bytes).into_owned())
    }
}

/// Shows a file prompt and waits for the user.
#[allow(async_fn_in_trait)]
pub trait FilePicker {
    type Selection: FileSelection;

    /// Prompt for one file. `None` means the prompt closed with no file.
    async fn pick(&self, request: &PickRequest) -> Option<Self::Selection>;
}

/// Parameters for a single prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PickRequest {
    /// Dialog title; `None` keeps the platform default.
    pub title: Option<String>,
}

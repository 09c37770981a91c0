//! Native OS file dialog.

use fab_core::acquisition::{
    AcquireOptions, AcquisitionResult, FileAcquisitionBridge, FilePicker, PathSelection,
    PickRequest,
};
use fab_core::config::Settings;
use fab_core::models::DecodedText;

/// Picker backed by the platform's native file dialog.
#[derive(Debug, Clone, Copy, Default)]
pub struct RfdPicker;

impl FilePicker for RfdPicker {
    type Selection = PathSelection;

    async fn pick(&self, request: &PickRequest) -> Option<PathSelection> {
        tracing::debug!("Opening native file dialog");
        let mut dialog = rfd::AsyncFileDialog::new();
        if let Some(title) = &request.title {
            dialog = dialog.set_title(title);
        }

        dialog
            .pick_file()
            .await
            .map(|f| PathSelection::new(f.path().to_path_buf()))
    }
}

/// Build a bridge over the native dialog from loaded settings.
pub fn bridge_from_settings(settings: &Settings) -> FileAcquisitionBridge<RfdPicker> {
    FileAcquisitionBridge::new(
        RfdPicker,
        AcquireOptions::from_settings(&settings.bridge, &settings.dialog),
    )
}

/// Show the native dialog once and return the chosen file's text.
pub async fn open_file(settings: &Settings) -> AcquisitionResult<DecodedText> {
    bridge_from_settings(settings).acquire().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use fab_core::models::DecodeStrategy;

    #[test]
    fn bridge_uses_configured_options() {
        let mut settings = Settings::default();
        settings.bridge.decode = DecodeStrategy::Utf8Strict;
        settings.dialog.title = "Pick a level".to_string();

        let bridge = bridge_from_settings(&settings);
        assert_eq!(bridge.options().decode, DecodeStrategy::Utf8Strict);
        assert_eq!(bridge.options().title.as_deref(), Some("Pick a level"));
        assert!(bridge.options().settle_on_cancel);
    }
}

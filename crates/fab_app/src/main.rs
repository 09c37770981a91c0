//! File Acquisition Bridge - native entry point
//!
//! Opens the native file dialog (or a preset file with `--file`), decodes
//! the chosen file as UTF-8 and writes the text to stdout. It handles:
//! - Configuration loading
//! - Application-level logging initialization
//! - Delivery through the configured convention
//! - The optional selection timeout

use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use clap::Parser;
use fab_bridge::RfdPicker;
use fab_core::acquisition::{
    AcquireOptions, CallbackDelivery, FileAcquisitionBridge, FileAcquisitionError, FilePicker,
    PresetPicker, ResponseSlot, ReturnValueDelivery,
};
use fab_core::config::{ConfigManager, Settings};
use fab_core::logging::{init_tracing, init_tracing_with_file};
use fab_core::models::DeliveryMode;

/// Receives text pushed by callback delivery.
static RESPONSE: ResponseSlot = ResponseSlot::new();

#[derive(Parser, Debug)]
#[command(name = "fab-app")]
#[command(about = "Pick a file and print its text as UTF-8")]
struct Cli {
    /// Settings file; defaults to the user config directory
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read this file instead of opening the file dialog
    #[arg(short, long)]
    file: Option<PathBuf>,
}

/// Default config path: the user config dir, falling back to `.config/`.
fn default_config_path() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join("file-acquisition-bridge").join("settings.toml"),
        None => PathBuf::from(".config").join("settings.toml"),
    }
}

/// Acquire once through `mode` and return the delivered text.
///
/// Callback delivery only carries the string, as the host export does.
async fn acquire<P: FilePicker>(
    bridge: &FileAcquisitionBridge<P>,
    mode: DeliveryMode,
    slot: &'static ResponseSlot,
) -> Result<String, FileAcquisitionError> {
    match mode {
        DeliveryMode::ReturnValue => {
            let delivery = ReturnValueDelivery::new();
            bridge.acquire_and_deliver(&delivery).await?;
            let text = delivery.take().unwrap_or(Err(FileAcquisitionError::Cancelled))?;
            tracing::debug!("Read {} ({} bytes)", text.file_name(), text.byte_len());
            Ok(text.into_string())
        }
        DeliveryMode::Callback => {
            let failure = Arc::new(OnceLock::new());
            let failure_sink = Arc::clone(&failure);
            let delivery = CallbackDelivery::to_slot(slot).with_error_callback(move |e| {
                let _ = failure_sink.set(e.clone());
                // Unblock the waiter; the error travels separately
                slot.respond(String::new());
            });

            let pending = slot.arm();
            bridge.acquire_and_deliver(&delivery).await?;
            let text = pending.wait().await.unwrap_or_default();

            match failure.get() {
                Some(error) => Err(error.clone()),
                None => Ok(text),
            }
        }
    }
}

async fn run<P: FilePicker>(
    picker: P,
    settings: &Settings,
    slot: &'static ResponseSlot,
) -> anyhow::Result<String> {
    let bridge = FileAcquisitionBridge::new(
        picker,
        AcquireOptions::from_settings(&settings.bridge, &settings.dialog),
    );

    let timeout = settings.dialog.selection_timeout_secs;
    let watchdog = (timeout > 0).then(|| {
        let cancel = bridge.cancel_handle();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(timeout)).await;
            tracing::warn!("No file chosen within {}s; cancelling", timeout);
            cancel.cancel();
        })
    });

    let outcome = acquire(&bridge, settings.bridge.delivery, slot).await;
    if let Some(watchdog) = watchdog {
        watchdog.abort();
    }
    Ok(outcome?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // Load configuration first (needed for logging settings)
    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let mut config_manager = ConfigManager::new(&config_path);
    if let Err(e) = config_manager.load_or_create() {
        eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
    }
    let settings = config_manager.settings().clone();

    let _log_guard = if settings.logging.log_to_file {
        Some(init_tracing_with_file(settings.logging.level, &config_manager.logs_folder())?)
    } else {
        init_tracing(settings.logging.level);
        None
    };

    tracing::info!("File acquisition bridge {}", fab_bridge::version());
    tracing::info!("Config: {}", config_path.display());
    tracing::debug!(
        "Delivery: {}, decode: {}",
        settings.bridge.delivery,
        settings.bridge.decode
    );

    let text = match args.file {
        Some(path) => run(PresetPicker::single(path), &settings, &RESPONSE).await?,
        None => run(RfdPicker, &settings, &RESPONSE).await?,
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn slot() -> &'static ResponseSlot {
        Box::leak(Box::new(ResponseSlot::new()))
    }

    #[test]
    fn parses_known_arguments() {
        let cli = Cli::try_parse_from(["fab-app", "--file", "a.txt", "-c", "c.toml"]).unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("a.txt")));
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));

        let bare = Cli::try_parse_from(["fab-app"]).unwrap();
        assert!(bare.file.is_none() && bare.config.is_none());
    }

    #[test]
    fn rejects_unknown_or_incomplete_arguments() {
        assert!(Cli::try_parse_from(["fab-app", "--verbose"]).is_err());
        assert!(Cli::try_parse_from(["fab-app", "--file"]).is_err());
    }

    #[tokio::test]
    async fn both_delivery_modes_return_file_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("input.txt");
        fs::write(&path, "same text either way\n").unwrap();

        let mut settings = Settings::default();
        for mode in [DeliveryMode::ReturnValue, DeliveryMode::Callback] {
            settings.bridge.delivery = mode;
            let text = run(PresetPicker::single(&path), &settings, slot()).await.unwrap();
            assert_eq!(text, "same text either way\n");
        }
    }

    #[tokio::test]
    async fn callback_mode_reports_failures() {
        let dir = tempdir().unwrap();
        let mut settings = Settings::default();
        settings.bridge.delivery = DeliveryMode::Callback;

        let err = run(PresetPicker::single(dir.path().join("absent.txt")), &settings, slot())
            .await
            .unwrap_err();
        let err = err.downcast::<FileAcquisitionError>().unwrap();
        assert!(matches!(err, FileAcquisitionError::ReadFailed { .. }));
    }

    #[tokio::test]
    async fn empty_selection_is_an_error() {
        let settings = Settings::default();
        let err = run(PresetPicker::new([None]), &settings, slot()).await.unwrap_err();
        assert_eq!(
            err.downcast::<FileAcquisitionError>().unwrap(),
            FileAcquisitionError::Cancelled
        );
    }

    #[tokio::test]
    async fn timeout_settles_a_stalled_selection() {
        let mut settings = Settings::default();
        settings.dialog.settle_on_cancel = false;
        settings.dialog.selection_timeout_secs = 1;

        let err = run(PresetPicker::new([None]), &settings, slot()).await.unwrap_err();
        assert_eq!(
            err.downcast::<FileAcquisitionError>().unwrap(),
            FileAcquisitionError::Cancelled
        );
    }
}

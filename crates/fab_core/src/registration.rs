//! Plugin registration contract.
//!
//! A host plugin loader hands each plugin an import object; the plugin
//! installs its entry points under `env` so the host's compiled code can
//! call them. Registration is explicit and happens at most once per
//! [`PluginRegistration`], no matter how often the host bootstrap runs it.

use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

/// Name the file entry point is installed under by default.
pub const OPEN_FILE_ENTRY: &str = "open_file_js";

/// Namespace of the import object holding host-callable functions.
pub const ENV_NAMESPACE: &str = "env";

/// Errors raised while installing entry points.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("Import object has no '{0}' namespace")]
    MissingNamespace(String),

    #[error("Host rejected entry point '{name}': {message}")]
    HostRejected { name: String, message: String },
}

/// Where entry points are installed.
pub trait ImportObject {
    /// Host-specific representation of a callable entry point.
    type Entry;

    fn install(
        &mut self,
        namespace: &str,
        name: &str,
        entry: Self::Entry,
    ) -> Result<(), RegistrationError>;
}

/// Outcome of [`PluginRegistration::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Installed,
    AlreadyRegistered,
}

/// Idempotency guard for one plugin's registration.
#[derive(Debug, Default)]
pub struct PluginRegistration {
    registered: AtomicBool,
}

impl PluginRegistration {
    /// Usable in a `static`.
    pub const fn new() -> Self {
        Self {
            registered: AtomicBool::new(false),
        }
    }

    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::SeqCst)
    }

    /// Install `entry` as `env.<name>` unless this plugin already registered.
    ///
    /// A failed install leaves the plugin unregistered so the host may retry.
    pub fn register<I: ImportObject>(
        &self,
        import: &mut I,
        name: &str,
        entry: I::Entry,
    ) -> Result<Registration, RegistrationError> {
        if self
            .registered
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("Plugin already registered; skipping '{}'", name);
            return Ok(Registration::AlreadyRegistered);
        }

        if let Err(e) = import.install(ENV_NAMESPACE, name, entry) {
            self.registered.store(false, Ordering::SeqCst);
            tracing::error!("Failed to register '{}': {}", name, e);
            return Err(e);
        }

        tracing::info!("Registered {}.{}", ENV_NAMESPACE, name);
        Ok(Registration::Installed)
    }
}

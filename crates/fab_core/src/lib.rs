//! FAB Core - file acquisition bridge logic
//!
//! This crate holds the acquisition flow, the delivery conventions and the
//! plugin-registration contract with zero dialog or DOM dependencies.
//! Platform pickers live in `fab_bridge`.

pub mod acquisition;
pub mod config;
pub mod logging;
pub mod models;
pub mod registration;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}

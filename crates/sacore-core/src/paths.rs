//! Path provider abstraction for configuration and log locations.
//!
//! Resolves where the database settings file and log files live, so the
//! core never hard-codes a platform directory.

use std::path::PathBuf;
use std::sync::Arc;

/// Trait for providing application paths.
pub trait PathProvider: Send + Sync {
    /// Get the root application data directory.
    fn app_data_dir(&self) -> PathBuf;

    /// Get the configuration directory.
    fn config_dir(&self) -> PathBuf {
        self.app_data_dir().join("Config")
    }

    /// Get the database settings file path.
    fn settings_path(&self) -> PathBuf {
        self.config_dir().join("database.json")
    }

    /// Get the logs directory.
    fn logs_dir(&self) -> PathBuf {
        self.app_data_dir().join("Logs")
    }
}

/// Shared reference to a PathProvider implementation.
pub type SharedPathProvider = Arc<dyn PathProvider>;

/// Default path provider rooted at `<config_dir>/sacore-tools/`.
#[derive(Debug, Clone)]
pub struct DefaultPathProvider {
    app_data_dir: PathBuf,
}

impl DefaultPathProvider {
    /// Create a new DefaultPathProvider.
    ///
    /// Falls back to the current directory when the platform has no
    /// configuration directory.
    pub fn new() -> Self {
        let app_data_dir = dirs::config_dir()
            .or_else(dirs::data_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sacore-tools");
        Self { app_data_dir }
    }

    /// Create a DefaultPathProvider with a custom base directory.
    ///
    /// Useful for testing.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self {
            app_data_dir: base_dir,
        }
    }
}

impl Default for DefaultPathProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PathProvider for DefaultPathProvider {
    fn app_data_dir(&self) -> PathBuf {
        self.app_data_dir.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_under_base_dir() {
        let provider = DefaultPathProvider::with_base_dir(PathBuf::from("/tmp/sacore"));
        assert_eq!(
            provider.settings_path(),
            PathBuf::from("/tmp/sacore/Config/database.json")
        );
        assert_eq!(provider.logs_dir(), PathBuf::from("/tmp/sacore/Logs"));
    }

    #[test]
    fn test_default_provider_uses_app_folder() {
        let provider = DefaultPathProvider::new();
        assert!(provider.app_data_dir().ends_with("sacore-tools"));
    }
}

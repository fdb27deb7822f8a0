//! Settings store.
//!
//! TOML file with one table per section, written atomically (temp file, then
//! rename). Single sections can be rewritten without touching the others.
//!
//! ```no_run
//! use vsg_batch::config::{ConfigManager, ConfigSection};
//!
//! let mut config = ConfigManager::new(".config/settings.toml");
//! config.load_or_create().unwrap();
//!
//! config.settings_mut().batch.poll_interval_ms = 25;
//! config.update_section(ConfigSection::Batch).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{default_config_path, ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    AnalysisSettings, BatchSettings, ConfigSection, LoggingSettings, PathSettings, Settings,
};

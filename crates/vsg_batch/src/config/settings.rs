//! Settings struct with TOML-based sections.
//!
//! Each section maps to one TOML table and can be rewritten on its own.

use serde::{Deserialize, Serialize};

/// Root settings structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub paths: PathSettings,

    #[serde(default)]
    pub logging: LoggingSettings,

    /// Analysis parameters handed through to the engine.
    #[serde(default)]
    pub analysis: AnalysisSettings,

    /// Batch runner behavior.
    #[serde(default)]
    pub batch: BatchSettings,
}

/// Output, temp, and log directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Output folder for merged files.
    #[serde(default = "default_output_folder")]
    pub output_folder: String,

    /// Root folder for per-job working directories.
    #[serde(default = "default_temp_root")]
    pub temp_root: String,

    /// Folder for batch log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,

    /// Last used path for source 1.
    #[serde(default)]
    pub last_source1_path: String,

    /// Last used path for source 2.
    #[serde(default)]
    pub last_source2_path: String,
}

fn default_output_folder() -> String {
    "sync_output".to_string()
}

fn default_temp_root() -> String {
    ".temp".to_string()
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            output_folder: default_output_folder(),
            temp_root: default_temp_root(),
            logs_folder: default_logs_folder(),
            last_source1_path: String::new(),
            last_source2_path: String::new(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Compact mode: filter progress lines, replay the tail on failure.
    #[serde(default = "default_true")]
    pub compact: bool,

    /// Number of engine lines replayed when a job fails.
    #[serde(default = "default_error_tail")]
    pub error_tail: u32,

    /// Progress logging step in percent.
    #[serde(default = "default_progress_step")]
    pub progress_step: u32,

    /// Prefix log lines with a wall-clock timestamp.
    #[serde(default = "default_true")]
    pub show_timestamps: bool,
}

fn default_true() -> bool {
    true
}

fn default_error_tail() -> u32 {
    20
}

fn default_progress_step() -> u32 {
    20
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            compact: true,
            error_tail: default_error_tail(),
            progress_step: default_progress_step(),
            show_timestamps: true,
        }
    }
}

/// Analysis parameters. Stored and edited here, interpreted by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSettings {
    #[serde(default = "default_chunk_count")]
    pub chunk_count: u32,

    /// Seconds per chunk.
    #[serde(default = "default_chunk_duration")]
    pub chunk_duration: u32,

    #[serde(default = "default_min_match_pct")]
    pub min_match_pct: f64,

    #[serde(default = "default_scan_start")]
    pub scan_start_pct: f64,

    #[serde(default = "default_scan_end")]
    pub scan_end_pct: f64,
}

fn default_chunk_count() -> u32 {
    10
}

fn default_chunk_duration() -> u32 {
    15
}

fn default_min_match_pct() -> f64 {
    5.0
}

fn default_scan_start() -> f64 {
    5.0
}

fn default_scan_end() -> f64 {
    95.0
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            chunk_count: default_chunk_count(),
            chunk_duration: default_chunk_duration(),
            min_match_pct: default_min_match_pct(),
            scan_start_pct: default_scan_start(),
            scan_end_pct: default_scan_end(),
        }
    }
}

/// Batch runner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSettings {
    /// Interval between log/progress drains while a job runs.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Highest source number collected for a job ("Source 1".."Source N").
    #[serde(default = "default_max_sources")]
    pub max_sources: usize,
}

fn default_poll_interval_ms() -> u64 {
    50
}

fn default_max_sources() -> usize {
    4
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            max_sources: default_max_sources(),
        }
    }
}

/// Names of config sections for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    Paths,
    Logging,
    Analysis,
    Batch,
}

impl ConfigSection {
    /// All sections, in file order.
    pub const ALL: [ConfigSection; 4] = [
        ConfigSection::Paths,
        ConfigSection::Logging,
        ConfigSection::Analysis,
        ConfigSection::Batch,
    ];

    /// TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "paths",
            ConfigSection::Logging => "logging",
            ConfigSection::Analysis => "analysis",
            ConfigSection::Batch => "batch",
        }
    }

    /// Comment written above the table in a freshly generated file.
    pub fn comment(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "# Output and working directories",
            ConfigSection::Logging => "# Logging configuration",
            ConfigSection::Analysis => "# Analysis parameters passed to the engine",
            ConfigSection::Batch => "# Batch runner",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_serializes() {
        let settings = Settings::default();
        let toml = toml::to_string_pretty(&settings).unwrap();
        assert!(toml.contains("[paths]"));
        assert!(toml.contains("[batch]"));
        assert!(toml.contains("temp_root"));
    }

    #[test]
    fn missing_fields_use_defaults() {
        let minimal = "[paths]\ntemp_root = \"/tmp/vsg\"";
        let parsed: Settings = toml::from_str(minimal).unwrap();
        assert_eq!(parsed.paths.temp_root, "/tmp/vsg");
        assert_eq!(parsed.paths.output_folder, "sync_output");
        assert_eq!(parsed.batch.poll_interval_ms, 50);
        assert_eq!(parsed.batch.max_sources, 4);
        assert!(parsed.logging.compact);
    }
}

use serde::Deserialize;

use crate::engine::core::executor::DisposalPolicy;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub merge: MergeConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MergeConfig {
    /// Directory scanned for dated entry files.
    pub source_dir: String,
    /// Directory merge artifacts are written to.
    pub output_dir: String,
    /// Directory consumed entries are copied into under the backup policy.
    pub backup_dir: String,
    /// chrono format string entry stems are parsed with. Must be fixed-width
    /// and most-significant-first so that name order equals date order.
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// Maximum number of entries a single artifact may hold.
    #[serde(default = "default_max_entries_per_file")]
    pub max_entries_per_file: usize,
    /// Whether entry-creation notifications may trigger a merge run.
    #[serde(default)]
    pub auto_merge: bool,
    /// Eligible-entry count required before an automatic run proceeds.
    #[serde(default = "default_auto_merge_threshold")]
    pub auto_merge_threshold: usize,
    #[serde(default = "default_disposal")]
    pub disposal: DisposalPolicy,
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_max_entries_per_file() -> usize {
    10
}

fn default_auto_merge_threshold() -> usize {
    10
}

fn default_disposal() -> DisposalPolicy {
    DisposalPolicy::Backup
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub log_dir: String,
    pub stdout_level: String,
    pub file_level: String,
}

use std::env;

pub fn load_settings() -> Result<Settings, config::ConfigError> {
    let config_path = env::var("DIARYMERGE_CONFIG").unwrap_or_else(|_| "config".to_string());

    let settings: Settings = config::Config::builder()
        .add_source(config::File::with_name(&config_path))
        .build()?
        .try_deserialize()?;

    Ok(settings)
}

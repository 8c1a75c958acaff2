//! Configuration file loading for schedule-quorum
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `SCHEDULE_QUORUM_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./schedule-quorum.toml` or `./.schedule-quorum.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/schedule-quorum/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileBackendConfig, FileConfig, FileConsensusConfig, FileLegacyConfig, FileLoggingConfig,
    FileOutputConfig, FileOutputFormat, FileReportsConfig, FileValidatorConfig,
};
pub use loader::ConfigLoader;

//! Infrastructure layer for schedule-quorum
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod reports;
pub mod validators;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileBackendConfig, FileConfig, FileConsensusConfig, FileLegacyConfig,
    FileLoggingConfig, FileOutputConfig, FileOutputFormat, FileReportsConfig, FileValidatorConfig,
};
pub use logging::JsonlRunLogger;
pub use reports::MarkdownFileSink;
pub use validators::{
    AdapterError, BackendAdapter, BrowserDriver, BrowserSession, Capabilities, GoldenAdapter,
    LegacyOracleAdapter, LegacyPage, WebDriverClient, drain_session_closes,
};

//! Validator adapters
//!
//! One [`ValidatorAdapter`](schedule_application::ValidatorAdapter) per
//! source of truth:
//!
//! - [`GoldenAdapter`]: the in-process reference validator
//! - [`BackendAdapter`]: the deployed validation workflow over HTTP
//! - [`LegacyOracleAdapter`]: the legacy calendar page through WebDriver

pub mod backend;
pub mod error;
pub mod golden;
pub mod legacy;

pub use backend::BackendAdapter;
pub use error::AdapterError;
pub use golden::GoldenAdapter;
pub use legacy::{
    BrowserDriver, BrowserSession, Capabilities, LegacyOracleAdapter, LegacyPage, WebDriverClient,
    drain_session_closes,
};

//! External adapter configuration from TOML (`[backend]` and `[legacy]` sections)

use schedule_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Raw backend workflow configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBackendConfig {
    /// Validation endpoint, e.g. `https://workflows.example.com/validate-schedule`
    pub url: Option<String>,
    /// Name of the environment variable holding a bearer token
    pub token_env: Option<String>,
    /// HTTP client timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FileBackendConfig {
    fn default() -> Self {
        Self {
            url: None,
            token_env: None,
            timeout_secs: 30,
        }
    }
}

impl FileBackendConfig {
    pub fn is_configured(&self) -> bool {
        self.url.as_deref().is_some_and(|u| !u.trim().is_empty())
    }

    /// Resolve the bearer token from the configured environment variable
    pub fn token(&self) -> Option<String> {
        self.token_env
            .as_deref()
            .and_then(|name| std::env::var(name).ok())
            .filter(|t| !t.is_empty())
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "backend.timeout_secs".to_string(),
                    value: 0,
                },
                "backend.timeout_secs cannot be 0",
            ));
        }
        issues
    }
}

/// Raw legacy oracle (browser automation) configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLegacyConfig {
    /// WebDriver endpoint, e.g. `http://localhost:4444`
    pub webdriver_url: Option<String>,
    /// The legacy calendar page
    pub page_url: Option<String>,
    /// CSS selector for one day toggle. `{index}` (0 = Sunday) and `{name}`
    /// (lowercase short name) are substituted.
    pub day_selector: String,
    /// Longest wait for the page to show a verdict after the last click
    pub settle_ms: u64,
    /// Browser name sent in the session capabilities
    pub browser: String,
    pub headless: bool,
}

impl Default for FileLegacyConfig {
    fn default() -> Self {
        Self {
            webdriver_url: None,
            page_url: None,
            day_selector: "[data-day-index='{index}']".to_string(),
            settle_ms: 3000,
            browser: "chrome".to_string(),
            headless: true,
        }
    }
}

impl FileLegacyConfig {
    pub fn is_configured(&self) -> bool {
        let set = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        set(&self.webdriver_url) && set(&self.page_url)
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if !self.day_selector.contains("{index}") && !self.day_selector.contains("{name}") {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::InvalidEnumValue {
                    field: "legacy.day_selector".to_string(),
                    value: self.day_selector.clone(),
                    valid_values: vec!["{index}".to_string(), "{name}".to_string()],
                },
                "legacy.day_selector has no {index} or {name} placeholder; every day maps to the same element",
            ));
        }

        let valid_browsers = ["chrome", "firefox", "edge"];
        if !valid_browsers.contains(&self.browser.to_lowercase().as_str()) {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::InvalidEnumValue {
                    field: "legacy.browser".to_string(),
                    value: self.browser.clone(),
                    valid_values: valid_browsers.iter().map(|b| b.to_string()).collect(),
                },
                format!(
                    "legacy.browser: unknown value '{}', sending it to the driver as-is",
                    self.browser
                ),
            ));
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_configured_requires_non_blank_url() {
        let mut config = FileBackendConfig::default();
        assert!(!config.is_configured());
        config.url = Some("  ".to_string());
        assert!(!config.is_configured());
        config.url = Some("http://localhost:8080/validate".to_string());
        assert!(config.is_configured());
    }

    #[test]
    fn test_backend_token_missing_env() {
        let config = FileBackendConfig {
            token_env: Some("SCHEDULE_QUORUM_TEST_TOKEN_THAT_IS_NEVER_SET".to_string()),
            ..Default::default()
        };
        assert_eq!(config.token(), None);
    }

    #[test]
    fn test_legacy_needs_both_urls() {
        let mut config = FileLegacyConfig {
            webdriver_url: Some("http://localhost:4444".to_string()),
            ..Default::default()
        };
        assert!(!config.is_configured());
        config.page_url = Some("https://legacy.example.com/calendar".to_string());
        assert!(config.is_configured());
    }

    #[test]
    fn test_legacy_selector_without_placeholder() {
        let config = FileLegacyConfig {
            day_selector: ".day".to_string(),
            ..Default::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(!ConfigIssue::has_errors(&issues));
    }

    #[test]
    fn test_default_legacy_is_clean() {
        assert!(FileLegacyConfig::default().validate().is_empty());
    }
}

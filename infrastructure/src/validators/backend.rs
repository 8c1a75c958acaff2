//! Adapter for the separately deployed backend validation workflow
//!
//! # Wire format
//!
//! ```text
//! POST <url>
//! {"days": [5, 6, 0, 1]}
//!
//! 200 OK
//! {"nightsCount": 3, "isValid": true, "errorCode": null, "errorMessage": null}
//! ```
//!
//! Every response field is optional. A body with none of them is a parse
//! error, not an empty verdict.

use super::error::AdapterError;
use async_trait::async_trait;
use reqwest::StatusCode;
use schedule_application::ValidatorAdapter;
use schedule_domain::{AdapterId, AdapterOutcome, ErrorCode, Scenario, ValidationResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
struct ValidateRequest {
    days: Vec<u8>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValidateResponse {
    nights_count: Option<u32>,
    is_valid: Option<bool>,
    error_code: Option<String>,
    error_message: Option<String>,
}

impl ValidateResponse {
    fn has_verdict(&self) -> bool {
        self.nights_count.is_some() || self.is_valid.is_some() || self.error_code.is_some()
    }

    fn into_result(self) -> ValidationResult {
        let error_code = self.error_code.as_deref().and_then(|raw| {
            raw.parse::<ErrorCode>()
                .inspect_err(|_| debug!("Backend returned unrecognized error code '{}'", raw))
                .ok()
        });
        // Keep an unrecognized code visible in the captured data
        let error_message = match (self.error_message, &self.error_code, error_code) {
            (Some(msg), _, _) => Some(msg),
            (None, Some(raw), None) => Some(format!("unrecognized error code {}", raw)),
            _ => None,
        };

        ValidationResult {
            nights_count: self.nights_count,
            is_valid: self.is_valid,
            error_code,
            error_message,
        }
    }
}

/// HTTP adapter for the backend workflow
pub struct BackendAdapter {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
}

impl BackendAdapter {
    pub fn new(
        url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, AdapterError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("schedule-quorum/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
            token,
        })
    }

    async fn request(&self, scenario: &Scenario) -> Result<ValidationResult, AdapterError> {
        let body = ValidateRequest {
            days: scenario.selection.indices(),
        };

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        debug!("Backend POST {} days={:?}", self.url, body.days);
        let response = request.send().await?;
        let status = response.status();

        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(AdapterError::AuthRequired(format!(
                "HTTP {} from {}",
                status.as_u16(),
                self.url
            )));
        }

        let text = response.text().await?;
        let parsed = serde_json::from_str::<ValidateResponse>(&text);

        if !status.is_success() {
            // Some workflows answer business rejections with a 4xx and a verdict body
            if let Ok(parsed) = parsed
                && parsed.has_verdict()
            {
                return Ok(parsed.into_result());
            }
            return Err(AdapterError::Unreachable(format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let parsed = parsed.map_err(|e| AdapterError::Parse(format!("invalid JSON body: {}", e)))?;
        if !parsed.has_verdict() {
            return Err(AdapterError::Parse(
                "response has none of nightsCount, isValid, errorCode".to_string(),
            ));
        }
        Ok(parsed.into_result())
    }
}

#[async_trait]
impl ValidatorAdapter for BackendAdapter {
    fn id(&self) -> AdapterId {
        AdapterId::Backend
    }

    async fn evaluate(&self, scenario: &Scenario) -> AdapterOutcome {
        match self.request(scenario).await {
            Ok(result) => result.into(),
            Err(e) => {
                warn!("Backend adapter failed for {}: {}", scenario.id, e);
                e.into_outcome(AdapterId::Backend)
            }
        }
    }
}

//! Minimal W3C WebDriver client over HTTP
//!
//! Only the commands the legacy oracle needs:
//!
//! | Command | Endpoint |
//! |---------|----------|
//! | New Session | `POST /session` |
//! | Navigate To | `POST /session/{id}/url` |
//! | Get Current URL | `GET /session/{id}/url` |
//! | Find Element | `POST /session/{id}/element` |
//! | Element Click | `POST /session/{id}/element/{element}/click` |
//! | Get Page Source | `GET /session/{id}/source` |
//! | Delete Session | `DELETE /session/{id}` |

use super::session::{BrowserDriver, BrowserSession};
use crate::validators::error::AdapterError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Key under which W3C drivers return element references
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

#[derive(Debug, Deserialize)]
struct WireResponse {
    value: Value,
}

#[derive(Debug, Deserialize)]
struct WireError {
    error: String,
    #[serde(default)]
    message: String,
}

/// Map a W3C error code onto a transport failure
fn wire_error(command: &str, err: WireError) -> AdapterError {
    let detail = format!("{}: {} ({})", command, err.error, err.message);
    match err.error.as_str() {
        "timeout" | "script timeout" => AdapterError::Timeout(detail),
        "no such element" | "stale element reference" | "element not interactable"
        | "invalid selector" => AdapterError::Parse(detail),
        _ => AdapterError::Unreachable(detail),
    }
}

/// Shared HTTP plumbing for driver and sessions
#[derive(Clone)]
struct WireClient {
    http: reqwest::Client,
    base_url: String,
}

impl WireClient {
    async fn send(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<Value>,
        command: &str,
    ) -> Result<Value, AdapterError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("WebDriver {} {}", method, url);

        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        let wire: WireResponse = serde_json::from_str(&text).map_err(|e| {
            AdapterError::Parse(format!("{}: undecodable driver response: {}", command, e))
        })?;

        if !status.is_success() {
            return Err(match serde_json::from_value::<WireError>(wire.value) {
                Ok(err) => wire_error(command, err),
                Err(_) => AdapterError::Unreachable(format!("{}: HTTP {}", command, status)),
            });
        }
        Ok(wire.value)
    }
}

/// Browser capabilities for a new session
#[derive(Debug, Clone)]
pub struct Capabilities {
    pub browser: String,
    pub headless: bool,
}

impl Capabilities {
    fn to_json(&self) -> Value {
        let browser = self.browser.to_lowercase();
        let mut always_match = json!({ "browserName": browser });

        if self.headless {
            let (key, flag) = match browser.as_str() {
                "firefox" => ("moz:firefoxOptions", "-headless"),
                "edge" | "msedge" => ("ms:edgeOptions", "--headless=new"),
                _ => ("goog:chromeOptions", "--headless=new"),
            };
            always_match[key] = json!({ "args": [flag] });
        }

        json!({ "capabilities": { "alwaysMatch": always_match } })
    }
}

/// [`BrowserDriver`] backed by a WebDriver server (chromedriver, geckodriver,
/// Selenium Grid)
pub struct WebDriverClient {
    wire: WireClient,
    capabilities: Capabilities,
}

impl WebDriverClient {
    pub fn new(
        base_url: impl Into<String>,
        capabilities: Capabilities,
        timeout: Duration,
    ) -> Result<Self, AdapterError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            wire: WireClient {
                http,
                base_url: base_url.into().trim_end_matches('/').to_string(),
            },
            capabilities,
        })
    }
}

#[async_trait]
impl BrowserDriver for WebDriverClient {
    async fn open_session(&self) -> Result<Arc<dyn BrowserSession>, AdapterError> {
        let value = self
            .wire
            .send(
                reqwest::Method::POST,
                "/session",
                Some(self.capabilities.to_json()),
                "new session",
            )
            .await?;

        let id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| AdapterError::Parse("new session: no sessionId".to_string()))?
            .to_string();
        debug!("Opened WebDriver session {}", id);

        Ok(Arc::new(WebDriverSession {
            wire: self.wire.clone(),
            id,
        }))
    }
}

/// One live WebDriver session
pub struct WebDriverSession {
    wire: WireClient,
    id: String,
}

impl WebDriverSession {
    fn path(&self, suffix: &str) -> String {
        format!("/session/{}{}", self.id, suffix)
    }

    async fn find_element(&self, css_selector: &str) -> Result<String, AdapterError> {
        let value = self
            .wire
            .send(
                reqwest::Method::POST,
                &self.path("/element"),
                Some(json!({ "using": "css selector", "value": css_selector })),
                "find element",
            )
            .await?;

        value
            .get(ELEMENT_KEY)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                AdapterError::Parse(format!("find element: no reference for {}", css_selector))
            })
    }
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    fn id(&self) -> &str {
        &self.id
    }

    async fn navigate(&self, url: &str) -> Result<(), AdapterError> {
        self.wire
            .send(
                reqwest::Method::POST,
                &self.path("/url"),
                Some(json!({ "url": url })),
                "navigate",
            )
            .await
            .map(|_| ())
    }

    async fn click(&self, css_selector: &str) -> Result<(), AdapterError> {
        let element = self.find_element(css_selector).await?;
        self.wire
            .send(
                reqwest::Method::POST,
                &self.path(&format!("/element/{}/click", element)),
                Some(json!({})),
                "element click",
            )
            .await
            .map(|_| ())
    }

    async fn current_url(&self) -> Result<String, AdapterError> {
        let value = self
            .wire
            .send(reqwest::Method::GET, &self.path("/url"), None, "get url")
            .await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn page_source(&self) -> Result<String, AdapterError> {
        let value = self
            .wire
            .send(reqwest::Method::GET, &self.path("/source"), None, "page source")
            .await?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| AdapterError::Parse("page source: value is not a string".to_string()))
    }

    async fn close(&self) -> Result<(), AdapterError> {
        self.wire
            .send(reqwest::Method::DELETE, &self.path(""), None, "delete session")
            .await
            .map(|_| ())
    }
}

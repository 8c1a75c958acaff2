//! Legacy oracle adapter
//!
//! Drives the legacy calendar page in a real browser and reads the verdict
//! off the screen.
//!
//! # Flow
//!
//! ```text
//! open session ─▶ navigate ─▶ auth wall? ─▶ click each day ─▶ poll page ─▶ close
//!                               │                               │
//!                               └─ AUTH_REQUIRED                └─ PARSE_ERROR after settle
//! ```
//!
//! Each evaluation gets its own session, so selections never leak between
//! scenarios. Auth walls are reported, never retried.

mod scrape;
mod session;
mod webdriver;

pub use scrape::{VerdictPatterns, html_to_text};
pub use session::{BrowserDriver, BrowserSession, SessionGuard, drain_session_closes};
pub use webdriver::{Capabilities, WebDriverClient, WebDriverSession};

use super::error::AdapterError;
use async_trait::async_trait;
use schedule_application::ValidatorAdapter;
use schedule_domain::{AdapterId, AdapterOutcome, Day, Scenario, ValidationResult};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

/// Interval between page polls while waiting for the UI to settle
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Where and how to drive the legacy page
#[derive(Debug, Clone)]
pub struct LegacyPage {
    pub url: String,
    /// CSS selector template; `{index}` and `{name}` are substituted per day
    pub day_selector: String,
    /// Longest wait for a verdict after the last click
    pub settle: Duration,
}

impl LegacyPage {
    pub fn selector_for(&self, day: Day) -> String {
        self.day_selector
            .replace("{index}", &day.index().to_string())
            .replace("{name}", &day.short_name().to_lowercase())
    }
}

/// Browser-automation adapter for the legacy oracle
pub struct LegacyOracleAdapter {
    driver: Arc<dyn BrowserDriver>,
    page: LegacyPage,
    patterns: VerdictPatterns,
    poll_interval: Duration,
    session_closes: TaskTracker,
}

impl LegacyOracleAdapter {
    pub fn new(driver: Arc<dyn BrowserDriver>, page: LegacyPage) -> Result<Self, regex::Error> {
        Ok(Self {
            driver,
            page,
            patterns: VerdictPatterns::new()?,
            poll_interval: POLL_INTERVAL,
            session_closes: TaskTracker::new(),
        })
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Run closes of abandoned sessions on a caller-owned tracker
    pub fn with_session_tracker(mut self, tracker: TaskTracker) -> Self {
        self.session_closes = tracker;
        self
    }

    /// Tracker holding closes of sessions whose evaluation was dropped
    pub fn session_tracker(&self) -> TaskTracker {
        self.session_closes.clone()
    }

    async fn drive(
        &self,
        session: &dyn BrowserSession,
        scenario: &Scenario,
    ) -> Result<ValidationResult, AdapterError> {
        session.navigate(&self.page.url).await?;
        self.check_auth(session).await?;

        for day in scenario.selection.iter() {
            let selector = self.page.selector_for(day);
            debug!("Legacy: clicking {} ({})", day, selector);
            session.click(&selector).await.map_err(|e| match e {
                AdapterError::Parse(detail) => {
                    AdapterError::Parse(format!("day toggle for {} not found: {}", day, detail))
                }
                other => other,
            })?;
        }

        self.await_verdict(session).await
    }

    async fn check_auth(&self, session: &dyn BrowserSession) -> Result<(), AdapterError> {
        let url = session.current_url().await?;
        let html = session.page_source().await?;
        if self.patterns.is_auth_wall(&url, &html) {
            return Err(AdapterError::AuthRequired(format!(
                "legacy page redirected to an authentication wall ({})",
                url
            )));
        }
        Ok(())
    }

    /// Poll the page until it shows a verdict or the settle window closes
    async fn await_verdict(&self, session: &dyn BrowserSession) -> Result<ValidationResult, AdapterError> {
        let deadline = tokio::time::Instant::now() + self.page.settle;

        loop {
            let html = session.page_source().await?;
            let attempt = self.patterns.extract(&html);

            match attempt {
                Ok(result) => return Ok(result),
                Err(reason) if tokio::time::Instant::now() >= deadline => {
                    self.check_auth(session).await?;
                    return Err(AdapterError::Parse(format!(
                        "no verdict after {}ms: {}",
                        self.page.settle.as_millis(),
                        reason
                    )));
                }
                Err(_) => tokio::time::sleep(self.poll_interval).await,
            }
        }
    }
}

#[async_trait]
impl ValidatorAdapter for LegacyOracleAdapter {
    fn id(&self) -> AdapterId {
        AdapterId::Legacy
    }

    async fn evaluate(&self, scenario: &Scenario) -> AdapterOutcome {
        let session = match self.driver.open_session().await {
            Ok(session) => session,
            Err(e) => {
                warn!("Legacy adapter could not open a browser session: {}", e);
                return e.into_outcome(AdapterId::Legacy);
            }
        };
        info!(
            "Legacy: session {} for scenario {}",
            session.id(),
            scenario.id
        );

        let guard = SessionGuard::new(session, self.session_closes.clone());
        let result = self.drive(guard.session(), scenario).await;
        guard.close().await;

        match result {
            Ok(verdict) => verdict.into(),
            Err(e) => {
                warn!("Legacy adapter failed for {}: {}", scenario.id, e);
                e.into_outcome(AdapterId::Legacy)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schedule_domain::{ErrorCode, TransportReason, find_scenario};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // ==================== Test Mocks ====================

    /// Scripted page: returns `pages` in order on each source read, repeating
    /// the last one
    struct ScriptedSession {
        url: String,
        pages: Mutex<Vec<String>>,
        clicks: Mutex<Vec<String>>,
        missing_selector: Option<String>,
        source_delay: Duration,
        closes: AtomicUsize,
    }

    #[async_trait]
    impl BrowserSession for ScriptedSession {
        fn id(&self) -> &str {
            "scripted"
        }

        async fn navigate(&self, _url: &str) -> Result<(), AdapterError> {
            Ok(())
        }

        async fn click(&self, css_selector: &str) -> Result<(), AdapterError> {
            if self.missing_selector.as_deref() == Some(css_selector) {
                return Err(AdapterError::Parse("no such element".to_string()));
            }
            self.clicks.lock().unwrap().push(css_selector.to_string());
            Ok(())
        }

        async fn current_url(&self) -> Result<String, AdapterError> {
            Ok(self.url.clone())
        }

        async fn page_source(&self) -> Result<String, AdapterError> {
            if !self.source_delay.is_zero() {
                tokio::time::sleep(self.source_delay).await;
            }
            let mut pages = self.pages.lock().unwrap();
            if pages.len() > 1 {
                Ok(pages.remove(0))
            } else {
                Ok(pages.first().cloned().unwrap_or_default())
            }
        }

        async fn close(&self) -> Result<(), AdapterError> {
            self.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct ScriptedDriver {
        session: Option<Arc<ScriptedSession>>,
    }

    #[async_trait]
    impl BrowserDriver for ScriptedDriver {
        async fn open_session(&self) -> Result<Arc<dyn BrowserSession>, AdapterError> {
            match &self.session {
                Some(session) => Ok(session.clone() as Arc<dyn BrowserSession>),
                None => Err(AdapterError::Unreachable("connection refused".to_string())),
            }
        }
    }

    fn session(pages: &[&str]) -> ScriptedSession {
        ScriptedSession {
            url: "https://legacy.example.com/calendar".to_string(),
            pages: Mutex::new(pages.iter().map(|p| p.to_string()).collect()),
            clicks: Mutex::new(Vec::new()),
            missing_selector: None,
            source_delay: Duration::ZERO,
            closes: AtomicUsize::new(0),
        }
    }

    fn adapter(session: Option<Arc<ScriptedSession>>) -> LegacyOracleAdapter {
        LegacyOracleAdapter::new(
            Arc::new(ScriptedDriver { session }),
            LegacyPage {
                url: "https://legacy.example.com/calendar".to_string(),
                day_selector: "[data-day-index='{index}']".to_string(),
                settle: Duration::from_millis(100),
            },
        )
        .unwrap()
        .with_poll_interval(Duration::from_millis(10))
    }

    const CALENDAR: &str = "<body><ul class='calendar'><li>Sun</li></ul></body>";

    // ==================== Tests ====================

    #[test]
    fn test_selector_substitution() {
        let page = LegacyPage {
            url: String::new(),
            day_selector: "#day-{name}[data-i='{index}']".to_string(),
            settle: Duration::ZERO,
        };
        assert_eq!(page.selector_for(Day::Friday), "#day-fri[data-i='5']");
    }

    #[tokio::test]
    async fn test_reads_verdict_after_ui_settles() {
        let s = Arc::new(session(&[
            CALENDAR,
            CALENDAR,
            "<body><div class='summary'>Total: 3 nights</div></body>",
        ]));
        let outcome = adapter(Some(s.clone()))
            .evaluate(&find_scenario("fri-mon-wrap").unwrap())
            .await;

        assert_eq!(outcome.verdict(), Some(&ValidationResult::valid(3)));
        assert_eq!(
            *s.clicks.lock().unwrap(),
            vec![
                "[data-day-index='0']",
                "[data-day-index='1']",
                "[data-day-index='5']",
                "[data-day-index='6']",
            ]
        );
        assert_eq!(s.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_error_banner_is_a_verdict() {
        let s = Arc::new(session(&[
            CALENDAR,
            "<body><p class='error'>Selected days must be consecutive</p></body>",
        ]));
        let outcome = adapter(Some(s.clone()))
            .evaluate(&find_scenario("mon-wed-fri").unwrap())
            .await;

        let verdict = outcome.verdict().unwrap();
        assert_eq!(verdict.error_code, Some(ErrorCode::NonContiguous));
        assert_eq!(s.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_auth_wall_is_reported_and_session_closed() {
        let mut scripted = session(&["<body><input type='password'></body>"]);
        scripted.url = "https://sso.example.com/login".to_string();
        let s = Arc::new(scripted);

        let outcome = adapter(Some(s.clone()))
            .evaluate(&find_scenario("mon-sat").unwrap())
            .await;

        assert_eq!(
            outcome.transport_failure().map(|f| f.reason),
            Some(TransportReason::AuthRequired)
        );
        assert!(s.clicks.lock().unwrap().is_empty());
        assert_eq!(s.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_verdict_is_parse_error() {
        let s = Arc::new(session(&[CALENDAR]));
        let outcome = adapter(Some(s.clone()))
            .evaluate(&find_scenario("mon-sat").unwrap())
            .await;

        let failure = outcome.transport_failure().unwrap();
        assert_eq!(failure.reason, TransportReason::ParseError);
        assert!(failure.detail.contains("no verdict after 100ms"));
        assert_eq!(s.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_day_toggle_is_parse_error() {
        let mut scripted = session(&[CALENDAR]);
        scripted.missing_selector = Some("[data-day-index='3']".to_string());
        let s = Arc::new(scripted);

        let outcome = adapter(Some(s.clone()))
            .evaluate(&find_scenario("mon-wed-fri").unwrap())
            .await;

        let failure = outcome.transport_failure().unwrap();
        assert_eq!(failure.reason, TransportReason::ParseError);
        assert!(failure.detail.contains("Wednesday"));
        assert_eq!(s.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_driver_unreachable() {
        let outcome = adapter(None)
            .evaluate(&find_scenario("mon-sat").unwrap())
            .await;
        assert_eq!(
            outcome.transport_failure().map(|f| f.reason),
            Some(TransportReason::Unreachable)
        );
    }

    #[tokio::test]
    async fn test_session_closed_when_evaluation_is_dropped() {
        let mut scripted = session(&[CALENDAR]);
        scripted.source_delay = Duration::from_secs(30);
        let s = Arc::new(scripted);
        let adapter = adapter(Some(s.clone()));
        let scenario = find_scenario("mon-sat").unwrap();

        let timed_out =
            tokio::time::timeout(Duration::from_millis(50), adapter.evaluate(&scenario)).await;
        assert!(timed_out.is_err());

        // The guard's drop hands the close to the adapter's tracker
        let tracker = adapter.session_tracker();
        assert!(drain_session_closes(&tracker, Duration::from_secs(1)).await);
        assert_eq!(s.closes.load(Ordering::SeqCst), 1);
    }
}

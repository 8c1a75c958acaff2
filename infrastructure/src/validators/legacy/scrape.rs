//! Verdict extraction from the legacy calendar page
//!
//! The legacy page has no machine-readable output. The verdict is inferred
//! from visible text: an error banner, a night count in the booking summary,
//! or a login form in place of the calendar.

use regex::Regex;
use schedule_domain::{ErrorCode, ValidationResult};
use scraper::{Html, Selector};

/// Compiled text patterns for reading the legacy page
pub struct VerdictPatterns {
    nights: Regex,
    minimum_phrase: Regex,
    below_minimum: Regex,
    non_contiguous: Regex,
    empty_selection: Regex,
    auth_text: Regex,
    auth_url: Regex,
}

impl VerdictPatterns {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            nights: Regex::new(r"(?i)\b(\d+)\s*nights?\b")?,
            minimum_phrase: Regex::new(r"(?i)\b(minimum(\s+stay)?(\s+of)?|at\s+least)\s+\d+\s*nights?")?,
            below_minimum: Regex::new(
                r"(?i)(minimum(\s+stay)?(\s+of)?\s+\d+\s*nights?\s+(is\s+)?required|requires?\s+at\s+least\s+\d+\s*nights?|below\s+(the\s+)?minimum|too\s+short)",
            )?,
            non_contiguous: Regex::new(
                r"(?i)(must\s+be\s+(consecutive|contiguous)|not\s+(consecutive|contiguous)|non-?(consecutive|contiguous))",
            )?,
            empty_selection: Regex::new(
                r"(?i)(select\s+at\s+least\s+one\s+day|no\s+days?\s+selected)",
            )?,
            auth_text: Regex::new(
                r"(?i)\b(sign\s+in\s+to\s+continue|log\s*in\s+required|please\s+(sign|log)\s*in|session\s+(has\s+)?expired)\b",
            )?,
            auth_url: Regex::new(r"(?i)/(login|signin|sign-in|sso|oauth|auth)(/|\?|$)")?,
        })
    }

    /// Whether the browser landed on an authentication wall
    pub fn is_auth_wall(&self, current_url: &str, html: &str) -> bool {
        if self.auth_url.is_match(current_url) || has_password_field(html) {
            return true;
        }
        self.auth_text.is_match(&html_to_text(html))
    }

    /// Read a verdict from page HTML.
    ///
    /// Error banners win over night counts. Night counts that are part of a
    /// "minimum N nights" phrase are ignored. Returns `Err` with a reason when
    /// the text holds no verdict or conflicting night counts.
    pub fn extract(&self, html: &str) -> Result<ValidationResult, String> {
        let text = html_to_text(html);
        let nights = self.nights_in(&text)?;

        if self.empty_selection.is_match(&text) {
            return Ok(ValidationResult::invalid(
                ErrorCode::EmptySelection,
                None,
                first_match(&self.empty_selection, &text),
            ));
        }
        if self.non_contiguous.is_match(&text) {
            return Ok(ValidationResult::invalid(
                ErrorCode::NonContiguous,
                nights,
                first_match(&self.non_contiguous, &text),
            ));
        }
        if self.below_minimum.is_match(&text) {
            return Ok(ValidationResult::invalid(
                ErrorCode::BelowMinimum,
                nights,
                first_match(&self.below_minimum, &text),
            ));
        }

        match nights {
            Some(n) => Ok(ValidationResult::valid(n)),
            None => Err("page shows neither a night count nor a validation error".to_string()),
        }
    }

    /// The single night count on the page, if any
    fn nights_in(&self, text: &str) -> Result<Option<u32>, String> {
        let excluded: Vec<(usize, usize)> = self
            .minimum_phrase
            .find_iter(text)
            .map(|m| (m.start(), m.end()))
            .collect();

        let mut counts: Vec<u32> = self
            .nights
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let inside_minimum = excluded
                    .iter()
                    .any(|(s, e)| whole.start() >= *s && whole.end() <= *e);
                if inside_minimum {
                    return None;
                }
                caps.get(1)?.as_str().parse::<u32>().ok()
            })
            .collect();
        counts.dedup();

        match counts.as_slice() {
            [] => Ok(None),
            [n] => Ok(Some(*n)),
            many => Err(format!("conflicting night counts on page: {:?}", many)),
        }
    }
}

fn first_match(re: &Regex, text: &str) -> String {
    re.find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

fn has_password_field(html: &str) -> bool {
    let Ok(selector) = Selector::parse("input[type='password']") else {
        return false;
    };
    Html::parse_document(html).select(&selector).next().is_some()
}

/// Extract readable text from HTML, stripping tags, scripts, and styles
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);

    // Tags whose entire subtree should be ignored
    let skip_tags = ["script", "style", "noscript", "svg", "template"];

    // Try to use <body>, fall back to the whole document
    let body = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next());

    let parts = match body {
        Some(body) => collect_element_text(body, &skip_tags),
        None => collect_element_text(document.root_element(), &skip_tags),
    };

    clean_whitespace(&parts.join(" "))
}

/// Recursively collect text from an element, skipping elements matching skip_tags
fn collect_element_text(element: scraper::ElementRef, skip_tags: &[&str]) -> Vec<String> {
    let tag_name = element.value().name();
    if skip_tags.contains(&tag_name) {
        return Vec::new();
    }
    // Hidden elements are not part of what the user sees
    if element.value().attr("hidden").is_some()
        || element.value().attr("aria-hidden") == Some("true")
    {
        return Vec::new();
    }

    let mut parts = Vec::new();

    for child in element.children() {
        match child.value() {
            scraper::Node::Text(text) => {
                let t = text.trim();
                if !t.is_empty() {
                    parts.push(t.to_string());
                }
            }
            scraper::Node::Element(_) => {
                if let Some(child_el) = scraper::ElementRef::wrap(child) {
                    parts.extend(collect_element_text(child_el, skip_tags));
                }
            }
            _ => {}
        }
    }

    parts
}

/// Collapse runs of whitespace to a single space
fn clean_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

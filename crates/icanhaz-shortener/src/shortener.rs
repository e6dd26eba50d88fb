use crate::error::{Result, ShortenerError};
use async_trait::async_trait;
use icanhaz_core::{LinkRecord, ShortCode};
use serde::Serialize;
use tracing::warn;

/// A link that was just written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortened {
    /// The URL that was shortened.
    pub url: String,
    /// The code derived from `url`.
    pub code: ShortCode,
    /// The configured prefix followed by `code`.
    pub short_url: String,
    /// The record previously stored under `code`, if any.
    pub evicted: Option<LinkRecord>,
}

/// Outcome of [`Shortener::shorten`].
///
/// On failure only `success` is set; the other fields are omitted when
/// serialised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortenResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_url: Option<String>,
}

impl ShortenResult {
    pub fn failure() -> Self {
        Self {
            success: false,
            url: None,
            code: None,
            short_url: None,
        }
    }
}

impl From<Shortened> for ShortenResult {
    fn from(value: Shortened) -> Self {
        Self {
            success: true,
            url: Some(value.url),
            code: Some(value.code.to_string()),
            short_url: Some(value.short_url),
        }
    }
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Derives the code for `url` and stores the link with a zero hit count,
    /// replacing any link that already had the same code.
    async fn create(&self, url: &str) -> Result<Shortened>;

    /// Resolves `code` to its target URL and counts the hit.
    ///
    /// The incremented count is persisted before the URL is returned.
    async fn resolve(&self, code: &str) -> Result<String>;

    /// Returns the stored record for `code` without counting a hit.
    async fn stats(&self, code: &str) -> Result<LinkRecord>;

    /// Like [`Shortener::create`], with every error collapsed into
    /// `success: false`.
    async fn shorten(&self, url: &str) -> ShortenResult {
        match self.create(url).await {
            Ok(shortened) => shortened.into(),
            Err(err) => {
                warn!(url = %url, error = %err, "failed to shorten url");
                ShortenResult::failure()
            }
        }
    }

    /// Like [`Shortener::resolve`], with every error collapsed into `None`.
    async fn lookup(&self, code: &str) -> Option<String> {
        match self.resolve(code).await {
            Ok(url) => Some(url),
            Err(ShortenerError::NotFound(_)) => None,
            Err(err) => {
                warn!(code = %code, error = %err, "failed to look up short code");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_serialises_success_only() {
        let json = serde_json::to_value(ShortenResult::failure()).unwrap();
        assert_eq!(json, serde_json::json!({ "success": false }));
    }

    #[test]
    fn success_carries_all_fields() {
        let result = ShortenResult::from(Shortened {
            url: "http://example.com".to_string(),
            code: ShortCode::new_unchecked("ARE7MQ"),
            short_url: "http://l.cfg.sh/ARE7MQ".to_string(),
            evicted: None,
        });

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": true,
                "url": "http://example.com",
                "code": "ARE7MQ",
                "short_url": "http://l.cfg.sh/ARE7MQ",
            })
        );
    }
}

use crate::encoded::ShortCodeBase64;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// A short code identifying a stored link.
///
/// Codes derived from a URL digest are six characters of the base64 alphabet
/// with `/` swapped for `_`. Codes coming from callers are accepted when they
/// are 1-64 characters long and contain only `[a-zA-Z0-9+_-]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortCode(String);

const MAX_LENGTH: usize = 64;

impl ShortCode {
    /// Creates a `ShortCode` from an encoded digest.
    ///
    /// # Examples
    ///
    /// ```
    /// use icanhaz_core::{ShortCode, ShortCodeBase64};
    ///
    /// let code = ShortCode::digest(ShortCodeBase64::new([0x01, 0x11, 0x3b, 0x31]));
    /// assert_eq!(code.as_str(), "ARE7MQ");
    /// ```
    pub fn digest(code: impl Into<ShortCodeBase64>) -> Self {
        Self(code.into().into_string())
    }

    /// Creates a new `ShortCode` after validating the input.
    pub fn new(code: impl Into<String>) -> std::result::Result<Self, CoreError> {
        let code = code.into();
        Self::validate(&code)?;
        Ok(Self(code))
    }

    /// Creates a `ShortCode` without validation.
    ///
    /// Use this only for codes read back from a store this crate wrote.
    pub fn new_unchecked(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Builds the short URL by appending the code to `prefix` verbatim.
    ///
    /// No separator is inserted, so the prefix normally ends with `/`.
    pub fn with_prefix(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.0)
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(code: &str) -> std::result::Result<(), CoreError> {
        if code.is_empty() || code.len() > MAX_LENGTH {
            return Err(CoreError::InvalidShortCode(format!(
                "length must be between 1 and {}, got {}",
                MAX_LENGTH,
                code.len()
            )));
        }

        if !code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '_' | '-'))
        {
            return Err(CoreError::InvalidShortCode(format!(
                "must contain only alphanumeric characters, '+', '_' or '-': '{}'",
                code
            )));
        }

        Ok(())
    }
}

impl FromStr for ShortCode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_codes() {
        assert!(ShortCode::new("ARE7MQ").is_ok());
        assert!(ShortCode::new("u+mcsA").is_ok());
        assert!(ShortCode::new("G_AM4g").is_ok());
        assert!(ShortCode::new("doesnotexist").is_ok());
        assert!(ShortCode::new("a".repeat(64)).is_ok());
    }

    #[test]
    fn empty_or_too_long() {
        assert!(ShortCode::new("").is_err());
        assert!(ShortCode::new("a".repeat(65)).is_err());
    }

    #[test]
    fn invalid_characters() {
        assert!(ShortCode::new("abc def").is_err());
        assert!(ShortCode::new("abc/def").is_err());
        assert!(ShortCode::new("abc=").is_err());
        assert!(ShortCode::new("../links.db").is_err());
    }

    #[test]
    fn parses_from_str() {
        let code: ShortCode = "ZBSOow".parse().unwrap();
        assert_eq!(code.as_str(), "ZBSOow");
        assert!("a/b".parse::<ShortCode>().is_err());
    }

    #[test]
    fn digest_code_matches_encoding() {
        let code = ShortCode::digest(ShortCodeBase64::new([0x1b, 0xf0, 0x0c, 0xe2]));
        assert_eq!(code.to_string(), "G_AM4g");
    }

    #[test]
    fn with_prefix_concatenates() {
        let code = ShortCode::new("ARE7MQ").unwrap();
        assert_eq!(code.with_prefix("http://l.cfg.sh/"), "http://l.cfg.sh/ARE7MQ");
        assert_eq!(code.with_prefix("x-"), "x-ARE7MQ");
    }

    #[test]
    fn serializes_as_plain_string() {
        let code = ShortCode::new("ARE7MQ").unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"ARE7MQ\"");
    }
}

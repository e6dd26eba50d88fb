use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt::Display;

/// A short code encoded from raw bytes with standard base64.
///
/// Padding is stripped and `/` is replaced with `_`. `+` is kept as is, so a
/// code may still need percent-encoding when placed in a query string.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ShortCodeBase64(String);

impl ShortCodeBase64 {
    /// Creates a new `ShortCodeBase64` by encoding the given bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use icanhaz_core::ShortCodeBase64;
    ///
    /// let code = ShortCodeBase64::new([0x01, 0x11, 0x3b, 0x31]);
    /// assert_eq!(code.as_str(), "ARE7MQ");
    /// ```
    pub fn new<T: AsRef<[u8]>>(bytes: T) -> Self {
        let encoded = STANDARD.encode(bytes);
        Self(encoded.replace('=', "").replace('/', "_"))
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Debug for ShortCodeBase64 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ShortCodeBase64").field(&self.0).finish()
    }
}

impl Display for ShortCodeBase64 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

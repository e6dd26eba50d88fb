pub mod suffix;

pub use suffix::Md5SuffixGenerator;

use icanhaz_core::ShortCode;

/// Trait for deriving short codes from URLs.
///
/// Implementations are pure functions of the URL and don't interact with
/// storage. Two URLs may map to the same code; the store resolves that by
/// letting the later write win.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<ShortCode>;
    /// Derives the short code for `url`.
    ///
    /// Calling this twice with the same input must yield the same code.
    fn generate(&self, url: &str) -> Self::Output;
}

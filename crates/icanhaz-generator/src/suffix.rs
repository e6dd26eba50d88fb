use crate::Generator;
use icanhaz_core::{ShortCode, ShortCodeBase64};
use md5::{Digest, Md5};

/// Number of trailing digest bytes kept in a code.
pub const SUFFIX_LEN: usize = 4;

/// Derives a code from the last 32 bits of the URL's MD5 digest.
///
/// The four bytes are base64 encoded with padding stripped and `/` replaced
/// by `_`, which always gives a six character code. With only 32 bits of
/// digest, collisions between unrelated URLs are possible and accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct Md5SuffixGenerator;

impl Md5SuffixGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Returns the raw digest bytes a code is encoded from.
    pub fn suffix(&self, url: &str) -> [u8; SUFFIX_LEN] {
        let digest = Md5::digest(url.as_bytes());
        let mut suffix = [0u8; SUFFIX_LEN];
        suffix.copy_from_slice(&digest[digest.len() - SUFFIX_LEN..]);
        suffix
    }
}

impl Generator for Md5SuffixGenerator {
    type Output = ShortCode;

    fn generate(&self, url: &str) -> Self::Output {
        ShortCode::digest(ShortCodeBase64::new(self.suffix(url)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes() {
        let generator = Md5SuffixGenerator::new();

        assert_eq!(generator.generate("http://example.com").as_str(), "ARE7MQ");
        assert_eq!(generator.generate("https://example.com").as_str(), "ZBSOow");
        assert_eq!(generator.generate("http://cfg.sh").as_str(), "bgXBGQ");
        assert_eq!(generator.generate("").as_str(), "7PhCfg");
    }

    #[test]
    fn suffix_is_tail_of_digest() {
        // md5("http://example.com") = a9b9f04336ce0181a08e774e01113b31
        let generator = Md5SuffixGenerator::new();
        assert_eq!(
            generator.suffix("http://example.com"),
            [0x01, 0x11, 0x3b, 0x31]
        );
    }

    #[test]
    fn slash_becomes_underscore() {
        let generator = Md5SuffixGenerator::new();
        assert_eq!(generator.generate("https://example.com/2").as_str(), "G_AM4g");
    }

    #[test]
    fn plus_is_kept() {
        let generator = Md5SuffixGenerator::new();
        assert_eq!(generator.generate("https://example.com/1").as_str(), "u+mcsA");
    }

    #[test]
    fn generation_is_deterministic() {
        let generator = Md5SuffixGenerator::new();
        let url = "https://www.rust-lang.org/";

        let first = generator.generate(url);
        let second = Md5SuffixGenerator::default().generate(url);

        assert_eq!(first, second);
        assert_eq!(first.as_str(), "LvSSnQ");
    }

    #[test]
    fn codes_are_always_six_chars() {
        let generator = Md5SuffixGenerator::new();
        for i in 0..256 {
            let code = generator.generate(&format!("https://example.com/{i}"));
            assert_eq!(code.as_str().len(), 6, "code {code} for url {i}");
            assert!(!code.as_str().contains('/'));
            assert!(!code.as_str().contains('='));
        }
    }

    #[test]
    fn generator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Md5SuffixGenerator>();
    }
}

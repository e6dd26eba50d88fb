use crate::error::{Result, ShortenerError};
use crate::shortener::{Shortened, Shortener};
use async_trait::async_trait;
use icanhaz_core::{LinkRecord, Repository, ShortCode};
use icanhaz_generator::{Generator, Md5SuffixGenerator};
use std::sync::Arc;
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

/// Prefix used to build short URLs when none is configured.
pub const DEFAULT_URL_PREFIX: &str = "http://l.cfg.sh/";

/// Configures a [`CodeStore`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct CodeStoreSettings {
    /// Prepended verbatim to a code to form the short URL.
    #[builder(default = DEFAULT_URL_PREFIX.to_string(), setter(into))]
    pub url_prefix: String,
}

impl Default for CodeStoreSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `Repository` and a `Generator`. Codes are derived
/// from the URL alone, so shortening the same URL twice writes the same
/// code and resets its hit count. Two different URLs that derive the same
/// code evict each other with no collision check or retry.
#[derive(Debug)]
pub struct CodeStore<R, G> {
    repository: Arc<R>,
    generator: Arc<G>,
    url_prefix: String,
}

impl<R, G> Clone for CodeStore<R, G> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            generator: Arc::clone(&self.generator),
            url_prefix: self.url_prefix.clone(),
        }
    }
}

impl<R: Repository> CodeStore<R, Md5SuffixGenerator> {
    /// Creates a store that derives codes from MD5 digests, with default settings.
    pub fn with_repository(repository: R) -> Self {
        Self::new(repository, Md5SuffixGenerator::new(), CodeStoreSettings::default())
    }
}

impl<R: Repository, G: Generator> CodeStore<R, G> {
    pub fn new(repository: R, generator: G, settings: CodeStoreSettings) -> Self {
        Self {
            repository: Arc::new(repository),
            generator: Arc::new(generator),
            url_prefix: settings.url_prefix,
        }
    }

    /// Returns a reference to the backing repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    /// Derives the short code for `url` without touching the store.
    pub fn shortcode(&self, url: &str) -> ShortCode {
        self.generator.generate(url).into()
    }
}

#[async_trait]
impl<R: Repository, G: Generator> Shortener for CodeStore<R, G> {
    async fn create(&self, url: &str) -> Result<Shortened> {
        let code = self.shortcode(url);

        let evicted = self.repository.put(&code, LinkRecord::new(url)).await?;

        match &evicted {
            Some(previous) if previous.target_url != url => {
                debug!(
                    code = %code,
                    url = %url,
                    evicted_url = %previous.target_url,
                    "short code collision, evicted previous link"
                );
            }
            Some(previous) => {
                debug!(code = %code, hits = previous.hit_count, "link re-shortened, hit count reset");
            }
            None => {
                debug!(code = %code, url = %url, "link shortened");
            }
        }

        let short_url = code.with_prefix(&self.url_prefix);

        Ok(Shortened {
            url: url.to_owned(),
            code,
            short_url,
            evicted,
        })
    }

    async fn resolve(&self, code: &str) -> Result<String> {
        let code = ShortCode::new(code)?;
        trace!(code = %code, "resolving short code");

        match self.repository.record_hit(&code).await? {
            Some(record) => {
                debug!(code = %code, url = %record.target_url, hits = record.hit_count, "resolved short code");
                Ok(record.target_url)
            }
            None => {
                trace!(code = %code, "short code not found");
                Err(ShortenerError::NotFound(code.to_string()))
            }
        }
    }

    async fn stats(&self, code: &str) -> Result<LinkRecord> {
        let code = ShortCode::new(code)?;

        self.repository
            .get(&code)
            .await?
            .ok_or_else(|| ShortenerError::NotFound(code.to_string()))
    }
}

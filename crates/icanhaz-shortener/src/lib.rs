//! Short-code store service.
//!
//! This crate wires a [`Generator`](icanhaz_generator::Generator) and a
//! [`Repository`](icanhaz_core::Repository) into the [`CodeStore`] service and
//! ships the `icanhaz-shortener` command line tool. Core types are
//! re-exported from `icanhaz_core`.

pub mod error;
pub mod service;
pub mod shortener;

pub use error::ShortenerError;
pub use icanhaz_core::{LinkRecord, ShortCode};
pub use service::{CodeStore, CodeStoreSettings, DEFAULT_URL_PREFIX};
pub use shortener::{ShortenResult, Shortened, Shortener};

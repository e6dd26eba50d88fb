//! Core types and traits for the icanhaz short-code store.
//!
//! This crate provides the short code and link record types shared by the
//! code generator, the storage backends and the shortener service.

pub mod encoded;
pub mod error;
pub mod repository;
pub mod shortcode;

pub use encoded::ShortCodeBase64;
pub use error::{CoreError, StorageError};
pub use repository::{LinkRecord, ReadRepository, Repository};
pub use shortcode::ShortCode;

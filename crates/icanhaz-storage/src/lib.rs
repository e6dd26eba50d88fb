pub mod file;
pub mod memory;

pub use file::FileRepository;
pub use icanhaz_core::repository::Result;
pub use icanhaz_core::{LinkRecord, ReadRepository, Repository, StorageError};
pub use memory::InMemoryRepository;

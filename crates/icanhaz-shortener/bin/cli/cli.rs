use clap::{Parser, Subcommand, ValueEnum};
use icanhaz_shortener::DEFAULT_URL_PREFIX;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "ICANHAZ_SHORTENER_DB";
pub const URL_PREFIX_ENV: &str = "ICANHAZ_SHORTENER_URL_PREFIX";
pub const STORAGE_BACKEND_ENV: &str = "ICANHAZ_SHORTENER_STORAGE";

pub const DEFAULT_DB_PATH: &str = "links.db";

const DEFAULT_SCHEME: &str = "http://";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "file")]
    File,
    #[value(name = "in-memory")]
    InMemory,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::File => write!(f, "file"),
            StorageBackendArg::InMemory => write!(f, "in-memory"),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shorten a URL and print the result as JSON.
    Shorten { url: String },
    /// Print the URL a code points at, counting the hit.
    Lookup { code: String },
    /// Print the stored record for a code without counting a hit.
    Stats { code: String },
}

#[derive(Debug, Parser)]
#[command(name = "icanhaz-shortener")]
pub struct CLI {
    #[arg(long, env = DB_PATH_ENV, default_value = DEFAULT_DB_PATH)]
    pub db: PathBuf,

    #[arg(long, env = URL_PREFIX_ENV, default_value = DEFAULT_URL_PREFIX)]
    pub url_prefix: String,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::File
    )]
    pub storage: StorageBackendArg,

    #[command(subcommand)]
    pub command: Command,
}

/// Prepends `http://` to URLs given without a scheme.
pub fn ensure_scheme(url: &str) -> String {
    if url.contains("://") {
        url.to_owned()
    } else {
        format!("{DEFAULT_SCHEME}{url}")
    }
}

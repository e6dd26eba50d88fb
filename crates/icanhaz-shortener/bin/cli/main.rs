mod cli;

use crate::cli::{Command, StorageBackendArg, CLI};
use clap::Parser;
use icanhaz_generator::Md5SuffixGenerator;
use icanhaz_shortener::{CodeStore, CodeStoreSettings, Shortener, ShortenerError};
use icanhaz_storage::{FileRepository, InMemoryRepository, Repository};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = CLI::parse();

    info!(
        db = %config.db.display(),
        url_prefix = %config.url_prefix,
        storage_backend = %config.storage,
        "starting shortener"
    );

    let settings = CodeStoreSettings::builder()
        .url_prefix(config.url_prefix)
        .build();

    match config.storage {
        StorageBackendArg::File => {
            let repository = FileRepository::open(&config.db).await?;
            run(
                CodeStore::new(repository, Md5SuffixGenerator::new(), settings),
                config.command,
            )
            .await
        }
        StorageBackendArg::InMemory => {
            run(
                CodeStore::new(InMemoryRepository::new(), Md5SuffixGenerator::new(), settings),
                config.command,
            )
            .await
        }
    }
}

async fn run<R: Repository>(
    store: CodeStore<R, Md5SuffixGenerator>,
    command: Command,
) -> anyhow::Result<ExitCode> {
    match command {
        Command::Shorten { url } => {
            let result = store.shorten(&cli::ensure_scheme(&url)).await;
            println!("{}", serde_json::to_string(&result)?);

            Ok(if result.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Lookup { code } => match store.lookup(&code).await {
            Some(url) => {
                println!("{url}");
                Ok(ExitCode::SUCCESS)
            }
            None => Ok(ExitCode::FAILURE),
        },
        Command::Stats { code } => match store.stats(&code).await {
            Ok(record) => {
                println!("{}", serde_json::to_string(&record)?);
                Ok(ExitCode::SUCCESS)
            }
            Err(ShortenerError::NotFound(_)) => Ok(ExitCode::FAILURE),
            Err(err) => Err(err.into()),
        },
    }
}

//! Administrative commands for the achievement engine.
//!
//! # Examples
//! ```sh
//! cargo run --manifest-path backend/Cargo.toml --bin fitquest-admin -- seed --file backend/fixtures/achievements.json
//! cargo run --manifest-path backend/Cargo.toml --bin fitquest-admin -- check --user-id 3fa85f64-5717-4562-b3fc-2c963f66afa6
//! ```
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use mockable::{Clock, DefaultClock};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use fitquest::composition::{ServiceRuntime, build_services, connect_driven_ports, seed_catalogue};
use fitquest::domain::{RetryExecutor, UserId};
use fitquest::outbound::cache::InMemoryCatalogueCache;
use fitquest::outbound::queue::notification_channel;
use fitquest::settings::AppSettings;

/// `fitquest-admin` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "fitquest-admin",
    about = "Seed achievement definitions and run achievement checks",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to `FITQUEST_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url", global = true)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate a catalogue file and upsert every definition.
    Seed {
        #[arg(long, value_name = "path")]
        file: PathBuf,
    },
    /// Run every achievement checker for one user and print the report.
    Check {
        #[arg(long = "user-id", value_name = "uuid", value_parser = parse_user_id)]
        user_id: UserId,
    },
}

fn parse_user_id(raw: &str) -> std::result::Result<UserId, String> {
    UserId::new(raw).map_err(|err| err.to_string())
}

fn main() -> Result<()> {
    color_eyre::install()?;
    // Logs go to stderr so stdout carries only command output.
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(run(args))
}

/// The flag wins over settings; blank values count as unset.
///
/// Both commands act on persistent state, so running either against a
/// throwaway in-memory store is refused.
fn resolve_database_url<'a>(
    flag: Option<&'a str>,
    configured: Option<&'a str>,
) -> Result<&'a str> {
    flag.map(str::trim)
        .filter(|url| !url.is_empty())
        .or(configured)
        .ok_or_else(|| eyre!("no database URL: pass --database-url or set FITQUEST_DATABASE_URL"))
}

async fn run(args: CliArgs) -> Result<()> {
    // Flags belong to clap; settings come from the environment and files only.
    let settings = AppSettings::load_from_iter([OsString::from("fitquest-admin")])
        .map_err(|err| eyre!("invalid settings: {err}"))?;
    let database_url = resolve_database_url(args.database_url.as_deref(), settings.database_url())?;
    let ports = connect_driven_ports(Some(database_url))
        .await
        .wrap_err("prepare stores")?;

    match args.command {
        Command::Seed { file } => {
            let document = fs::read_to_string(&file)
                .wrap_err_with(|| format!("read catalogue file {}", file.display()))?;
            let written = seed_catalogue(ports.catalogue.as_ref(), &document)
                .await
                .wrap_err("seed catalogue")?;
            println!("upserted {written} achievement definitions");
        }
        Command::Check { user_id } => {
            let (sink, queue) = notification_channel();
            let logger = queue.spawn_logger();
            let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
            let services = build_services(
                &ports,
                ServiceRuntime {
                    retry: RetryExecutor::new(settings.retry_policy()),
                    cache: Arc::new(InMemoryCatalogueCache::new(clock.clone())),
                    cache_ttl: settings.catalogue_cache_ttl(),
                    notifications: Arc::new(sink),
                    clock,
                },
            );
            let report = services
                .coordinator
                .check_user(&user_id)
                .await
                .wrap_err("run achievement check")?;
            println!(
                "{}",
                serde_json::to_string_pretty(&report).wrap_err("encode report")?
            );
            drop(services);
            logger.await.wrap_err("notification logger")?;
        }
    }
    Ok(())
}

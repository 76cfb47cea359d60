use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use m3u_regroup::overrides::OverrideTable;
use m3u_regroup::{run, Config, RegroupError};

const DEFAULT_OUTPUT: &str = "sony-with-sports.m3u";

#[derive(Parser, Debug)]
#[command(name = "m3u-regroup")]
#[command(about = "Filter a remote M3U playlist down to grouped channels")]
struct Args {
    /// Output playlist path [default: $OUTPUT_FILE, then sony-with-sports.m3u]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Dotenv file to load before reading the environment [default: nearest .env]
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// TOML file of channel overrides (replaces CHANNEL_OVERRIDES)
    #[arg(long)]
    overrides: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    load_env_file(args.env_file.as_deref())?;
    let output = resolve_output(args.output, std::env::var_os("OUTPUT_FILE"));

    let mut config = Config::from_env().map_err(describe)?;
    if let Some(path) = &args.overrides {
        let overrides = OverrideTable::from_toml_file(path)
            .map_err(describe)
            .with_context(|| format!("Failed to load overrides from {}", path.display()))?;
        config = config.with_overrides(overrides);
    }

    run(&config, &output).await.map_err(describe)?;
    Ok(())
}

/// Load an explicitly requested env file, which must exist, or search for a
/// `.env` in the working directory and its parents, which may be absent.
fn load_env_file(path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
        }
        None => {
            if let Err(e) = dotenvy::dotenv() {
                if !e.not_found() {
                    return Err(e).context("Failed to load .env");
                }
            }
        }
    }
    Ok(())
}

fn resolve_output(arg: Option<PathBuf>, env: Option<OsString>) -> PathBuf {
    arg.or_else(|| env.filter(|value| !value.is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
}

fn describe(e: RegroupError) -> anyhow::Error {
    let label = if e.is_config() {
        "Invalid configuration"
    } else {
        "Failed to update playlist"
    };
    anyhow::Error::new(e).context(label)
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "m3u_regroup=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

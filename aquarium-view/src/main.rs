//! Application entry point for the aquarium viewer.
//!
//! This binary parses the command line, installs logging, loads the
//! configuration and hands everything interactive to [`Viewer`] from the
//! `viewer` module.

mod camera;
mod viewer;

use std::path::PathBuf;

use anyhow::Context as _;
use aquarium_core::Config;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use viewer::Viewer;

#[derive(Parser, Debug)]
#[command(version, about = "Interactive 3-D aquarium with steering fish")]
struct Args {
    /// TOML file with simulation parameters; missing keys keep defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the tank's random layout. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,
}

/// Loads the configuration named on the command line.
///
/// A file that cannot be read or parsed is reported and replaced by the
/// defaults, so a typo in a tuning file never keeps the tank from opening.
fn load_config(path: Option<&PathBuf>) -> Config {
    let Some(path) = path else {
        return Config::default();
    };
    match Config::load(path) {
        Ok(cfg) => {
            info!(path = %path.display(), "loaded configuration");
            cfg
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "falling back to default configuration");
            Config::default()
        }
    }
}

/// Starts the native eframe application.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if eframe fails to create the native window or event loop.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let cfg = load_config(args.config.as_ref());
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, "starting aquarium viewer");

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Aquarium",
        options,
        Box::new(move |_cc| Ok(Box::new(Viewer::new(cfg, seed)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
    .context("viewer window failed")
}

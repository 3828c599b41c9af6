//! kiln - a front-end asset pipeline: html/js mirroring, Sass, image
//! compression and derived formats, with a live-reloading dev server.

mod actor;
mod asset;
mod cli;
mod config;
mod core;
mod embed;
mod freshness;
mod image;
mod logger;
mod prune;
mod reload;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{KilnConfig, init_config};

fn main() -> Result<()> {
    // before anything blocks
    core::setup_shutdown_handler()?;

    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }
    logger::set_verbose(cli.verbose);

    let config = init_config(KilnConfig::load(cli)?);

    match cli.command() {
        Commands::Init { name } => cli::init::new_project(&config, name.is_some()),
        Commands::Build { no_clean } => {
            cli::build::build_site(&config, cli::build::BuildOptions::full(!no_clean))
        }
        Commands::Serve { .. } => cli::serve::run_serve(&config),
        Commands::Images => cli::build::run_images(&config.build, false, true).map(drop),
        Commands::Clean => cli::build::clean_dist(&config),
        Commands::CleanImages { keep } => cli::prune::clean_images(&config, &keep).map(drop),
        Commands::PruneImages => cli::prune::prune_images(&config).map(drop),
    }
}

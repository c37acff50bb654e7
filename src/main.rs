//! cmscy - render headless-CMS article widgets into html pages.

mod cli;
mod cms;
mod config;
mod logger;
mod markup;
mod page;
mod render;
mod serve;
mod utils;
mod widget;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use render::{render_site, render_widget};
use serve::serve_site;

fn main() -> Result<()> {
    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));
    let config: &'static Config = Box::leak(Box::new(load_config(cli)?));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    match &cli.command {
        Commands::Render {
            input,
            output,
            location,
            ..
        } => runtime.block_on(render_site(
            config,
            input,
            output.as_deref(),
            location.as_deref(),
        )),
        Commands::Widget {
            kind,
            name,
            location,
        } => {
            let html = runtime.block_on(render_widget(config, *kind, name, location))?;
            println!("{html}");
            Ok(())
        }
        Commands::Serve { .. } => serve_site(config, runtime.handle()),
    }
}

/// Load and validate configuration from CLI arguments.
///
/// A missing config file is not an error: every setting has a default and
/// the endpoint can come from the command line or from the pages themselves.
fn load_config(cli: &'static Cli) -> Result<Config> {
    let mut config = if cli.config.exists() {
        Config::from_path(&cli.config)?
    } else {
        Config::default()
    };
    config.update_with_cli(cli);
    config.validate()?;

    Ok(config)
}

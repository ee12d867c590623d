//! Inspect the maps bundled under a static root.
//!
//! Usage:
//!   map-catalog list
//!   map-catalog --locale fr-FR schema
//!   map-catalog --root /srv/static assets europe

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mapviz::{Config, Untranslated, VisualizationHost, VisualizationMeta, bootstrap, resolve_label};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "map-catalog")]
#[command(about = "List bundled maps, print the option schema, or resolve chart assets")]
struct Cli {
    /// Static asset root; discovered when omitted.
    #[arg(long)]
    root: Option<PathBuf>,
    /// Locale used for labels and locale assets.
    #[arg(long)]
    locale: Option<String>,
    /// Log registration and rebuild details.
    #[arg(short, long)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print each registered map id with its resolved label.
    List,
    /// Print the published visualization schema as JSON.
    Schema,
    /// Print the asset paths needed to render a map.
    Assets {
        /// Map id.
        map: String,
    },
}

// The CLI has no host registry; publications are only logged.
struct LogHost;

impl VisualizationHost for LogHost {
    fn publish(&self, meta: Arc<VisualizationMeta>) -> Result<()> {
        log::debug!(
            "published {} with {} option(s)",
            meta.id,
            meta.options.len()
        );
        Ok(())
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    simple_logger::init_with_level(if cli.verbose {
        log::Level::Debug
    } else {
        log::Level::Warn
    })
    .context("installing logger")?;

    let mut config = match cli.root {
        Some(root) => Config::for_root(root),
        None => Config::discover().context("locating static root")?,
    };
    if let Some(locale) = cli.locale {
        config = config.with_locale(locale);
    }

    let vis = bootstrap(&config, Arc::new(LogHost), Arc::new(Untranslated), &[]);

    match cli.command {
        Command::List => {
            for id in vis.catalog.list() {
                match vis.catalog.get(&id) {
                    Ok(definition) => {
                        println!("{id}\t{}", resolve_label(&definition, &config.locale))
                    }
                    Err(err) => eprintln!("{id}\t<{err}>"),
                }
            }
        }
        Command::Schema => {
            let schema = vis.gateway.schema();
            println!("{}", serde_json::to_string_pretty(schema.as_ref())?);
        }
        Command::Assets { map } => {
            let assets = vis
                .assets
                .resolve_assets(&map, &config.locale)
                .with_context(|| format!("resolving assets for {map}"))?;
            for path in assets.paths() {
                println!("{path}");
            }
        }
    }

    Ok(())
}

#![allow(clippy::print_stdout)]

mod renderer;
mod report;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use storefront_core::cart::FileStorage;
use storefront_core::{CartStore, Catalog, DepthEngine, StorefrontConfig, TierFilter};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "storefront", version, about = "Inspect the storefront catalog, depth scene and cart")]
struct Cli {
    /// JSON config overriding depth and cart defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// JSON product catalog replacing the bundled one.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Directory holding the persisted cart.
    #[arg(long, global = true, default_value = ".storefront")]
    data_dir: PathBuf,

    /// Print JSON view models instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List product cards.
    Catalog {
        /// all, signature or essentials.
        #[arg(long, default_value = "all")]
        tier: String,
        /// Page path to derive the tier from, e.g. collections.html.
        #[arg(long, conflicts_with = "tier")]
        page: Option<String>,
    },
    /// Show one product's detail page.
    Product { id: String },
    /// Evaluate the depth scene at one or more scroll offsets.
    Scroll {
        #[arg(long, default_value_t = 5)]
        layers: usize,
        #[arg(long, default_value_t = 900.0)]
        viewport: f64,
        #[arg(required = true, allow_negative_numbers = true)]
        offsets: Vec<f64>,
    },
    /// Interactive terminal preview of the depth scene.
    Preview {
        #[arg(long, default_value_t = 5)]
        layers: usize,
        #[arg(long, default_value_t = 900.0)]
        viewport: f64,
    },
    /// Inspect or change the persisted cart.
    Cart {
        #[command(subcommand)]
        action: Option<CartAction>,
    },
}

#[derive(Subcommand, Debug)]
enum CartAction {
    Show,
    Add {
        product_id: String,
        /// Defaults to the product's first variant.
        variant: Option<String>,
        #[arg(long, short, default_value_t = 1)]
        quantity: u32,
    },
    /// Increase the quantity of the line at INDEX by one.
    Inc { index: usize },
    /// Decrease the quantity of the line at INDEX by one.
    Dec { index: usize },
    Remove { index: usize },
    Clear,
}

fn load_config(cli: &Cli) -> Result<StorefrontConfig> {
    let Some(path) = &cli.config else {
        return Ok(StorefrontConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    StorefrontConfig::from_json(&text).with_context(|| format!("loading config {}", path.display()))
}

fn load_catalog(cli: &Cli) -> Result<Catalog> {
    match &cli.catalog {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading catalog {}", path.display()))?;
            Catalog::from_json(&text).with_context(|| format!("loading catalog {}", path.display()))
        }
        None => Ok(Catalog::builtin()?),
    }
}

fn emit<T: serde::Serialize>(json: bool, value: &T, text: impl FnOnce(&T) -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", text(value));
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match &cli.command {
        Command::Catalog { tier, page } => {
            let filter = match page {
                Some(path) => TierFilter::from_page_path(path),
                None => tier.parse()?,
            };
            let cards = load_catalog(&cli)?.cards(filter);
            emit(cli.json, &cards, |c| report::cards(c))?;
        }
        Command::Product { id } => {
            let catalog = load_catalog(&cli)?;
            let Some(detail) = catalog.detail(id) else {
                bail!("unknown product `{id}`");
            };
            emit(cli.json, &detail, report::detail)?;
        }
        Command::Scroll {
            layers,
            viewport,
            offsets,
        } => {
            let mut engine = DepthEngine::new(config.depth)?;
            let track = engine.initialize(*layers, *viewport);
            if !cli.json {
                println!("track length {track:.0}");
            }
            for offset in offsets {
                emit(cli.json, &engine.on_scroll(*offset), report::depth_frame)?;
            }
        }
        Command::Preview { layers, viewport } => {
            let mut engine = DepthEngine::new(config.depth)?;
            engine.initialize(*layers, *viewport);
            renderer::render_preview(&engine, *viewport)?;
        }
        Command::Cart { action } => {
            let catalog = load_catalog(&cli)?;
            let mut cart = CartStore::new(FileStorage::new(&cli.data_dir), config.cart)?;
            let update = match action.as_ref().unwrap_or(&CartAction::Show) {
                CartAction::Show => None,
                CartAction::Add {
                    product_id,
                    variant,
                    quantity,
                } => {
                    let variant = match variant {
                        Some(v) => v.clone(),
                        None => catalog
                            .detail(product_id)
                            .and_then(|d| d.default_variant)
                            .with_context(|| {
                                format!("no variant given and `{product_id}` has no default")
                            })?,
                    };
                    Some(cart.add(product_id, &variant, *quantity)?)
                }
                CartAction::Inc { index } => Some(cart.update_quantity(*index, 1)?),
                CartAction::Dec { index } => Some(cart.update_quantity(*index, -1)?),
                CartAction::Remove { index } => Some(cart.remove(*index)?),
                CartAction::Clear => Some(cart.clear()),
            };
            if let Some(update) = &update
                && !cli.json
            {
                print!("{}", report::update(update));
            }
            emit(cli.json, &cart.summary(&catalog), report::cart)?;
        }
    }

    Ok(())
}

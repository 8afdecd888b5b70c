//! The Pace Note CLI - drive the shopping cart from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Add two medium hoodies
//! pn-cart add --id p1 --name Hoodie --price 249 --image /img/hoodie.png --size M -q 2
//!
//! # Add a product exported from the catalog
//! pn-cart add-product hoodie.json --size M
//!
//! # Adjust quantities
//! pn-cart set p1-M 3
//! pn-cart dec p1-M
//!
//! # Show the drawer summary
//! pn-cart show
//! ```
//!
//! # Commands
//!
//! - `add` / `add-product` - Add items
//! - `remove`, `set`, `inc`, `dec` - Edit lines
//! - `clear` - Empty the cart
//! - `show` - Print the cart (text or `--json`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::num::NonZeroU32;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use pace_note_core::LineId;
use pace_note_storefront::{CartConfig, CartStore};
use rust_decimal::Decimal;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "pn-cart")]
#[command(author, version, about = "The Pace Note shopping cart")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a product to the cart
    Add {
        /// Product ID
        #[arg(long)]
        id: String,

        /// Product name
        #[arg(long)]
        name: String,

        /// Unit price
        #[arg(long)]
        price: Decimal,

        /// Image URL (repeatable; the first one is shown)
        #[arg(long = "image")]
        images: Vec<String>,

        /// Size code
        #[arg(short, long)]
        size: Option<String>,

        /// Number of items to add
        #[arg(short, long, default_value = "1")]
        quantity: NonZeroU32,
    },
    /// Add a product from a catalog record (JSON file, `-` for stdin)
    AddProduct {
        /// Path to the catalog record
        file: PathBuf,

        /// Size code
        #[arg(short, long)]
        size: Option<String>,

        /// Number of items to add
        #[arg(short, long, default_value = "1")]
        quantity: NonZeroU32,
    },
    /// Remove a line from the cart
    Remove {
        /// Line ID (e.g. `p1-M`)
        line_id: String,
    },
    /// Set a line's quantity (zero or less removes it)
    Set {
        /// Line ID (e.g. `p1-M`)
        line_id: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Add one to a line's quantity
    Inc {
        /// Line ID (e.g. `p1-M`)
        line_id: String,
    },
    /// Take one from a line's quantity
    Dec {
        /// Line ID (e.g. `p1-M`)
        line_id: String,
    },
    /// Empty the cart
    Clear,
    /// Print the cart
    Show {
        /// Print the cart view as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &CartConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration first (needed for Sentry init)
    let config = CartConfig::from_env();

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pace_note=info,pn_cart=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result = config
        .map_err(Into::into)
        .and_then(|config| run(cli, &config));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, config: &CartConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut cart = CartStore::initialize(config.file_store(), config.cart_key.as_str());
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Add {
            id,
            name,
            price,
            images,
            size,
            quantity,
        } => {
            let product = pace_note_core::ProductSnapshot::new(id, name, price).with_images(images);
            commands::cart::add(&mut cart, &product, size.as_deref(), quantity, &mut out)?;
        }
        Commands::AddProduct {
            file,
            size,
            quantity,
        } => {
            let product = commands::cart::read_catalog_product(&file)?;
            let snapshot = commands::cart::checked_snapshot(&product, size.as_deref())?;
            commands::cart::add(&mut cart, &snapshot, size.as_deref(), quantity, &mut out)?;
        }
        Commands::Remove { line_id } => cart.remove_from_cart(&LineId::new(line_id)),
        Commands::Set { line_id, quantity } => {
            cart.update_quantity(&LineId::new(line_id), quantity);
        }
        Commands::Inc { line_id } => cart.increment(&LineId::new(line_id)),
        Commands::Dec { line_id } => cart.decrement(&LineId::new(line_id)),
        Commands::Clear => cart.clear_cart(),
        Commands::Show { json } => {
            commands::cart::show(&cart, config.currency, json, &mut out)?;
        }
    }

    if !cart.is_durable() {
        tracing::warn!(key = cart.key(), "Cart changes were not saved and will be lost");
    }
    cart.teardown();

    Ok(())
}

//! Boutique CLI - Terminal storefront.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! boutique products
//! boutique products --category electronics --search casque
//! boutique products --sort price-asc
//!
//! # Manage the cart
//! boutique cart add 3
//! boutique cart adjust 3 -1
//! boutique cart show
//! boutique cart checkout
//! ```
//!
//! # Commands
//!
//! - `products` - List the catalog through the category/search/sort pipeline
//! - `cart` - Show or change the persisted cart
//!
//! The cart is stored in the file named by `BOUTIQUE_STORE_PATH`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "boutique")]
#[command(author, version, about = "Boutique terminal storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog products
    Products {
        /// Category code (`all`, `electronics`, `clothing`, `books`, `home`)
        #[arg(short, long, default_value = "all")]
        category: String,

        /// Keep products whose name or description contains this text
        #[arg(short, long, default_value = "")]
        search: String,

        /// Sort order (`default`, `price-asc`, `price-desc`, `name`)
        #[arg(long, default_value = "default")]
        sort: String,
    },
    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and total
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        id: boutique_core::ProductId,
    },
    /// Remove a product line
    Remove {
        /// Product ID
        id: boutique_core::ProductId,
    },
    /// Change a line's quantity by a signed amount
    Adjust {
        /// Product ID
        id: boutique_core::ProductId,

        /// Quantity change, e.g. 1 or -1
        #[arg(allow_negative_numbers = true)]
        delta: i32,
    },
    /// Empty the cart
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Place the order and empty the cart
    Checkout,
}

fn main() {
    // Logs go to stderr so rendered output stays clean on stdout.
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "boutique_storefront=warn,boutique_cli=info".into());

    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = commands::open_session()?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Products {
            category,
            search,
            sort,
        } => commands::products::list(&mut session, &category, search, &sort, &mut out)?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&session, &mut out)?,
            CartAction::Add { id } => commands::cart::add(&mut session, id, &mut out)?,
            CartAction::Remove { id } => commands::cart::remove(&mut session, id, &mut out)?,
            CartAction::Adjust { id, delta } => {
                commands::cart::adjust(&mut session, id, delta, &mut out)?;
            }
            CartAction::Clear { yes } => commands::cart::clear(&mut session, yes, &mut out)?,
            CartAction::Checkout => commands::cart::checkout(&mut session, &mut out)?,
        },
    }

    commands::close_session(session, &mut out)?;
    Ok(())
}

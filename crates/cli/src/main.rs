//! QuickCart CLI - terminal storefront.
//!
//! # Usage
//!
//! ```bash
//! # Interactive shell (default)
//! quickcart
//! quickcart shell --api-base http://localhost:5000/api
//!
//! # List products once
//! quickcart products --search choc
//!
//! # Past orders of the saved session
//! quickcart orders
//! quickcart orders --id 12
//! ```
//!
//! # Commands
//!
//! - `shell` - Interactive shell over the storefront controller
//! - `products` - Print the catalog and exit
//! - `orders` - Print order history and exit
//!
//! Logs go to stderr (`RUST_LOG` controls the level) so they never mix with
//! shell output.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use quickcart_storefront::{
    FileTokenStore, HttpGateway, Storefront, StorefrontConfig, StorefrontError,
};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod terminal;

use terminal::TerminalFrontend;

#[derive(Parser)]
#[command(name = "quickcart")]
#[command(author, version, about = "QuickCart storefront in the terminal")]
struct Cli {
    /// Base URL of the QuickCart API (overrides `QUICKCART_API_BASE`)
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// File the session token is saved to (overrides `QUICKCART_TOKEN_PATH`)
    #[arg(long, global = true)]
    token_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive shell
    Shell,
    /// Print the product list
    Products {
        /// Only products whose name, description or category contains this
        #[arg(short, long)]
        search: Option<String>,

        /// Only products in this exact category
        #[arg(short, long, conflicts_with = "search")]
        category: Option<String>,
    },
    /// Print past orders (requires a saved session)
    Orders {
        /// Show a single order
        #[arg(long)]
        id: Option<i32>,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Load configuration from environment (needed for Sentry init)
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "quickcart_storefront=warn,quickcart_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, config).await;

    if let Err(e) = result {
        if let Some(err) = e.downcast_ref::<StorefrontError>() {
            err.capture();
        }
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    let config = apply_overrides(config, cli.api_base.as_deref(), cli.token_path)?;
    tracing::debug!(api_base = %config.api_base, "Using QuickCart API");

    let gateway = HttpGateway::new(&config)?;
    let store = Box::new(FileTokenStore::new(config.token_path.clone()));
    let mut storefront = Storefront::new(config, gateway, TerminalFrontend::stdout(), store);

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => commands::shell::run(&mut storefront).await?,
        Commands::Products { search, category } => {
            commands::products::list(&mut storefront, search.as_deref(), category.as_deref())
                .await?;
        }
        Commands::Orders { id } => commands::orders::show(&mut storefront, id).await?,
    }
    Ok(())
}

/// Apply command-line overrides on top of the environment configuration.
fn apply_overrides(
    config: StorefrontConfig,
    api_base: Option<&str>,
    token_path: Option<PathBuf>,
) -> Result<StorefrontConfig, quickcart_storefront::config::ConfigError> {
    let config = match api_base {
        Some(base) => config.with_api_base(base)?,
        None => config,
    };
    Ok(match token_path {
        Some(path) => config.with_token_path(path),
        None => config,
    })
}

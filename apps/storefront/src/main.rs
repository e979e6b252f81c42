//! Storefront - interactive product catalog browser

use clap::Parser;
use core_config::http::HttpClientConfig;
use core_config::tracing::{init_tracing_with, install_color_eyre};
use domain_products::{FavouriteService, HttpProductRepository, LoadingService, ProductService};
use std::sync::Arc;
use storefront::{Command, Config, Outcome, Storefront};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "storefront")]
#[command(about = "Browse, filter and favourite products from the catalog")]
struct Cli {
    /// Catalog collection URL (overrides CATALOG_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Products per page (overrides STOREFRONT_PAGE_SIZE)
    #[arg(long)]
    page_size: Option<usize>,

    /// Log filter directive, e.g. "debug" or "storefront=trace" (overrides RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    init_tracing_with(&config.environment, cli.log_level.as_deref());

    if let Some(api_url) = cli.api_url {
        config.catalog.http =
            HttpClientConfig::new(api_url).with_timeout(config.catalog.http.timeout);
    }
    if let Some(page_size) = cli.page_size {
        config.view = config.view.with_page_size(page_size)?;
    }

    info!(
        "Loading catalog from {} ({} products per page)",
        config.catalog.http.base_url, config.view.page_size
    );

    let repository = HttpProductRepository::new(&config.catalog.http)?;
    let service = Arc::new(ProductService::new(
        repository,
        LoadingService::new(),
        &config.catalog,
    ));
    let favourites = Arc::new(FavouriteService::new(config.favourites));
    let mut storefront = Storefront::new(service, favourites, config.view);

    run(&mut storefront).await?;

    info!("Storefront closed");
    Ok(())
}

/// Read commands from stdin and redraw on view, favourites and loading changes.
async fn run(storefront: &mut Storefront<HttpProductRepository>) -> eyre::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print!("{}", storefront.render());

    loop {
        // Subscriptions belong to the current view and are renewed after a rebuild.
        let mut state = storefront.view().subscribe();
        let mut favourite = storefront.view().favourite_added();
        let mut loading = storefront.view().subscribe_loading();
        let generation = storefront.generation();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        return Ok(());
                    };
                    if line.trim().is_empty() {
                        print!("{}", storefront.render());
                        continue;
                    }

                    match line.parse::<Command>() {
                        Ok(command) => match storefront.handle(command) {
                            Outcome::Quit => return Ok(()),
                            Outcome::Message(message) => println!("{}", message),
                            Outcome::Render => {}
                        },
                        Err(e) => {
                            warn!("{}", e);
                            println!("{}", e);
                        }
                    }
                    print!("{}", storefront.render());

                    if storefront.generation() != generation {
                        break;
                    }
                }
                Ok(()) = state.changed() => print!("{}", storefront.render()),
                Ok(()) = favourite.changed() => print!("{}", storefront.render()),
                Ok(()) = loading.changed() => print!("{}", storefront.render()),
                _ = tokio::signal::ctrl_c() => {
                    info!("Received Ctrl+C, shutting down");
                    return Ok(());
                }
            }
        }
    }
}

use std::{io, path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{resolve, AnsStore, HttpAnsApi, Route};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod views;

use config::load_settings;

#[derive(Parser, Debug)]
#[command(name = "ans", about = "Browse ANS health-plan operators")]
struct Args {
    /// Backend base url, e.g. http://localhost:8000/api
    #[arg(long, global = true)]
    api_base_url: Option<String>,
    /// Config file (defaults to ./ans.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List operators, one page at a time
    List {
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Show aggregate statistics
    Stats,
    /// Open a view by path: `/` or `/<cnpj>`
    Open { path: String },
    /// Print the navigation table
    Routes,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(api_base_url) = args.api_base_url {
        settings.api_base_url = api_base_url;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .with_writer(io::stderr)
        .init();

    let mut out = io::stdout().lock();
    match args.command {
        Command::Routes => views::render_routes(&mut out)?,
        Command::List { page, search } => {
            let store = build_store(&settings.api_base_url)?;
            store.fetch_records(page, &search).await;
            let state = store.snapshot().await;
            views::render_listing(&state, &mut out)?;
            if let Some(error) = state.error {
                bail!(error);
            }
        }
        Command::Stats => {
            let store = build_store(&settings.api_base_url)?;
            store.fetch_statistics().await;
            let state = store.snapshot().await;
            views::render_statistics(&state, &mut out)?;
            if state.statistics.is_none() {
                bail!("statistics unavailable");
            }
        }
        Command::Open { path } => {
            let route = resolve(&path)?;
            let store = build_store(&settings.api_base_url)?;
            info!(route = route.name(), path = %route.path(), "opening view");
            match route {
                Route::Listing => {
                    tokio::join!(store.fetch_first_page(), store.fetch_statistics());
                    let state = store.snapshot().await;
                    views::render_listing(&state, &mut out)?;
                    views::render_statistics(&state, &mut out)?;
                    if let Some(error) = state.error {
                        bail!(error);
                    }
                }
                Route::Detail(props) => {
                    tokio::join!(
                        store.fetch_operator(&props.identifier),
                        store.fetch_expenses(&props.identifier)
                    );
                    let state = store.snapshot().await;
                    views::render_detail(&props, &state, &mut out)?;
                    if let Some(error) = state.detail.error {
                        bail!(error);
                    }
                }
            }
        }
    }

    Ok(())
}

fn build_store(api_base_url: &str) -> Result<Arc<AnsStore>> {
    let api = HttpAnsApi::new(api_base_url).context("invalid backend configuration")?;
    info!(api_base_url = api.base_url(), "using backend");
    Ok(AnsStore::new(Arc::new(api)))
}

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use pluto_dl::batch;
use pluto_dl::download::Downloader;
use pluto_dl::layout::OutputLayout;
use pluto_dl::pluto::Endpoints;
use pluto_dl::{Pluto, PlutoError};
use std::process::exit;
use std::time::Duration;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("warn,pluto_dl=debug")
        } else {
            EnvFilter::new("warn,pluto_dl=info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let downloader = Downloader::default().working_dir(&cli.working_dir);
    if let Err(e) = downloader.check_tools() {
        error!("{}", e);
        exit(1)
    }

    let item_id = resolve_item_id(&cli.item_id);
    debug!("Resolved item id {}", item_id);

    let pluto = exit_on_connection_error(
        Pluto::builder()
            .endpoints(endpoints(&cli))
            .channel_id(&cli.channel_id)
            .series_id(&item_id)
            .login(&cli.client_id)
            .await,
    )
    .await?;

    let item = exit_on_connection_error(pluto.item(&item_id).await).await?;
    let layout = OutputLayout::new(&cli.output_dir);

    exit_on_connection_error(
        batch::download_item(&item, &layout, &downloader, cli.season).await,
    )
    .await?;

    Ok(())
}

fn endpoints(cli: &Cli) -> Endpoints {
    let mut endpoints = Endpoints::default();
    if let Some(boot) = &cli.boot_endpoint {
        endpoints.boot = boot.clone()
    }
    if let Some(vod) = &cli.vod_endpoint {
        endpoints.vod = vod.clone()
    }
    if let Some(stitcher) = &cli.stitcher_endpoint {
        endpoints.stitcher = stitcher.clone()
    }
    endpoints
}

#[cfg(feature = "parse")]
fn resolve_item_id(input: &str) -> String {
    pluto_dl::parse::parse_url(input).map_or_else(|| input.to_string(), |url| url.id().to_string())
}

#[cfg(not(feature = "parse"))]
fn resolve_item_id(input: &str) -> String {
    input.to_string()
}

/// A connection error ends the program with exit code 0, every other error is passed on.
async fn exit_on_connection_error<T>(result: pluto_dl::Result<T>) -> Result<T> {
    match result {
        Err(PlutoError::Connection(context)) => {
            error!("Pluto Says: Connection error, {}", context);
            tokio::time::sleep(Duration::from_millis(800)).await;
            exit(0)
        }
        result => Ok(result?),
    }
}

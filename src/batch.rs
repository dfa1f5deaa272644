//! Download whole catalog items: a movie or every episode of a series.

use crate::download::{DownloadStatus, Downloader};
use crate::error::PlutoError;
use crate::layout::{self, OutputLayout};
use crate::stream::VariantData;
use crate::{Item, ItemType, Result};
use std::path::Path;
use tracing::{debug, info, warn};

/// What happened to the movies or episodes of a batch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    /// The downloader finished successfully.
    pub completed: usize,
    /// The downloader exited with an error.
    pub failed: usize,
    /// No usable stream was found, the downloader never ran.
    pub skipped: usize,
}

impl DownloadSummary {
    pub fn total(&self) -> usize {
        self.completed + self.failed + self.skipped
    }

    fn record(&mut self, status: DownloadStatus) {
        match status {
            DownloadStatus::Completed => self.completed += 1,
            DownloadStatus::Failed(_) => self.failed += 1,
        }
    }
}

/// Download `item` into `layout`. Series are downloaded episode by episode, restricted to
/// `only_season` if set. Unknown item types are an input error.
pub async fn download_item(
    item: &Item,
    layout: &OutputLayout,
    downloader: &Downloader,
    only_season: Option<u32>,
) -> Result<DownloadSummary> {
    match &item.item_type {
        ItemType::Series => download_series(item, layout, downloader, only_season).await,
        ItemType::Movie => download_movie(item, layout, downloader).await,
        ItemType::Custom(item_type) => Err(PlutoError::Input(
            format!("Unknown item type '{}'", item_type).into(),
        )),
    }
}

/// Download every episode of the series `item`. Episodes without a usable stream and failing
/// downloads are skipped, every other error aborts the batch.
pub async fn download_series(
    item: &Item,
    layout: &OutputLayout,
    downloader: &Downloader,
    only_season: Option<u32>,
) -> Result<DownloadSummary> {
    info!("Fetching series info...");
    let series = item.series().await?;
    info!(
        "Found {} seasons for series '{}'",
        series.seasons.len(),
        series.name
    );

    let mut summary = DownloadSummary::default();
    if let Some(number) = only_season {
        if series.season(number).is_none() {
            warn!("Series '{}' has no season {}", series.name, number);
            return Ok(summary);
        }
    }

    for season in series.seasons.iter() {
        if only_season.map_or(false, |number| number != season.number) {
            continue;
        }
        let season_dir = layout.season_dir(&series.slug, season.number).await?;

        for (i, episode) in season.episodes.iter().enumerate() {
            info!(
                "Processing episode {} ({}/{})",
                episode.name,
                i + 1,
                season.episodes.len()
            );
            let file_name = layout::episode_file_name(
                &series.name,
                season.number,
                episode.number,
                &episode.name,
            );
            info!("{}", file_name);

            download_best(
                episode.best_variant().await,
                &file_name,
                &season_dir,
                downloader,
                &mut summary,
            )
            .await?;
        }
    }

    info!(
        "{} of {} episodes downloaded",
        summary.completed,
        summary.total()
    );
    Ok(summary)
}

pub async fn download_movie(
    item: &Item,
    layout: &OutputLayout,
    downloader: &Downloader,
) -> Result<DownloadSummary> {
    let movie_dir = layout.movie_dir().await?;
    let file_name = layout::movie_file_name(&item.name);
    info!("{}", file_name);

    let mut summary = DownloadSummary::default();
    download_best(
        item.best_variant().await,
        &file_name,
        &movie_dir,
        downloader,
        &mut summary,
    )
    .await?;

    Ok(summary)
}

async fn download_best(
    best_variant: Result<Option<VariantData>>,
    file_name: &str,
    target_dir: &Path,
    downloader: &Downloader,
    summary: &mut DownloadSummary,
) -> Result<()> {
    let variant = match best_variant {
        Ok(Some(variant)) => variant,
        Ok(None) => {
            warn!("No suitable best playlist found, skipping.");
            summary.skipped += 1;
            return Ok(());
        }
        Err(PlutoError::Input(context)) => {
            warn!("{}, skipping.", context);
            summary.skipped += 1;
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    debug!(
        "Selected variant with bandwidth {} ({})",
        variant.bandwidth, variant.url
    );
    let playlist = variant.ad_free_playlist().await?;
    summary.record(downloader.download(&playlist, file_name, target_dir).await?);

    Ok(())
}

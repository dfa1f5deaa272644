use crate::common::Request;
use crate::media::Stitched;
use crate::{Executor, Pluto, Result};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

/// A series with all of its seasons.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Series {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub slug: String,
    pub summary: Option<String>,

    pub seasons: Vec<Season>,
}

impl Request for Series {
    fn __set_executor(&mut self, executor: Arc<Executor>) {
        for season in self.seasons.iter_mut() {
            season.__set_executor(executor.clone())
        }
    }
}

impl Series {
    pub async fn from_id<S: AsRef<str>>(pluto: &Pluto, id: S) -> Result<Series> {
        Series::from_executor(&pluto.executor, id.as_ref()).await
    }

    pub(crate) async fn from_executor(executor: &Arc<Executor>, id: &str) -> Result<Series> {
        info!("Fetching seasons...");
        let endpoint = executor.vod_url(&format!("/v4/vod/series/{}/seasons", id));
        let series: Series = executor
            .get(endpoint)
            .query(&[("offset", "1000"), ("page", "1")])
            .request()
            .await?;
        info!("Seasons received");

        Ok(series)
    }

    /// Get the season with the given season number.
    pub fn season(&self, number: u32) -> Option<&Season> {
        self.seasons.iter().find(|season| season.number == number)
    }

    /// Number of episodes over all seasons.
    pub fn episode_count(&self) -> usize {
        self.seasons.iter().map(|season| season.episodes.len()).sum()
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Season {
    pub number: u32,
    pub episodes: Vec<Episode>,
}

impl Request for Season {
    fn __set_executor(&mut self, executor: Arc<Executor>) {
        for episode in self.episodes.iter_mut() {
            episode.__set_executor(executor.clone())
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Episode {
    #[serde(skip)]
    pub(crate) executor: Arc<Executor>,

    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub number: u32,
    /// Number of the season the episode belongs to.
    pub season: u32,
    pub summary: Option<String>,

    pub stitched: Stitched,
}

impl Request for Episode {
    fn __set_executor(&mut self, executor: Arc<Executor>) {
        self.executor = executor;
    }
}

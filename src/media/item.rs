use crate::common::Request;
use crate::error::PlutoError;
use crate::media::{Series, Stitched};
use crate::{enum_values, Executor, Pluto, Result};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

enum_values! {
    /// Kind of a catalog [`Item`].
    #[derive(Clone, Debug, Hash, Eq, PartialEq)]
    pub enum ItemType {
        Movie = "movie"
        Series = "series"
    }
}

/// A catalog entry, either a movie or a series.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Item {
    #[serde(skip)]
    pub(crate) executor: Arc<Executor>,

    #[serde(rename = "_id")]
    pub id: String,
    pub slug: String,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub summary: Option<String>,

    /// Only set for movies, episodes of a series carry their own.
    pub stitched: Stitched,
}

impl Request for Item {
    fn __set_executor(&mut self, executor: Arc<Executor>) {
        self.executor = executor;
    }
}

impl Item {
    pub async fn from_id<S: AsRef<str>>(pluto: &Pluto, id: S) -> Result<Item> {
        info!("Fetching items...");
        let endpoint = pluto.executor.vod_url("/v4/vod/items");
        let items: Vec<Item> = pluto
            .executor
            .get(endpoint)
            .query(&[("ids", id.as_ref())])
            .request()
            .await?;
        info!("Items received");

        items.into_iter().next().ok_or_else(|| {
            PlutoError::Input(format!("no item with id '{}' found", id.as_ref()).into())
        })
    }

    pub fn is_series(&self) -> bool {
        self.item_type == ItemType::Series
    }

    pub fn is_movie(&self) -> bool {
        self.item_type == ItemType::Movie
    }

    /// Fetch the seasons and episodes of this item. Fails if the item is not a series.
    pub async fn series(&self) -> Result<Series> {
        if !self.is_series() {
            return Err(PlutoError::Input(
                format!("'{}' is a {}, not a series", self.name, self.item_type).into(),
            ));
        }
        Series::from_executor(&self.executor, &self.id).await
    }
}

impl Pluto {
    /// Look up a movie or series by its id.
    pub async fn item<S: AsRef<str>>(&self, id: S) -> Result<Item> {
        Item::from_id(self, id).await
    }
}

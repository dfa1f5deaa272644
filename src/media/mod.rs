//! Catalog entries. A lookup always starts with an [`Item`] which is either a movie or a
//! [`Series`] with its seasons and episodes.

mod item;
mod series;

pub use item::*;
pub use series::*;

use crate::error::PlutoError;
use crate::stream::VariantData;
use crate::Result;
use serde::Deserialize;

/// A single entry of [`Stitched::paths`].
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct StitchedPath {
    #[serde(rename = "type")]
    pub path_type: String,
    pub path: String,
}

/// Paths to the stitcher playlists of a movie or episode. A path alone is useless, it must be
/// combined with the session stitcher parameters first ([`crate::Pluto::stitcher_url`]).
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Stitched {
    pub path: Option<String>,
    pub paths: Vec<StitchedPath>,
}

impl Stitched {
    /// Path of the HLS master playlist. Falls back to the first `hls` entry in [`Stitched::paths`]
    /// if [`Stitched::path`] is not set.
    pub fn hls_path(&self) -> Option<&str> {
        self.path
            .as_deref()
            .filter(|path| !path.is_empty())
            .or_else(|| {
                self.paths
                    .iter()
                    .find(|path| path.path_type == "hls")
                    .map(|path| path.path.as_str())
            })
    }
}

macro_rules! impl_stitched {
    ($($media:ident)*) => {
        $(
            impl $media {
                /// Full url of the stitched HLS master playlist, including the stitcher parameters
                /// of the current session.
                pub fn stitched_url(&self) -> Result<String> {
                    let path = self.stitched.hls_path().ok_or_else(|| {
                        PlutoError::Input(format!("'{}' has no stitched HLS playlist", self.name).into())
                    })?;
                    Ok(self.executor.stitcher_url(path))
                }

                /// All variants of the stitched master playlist, I-frame only streams excluded.
                pub async fn variants(&self) -> Result<Vec<VariantData>> {
                    VariantData::from_hls_master(self.executor.clone(), self.stitched_url()?).await
                }

                /// Returns the variant with the highest bandwidth of the stitched master playlist or
                /// [`None`] if the master playlist lists no usable variant.
                pub async fn best_variant(&self) -> Result<Option<VariantData>> {
                    VariantData::best_from_hls_master(self.executor.clone(), self.stitched_url()?).await
                }
            }
        )*
    }
}

impl_stitched! {
    Item Episode
}

//! # pluto-dl
//!
//! Library and command line tool to download on-demand movies and series from
//! [Pluto TV](https://pluto.tv/) without the ads the platform stitches into its streams.
//!
//! A download always goes through the same steps:
//! - Boot a session with [`PlutoBuilder::login`]. This hands out the session token and the
//!   stitcher parameters which are required to request playlists.
//! - Look up the catalog [`Item`] and, if it is a series, its [`Series::seasons`].
//! - Pick the variant with the highest bandwidth from the stitched master playlist
//!   ([`Item::best_variant`] / [`Episode::best_variant`]).
//! - Remove the ad segments from the variant playlist
//!   ([`stream::VariantData::ad_free_playlist`]).
//! - Hand the cleaned playlist to the external downloader ([`download::Downloader`]).
//!
//! Playlist parsing is done by [m3u8-rs](https://crates.io/crates/m3u8-rs), the media itself is
//! downloaded by [yt-dlp](https://github.com/yt-dlp/yt-dlp) with
//! [aria2](https://aria2.github.io/) as external downloader, both must be installed.

pub mod batch;
pub mod download;
pub mod error;
pub mod layout;
pub mod media;
#[cfg(feature = "parse")]
pub mod parse;
pub mod pluto;
pub mod stream;

// internal
mod common;
mod macros;

// internal
pub(crate) use common::Request;
pub(crate) use macros::enum_values;
pub(crate) use pluto::Executor;

pub use error::{PlutoError, Result};
pub use media::{Episode, Item, ItemType, Season, Series};
pub use pluto::{Pluto, PlutoBuilder};

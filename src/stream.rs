//! HLS handling. Picks the best variant out of a stitched master playlist and removes the ads the
//! stitcher inserted into the variant media playlist.

use crate::error::{PlutoError, PlutoErrorContext};
use crate::{Executor, Result};
use m3u8_rs::{MasterPlaylist, MediaPlaylist, MediaSegment, VariantStream};
use reqwest::Url;
use std::sync::Arc;
use tracing::debug;

/// Segment uri fragments which identify a segment as inserted ad.
pub const AD_MARKERS: [&str; 2] = ["prd/creative/", "_ad"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub width: u64,
    pub height: u64,
}

impl From<m3u8_rs::Resolution> for Resolution {
    fn from(resolution: m3u8_rs::Resolution) -> Self {
        Self {
            height: resolution.height,
            width: resolution.width,
        }
    }
}

/// A variant stream of a master playlist.
#[derive(Clone, Debug)]
pub struct VariantData {
    executor: Arc<Executor>,

    pub resolution: Option<Resolution>,
    pub bandwidth: u64,
    pub codecs: Option<String>,

    /// Absolute url of the variant media playlist.
    pub url: String,
}

impl VariantData {
    /// All variants of the master playlist behind `url`, without I-frame only streams.
    pub(crate) async fn from_hls_master(
        executor: Arc<Executor>,
        url: String,
    ) -> Result<Vec<VariantData>> {
        let master_playlist = fetch_master_playlist(&executor, &url).await?;

        master_playlist
            .variants
            .into_iter()
            .filter(|variant| !variant.is_i_frame)
            .map(|variant| VariantData::from_variant(executor.clone(), &url, variant))
            .collect()
    }

    pub(crate) async fn best_from_hls_master(
        executor: Arc<Executor>,
        url: String,
    ) -> Result<Option<VariantData>> {
        let master_playlist = fetch_master_playlist(&executor, &url).await?;

        select_best_variant(&master_playlist.variants)
            .map(|variant| VariantData::from_variant(executor.clone(), &url, variant.clone()))
            .transpose()
    }

    fn from_variant(
        executor: Arc<Executor>,
        master_url: &str,
        variant: VariantStream,
    ) -> Result<VariantData> {
        Ok(Self {
            url: resolve_uri(master_url, &variant.uri)?,
            resolution: variant.resolution.map(Resolution::from),
            bandwidth: variant.bandwidth,
            codecs: variant.codecs,
            executor,
        })
    }

    /// Load the media playlist of this variant. All uris in the returned playlist are absolute.
    pub async fn playlist(&self) -> Result<MediaPlaylist> {
        let mut playlist = self.fetch_playlist().await?;
        absolutize_uris(&mut playlist, &self.url)?;
        Ok(playlist)
    }

    /// Load the media playlist of this variant and remove all ad segments from it. All uris in the
    /// returned playlist are absolute, so it can be read from anywhere (e.g. a local file).
    pub async fn ad_free_playlist(&self) -> Result<MediaPlaylist> {
        let mut playlist = self.fetch_playlist().await?;

        // markers are matched against the uris as the stitcher delivers them
        let removed = strip_ads(&mut playlist);
        debug!(
            "Removed {} ad segments, {} segments left",
            removed,
            playlist.segments.len()
        );

        absolutize_uris(&mut playlist, &self.url)?;
        Ok(playlist)
    }

    async fn fetch_playlist(&self) -> Result<MediaPlaylist> {
        debug!("Loading media playlist {}", self.url);
        let raw = self.executor.get(self.url.as_str()).request_raw().await?;
        parse_media_playlist(&raw).map_err(|e| e.with_url(&self.url))
    }
}

async fn fetch_master_playlist(executor: &Arc<Executor>, url: &str) -> Result<MasterPlaylist> {
    debug!("Loading master playlist {}", url);
    let raw = executor.get(url).request_raw().await?;
    parse_master_playlist(&raw).map_err(|e| e.with_url(url))
}

pub fn parse_master_playlist(raw: &[u8]) -> Result<MasterPlaylist> {
    m3u8_rs::parse_master_playlist_res(raw)
        .map_err(|e| PlutoError::Decode(PlutoErrorContext::new(e.to_string())))
}

pub fn parse_media_playlist(raw: &[u8]) -> Result<MediaPlaylist> {
    m3u8_rs::parse_media_playlist_res(raw)
        .map_err(|e| PlutoError::Decode(PlutoErrorContext::new(e.to_string())))
}

/// Return the variant with the highest bandwidth. I-frame only streams are never selected, on
/// equal bandwidth the first listed variant wins.
pub fn select_best_variant(variants: &[VariantStream]) -> Option<&VariantStream> {
    variants
        .iter()
        .rev()
        .filter(|variant| !variant.is_i_frame)
        .max_by_key(|variant| variant.bandwidth)
}

/// Resolve a playlist uri against the url of the playlist it was found in. Absolute uris are
/// returned unchanged.
pub fn resolve_uri(base: &str, uri: &str) -> Result<String> {
    let base_url = Url::parse(base)
        .map_err(|e| PlutoError::Input(PlutoErrorContext::new(e.to_string()).with_url(base)))?;
    base_url
        .join(uri)
        .map(|url| url.to_string())
        .map_err(|e| {
            PlutoError::Decode(
                PlutoErrorContext::new(format!("invalid playlist uri '{}': {}", uri, e))
                    .with_url(base),
            )
        })
}

pub fn is_ad_segment(segment: &MediaSegment) -> bool {
    AD_MARKERS
        .iter()
        .any(|marker| segment.uri.contains(marker))
}

/// Remove all ad segments from the playlist. Returns how many segments were removed.
///
/// A key, map or discontinuity tag is only attached to the first segment it applies to. If that
/// segment is an ad, the tag is moved to the next remaining segment, unless that segment carries
/// its own.
pub fn strip_ads(playlist: &mut MediaPlaylist) -> usize {
    let before = playlist.segments.len();

    let mut key = None;
    let mut map = None;
    let mut discontinuity = false;
    for mut segment in std::mem::take(&mut playlist.segments) {
        if is_ad_segment(&segment) {
            key = segment.key.take().or(key);
            map = segment.map.take().or(map);
            discontinuity |= segment.discontinuity;
            continue;
        }

        if segment.key.is_none() {
            segment.key = key.take();
        } else {
            key = None;
        }
        if segment.map.is_none() {
            segment.map = map.take();
        } else {
            map = None;
        }
        segment.discontinuity |= discontinuity;
        discontinuity = false;

        playlist.segments.push(segment);
    }

    before - playlist.segments.len()
}

/// Rewrite every segment, key and map uri of the playlist to an absolute url.
pub fn absolutize_uris(playlist: &mut MediaPlaylist, base: &str) -> Result<()> {
    for segment in playlist.segments.iter_mut() {
        segment.uri = resolve_uri(base, &segment.uri)?;

        if let Some(key) = segment.key.as_mut() {
            if let Some(uri) = key.uri.as_mut() {
                *uri = resolve_uri(base, uri)?;
            }
        }
        if let Some(map) = segment.map.as_mut() {
            map.uri = resolve_uri(base, &map.uri)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MASTER: &str = "#EXTM3U
#EXT-X-VERSION:3
#EXT-X-STREAM-INF:BANDWIDTH=800000,RESOLUTION=640x360,CODECS=\"avc1.4d401e,mp4a.40.2\"
lo/playlist.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=5000000,RESOLUTION=1920x1080,CODECS=\"avc1.640028,mp4a.40.2\"
hi/playlist.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=2500000,RESOLUTION=1280x720,CODECS=\"avc1.64001f,mp4a.40.2\"
mid/playlist.m3u8
#EXT-X-I-FRAME-STREAM-INF:BANDWIDTH=9000000,URI=\"iframe/playlist.m3u8\"
";

    const MEDIA: &str = "#EXTM3U
#EXT-X-VERSION:3
#EXT-X-TARGETDURATION:6
#EXT-X-MEDIA-SEQUENCE:0
#EXTINF:6.0,
https://siloh.pluto.tv/prd/creative/abc/0001.ts
#EXT-X-DISCONTINUITY
#EXTINF:6.0,
content/0001.ts
#EXTINF:6.0,
https://cdn.example.com/break_ad/0002.ts
#EXT-X-DISCONTINUITY
#EXTINF:6.0,
content/0002.ts
#EXT-X-ENDLIST
";

    #[test]
    fn best_variant_has_highest_bandwidth() {
        let master = parse_master_playlist(MASTER.as_bytes()).unwrap();
        let best = select_best_variant(&master.variants).unwrap();

        assert_eq!(best.uri, "hi/playlist.m3u8");
        assert_eq!(best.bandwidth, 5000000);
    }

    #[test]
    fn best_variant_of_empty_list() {
        assert!(select_best_variant(&[]).is_none())
    }

    #[test]
    fn best_variant_tie_keeps_first() {
        let raw = "#EXTM3U
#EXT-X-STREAM-INF:BANDWIDTH=1000
first.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=1000
second.m3u8
";
        let master = parse_master_playlist(raw.as_bytes()).unwrap();

        assert_eq!(
            select_best_variant(&master.variants).unwrap().uri,
            "first.m3u8"
        )
    }

    #[test]
    fn strip_ads_removes_marked_segments() {
        let mut playlist = parse_media_playlist(MEDIA.as_bytes()).unwrap();

        assert_eq!(strip_ads(&mut playlist), 2);
        let uris: Vec<&str> = playlist.segments.iter().map(|s| s.uri.as_str()).collect();
        assert_eq!(uris, vec!["content/0001.ts", "content/0002.ts"]);
    }

    #[test]
    fn strip_ads_without_ads() {
        let mut playlist = parse_media_playlist(MEDIA.as_bytes()).unwrap();
        strip_ads(&mut playlist);

        assert_eq!(strip_ads(&mut playlist), 0);
        assert_eq!(playlist.segments.len(), 2);
    }

    #[test]
    fn strip_ads_keeps_key_of_leading_ad() {
        let raw = "#EXTM3U
#EXT-X-TARGETDURATION:6
#EXT-X-KEY:METHOD=AES-128,URI=\"https://keys.example.com/key.bin\"
#EXTINF:6.0,
https://siloh.pluto.tv/prd/creative/abc/0001.ts
#EXTINF:6.0,
content/0001.ts
#EXTINF:6.0,
content/0002.ts
#EXT-X-ENDLIST
";
        let mut playlist = parse_media_playlist(raw.as_bytes()).unwrap();

        assert_eq!(strip_ads(&mut playlist), 1);
        assert_eq!(
            playlist.segments[0].key.as_ref().unwrap().uri.as_deref(),
            Some("https://keys.example.com/key.bin")
        );
        assert!(playlist.segments[1].key.is_none());

        let mut written = vec![];
        playlist.write_to(&mut written).unwrap();
        assert!(String::from_utf8(written).unwrap().contains("#EXT-X-KEY:"));
    }

    #[test]
    fn strip_ads_keeps_map_of_leading_ad() {
        let raw = "#EXTM3U
#EXT-X-TARGETDURATION:6
#EXT-X-MAP:URI=\"init.mp4\"
#EXTINF:6.0,
https://cdn.example.com/break_ad/0001.m4s
#EXTINF:6.0,
content/0001.m4s
#EXT-X-ENDLIST
";
        let mut playlist = parse_media_playlist(raw.as_bytes()).unwrap();

        assert_eq!(strip_ads(&mut playlist), 1);
        assert_eq!(playlist.segments[0].map.as_ref().unwrap().uri, "init.mp4");

        let mut written = vec![];
        playlist.write_to(&mut written).unwrap();
        assert!(String::from_utf8(written).unwrap().contains("#EXT-X-MAP:"));
    }

    #[test]
    fn strip_ads_prefers_own_key() {
        let raw = "#EXTM3U
#EXT-X-TARGETDURATION:6
#EXT-X-KEY:METHOD=AES-128,URI=\"ad.key\"
#EXTINF:6.0,
https://siloh.pluto.tv/prd/creative/abc/0001.ts
#EXT-X-DISCONTINUITY
#EXT-X-KEY:METHOD=AES-128,URI=\"content.key\"
#EXTINF:6.0,
content/0001.ts
#EXT-X-ENDLIST
";
        let mut playlist = parse_media_playlist(raw.as_bytes()).unwrap();
        strip_ads(&mut playlist);

        assert_eq!(
            playlist.segments[0].key.as_ref().unwrap().uri.as_deref(),
            Some("content.key")
        );
        assert!(playlist.segments[0].discontinuity);
    }

    #[test]
    fn strip_ads_moves_discontinuity() {
        let raw = "#EXTM3U
#EXT-X-TARGETDURATION:6
#EXTINF:6.0,
content/0001.ts
#EXT-X-DISCONTINUITY
#EXTINF:6.0,
https://siloh.pluto.tv/prd/creative/abc/0001.ts
#EXTINF:6.0,
content/0002.ts
#EXT-X-ENDLIST
";
        let mut playlist = parse_media_playlist(raw.as_bytes()).unwrap();
        strip_ads(&mut playlist);

        assert!(!playlist.segments[0].discontinuity);
        assert!(playlist.segments[1].discontinuity);
    }

    #[test]
    fn resolve_relative_uri() {
        let resolved = resolve_uri(
            "https://stitcher.example.com/v2/stitch/hls/episode/1/master.m3u8?sid=abc",
            "hi/playlist.m3u8?token=1",
        )
        .unwrap();

        assert_eq!(
            resolved,
            "https://stitcher.example.com/v2/stitch/hls/episode/1/hi/playlist.m3u8?token=1"
        )
    }

    #[test]
    fn resolve_absolute_uri() {
        let resolved = resolve_uri(
            "https://stitcher.example.com/master.m3u8",
            "https://cdn.example.com/hi.m3u8",
        )
        .unwrap();

        assert_eq!(resolved, "https://cdn.example.com/hi.m3u8")
    }

    #[test]
    fn resolve_against_invalid_base() {
        assert!(matches!(
            resolve_uri("not a url", "hi.m3u8"),
            Err(PlutoError::Input(_))
        ))
    }

    #[test]
    fn absolutize_segment_uris() {
        let mut playlist = parse_media_playlist(MEDIA.as_bytes()).unwrap();
        absolutize_uris(&mut playlist, "https://cdn.example.com/hls/playlist.m3u8").unwrap();

        assert_eq!(
            playlist.segments[1].uri,
            "https://cdn.example.com/hls/content/0001.ts"
        );
        assert_eq!(
            playlist.segments[0].uri,
            "https://siloh.pluto.tv/prd/creative/abc/0001.ts"
        );
    }
}

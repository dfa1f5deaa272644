use pluto_dl::pluto::Endpoints;
use pluto_dl::Pluto;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CLIENT_ID: &str = "test-client";
pub const SESSION_TOKEN: &str = "test-session-token";
pub const STITCHER_PARAMS: &str = "sid=test-sid&deviceId=test-device";
/// Stitcher host named by the boot response. Only used when opted in.
pub const BOOT_STITCHER: &str = "https://boot-stitcher.example.com";

pub const MOVIE_ID: &str = "movie1";
pub const SERIES_ID: &str = "series1";

pub const MASTER_PLAYLIST: &str = "#EXTM3U
#EXT-X-VERSION:3
#EXT-X-STREAM-INF:BANDWIDTH=800000,RESOLUTION=640x360,CODECS=\"avc1.4d401e,mp4a.40.2\"
lo/playlist.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=5000000,RESOLUTION=1920x1080,CODECS=\"avc1.640028,mp4a.40.2\"
hi/playlist.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=2500000,RESOLUTION=1280x720,CODECS=\"avc1.64001f,mp4a.40.2\"
mid/playlist.m3u8
#EXT-X-I-FRAME-STREAM-INF:BANDWIDTH=9000000,URI=\"iframe/playlist.m3u8\"
";

pub const MEDIA_PLAYLIST: &str = "#EXTM3U
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

pub fn endpoints(server: &MockServer) -> Endpoints {
    Endpoints {
        boot: server.uri(),
        vod: server.uri(),
        stitcher: server.uri(),
    }
}

pub fn boot_response() -> Value {
    json!({
        "sessionToken": SESSION_TOKEN,
        "stitcherParams": STITCHER_PARAMS,
        "servers": {
            "stitcher": BOOT_STITCHER
        }
    })
}

pub async fn mock_boot(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v4/start"))
        .and(query_param("clientID", CLIENT_ID))
        .respond_with(ResponseTemplate::new(200).set_body_json(boot_response()))
        .mount(server)
        .await;
}

/// Boot a session against the mock server.
pub async fn login(server: &MockServer) -> Pluto {
    mock_boot(server).await;
    Pluto::builder()
        .endpoints(endpoints(server))
        .login(CLIENT_ID)
        .await
        .unwrap()
}

pub fn movie_item() -> Value {
    json!({
        "_id": MOVIE_ID,
        "slug": "the-big-movie",
        "name": "The Big Movie",
        "type": "movie",
        "summary": "Something big happens.",
        "stitched": {
            "path": "/v2/stitch/hls/episode/movie1/master.m3u8"
        }
    })
}

pub fn series_item() -> Value {
    json!({
        "_id": SERIES_ID,
        "slug": "some-show",
        "name": "Some Show",
        "type": "series",
        "stitched": {}
    })
}

pub fn series_seasons() -> Value {
    json!({
        "_id": SERIES_ID,
        "name": "Some Show",
        "slug": "some-show",
        "seasons": [
            {
                "number": 1,
                "episodes": [
                    {
                        "_id": "ep1",
                        "name": "Pilot",
                        "number": 1,
                        "season": 1,
                        "stitched": {
                            "paths": [
                                { "type": "dash", "path": "/v2/stitch/dash/episode/ep1/main.mpd" },
                                { "type": "hls", "path": "/v2/stitch/hls/episode/ep1/master.m3u8" }
                            ]
                        }
                    },
                    {
                        "_id": "ep2",
                        "name": "The Second One",
                        "number": 2,
                        "season": 1,
                        "stitched": {
                            "path": "/v2/stitch/hls/episode/ep2/master.m3u8"
                        }
                    }
                ]
            },
            {
                "number": 2,
                "episodes": [
                    {
                        "_id": "ep3",
                        "name": "No Stream",
                        "number": 1,
                        "season": 2,
                        "stitched": {}
                    }
                ]
            }
        ]
    })
}

pub async fn mock_item(server: &MockServer, id: &str, item: Value) {
    Mock::given(method("GET"))
        .and(path("/v4/vod/items"))
        .and(query_param("ids", id))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([item])))
        .mount(server)
        .await;
}

pub async fn mock_seasons(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(format!("/v4/vod/series/{}/seasons", SERIES_ID)))
        .and(query_param("offset", "1000"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(series_seasons()))
        .mount(server)
        .await;
}

/// Serve the master and media playlists of an episode at `/v2/stitch/hls/episode/<id>/...`.
pub async fn mock_playlists(server: &MockServer, id: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/v2/stitch/hls/episode/{}/master.m3u8", id)))
        .and(query_param("sid", "test-sid"))
        .respond_with(ResponseTemplate::new(200).set_body_string(MASTER_PLAYLIST))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/v2/stitch/hls/episode/{}/hi/playlist.m3u8", id)))
        .respond_with(ResponseTemplate::new(200).set_body_string(MEDIA_PLAYLIST))
        .mount(server)
        .await;
}

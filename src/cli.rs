use clap::Parser;
use pluto_dl::pluto::DEFAULT_CHANNEL_ID;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "pluto-dl")]
#[command(author, version, about = "Pluto TV on-demand downloader")]
pub struct Cli {
    /// Client id which is reported to Pluto when booting the session
    #[arg(short, long)]
    pub client_id: String,

    /// Id of the movie or series to download. A pluto.tv on-demand url works too
    #[arg(short, long)]
    pub item_id: String,

    /// Directory downloads are stored in
    #[arg(short, long, default_value = "out_dir")]
    pub output_dir: PathBuf,

    /// Directory the ad free playlists are written to before downloading
    #[arg(long, default_value = "working_dir")]
    pub working_dir: PathBuf,

    /// Only download episodes of this season
    #[arg(short, long)]
    pub season: Option<u32>,

    /// Channel id which is reported to Pluto when booting the session
    #[arg(long, default_value = DEFAULT_CHANNEL_ID)]
    pub channel_id: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Host of the boot service
    #[arg(long, hide = true)]
    pub boot_endpoint: Option<String>,

    /// Host of the vod catalog service
    #[arg(long, hide = true)]
    pub vod_endpoint: Option<String>,

    /// Host of the stitcher service
    #[arg(long, hide = true)]
    pub stitcher_endpoint: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_flags() {
        let cli = Cli::try_parse_from(["pluto-dl", "-c", "client", "-i", "item"]).unwrap();

        assert_eq!(cli.client_id, "client");
        assert_eq!(cli.item_id, "item");
        assert_eq!(cli.output_dir, PathBuf::from("out_dir"));
        assert_eq!(cli.channel_id, DEFAULT_CHANNEL_ID);
        assert_eq!(cli.season, None);
    }

    #[test]
    fn long_flags() {
        let cli = Cli::try_parse_from([
            "pluto-dl",
            "--client-id",
            "client",
            "--item-id",
            "item",
            "--season",
            "2",
        ])
        .unwrap();

        assert_eq!(cli.season, Some(2));
        assert_eq!(cli.boot_endpoint, None);
    }

    #[test]
    fn endpoint_overrides() {
        let cli = Cli::try_parse_from([
            "pluto-dl",
            "-c",
            "client",
            "-i",
            "item",
            "--boot-endpoint",
            "http://127.0.0.1:8080",
            "--stitcher-endpoint",
            "http://127.0.0.1:8081",
        ])
        .unwrap();

        assert_eq!(cli.boot_endpoint.as_deref(), Some("http://127.0.0.1:8080"));
        assert_eq!(cli.vod_endpoint, None);
        assert_eq!(cli.stitcher_endpoint.as_deref(), Some("http://127.0.0.1:8081"));
    }

    #[test]
    fn missing_item_id() {
        assert!(Cli::try_parse_from(["pluto-dl", "-c", "client"]).is_err())
    }
}

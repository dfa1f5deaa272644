//! Invocation of the external downloader which fetches the actual media.
//!
//! The ad free playlist only exists in memory, so it is written to the working directory first
//! and handed to the downloader as `file://` url.

use crate::error::{PlutoError, PlutoErrorContext};
use crate::Result;
use m3u8_rs::MediaPlaylist;
use reqwest::Url;
use smart_default::SmartDefault;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Outcome of a single download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DownloadStatus {
    Completed,
    /// The downloader exited with a non-zero exit code. The code is [`None`] if the process was
    /// terminated by a signal.
    Failed(Option<i32>),
}

/// Runs `yt-dlp` (driving `aria2c`) to download a playlist.
#[derive(Clone, Debug, SmartDefault)]
pub struct Downloader {
    #[default(PathBuf::from("yt-dlp"))]
    program: PathBuf,
    #[default(Some("aria2c".to_string()))]
    external_downloader: Option<String>,
    #[default(PathBuf::from("working_dir"))]
    working_dir: PathBuf,
}

impl Downloader {
    /// Set the downloader executable. Must understand the `yt-dlp` command line.
    pub fn program<P: Into<PathBuf>>(mut self, program: P) -> Downloader {
        self.program = program.into();
        self
    }

    /// Set the external downloader the downloader should delegate the transfer to.
    pub fn external_downloader<S: AsRef<str>>(mut self, external_downloader: S) -> Downloader {
        self.external_downloader = Some(external_downloader.as_ref().to_string());
        self
    }

    /// Let the downloader transfer the data itself.
    pub fn without_external_downloader(mut self) -> Downloader {
        self.external_downloader = None;
        self
    }

    /// Set the directory the temporary playlists are written to.
    pub fn working_dir<P: Into<PathBuf>>(mut self, working_dir: P) -> Downloader {
        self.working_dir = working_dir.into();
        self
    }

    /// Check that the downloader and the external downloader can be found.
    pub fn check_tools(&self) -> Result<()> {
        which::which(&self.program).map_err(|_| {
            PlutoError::External(
                format!(
                    "{} is missing from your system or path",
                    self.program.display()
                )
                .into(),
            )
        })?;

        if let Some(external_downloader) = &self.external_downloader {
            which::which(external_downloader).map_err(|_| {
                PlutoError::External(
                    format!("{} is missing from your system or path", external_downloader).into(),
                )
            })?;
        }

        Ok(())
    }

    /// Build the downloader command. It runs inside `target_dir` and writes
    /// `<file_name>.<ext>` there.
    pub fn command(&self, playlist_url: &Url, file_name: &str, target_dir: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg("--force-generic-extractor")
            .arg("--enable-file-urls");
        if let Some(external_downloader) = &self.external_downloader {
            command.arg("--downloader").arg(external_downloader);
        }
        command
            .arg("-o")
            .arg(format!("{}.%(ext)s", file_name))
            .arg(playlist_url.as_str())
            .current_dir(target_dir);

        command
    }

    /// Write `playlist` to the working directory and download it into `target_dir`. A failing
    /// downloader is not an error, it is reported as [`DownloadStatus::Failed`].
    pub async fn download(
        &self,
        playlist: &MediaPlaylist,
        file_name: &str,
        target_dir: &Path,
    ) -> Result<DownloadStatus> {
        tokio::fs::create_dir_all(&self.working_dir).await?;
        let playlist_path = self.working_dir.join(format!("{}.m3u8", file_name));

        let mut raw = vec![];
        playlist.write_to(&mut raw)?;
        tokio::fs::write(&playlist_path, raw).await?;

        let status = self.run(&playlist_path, file_name, target_dir).await;

        if let Err(e) = tokio::fs::remove_file(&playlist_path).await {
            warn!("Error removing temporary playlist file: {}", e)
        }

        status
    }

    async fn run(
        &self,
        playlist_path: &Path,
        file_name: &str,
        target_dir: &Path,
    ) -> Result<DownloadStatus> {
        let absolute_path = tokio::fs::canonicalize(playlist_path).await?;
        let playlist_url = Url::from_file_path(&absolute_path).map_err(|_| {
            PlutoError::Internal(
                format!(
                    "could not convert '{}' to a file url",
                    absolute_path.display()
                )
                .into(),
            )
        })?;

        let mut command = self.command(&playlist_url, file_name, target_dir);
        debug!("Running {:?}", command.as_std());

        let status = command.status().await.map_err(|e| {
            PlutoError::External(PlutoErrorContext::new(format!(
                "failed to run {}: {}",
                self.program.display(),
                e
            )))
        })?;

        if status.success() {
            info!("Download Complete");
            Ok(DownloadStatus::Completed)
        } else {
            warn!("Return code from the downloader was non-0 (error), skipping!");
            Ok(DownloadStatus::Failed(status.code()))
        }
    }
}

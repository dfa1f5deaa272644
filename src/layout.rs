//! Where downloads end up on disk and how they are named.
//!
//! Series are stored as `<root>/<series-slug>/S<NN>/<file name>.<ext>`, movies directly as
//! `<root>/<file name>.<ext>`.

use crate::error::{PlutoError, PlutoErrorContext};
use crate::Result;
use std::path::{Path, PathBuf};

const FORBIDDEN_CHARS: [char; 10] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|', '\0'];
const RESERVED_NAMES: [&str; 22] = [
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];
const MAX_NAME_BYTES: usize = 255;

/// Make `name` usable as file name on all common filesystems.
pub fn sanitize<S: AsRef<str>>(name: S) -> String {
    let cleaned: String = name
        .as_ref()
        .chars()
        .filter(|c| !FORBIDDEN_CHARS.contains(c) && !c.is_control())
        .collect();
    let mut sanitized = trim_name(&cleaned).to_string();

    if sanitized.chars().all(|c| c == '.')
        || RESERVED_NAMES
            .iter()
            .any(|reserved| reserved.eq_ignore_ascii_case(&sanitized))
    {
        sanitized.insert_str(0, "__");
    }

    if sanitized.len() > MAX_NAME_BYTES {
        let mut end = MAX_NAME_BYTES;
        while !sanitized.is_char_boundary(end) {
            end -= 1
        }
        sanitized.truncate(end);
        sanitized = trim_name(&sanitized).to_string()
    }

    sanitized
}

fn trim_name(name: &str) -> &str {
    name.trim_end_matches(|c| c == '.' || c == ' ').trim()
}

fn dotted(name: &str) -> String {
    sanitize(name).replace(' ', ".")
}

/// File name (without extension) of an episode, e.g. `Some.Show.S01.E02.Pilot`.
pub fn episode_file_name(
    series_name: &str,
    season_number: u32,
    episode_number: u32,
    episode_name: &str,
) -> String {
    dotted(&format!(
        "{}.S{:02}.E{:02}.{}",
        series_name, season_number, episode_number, episode_name
    ))
}

/// File name (without extension) of a movie.
pub fn movie_file_name(movie_name: &str) -> String {
    dotted(movie_name)
}

pub fn season_dir_name(season_number: u32) -> String {
    format!("S{:02}", season_number)
}

/// The download root. Every directory is created the first time it is requested.
#[derive(Clone, Debug)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory movies are stored in.
    pub async fn movie_dir(&self) -> Result<PathBuf> {
        create_dir(self.root.clone()).await
    }

    pub async fn series_dir(&self, series_slug: &str) -> Result<PathBuf> {
        create_dir(self.root.join(sanitize(series_slug))).await
    }

    pub async fn season_dir(&self, series_slug: &str, season_number: u32) -> Result<PathBuf> {
        create_dir(
            self.root
                .join(sanitize(series_slug))
                .join(season_dir_name(season_number)),
        )
        .await
    }
}

async fn create_dir(path: PathBuf) -> Result<PathBuf> {
    tokio::fs::create_dir_all(&path).await.map_err(|e| {
        PlutoError::External(PlutoErrorContext::new(format!(
            "could not create directory {}: {}",
            path.display(),
            e
        )))
    })?;
    Ok(path)
}

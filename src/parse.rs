use once_cell::sync::Lazy;
use regex::Regex;

static ON_DEMAND_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://(www\.)?pluto\.tv/([a-zA-Z]+/)?on-demand/(?P<type>series|movies)/(?P<id>[^/?#]+)").unwrap()
});

/// Types of pluto.tv urls.
#[cfg_attr(docsrs, doc(cfg(feature = "parse")))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UrlType {
    /// The parsed url points to a series. Use [`crate::Pluto::item`] with the value of this field
    /// to look it up.
    Series(String),
    /// The parsed url points to a movie. Use [`crate::Pluto::item`] with the value of this field
    /// to look it up.
    Movie(String),
}

impl UrlType {
    /// The item id the url points to.
    pub fn id(&self) -> &str {
        match self {
            UrlType::Series(id) | UrlType::Movie(id) => id,
        }
    }
}

/// Extract the item id out of a pluto.tv on-demand url which points to a series or movie.
#[cfg_attr(docsrs, doc(cfg(feature = "parse")))]
pub fn parse_url<S: AsRef<str>>(url: S) -> Option<UrlType> {
    let capture = ON_DEMAND_REGEX.captures(url.as_ref())?;
    let id = capture.name("id")?.as_str().to_string();

    match capture.name("type")?.as_str() {
        "series" => Some(UrlType::Series(id)),
        "movies" => Some(UrlType::Movie(id)),
        _ => None,
    }
}

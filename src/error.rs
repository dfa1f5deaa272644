use reqwest::Response;
use serde::de::DeserializeOwned;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

pub type Result<T, E = PlutoError> = core::result::Result<T, E>;

/// Crate specific error types.
#[derive(Clone, Debug)]
pub enum PlutoError {
    /// Error was caused by something library internal. This only happens if something was
    /// implemented incorrectly or if Pluto changed parts of their api which broke this crate.
    Internal(PlutoErrorContext),

    /// The remote host could not be reached at all.
    Connection(PlutoErrorContext),
    /// Some sort of error occurred while requesting the Pluto api.
    Request(PlutoErrorContext),
    /// While decoding the api response body or a playlist something went wrong.
    Decode(PlutoErrorContext),

    /// The boot endpoint did not hand out a usable session.
    Authentication(PlutoErrorContext),

    /// Generally malformed or invalid user input.
    Input(PlutoErrorContext),

    /// An external program or the filesystem failed.
    External(PlutoErrorContext),
}

impl Display for PlutoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PlutoError::Internal(context) => write!(f, "{}", context),
            PlutoError::Connection(context) => write!(f, "{}", context),
            PlutoError::Request(context) => write!(f, "{}", context),
            PlutoError::Decode(context) => write!(f, "{}", context),
            PlutoError::Authentication(context) => write!(f, "{}", context),
            PlutoError::Input(context) => write!(f, "{}", context),
            PlutoError::External(context) => write!(f, "{}", context),
        }
    }
}

impl Error for PlutoError {}

impl PlutoError {
    /// If the error was caused by an unreachable host. The cli treats these errors specially.
    pub fn is_connection(&self) -> bool {
        matches!(self, PlutoError::Connection(_))
    }

    pub(crate) fn with_url<S: AsRef<str>>(self, url: S) -> Self {
        match self {
            PlutoError::Internal(context) => PlutoError::Internal(context.with_url(url)),
            PlutoError::Connection(context) => PlutoError::Connection(context.with_url(url)),
            PlutoError::Request(context) => PlutoError::Request(context.with_url(url)),
            PlutoError::Decode(context) => PlutoError::Decode(context.with_url(url)),
            PlutoError::Authentication(context) => {
                PlutoError::Authentication(context.with_url(url))
            }
            PlutoError::Input(context) => PlutoError::Input(context.with_url(url)),
            PlutoError::External(context) => PlutoError::External(context.with_url(url)),
        }
    }
}

impl From<serde_json::Error> for PlutoError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(PlutoErrorContext::new(err.to_string()))
    }
}

impl From<reqwest::Error> for PlutoError {
    fn from(err: reqwest::Error) -> Self {
        let mut context = PlutoErrorContext::new(err.to_string());
        if let Some(url) = err.url() {
            context = context.with_url(url.clone());
        }

        if err.is_connect() {
            PlutoError::Connection(context)
        } else if err.is_request()
            || err.is_redirect()
            || err.is_timeout()
            || err.is_body()
            || err.is_status()
        {
            PlutoError::Request(context)
        } else if err.is_decode() {
            PlutoError::Decode(context)
        } else if err.is_builder() {
            PlutoError::Internal(context)
        } else {
            PlutoError::Internal(PlutoErrorContext::new(format!(
                "Could not determine request error type - {}",
                err
            )))
        }
    }
}

impl From<std::io::Error> for PlutoError {
    fn from(err: std::io::Error) -> Self {
        PlutoError::External(PlutoErrorContext::new(err.to_string()))
    }
}

/// Information about a [`PlutoError`].
#[derive(Clone, Debug)]
pub struct PlutoErrorContext {
    pub message: String,
    pub url: Option<String>,
    pub value: Option<String>,
}

impl Display for PlutoErrorContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut res = self.message.clone();

        if let Some(url) = &self.url {
            res.push_str(&format!(" ({})", url));
        }
        if let Some(value) = &self.value {
            res.push_str(&format!(": {}", value));
        }

        write!(f, "{}", res)
    }
}

impl From<String> for PlutoErrorContext {
    fn from(string: String) -> Self {
        PlutoErrorContext::new(string)
    }
}

impl From<&str> for PlutoErrorContext {
    fn from(str: &str) -> Self {
        PlutoErrorContext::new(str)
    }
}

impl PlutoErrorContext {
    pub(crate) fn new<S: ToString>(message: S) -> Self {
        Self {
            message: message.to_string(),
            url: None,
            value: None,
        }
    }

    pub(crate) fn with_url<S: AsRef<str>>(mut self, url: S) -> Self {
        self.url = Some(url.as_ref().to_string());

        self
    }

    pub(crate) fn with_value(mut self, value: &[u8]) -> Self {
        self.value = Some(
            std::str::from_utf8(value)
                .unwrap_or("-- not displayable --")
                .to_string(),
        );

        self
    }
}

/// Turn every non-2xx response into a [`PlutoError::Request`].
pub(crate) fn check_status(resp: &Response) -> Result<()> {
    let status = resp.status();

    if status.as_u16() == 429 {
        let retry_secs = resp
            .headers()
            .get(http::header::RETRY_AFTER)
            .and_then(|retry_after| retry_after.to_str().ok())
            .and_then(|retry_after_secs| retry_after_secs.parse::<u32>().ok());

        return Err(PlutoError::Request(
            PlutoErrorContext::new(format!(
                "Rate limit detected. {}",
                retry_secs.map_or("Try again later".to_string(), |secs| format!(
                    "Try again in {} seconds",
                    secs
                ))
            ))
            .with_url(resp.url()),
        ));
    } else if !status.is_success() {
        return Err(PlutoError::Request(
            PlutoErrorContext::new(format!(
                "{} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            ))
            .with_url(resp.url()),
        ));
    }

    Ok(())
}

pub(crate) async fn check_request<T: DeserializeOwned>(url: String, resp: Response) -> Result<T> {
    check_status(&resp)?;

    let content_length = resp.content_length().unwrap_or(0);
    let _raw = resp.bytes().await?;
    let mut raw: &[u8] = _raw.as_ref();

    // to ensure compatibility with `T`, convert a empty response to {}
    if raw.is_empty() && (content_length == 0) {
        raw = "{}".as_bytes();
    }

    serde_json::from_slice::<T>(raw).map_err(|e| {
        PlutoError::Decode(
            PlutoErrorContext::new(format!("{} at {}:{}", e, e.line(), e.column()))
                .with_url(&url)
                .with_value(raw),
        )
    })
}

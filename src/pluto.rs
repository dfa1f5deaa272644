//! Builder and access to the [`Pluto`] struct which is required to make any request.

use reqwest::Client;
use smart_default::SmartDefault;
use std::sync::Arc;

/// App version the Pluto web client reports when booting.
pub const APP_VERSION: &str = "5.100.1-a00ab03870075931f7b7df1e50eec1e31332ab4d";
/// Channel id which is reported when booting if no other channel is configured.
pub const DEFAULT_CHANNEL_ID: &str = "5a66795ef91fef2c7031c599";

/// Hosts of the services the api is split into. Only change them if you want to talk to another
/// server than the official one (a proxy or a mock server in tests).
#[derive(Clone, Debug, SmartDefault)]
pub struct Endpoints {
    /// Hands out the session token and the stitcher parameters.
    #[default("https://boot.pluto.tv".to_string())]
    pub boot: String,
    /// Catalog lookups (items, seasons).
    #[default("https://service-vod.clusters.pluto.tv".to_string())]
    pub vod: String,
    /// Serves the playlists with inserted ads. See [`PlutoBuilder::boot_stitcher`] to use the
    /// host the boot response names instead.
    #[default("https://service-stitcher.clusters.pluto.tv".to_string())]
    pub stitcher: String,
}

/// The device the client pretends to be when booting.
#[derive(Clone, Debug, SmartDefault)]
pub struct DeviceProfile {
    #[default("web".to_string())]
    pub app_name: String,
    #[default(APP_VERSION.to_string())]
    pub app_version: String,
    #[default("89.0.0".to_string())]
    pub device_version: String,
    #[default("web".to_string())]
    pub device_model: String,
    #[default("firefox".to_string())]
    pub device_make: String,
    #[default("web".to_string())]
    pub device_type: String,
    #[default("1.0.0".to_string())]
    pub client_model_number: String,
}

/// Starting point of this whole library.
#[derive(Clone, Debug)]
pub struct Pluto {
    pub(crate) executor: Arc<Executor>,
}

impl Pluto {
    pub fn builder() -> PlutoBuilder {
        PlutoBuilder::default()
    }

    /// Return the (cloned) [`Client`] which is internally used to make requests.
    pub fn client(&self) -> Client {
        self.executor.client.clone()
    }

    /// The client id this session was booted with.
    pub fn client_id(&self) -> &str {
        &self.executor.details.client_id
    }

    /// The channel id this session was booted with.
    pub fn channel_id(&self) -> &str {
        &self.executor.details.channel_id
    }

    /// The session token which is sent as bearer token with every api request.
    pub fn session_token(&self) -> &str {
        &self.executor.session.session_token
    }

    /// Query parameters the stitcher requires to hand out playlists.
    pub fn stitcher_params(&self) -> &str {
        &self.executor.session.stitcher_params
    }

    /// Build the full stitcher url of a stitched path, like it is returned in
    /// [`crate::media::Stitched`].
    pub fn stitcher_url<S: AsRef<str>>(&self, path: S) -> String {
        self.executor.stitcher_url(path.as_ref())
    }
}

mod auth {
    use crate::error::{check_request, check_status, PlutoError};
    use crate::pluto::{DeviceProfile, Endpoints, DEFAULT_CHANNEL_ID};
    use crate::{Pluto, Request, Result};
    use chrono::Utc;
    use http::header::{self, HeaderMap, HeaderValue};
    use reqwest::{Client, ClientBuilder, IntoUrl, RequestBuilder};
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Serialize};
    use std::sync::Arc;
    use tracing::{debug, info};

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct BootServers {
        stitcher: Option<String>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    struct BootResponse {
        session_token: String,
        stitcher_params: String,
        servers: BootServers,
    }

    #[derive(Clone, Debug, Default)]
    pub(crate) struct ExecutorSession {
        pub(crate) session_token: String,
        pub(crate) stitcher_params: String,
        /// Stitcher host, without trailing slash.
        pub(crate) stitcher: String,
    }

    #[derive(Clone, Debug, Default)]
    pub(crate) struct ExecutorDetails {
        pub(crate) client_id: String,
        pub(crate) channel_id: String,
        pub(crate) endpoints: Endpoints,
    }

    /// Internal struct to execute all request with.
    #[derive(Debug)]
    pub struct Executor {
        pub(crate) client: Client,

        pub(crate) session: ExecutorSession,
        pub(crate) details: ExecutorDetails,
    }

    impl Executor {
        pub(crate) fn get<U: IntoUrl>(self: &Arc<Self>, url: U) -> ExecutorRequestBuilder {
            ExecutorRequestBuilder::new(self.clone(), self.client.get(url))
        }

        pub(crate) fn vod_url(&self, path: &str) -> String {
            format!(
                "{}{}",
                self.details.endpoints.vod.trim_end_matches('/'),
                path
            )
        }

        pub(crate) fn stitcher_url(&self, path: &str) -> String {
            let params = &self.session.stitcher_params;
            if params.is_empty() {
                format!("{}{}", self.session.stitcher, path)
            } else {
                let separator = if path.contains('?') { '&' } else { '?' };
                format!("{}{}{}{}", self.session.stitcher, path, separator, params)
            }
        }

        pub(crate) async fn request<T: Request + DeserializeOwned>(
            self: &Arc<Self>,
            mut req: RequestBuilder,
        ) -> Result<T> {
            if !self.session.session_token.is_empty() {
                req = req.header(
                    header::AUTHORIZATION,
                    format!("Bearer {}", self.session.session_token),
                );
            }

            let mut resp: T = request(&self.client, req).await?;
            resp.__set_executor(self.clone());

            Ok(resp)
        }

        async fn boot(
            client: &Client,
            endpoints: &Endpoints,
            device_profile: &DeviceProfile,
            client_id: &str,
            channel_id: &str,
            series_ids: &[String],
        ) -> Result<BootResponse> {
            let endpoint = format!("{}/v4/start", endpoints.boot.trim_end_matches('/'));
            let client_time = Utc::now().to_rfc3339();
            let series_ids = series_ids.join(",");

            let req = client.get(endpoint).query(&[
                ("appName", device_profile.app_name.as_str()),
                ("appVersion", device_profile.app_version.as_str()),
                ("deviceVersion", device_profile.device_version.as_str()),
                ("deviceModel", device_profile.device_model.as_str()),
                ("deviceMake", device_profile.device_make.as_str()),
                ("deviceType", device_profile.device_type.as_str()),
                ("clientID", client_id),
                ("clientModelNumber", device_profile.client_model_number.as_str()),
                ("channelID", channel_id),
                ("seriesIDs", series_ids.as_str()),
                ("serverSideAds", "false"),
                ("clientTime", client_time.as_str()),
            ]);

            request(client, req).await
        }
    }

    impl Default for Executor {
        fn default() -> Self {
            Self {
                client: Client::new(),
                session: ExecutorSession::default(),
                details: ExecutorDetails::default(),
            }
        }
    }

    pub(crate) struct ExecutorRequestBuilder {
        executor: Arc<Executor>,
        builder: RequestBuilder,
    }

    impl ExecutorRequestBuilder {
        pub(crate) fn new(executor: Arc<Executor>, builder: RequestBuilder) -> Self {
            Self { executor, builder }
        }

        pub(crate) fn query<T: Serialize + ?Sized>(mut self, query: &T) -> ExecutorRequestBuilder {
            self.builder = self.builder.query(query);

            self
        }

        pub(crate) async fn request<T: Request + DeserializeOwned>(self) -> Result<T> {
            self.executor.request(self.builder).await
        }

        /// Send the request without session authorization and return the raw body. Used for
        /// playlists, which are not served by the api itself.
        pub(crate) async fn request_raw(self) -> Result<Vec<u8>> {
            let resp = self.builder.send().await?;
            check_status(&resp)?;
            Ok(resp.bytes().await?.to_vec())
        }
    }

    /// A builder to construct a new [`Pluto`] instance. To create it, call [`Pluto::builder`].
    pub struct PlutoBuilder {
        client: Client,
        endpoints: Endpoints,
        device_profile: DeviceProfile,
        channel_id: String,
        series_ids: Vec<String>,
        boot_stitcher: bool,
    }

    impl Default for PlutoBuilder {
        fn default() -> Self {
            Self {
                client: PlutoBuilder::predefined_client_builder()
                    .build()
                    .unwrap_or_else(|_| Client::new()),
                endpoints: Endpoints::default(),
                device_profile: DeviceProfile::default(),
                channel_id: DEFAULT_CHANNEL_ID.to_string(),
                series_ids: vec![],
                boot_stitcher: false,
            }
        }
    }

    impl PlutoBuilder {
        /// Return a [`ClientBuilder`] which has the headers applied the api expects from a
        /// browser. Use it as base if you want to configure your own client and set it with
        /// [`PlutoBuilder::client`].
        pub fn predefined_client_builder() -> ClientBuilder {
            let mut headers = HeaderMap::new();
            headers.insert(header::ORIGIN, HeaderValue::from_static("https://pluto.tv"));
            headers.insert(header::REFERER, HeaderValue::from_static("https://pluto.tv"));
            headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));

            Client::builder()
                .user_agent("Mozilla/5.0 (Windows NT 6.3; Win64; x64; rv:85.0) Gecko/20100101 Firefox/85.0")
                .default_headers(headers)
        }

        /// Set a custom client that will be used in all requests.
        pub fn client(mut self, client: Client) -> PlutoBuilder {
            self.client = client;
            self
        }

        /// Set the service hosts requests are sent to.
        pub fn endpoints(mut self, endpoints: Endpoints) -> PlutoBuilder {
            self.endpoints = endpoints;
            self
        }

        /// Set the device which is reported when booting.
        pub fn device_profile(mut self, device_profile: DeviceProfile) -> PlutoBuilder {
            self.device_profile = device_profile;
            self
        }

        /// Set the channel id which is reported when booting.
        pub fn channel_id<S: AsRef<str>>(mut self, channel_id: S) -> PlutoBuilder {
            self.channel_id = channel_id.as_ref().to_string();
            self
        }

        /// Add a series id which is reported when booting. The stitcher parameters are issued
        /// for the reported series.
        pub fn series_id<S: AsRef<str>>(mut self, series_id: S) -> PlutoBuilder {
            self.series_ids.push(series_id.as_ref().to_string());
            self
        }

        /// Use the stitcher host the boot response names (`servers.stitcher`) instead of
        /// [`Endpoints::stitcher`]. Off by default, the boot host expects a different url scheme
        /// than the stitched paths of the vod api.
        pub fn boot_stitcher(mut self, boot_stitcher: bool) -> PlutoBuilder {
            self.boot_stitcher = boot_stitcher;
            self
        }

        /// Boot a new session with the given client id and return a new `Pluto` instance.
        pub async fn login<S: AsRef<str>>(self, client_id: S) -> Result<Pluto> {
            info!("Fetching boot data...");
            let boot = Executor::boot(
                &self.client,
                &self.endpoints,
                &self.device_profile,
                client_id.as_ref(),
                &self.channel_id,
                &self.series_ids,
            )
            .await?;
            info!("Boot data received");

            if boot.session_token.is_empty() {
                return Err(PlutoError::Authentication(
                    "Boot response did not contain a session token".into(),
                ));
            }

            let stitcher = boot
                .servers
                .stitcher
                .filter(|stitcher| self.boot_stitcher && !stitcher.is_empty())
                .unwrap_or_else(|| self.endpoints.stitcher.clone())
                .trim_end_matches('/')
                .to_string();
            debug!("Using stitcher host {}", stitcher);

            Ok(Pluto {
                executor: Arc::new(Executor {
                    client: self.client,
                    session: ExecutorSession {
                        session_token: boot.session_token,
                        stitcher_params: boot.stitcher_params,
                        stitcher,
                    },
                    details: ExecutorDetails {
                        client_id: client_id.as_ref().to_string(),
                        channel_id: self.channel_id,
                        endpoints: self.endpoints,
                    },
                }),
            })
        }
    }

    /// Make a request from the provided builder.
    async fn request<T: DeserializeOwned>(client: &Client, req: RequestBuilder) -> Result<T> {
        let built_req = req.build()?;
        let url = built_req.url().to_string();
        debug!("{} {}", built_req.method(), url);
        let resp = client.execute(built_req).await?;

        check_request(url, resp).await
    }
}

pub(crate) use auth::Executor;
pub use auth::PlutoBuilder;

use crate::{
    error::{ErrorKind, Result},
    types::{Torrent, Tracker},
};
use derive_builder::Builder;
use reqwest::header::{self, HeaderMap, HeaderValue};
use std::time::Duration;
use url::Url;

pub(crate) const USER_AGENT: &str = concat!("qb-uplimit/", env!("CARGO_PKG_VERSION"));
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const LOGIN: &str = "api/v2/auth/login";
const LOGOUT: &str = "api/v2/auth/logout";
const APP_VERSION: &str = "api/v2/app/version";
const WEBAPI_VERSION: &str = "api/v2/app/webapiVersion";
const TORRENTS_INFO: &str = "api/v2/torrents/info";
const TORRENTS_TRACKERS: &str = "api/v2/torrents/trackers";
const SET_UPLOAD_LIMIT: &str = "api/v2/torrents/setUploadLimit";

/// A session with the qBittorrent Web UI.
///
/// The session cookie lives in the client's cookie store and is shared by
/// all clones.
#[derive(Debug, Clone)]
pub struct Client {
    reqwest_client: reqwest::Client,
    base: Url,
}

/// Builder for a Web UI [`Client`]
#[derive(Builder, Debug)]
#[builder(build_fn(skip))]
#[builder(setter(into))]
#[builder(name = "ClientBuilder")]
#[allow(dead_code)]
pub struct ClientBuilderInternal {
    /// Host name or URL of the Web UI, e.g. `localhost` or `https://nas.lan/qbt`
    host: String,
    port: u16,
    user_agent: String,
    timeout: Duration,
}

impl ClientBuilder {
    pub fn build(&mut self) -> Result<Client> {
        let host = self.host.clone().ok_or(ErrorKind::MissingHost)?;
        let port = self.port.unwrap_or(DEFAULT_PORT);
        let base = base_url(&host, port)?;

        let user_agent = self
            .user_agent
            .clone()
            .unwrap_or_else(|| USER_AGENT.to_string());

        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, HeaderValue::from_str(&user_agent)?);
        // The Web UI rejects requests whose Referer does not match its host
        headers.insert(header::REFERER, HeaderValue::from_str(base.as_str())?);

        let reqwest_client = reqwest::ClientBuilder::new()
            .gzip(true)
            .cookie_store(true)
            .default_headers(headers)
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()?;

        Ok(Client {
            reqwest_client,
            base,
        })
    }
}

/// Base URL of the Web UI, always ending in `/` so endpoints can be joined
fn base_url(host: &str, port: u16) -> Result<Url> {
    let invalid = || ErrorKind::InvalidHost(host.to_string(), port);
    let raw = if host.contains("://") {
        host.to_string()
    } else {
        format!("http://{}", host)
    };
    let mut url = Url::parse(&raw).map_err(|_| invalid())?;
    if port == 0 || url.set_port(Some(port)).is_err() {
        return Err(invalid());
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

impl Client {
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, endpoint: &'static str) -> Result<Url> {
        self.base
            .join(endpoint)
            .map_err(|e| ErrorKind::InvalidEndpoint(endpoint, e))
    }

    async fn get(&self, endpoint: &'static str, query: &[(&str, &str)]) -> Result<reqwest::Response> {
        debug!("GET {}", endpoint);
        let response = self
            .reqwest_client
            .get(self.endpoint(endpoint)?)
            .query(query)
            .send()
            .await?;
        check_status(endpoint, response)
    }

    async fn post(&self, endpoint: &'static str, form: &[(&str, &str)]) -> Result<reqwest::Response> {
        debug!("POST {}", endpoint);
        let response = self
            .reqwest_client
            .post(self.endpoint(endpoint)?)
            .form(form)
            .send()
            .await?;
        check_status(endpoint, response)
    }

    /// Authenticate and keep the session cookie for all further calls
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        info!("Logging in to {} as {}", self.base, username);
        let response = self
            .reqwest_client
            .post(self.endpoint(LOGIN)?)
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::FORBIDDEN {
            return Err(ErrorKind::LoginFailed(
                "client IP is banned after too many failed login attempts".to_string(),
            ));
        }
        let response = check_status(LOGIN, response)?;
        let body = response.text().await?;
        match body.trim() {
            "Ok." => Ok(()),
            "Fails." => Err(ErrorKind::LoginFailed(
                "invalid username or password".to_string(),
            )),
            other => Err(ErrorKind::LoginFailed(format!(
                "unexpected answer from Web UI: {}",
                other
            ))),
        }
    }

    pub async fn logout(&self) -> Result<()> {
        self.post(LOGOUT, &[]).await?;
        info!("Logged out from {}", self.base);
        Ok(())
    }

    /// qBittorrent application version, e.g. `v4.6.2`
    pub async fn app_version(&self) -> Result<String> {
        Ok(self.get(APP_VERSION, &[]).await?.text().await?)
    }

    /// Web API version, e.g. `2.9.3`
    pub async fn webapi_version(&self) -> Result<String> {
        Ok(self.get(WEBAPI_VERSION, &[]).await?.text().await?)
    }

    pub async fn torrents(&self) -> Result<Vec<Torrent>> {
        Ok(self.get(TORRENTS_INFO, &[]).await?.json().await?)
    }

    /// All trackers of a torrent, including the DHT/PeX/LSD pseudo entries
    pub async fn trackers(&self, hash: &str) -> Result<Vec<Tracker>> {
        Ok(self
            .get(TORRENTS_TRACKERS, &[("hash", hash)])
            .await?
            .json()
            .await?)
    }

    /// Cap the upload rate of a torrent, in bytes/s (0 removes the cap)
    pub async fn set_upload_limit(&self, hash: &str, limit: i64) -> Result<()> {
        let limit = limit.to_string();
        self.post(SET_UPLOAD_LIMIT, &[("hashes", hash), ("limit", &limit)])
            .await?;
        Ok(())
    }
}

fn check_status(endpoint: &'static str, response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ErrorKind::Api { endpoint, status })
    }
}

// HTTP client for the user service: a small blocking reqwest client that
// keeps cookies across calls, so whatever session cookie the server hands
// out on login is replayed on later commands.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::blocking::{Client, Response};
use reqwest::cookie::Jar;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::{
    paths, Credentials, FriendRequest, LoginResponse, RequestLine, Sent, User, UserApi,
};
use crate::config::Config;
use crate::error::{CritterError, Result};

/// Long-lived client bound to one base address.
///
/// The underlying `reqwest` client is rebuilt once `connection_lifetime`
/// has passed so stale pooled connections (and DNS answers) are dropped.
/// The cookie jar is shared across rebuilds.
pub struct ApiClient {
    client: Client,
    jar: Arc<Jar>,
    base_url: Url,
    connection_lifetime: Duration,
    built_at: Instant,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let jar = Arc::new(Jar::default());
        let client = build_client(&jar, config.connection_lifetime)?;
        info!(base_url = %config.base_url, "HTTP client ready");
        Ok(ApiClient {
            client,
            jar,
            base_url: config.base_url.clone(),
            connection_lifetime: config.connection_lifetime,
            built_at: Instant::now(),
        })
    }

    /// Create a client configured from the environment, see `Config::from_env`.
    pub fn from_env() -> Result<Self> {
        Self::new(&Config::from_env()?)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn http(&mut self) -> Result<&Client> {
        if self.built_at.elapsed() >= self.connection_lifetime {
            self.client = build_client(&self.jar, self.connection_lifetime)?;
            self.built_at = Instant::now();
            info!("Connection lifetime elapsed, HTTP client rebuilt");
        }
        Ok(&self.client)
    }

    // Plain concatenation keeps any path prefix on the base address, which
    // `Url::join` would drop for absolute paths.
    fn url(&self, path: &str) -> Result<Url> {
        let raw = format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path);
        Url::parse(&raw).map_err(|e| CritterError::transport(format!("Invalid url {raw}: {e}")))
    }

    /// Send one request and turn non-success statuses into `Remote` errors.
    fn send<B: Serialize + ?Sized>(
        &mut self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(RequestLine, Response)> {
        let url = self.url(path)?;
        debug!(%method, %url, "Sending request");

        let mut req = self.http()?.request(method.clone(), url.clone());
        if let Some(body) = body {
            req = req.json(body);
        }

        let res = req.send().map_err(|e| {
            warn!(%method, %url, error = %e, "Request did not complete");
            CritterError::transport(e.to_string())
        })?;

        let request = RequestLine::new(
            method.as_str(),
            res.url().as_str(),
            format!("{:?}", res.version()),
        );
        let status = res.status();
        info!(%request, status = status.as_u16(), "Response received");

        if !status.is_success() {
            let body = res.text().unwrap_or_else(|_| "".into());
            warn!(status = status.as_u16(), "Server rejected request");
            return Err(CritterError::Remote {
                request,
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
                body,
            });
        }
        Ok((request, res))
    }

    fn send_empty<B: Serialize + ?Sized>(
        &mut self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Sent<()>> {
        let (request, _) = self.send(method, path, body)?;
        Ok(Sent { request, body: () })
    }

    fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &mut self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Sent<T>> {
        let (request, res) = self.send(method, path, body)?;
        let body = res.json::<T>().map_err(|e| {
            warn!(%request, error = %e, "Could not decode response body");
            CritterError::transport(format!("Could not decode response from {}: {e}", request.url))
        })?;
        Ok(Sent { request, body })
    }
}

fn build_client(jar: &Arc<Jar>, lifetime: Duration) -> Result<Client> {
    Client::builder()
        .cookie_provider(Arc::clone(jar))
        .pool_idle_timeout(lifetime)
        .build()
        .map_err(|e| CritterError::transport(format!("Failed to build HTTP client: {e}")))
}

impl UserApi for ApiClient {
    fn register(&mut self, credentials: &Credentials) -> Result<Sent<()>> {
        self.send_empty(Method::POST, paths::REGISTER, Some(credentials))
    }

    fn login(&mut self, credentials: &Credentials) -> Result<Sent<LoginResponse>> {
        self.send_json(Method::POST, paths::LOGIN, Some(credentials))
    }

    fn list_users(&mut self) -> Result<Sent<Vec<User>>> {
        self.send_json::<(), _>(Method::GET, paths::ADMIN_USERS, None)
    }

    fn remove_user(&mut self, user_id: i64) -> Result<Sent<()>> {
        self.send_empty::<()>(Method::DELETE, &paths::admin_user(user_id), None)
    }

    fn list_friends(&mut self, user_id: i64) -> Result<Sent<Vec<User>>> {
        self.send_json::<(), _>(Method::GET, &paths::friends(user_id), None)
    }

    fn list_pending_friends(&mut self, user_id: i64) -> Result<Sent<Vec<User>>> {
        self.send_json::<(), _>(Method::GET, &paths::pending_friends(user_id), None)
    }

    fn send_friend_request(&mut self, user_id: i64, request: &FriendRequest) -> Result<Sent<()>> {
        self.send_empty(Method::POST, &paths::friends(user_id), Some(request))
    }
}

//! reqwest-backed RedfishClient.
//! Supports SessionService login (X-Auth-Token) and HTTP Basic, an optional CA bundle,
//! and a per-request timeout.

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, trace};

use super::{odata_id, RedfishClient, RedfishResponse, SERVICE_ROOT};
use crate::config::types::{AuthMode, ConnectionParams};

/// Used when the service root does not advertise Links.Sessions
const DEFAULT_SESSIONS_PATH: &str = "/redfish/v1/SessionService/Sessions";

enum AuthState {
    None,
    Basic,
    Token { token: String, location: Option<String> },
}

pub struct HttpsRedfishClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
    auth: AuthMode,
    state: Mutex<AuthState>,
}

/// Normalize a configured BMC address into a base URL.
/// Bare hosts get https://, bare IPv6 addresses get brackets, trailing slashes are dropped.
pub fn base_url(ip: &str) -> String {
    let ip = ip.trim().trim_end_matches('/');
    if ip.starts_with("https://") || ip.starts_with("http://") {
        ip.to_string()
    } else if ip.matches(':').count() > 1 && !ip.starts_with('[') {
        format!("https://[{}]", ip)
    } else {
        format!("https://{}", ip)
    }
}

impl HttpsRedfishClient {
    pub async fn new(params: &ConnectionParams) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(params.timeout))
            .user_agent(concat!("redfish-temps/", env!("CARGO_PKG_VERSION")));

        builder = match &params.cafile {
            Some(cafile) => {
                let ca_pem = tokio::fs::read(cafile)
                    .await
                    .with_context(|| format!("Failed to read CA file: {}", cafile))?;
                let ca_cert = reqwest::Certificate::from_pem(&ca_pem)
                    .with_context(|| format!("Failed to parse CA certificate: {}", cafile))?;
                debug!("Verifying BMC certificate against {}", cafile);
                builder.add_root_certificate(ca_cert)
            }
            None => {
                debug!("No CA file configured, BMC certificate will not be verified");
                builder.danger_accept_invalid_certs(true)
            }
        };

        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url(&params.ip),
            username: params.user.clone(),
            password: params.passwd.clone(),
            auth: params.auth,
            state: Mutex::new(AuthState::None),
        })
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with("https://") || path.starts_with("http://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &*self.state.lock().await {
            AuthState::Token { token, .. } => request.header("X-Auth-Token", token),
            AuthState::Basic => request.basic_auth(&self.username, Some(&self.password)),
            AuthState::None => request,
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder, url: &str) -> Result<RedfishResponse> {
        let response = request
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))?;

        trace!("{} -> HTTP {} ({} bytes)", url, status, text.len());
        Ok(RedfishResponse::new(status, text))
    }

    /// Discover the sessions collection from the (unauthenticated) service root.
    async fn sessions_url(&self) -> Result<String> {
        let url = self.url_for(SERVICE_ROOT);
        let root = self.send(self.http.get(&url), &url).await?;

        let path = odata_id(&root.body, &["Links", "Sessions"]).unwrap_or_else(|| {
            debug!("Service root has no Links.Sessions (HTTP {}), using {}", root.status, DEFAULT_SESSIONS_PATH);
            DEFAULT_SESSIONS_PATH
        });
        Ok(self.url_for(path))
    }

    async fn login_basic(&self, sessions_url: &str) -> Result<AuthState> {
        let request = self.http.get(sessions_url).basic_auth(&self.username, Some(&self.password));
        let response = self.send(request, sessions_url).await?;

        if !response.is_ok() {
            bail!(
                "Basic authentication rejected (HTTP {}): {}",
                response.status,
                response.extended_error()
            );
        }
        Ok(AuthState::Basic)
    }

    async fn login_session(&self, sessions_url: &str) -> Result<AuthState> {
        let credentials = serde_json::json!({
            "UserName": self.username,
            "Password": self.password,
        });

        let response = self
            .http
            .post(sessions_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&credentials)
            .send()
            .await
            .with_context(|| format!("Session login to {} failed", sessions_url))?;

        let status = response.status().as_u16();
        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let token = header("X-Auth-Token");
        let location = header("Location");
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read session login response from {}", sessions_url))?;
        let created = RedfishResponse::new(status, text);

        if status != 200 && status != 201 {
            bail!("Session login rejected (HTTP {}): {}", status, created.extended_error());
        }

        let token = token.ok_or_else(|| anyhow!("Session login returned no X-Auth-Token header"))?;
        let location = location.or_else(|| odata_id(&created.body, &[]).map(str::to_string));

        Ok(AuthState::Token { token, location })
    }
}

#[async_trait]
impl RedfishClient for HttpsRedfishClient {
    async fn login(&self) -> Result<()> {
        let sessions_url = self.sessions_url().await?;

        let state = match self.auth {
            AuthMode::Basic => self.login_basic(&sessions_url).await?,
            AuthMode::Session => self.login_session(&sessions_url).await?,
        };

        *self.state.lock().await = state;
        info!("Logged in to {} ({} auth) as {}", self.base_url, self.auth, self.username);
        Ok(())
    }

    async fn get(&self, path: &str) -> Result<RedfishResponse> {
        let url = self.url_for(path);
        debug!("GET {}", url);
        let request = self.authorize(self.http.get(&url)).await;
        self.send(request, &url).await
    }

    async fn logout(&self) -> Result<()> {
        let state = std::mem::replace(&mut *self.state.lock().await, AuthState::None);

        let AuthState::Token { token, location } = state else {
            return Ok(());
        };
        let Some(location) = location else {
            debug!("Session has no location, nothing to delete");
            return Ok(());
        };

        let url = self.url_for(&location);
        let response = self
            .http
            .delete(&url)
            .header("X-Auth-Token", token)
            .send()
            .await
            .with_context(|| format!("Session logout at {} failed", url))?;

        if !response.status().is_success() {
            bail!("Session logout at {} returned HTTP {}", url, response.status().as_u16());
        }
        debug!("Session {} closed", url);
        Ok(())
    }
}

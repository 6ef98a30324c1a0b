//! HTTP client for the token vault API.
//!
//! Thin typed wrapper over the vault's REST interface. All policy (what to
//! do about missing or inactive connections, failure containment) lives in
//! the broker; this client only speaks the wire protocol.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use calbridge_core::Provider;

use crate::config::VaultConfig;

/// An error talking to the token vault.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Connection failure, timeout, or other transport problem.
    #[error("vault request failed: {0}")]
    Network(String),

    /// The vault answered with a non-success status.
    #[error("vault returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The vault answered with a body this client could not parse.
    #[error("invalid vault response: {0}")]
    InvalidResponse(String),

    /// A request URL could not be built from the configured base.
    #[error("invalid vault url: {0}")]
    Url(#[from] url::ParseError),
}

/// A provider connection as reported by the vault.
#[derive(Debug, Clone, Deserialize)]
pub struct Connection {
    /// Connection status, `"active"` when the credential is live.
    pub status: String,
    /// The bearer token, present for live connections.
    pub access_token: Option<String>,
}

impl Connection {
    /// Whether the vault considers this connection usable.
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

/// A short-lived token scoped to connection management only.
///
/// Consumed by the connection-management UI; carries no calendar read/write
/// capability.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectWidgetToken {
    /// The opaque widget token.
    pub token: String,
    /// Lifetime in seconds, if the vault reports one.
    pub expires_in: Option<u64>,
}

#[derive(Debug, Serialize)]
struct WidgetTokenRequest<'a> {
    user_id: &'a str,
    organization_id: &'a str,
    scope: &'static str,
}

/// Typed client for the token vault REST API.
#[derive(Debug)]
pub struct VaultClient {
    http: reqwest::Client,
    config: VaultConfig,
}

impl VaultClient {
    /// Creates a new vault client.
    pub fn new(config: VaultConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("failed to create HTTP client");
        Self { http, config }
    }

    /// Looks up the connection for `(provider, user, organization)`.
    ///
    /// Returns `Ok(None)` when the vault has no such connection; inactive
    /// connections come back as `Some` so the caller can distinguish them in
    /// diagnostics.
    pub async fn fetch_connection(
        &self,
        provider: Provider,
        user_id: &str,
        organization_id: &str,
    ) -> Result<Option<Connection>, VaultError> {
        let url = self.endpoint(&format!("v1/connections/{provider}"))?;

        let response = self
            .http
            .get(url)
            .header("x-api-key", &self.config.api_key)
            .query(&[("user_id", user_id), ("organization_id", organization_id)])
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VaultError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let connection = response
            .json::<Connection>()
            .await
            .map_err(|e| VaultError::InvalidResponse(e.to_string()))?;
        Ok(Some(connection))
    }

    /// Asks the vault to mint a connection-management widget token.
    pub async fn issue_widget_token(
        &self,
        user_id: &str,
        organization_id: &str,
    ) -> Result<ConnectWidgetToken, VaultError> {
        let url = self.endpoint("v1/widget-tokens")?;

        let response = self
            .http
            .post(url)
            .header("x-api-key", &self.config.api_key)
            .json(&WidgetTokenRequest {
                user_id,
                organization_id,
                scope: "manage-connections",
            })
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VaultError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<ConnectWidgetToken>()
            .await
            .map_err(|e| VaultError::InvalidResponse(e.to_string()))
    }

    fn endpoint(&self, path: &str) -> Result<Url, VaultError> {
        Ok(self.config.base_url.join(path)?)
    }
}

fn map_send_error(err: reqwest::Error) -> VaultError {
    if err.is_timeout() {
        VaultError::Network("request timeout".to_string())
    } else {
        VaultError::Network(err.to_string())
    }
}

//! Token resolution with failure containment.
//!
//! [`TokenSource`] is the seam the facade depends on; [`TokenBroker`] is its
//! production implementation over the vault client. The broker maps every
//! failure mode to "absent": a missing or inactive connection is an expected
//! outcome, and a vault outage must degrade to "treat the user as
//! unconnected" rather than break booking flows.

use tracing::{debug, warn};

use calbridge_core::{AccessToken, BoxFuture, Provider};

use crate::client::{Connection, ConnectWidgetToken, VaultClient, VaultError};
use crate::config::VaultConfig;

/// Resolves per-user provider credentials.
///
/// Object-safe so the facade can be exercised against in-memory fakes.
pub trait TokenSource: Send + Sync {
    /// Resolves the access token for `(provider, user, organization)`.
    ///
    /// `None` means "not connected" — whether because no connection exists,
    /// the connection is inactive, or the vault could not be reached.
    fn get_token<'a>(
        &'a self,
        provider: Provider,
        user_id: &'a str,
        organization_id: &'a str,
    ) -> BoxFuture<'a, Option<AccessToken>>;

    /// Mints a short-lived token for the connection-management UI.
    ///
    /// Has no bearing on calendar reads or writes; it proxies the vault's
    /// token-issuance call with the same failure containment as
    /// [`get_token`](Self::get_token).
    fn connect_widget_token<'a>(
        &'a self,
        user_id: &'a str,
        organization_id: &'a str,
    ) -> BoxFuture<'a, Option<ConnectWidgetToken>>;
}

/// Production token source backed by the external token vault.
///
/// Stateless per call: tokens are looked up fresh every time so liveness
/// always reflects the vault's current state. Caching, if ever wanted,
/// belongs here with an explicit invalidation rule, never in the facade or
/// the adapters.
#[derive(Debug)]
pub struct TokenBroker {
    client: VaultClient,
}

impl TokenBroker {
    /// Creates a broker talking to the vault described by `config`.
    pub fn new(config: VaultConfig) -> Self {
        Self {
            client: VaultClient::new(config),
        }
    }
}

/// Maps a vault lookup outcome to a usable token.
///
/// Every non-token outcome collapses to `None`: missing and inactive
/// connections are expected states, and a vault failure must degrade to
/// "unconnected" rather than surface to callers. Only the diagnostics
/// differ per arm.
fn resolve_token(
    provider: Provider,
    user_id: &str,
    organization_id: &str,
    outcome: Result<Option<Connection>, VaultError>,
) -> Option<AccessToken> {
    match outcome {
        Ok(Some(connection)) if connection.is_active() => match connection.access_token {
            Some(secret) => Some(AccessToken::new(secret)),
            None => {
                warn!(
                    provider = %provider,
                    user = user_id,
                    org = organization_id,
                    "vault reported an active connection without a token"
                );
                None
            }
        },
        Ok(Some(_)) => {
            debug!(
                provider = %provider,
                user = user_id,
                org = organization_id,
                "provider connection is inactive"
            );
            None
        }
        Ok(None) => {
            debug!(
                provider = %provider,
                user = user_id,
                org = organization_id,
                "no provider connection"
            );
            None
        }
        Err(err) => {
            warn!(
                provider = %provider,
                user = user_id,
                org = organization_id,
                error = %err,
                "token vault lookup failed"
            );
            None
        }
    }
}

impl TokenSource for TokenBroker {
    fn get_token<'a>(
        &'a self,
        provider: Provider,
        user_id: &'a str,
        organization_id: &'a str,
    ) -> BoxFuture<'a, Option<AccessToken>> {
        Box::pin(async move {
            let outcome = self
                .client
                .fetch_connection(provider, user_id, organization_id)
                .await;
            resolve_token(provider, user_id, organization_id, outcome)
        })
    }

    fn connect_widget_token<'a>(
        &'a self,
        user_id: &'a str,
        organization_id: &'a str,
    ) -> BoxFuture<'a, Option<ConnectWidgetToken>> {
        Box::pin(async move {
            match self
                .client
                .issue_widget_token(user_id, organization_id)
                .await
            {
                Ok(token) => Some(token),
                Err(err) => {
                    warn!(
                        user = user_id,
                        org = organization_id,
                        error = %err,
                        "widget token issuance failed"
                    );
                    None
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connection(status: &str, token: Option<&str>) -> Connection {
        Connection {
            status: status.to_string(),
            access_token: token.map(str::to_owned),
        }
    }

    fn resolve(outcome: Result<Option<Connection>, VaultError>) -> Option<AccessToken> {
        resolve_token(Provider::Google, "u-1", "org-1", outcome)
    }

    #[test]
    fn active_connection_yields_token() {
        let token = resolve(Ok(Some(connection("active", Some("ya29.secret"))))).unwrap();
        assert_eq!(token.secret(), "ya29.secret");
        assert!(token.is_active());
    }

    #[test]
    fn active_connection_without_token_yields_none() {
        assert!(resolve(Ok(Some(connection("active", None)))).is_none());
    }

    #[test]
    fn inactive_connection_yields_none() {
        assert!(resolve(Ok(Some(connection("revoked", Some("stale"))))).is_none());
    }

    #[test]
    fn missing_connection_yields_none() {
        assert!(resolve(Ok(None)).is_none());
    }

    #[test]
    fn vault_failure_yields_none() {
        let outcome = Err(VaultError::Network("request timeout".to_string()));
        assert!(resolve(outcome).is_none());
    }
}

//! Access tokens resolved by the token broker.

use std::fmt;

/// An opaque bearer credential for one provider connection.
///
/// Owned by the token broker for the duration of a single operation. Neither
/// the facade nor the adapters may cache or persist it; liveness must always
/// reflect the vault's current state.
#[derive(Clone)]
pub struct AccessToken {
    secret: String,
    active: bool,
}

impl AccessToken {
    /// Creates an active token from its bearer secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            active: true,
        }
    }

    /// Builder: override the liveness flag reported by the vault.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// The bearer secret to attach to provider requests.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Whether the vault reported the underlying connection as live.
    pub fn is_active(&self) -> bool {
        self.active
    }
}

// Manual Debug so the bearer secret never lands in logs.
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &"<redacted>")
            .field("active", &self.active)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_active_by_default() {
        let token = AccessToken::new("ya29.secret");
        assert!(token.is_active());
        assert_eq!(token.secret(), "ya29.secret");
    }

    #[test]
    fn liveness_override() {
        let token = AccessToken::new("stale").with_active(false);
        assert!(!token.is_active());
    }

    #[test]
    fn debug_redacts_secret() {
        let rendered = format!("{:?}", AccessToken::new("ya29.secret"));
        assert!(!rendered.contains("ya29.secret"));
        assert!(rendered.contains("<redacted>"));
    }
}

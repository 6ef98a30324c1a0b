//! Provider tags for the supported external calendar systems.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifies which external calendar system an operation targets.
///
/// This is a closed set: adding a provider means adding an adapter
/// implementation, never branching on the tag in calling code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Google Calendar (Calendar API v3).
    Google,
    /// Microsoft Outlook (Microsoft Graph).
    Outlook,
}

impl Provider {
    /// Every supported provider, in aggregation fan-out order.
    pub const ALL: [Provider; 2] = [Provider::Google, Provider::Outlook];

    /// Returns the canonical lowercase name for this provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Outlook => "outlook",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown provider name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown calendar provider: {0}")]
pub struct ProviderParseError(String);

impl FromStr for Provider {
    type Err = ProviderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google" => Ok(Self::Google),
            "outlook" => Ok(Self::Outlook),
            other => Err(ProviderParseError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_parse_roundtrip() {
        for provider in Provider::ALL {
            let parsed: Provider = provider.as_str().parse().unwrap();
            assert_eq!(parsed, provider);
            assert_eq!(provider.to_string(), provider.as_str());
        }
    }

    #[test]
    fn parse_unknown_provider() {
        let err = "caldav".parse::<Provider>().unwrap_err();
        assert_eq!(err.to_string(), "unknown calendar provider: caldav");
    }

    #[test]
    fn serde_lowercase() {
        assert_eq!(serde_json::to_string(&Provider::Google).unwrap(), "\"google\"");
        let parsed: Provider = serde_json::from_str("\"outlook\"").unwrap();
        assert_eq!(parsed, Provider::Outlook);
    }
}

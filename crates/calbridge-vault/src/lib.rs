//! Token broker for the calendar integration layer.
//!
//! Resolves a per-user, per-provider OAuth access token from the external
//! token vault. The broker never issues or refreshes tokens itself, and it
//! never raises to its callers: an unreachable vault degrades to "treat the
//! user as unconnected" so booking flows keep working.

pub mod broker;
pub mod client;
pub mod config;

pub use broker::{TokenBroker, TokenSource};
pub use client::{Connection, ConnectWidgetToken, VaultClient, VaultError};
pub use config::VaultConfig;

//! Google Calendar adapter.
//!
//! Speaks the Calendar API v3. Each adapter call configures a fresh
//! [`client::GoogleClient`] with the caller's bearer token; free/busy covers
//! every requested calendar id in a single `freeBusy` round trip.

mod adapter;
mod client;

pub use adapter::GoogleAdapter;

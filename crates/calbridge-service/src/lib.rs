//! The calendar service facade.
//!
//! The single entry point the booking subsystem calls. Every public
//! operation resolves a token, dispatches to the right adapter, and converts
//! any failure into the operation's documented no-op value:
//!
//! ```text
//! caller ──▶ CalendarService ──▶ TokenSource ──▶ token | absent
//!                 │
//!                 └──▶ CalendarAdapter ──▶ provider wire call
//! ```
//!
//! Callers never need an error branch for calendar operations; diagnostics
//! leave this layer only through structured logs.

pub mod facade;

pub use facade::{CalendarService, FacadeConfig};

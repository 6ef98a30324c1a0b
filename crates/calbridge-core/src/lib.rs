//! Core types shared across the calendar integration layer.
//!
//! Everything in this crate is plain data: provider tags, time windows,
//! free/busy slots, event inputs and results, and access tokens. No component
//! in the layer retains state across calls, so nothing here has a lifecycle
//! beyond a single request/response cycle.

pub mod event;
pub mod future;
pub mod provider;
pub mod time;
pub mod token;
pub mod tracing;

pub use event::{BookedEvent, CalendarInfo, EventAttendee, EventDraft, EventPatch};
pub use future::BoxFuture;
pub use provider::{Provider, ProviderParseError};
pub use time::{FreeBusySlot, TimeWindow};
pub use token::AccessToken;
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};

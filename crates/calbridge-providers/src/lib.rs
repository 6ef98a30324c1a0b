//! CalendarAdapter trait and provider implementations.
//!
//! Each adapter translates the uniform five-operation contract (list
//! calendars, free/busy, create, update, delete) into one provider's wire
//! protocol and back:
//!
//! ```text
//! ┌──────────────────┐    ┌──────────────────┐
//! │ Google Calendar  │    │ Microsoft Graph  │
//! └────────┬─────────┘    └────────┬─────────┘
//!          │                       │
//!          ▼                       ▼
//! ┌──────────────────┐    ┌──────────────────┐
//! │  GoogleAdapter   │    │  OutlookAdapter  │
//! └────────┬─────────┘    └────────┬─────────┘
//!          │    CalendarAdapter    │
//!          └───────────┬───────────┘
//!                      ▼
//!           normalized core types
//! ```
//!
//! Adapters surface every non-success outcome as an [`AdapterError`] tagged
//! with the provider and failing operation; retry and suppression policy
//! belongs to the facade above, never here.

pub mod adapter;
pub mod error;
pub mod google;
mod http;
pub mod outlook;

pub use adapter::{CalendarAdapter, op};
pub use error::{AdapterError, AdapterErrorCode, AdapterResult};
pub use google::GoogleAdapter;
pub use outlook::OutlookAdapter;

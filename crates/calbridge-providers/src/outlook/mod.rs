//! Microsoft Outlook adapter.
//!
//! Speaks Microsoft Graph v1.0. Free/busy is resolved through the
//! principal's schedule rather than per calendar id, and the bearer token
//! rides on every request as an `Authorization` header.

mod adapter;
mod client;

pub use adapter::OutlookAdapter;

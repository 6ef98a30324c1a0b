//! Event and calendar data types.
//!
//! These are the normalized shapes exchanged between the facade, the
//! adapters, and the booking subsystem above: calendar metadata, event
//! inputs for create/update, and the provider-written event result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::provider::Provider;

/// A provider-owned calendar visible to the authenticated principal.
///
/// Fetched fresh on every call; this layer never caches calendar metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarInfo {
    /// Provider-side calendar identifier.
    pub id: String,
    /// Human-readable name of the calendar.
    pub name: String,
    /// Which provider owns this calendar.
    pub provider: Provider,
    /// Whether this is the principal's primary calendar.
    pub primary: bool,
    /// Whether the principal may write events to this calendar.
    pub writable: bool,
    /// Display color, if the provider exposes one.
    pub color: Option<String>,
    /// The calendar's IANA time zone, if the provider exposes one.
    pub timezone: Option<String>,
}

impl CalendarInfo {
    /// Creates a new calendar description with the given identity.
    pub fn new(provider: Provider, id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            provider,
            primary: false,
            writable: false,
            color: None,
            timezone: None,
        }
    }

    /// Builder: mark as the primary calendar.
    pub fn with_primary(mut self, primary: bool) -> Self {
        self.primary = primary;
        self
    }

    /// Builder: mark as writable by the principal.
    pub fn with_writable(mut self, writable: bool) -> Self {
        self.writable = writable;
        self
    }

    /// Builder: set the display color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Builder: set the IANA time zone.
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }
}

/// One attendee on an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAttendee {
    /// Attendee email address.
    pub email: String,
    /// Optional display name.
    pub display_name: Option<String>,
}

impl EventAttendee {
    /// Creates an attendee from an email address.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            display_name: None,
        }
    }

    /// Builder: set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

/// Input for creating a new provider-side event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    /// Event title.
    pub title: String,
    /// Start instant, UTC.
    pub start: DateTime<Utc>,
    /// End instant, UTC.
    pub end: DateTime<Utc>,
    /// Attendees to invite, attached pre-accepted where the provider allows.
    pub attendees: Vec<EventAttendee>,
    /// Optional event description.
    pub description: Option<String>,
    /// Originating IANA time zone for the start/end wall clock.
    ///
    /// Sent to the provider alongside the instants so the event keeps its
    /// intended zone; when absent, UTC is used.
    pub timezone: Option<String>,
    /// Whether to request a provider-generated video-meeting link at
    /// creation time.
    pub create_meet_link: bool,
}

impl EventDraft {
    /// Creates a draft with the required fields.
    pub fn new(title: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            start,
            end,
            attendees: Vec::new(),
            description: None,
            timezone: None,
            create_meet_link: false,
        }
    }

    /// Builder: add an attendee.
    pub fn with_attendee(mut self, attendee: EventAttendee) -> Self {
        self.attendees.push(attendee);
        self
    }

    /// Builder: set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder: set the originating time zone.
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    /// Builder: request a generated meeting link.
    pub fn with_meet_link(mut self, create: bool) -> Self {
        self.create_meet_link = create;
        self
    }
}

/// Partial input for updating an existing event.
///
/// Only fields that are `Some` are sent to the provider; absent fields must
/// not overwrite existing provider-side values. Every adapter upholds this
/// identically despite differing wire shapes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPatch {
    /// New title, if changing.
    pub title: Option<String>,
    /// New start instant, if changing.
    pub start: Option<DateTime<Utc>>,
    /// New end instant, if changing.
    pub end: Option<DateTime<Utc>>,
    /// Replacement attendee list, if changing.
    pub attendees: Option<Vec<EventAttendee>>,
    /// New description, if changing.
    pub description: Option<String>,
    /// New originating time zone for start/end, if changing.
    pub timezone: Option<String>,
}

impl EventPatch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no field is set.
    ///
    /// The facade short-circuits empty patches to a no-op instead of wasting
    /// a provider round trip on them.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.start.is_none()
            && self.end.is_none()
            && self.attendees.is_none()
            && self.description.is_none()
            && self.timezone.is_none()
    }

    /// Builder: set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Builder: set the start instant.
    pub fn with_start(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    /// Builder: set the end instant.
    pub fn with_end(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }

    /// Builder: replace the attendee list.
    pub fn with_attendees(mut self, attendees: Vec<EventAttendee>) -> Self {
        self.attendees = Some(attendees);
        self
    }

    /// Builder: set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder: set the time zone.
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }
}

/// The normalized result of a provider-side event write.
///
/// This is the only artifact callers are expected to persist; the layer
/// itself stores nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedEvent {
    /// The provider's identifier for the written event.
    pub event_id: String,
    /// Which provider the event was written to.
    pub provider: Provider,
    /// The calendar the event was written to.
    pub calendar_id: String,
    /// Join URL for the generated video meeting, when one was requested.
    pub meet_link: Option<String>,
    /// Human-viewable link to the event, if the provider exposes one.
    pub html_link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 5, h, min, 0).unwrap()
    }

    #[test]
    fn calendar_info_builder() {
        let info = CalendarInfo::new(Provider::Google, "cal-1", "Work")
            .with_primary(true)
            .with_writable(true)
            .with_timezone("Europe/Paris");

        assert_eq!(info.id, "cal-1");
        assert_eq!(info.provider, Provider::Google);
        assert!(info.primary);
        assert!(info.writable);
        assert_eq!(info.timezone.as_deref(), Some("Europe/Paris"));
        assert!(info.color.is_none());
    }

    #[test]
    fn draft_builder() {
        let draft = EventDraft::new("Intro call", utc(9, 0), utc(9, 30))
            .with_attendee(EventAttendee::new("guest@example.com").with_name("Guest"))
            .with_timezone("America/New_York")
            .with_meet_link(true);

        assert_eq!(draft.attendees.len(), 1);
        assert_eq!(draft.attendees[0].display_name.as_deref(), Some("Guest"));
        assert!(draft.create_meet_link);
        assert!(draft.description.is_none());
    }

    #[test]
    fn patch_emptiness() {
        assert!(EventPatch::new().is_empty());
        assert!(!EventPatch::new().with_title("Renamed").is_empty());
        assert!(!EventPatch::new().with_start(utc(10, 0)).is_empty());
        assert!(!EventPatch::new().with_attendees(vec![]).is_empty());
    }

    #[test]
    fn booked_event_serde_roundtrip() {
        let booked = BookedEvent {
            event_id: "evt-42".into(),
            provider: Provider::Outlook,
            calendar_id: "cal-1".into(),
            meet_link: Some("https://teams.microsoft.com/l/meetup-join/xyz".into()),
            html_link: None,
        };
        let json = serde_json::to_string(&booked).unwrap();
        let parsed: BookedEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, booked);
    }
}

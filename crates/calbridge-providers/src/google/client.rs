//! Google Calendar API wire client.
//!
//! Low-level HTTP client for the Calendar API v3: request building, payload
//! shapes, and response parsing. A fresh client is configured with the
//! bearer token for each adapter call; it holds no other state.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use calbridge_core::{EventDraft, EventPatch, TimeWindow};

use crate::error::AdapterResult;
use crate::http::{check_status, map_send_error, read_json};

/// Base URL for Google Calendar API v3.
const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Google Calendar API client, bound to one bearer token.
#[derive(Debug)]
pub(super) struct GoogleClient {
    http: reqwest::Client,
    access_token: String,
}

impl GoogleClient {
    /// Creates a client configured with the given access token.
    pub(super) fn new(access_token: impl Into<String>, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create HTTP client");
        Self {
            http,
            access_token: access_token.into(),
        }
    }

    /// Lists calendars visible to the token's principal, following
    /// pagination until the list is exhausted.
    pub(super) async fn list_calendars(&self) -> AdapterResult<Vec<CalendarListEntry>> {
        let url = format!("{CALENDAR_API_BASE}/users/me/calendarList");
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .http
                .get(&url)
                .bearer_auth(&self.access_token)
                .query(&[("maxResults", "250")]);
            if let Some(ref token) = page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = request.send().await.map_err(map_send_error)?;
            let page: CalendarListResponse = read_json(check_status(response).await?).await?;
            items.extend(page.items);

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!("listed {} google calendars", items.len());
        Ok(items)
    }

    /// Queries busy intervals for all given calendar ids in one round trip.
    pub(super) async fn free_busy(
        &self,
        calendar_ids: &[String],
        window: &TimeWindow,
    ) -> AdapterResult<FreeBusyResponse> {
        let url = format!("{CALENDAR_API_BASE}/freeBusy");

        let request = FreeBusyRequest {
            time_min: window.start.to_rfc3339(),
            time_max: window.end.to_rfc3339(),
            items: calendar_ids
                .iter()
                .map(|id| FreeBusyRequestItem { id: id.clone() })
                .collect(),
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await
            .map_err(map_send_error)?;

        read_json(check_status(response).await?).await
    }

    /// Creates an event, notifying attendees and honoring any conference
    /// creation request in the payload.
    pub(super) async fn insert_event(
        &self,
        calendar_id: &str,
        payload: &EventPayload,
    ) -> AdapterResult<ApiEvent> {
        let url = format!(
            "{CALENDAR_API_BASE}/calendars/{}/events",
            urlencoding::encode(calendar_id)
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .query(&[("sendUpdates", "all"), ("conferenceDataVersion", "1")])
            .json(payload)
            .send()
            .await
            .map_err(map_send_error)?;

        read_json(check_status(response).await?).await
    }

    /// Applies a partial update to an event.
    pub(super) async fn patch_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        payload: &EventPayload,
    ) -> AdapterResult<ApiEvent> {
        let url = format!(
            "{CALENDAR_API_BASE}/calendars/{}/events/{}",
            urlencoding::encode(calendar_id),
            urlencoding::encode(event_id)
        );

        let response = self
            .http
            .patch(&url)
            .bearer_auth(&self.access_token)
            .query(&[("sendUpdates", "all")])
            .json(payload)
            .send()
            .await
            .map_err(map_send_error)?;

        read_json(check_status(response).await?).await
    }

    /// Deletes an event, notifying attendees of the cancellation.
    pub(super) async fn delete_event(
        &self,
        calendar_id: &str,
        event_id: &str,
    ) -> AdapterResult<()> {
        let url = format!(
            "{CALENDAR_API_BASE}/calendars/{}/events/{}",
            urlencoding::encode(calendar_id),
            urlencoding::encode(event_id)
        );

        let response = self
            .http
            .delete(&url)
            .bearer_auth(&self.access_token)
            .query(&[("sendUpdates", "all")])
            .send()
            .await
            .map_err(map_send_error)?;

        check_status(response).await?;
        Ok(())
    }
}

// --- Request payloads ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FreeBusyRequest {
    time_min: String,
    time_max: String,
    items: Vec<FreeBusyRequestItem>,
}

#[derive(Debug, Serialize)]
struct FreeBusyRequestItem {
    id: String,
}

/// Event body for both insert and patch calls.
///
/// Every field is optional and skipped when absent, which is what makes the
/// partial-update contract hold on the wire: a patch built from an
/// [`EventPatch`] serializes only the fields the caller set.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct EventPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start: Option<EventDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end: Option<EventDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    attendees: Option<Vec<AttendeePayload>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    conference_data: Option<ConferencePayload>,
}

impl EventPayload {
    /// Builds the full insert body from a draft.
    pub(super) fn from_draft(draft: &EventDraft) -> Self {
        let timezone = draft.timezone.as_deref();
        Self {
            summary: Some(draft.title.clone()),
            description: draft.description.clone(),
            start: Some(EventDateTime::new(draft.start, timezone)),
            end: Some(EventDateTime::new(draft.end, timezone)),
            attendees: if draft.attendees.is_empty() {
                None
            } else {
                Some(draft.attendees.iter().map(AttendeePayload::accepted).collect())
            },
            conference_data: draft.create_meet_link.then(ConferencePayload::meet),
        }
    }

    /// Builds a patch body carrying only the fields set on the patch.
    ///
    /// A time zone in the patch only takes effect alongside a new start or
    /// end; Google attaches zones to datetime objects, not to the event.
    pub(super) fn from_patch(patch: &EventPatch) -> Self {
        let timezone = patch.timezone.as_deref();
        Self {
            summary: patch.title.clone(),
            description: patch.description.clone(),
            start: patch.start.map(|dt| EventDateTime::new(dt, timezone)),
            end: patch.end.map(|dt| EventDateTime::new(dt, timezone)),
            attendees: patch
                .attendees
                .as_ref()
                .map(|list| list.iter().map(AttendeePayload::accepted).collect()),
            conference_data: None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EventDateTime {
    date_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_zone: Option<String>,
}

impl EventDateTime {
    fn new(instant: chrono::DateTime<chrono::Utc>, timezone: Option<&str>) -> Self {
        Self {
            date_time: instant.to_rfc3339(),
            time_zone: timezone.map(str::to_owned),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AttendeePayload {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
    response_status: &'static str,
}

impl AttendeePayload {
    /// Attendee pre-marked accepted so the event shows confirmed on both
    /// sides without an RSVP round trip.
    fn accepted(attendee: &calbridge_core::EventAttendee) -> Self {
        Self {
            email: attendee.email.clone(),
            display_name: attendee.display_name.clone(),
            response_status: "accepted",
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConferencePayload {
    create_request: ConferenceCreateRequest,
}

impl ConferencePayload {
    fn meet() -> Self {
        Self {
            create_request: ConferenceCreateRequest {
                request_id: uuid::Uuid::new_v4().to_string(),
                conference_solution_key: ConferenceSolutionKey {
                    kind: "hangoutsMeet",
                },
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConferenceCreateRequest {
    request_id: String,
    conference_solution_key: ConferenceSolutionKey,
}

#[derive(Debug, Serialize)]
struct ConferenceSolutionKey {
    #[serde(rename = "type")]
    kind: &'static str,
}

// --- Response shapes ---

/// An event as returned by insert/patch calls.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ApiEvent {
    pub(super) id: Option<String>,
    pub(super) hangout_link: Option<String>,
    pub(super) html_link: Option<String>,
}

/// Response from the freeBusy endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct FreeBusyResponse {
    #[serde(default)]
    pub(super) calendars: HashMap<String, FreeBusyCalendar>,
}

#[derive(Debug, Deserialize)]
pub(super) struct FreeBusyCalendar {
    #[serde(default)]
    pub(super) busy: Vec<ApiPeriod>,
    /// Per-calendar lookup failures Google reports inside a 2xx response,
    /// e.g. an unknown or inaccessible calendar id.
    #[serde(default)]
    pub(super) errors: Vec<ApiCalendarError>,
}

/// One per-calendar error from the freeBusy endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct ApiCalendarError {
    #[serde(default)]
    pub(super) domain: String,
    #[serde(default)]
    pub(super) reason: String,
}

/// A busy period, RFC 3339 instants.
#[derive(Debug, Deserialize)]
pub(super) struct ApiPeriod {
    pub(super) start: String,
    pub(super) end: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarListResponse {
    #[serde(default)]
    items: Vec<CalendarListEntry>,
    next_page_token: Option<String>,
}

/// A calendar from the calendarList endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CalendarListEntry {
    pub(super) id: String,
    pub(super) summary: String,
    pub(super) access_role: Option<GoogleAccessRole>,
    #[serde(default)]
    pub(super) primary: bool,
    pub(super) time_zone: Option<String>,
    pub(super) background_color: Option<String>,
}

/// Google calendar access roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) enum GoogleAccessRole {
    Owner,
    Writer,
    Reader,
    FreeBusyReader,
}

impl GoogleAccessRole {
    /// Owner and writer roles may create and modify events.
    pub(super) fn is_writable(&self) -> bool {
        matches!(self, Self::Owner | Self::Writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calbridge_core::EventAttendee;
    use chrono::{TimeZone, Utc};

    fn utc(h: u32, min: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 5, h, min, 0).unwrap()
    }

    #[test]
    fn parse_calendar_list() {
        let json = r#"{
            "items": [
                {
                    "id": "primary",
                    "summary": "My Calendar",
                    "accessRole": "owner",
                    "primary": true,
                    "timeZone": "America/New_York"
                },
                {
                    "id": "team@example.com",
                    "summary": "Team",
                    "accessRole": "freeBusyReader"
                }
            ]
        }"#;

        let response: CalendarListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.items.len(), 2);
        assert!(response.items[0].primary);
        assert!(response.items[0].access_role.unwrap().is_writable());
        assert!(!response.items[1].access_role.unwrap().is_writable());
        assert!(response.next_page_token.is_none());
    }

    #[test]
    fn parse_calendar_list_page_token() {
        let json = r#"{
            "items": [{"id": "a@example.com", "summary": "A"}],
            "nextPageToken": "tok-2"
        }"#;

        let response: CalendarListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.items.len(), 1);
        assert_eq!(response.next_page_token.as_deref(), Some("tok-2"));
    }

    #[test]
    fn access_role_writability() {
        assert!(GoogleAccessRole::Owner.is_writable());
        assert!(GoogleAccessRole::Writer.is_writable());
        assert!(!GoogleAccessRole::Reader.is_writable());
        assert!(!GoogleAccessRole::FreeBusyReader.is_writable());
    }

    #[test]
    fn parse_free_busy_response() {
        let json = r#"{
            "calendars": {
                "primary": {
                    "busy": [
                        {"start": "2026-02-05T09:00:00Z", "end": "2026-02-05T09:30:00Z"},
                        {"start": "2026-02-05T14:00:00Z", "end": "2026-02-05T15:00:00Z"}
                    ]
                },
                "empty@example.com": {}
            }
        }"#;

        let response: FreeBusyResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.calendars["primary"].busy.len(), 2);
        assert!(response.calendars["empty@example.com"].busy.is_empty());
        assert!(response.calendars["primary"].errors.is_empty());
    }

    #[test]
    fn parse_free_busy_calendar_errors() {
        let json = r#"{
            "calendars": {
                "inaccessible@example.com": {
                    "errors": [{"domain": "global", "reason": "notFound"}]
                }
            }
        }"#;

        let response: FreeBusyResponse = serde_json::from_str(json).unwrap();
        let calendar = &response.calendars["inaccessible@example.com"];
        assert!(calendar.busy.is_empty());
        assert_eq!(calendar.errors.len(), 1);
        assert_eq!(calendar.errors[0].reason, "notFound");
    }

    #[test]
    fn parse_inserted_event() {
        let json = r#"{
            "id": "evt-1",
            "hangoutLink": "https://meet.google.com/abc-defg-hij",
            "htmlLink": "https://calendar.google.com/event?eid=xyz"
        }"#;

        let event: ApiEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.id.as_deref(), Some("evt-1"));
        assert!(event.hangout_link.is_some());
    }

    #[test]
    fn draft_payload_with_meet_link() {
        let draft = calbridge_core::EventDraft::new("Intro call", utc(9, 0), utc(9, 30))
            .with_attendee(EventAttendee::new("guest@example.com").with_name("Guest"))
            .with_timezone("Europe/Paris")
            .with_meet_link(true);

        let value = serde_json::to_value(EventPayload::from_draft(&draft)).unwrap();
        assert_eq!(value["summary"], "Intro call");
        assert_eq!(value["start"]["timeZone"], "Europe/Paris");
        assert_eq!(value["attendees"][0]["email"], "guest@example.com");
        assert_eq!(value["attendees"][0]["responseStatus"], "accepted");
        assert_eq!(
            value["conferenceData"]["createRequest"]["conferenceSolutionKey"]["type"],
            "hangoutsMeet"
        );
    }

    #[test]
    fn draft_payload_without_meet_link() {
        let draft = calbridge_core::EventDraft::new("Intro call", utc(9, 0), utc(9, 30));
        let value = serde_json::to_value(EventPayload::from_draft(&draft)).unwrap();
        assert!(value.get("conferenceData").is_none());
        assert!(value.get("attendees").is_none());
    }

    #[test]
    fn patch_payload_carries_only_set_fields() {
        let patch = calbridge_core::EventPatch::new().with_title("Renamed");
        let value = serde_json::to_value(EventPayload::from_patch(&patch)).unwrap();
        assert_eq!(value["summary"], "Renamed");
        assert!(value.get("start").is_none());
        assert!(value.get("end").is_none());
        assert!(value.get("description").is_none());
        assert!(value.get("attendees").is_none());
    }

    #[test]
    fn patch_payload_timezone_attaches_to_new_times() {
        let patch = calbridge_core::EventPatch::new()
            .with_start(utc(10, 0))
            .with_timezone("Asia/Tokyo");
        let value = serde_json::to_value(EventPayload::from_patch(&patch)).unwrap();
        assert_eq!(value["start"]["timeZone"], "Asia/Tokyo");
        assert!(value.get("end").is_none());
    }
}

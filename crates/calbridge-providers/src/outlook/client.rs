//! Microsoft Graph wire client.
//!
//! Plain REST over HTTP: one shared `reqwest` client, with the caller's
//! bearer token attached as an `Authorization` header on every request.
//! Free/busy comes from the principal's schedule (`getSchedule`), not from
//! per-calendar queries; the adapter absorbs that asymmetry.

use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use calbridge_core::{EventDraft, EventPatch, TimeWindow};

use crate::error::{AdapterError, AdapterResult};
use crate::http::{check_status, map_send_error, read_json};

/// Base URL for Microsoft Graph v1.0.
const GRAPH_API_BASE: &str = "https://graph.microsoft.com/v1.0";

/// Microsoft Graph client.
///
/// Unlike the Google client this is built once per adapter, not per call:
/// the token is not baked in but sent per request.
#[derive(Debug)]
pub(super) struct GraphClient {
    http: reqwest::Client,
}

impl GraphClient {
    /// Creates a client with the given per-request timeout.
    pub(super) fn new(timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create HTTP client");
        Self { http }
    }

    /// Fetches the authenticated principal's profile.
    pub(super) async fn me(&self, token: &str) -> AdapterResult<GraphUser> {
        let response = self
            .http
            .get(format!("{GRAPH_API_BASE}/me"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(map_send_error)?;
        read_json(check_status(response).await?).await
    }

    /// Lists calendars visible to the principal, following `@odata.nextLink`
    /// until the collection is exhausted.
    pub(super) async fn list_calendars(&self, token: &str) -> AdapterResult<Vec<GraphCalendar>> {
        let mut url = format!("{GRAPH_API_BASE}/me/calendars");
        let mut calendars = Vec::new();

        loop {
            let response = self
                .http
                .get(&url)
                .bearer_auth(token)
                .send()
                .await
                .map_err(map_send_error)?;
            let page: GraphCollection<GraphCalendar> =
                read_json(check_status(response).await?).await?;
            calendars.extend(page.value);

            match page.next_link {
                Some(next) => url = next,
                None => break,
            }
        }

        Ok(calendars)
    }

    /// Queries the principal's schedule for busy information.
    pub(super) async fn get_schedule(
        &self,
        token: &str,
        address: &str,
        window: &TimeWindow,
    ) -> AdapterResult<Vec<ScheduleItem>> {
        let request = ScheduleRequest {
            schedules: vec![address.to_string()],
            start_time: GraphDateTimeZone::from_utc(window.start, None)?,
            end_time: GraphDateTimeZone::from_utc(window.end, None)?,
            availability_view_interval: 15,
        };

        let response = self
            .http
            .post(format!("{GRAPH_API_BASE}/me/calendar/getSchedule"))
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
            .map_err(map_send_error)?;

        let collection: GraphCollection<ScheduleInfo> =
            read_json(check_status(response).await?).await?;
        Ok(collection
            .value
            .into_iter()
            .flat_map(|info| info.schedule_items)
            .collect())
    }

    /// Creates an event. Graph sends invitations to attendees itself, and
    /// cancellation notices on delete, so there is no send-updates knob.
    pub(super) async fn create_event(
        &self,
        token: &str,
        calendar_id: &str,
        payload: &GraphEventPayload,
    ) -> AdapterResult<GraphEvent> {
        let url = format!(
            "{GRAPH_API_BASE}/me/calendars/{}/events",
            urlencoding::encode(calendar_id)
        );
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(payload)
            .send()
            .await
            .map_err(map_send_error)?;
        read_json(check_status(response).await?).await
    }

    /// Applies a partial update to an event.
    pub(super) async fn update_event(
        &self,
        token: &str,
        calendar_id: &str,
        event_id: &str,
        payload: &GraphEventPayload,
    ) -> AdapterResult<GraphEvent> {
        let url = format!(
            "{GRAPH_API_BASE}/me/calendars/{}/events/{}",
            urlencoding::encode(calendar_id),
            urlencoding::encode(event_id)
        );
        let response = self
            .http
            .patch(&url)
            .bearer_auth(token)
            .json(payload)
            .send()
            .await
            .map_err(map_send_error)?;
        read_json(check_status(response).await?).await
    }

    /// Deletes an event.
    pub(super) async fn delete_event(
        &self,
        token: &str,
        calendar_id: &str,
        event_id: &str,
    ) -> AdapterResult<()> {
        let url = format!(
            "{GRAPH_API_BASE}/me/calendars/{}/events/{}",
            urlencoding::encode(calendar_id),
            urlencoding::encode(event_id)
        );
        let response = self
            .http
            .delete(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(map_send_error)?;
        check_status(response).await?;
        Ok(())
    }
}

/// Schedule statuses that count as occupied.
///
/// Free and permissive out-of-office-style statuses (`workingElsewhere`,
/// `oof`) do not block booking.
pub(super) fn is_occupied(status: &str) -> bool {
    matches!(status, "busy" | "tentative")
}

// --- Wire shapes ---

/// Graph's split date-time representation: a zone-local wall clock plus the
/// zone it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GraphDateTimeZone {
    pub(super) date_time: String,
    pub(super) time_zone: String,
}

impl GraphDateTimeZone {
    /// Renders a UTC instant in the given IANA zone (UTC when absent).
    pub(super) fn from_utc(
        instant: DateTime<Utc>,
        timezone: Option<&str>,
    ) -> AdapterResult<Self> {
        match timezone {
            Some(name) => {
                let tz: chrono_tz::Tz = name.parse().map_err(|_| {
                    AdapterError::bad_request(format!("unknown time zone: {name}"))
                })?;
                Ok(Self {
                    date_time: instant
                        .with_timezone(&tz)
                        .format("%Y-%m-%dT%H:%M:%S")
                        .to_string(),
                    time_zone: name.to_string(),
                })
            }
            None => Ok(Self {
                date_time: instant.format("%Y-%m-%dT%H:%M:%S").to_string(),
                time_zone: "UTC".to_string(),
            }),
        }
    }

    /// Resolves this wall-clock/zone pair back to an absolute instant.
    pub(super) fn to_utc(&self) -> AdapterResult<DateTime<Utc>> {
        let naive = NaiveDateTime::parse_from_str(&self.date_time, "%Y-%m-%dT%H:%M:%S%.f")
            .map_err(|e| {
                AdapterError::invalid_response(format!("bad schedule timestamp: {e}"))
            })?;
        let tz: chrono_tz::Tz = self.time_zone.parse().map_err(|_| {
            AdapterError::invalid_response(format!("unknown response time zone: {}", self.time_zone))
        })?;
        naive
            .and_local_timezone(tz)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| {
                AdapterError::invalid_response(format!(
                    "unresolvable local time {} in {}",
                    self.date_time, self.time_zone
                ))
            })
    }
}

#[derive(Debug, Deserialize)]
struct GraphCollection<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
    /// Absolute URL of the next page, when the collection is paged.
    #[serde(rename = "@odata.nextLink")]
    next_link: Option<String>,
}

/// The authenticated principal, as much of it as free/busy needs.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GraphUser {
    pub(super) mail: Option<String>,
    pub(super) user_principal_name: Option<String>,
}

impl GraphUser {
    /// The SMTP address `getSchedule` expects for this principal.
    pub(super) fn schedule_address(self) -> AdapterResult<String> {
        self.mail
            .or(self.user_principal_name)
            .ok_or_else(|| AdapterError::invalid_response("principal has no resolvable address"))
    }
}

/// A calendar from `/me/calendars`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GraphCalendar {
    pub(super) id: String,
    pub(super) name: String,
    #[serde(default)]
    pub(super) is_default_calendar: bool,
    #[serde(default)]
    pub(super) can_edit: bool,
    pub(super) hex_color: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleRequest {
    schedules: Vec<String>,
    start_time: GraphDateTimeZone,
    end_time: GraphDateTimeZone,
    availability_view_interval: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleInfo {
    #[serde(default)]
    schedule_items: Vec<ScheduleItem>,
}

/// One interval from a schedule response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ScheduleItem {
    pub(super) status: String,
    pub(super) start: GraphDateTimeZone,
    pub(super) end: GraphDateTimeZone,
}

/// Event body for both create and update calls.
///
/// Mirrors the Google payload's rule: absent fields are skipped so a patch
/// never clobbers provider-side values it did not mention.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GraphEventPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<GraphItemBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start: Option<GraphDateTimeZone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end: Option<GraphDateTimeZone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    attendees: Option<Vec<GraphAttendee>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_requested: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_online_meeting: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    online_meeting_provider: Option<&'static str>,
}

impl GraphEventPayload {
    /// Builds the full create body from a draft.
    pub(super) fn from_draft(draft: &EventDraft) -> AdapterResult<Self> {
        let timezone = draft.timezone.as_deref();
        Ok(Self {
            subject: Some(draft.title.clone()),
            body: draft.description.as_ref().map(|text| GraphItemBody {
                content_type: "text",
                content: text.clone(),
            }),
            start: Some(GraphDateTimeZone::from_utc(draft.start, timezone)?),
            end: Some(GraphDateTimeZone::from_utc(draft.end, timezone)?),
            attendees: if draft.attendees.is_empty() {
                None
            } else {
                Some(draft.attendees.iter().map(GraphAttendee::required).collect())
            },
            // Graph has no accept-on-behalf knob; not requesting responses is
            // the closest the protocol gets to a pre-confirmed invite.
            response_requested: Some(false),
            is_online_meeting: draft.create_meet_link.then_some(true),
            online_meeting_provider: draft.create_meet_link.then_some("teamsForBusiness"),
        })
    }

    /// Builds an update body carrying only the fields set on the patch.
    pub(super) fn from_patch(patch: &EventPatch) -> AdapterResult<Self> {
        let timezone = patch.timezone.as_deref();
        Ok(Self {
            subject: patch.title.clone(),
            body: patch.description.as_ref().map(|text| GraphItemBody {
                content_type: "text",
                content: text.clone(),
            }),
            start: match patch.start {
                Some(dt) => Some(GraphDateTimeZone::from_utc(dt, timezone)?),
                None => None,
            },
            end: match patch.end {
                Some(dt) => Some(GraphDateTimeZone::from_utc(dt, timezone)?),
                None => None,
            },
            attendees: patch
                .attendees
                .as_ref()
                .map(|list| list.iter().map(GraphAttendee::required).collect()),
            response_requested: None,
            is_online_meeting: None,
            online_meeting_provider: None,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphItemBody {
    content_type: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct GraphAttendee {
    #[serde(rename = "emailAddress")]
    email_address: GraphEmailAddress,
    #[serde(rename = "type")]
    kind: &'static str,
}

impl GraphAttendee {
    fn required(attendee: &calbridge_core::EventAttendee) -> Self {
        Self {
            email_address: GraphEmailAddress {
                address: attendee.email.clone(),
                name: attendee.display_name.clone(),
            },
            kind: "required",
        }
    }
}

#[derive(Debug, Serialize)]
struct GraphEmailAddress {
    address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

/// An event as returned by create/update calls.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GraphEvent {
    pub(super) id: Option<String>,
    pub(super) web_link: Option<String>,
    pub(super) online_meeting: Option<GraphOnlineMeeting>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GraphOnlineMeeting {
    pub(super) join_url: Option<String>,
}

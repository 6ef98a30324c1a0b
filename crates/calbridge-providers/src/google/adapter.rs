//! [`CalendarAdapter`] implementation for Google Calendar.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::warn;

use calbridge_core::{
    AccessToken, BookedEvent, BoxFuture, CalendarInfo, EventDraft, EventPatch, FreeBusySlot,
    Provider, TimeWindow,
};

use crate::adapter::{CalendarAdapter, op};
use crate::error::{AdapterError, AdapterResult};

use super::client::{
    ApiPeriod, CalendarListEntry, EventPayload, FreeBusyResponse, GoogleClient,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Google Calendar adapter.
///
/// Holds only the per-call timeout; the API client is rebuilt per operation
/// with the token supplied by the caller, so nothing survives a request.
#[derive(Debug, Clone)]
pub struct GoogleAdapter {
    timeout: Duration,
}

impl GoogleAdapter {
    /// Creates an adapter with the default per-call timeout.
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Builder: set the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn client(&self, token: &AccessToken) -> GoogleClient {
        GoogleClient::new(token.secret(), self.timeout)
    }
}

impl Default for GoogleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl CalendarAdapter for GoogleAdapter {
    fn provider(&self) -> Provider {
        Provider::Google
    }

    fn list_calendars<'a>(
        &'a self,
        token: &'a AccessToken,
    ) -> BoxFuture<'a, AdapterResult<Vec<CalendarInfo>>> {
        Box::pin(async move {
            let entries = self
                .client(token)
                .list_calendars()
                .await
                .map_err(|e| e.with_context(Provider::Google, op::LIST_CALENDARS))?;
            Ok(entries.into_iter().map(to_calendar_info).collect())
        })
    }

    fn get_free_busy<'a>(
        &'a self,
        token: &'a AccessToken,
        calendar_ids: &'a [String],
        window: &'a TimeWindow,
    ) -> BoxFuture<'a, AdapterResult<Vec<FreeBusySlot>>> {
        Box::pin(async move {
            let ids: Vec<String> = if calendar_ids.is_empty() {
                vec!["primary".to_string()]
            } else {
                calendar_ids.to_vec()
            };

            let response = self
                .client(token)
                .free_busy(&ids, window)
                .await
                .map_err(|e| e.with_context(Provider::Google, op::GET_FREE_BUSY))?;

            collect_busy(&response, &ids, window)
                .map_err(|e| e.with_context(Provider::Google, op::GET_FREE_BUSY))
        })
    }

    fn create_event<'a>(
        &'a self,
        token: &'a AccessToken,
        calendar_id: &'a str,
        draft: &'a EventDraft,
    ) -> BoxFuture<'a, AdapterResult<BookedEvent>> {
        Box::pin(async move {
            let payload = EventPayload::from_draft(draft);
            let event = self
                .client(token)
                .insert_event(calendar_id, &payload)
                .await
                .map_err(|e| e.with_context(Provider::Google, op::CREATE_EVENT))?;
            to_booked(event.id, event.hangout_link, event.html_link, calendar_id)
                .map_err(|e| e.with_context(Provider::Google, op::CREATE_EVENT))
        })
    }

    fn update_event<'a>(
        &'a self,
        token: &'a AccessToken,
        calendar_id: &'a str,
        event_id: &'a str,
        patch: &'a EventPatch,
    ) -> BoxFuture<'a, AdapterResult<BookedEvent>> {
        Box::pin(async move {
            let payload = EventPayload::from_patch(patch);
            let event = self
                .client(token)
                .patch_event(calendar_id, event_id, &payload)
                .await
                .map_err(|e| e.with_context(Provider::Google, op::UPDATE_EVENT))?;
            to_booked(event.id, event.hangout_link, event.html_link, calendar_id)
                .map_err(|e| e.with_context(Provider::Google, op::UPDATE_EVENT))
        })
    }

    fn delete_event<'a>(
        &'a self,
        token: &'a AccessToken,
        calendar_id: &'a str,
        event_id: &'a str,
    ) -> BoxFuture<'a, AdapterResult<()>> {
        Box::pin(async move {
            self.client(token)
                .delete_event(calendar_id, event_id)
                .await
                .map_err(|e| e.with_context(Provider::Google, op::DELETE_EVENT))
        })
    }
}

fn to_calendar_info(entry: CalendarListEntry) -> CalendarInfo {
    let writable = entry
        .access_role
        .map(|role| role.is_writable())
        .unwrap_or(false);

    let mut info = CalendarInfo::new(Provider::Google, entry.id, entry.summary)
        .with_primary(entry.primary)
        .with_writable(writable);
    if let Some(tz) = entry.time_zone {
        info = info.with_timezone(tz);
    }
    if let Some(color) = entry.background_color {
        info = info.with_color(color);
    }
    info
}

/// Flattens a freeBusy response into clipped slots.
///
/// Walks ids in request order so the provider's own chronological ordering
/// within each calendar is preserved. A calendar with per-calendar errors
/// contributes nothing but is logged; Google reports these inside a 2xx
/// response, so they would otherwise be invisible.
fn collect_busy(
    response: &FreeBusyResponse,
    ids: &[String],
    window: &TimeWindow,
) -> AdapterResult<Vec<FreeBusySlot>> {
    let mut slots = Vec::new();
    for id in ids {
        let Some(calendar) = response.calendars.get(id) else {
            continue;
        };
        for error in &calendar.errors {
            warn!(
                calendar = %id,
                domain = %error.domain,
                reason = %error.reason,
                "free/busy lookup failed for calendar"
            );
        }
        for period in &calendar.busy {
            let slot = parse_period(period)?;
            if let Some(clipped) = slot.clip_to(window) {
                slots.push(clipped);
            }
        }
    }
    Ok(slots)
}

fn parse_period(period: &ApiPeriod) -> AdapterResult<FreeBusySlot> {
    let start = parse_instant(&period.start)?;
    let end = parse_instant(&period.end)?;
    Ok(FreeBusySlot::new(start, end))
}

fn parse_instant(value: &str) -> AdapterResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AdapterError::invalid_response(format!("bad busy period timestamp: {e}")))
}

fn to_booked(
    event_id: Option<String>,
    meet_link: Option<String>,
    html_link: Option<String>,
    calendar_id: &str,
) -> AdapterResult<BookedEvent> {
    let event_id =
        event_id.ok_or_else(|| AdapterError::invalid_response("event response missing id"))?;
    Ok(BookedEvent {
        event_id,
        provider: Provider::Google,
        calendar_id: calendar_id.to_string(),
        meet_link,
        html_link,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::client::GoogleAccessRole;
    use chrono::TimeZone;

    fn utc(h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 5, h, min, 0).unwrap()
    }

    fn entry(json: &str) -> CalendarListEntry {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn owner_calendar_maps_writable() {
        let info = to_calendar_info(entry(
            r#"{"id": "primary", "summary": "Mine", "accessRole": "owner", "primary": true}"#,
        ));
        assert!(info.writable);
        assert!(info.primary);
        assert_eq!(info.provider, Provider::Google);
    }

    #[test]
    fn reader_calendar_maps_read_only() {
        let info = to_calendar_info(entry(
            r#"{"id": "team@example.com", "summary": "Team", "accessRole": "reader"}"#,
        ));
        assert!(!info.writable);
        assert!(!info.primary);
    }

    #[test]
    fn missing_access_role_defaults_read_only() {
        let info = to_calendar_info(entry(r#"{"id": "x", "summary": "X"}"#));
        assert!(!info.writable);
    }

    #[test]
    fn role_mapping_is_exhaustive_for_writers() {
        assert!(GoogleAccessRole::Owner.is_writable());
        assert!(!GoogleAccessRole::FreeBusyReader.is_writable());
    }

    #[test]
    fn errored_calendars_contribute_no_slots() {
        let response: FreeBusyResponse = serde_json::from_str(
            r#"{
                "calendars": {
                    "primary": {
                        "busy": [
                            {"start": "2026-02-05T09:00:00Z", "end": "2026-02-05T09:30:00Z"}
                        ]
                    },
                    "inaccessible@example.com": {
                        "errors": [{"domain": "global", "reason": "notFound"}]
                    }
                }
            }"#,
        )
        .unwrap();
        let ids = vec!["primary".to_string(), "inaccessible@example.com".to_string()];
        let window = TimeWindow::new(utc(8, 0), utc(18, 0));

        let slots = collect_busy(&response, &ids, &window).unwrap();
        assert_eq!(slots, vec![FreeBusySlot::new(utc(9, 0), utc(9, 30))]);
    }

    #[test]
    fn collect_busy_preserves_request_order_and_clips() {
        let response: FreeBusyResponse = serde_json::from_str(
            r#"{
                "calendars": {
                    "b@example.com": {
                        "busy": [
                            {"start": "2026-02-05T14:00:00Z", "end": "2026-02-05T15:00:00Z"}
                        ]
                    },
                    "a@example.com": {
                        "busy": [
                            {"start": "2026-02-05T07:00:00Z", "end": "2026-02-05T09:00:00Z"}
                        ]
                    }
                }
            }"#,
        )
        .unwrap();
        let ids = vec!["a@example.com".to_string(), "b@example.com".to_string()];
        let window = TimeWindow::new(utc(8, 0), utc(18, 0));

        let slots = collect_busy(&response, &ids, &window).unwrap();
        assert_eq!(
            slots,
            vec![
                FreeBusySlot::new(utc(8, 0), utc(9, 0)),
                FreeBusySlot::new(utc(14, 0), utc(15, 0)),
            ]
        );
    }

    #[test]
    fn parse_period_rfc3339_offsets() {
        let period = ApiPeriod {
            start: "2026-02-05T10:00:00+01:00".into(),
            end: "2026-02-05T10:30:00+01:00".into(),
        };
        let slot = parse_period(&period).unwrap();
        assert_eq!(slot.start, utc(9, 0));
        assert_eq!(slot.end, utc(9, 30));
    }

    #[test]
    fn parse_period_rejects_garbage() {
        let period = ApiPeriod {
            start: "yesterday".into(),
            end: "2026-02-05T10:30:00Z".into(),
        };
        let err = parse_period(&period).unwrap_err();
        assert_eq!(err.code(), crate::AdapterErrorCode::InvalidResponse);
    }

    #[test]
    fn booked_event_requires_id() {
        let err = to_booked(None, None, None, "primary").unwrap_err();
        assert_eq!(err.code(), crate::AdapterErrorCode::InvalidResponse);

        let booked = to_booked(
            Some("evt-1".into()),
            Some("https://meet.google.com/abc".into()),
            None,
            "primary",
        )
        .unwrap();
        assert_eq!(booked.event_id, "evt-1");
        assert_eq!(booked.meet_link.as_deref(), Some("https://meet.google.com/abc"));
    }
}

//! [`CalendarAdapter`] implementation for Microsoft Outlook.

use std::time::Duration;

use calbridge_core::{
    AccessToken, BookedEvent, BoxFuture, CalendarInfo, EventDraft, EventPatch, FreeBusySlot,
    Provider, TimeWindow,
};

use crate::adapter::{CalendarAdapter, op};
use crate::error::{AdapterError, AdapterResult};

use super::client::{GraphCalendar, GraphClient, GraphEvent, GraphEventPayload, is_occupied};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Microsoft Outlook adapter.
#[derive(Debug)]
pub struct OutlookAdapter {
    client: GraphClient,
}

impl OutlookAdapter {
    /// Creates an adapter with the default per-call timeout.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Creates an adapter with the given per-call timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: GraphClient::new(timeout),
        }
    }
}

impl Default for OutlookAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl CalendarAdapter for OutlookAdapter {
    fn provider(&self) -> Provider {
        Provider::Outlook
    }

    fn list_calendars<'a>(
        &'a self,
        token: &'a AccessToken,
    ) -> BoxFuture<'a, AdapterResult<Vec<CalendarInfo>>> {
        Box::pin(async move {
            let calendars = self
                .client
                .list_calendars(token.secret())
                .await
                .map_err(|e| e.with_context(Provider::Outlook, op::LIST_CALENDARS))?;
            Ok(calendars.into_iter().map(to_calendar_info).collect())
        })
    }

    fn get_free_busy<'a>(
        &'a self,
        token: &'a AccessToken,
        _calendar_ids: &'a [String],
        window: &'a TimeWindow,
    ) -> BoxFuture<'a, AdapterResult<Vec<FreeBusySlot>>> {
        Box::pin(async move {
            // Graph reports busy information per principal, not per calendar
            // id, so the requested ids do not narrow this query.
            let address = self
                .client
                .me(token.secret())
                .await
                .and_then(|user| user.schedule_address())
                .map_err(|e| e.with_context(Provider::Outlook, op::GET_FREE_BUSY))?;

            let items = self
                .client
                .get_schedule(token.secret(), &address, window)
                .await
                .map_err(|e| e.with_context(Provider::Outlook, op::GET_FREE_BUSY))?;

            let mut slots = Vec::new();
            for item in items {
                if !is_occupied(&item.status) {
                    continue;
                }
                let start = item
                    .start
                    .to_utc()
                    .map_err(|e| e.with_context(Provider::Outlook, op::GET_FREE_BUSY))?;
                let end = item
                    .end
                    .to_utc()
                    .map_err(|e| e.with_context(Provider::Outlook, op::GET_FREE_BUSY))?;
                if let Some(clipped) = FreeBusySlot::new(start, end).clip_to(window) {
                    slots.push(clipped);
                }
            }
            Ok(slots)
        })
    }

    fn create_event<'a>(
        &'a self,
        token: &'a AccessToken,
        calendar_id: &'a str,
        draft: &'a EventDraft,
    ) -> BoxFuture<'a, AdapterResult<BookedEvent>> {
        Box::pin(async move {
            let payload = GraphEventPayload::from_draft(draft)
                .map_err(|e| e.with_context(Provider::Outlook, op::CREATE_EVENT))?;
            let event = self
                .client
                .create_event(token.secret(), calendar_id, &payload)
                .await
                .map_err(|e| e.with_context(Provider::Outlook, op::CREATE_EVENT))?;
            to_booked(event, calendar_id)
                .map_err(|e| e.with_context(Provider::Outlook, op::CREATE_EVENT))
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
            let payload = GraphEventPayload::from_patch(patch)
                .map_err(|e| e.with_context(Provider::Outlook, op::UPDATE_EVENT))?;
            let event = self
                .client
                .update_event(token.secret(), calendar_id, event_id, &payload)
                .await
                .map_err(|e| e.with_context(Provider::Outlook, op::UPDATE_EVENT))?;
            to_booked(event, calendar_id)
                .map_err(|e| e.with_context(Provider::Outlook, op::UPDATE_EVENT))
        })
    }

    fn delete_event<'a>(
        &'a self,
        token: &'a AccessToken,
        calendar_id: &'a str,
        event_id: &'a str,
    ) -> BoxFuture<'a, AdapterResult<()>> {
        Box::pin(async move {
            self.client
                .delete_event(token.secret(), calendar_id, event_id)
                .await
                .map_err(|e| e.with_context(Provider::Outlook, op::DELETE_EVENT))
        })
    }
}

fn to_calendar_info(calendar: GraphCalendar) -> CalendarInfo {
    let mut info = CalendarInfo::new(Provider::Outlook, calendar.id, calendar.name)
        .with_primary(calendar.is_default_calendar)
        .with_writable(calendar.can_edit);
    if let Some(color) = calendar.hex_color {
        info = info.with_color(color);
    }
    info
}

fn to_booked(event: GraphEvent, calendar_id: &str) -> AdapterResult<BookedEvent> {
    let event_id = event
        .id
        .ok_or_else(|| AdapterError::invalid_response("event response missing id"))?;
    Ok(BookedEvent {
        event_id,
        provider: Provider::Outlook,
        calendar_id: calendar_id.to_string(),
        meet_link: event.online_meeting.and_then(|m| m.join_url),
        html_link: event.web_link,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calendar(json: &str) -> GraphCalendar {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn editable_calendar_maps_writable() {
        let info = to_calendar_info(calendar(
            r#"{"id": "cal-1", "name": "Calendar", "isDefaultCalendar": true, "canEdit": true}"#,
        ));
        assert!(info.writable);
        assert!(info.primary);
        assert_eq!(info.provider, Provider::Outlook);
        assert!(info.timezone.is_none());
    }

    #[test]
    fn shared_calendar_defaults_read_only() {
        let info = to_calendar_info(calendar(r#"{"id": "cal-2", "name": "Shared"}"#));
        assert!(!info.writable);
        assert!(!info.primary);
    }

    #[test]
    fn booked_event_maps_meeting_link() {
        let event: GraphEvent = serde_json::from_str(
            r#"{
                "id": "evt-9",
                "webLink": "https://outlook.office365.com/calendar/item/evt-9",
                "onlineMeeting": {"joinUrl": "https://teams.microsoft.com/l/meetup-join/xyz"}
            }"#,
        )
        .unwrap();

        let booked = to_booked(event, "cal-1").unwrap();
        assert_eq!(booked.event_id, "evt-9");
        assert_eq!(booked.provider, Provider::Outlook);
        assert_eq!(
            booked.meet_link.as_deref(),
            Some("https://teams.microsoft.com/l/meetup-join/xyz")
        );
    }

    #[test]
    fn booked_event_requires_id() {
        let event: GraphEvent = serde_json::from_str(r#"{"webLink": null}"#).unwrap();
        let err = to_booked(event, "cal-1").unwrap_err();
        assert_eq!(err.code(), crate::AdapterErrorCode::InvalidResponse);
    }
}

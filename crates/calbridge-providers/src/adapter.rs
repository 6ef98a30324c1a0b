//! The uniform adapter contract.
//!
//! Every provider backend implements [`CalendarAdapter`]: exactly five
//! operations, each a single outbound network exchange authenticated by a
//! caller-supplied token. Adapters hold no per-user state; the token is
//! borrowed for the duration of one call and never retained.

use calbridge_core::{
    AccessToken, BookedEvent, BoxFuture, CalendarInfo, EventDraft, EventPatch, FreeBusySlot,
    Provider, TimeWindow,
};

use crate::error::AdapterResult;

/// Operation names used in adapter errors and failure logs.
pub mod op {
    /// Calendar enumeration.
    pub const LIST_CALENDARS: &str = "list_calendars";
    /// Busy-interval query.
    pub const GET_FREE_BUSY: &str = "get_free_busy";
    /// Event creation.
    pub const CREATE_EVENT: &str = "create_event";
    /// Partial event update.
    pub const UPDATE_EVENT: &str = "update_event";
    /// Event deletion.
    pub const DELETE_EVENT: &str = "delete_event";
}

/// One provider's implementation of the uniform operation set.
///
/// Implementations translate these calls into the provider's native wire
/// protocol and normalize the results. They do not decide retry or
/// suppression policy — any non-success outcome is returned as an error
/// tagged with the provider and operation, and the facade above chooses what
/// to do with it.
pub trait CalendarAdapter: Send + Sync {
    /// The provider this adapter speaks for.
    fn provider(&self) -> Provider;

    /// Enumerates calendars visible to the token's principal.
    ///
    /// Provider-specific access roles collapse into the single `writable`
    /// flag on [`CalendarInfo`]: owner/editor-equivalent roles are writable,
    /// read-only roles are not.
    fn list_calendars<'a>(
        &'a self,
        token: &'a AccessToken,
    ) -> BoxFuture<'a, AdapterResult<Vec<CalendarInfo>>>;

    /// Queries busy intervals in `window`.
    ///
    /// Only intervals the provider flags as busy or tentative count as
    /// occupied. Returned slots are absolute UTC instants clipped to the
    /// window, in the provider's own chronological order (this layer never
    /// re-sorts). An empty `calendar_ids` slice means the principal's
    /// primary calendar.
    fn get_free_busy<'a>(
        &'a self,
        token: &'a AccessToken,
        calendar_ids: &'a [String],
        window: &'a TimeWindow,
    ) -> BoxFuture<'a, AdapterResult<Vec<FreeBusySlot>>>;

    /// Creates an event on `calendar_id`.
    ///
    /// Attendees are attached with the provider's auto-accept semantics so
    /// the event appears confirmed on both sides without an RSVP round trip.
    /// When the draft requests a meeting link, provider-native conferencing
    /// is requested at creation time, not as a follow-up call.
    fn create_event<'a>(
        &'a self,
        token: &'a AccessToken,
        calendar_id: &'a str,
        draft: &'a EventDraft,
    ) -> BoxFuture<'a, AdapterResult<BookedEvent>>;

    /// Applies a partial update to an existing event.
    ///
    /// Only fields present in the patch are sent to the provider; absent
    /// fields must not overwrite existing provider-side values.
    fn update_event<'a>(
        &'a self,
        token: &'a AccessToken,
        calendar_id: &'a str,
        event_id: &'a str,
        patch: &'a EventPatch,
    ) -> BoxFuture<'a, AdapterResult<BookedEvent>>;

    /// Deletes an event, requesting attendee cancellation notices where the
    /// provider supports them.
    fn delete_event<'a>(
        &'a self,
        token: &'a AccessToken,
        calendar_id: &'a str,
        event_id: &'a str,
    ) -> BoxFuture<'a, AdapterResult<()>>;
}

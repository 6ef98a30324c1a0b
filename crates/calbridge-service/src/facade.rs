//! Provider-agnostic calendar operations with failure containment.
//!
//! The facade's contract is "never throws": a user with no connected
//! calendar, or a provider outage, must still be able to book — just without
//! calendar-sourced busy data or a provider-side event. Token absence and
//! adapter failure are therefore indistinguishable to callers by design;
//! the distinction is pushed to the log sink.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, warn};

use calbridge_core::{
    AccessToken, BookedEvent, BoxFuture, CalendarInfo, EventDraft, EventPatch, FreeBusySlot,
    Provider, TimeWindow,
};
use calbridge_providers::{
    AdapterError, AdapterResult, CalendarAdapter, GoogleAdapter, OutlookAdapter, op,
};
use calbridge_vault::{ConnectWidgetToken, TokenBroker, TokenSource, VaultConfig};

/// Facade tuning knobs.
#[derive(Debug, Clone)]
pub struct FacadeConfig {
    /// Extra attempts for idempotent reads hitting a transient failure.
    ///
    /// Writes are never retried: without idempotency keys a retried create
    /// can produce duplicate events.
    pub read_retries: u32,
    /// Pause between read attempts.
    pub retry_backoff: Duration,
}

impl Default for FacadeConfig {
    fn default() -> Self {
        Self {
            read_retries: 1,
            retry_backoff: Duration::from_millis(250),
        }
    }
}

impl FacadeConfig {
    /// Builder: set the number of extra read attempts.
    pub fn with_read_retries(mut self, retries: u32) -> Self {
        self.read_retries = retries;
        self
    }

    /// Builder: set the pause between read attempts.
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }
}

/// The single entry point for calendar operations.
///
/// Holds no per-user state: tokens are resolved fresh per call and adapters
/// are stateless, so concurrent invocations share nothing mutable.
pub struct CalendarService {
    tokens: Arc<dyn TokenSource>,
    adapters: HashMap<Provider, Arc<dyn CalendarAdapter>>,
    config: FacadeConfig,
}

impl CalendarService {
    /// Creates a service with no adapters registered.
    pub fn new(tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            tokens,
            adapters: HashMap::new(),
            config: FacadeConfig::default(),
        }
    }

    /// Creates a production service: vault-backed token broker plus both
    /// provider adapters.
    pub fn with_defaults(vault: VaultConfig) -> Self {
        Self::new(Arc::new(TokenBroker::new(vault)))
            .with_adapter(Arc::new(GoogleAdapter::new()))
            .with_adapter(Arc::new(OutlookAdapter::new()))
    }

    /// Builder: register an adapter under its own provider tag.
    pub fn with_adapter(mut self, adapter: Arc<dyn CalendarAdapter>) -> Self {
        self.adapters.insert(adapter.provider(), adapter);
        self
    }

    /// Builder: override the facade configuration.
    pub fn with_config(mut self, config: FacadeConfig) -> Self {
        self.config = config;
        self
    }

    /// Enumerates the user's calendars on one provider.
    ///
    /// Returns an empty list when the user is not connected or the provider
    /// call fails.
    pub async fn list_calendars(
        &self,
        provider: Provider,
        user_id: &str,
        organization_id: &str,
    ) -> Vec<CalendarInfo> {
        let Some(adapter) = self.adapter(provider) else {
            return Vec::new();
        };
        let Some(token) = self.token(provider, user_id, organization_id).await else {
            return Vec::new();
        };

        match self.retry_read(|| adapter.list_calendars(&token)).await {
            Ok(calendars) => calendars,
            Err(err) => {
                report_failure(provider, op::LIST_CALENDARS, user_id, organization_id, &err);
                Vec::new()
            }
        }
    }

    /// Queries busy intervals on one provider.
    ///
    /// An empty `calendar_ids` slice means the provider's notion of the
    /// principal's default calendar. Returns an empty list when the user is
    /// not connected or the provider call fails.
    pub async fn get_free_busy(
        &self,
        provider: Provider,
        user_id: &str,
        organization_id: &str,
        calendar_ids: &[String],
        window: &TimeWindow,
    ) -> Vec<FreeBusySlot> {
        let Some(adapter) = self.adapter(provider) else {
            return Vec::new();
        };
        let Some(token) = self.token(provider, user_id, organization_id).await else {
            return Vec::new();
        };

        match self
            .retry_read(|| adapter.get_free_busy(&token, calendar_ids, window))
            .await
        {
            Ok(slots) => slots,
            Err(err) => {
                report_failure(provider, op::GET_FREE_BUSY, user_id, organization_id, &err);
                Vec::new()
            }
        }
    }

    /// Queries busy intervals across every supported provider concurrently
    /// and concatenates the results.
    ///
    /// A provider that is unconnected or failing contributes nothing; the
    /// aggregate call itself never fails. Slots keep each provider's native
    /// order — sorting across providers is the caller's concern.
    pub async fn get_all_free_busy(
        &self,
        user_id: &str,
        organization_id: &str,
        window: &TimeWindow,
    ) -> Vec<FreeBusySlot> {
        let queries = Provider::ALL
            .iter()
            .map(|provider| self.get_free_busy(*provider, user_id, organization_id, &[], window));
        join_all(queries).await.into_iter().flatten().collect()
    }

    /// Creates an event on the given provider calendar.
    ///
    /// Returns `None` when the user is not connected or the provider call
    /// fails; the meeting still happens, just without a calendar artifact.
    pub async fn create_event(
        &self,
        provider: Provider,
        user_id: &str,
        organization_id: &str,
        calendar_id: &str,
        draft: &EventDraft,
    ) -> Option<BookedEvent> {
        let adapter = self.adapter(provider)?;
        let token = self.token(provider, user_id, organization_id).await?;

        match adapter.create_event(&token, calendar_id, draft).await {
            Ok(booked) => Some(booked),
            Err(err) => {
                report_failure(provider, op::CREATE_EVENT, user_id, organization_id, &err);
                None
            }
        }
    }

    /// Applies a partial update to an existing provider event.
    ///
    /// An empty patch short-circuits to `None` without a provider round
    /// trip. Returns `None` when the user is not connected or the provider
    /// call fails.
    pub async fn update_event(
        &self,
        provider: Provider,
        user_id: &str,
        organization_id: &str,
        calendar_id: &str,
        event_id: &str,
        patch: &EventPatch,
    ) -> Option<BookedEvent> {
        if patch.is_empty() {
            debug!(
                provider = %provider,
                user = user_id,
                event = event_id,
                "empty event patch, skipping provider call"
            );
            return None;
        }

        let adapter = self.adapter(provider)?;
        let token = self.token(provider, user_id, organization_id).await?;

        match adapter
            .update_event(&token, calendar_id, event_id, patch)
            .await
        {
            Ok(booked) => Some(booked),
            Err(err) => {
                report_failure(provider, op::UPDATE_EVENT, user_id, organization_id, &err);
                None
            }
        }
    }

    /// Deletes a provider event, notifying attendees where supported.
    ///
    /// Returns `false` when the user is not connected, the event does not
    /// exist, or the provider call fails.
    pub async fn delete_event(
        &self,
        provider: Provider,
        user_id: &str,
        organization_id: &str,
        calendar_id: &str,
        event_id: &str,
    ) -> bool {
        let Some(adapter) = self.adapter(provider) else {
            return false;
        };
        let Some(token) = self.token(provider, user_id, organization_id).await else {
            return false;
        };

        match adapter.delete_event(&token, calendar_id, event_id).await {
            Ok(()) => true,
            Err(err) => {
                report_failure(provider, op::DELETE_EVENT, user_id, organization_id, &err);
                false
            }
        }
    }

    /// Mints a short-lived token for the connection-management UI.
    pub async fn connect_widget_token(
        &self,
        user_id: &str,
        organization_id: &str,
    ) -> Option<ConnectWidgetToken> {
        self.tokens
            .connect_widget_token(user_id, organization_id)
            .await
    }

    fn adapter(&self, provider: Provider) -> Option<&Arc<dyn CalendarAdapter>> {
        let adapter = self.adapters.get(&provider);
        if adapter.is_none() {
            debug!(provider = %provider, "no adapter registered");
        }
        adapter
    }

    async fn token(
        &self,
        provider: Provider,
        user_id: &str,
        organization_id: &str,
    ) -> Option<AccessToken> {
        let token = self
            .tokens
            .get_token(provider, user_id, organization_id)
            .await?;
        if !token.is_active() {
            debug!(
                provider = %provider,
                user = user_id,
                org = organization_id,
                "connection token inactive"
            );
            return None;
        }
        Some(token)
    }

    /// Runs an idempotent read, retrying transient failures a bounded number
    /// of times.
    async fn retry_read<'a, T, F>(&self, attempt: F) -> AdapterResult<T>
    where
        F: Fn() -> BoxFuture<'a, AdapterResult<T>>,
    {
        let mut tries = 0;
        loop {
            match attempt().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && tries < self.config.read_retries => {
                    tries += 1;
                    debug!(error = %err, attempt = tries, "retrying calendar read");
                    tokio::time::sleep(self.config.retry_backoff).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

fn report_failure(
    provider: Provider,
    operation: &'static str,
    user_id: &str,
    organization_id: &str,
    err: &AdapterError,
) {
    warn!(
        provider = %provider,
        operation,
        user = user_id,
        org = organization_id,
        error = %err,
        "calendar operation failed"
    );
}

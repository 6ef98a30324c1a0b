//! Shared HTTP plumbing for the wire clients.
//!
//! Both providers map transport failures and non-success statuses onto the
//! same adapter error taxonomy; the helpers here keep that mapping in one
//! place.

use serde::de::DeserializeOwned;

use crate::error::{AdapterError, AdapterResult};

pub(crate) fn map_send_error(err: reqwest::Error) -> AdapterError {
    if err.is_timeout() {
        AdapterError::network("request timeout")
    } else if err.is_connect() {
        AdapterError::network(format!("connection failed: {err}"))
    } else {
        AdapterError::network(format!("request failed: {err}"))
    }
}

/// Maps non-success statuses to the adapter error taxonomy.
pub(crate) async fn check_status(response: reqwest::Response) -> AdapterResult<reqwest::Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(AdapterError::authentication("access token expired or invalid"));
    }
    if status == reqwest::StatusCode::FORBIDDEN {
        return Err(AdapterError::authorization("access denied"));
    }
    if status == reqwest::StatusCode::NOT_FOUND || status == reqwest::StatusCode::GONE {
        return Err(AdapterError::not_found(format!("resource not found ({status})")));
    }
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .map(|s| format!(", retry after {s} seconds"))
            .unwrap_or_default();
        return Err(AdapterError::rate_limited(format!(
            "rate limit exceeded{retry_after}"
        )));
    }

    let body = response.text().await.unwrap_or_default();
    if status.is_server_error() {
        Err(AdapterError::server(format!("API error ({status}): {body}")))
    } else {
        Err(AdapterError::bad_request(format!("API error ({status}): {body}")))
    }
}

pub(crate) async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> AdapterResult<T> {
    let body = response
        .text()
        .await
        .map_err(|e| AdapterError::network(format!("failed to read response: {e}")))?;
    serde_json::from_str(&body)
        .map_err(|e| AdapterError::invalid_response(format!("failed to parse response: {e}")))
}

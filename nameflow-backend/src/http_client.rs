//! Generic HTTP client tools
//!
//! Provide reusable HTTP request processing logic to reduce duplicate code for each backend.
//! Each backend retains full request-shaping flexibility and constructs `RequestBuilder` by itself.
//!
//! # design principles
//! - **Unified and universal HTTP processing flow** - sending requests, logging, and reading responses
//! - **Flexible response parsing** - Provides tool functions but does not limit parsing methods
//! - **No automatic retry** - full-replace mutations are not idempotent; a retried
//!   whole-set submission can duplicate or drop records. Retrying is the calling
//!   layer's policy decision.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::error::BackendError;
use crate::utils::log_sanitizer::truncate_for_log;

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Performs an HTTP request and returns response text
    ///
    /// Unified processing: sending requests, logging, error classification
    ///
    /// # Arguments
    /// * `request_builder` - configured request constructor (including URL, headers, body, etc.)
    /// * `backend_name` - backend name (for logging)
    /// * `method_name` - request method name (such as "GET", "POST", used for logs)
    /// * `url_or_action` - URL or action name (for logging)
    ///
    /// # Returns
    /// * `Ok((status_code, response_text))` - returns status code and response text on success
    /// * `Err(BackendError::NetworkError)` - network error
    /// * `Err(BackendError::Timeout)` - request timed out
    /// * `Err(BackendError::RateLimited)` - HTTP 429
    pub async fn execute_request(
        request_builder: RequestBuilder,
        backend_name: &str,
        method_name: &str,
        url_or_action: &str,
    ) -> Result<(u16, String), BackendError> {
        log::debug!("[{backend_name}] {method_name} {url_or_action}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                BackendError::Timeout {
                    backend: backend_name.to_string(),
                    detail: e.to_string(),
                }
            } else {
                BackendError::NetworkError {
                    backend: backend_name.to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("[{backend_name}] Response Status: {status_code}");

        // Extract Retry-After header (before consuming response body)
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        if status_code == 429 {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{backend_name}] Rate limited (HTTP 429), retry_after={retry_after:?}");
            return Err(BackendError::RateLimited {
                backend: backend_name.to_string(),
                retry_after,
                raw_message: Some(body),
            });
        }

        // 502/503/504 are transport-level failures, not API errors
        if matches!(status_code, 502..=504) {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{backend_name}] Server error (HTTP {status_code})");
            return Err(BackendError::NetworkError {
                backend: backend_name.to_string(),
                detail: format!("HTTP {status_code}: {body}"),
            });
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| BackendError::NetworkError {
                backend: backend_name.to_string(),
                detail: format!("Failed to read response body: {e}"),
            })?;

        log::debug!(
            "[{backend_name}] Response Body: {}",
            truncate_for_log(&response_text)
        );

        Ok((status_code, response_text))
    }

    /// Parse JSON response
    ///
    /// # Arguments
    /// * `response_text` - JSON text
    /// * `backend_name` - backend name (used for error messages)
    ///
    /// # Returns
    /// * `Ok(T)` - successfully parsed
    /// * `Err(BackendError::ParseError)` - parsing failed
    pub fn parse_json<T>(response_text: &str, backend_name: &str) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("[{backend_name}] JSON parse failed: {e}");
            log::error!(
                "[{backend_name}] Raw response: {}",
                truncate_for_log(response_text)
            );
            BackendError::ParseError {
                backend: backend_name.to_string(),
                detail: e.to_string(),
            }
        })
    }
}

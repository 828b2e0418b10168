use serde::{Deserialize, Serialize};

/// Unified error type for all DNS backend operations.
///
/// Each variant includes a `backend` field identifying which backend produced the error,
/// plus variant-specific context. All variants are serializable for structured error
/// reporting. Callers never observe a backend's native error shape.
///
/// # Retry policy
///
/// Unlike typical API clients, NameFlow never retries automatically: full-replace
/// backends implement mutation as a whole-set resubmission, which is not idempotent.
/// A naive retry can duplicate or drop records. Retrying is a policy decision for
/// the calling layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum BackendError {
    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    NetworkError {
        /// Backend that produced the error.
        backend: String,
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    Timeout {
        /// Backend that produced the error.
        backend: String,
        /// Error details.
        detail: String,
    },

    /// The configured credentials are invalid or expired.
    InvalidCredentials {
        /// Backend that produced the error.
        backend: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The specified zone was not found or is not served by these credentials.
    ZoneNotFound {
        /// Backend that produced the error.
        backend: String,
        /// Zone name that was not found.
        zone: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The specified DNS record was not found.
    RecordNotFound {
        /// Backend that produced the error.
        backend: String,
        /// ID of the record that was not found.
        record_id: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// A DNS record with the same name/type/destination already exists.
    RecordExists {
        /// Backend that produced the error.
        backend: String,
        /// Hostname of the conflicting record.
        hostname: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// A request parameter is invalid (e.g., bad TTL value, malformed destination).
    InvalidParameter {
        /// Backend that produced the error.
        backend: String,
        /// Name of the invalid parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// The requested DNS record type is not supported by this backend.
    UnsupportedRecordType {
        /// Backend that produced the error.
        backend: String,
        /// The unsupported record type string.
        record_type: String,
    },

    /// The authenticated credential lacks permission for the requested operation.
    PermissionDenied {
        /// Backend that produced the error.
        backend: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The API rate limit has been exceeded (HTTP 429 or equivalent).
    ///
    /// Transient, but not retried here — see the type-level retry policy note.
    RateLimited {
        /// Backend that produced the error.
        backend: String,
        /// Suggested wait time in seconds before retrying, if provided by the API.
        retry_after: Option<u64>,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// Failed to parse the backend's API response.
    ParseError {
        /// Backend that produced the error.
        backend: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize a request body.
    SerializationError {
        /// Backend that produced the error.
        backend: String,
        /// Details about the serialization failure.
        detail: String,
    },

    /// An unrecognized error from the backend API.
    ///
    /// This is a catch-all for error codes not yet mapped to a specific variant.
    Unknown {
        /// Backend that produced the error.
        backend: String,
        /// Raw error code from the API, if available.
        raw_code: Option<String>,
        /// Raw error message from the API.
        raw_message: String,
    },
}

impl BackendError {
    /// 是否为预期行为（用户输入、资源不存在等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::ZoneNotFound { .. }
                | Self::RecordNotFound { .. }
                | Self::RecordExists { .. }
                | Self::InvalidParameter { .. }
                | Self::UnsupportedRecordType { .. }
                | Self::PermissionDenied { .. }
        )
    }
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { backend, detail } => {
                write!(f, "[{backend}] Network error: {detail}")
            }
            Self::Timeout { backend, detail } => {
                write!(f, "[{backend}] Request timeout: {detail}")
            }
            Self::InvalidCredentials {
                backend,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{backend}] Invalid credentials: {msg}")
                } else {
                    write!(f, "[{backend}] Invalid credentials")
                }
            }
            Self::ZoneNotFound {
                backend,
                zone,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{backend}] Zone '{zone}' not found: {msg}")
                } else {
                    write!(f, "[{backend}] Zone '{zone}' not found")
                }
            }
            Self::RecordNotFound {
                backend, record_id, ..
            } => {
                write!(f, "[{backend}] Record '{record_id}' not found")
            }
            Self::RecordExists {
                backend, hostname, ..
            } => {
                write!(f, "[{backend}] Record '{hostname}' already exists")
            }
            Self::InvalidParameter {
                backend,
                param,
                detail,
            } => {
                write!(f, "[{backend}] Invalid parameter '{param}': {detail}")
            }
            Self::UnsupportedRecordType {
                backend,
                record_type,
            } => {
                write!(f, "[{backend}] Unsupported record type: {record_type}")
            }
            Self::PermissionDenied {
                backend,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{backend}] Permission denied: {msg}")
                } else {
                    write!(f, "[{backend}] Permission denied")
                }
            }
            Self::RateLimited {
                backend,
                retry_after,
                ..
            } => {
                if let Some(secs) = retry_after {
                    write!(f, "[{backend}] Rate limited (retry after {secs}s)")
                } else {
                    write!(f, "[{backend}] Rate limited")
                }
            }
            Self::ParseError { backend, detail } => {
                write!(f, "[{backend}] Parse error: {detail}")
            }
            Self::SerializationError { backend, detail } => {
                write!(f, "[{backend}] Serialization error: {detail}")
            }
            Self::Unknown {
                backend,
                raw_message,
                ..
            } => {
                write!(f, "[{backend}] {raw_message}")
            }
        }
    }
}

impl std::error::Error for BackendError {}

/// Convenience type alias for `Result<T, BackendError>`.
pub type Result<T> = std::result::Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_network_error() {
        let e = BackendError::NetworkError {
            backend: "test".to_string(),
            detail: "connection refused".to_string(),
        };
        assert_eq!(e.to_string(), "[test] Network error: connection refused");
    }

    #[test]
    fn display_invalid_credentials_with_message() {
        let e = BackendError::InvalidCredentials {
            backend: "netcup".to_string(),
            raw_message: Some("bad key".to_string()),
        };
        assert_eq!(e.to_string(), "[netcup] Invalid credentials: bad key");
    }

    #[test]
    fn display_zone_not_found_without_message() {
        let e = BackendError::ZoneNotFound {
            backend: "desec".to_string(),
            zone: "example.com".to_string(),
            raw_message: None,
        };
        assert_eq!(e.to_string(), "[desec] Zone 'example.com' not found");
    }

    #[test]
    fn display_record_not_found() {
        let e = BackendError::RecordNotFound {
            backend: "netcup".to_string(),
            record_id: "123".to_string(),
            raw_message: None,
        };
        assert_eq!(e.to_string(), "[netcup] Record '123' not found");
    }

    #[test]
    fn display_rate_limited_with_retry() {
        let e = BackendError::RateLimited {
            backend: "desec".to_string(),
            retry_after: Some(30),
            raw_message: None,
        };
        assert_eq!(e.to_string(), "[desec] Rate limited (retry after 30s)");
    }

    #[test]
    fn display_unknown() {
        let e = BackendError::Unknown {
            backend: "test".to_string(),
            raw_code: Some("E001".to_string()),
            raw_message: "something broke".to_string(),
        };
        assert_eq!(e.to_string(), "[test] something broke");
    }

    #[test]
    fn serialize_json_tagged_by_code() {
        let e = BackendError::RateLimited {
            backend: "desec".to_string(),
            retry_after: Some(60),
            raw_message: Some("too many requests".to_string()),
        };
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("\"code\":\"RateLimited\""));
        assert!(json.contains("\"retry_after\":60"));
    }

    #[test]
    fn deserialize_json_round_trip() {
        let original = BackendError::ZoneNotFound {
            backend: "netcup".to_string(),
            zone: "example.com".to_string(),
            raw_message: None,
        };
        let json = serde_json::to_string(&original).unwrap();
        let deserialized: BackendError = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.to_string(), original.to_string());
    }

    #[test]
    fn expected_errors_classified() {
        assert!(
            BackendError::RecordNotFound {
                backend: "t".into(),
                record_id: "1".into(),
                raw_message: None,
            }
            .is_expected()
        );
        assert!(
            BackendError::InvalidCredentials {
                backend: "t".into(),
                raw_message: None,
            }
            .is_expected()
        );
        assert!(
            !BackendError::NetworkError {
                backend: "t".into(),
                detail: "x".into(),
            }
            .is_expected()
        );
        assert!(
            !BackendError::ParseError {
                backend: "t".into(),
                detail: "x".into(),
            }
            .is_expected()
        );
    }
}

//! deSEC 错误映射
//!
//! deSEC 是 REST 风格 API，错误码就是 HTTP 状态码。

use crate::error::BackendError;
use crate::traits::{BackendErrorMapper, ErrorContext, RawApiError};

use super::DesecBackend;

impl BackendErrorMapper for DesecBackend {
    fn backend_name(&self) -> &'static str {
        "desec"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> BackendError {
        match raw.code.as_deref() {
            Some("401") => BackendError::InvalidCredentials {
                backend: self.backend_name().to_string(),
                raw_message: Some(raw.message),
            },

            Some("403") => BackendError::PermissionDenied {
                backend: self.backend_name().to_string(),
                raw_message: Some(raw.message),
            },

            // 404：有 record_id 上下文时指记录，否则指区域
            Some("404") => match context.record_id {
                Some(record_id) => BackendError::RecordNotFound {
                    backend: self.backend_name().to_string(),
                    record_id,
                    raw_message: Some(raw.message),
                },
                None => BackendError::ZoneNotFound {
                    backend: self.backend_name().to_string(),
                    zone: context.zone.unwrap_or_else(|| "<unknown>".to_string()),
                    raw_message: Some(raw.message),
                },
            },

            Some("400") => BackendError::InvalidParameter {
                backend: self.backend_name().to_string(),
                param: "rrset".to_string(),
                detail: raw.message,
            },

            _ => self.unknown_error(raw),
        }
    }
}

//! netcup 错误映射

use crate::error::BackendError;
use crate::traits::{BackendErrorMapper, ErrorContext, RawApiError};

use super::NetcupBackend;

/// netcup 状态码映射
/// 参考: <https://ccp.netcup.net/run/webservice/servers/endpoint.php>
impl BackendErrorMapper for NetcupBackend {
    fn backend_name(&self) -> &'static str {
        "netcup"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> BackendError {
        match raw.code.as_deref() {
            // 认证失败：无效的 API Key / 密码 / 会话
            Some("4001" | "4010" | "4011" | "4013") => BackendError::InvalidCredentials {
                backend: self.backend_name().to_string(),
                raw_message: Some(raw.message),
            },

            // 域名不在此账户下或不存在
            Some("4002" | "5029") if raw.message.to_lowercase().contains("domain") => {
                BackendError::ZoneNotFound {
                    backend: self.backend_name().to_string(),
                    zone: context.zone.unwrap_or_else(|| "<unknown>".to_string()),
                    raw_message: Some(raw.message),
                }
            }

            // 请求频率限制
            Some("4012") => BackendError::RateLimited {
                backend: self.backend_name().to_string(),
                retry_after: None,
                raw_message: Some(raw.message),
            },

            // 参数校验失败
            Some("4003" | "4004" | "4005") => BackendError::InvalidParameter {
                backend: self.backend_name().to_string(),
                param: "dnsrecordset".to_string(),
                detail: raw.message,
            },

            // 权限不足
            Some("4008" | "4009") => BackendError::PermissionDenied {
                backend: self.backend_name().to_string(),
                raw_message: Some(raw.message),
            },

            _ => {
                // 状态码未覆盖时按消息内容兜底判断
                let lower = raw.message.to_lowercase();
                if lower.contains("login") || lower.contains("session") {
                    BackendError::InvalidCredentials {
                        backend: self.backend_name().to_string(),
                        raw_message: Some(raw.message),
                    }
                } else if lower.contains("domain") && lower.contains("not found") {
                    BackendError::ZoneNotFound {
                        backend: self.backend_name().to_string(),
                        zone: context.zone.unwrap_or_else(|| "<unknown>".to_string()),
                        raw_message: Some(raw.message),
                    }
                } else {
                    self.unknown_error(raw)
                }
            }
        }
    }
}

use async_trait::async_trait;

use crate::error::{BackendError, Result};
use crate::types::{
    BackendKind, BackendMetadata, MutationStrategy, NewRecord, Record, Zone, ZoneInfo,
};

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// 错误码（各 Backend 格式不同）
    pub code: Option<String>,
    /// 原始错误消息
    pub message: String,
}

impl RawApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// 错误上下文信息（内部使用）
/// 用于在映射错误时提供额外信息
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// 记录 ID（用于 `RecordNotFound` 等错误）
    pub record_id: Option<String>,
    /// 区域名（用于 `ZoneNotFound` 等错误）
    pub zone: Option<String>,
}

/// Backend 错误映射 Trait（内部使用）
/// 各 Backend 实现此 trait 以将原始 API 错误映射到统一错误类型
pub(crate) trait BackendErrorMapper {
    /// 返回 Backend 标识符
    fn backend_name(&self) -> &'static str;

    /// 将原始 API 错误映射到统一错误类型
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> BackendError;

    /// 快捷方法：解析错误
    fn parse_error(&self, detail: impl ToString) -> BackendError {
        BackendError::ParseError {
            backend: self.backend_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// 快捷方法：网络错误
    fn network_error(&self, detail: impl ToString) -> BackendError {
        BackendError::NetworkError {
            backend: self.backend_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// 快捷方法：未知错误（fallback）
    fn unknown_error(&self, raw: RawApiError) -> BackendError {
        BackendError::Unknown {
            backend: self.backend_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// DNS Backend Trait
///
/// 所有 zone 参数均为区域名（如 `example.com`），记录 hostname 为相对名
/// （`www`，apex 用 `@`）。各 Backend 负责在此规范形状与原生 API 之间转换。
#[async_trait]
pub trait DnsBackend: Send + Sync {
    /// Backend 标识符
    fn kind(&self) -> BackendKind;

    /// 记录变更策略（full-replace 或 patch）
    ///
    /// Full-replace 的调用方需要自行对同一 zone 的并发变更串行化，
    /// 见 `ZoneLocks`。
    fn mutation_strategy(&self) -> MutationStrategy;

    /// 获取 Backend 元数据（类型级别）
    ///
    /// 返回该 Backend 的元数据，包括名称、凭证字段、默认 TTL 等。
    /// 此方法不需要实例，可以在创建 Backend 之前调用。
    fn metadata() -> BackendMetadata
    where
        Self: Sized;

    /// 验证凭证是否有效（一次轻量 API 调用）
    async fn test_connection(&self) -> Result<()>;

    /// 列出凭证可管理的所有区域
    async fn list_zones(&self) -> Result<Vec<Zone>>;

    /// 验证凭证是否可以管理指定区域
    ///
    /// 返回 `Ok(false)` 表示区域不可访问（而非传输层错误）。
    async fn validate_zone_access(&self, zone: &str) -> Result<bool>;

    /// 获取区域下的全部 DNS 记录
    async fn list_records(&self, zone: &str) -> Result<Vec<Record>>;

    /// 创建 DNS 记录
    async fn create_record(&self, zone: &str, record: &NewRecord) -> Result<Record>;

    /// 更新（替换）指定 id 的 DNS 记录
    async fn update_record(&self, zone: &str, record_id: &str, record: &NewRecord)
    -> Result<Record>;

    /// 删除 DNS 记录，返回是否确有删除
    async fn delete_record(&self, zone: &str, record_id: &str) -> Result<bool>;

    /// 获取区域的 SOA 级信息
    async fn get_zone_info(&self, zone: &str) -> Result<ZoneInfo>;
}

/// 便捷方法：根据 `is_expected` 分级记录一条 Backend 错误日志。
pub fn log_backend_error(context: &str, err: &BackendError) {
    if err.is_expected() {
        log::warn!("{context}: {err}");
    } else {
        log::error!("{context}: {err}");
    }
}

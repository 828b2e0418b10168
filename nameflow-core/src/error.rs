//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use nameflow_backend::{BackendError, CredentialValidationError};

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    // === 认证类（对外一律折叠为 Unauthorized，见 [`CoreError::outward`]）===
    /// Token 字符串不符合固定语法
    #[error("Token format is invalid")]
    InvalidFormat,

    /// 账户不存在 / 前缀无匹配 / 密文校验失败（三者对外不可区分）
    #[error("Token is invalid")]
    InvalidToken,

    /// 账户已停用
    #[error("Account is disabled")]
    AccountDisabled,

    /// Token 已吊销或停用
    #[error("Token has been revoked")]
    TokenRevoked,

    /// Token 已过期
    #[error("Token has expired")]
    TokenExpired,

    /// Realm 未处于 approved 状态
    #[error("Realm is not approved")]
    RealmNotApproved,

    // === 授权类（调用方已通过认证，可以给出具体原因）===
    /// 调用方 IP 不在 Token 的允许列表内
    #[error("Source IP {0} is not allowed for this token")]
    ForbiddenIp(String),

    /// 请求的域不是 Realm 的基础域
    #[error("Domain {0} is outside this realm")]
    ForbiddenDomain(String),

    /// 操作不在有效操作集内
    #[error("Operation {0} is not permitted")]
    ForbiddenOperation(String),

    /// 记录类型不在有效类型集内
    #[error("Record type {0} is not permitted")]
    ForbiddenRecordType(String),

    /// 请求的主机名不在 Realm 的作用域内
    #[error("Hostname {0} is outside this realm's scope")]
    ForbiddenHostname(String),

    // === Backend 解析类 ===
    /// 域根或服务存在但已停用
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// 存储的配置 blob 不满足 Backend 的凭证字段要求
    #[error("{0}")]
    BackendConfigInvalid(CredentialValidationError),

    /// 域根或服务不存在
    #[error("Backend not found: {0}")]
    BackendNotFound(String),

    /// 用户自有服务的属主与 Realm 属主不一致（安全相关，不是 not-found）
    #[error("Backend service {0} is not owned by the realm's account")]
    BackendOwnershipMismatch(String),

    // === 基础设施 ===
    /// Storage layer error
    #[error("Storage error: {0}")]
    Storage(String),

    /// 散列计算失败（盐生成、PHC 序列化等）
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Backend error (converting from library)
    #[error("{0}")]
    Backend(#[from] BackendError),
}

/// 对外错误信号
///
/// 认证类失败全部折叠为 [`OutwardSignal::Unauthorized`]，调用方永远无法
/// 从响应分辨是账户不存在还是密文错误。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutwardSignal {
    Unauthorized,
    ForbiddenIp,
    ForbiddenDomain,
    ForbiddenOperation,
    ForbiddenRecordType,
    ForbiddenHostname,
    BackendFailure,
    Internal,
}

impl CoreError {
    /// 折叠为对外信号（认证类细节不泄露）
    #[must_use]
    pub fn outward(&self) -> OutwardSignal {
        match self {
            Self::InvalidFormat
            | Self::InvalidToken
            | Self::AccountDisabled
            | Self::TokenRevoked
            | Self::TokenExpired
            | Self::RealmNotApproved => OutwardSignal::Unauthorized,
            Self::ForbiddenIp(_) => OutwardSignal::ForbiddenIp,
            Self::ForbiddenDomain(_) => OutwardSignal::ForbiddenDomain,
            Self::ForbiddenOperation(_) => OutwardSignal::ForbiddenOperation,
            Self::ForbiddenRecordType(_) => OutwardSignal::ForbiddenRecordType,
            Self::ForbiddenHostname(_) => OutwardSignal::ForbiddenHostname,
            Self::BackendUnavailable(_)
            | Self::BackendConfigInvalid(_)
            | Self::BackendNotFound(_)
            | Self::BackendOwnershipMismatch(_)
            | Self::Backend(_) => OutwardSignal::BackendFailure,
            Self::Storage(_) | Self::Crypto(_) => OutwardSignal::Internal,
        }
    }

    /// Whether it is expected behavior (user input, denied request, etc.), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::InvalidFormat
            | Self::InvalidToken
            | Self::AccountDisabled
            | Self::TokenRevoked
            | Self::TokenExpired
            | Self::RealmNotApproved
            | Self::ForbiddenIp(_)
            | Self::ForbiddenDomain(_)
            | Self::ForbiddenOperation(_)
            | Self::ForbiddenRecordType(_)
            | Self::ForbiddenHostname(_)
            | Self::BackendNotFound(_)
            | Self::BackendConfigInvalid(_) => true,
            Self::Backend(e) => e.is_expected(),
            _ => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;

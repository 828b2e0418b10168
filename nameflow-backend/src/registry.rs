//! Backend 注册表
//!
//! 根据凭证构造具体 Backend 实例，并暴露各 Backend 的静态元数据。

use std::sync::Arc;

use crate::traits::DnsBackend;
use crate::types::{BackendCredentials, BackendKind, BackendMetadata, CredentialValidationError};

#[cfg(feature = "desec")]
use crate::backends::DesecBackend;
#[cfg(feature = "netcup")]
use crate::backends::NetcupBackend;

/// 根据凭证创建 Backend 实例
#[must_use]
pub fn create_backend(credentials: BackendCredentials) -> Arc<dyn DnsBackend> {
    match credentials {
        #[cfg(feature = "netcup")]
        BackendCredentials::Netcup {
            customer_number,
            api_key,
            api_password,
        } => Arc::new(NetcupBackend::new(customer_number, api_key, api_password)),

        #[cfg(feature = "desec")]
        BackendCredentials::Desec { api_token } => Arc::new(DesecBackend::new(api_token)),
    }
}

/// 所有已启用 Backend 的元数据
#[must_use]
pub fn all_backend_metadata() -> Vec<BackendMetadata> {
    vec![
        #[cfg(feature = "netcup")]
        NetcupBackend::metadata(),
        #[cfg(feature = "desec")]
        DesecBackend::metadata(),
    ]
}

/// 校验配置 blob 是否满足指定 Backend 的凭证字段要求
///
/// # Errors
///
/// 配置不是对象或缺少必填字段时返回 [`CredentialValidationError`]。
pub fn validate_config(
    kind: BackendKind,
    config: &serde_json::Value,
) -> Result<BackendCredentials, CredentialValidationError> {
    BackendCredentials::from_config(kind, config)
}

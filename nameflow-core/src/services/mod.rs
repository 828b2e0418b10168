//! 业务逻辑服务层

mod auth_service;
mod authz_service;
mod backend_resolver;
mod gateway_service;

pub use auth_service::{AuthService, AuthSession};
pub use authz_service::AuthzService;
pub use backend_resolver::BackendResolver;
pub use gateway_service::GatewayService;

use std::sync::Arc;

use crate::traits::{ActivityRecorder, CredentialStore};
use crate::types::ActivityEvent;

/// 服务上下文 - 持有所有依赖
///
/// 平台层需要创建此上下文，并注入平台特定的存储与审计实现。
pub struct ServiceContext {
    /// 凭证存储
    pub store: Arc<dyn CredentialStore>,
    /// 活动审计
    pub recorder: Arc<dyn ActivityRecorder>,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>, recorder: Arc<dyn ActivityRecorder>) -> Self {
        Self { store, recorder }
    }

    /// 写入一条活动事件
    ///
    /// 审计失败不阻断请求流程，只记日志。
    pub async fn record_activity(&self, event: ActivityEvent) {
        if let Err(e) = self.recorder.record(event).await {
            log::error!("Failed to record activity event: {e}");
        }
    }
}

//! 凭证存储抽象 Trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::CoreResult;
use crate::types::{Account, ApiToken, ApprovalStatus, BackendService, DomainRoot, Realm};

/// 凭证存储 Trait
///
/// 核心假设存在一个持久化存储，通过这组窄接口消费它；
/// 存储引擎本身（SQL、KV、内存）由平台层实现。
/// Realm 与域根/服务关联的互斥约束由存储负责保证，
/// 核心侧以 [`crate::types::RealmBackendLink`] 的类型形状兜底。
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// 按 handle（用户名）查账户
    ///
    /// # Returns
    /// * `Ok(Some(account))` - 账户存在
    /// * `Ok(None)` - 账户不存在
    async fn account_by_handle(&self, handle: &str) -> CoreResult<Option<Account>>;

    /// 查询该账户名下所有 Realm 中 lookup 前缀匹配的 Token
    ///
    /// 前缀只用于在慢散列比对前缩小候选集。
    async fn tokens_by_account_and_prefix(
        &self,
        account_id: &str,
        lookup_prefix: &str,
    ) -> CoreResult<Vec<ApiToken>>;

    /// 按 ID 查 Realm
    async fn realm_by_id(&self, realm_id: &str) -> CoreResult<Option<Realm>>;

    /// 按 ID 查平台托管域根
    async fn domain_root_by_id(&self, root_id: &str) -> CoreResult<Option<DomainRoot>>;

    /// 按 ID 查 Backend 服务
    async fn backend_service_by_id(&self, service_id: &str)
    -> CoreResult<Option<BackendService>>;

    /// 成功认证后更新 Token 使用统计（次数、时间、来源 IP）
    async fn update_token_usage(
        &self,
        token_id: &str,
        used_at: DateTime<Utc>,
        source_ip: &str,
    ) -> CoreResult<()>;

    /// 更新 Realm 审批状态
    async fn update_realm_status(&self, realm_id: &str, status: ApprovalStatus) -> CoreResult<()>;

    /// 吊销 Token（单向：设置 `revoked_at`，永不恢复）
    async fn revoke_token(&self, token_id: &str, reason: Option<String>) -> CoreResult<()>;
}

//! 认证服务
//!
//! 把一个原始 bearer token 字符串解析为已验证的
//! (Account, Realm, Token) 三元组。十个检查按固定顺序短路，
//! 每次尝试（含任何一步失败）恰好产生一条审计事件。

use std::sync::Arc;

use chrono::Utc;

use crate::crypto;
use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::token;
use crate::types::{
    Account, ActivityEvent, ActivityOutcome, ApiToken, ApprovalStatus, CallerContext, Realm,
};

const AUTH_ACTION: &str = "token.authenticate";

/// 认证成功后的会话三元组
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub account: Account,
    pub realm: Realm,
    pub token: ApiToken,
}

/// 认证服务
pub struct AuthService {
    ctx: Arc<ServiceContext>,
}

impl AuthService {
    /// 创建认证服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// 认证一个 bearer token 字符串
    ///
    /// 检查顺序（首个失败即返回）：
    /// 1. 语法解码；2. 账户查找；3. 账户活跃；4/5. 前缀候选查找；
    /// 6. 慢散列校验；7. 吊销/停用；8. 过期；9. Realm 审批；10. 成功。
    /// 账户不存在、前缀无匹配、密文不符都返回同一个
    /// [`CoreError::InvalidToken`]，防止账户枚举。
    pub async fn authenticate(
        &self,
        token_str: &str,
        caller: &CallerContext,
    ) -> CoreResult<AuthSession> {
        let result = self.authenticate_inner(token_str, caller).await;

        let mut event = match &result {
            Ok(session) => {
                let mut event =
                    ActivityEvent::new(AUTH_ACTION, caller, ActivityOutcome::Success);
                event.account_id = Some(session.account.id.clone());
                event.token_id = Some(session.token.id.clone());
                event.domain = Some(session.realm.domain.clone());
                event
            }
            Err((err, account_id, token_id)) => {
                let mut event = ActivityEvent::new(AUTH_ACTION, caller, ActivityOutcome::Denied);
                event.account_id = account_id.clone();
                event.token_id = token_id.clone();
                event.reason = Some(err.to_string());
                event
            }
        };
        // token 原文永不入审计，只留清洗后的摘要
        event = event.with_request_summary(&format!("bearer {token_str}"));
        self.ctx.record_activity(event).await;

        result.map_err(|(err, _, _)| err)
    }

    /// 认证主体；错误侧带回已解析出的账户/Token ID 供审计使用
    async fn authenticate_inner(
        &self,
        token_str: &str,
        caller: &CallerContext,
    ) -> Result<AuthSession, (CoreError, Option<String>, Option<String>)> {
        // 1. 语法解码，不触达存储
        let decoded = token::decode(token_str).map_err(|e| {
            log::debug!("Token rejected by codec: {e}");
            (CoreError::InvalidFormat, None, None)
        })?;

        // 2. 账户查找（缺失与密文错误对外同形）
        let account = self
            .ctx
            .store
            .account_by_handle(&decoded.handle)
            .await
            .map_err(|e| (e, None, None))?
            .ok_or((CoreError::InvalidToken, None, None))?;
        let account_id = Some(account.id.clone());

        // 3. 账户活跃
        if !account.is_active {
            return Err((CoreError::AccountDisabled, account_id, None));
        }

        // 4. 前缀缩小候选集（前缀不是安全边界）
        let prefix = token::lookup_prefix(&decoded.secret);
        let candidates = self
            .ctx
            .store
            .tokens_by_account_and_prefix(&account.id, prefix)
            .await
            .map_err(|e| (e, account_id.clone(), None))?;

        // 5/6. 逐个做慢散列校验，全不匹配与账户缺失同形
        let matched = candidates
            .into_iter()
            .find(|t| crypto::verify_secret(&decoded.secret, &t.secret_hash))
            .ok_or((CoreError::InvalidToken, account_id.clone(), None))?;
        let token_id = Some(matched.id.clone());

        // 7. 吊销单向：revoked_at 一旦设置，is_active 说什么都不算
        if matched.is_revoked() || !matched.is_active {
            return Err((CoreError::TokenRevoked, account_id, token_id));
        }

        // 8. 过期
        if matched.is_expired(Utc::now()) {
            return Err((CoreError::TokenExpired, account_id, token_id));
        }

        // 9. Realm 审批
        let realm = self
            .ctx
            .store
            .realm_by_id(&matched.realm_id)
            .await
            .map_err(|e| (e, account_id.clone(), token_id.clone()))?
            .ok_or_else(|| {
                // Token 指向不存在的 Realm 是存储不变量被破坏
                (
                    CoreError::Storage(format!("realm {} missing for token", matched.realm_id)),
                    account_id.clone(),
                    token_id.clone(),
                )
            })?;
        if realm.approval_status != ApprovalStatus::Approved {
            return Err((CoreError::RealmNotApproved, account_id, token_id));
        }

        // 10. 成功：更新使用统计
        if let Err(e) = self
            .ctx
            .store
            .update_token_usage(&matched.id, Utc::now(), &caller.source_ip)
            .await
        {
            log::warn!("Failed to update usage for token {}: {e}", matched.id);
        }

        Ok(AuthSession {
            account,
            realm,
            token: matched,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TestWorld, caller, issue_token};
    use crate::types::RealmType;

    #[tokio::test]
    async fn valid_token_authenticates() {
        let world = TestWorld::new().await;
        let token_str = issue_token(&world, "alice", RealmType::Host, "api", None).await;

        let session = world.auth().authenticate(&token_str, &caller()).await;
        assert!(session.is_ok(), "unexpected: {session:?}");
        let Ok(session) = session else { return };
        assert_eq!(session.account.username, "alice");

        // 成功也要留痕
        let events = world.recorder.events().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].outcome, ActivityOutcome::Success);
    }

    #[tokio::test]
    async fn malformed_token_is_invalid_format() {
        let world = TestWorld::new().await;
        let result = world.auth().authenticate("not-a-token", &caller()).await;
        assert!(matches!(result, Err(CoreError::InvalidFormat)));

        let events = world.recorder.events().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].outcome, ActivityOutcome::Denied);
        assert!(events[0].account_id.is_none());
    }

    #[tokio::test]
    async fn corrupted_prefix_attempt_never_logs_the_secret() {
        let world = TestWorld::new().await;
        let secret = "Z".repeat(64);

        // 前缀打错的尝试也会留审计摘要，secret 不能随之入库
        let result = world
            .auth()
            .authenticate(&format!("nfa_alice_{secret}"), &caller())
            .await;
        assert!(matches!(result, Err(CoreError::InvalidFormat)));

        let events = world.recorder.events().await;
        assert_eq!(events.len(), 1);
        let json = serde_json::to_string(&events[0]).unwrap();
        assert!(!json.contains(&secret), "secret leaked in: {json}");
    }

    #[tokio::test]
    async fn unknown_account_and_wrong_secret_look_identical() {
        let world = TestWorld::new().await;
        issue_token(&world, "alice", RealmType::Host, "api", None).await;

        let unknown = format!("naf_nobody_{}", "a".repeat(64));
        let wrong_secret = format!("naf_alice_{}", "a".repeat(64));

        let e1 = world.auth().authenticate(&unknown, &caller()).await;
        let e2 = world.auth().authenticate(&wrong_secret, &caller()).await;
        assert!(matches!(e1, Err(CoreError::InvalidToken)));
        assert!(matches!(e2, Err(CoreError::InvalidToken)));
    }

    #[tokio::test]
    async fn one_character_altered_secret_never_authenticates() {
        let world = TestWorld::new().await;
        let token_str = issue_token(&world, "alice", RealmType::Host, "api", None).await;

        let mut altered = token_str.clone();
        let last = altered.pop().unwrap();
        altered.push(if last == 'A' { 'B' } else { 'A' });

        let result = world.auth().authenticate(&altered, &caller()).await;
        assert!(matches!(result, Err(CoreError::InvalidToken)));
    }

    #[tokio::test]
    async fn disabled_account_short_circuits() {
        let world = TestWorld::new().await;
        let token_str = issue_token(&world, "alice", RealmType::Host, "api", None).await;
        world.disable_account("alice").await;

        let result = world.auth().authenticate(&token_str, &caller()).await;
        assert!(matches!(result, Err(CoreError::AccountDisabled)));
    }

    #[tokio::test]
    async fn revocation_is_monotonic() {
        let world = TestWorld::new().await;
        let token_str = issue_token(&world, "alice", RealmType::Host, "api", None).await;

        world.revoke_all_tokens().await;
        let result = world.auth().authenticate(&token_str, &caller()).await;
        assert!(matches!(result, Err(CoreError::TokenRevoked)));

        // 绕过正常 API 把 active 标志翻回去，revoked_at 仍然生效
        world.force_all_tokens_active().await;
        let result = world.auth().authenticate(&token_str, &caller()).await;
        assert!(matches!(result, Err(CoreError::TokenRevoked)));
    }

    #[tokio::test]
    async fn expired_token_rejected() {
        let world = TestWorld::new().await;
        let token_str = issue_token(&world, "alice", RealmType::Host, "api", None).await;
        world
            .expire_all_tokens(Utc::now() - chrono::Duration::minutes(1))
            .await;

        let result = world.auth().authenticate(&token_str, &caller()).await;
        assert!(matches!(result, Err(CoreError::TokenExpired)));
    }

    #[tokio::test]
    async fn pending_realm_rejected() {
        let world = TestWorld::new().await;
        let token_str = issue_token(&world, "alice", RealmType::Host, "api", None).await;
        world.set_realm_status(ApprovalStatus::Pending).await;

        let result = world.auth().authenticate(&token_str, &caller()).await;
        assert!(matches!(result, Err(CoreError::RealmNotApproved)));
    }

    #[tokio::test]
    async fn successful_auth_updates_usage() {
        let world = TestWorld::new().await;
        let token_str = issue_token(&world, "alice", RealmType::Host, "api", None).await;

        world
            .auth()
            .authenticate(&token_str, &caller())
            .await
            .unwrap();
        let token = world.first_token().await;
        assert_eq!(token.use_count, 1);
        assert!(token.last_used_at.is_some());
    }
}

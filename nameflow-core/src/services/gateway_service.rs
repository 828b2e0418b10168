//! DNS 网关服务
//!
//! 面向调用方的入口：每个操作都走同一条流水线
//! 认证 → 授权 → Backend 解析 → （全量替换型加区域锁）→ 执行。
//! 认证事件由 [`AuthService`] 记录；授权决策在这里恰好记录一条。

use std::sync::Arc;

use nameflow_backend::{
    BackendError, DnsBackend, MutationStrategy, NewRecord, Record, RecordType, ZoneLocks,
};

use crate::error::{CoreError, CoreResult, OutwardSignal};
use crate::realm_matcher;
use crate::services::{AuthService, AuthSession, AuthzService, BackendResolver, ServiceContext};
use crate::types::{ActivityEvent, ActivityOutcome, CallerContext, RecordOperation};

/// DNS 网关服务
pub struct GatewayService {
    ctx: Arc<ServiceContext>,
    auth: AuthService,
    resolver: BackendResolver,
    zone_locks: ZoneLocks,
}

impl GatewayService {
    /// 创建网关服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            auth: AuthService::new(Arc::clone(&ctx)),
            resolver: BackendResolver::new(Arc::clone(&ctx)),
            zone_locks: ZoneLocks::new(),
            ctx,
        }
    }

    /// 列出作用域内的记录
    ///
    /// Backend 返回整个区域的记录集，出口处按 Realm 作用域过滤，
    /// 调用方永远看不到作用域外的记录。
    pub async fn list_records(
        &self,
        token_str: &str,
        domain: &str,
        caller: &CallerContext,
    ) -> CoreResult<Vec<Record>> {
        let session = self.auth.authenticate(token_str, caller).await?;
        let result = self.list_inner(&session, domain, caller).await;
        self.audit(
            &session,
            "dns.list",
            RecordOperation::Read,
            domain,
            None,
            caller,
            result.as_ref().err(),
        )
        .await;
        result
    }

    /// 在作用域内创建一条记录
    pub async fn create_record(
        &self,
        token_str: &str,
        domain: &str,
        record: &NewRecord,
        caller: &CallerContext,
    ) -> CoreResult<Record> {
        let session = self.auth.authenticate(token_str, caller).await?;
        let result = self.create_inner(&session, domain, record, caller).await;
        self.audit(
            &session,
            "dns.create",
            RecordOperation::Create,
            domain,
            Some(record.record_type),
            caller,
            result.as_ref().err(),
        )
        .await;
        result
    }

    /// 更新作用域内的一条记录
    pub async fn update_record(
        &self,
        token_str: &str,
        domain: &str,
        record_id: &str,
        record: &NewRecord,
        caller: &CallerContext,
    ) -> CoreResult<Record> {
        let session = self.auth.authenticate(token_str, caller).await?;
        let result = self
            .update_inner(&session, domain, record_id, record, caller)
            .await;
        self.audit(
            &session,
            "dns.update",
            RecordOperation::Update,
            domain,
            Some(record.record_type),
            caller,
            result.as_ref().err(),
        )
        .await;
        result
    }

    /// 删除作用域内的一条记录
    ///
    /// 记录不存在（或在作用域外，二者对外同形）时返回 `Ok(false)`。
    pub async fn delete_record(
        &self,
        token_str: &str,
        domain: &str,
        record_id: &str,
        caller: &CallerContext,
    ) -> CoreResult<bool> {
        let session = self.auth.authenticate(token_str, caller).await?;
        let result = self
            .delete_inner(&session, domain, record_id, caller)
            .await;
        self.audit(
            &session,
            "dns.delete",
            RecordOperation::Delete,
            domain,
            None,
            caller,
            result.as_ref().err(),
        )
        .await;
        result
    }

    async fn list_inner(
        &self,
        session: &AuthSession,
        domain: &str,
        caller: &CallerContext,
    ) -> CoreResult<Vec<Record>> {
        AuthzService::authorize(
            session,
            RecordOperation::Read,
            domain,
            None,
            Some(&caller.source_ip),
        )?;
        let backend = self.resolver.resolve(&session.realm).await?;
        let records = backend.list_records(domain).await?;
        Ok(realm_matcher::filter_records(&session.realm, records))
    }

    async fn create_inner(
        &self,
        session: &AuthSession,
        domain: &str,
        record: &NewRecord,
        caller: &CallerContext,
    ) -> CoreResult<Record> {
        AuthzService::authorize(
            session,
            RecordOperation::Create,
            domain,
            Some(record.record_type),
            Some(&caller.source_ip),
        )?;
        if !realm_matcher::matches_relative(&session.realm, &record.hostname) {
            return Err(CoreError::ForbiddenHostname(record.hostname.clone()));
        }

        let backend = self.resolver.resolve(&session.realm).await?;
        let _guard = self.zone_guard(&backend, domain).await;
        Ok(backend.create_record(domain, record).await?)
    }

    async fn update_inner(
        &self,
        session: &AuthSession,
        domain: &str,
        record_id: &str,
        record: &NewRecord,
        caller: &CallerContext,
    ) -> CoreResult<Record> {
        AuthzService::authorize(
            session,
            RecordOperation::Update,
            domain,
            Some(record.record_type),
            Some(&caller.source_ip),
        )?;
        if !realm_matcher::matches_relative(&session.realm, &record.hostname) {
            return Err(CoreError::ForbiddenHostname(record.hostname.clone()));
        }

        let backend = self.resolver.resolve(&session.realm).await?;

        // 既有记录必须也在作用域内；作用域外与不存在对外同形，
        // 不给调用方探测区域内其他记录的机会
        let existing = self
            .scoped_record_by_id(session, &backend, domain, record_id)
            .await?
            .ok_or_else(|| {
                CoreError::Backend(BackendError::RecordNotFound {
                    backend: backend.kind().to_string(),
                    record_id: record_id.to_string(),
                    raw_message: None,
                })
            })?;
        // 改类型也要求旧类型在授权范围内
        AuthzService::authorize(
            session,
            RecordOperation::Update,
            domain,
            Some(existing.record_type),
            Some(&caller.source_ip),
        )?;

        let _guard = self.zone_guard(&backend, domain).await;
        Ok(backend.update_record(domain, record_id, record).await?)
    }

    async fn delete_inner(
        &self,
        session: &AuthSession,
        domain: &str,
        record_id: &str,
        caller: &CallerContext,
    ) -> CoreResult<bool> {
        AuthzService::authorize(
            session,
            RecordOperation::Delete,
            domain,
            None,
            Some(&caller.source_ip),
        )?;

        let backend = self.resolver.resolve(&session.realm).await?;
        let Some(existing) = self
            .scoped_record_by_id(session, &backend, domain, record_id)
            .await?
        else {
            return Ok(false);
        };
        AuthzService::authorize(
            session,
            RecordOperation::Delete,
            domain,
            Some(existing.record_type),
            Some(&caller.source_ip),
        )?;

        let _guard = self.zone_guard(&backend, domain).await;
        Ok(backend.delete_record(domain, record_id).await?)
    }

    /// 按 ID 查找既有记录，作用域外的记录视为不存在
    async fn scoped_record_by_id(
        &self,
        session: &AuthSession,
        backend: &Arc<dyn DnsBackend>,
        domain: &str,
        record_id: &str,
    ) -> CoreResult<Option<Record>> {
        let records = backend.list_records(domain).await?;
        Ok(records
            .into_iter()
            .find(|r| r.id == record_id)
            .filter(|r| realm_matcher::matches_relative(&session.realm, &r.hostname)))
    }

    /// 全量替换型 Backend 的整组提交不可并发，按区域名串行化
    async fn zone_guard(
        &self,
        backend: &Arc<dyn DnsBackend>,
        domain: &str,
    ) -> Option<tokio::sync::OwnedMutexGuard<()>> {
        if backend.mutation_strategy() == MutationStrategy::FullReplace {
            Some(self.zone_locks.acquire(domain).await)
        } else {
            None
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn audit(
        &self,
        session: &AuthSession,
        action: &str,
        operation: RecordOperation,
        domain: &str,
        record_type: Option<RecordType>,
        caller: &CallerContext,
        error: Option<&CoreError>,
    ) {
        let outcome = match error {
            None => ActivityOutcome::Success,
            Some(e) => match e.outward() {
                OutwardSignal::ForbiddenIp
                | OutwardSignal::ForbiddenDomain
                | OutwardSignal::ForbiddenOperation
                | OutwardSignal::ForbiddenRecordType
                | OutwardSignal::ForbiddenHostname => ActivityOutcome::Denied,
                _ => ActivityOutcome::Error,
            },
        };
        let mut event = ActivityEvent::new(action, caller, outcome);
        event.account_id = Some(session.account.id.clone());
        event.token_id = Some(session.token.id.clone());
        event.operation = Some(operation);
        event.domain = Some(domain.to_string());
        event.record_type = record_type;
        event.reason = error.map(std::string::ToString::to_string);
        self.ctx.record_activity(event).await;
    }
}

//! 测试辅助：内存版存储与审计实现
//!
//! `TestWorld` 预置一个平台域根（`example.com`，deSEC 服务支撑），
//! `issue_token` 在其上创建账户、Realm 和已散列的 Token，
//! 返回可直接认证的 bearer 字符串。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use tokio::sync::RwLock;

use nameflow_backend::{BackendKind, RecordType};

use crate::crypto;
use crate::error::CoreResult;
use crate::services::{AuthService, ServiceContext};
use crate::token;
use crate::traits::{ActivityRecorder, CredentialStore};
use crate::types::{
    Account, ActivityEvent, ApiToken, ApprovalStatus, BackendService, CallerContext, DomainRoot,
    Realm, RealmBackendLink, RealmType, RecordOperation,
};

pub const TEST_DOMAIN: &str = "example.com";
const DEFAULT_ROOT_ID: &str = "root-default";
pub const DEFAULT_SERVICE_ID: &str = "svc-default";

/// 内存凭证存储
#[derive(Default)]
pub struct MockStore {
    pub accounts: RwLock<HashMap<String, Account>>,
    pub realms: RwLock<HashMap<String, Realm>>,
    pub tokens: RwLock<Vec<ApiToken>>,
    pub domain_roots: RwLock<HashMap<String, DomainRoot>>,
    pub services: RwLock<HashMap<String, BackendService>>,
}

#[async_trait]
impl CredentialStore for MockStore {
    async fn account_by_handle(&self, handle: &str) -> CoreResult<Option<Account>> {
        Ok(self.accounts.read().await.get(handle).cloned())
    }

    async fn tokens_by_account_and_prefix(
        &self,
        account_id: &str,
        lookup_prefix: &str,
    ) -> CoreResult<Vec<ApiToken>> {
        let realms = self.realms.read().await;
        let tokens = self.tokens.read().await;
        Ok(tokens
            .iter()
            .filter(|t| t.lookup_prefix == lookup_prefix)
            .filter(|t| {
                realms
                    .get(&t.realm_id)
                    .is_some_and(|r| r.account_id == account_id)
            })
            .cloned()
            .collect())
    }

    async fn realm_by_id(&self, realm_id: &str) -> CoreResult<Option<Realm>> {
        Ok(self.realms.read().await.get(realm_id).cloned())
    }

    async fn domain_root_by_id(&self, root_id: &str) -> CoreResult<Option<DomainRoot>> {
        Ok(self.domain_roots.read().await.get(root_id).cloned())
    }

    async fn backend_service_by_id(&self, service_id: &str) -> CoreResult<Option<BackendService>> {
        Ok(self.services.read().await.get(service_id).cloned())
    }

    async fn update_token_usage(
        &self,
        token_id: &str,
        used_at: DateTime<Utc>,
        source_ip: &str,
    ) -> CoreResult<()> {
        let mut tokens = self.tokens.write().await;
        if let Some(t) = tokens.iter_mut().find(|t| t.id == token_id) {
            t.use_count += 1;
            t.last_used_at = Some(used_at);
            t.last_used_ip = Some(source_ip.to_string());
        }
        Ok(())
    }

    async fn update_realm_status(&self, realm_id: &str, status: ApprovalStatus) -> CoreResult<()> {
        if let Some(r) = self.realms.write().await.get_mut(realm_id) {
            r.approval_status = status;
        }
        Ok(())
    }

    async fn revoke_token(&self, token_id: &str, reason: Option<String>) -> CoreResult<()> {
        let mut tokens = self.tokens.write().await;
        if let Some(t) = tokens.iter_mut().find(|t| t.id == token_id) {
            t.revoked_at = Some(Utc::now());
            t.revoked_reason = reason;
            t.is_active = false;
        }
        Ok(())
    }
}

/// 内存审计记录器
#[derive(Default)]
pub struct MockRecorder {
    events: RwLock<Vec<ActivityEvent>>,
}

impl MockRecorder {
    pub async fn events(&self) -> Vec<ActivityEvent> {
        self.events.read().await.clone()
    }
}

#[async_trait]
impl ActivityRecorder for MockRecorder {
    async fn record(&self, event: ActivityEvent) -> CoreResult<()> {
        self.events.write().await.push(event);
        Ok(())
    }
}

/// 完整的测试环境
pub struct TestWorld {
    pub store: Arc<MockStore>,
    pub recorder: Arc<MockRecorder>,
    pub ctx: Arc<ServiceContext>,
}

impl TestWorld {
    pub async fn new() -> Self {
        let store = Arc::new(MockStore::default());
        let recorder = Arc::new(MockRecorder::default());
        let ctx = Arc::new(ServiceContext::new(store.clone(), recorder.clone()));

        store.services.write().await.insert(
            DEFAULT_SERVICE_ID.to_string(),
            BackendService {
                id: DEFAULT_SERVICE_ID.to_string(),
                owner_account_id: None,
                kind: BackendKind::Desec,
                config: json!({ "apiToken": "test-token" }),
                is_active: true,
                created_at: Utc::now(),
            },
        );
        store.domain_roots.write().await.insert(
            DEFAULT_ROOT_ID.to_string(),
            DomainRoot {
                id: DEFAULT_ROOT_ID.to_string(),
                zone: TEST_DOMAIN.to_string(),
                service_id: DEFAULT_SERVICE_ID.to_string(),
                is_active: true,
                created_at: Utc::now(),
            },
        );

        Self {
            store,
            recorder,
            ctx,
        }
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.ctx.clone())
    }

    pub async fn disable_account(&self, handle: &str) {
        if let Some(a) = self.store.accounts.write().await.get_mut(handle) {
            a.is_active = false;
        }
    }

    pub async fn revoke_all_tokens(&self) {
        for t in self.store.tokens.write().await.iter_mut() {
            t.revoked_at = Some(Utc::now());
            t.is_active = false;
        }
    }

    pub async fn force_all_tokens_active(&self) {
        for t in self.store.tokens.write().await.iter_mut() {
            t.is_active = true;
        }
    }

    pub async fn expire_all_tokens(&self, at: DateTime<Utc>) {
        for t in self.store.tokens.write().await.iter_mut() {
            t.expires_at = Some(at);
        }
    }

    pub async fn set_realm_status(&self, status: ApprovalStatus) {
        let ids: Vec<String> = self.store.realms.read().await.keys().cloned().collect();
        for id in ids {
            self.store.update_realm_status(&id, status).await.unwrap();
        }
    }

    pub async fn set_realm_operations(&self, operations: Vec<RecordOperation>) {
        for r in self.store.realms.write().await.values_mut() {
            r.allowed_operations = operations.clone();
        }
    }

    pub async fn first_token(&self) -> ApiToken {
        self.store.tokens.read().await[0].clone()
    }

    pub async fn deactivate_domain_roots(&self) {
        for root in self.store.domain_roots.write().await.values_mut() {
            root.is_active = false;
        }
    }

    pub async fn add_service(&self, owner_account_id: Option<String>, is_active: bool) -> String {
        let id = format!("svc-{}", self.store.services.read().await.len());
        self.store.services.write().await.insert(
            id.clone(),
            BackendService {
                id: id.clone(),
                owner_account_id,
                kind: BackendKind::Desec,
                config: json!({ "apiToken": "test-token" }),
                is_active,
                created_at: Utc::now(),
            },
        );
        id
    }

    pub async fn corrupt_service_configs(&self) {
        for s in self.store.services.write().await.values_mut() {
            s.config = json!({});
        }
    }
}

/// 默认调用方上下文
pub fn caller() -> CallerContext {
    CallerContext::new("203.0.113.5")
}

/// 创建账户 + Realm + Token，返回 bearer 字符串
///
/// Realm 默认只允许 `read` 操作、A/CNAME/TXT 三种类型，
/// 挂在预置的平台域根上。
pub async fn issue_token(
    world: &TestWorld,
    handle: &str,
    realm_type: RealmType,
    value: &str,
    ops_override: Option<Vec<RecordOperation>>,
) -> String {
    let account_id = format!("acct-{handle}");
    let realm_id = format!("realm-{handle}-{value}");
    let now = Utc::now();

    world.store.accounts.write().await.insert(
        handle.to_string(),
        Account {
            id: account_id.clone(),
            username: handle.to_string(),
            email: format!("{handle}@example.com"),
            password_hash: String::new(),
            is_active: true,
            is_admin: false,
            failed_login_count: 0,
            locked_until: None,
            created_at: now,
        },
    );
    world.store.realms.write().await.insert(
        realm_id.clone(),
        Realm {
            id: realm_id.clone(),
            account_id,
            domain: TEST_DOMAIN.to_string(),
            realm_type,
            value: value.to_string(),
            allowed_record_types: vec![RecordType::A, RecordType::Cname, RecordType::Txt],
            allowed_operations: vec![RecordOperation::Read],
            approval_status: ApprovalStatus::Approved,
            backend_link: RealmBackendLink::DomainRoot(DEFAULT_ROOT_ID.to_string()),
            created_at: now,
        },
    );

    let (token_str, secret) = token::encode(handle).unwrap();
    let token_count = world.store.tokens.read().await.len();
    world.store.tokens.write().await.push(ApiToken {
        id: format!("tok-{handle}-{token_count}"),
        realm_id,
        name: format!("{value}-token"),
        secret_hash: crypto::hash_secret(&secret).unwrap(),
        lookup_prefix: token::lookup_prefix(&secret).to_string(),
        allowed_record_types: None,
        allowed_operations: ops_override,
        allowed_ips: None,
        expires_at: None,
        is_active: true,
        revoked_at: None,
        revoked_reason: None,
        use_count: 0,
        last_used_at: None,
        last_used_ip: None,
        created_at: now,
    });

    token_str
}

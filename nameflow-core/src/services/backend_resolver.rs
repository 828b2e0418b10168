//! Backend 解析服务
//!
//! 把 Realm 的 backend 关联（平台域根或用户自有服务）解析成可调用的
//! [`DnsBackend`] 实例。实例按服务 ID 做短 TTL 缓存，避免每个请求
//! 重建 HTTP 客户端。

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use nameflow_backend::{DnsBackend, create_backend, validate_config};

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{BackendService, Realm, RealmBackendLink};

/// 缓存实例的最大存活时间
const CACHE_TTL: Duration = Duration::from_secs(60);
/// 缓存条目上限，超出时淘汰最旧一条
const CACHE_CAPACITY: usize = 32;

struct CacheEntry {
    backend: Arc<dyn DnsBackend>,
    inserted_at: Instant,
}

/// Backend 解析服务
pub struct BackendResolver {
    ctx: Arc<ServiceContext>,
    cache: Mutex<HashMap<String, CacheEntry>>,
}

impl BackendResolver {
    /// 创建解析服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            ctx,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// 解析 Realm 关联的 Backend 实例
    ///
    /// # Errors
    ///
    /// 关联的域根或服务不存在时返回 [`CoreError::BackendNotFound`]，
    /// 已停用时返回 [`CoreError::BackendUnavailable`]；用户自有服务的
    /// 属主与 Realm 属主不一致时返回 [`CoreError::BackendOwnershipMismatch`]；
    /// 存储的配置 blob 校验失败时返回 [`CoreError::BackendConfigInvalid`]。
    pub async fn resolve(&self, realm: &Realm) -> CoreResult<Arc<dyn DnsBackend>> {
        let service = match &realm.backend_link {
            RealmBackendLink::DomainRoot(root_id) => {
                let root = self
                    .ctx
                    .store
                    .domain_root_by_id(root_id)
                    .await?
                    .ok_or_else(|| CoreError::BackendNotFound(root_id.clone()))?;
                if !root.is_active {
                    return Err(CoreError::BackendUnavailable(root.zone));
                }
                self.service_by_id(&root.service_id).await?
            }
            RealmBackendLink::Service(service_id) => {
                let service = self.service_by_id(service_id).await?;
                // 用户自有服务必须归属 Realm 的账户；平台服务只能经域根引用
                if service.owner_account_id.as_deref() != Some(realm.account_id.as_str()) {
                    return Err(CoreError::BackendOwnershipMismatch(service.id));
                }
                service
            }
        };

        if let Some(entry) = self.cache_get(&service.id).await {
            return Ok(entry);
        }

        let credentials = validate_config(service.kind, &service.config)
            .map_err(CoreError::BackendConfigInvalid)?;
        let backend = create_backend(credentials);
        self.cache_put(service.id, Arc::clone(&backend)).await;
        Ok(backend)
    }

    /// 预置缓存条目，供测试替换真实 Backend 实例
    #[cfg(test)]
    pub(crate) async fn prime_cache(&self, service_id: &str, backend: Arc<dyn DnsBackend>) {
        self.cache_put(service_id.to_string(), backend).await;
    }

    async fn service_by_id(&self, service_id: &str) -> CoreResult<BackendService> {
        let service = self
            .ctx
            .store
            .backend_service_by_id(service_id)
            .await?
            .ok_or_else(|| CoreError::BackendNotFound(service_id.to_string()))?;
        if !service.is_active {
            return Err(CoreError::BackendUnavailable(service.id));
        }
        Ok(service)
    }

    async fn cache_get(&self, service_id: &str) -> Option<Arc<dyn DnsBackend>> {
        let mut cache = self.cache.lock().await;
        if let Some(entry) = cache.get(service_id) {
            if entry.inserted_at.elapsed() < CACHE_TTL {
                return Some(Arc::clone(&entry.backend));
            }
            cache.remove(service_id);
        }
        None
    }

    async fn cache_put(&self, service_id: String, backend: Arc<dyn DnsBackend>) {
        let mut cache = self.cache.lock().await;
        if cache.len() >= CACHE_CAPACITY && !cache.contains_key(&service_id) {
            let oldest = cache
                .iter()
                .min_by_key(|(_, entry)| entry.inserted_at)
                .map(|(id, _)| id.clone());
            if let Some(id) = oldest {
                cache.remove(&id);
            }
        }
        cache.insert(
            service_id,
            CacheEntry {
                backend,
                inserted_at: Instant::now(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TestWorld, caller, issue_token};
    use crate::types::RealmType;

    async fn world_with_session() -> (TestWorld, Realm) {
        let world = TestWorld::new().await;
        let token_str = issue_token(&world, "alice", RealmType::Host, "api", None).await;
        let session = world
            .auth()
            .authenticate(&token_str, &caller())
            .await
            .unwrap();
        (world, session.realm)
    }

    #[tokio::test]
    async fn resolves_through_domain_root() {
        let (world, realm) = world_with_session().await;
        let resolver = BackendResolver::new(world.ctx.clone());

        let backend = resolver.resolve(&realm).await;
        assert!(backend.is_ok(), "unexpected: {:?}", backend.err());
    }

    #[tokio::test]
    async fn repeated_resolve_reuses_cached_instance() {
        let (world, realm) = world_with_session().await;
        let resolver = BackendResolver::new(world.ctx.clone());

        let first = resolver.resolve(&realm).await.unwrap();
        let second = resolver.resolve(&realm).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn inactive_domain_root_is_unavailable() {
        let (world, realm) = world_with_session().await;
        world.deactivate_domain_roots().await;
        let resolver = BackendResolver::new(world.ctx.clone());

        let result = resolver.resolve(&realm).await;
        assert!(matches!(result, Err(CoreError::BackendUnavailable(_))));
    }

    #[tokio::test]
    async fn dangling_domain_root_is_not_found() {
        let (world, mut realm) = world_with_session().await;
        realm.backend_link = RealmBackendLink::DomainRoot("no-such-root".to_string());
        let resolver = BackendResolver::new(world.ctx.clone());

        let result = resolver.resolve(&realm).await;
        assert!(matches!(result, Err(CoreError::BackendNotFound(_))));
    }

    #[tokio::test]
    async fn own_service_link_resolves() {
        let (world, mut realm) = world_with_session().await;
        let service_id = world
            .add_service(Some(realm.account_id.clone()), true)
            .await;
        realm.backend_link = RealmBackendLink::Service(service_id);
        let resolver = BackendResolver::new(world.ctx.clone());

        assert!(resolver.resolve(&realm).await.is_ok());
    }

    #[tokio::test]
    async fn foreign_service_link_is_ownership_mismatch() {
        let (world, mut realm) = world_with_session().await;
        let service_id = world.add_service(Some("acct-other".to_string()), true).await;
        realm.backend_link = RealmBackendLink::Service(service_id);
        let resolver = BackendResolver::new(world.ctx.clone());

        let result = resolver.resolve(&realm).await;
        assert!(matches!(result, Err(CoreError::BackendOwnershipMismatch(_))));
    }

    #[tokio::test]
    async fn platform_service_cannot_be_linked_directly() {
        // owner=None 的平台服务只能经域根引用
        let (world, mut realm) = world_with_session().await;
        let service_id = world.add_service(None, true).await;
        realm.backend_link = RealmBackendLink::Service(service_id);
        let resolver = BackendResolver::new(world.ctx.clone());

        let result = resolver.resolve(&realm).await;
        assert!(matches!(result, Err(CoreError::BackendOwnershipMismatch(_))));
    }

    #[tokio::test]
    async fn invalid_stored_config_is_rejected() {
        let (world, realm) = world_with_session().await;
        world.corrupt_service_configs().await;
        let resolver = BackendResolver::new(world.ctx.clone());

        let result = resolver.resolve(&realm).await;
        assert!(matches!(result, Err(CoreError::BackendConfigInvalid(_))));
    }
}

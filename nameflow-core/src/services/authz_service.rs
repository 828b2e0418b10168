//! 授权服务
//!
//! 纯决策：给定已认证的会话和请求的 (操作, 域, 记录类型, 来源 IP)，
//! 按固定顺序检查，首个失败即拒绝。审计由调用方负责。

use std::net::IpAddr;
use std::str::FromStr;

use ipnetwork::IpNetwork;

use nameflow_backend::RecordType;

use crate::error::{CoreError, CoreResult};
use crate::services::AuthSession;
use crate::types::RecordOperation;

/// 授权服务（无状态）
pub struct AuthzService;

impl AuthzService {
    /// 授权一次请求
    ///
    /// 检查顺序：IP 允许列表 → 基础域相等 → 有效操作集 → 有效记录类型集。
    /// 有效集中的成员还要同时在 Realm 当前集合内（过宽的 override
    /// 被静默收窄，不报错）。
    pub fn authorize(
        session: &AuthSession,
        operation: RecordOperation,
        domain: &str,
        record_type: Option<RecordType>,
        caller_ip: Option<&str>,
    ) -> CoreResult<()> {
        let realm = &session.realm;
        let token = &session.token;

        // 1. IP 允许列表（空 = 不限制）
        if let Some(allowed) = token.allowed_ips.as_deref()
            && !allowed.is_empty()
        {
            let ip = caller_ip
                .and_then(|raw| IpAddr::from_str(raw).ok())
                .ok_or_else(|| {
                    CoreError::ForbiddenIp(caller_ip.unwrap_or("<missing>").to_string())
                })?;
            if !ip_allowed(ip, allowed) {
                return Err(CoreError::ForbiddenIp(ip.to_string()));
            }
        }

        // 2. 基础域相等（Realm 永不跨域授权）
        let requested = domain.trim_end_matches('.');
        if !requested.eq_ignore_ascii_case(realm.domain.trim_end_matches('.')) {
            return Err(CoreError::ForbiddenDomain(domain.to_string()));
        }

        // 3. 操作：有效集 ∩ Realm 当前集
        if !token.effective_operations(realm).contains(&operation)
            || !realm.allowed_operations.contains(&operation)
        {
            return Err(CoreError::ForbiddenOperation(operation.to_string()));
        }

        // 4. 记录类型（请求未携带时跳过）
        if let Some(rt) = record_type
            && (!token.effective_record_types(realm).contains(&rt)
                || !realm.allowed_record_types.contains(&rt))
        {
            return Err(CoreError::ForbiddenRecordType(rt.to_string()));
        }

        Ok(())
    }
}

/// IP 是否匹配允许列表中的某一项（单 IP 或 CIDR）
///
/// 解析不了的条目跳过并告警，绝不视为命中。
fn ip_allowed(ip: IpAddr, allowed: &[String]) -> bool {
    allowed.iter().any(|entry| {
        match IpNetwork::from_str(entry.trim()) {
            Ok(network) => network.contains(ip),
            Err(_) => {
                log::warn!("Skipping unparsable IP allow-list entry: {entry:?}");
                false
            }
        }
    })
}

//! Token 相关类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nameflow_backend::RecordType;

use super::realm::{Realm, RecordOperation};

/// 机器凭证，作用域为恰好一个 Realm
///
/// 未设置 override 的字段继承 Realm 的策略。吊销是单向的：
/// `revoked_at` 一旦设置，该 Token 永远不再认证成功，不论
/// `is_active` 之后被改成什么。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiToken {
    /// Token ID (UUID)
    pub id: String,
    /// 所属 Realm ID
    pub realm_id: String,
    /// 人类可读名称（Realm 内唯一）
    pub name: String,
    /// secret 散列（PHC 格式），不序列化
    #[serde(skip_serializing)]
    pub secret_hash: String,
    /// secret 前 12 字符，用于存储查询
    pub lookup_prefix: String,
    /// 记录类型 override（None = 继承 Realm）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_record_types: Option<Vec<RecordType>>,
    /// 操作 override（None = 继承 Realm）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_operations: Option<Vec<RecordOperation>>,
    /// 来源 IP 允许列表（单 IP 或 CIDR；None/空 = 不限制）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_ips: Option<Vec<String>>,
    /// 过期时间
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// 活跃标志
    pub is_active: bool,
    /// 吊销时间（单向）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revoked_at: Option<DateTime<Utc>>,
    /// 吊销原因
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revoked_reason: Option<String>,
    /// 累计使用次数
    pub use_count: u64,
    /// 最近使用时间
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<DateTime<Utc>>,
    /// 最近使用来源 IP
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used_ip: Option<String>,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

impl ApiToken {
    /// 是否已吊销（单向，不看 `is_active`）
    #[must_use]
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// 是否已过期
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|t| t <= now)
    }

    /// 有效操作集：override 优先，否则继承 Realm
    #[must_use]
    pub fn effective_operations<'a>(&'a self, realm: &'a Realm) -> &'a [RecordOperation] {
        self.allowed_operations
            .as_deref()
            .unwrap_or(&realm.allowed_operations)
    }

    /// 有效记录类型集：override 优先，否则继承 Realm
    #[must_use]
    pub fn effective_record_types<'a>(&'a self, realm: &'a Realm) -> &'a [RecordType] {
        self.allowed_record_types
            .as_deref()
            .unwrap_or(&realm.allowed_record_types)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::realm::{ApprovalStatus, RealmBackendLink, RealmType};

    fn realm() -> Realm {
        Realm {
            id: "realm-1".to_string(),
            account_id: "acct-1".to_string(),
            domain: "example.com".to_string(),
            realm_type: RealmType::Subdomain,
            value: String::new(),
            allowed_record_types: vec![RecordType::A, RecordType::Aaaa],
            allowed_operations: vec![RecordOperation::Read, RecordOperation::Create],
            approval_status: ApprovalStatus::Approved,
            backend_link: RealmBackendLink::DomainRoot("root-1".to_string()),
            created_at: Utc::now(),
        }
    }

    fn token() -> ApiToken {
        ApiToken {
            id: "token-1".to_string(),
            realm_id: "realm-1".to_string(),
            name: "ci".to_string(),
            secret_hash: String::new(),
            lookup_prefix: "abcdefghijkl".to_string(),
            allowed_record_types: None,
            allowed_operations: None,
            allowed_ips: None,
            expires_at: None,
            is_active: true,
            revoked_at: None,
            revoked_reason: None,
            use_count: 0,
            last_used_at: None,
            last_used_ip: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn effective_sets_fall_back_to_realm() {
        let realm = realm();
        let token = token();
        assert_eq!(token.effective_operations(&realm), &realm.allowed_operations[..]);
        assert_eq!(
            token.effective_record_types(&realm),
            &realm.allowed_record_types[..]
        );
    }

    #[test]
    fn override_wins_over_realm() {
        let realm = realm();
        let mut token = token();
        token.allowed_operations = Some(vec![RecordOperation::Read]);
        token.allowed_record_types = Some(vec![RecordType::Txt]);
        assert_eq!(token.effective_operations(&realm), &[RecordOperation::Read]);
        assert_eq!(token.effective_record_types(&realm), &[RecordType::Txt]);
    }

    #[test]
    fn revocation_ignores_active_flag() {
        let mut token = token();
        token.revoked_at = Some(Utc::now());
        token.is_active = true;
        assert!(token.is_revoked());
    }

    #[test]
    fn expiry_boundary() {
        let mut token = token();
        let now = Utc::now();
        token.expires_at = Some(now);
        assert!(token.is_expired(now));
        token.expires_at = Some(now + chrono::Duration::seconds(1));
        assert!(!token.is_expired(now));
    }
}

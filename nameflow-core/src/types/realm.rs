//! Realm 相关类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nameflow_backend::RecordType;

/// 记录操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordOperation {
    Read,
    Create,
    Update,
    Delete,
}

impl RecordOperation {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl std::fmt::Display for RecordOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Realm 作用域类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RealmType {
    /// 仅精确匹配 fqdn 本身
    Host,
    /// fqdn 本身及其全部后代
    Subdomain,
    /// 仅后代，排除 fqdn 本身
    SubdomainOnly,
}

/// Realm 审批状态
///
/// 只有 `Approved` 的 Realm 能认证 Token。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

/// Realm 与 Backend 的关联
///
/// 每个 Realm 必须恰好关联平台托管域根或用户自有服务之一。
/// 建模为 sum type，「两者皆无」在类型上不可表示。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum RealmBackendLink {
    /// 平台托管域根 ID
    DomainRoot(String),
    /// 用户自有 Backend 服务 ID
    Service(String),
}

/// DNS 管理能力的作用域授权
///
/// 归属恰好一个账户，覆盖一个基础域内的主机名模式。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Realm {
    /// Realm ID (UUID)
    pub id: String,
    /// 属主账户 ID
    pub account_id: String,
    /// 基础域（区域名）
    pub domain: String,
    /// 作用域类型
    pub realm_type: RealmType,
    /// 作用域值（空字符串 = 区域 apex）
    pub value: String,
    /// 允许的记录类型（非空）
    pub allowed_record_types: Vec<RecordType>,
    /// 允许的操作（read/create/update/delete 的子集）
    pub allowed_operations: Vec<RecordOperation>,
    /// 审批状态
    pub approval_status: ApprovalStatus,
    /// Backend 关联
    pub backend_link: RealmBackendLink,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn realm_type_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&RealmType::SubdomainOnly).unwrap(),
            "\"subdomain_only\""
        );
    }

    #[test]
    fn backend_link_serde_tagged() {
        let link = RealmBackendLink::DomainRoot("root-1".to_string());
        let json = serde_json::to_string(&link).unwrap();
        assert_eq!(json, r#"{"kind":"domainRoot","id":"root-1"}"#);
    }

    #[test]
    fn operation_display() {
        assert_eq!(RecordOperation::Update.to_string(), "update");
    }
}

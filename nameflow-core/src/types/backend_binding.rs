//! Backend 关联类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nameflow_backend::BackendKind;

/// 平台托管域根
///
/// 一个平台管理的 DNS 区域，通过授予 Realm 供多个账户使用，
/// 背后由一个已配置的 Backend 服务支撑。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainRoot {
    /// 域根 ID (UUID)
    pub id: String,
    /// 区域名（如 `example.com`）
    pub zone: String,
    /// 支撑此区域的 Backend 服务 ID
    pub service_id: String,
    /// 活跃标志
    pub is_active: bool,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

/// 已配置的 Backend 服务实例
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendService {
    /// 服务 ID (UUID)
    pub id: String,
    /// 属主账户 ID（None = 平台所有）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_account_id: Option<String>,
    /// Backend 类型
    pub kind: BackendKind,
    /// 凭证配置 blob，实例化前按 Backend 的字段 schema 校验
    pub config: serde_json::Value,
    /// 活跃标志
    pub is_active: bool,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

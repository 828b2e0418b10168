//! 账户相关类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 人类主体账户
///
/// 停用的账户认证不了它名下的任何 Token。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// 账户 ID (UUID)
    pub id: String,
    /// 唯一用户名，即 Token 中的 handle
    pub username: String,
    /// 唯一邮箱
    pub email: String,
    /// 登录口令散列（PHC 格式），不序列化
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// 活跃标志
    pub is_active: bool,
    /// 管理员标志
    pub is_admin: bool,
    /// 连续登录失败计数
    pub failed_login_count: u32,
    /// 锁定截止时间
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked_until: Option<DateTime<Utc>>,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

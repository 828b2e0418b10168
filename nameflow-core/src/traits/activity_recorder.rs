//! 活动审计抽象 Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::ActivityEvent;

/// 活动审计 Trait
///
/// 核心对每次认证尝试和每次授权决策各调用一次（拒绝也调用）。
/// 记录失败不应阻断请求流程，调用侧只记日志。
#[async_trait]
pub trait ActivityRecorder: Send + Sync {
    /// 写入一条活动事件
    async fn record(&self, event: ActivityEvent) -> CoreResult<()>;
}

//! 活动事件类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nameflow_backend::RecordType;

use super::realm::RecordOperation;
use crate::token::{SECRET_LEN, TOKEN_PREFIX};

/// 调用方上下文
#[derive(Debug, Clone)]
pub struct CallerContext {
    /// 来源 IP（字符串形式，未经解析）
    pub source_ip: String,
    /// User-Agent
    pub user_agent: Option<String>,
}

impl CallerContext {
    #[must_use]
    pub fn new(source_ip: impl Into<String>) -> Self {
        Self {
            source_ip: source_ip.into(),
            user_agent: None,
        }
    }
}

/// 活动结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityOutcome {
    Success,
    Denied,
    Error,
}

/// 一次认证尝试或授权决策的审计事件
///
/// 每次认证尝试恰好产生一条，每次授权决策恰好产生一条（拒绝也算）。
/// 摘要字段在写入前清洗掉 bearer token。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
    /// 账户 ID（认证早期失败时为 None）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// Token ID（定位到 Token 前为 None）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    /// 动作名（如 `token.authenticate`、`dns.create`）
    pub action: String,
    /// 请求的操作
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<RecordOperation>,
    /// 请求的域
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// 请求的记录类型
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_type: Option<RecordType>,
    /// 来源 IP
    pub source_ip: String,
    /// User-Agent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// 结果
    pub outcome: ActivityOutcome,
    /// 失败原因
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// 请求摘要（已清洗）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_summary: Option<String>,
    /// 响应摘要（已清洗）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_summary: Option<String>,
    /// 发生时间
    pub occurred_at: DateTime<Utc>,
}

impl ActivityEvent {
    /// 从调用方上下文创建事件骨架
    #[must_use]
    pub fn new(action: impl Into<String>, caller: &CallerContext, outcome: ActivityOutcome) -> Self {
        Self {
            account_id: None,
            token_id: None,
            action: action.into(),
            operation: None,
            domain: None,
            record_type: None,
            source_ip: caller.source_ip.clone(),
            user_agent: caller.user_agent.clone(),
            outcome,
            reason: None,
            request_summary: None,
            response_summary: None,
            occurred_at: Utc::now(),
        }
    }

    /// 设置请求摘要（自动清洗 bearer token）
    #[must_use]
    pub fn with_request_summary(mut self, summary: &str) -> Self {
        self.request_summary = Some(scrub_secrets(summary));
        self
    }

    /// 设置响应摘要（自动清洗 bearer token）
    #[must_use]
    pub fn with_response_summary(mut self, summary: &str) -> Self {
        self.response_summary = Some(scrub_secrets(summary));
        self
    }
}

/// 清洗文本中出现的 bearer token
///
/// 两条规则，按词（空白分隔）应用：
/// - 以 token 前缀开头的词整体替换为 `naf_[redacted]`；
/// - 含有 secret 长度（64 字符）连续字母数字段的词整体替换为
///   `[redacted]`——前缀写错的认证尝试（如 `nfa_...`）也会进摘要，
///   secret 本身同样不能落进日志。
#[must_use]
pub fn scrub_secrets(text: &str) -> String {
    text.split_inclusive(char::is_whitespace)
        .map(|chunk| {
            let word = chunk.trim_end_matches(char::is_whitespace);
            let trailing = &chunk[word.len()..];
            if word.starts_with(TOKEN_PREFIX) && word.len() > TOKEN_PREFIX.len() {
                format!("{TOKEN_PREFIX}[redacted]{trailing}")
            } else if contains_secret_sized_run(word) {
                format!("[redacted]{trailing}")
            } else {
                chunk.to_string()
            }
        })
        .collect()
}

/// 词内是否存在长度达到 secret 规格的连续字母数字段
fn contains_secret_sized_run(word: &str) -> bool {
    let mut run = 0usize;
    for byte in word.bytes() {
        if byte.is_ascii_alphanumeric() {
            run += 1;
            if run >= SECRET_LEN {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

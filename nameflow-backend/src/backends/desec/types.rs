//! deSEC API 响应类型

use serde::{Deserialize, Serialize};

/// deSEC 域对象
#[derive(Debug, Deserialize)]
pub(crate) struct DesecDomain {
    pub name: String,
    #[serde(default)]
    pub minimum_ttl: Option<u32>,
    #[serde(default)]
    pub published: Option<String>,
}

/// deSEC RRset
///
/// `subname` 为空字符串表示 apex；`records` 是该 (subname, type)
/// 下的全部记录内容。MX/SRV 的优先级编码在内容字符串开头。
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DesecRrset {
    #[serde(default)]
    pub subname: String,
    #[serde(rename = "type")]
    pub rrset_type: String,
    pub ttl: u32,
    #[serde(default)]
    pub records: Vec<String>,
}

/// `PUT` RRset 请求体
#[derive(Debug, Serialize)]
pub(crate) struct DesecRrsetWrite<'a> {
    pub subname: &'a str,
    #[serde(rename = "type")]
    pub rrset_type: &'a str,
    pub ttl: u32,
    pub records: Vec<String>,
}

/// deSEC 错误响应体（形如 `{"detail": "..."}`）
#[derive(Debug, Deserialize)]
pub(crate) struct DesecErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}

//! netcup API 响应类型

use serde::{Deserialize, Serialize};

/// netcup 统一响应壳
///
/// `status` 为 `"success"` / `"error"`，`statuscode` 2000 表示成功。
#[derive(Debug, Deserialize)]
pub(crate) struct NetcupResponse<T> {
    pub status: String,
    pub statuscode: u32,
    #[serde(default)]
    pub shortmessage: String,
    #[serde(default)]
    pub longmessage: Option<String>,
    pub responsedata: Option<T>,
}

impl<T> NetcupResponse<T> {
    pub fn is_success(&self) -> bool {
        self.status == "success" && self.statuscode == 2000
    }
}

/// `login` 响应数据
#[derive(Debug, Deserialize)]
pub(crate) struct NetcupLoginData {
    pub apisessionid: String,
}

/// `infoDnsRecords` / `updateDnsRecords` 响应数据
#[derive(Debug, Deserialize)]
pub(crate) struct NetcupRecordsData {
    #[serde(default)]
    pub dnsrecords: Vec<NetcupDnsRecord>,
}

/// `infoDnsZone` 响应数据
///
/// netcup 的数值字段以字符串返回。
#[derive(Debug, Deserialize)]
pub(crate) struct NetcupZoneData {
    pub name: String,
    #[serde(default)]
    pub ttl: Option<String>,
    #[serde(default)]
    pub serial: Option<String>,
    #[serde(default)]
    pub dnssecstatus: Option<bool>,
}

/// netcup 原生 DNS 记录
///
/// `priority` 以字符串传输（`"0"` 表示无优先级）；`deleterecord` 置位时
/// 整集合提交会删除该记录。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct NetcupDnsRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub hostname: String,
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    pub destination: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleterecord: Option<bool>,
}

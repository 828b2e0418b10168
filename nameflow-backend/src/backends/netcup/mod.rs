//! netcup CCP DNS Backend
//!
//! netcup 是 full-replace 型 Backend：没有可独立寻址的记录变更原语，
//! 所有变更都是取回整个记录集、在内存中计算新集合、整体提交回去。
//! 本适配器自身不对并发变更加锁，调用方需按 zone 串行化（见 `ZoneLocks`）。

mod backend;
mod error;
mod http;
mod types;

use reqwest::Client;
use tokio::sync::Mutex;

use crate::backends::common::create_http_client;

pub(crate) const NETCUP_API_ENDPOINT: &str =
    "https://ccp.netcup.net/run/webservice/servers/endpoint.php?JSON";
/// netcup 没有按记录的 TTL，区域 TTL 未知时的兜底值
pub(crate) const NETCUP_DEFAULT_TTL: u32 = 86400;

/// netcup CCP DNS Backend
pub struct NetcupBackend {
    pub(crate) client: Client,
    pub(crate) customer_number: String,
    pub(crate) api_key: String,
    pub(crate) api_password: String,
    /// 当前 API 会话 ID（按需登录，过期后重新登录一次）
    pub(crate) session: Mutex<Option<String>>,
}

impl NetcupBackend {
    pub fn new(customer_number: String, api_key: String, api_password: String) -> Self {
        Self {
            client: create_http_client(),
            customer_number,
            api_key,
            api_password,
            session: Mutex::new(None),
        }
    }
}

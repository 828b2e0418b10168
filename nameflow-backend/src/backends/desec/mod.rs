//! deSEC DNS Backend
//!
//! deSEC 是 patch 型 Backend：RRset 以 (subname, type) 寻址，创建与更新
//! 都落在同一个 `PUT` 替换原语上，删除即提交空记录列表。
//! deSEC 没有按记录的原生 ID，对外暴露确定性合成 ID（见 `common`）。

mod backend;
mod error;
mod http;
mod types;

use reqwest::Client;

use crate::backends::common::create_http_client;

pub(crate) const DESEC_API_BASE: &str = "https://desec.io/api/v1";
/// deSEC 新建 RRset 未指定 TTL 时的兜底值
pub(crate) const DESEC_DEFAULT_TTL: u32 = 3600;

/// deSEC DNS Backend
pub struct DesecBackend {
    pub(crate) client: Client,
    pub(crate) api_token: String,
}

impl DesecBackend {
    pub fn new(api_token: String) -> Self {
        Self {
            client: create_http_client(),
            api_token,
        }
    }
}

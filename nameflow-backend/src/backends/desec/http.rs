//! deSEC REST API 通信层

use reqwest::Method;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::traits::{BackendErrorMapper, ErrorContext, RawApiError};
use crate::utils::log_sanitizer::truncate_for_log;

use super::types::DesecErrorBody;
use super::{DESEC_API_BASE, DesecBackend};

const BACKEND_NAME: &str = "desec";

impl DesecBackend {
    /// RRset 资源路径；apex 在 URL 中写作 `@`
    pub(super) fn rrset_path(zone: &str, subname: &str, record_type: &str) -> String {
        let url_subname = if subname.is_empty() { "@" } else { subname };
        format!(
            "/domains/{zone}/rrsets/{}/{record_type}/",
            urlencoding::encode(url_subname)
        )
    }

    /// 发送请求并检查状态码；2xx 返回响应体，否则映射为统一错误
    pub(super) async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
        context: ErrorContext,
    ) -> Result<(u16, String)> {
        let mut builder = self
            .client
            .request(method.clone(), format!("{DESEC_API_BASE}{path}"))
            .header("Authorization", format!("Token {}", self.api_token));
        if let Some(b) = body {
            builder = builder.json(b);
        }

        let (status, text) =
            HttpUtils::execute_request(builder, BACKEND_NAME, method.as_str(), path).await?;

        if (200..300).contains(&status) {
            return Ok((status, text));
        }

        let detail = serde_json::from_str::<DesecErrorBody>(&text)
            .ok()
            .and_then(|b| b.detail)
            .unwrap_or_else(|| truncate_for_log(&text));
        Err(self.map_error(RawApiError::with_code(status.to_string(), detail), context))
    }

    /// `GET` 并解析 JSON 响应体
    pub(super) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        context: ErrorContext,
    ) -> Result<T> {
        let (_, text) = self.send(Method::GET, path, None, context).await?;
        HttpUtils::parse_json(&text, BACKEND_NAME)
    }
}

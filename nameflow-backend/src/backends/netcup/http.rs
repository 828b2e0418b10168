//! netcup JSON API 通信层
//!
//! netcup CCP 是单端点 JSON API：所有操作 POST 到同一 URL，body 为
//! `{"action": ..., "param": {...}}`。除 `login` 外的操作都需要会话 ID，
//! 会话过期时重新登录一次后重试当前操作。

use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::{BackendError, Result};
use crate::http_client::HttpUtils;
use crate::traits::{BackendErrorMapper, ErrorContext, RawApiError};

use super::types::{NetcupLoginData, NetcupResponse};
use super::{NETCUP_API_ENDPOINT, NetcupBackend};

const BACKEND_NAME: &str = "netcup";

impl NetcupBackend {
    /// 发送一次原始 API 调用并解析响应壳
    async fn call<T: DeserializeOwned>(&self, body: &serde_json::Value) -> Result<NetcupResponse<T>> {
        let action = body
            .get("action")
            .and_then(|v| v.as_str())
            .unwrap_or("<unknown>");

        let request = self.client.post(NETCUP_API_ENDPOINT).json(body);
        let (_, text) =
            HttpUtils::execute_request(request, BACKEND_NAME, "POST", action).await?;
        HttpUtils::parse_json(&text, BACKEND_NAME)
    }

    /// 将失败响应映射为统一错误
    fn response_error<T>(&self, resp: &NetcupResponse<T>, context: ErrorContext) -> BackendError {
        let message = resp
            .longmessage
            .clone()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| resp.shortmessage.clone());
        self.map_error(
            RawApiError::with_code(resp.statuscode.to_string(), message),
            context,
        )
    }

    /// 会话失效判定（过期 / 格式无效都返回 4001）
    fn is_session_expired<T>(resp: &NetcupResponse<T>) -> bool {
        resp.statuscode == 4001
            || resp
                .longmessage
                .as_deref()
                .unwrap_or(&resp.shortmessage)
                .to_lowercase()
                .contains("session")
    }

    /// 登录并返回新会话 ID
    async fn login(&self) -> Result<String> {
        let body = json!({
            "action": "login",
            "param": {
                "customernumber": self.customer_number,
                "apikey": self.api_key,
                "apipassword": self.api_password,
            }
        });

        let resp: NetcupResponse<NetcupLoginData> = self.call(&body).await?;
        if resp.is_success() {
            match resp.responsedata {
                Some(data) => {
                    log::debug!("[{BACKEND_NAME}] Login succeeded");
                    Ok(data.apisessionid)
                }
                None => Err(self.parse_error("login succeeded without session id")),
            }
        } else {
            Err(self.response_error(&resp, ErrorContext::default()))
        }
    }

    /// 获取当前会话 ID，没有则登录
    pub(super) async fn session_id(&self) -> Result<String> {
        let mut guard = self.session.lock().await;
        if let Some(id) = guard.as_ref() {
            return Ok(id.clone());
        }
        let id = self.login().await?;
        *guard = Some(id.clone());
        Ok(id)
    }

    /// 丢弃当前会话并重新登录
    async fn refresh_session(&self) -> Result<String> {
        let mut guard = self.session.lock().await;
        let id = self.login().await?;
        *guard = Some(id.clone());
        Ok(id)
    }

    /// 执行需要会话的 API 操作，返回 `responsedata`
    ///
    /// 会话过期时重新登录一次并重试同一操作；其它失败不重试。
    pub(super) async fn request<T: DeserializeOwned>(
        &self,
        action: &str,
        mut params: serde_json::Value,
        context: ErrorContext,
    ) -> Result<T> {
        let session = self.session_id().await?;
        let resp = self.request_with_session(action, &mut params, &session).await?;

        let resp = if !resp.is_success() && Self::is_session_expired(&resp) {
            log::debug!("[{BACKEND_NAME}] Session expired, re-login and retry '{action}'");
            let session = self.refresh_session().await?;
            self.request_with_session(action, &mut params, &session)
                .await?
        } else {
            resp
        };

        if resp.is_success() {
            resp.responsedata
                .ok_or_else(|| self.parse_error(format!("'{action}' succeeded without data")))
        } else {
            Err(self.response_error(&resp, context))
        }
    }

    async fn request_with_session<T: DeserializeOwned>(
        &self,
        action: &str,
        params: &mut serde_json::Value,
        session: &str,
    ) -> Result<NetcupResponse<T>> {
        if let Some(obj) = params.as_object_mut() {
            obj.insert(
                "customernumber".to_string(),
                json!(self.customer_number),
            );
            obj.insert("apikey".to_string(), json!(self.api_key));
            obj.insert("apisessionid".to_string(), json!(session));
        }
        let body = json!({ "action": action, "param": params });
        self.call(&body).await
    }
}

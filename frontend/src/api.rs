//! API 客户端模块
//!
//! 统一的请求执行：注入 Bearer 凭证、区分 JSON 与 multipart 请求体、
//! 集中处理 401。响应判读是纯函数，可在原生环境下测试。
//!
//! 401 的约定：受保护调用收到 401 视为"会话失效"信号，
//! 静默走一次重定向准备并解析为 `None`，调用方无需单独处理。

use crate::auth::SessionContext;
use crate::session::redirect::prepare_login_redirect;
use crate::session::store::{CredentialStore, KEY_TOKEN};
use crate::web::{HttpClient, HttpError, HttpRequestBuilder};
use fleetdesk_shared::protocol::{ApiRequest, HttpMethod};
use fleetdesk_shared::{BEARER_PREFIX, HEADER_AUTHORIZATION};
use leptos::prelude::*;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// API 错误类型
#[derive(Debug)]
pub enum ApiError {
    /// 网络层失败（fetch 未完成）
    Network(String),
    /// 响应体无法解析
    Decode(String),
    /// 非 2xx 响应，保留状态码与原始响应体供调用方判读
    Http { status: u16, body: String },
}

impl core::fmt::Display for ApiError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "网络错误: {}", msg),
            ApiError::Decode(msg) => write!(f, "响应解析失败: {}", msg),
            ApiError::Http { status, .. } => write!(f, "请求失败 (HTTP {})", status),
        }
    }
}

impl From<HttpError> for ApiError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::Serialization(msg) => ApiError::Decode(msg),
            HttpError::ResponseParseFailed(msg) => ApiError::Decode(msg),
            other => ApiError::Network(other.to_string()),
        }
    }
}

/// 响应判读结果
pub(crate) enum Interpreted<T> {
    /// 成功；204 或空响应体时为 `None`
    Success(Option<T>),
    /// 会话失效信号
    Unauthorized,
    Failed(ApiError),
}

/// 纯函数：由状态码与响应体文本判读响应
///
/// 204 与空 2xx 响应体不经过 JSON 解析，直接视为无内容成功。
/// 响应类型为 `()` 的端点（心跳、删除）不关心响应体：
/// 后端返回 `{}` 之类的非空 2xx 时同样按无内容成功处理。
pub(crate) fn interpret<T: DeserializeOwned + 'static>(status: u16, body: &str) -> Interpreted<T> {
    if status == 401 {
        return Interpreted::Unauthorized;
    }
    if !(200..300).contains(&status) {
        return Interpreted::Failed(ApiError::Http {
            status,
            body: body.to_string(),
        });
    }
    if status == 204 || body.trim().is_empty() {
        return Interpreted::Success(None);
    }
    if std::any::TypeId::of::<T>() == std::any::TypeId::of::<()>() {
        return Interpreted::Success(None);
    }
    match serde_json::from_str(body) {
        Ok(value) => Interpreted::Success(Some(value)),
        Err(e) => Interpreted::Failed(ApiError::Decode(e.to_string())),
    }
}

/// FleetDesk API 客户端
///
/// 会话上下文与凭证存储由外部注入（进程启动时创建一次），
/// 而非模块级单例。
#[derive(Clone)]
pub struct FleetdeskApi {
    base_url: String,
    session: SessionContext,
    store: Arc<CredentialStore>,
}

impl FleetdeskApi {
    pub fn new(base_url: String, session: SessionContext, store: CredentialStore) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            session,
            store: Arc::new(store),
        }
    }

    /// 以环境配置的基础地址和浏览器存储后端构建
    pub fn from_env(session: SessionContext) -> Self {
        Self::new(
            crate::config::api_base_url(),
            session,
            CredentialStore::browser(),
        )
    }

    pub fn session(&self) -> SessionContext {
        self.session
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn builder(method: HttpMethod, url: &str) -> HttpRequestBuilder {
        match method {
            HttpMethod::Get => HttpClient::get(url),
            HttpMethod::Post => HttpClient::post(url),
            HttpMethod::Put => HttpClient::put(url),
            HttpMethod::Delete => HttpClient::delete(url),
            HttpMethod::Patch => HttpClient::patch(url),
        }
    }

    /// 每次调用都从凭证存储读取 Bearer 令牌
    fn bearer(&self) -> Option<String> {
        self.store.read(KEY_TOKEN)
    }

    fn attach_bearer(builder: HttpRequestBuilder, token: &str) -> HttpRequestBuilder {
        builder.header(HEADER_AUTHORIZATION, &format!("{}{}", BEARER_PREFIX, token))
    }

    /// 发送并判读响应；`redirect_on_401` 控制 401 是否走会话失效通道
    async fn dispatch<T: DeserializeOwned + 'static>(
        &self,
        builder: HttpRequestBuilder,
        redirect_on_401: bool,
    ) -> Result<Option<T>, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        match interpret::<T>(status, &body) {
            Interpreted::Success(value) => Ok(value),
            Interpreted::Unauthorized => {
                if redirect_on_401 {
                    prepare_login_redirect(self.session, &self.store);
                    Ok(None)
                } else {
                    Err(ApiError::Http { status, body })
                }
            }
            Interpreted::Failed(e) => Err(e),
        }
    }

    async fn run<R: ApiRequest>(
        &self,
        request: &R,
        bearer: Option<&str>,
        redirect_on_401: bool,
    ) -> Result<Option<R::Response>, ApiError> {
        let mut builder = Self::builder(R::METHOD, &self.url(&request.path()));
        if let Some(token) = bearer {
            builder = Self::attach_bearer(builder, token);
        }
        if request.has_body() {
            builder = builder.json(request)?;
        }
        self.dispatch(builder, redirect_on_401).await
    }

    /// 受保护端点：注入存储中的 Bearer 令牌，401 走会话失效通道
    pub async fn execute<R: ApiRequest>(
        &self,
        request: &R,
    ) -> Result<Option<R::Response>, ApiError> {
        let bearer = self.bearer();
        self.run(request, bearer.as_deref(), true).await
    }

    /// 公开端点（登录）：不带凭证，401 作为普通错误返回
    pub async fn execute_public<R: ApiRequest>(
        &self,
        request: &R,
    ) -> Result<Option<R::Response>, ApiError> {
        self.run(request, None, false).await
    }

    /// 指定 Bearer 令牌执行（刷新端点携带旧 access token）
    pub async fn execute_bearer<R: ApiRequest>(
        &self,
        request: &R,
        token: &str,
    ) -> Result<Option<R::Response>, ApiError> {
        self.run(request, Some(token), false).await
    }

    /// multipart 上传：不设置 Content-Type，由浏览器生成边界
    pub async fn upload(
        &self,
        path: &str,
        form: web_sys::FormData,
    ) -> Result<Option<serde_json::Value>, ApiError> {
        let mut builder = HttpClient::post(&self.url(path)).form(form);
        if let Some(token) = self.bearer() {
            builder = Self::attach_bearer(builder, &token);
        }
        self.dispatch(builder, true).await
    }
}

/// 从 Context 获取 API 客户端
pub fn use_api() -> FleetdeskApi {
    use_context::<FleetdeskApi>().expect("FleetdeskApi should be provided")
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetdesk_shared::Paginated;

    #[test]
    fn no_content_resolves_to_none_without_parsing() {
        // DELETE 成功的空响应：不得尝试 JSON 解析，不得报错
        match interpret::<()>(204, "") {
            Interpreted::Success(None) => {}
            _ => panic!("204 应判读为无内容成功"),
        }
        match interpret::<Paginated<fleetdesk_shared::Customer>>(200, "   ") {
            Interpreted::Success(None) => {}
            _ => panic!("空 2xx 响应体应判读为无内容成功"),
        }
    }

    #[test]
    fn unit_response_tolerates_a_body() {
        // 心跳/删除端点只关心成功与否，后端附带的响应体不算解码错误
        match interpret::<()>(200, "{}") {
            Interpreted::Success(None) => {}
            _ => panic!("响应类型为 () 时应忽略非空响应体"),
        }
        match interpret::<()>(200, "{\"detail\":\"pong\"}") {
            Interpreted::Success(None) => {}
            _ => panic!("响应类型为 () 时应忽略非空响应体"),
        }
        // 非 2xx 仍然是错误
        match interpret::<()>(500, "{}") {
            Interpreted::Failed(ApiError::Http { status: 500, .. }) => {}
            _ => panic!("非 2xx 不受无内容规则影响"),
        }
    }

    #[test]
    fn unauthorized_is_a_session_signal() {
        match interpret::<()>(401, "{\"detail\":\"expired\"}") {
            Interpreted::Unauthorized => {}
            _ => panic!("401 应判读为会话失效"),
        }
    }

    #[test]
    fn error_keeps_status_and_body() {
        match interpret::<()>(409, "{\"code\":[\"already exists\"]}") {
            Interpreted::Failed(ApiError::Http { status, body }) => {
                assert_eq!(status, 409);
                assert!(body.contains("already exists"));
            }
            _ => panic!("非 2xx 应保留状态码与响应体"),
        }
    }

    #[test]
    fn success_body_is_decoded() {
        match interpret::<serde_json::Value>(200, "{\"id\":1}") {
            Interpreted::Success(Some(value)) => assert_eq!(value["id"], 1),
            _ => panic!("2xx JSON 应成功解码"),
        }
    }

    #[test]
    fn garbage_body_is_a_decode_error() {
        match interpret::<serde_json::Value>(200, "<html>oops</html>") {
            Interpreted::Failed(ApiError::Decode(_)) => {}
            _ => panic!("无法解析的 2xx 响应体应报解码错误"),
        }
    }
}

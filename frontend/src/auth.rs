//! 认证模块
//!
//! 管理会话状态与令牌生命周期，与路由系统解耦：
//! 路由服务通过注入的认证信号来检查认证状态，
//! 登录/登出/失效只改信号，导航由路由服务的监听自动完成。

use crate::api::{ApiError, FleetdeskApi};
use crate::session::redirect::prepare_login_redirect;
use crate::session::store::{
    CredentialStore, KEY_KEEP_SESSION, KEY_LAST_ACTIVITY, KEY_LAST_LOGIN, KEY_LAST_REFRESH,
    KEY_REFRESH, KEY_TOKEN, KEY_USER,
};
use crate::session::token;
use fleetdesk_shared::protocol::{ActivityPing, LoginRequest, RefreshRequest};
use fleetdesk_shared::{DEVICE_ID_SUFFIX, DEVICE_TYPE_WEB, UserProfile};
use leptos::prelude::*;

// =========================================================
// 会话状态 (Session State)
// =========================================================

/// 会话阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// 初始校验进行中，阻塞受保护内容的渲染
    #[default]
    Checking,
    Authenticated,
    Unauthenticated,
}

/// 会话状态
///
/// 浏览器上下文内至多一个活跃会话；所有变更都经由
/// login / refresh / logout / invalidate 这几个迁移函数。
#[derive(Clone, Default)]
pub struct SessionState {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<UserProfile>,
    pub keep_session: bool,
    pub phase: SessionPhase,
}

impl SessionState {
    /// 已登出/失效的终态
    pub fn signed_out() -> Self {
        Self {
            phase: SessionPhase::Unauthenticated,
            ..Self::default()
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase == SessionPhase::Authenticated
    }
}

/// 会话上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct SessionContext {
    /// 会话状态（只读）
    pub state: ReadSignal<SessionState>,
    /// 设置会话状态（写入）
    pub set_state: WriteSignal<SessionState>,
}

impl SessionContext {
    /// 创建新的会话上下文
    pub fn new() -> Self {
        let (state, set_state) = signal(SessionState::default());
        Self { state, set_state }
    }

    /// 获取会话阶段信号（用于路由服务注入）
    pub fn phase_signal(&self) -> Signal<SessionPhase> {
        let state = self.state;
        Signal::derive(move || state.get().phase)
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取会话上下文
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>().expect("SessionContext should be provided")
}

// =========================================================
// 设备标识
// =========================================================

/// 由用户名推导设备标识（唯一实现，避免散落重复）
pub fn device_id(username: &str) -> String {
    format!("{}{}", username, DEVICE_ID_SUFFIX)
}

// =========================================================
// 登录与登出
// =========================================================

/// 登录结果
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    Success,
    /// 角色不在后台白名单内，明确拒绝而非笼统失败
    AccessDenied { message: String },
    /// 用户名或密码错误
    InvalidCredentials,
    /// 网络或其他失败
    Failed(String),
}

/// 登录并建立会话
///
/// 角色白名单在持久化任何凭证之前校验：
/// 被拒绝的登录不会在本地留下任何令牌。
pub async fn login(
    api: &FleetdeskApi,
    username: &str,
    password: &str,
    keep_session: bool,
) -> LoginOutcome {
    let request = LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
        device_id: device_id(username),
        device_type: DEVICE_TYPE_WEB.to_string(),
        email: username.to_string(),
    };

    match api.execute_public(&request).await {
        Ok(Some(resp)) => {
            if !resp.user.role.is_back_office() {
                return LoginOutcome::AccessDenied {
                    message: format!("角色 {:?} 无权访问管理后台", resp.user.role),
                };
            }

            persist_login(api, &resp, keep_session);
            api.session().set_state.set(SessionState {
                access_token: Some(resp.access_token),
                refresh_token: Some(resp.refresh_token),
                user: Some(resp.user),
                keep_session,
                phase: SessionPhase::Authenticated,
            });
            LoginOutcome::Success
        }
        Ok(None) => LoginOutcome::Failed("登录响应为空".to_string()),
        Err(ApiError::Http { status, .. }) if status == 400 || status == 401 => {
            LoginOutcome::InvalidCredentials
        }
        Err(e) => LoginOutcome::Failed(e.to_string()),
    }
}

fn persist_login(
    api: &FleetdeskApi,
    resp: &fleetdesk_shared::protocol::LoginResponse,
    keep: bool,
) {
    let store = api.store();
    store.write(KEY_TOKEN, &resp.access_token, keep);
    store.write(KEY_REFRESH, &resp.refresh_token, keep);
    if let Ok(user_json) = serde_json::to_string(&resp.user) {
        store.write(KEY_USER, &user_json, keep);
    }
    store.write(KEY_KEEP_SESSION, if keep { "true" } else { "false" }, keep);
    store.write(KEY_LAST_LOGIN, &token::now_ms().to_string(), keep);
}

/// 注销并清除状态
///
/// 导航由路由服务的认证状态监听自动处理。
pub fn logout(api: &FleetdeskApi) {
    api.store().clear_session();
    api.session().set_state.set(SessionState::signed_out());
}

// =========================================================
// 令牌刷新
// =========================================================

/// 用刷新凭证换取新的 access token
///
/// 任一凭证缺失或刷新失败时，静默走重定向准备并返回 false。
/// 此路径不输出日志：到期刷新失败是预期内状况。
pub async fn refresh_access_token(api: &FleetdeskApi) -> bool {
    let store = api.store();
    let (Some(access), Some(refresh)) = (store.read(KEY_TOKEN), store.read(KEY_REFRESH)) else {
        prepare_login_redirect(api.session(), api.store());
        return false;
    };

    // 设备标识由存储的用户档案推导；档案缺失（如 LocalStorage 被清空
    // 而 Cookie 仍在）时无法构造后端认得的标识，同样视为不可恢复
    let Some(username) = stored_username(store) else {
        prepare_login_redirect(api.session(), api.store());
        return false;
    };
    let request = RefreshRequest {
        refresh,
        device_id: device_id(&username),
    };

    // 旧 access token 即使已过期也按约定放在 Authorization 头
    match api.execute_bearer(&request, &access).await {
        Ok(Some(resp)) => {
            let keep = keep_session_flag(store);
            store.write(KEY_TOKEN, &resp.access_token, keep);
            store.write(KEY_LAST_REFRESH, &token::now_ms().to_string(), keep);
            api.session().set_state.update(|s| {
                s.access_token = Some(resp.access_token);
            });
            true
        }
        _ => {
            prepare_login_redirect(api.session(), api.store());
            false
        }
    }
}

/// 令牌即将过期时主动刷新（粗粒度周期任务）
pub async fn refresh_if_expiring(api: &FleetdeskApi) {
    if let Some(tok) = api.store().read(KEY_TOKEN) {
        if token::is_expiring_soon(&tok) {
            let _ = refresh_access_token(api).await;
        }
    }
}

/// 校验会话仍然有效（细粒度周期任务）
///
/// access token 缺失或已过期时尝试刷新；
/// 刷新内部会在不可恢复时安排重定向。
pub async fn ensure_session_valid(api: &FleetdeskApi) {
    match api.store().read(KEY_TOKEN) {
        Some(tok) if !token::is_expired(&tok) => {}
        _ => {
            let _ = refresh_access_token(api).await;
        }
    }
}

// =========================================================
// 会话恢复与心跳
// =========================================================

/// 从 Cookie/LocalStorage 备份恢复会话
///
/// 初始校验完成前 phase 保持 Checking，受保护内容不渲染。
pub async fn restore_session(api: &FleetdeskApi) {
    let store = api.store();
    let access = store.read(KEY_TOKEN);
    let refresh = store.read(KEY_REFRESH);

    // 完全没有凭证：普通的未登录访问，不走失效通道
    if access.is_none() && refresh.is_none() {
        api.session().set_state.set(SessionState::signed_out());
        return;
    }

    if let Some(tok) = &access {
        if !token::is_expired(tok) {
            hydrate_from_store(api);
            return;
        }
    }

    // access 缺失或已过期：尝试用刷新凭证换新
    if refresh_access_token(api).await {
        hydrate_from_store(api);
    }
}

/// 把存储中的会话数据装载进信号
fn hydrate_from_store(api: &FleetdeskApi) {
    let store = api.store();
    let user = store
        .read(KEY_USER)
        .and_then(|json| serde_json::from_str(&json).ok());

    api.session().set_state.set(SessionState {
        access_token: store.read(KEY_TOKEN),
        refresh_token: store.read(KEY_REFRESH),
        user,
        keep_session: keep_session_flag(store),
        phase: SessionPhase::Authenticated,
    });
}

/// 活跃心跳：向后端标记该设备在线
///
/// 失败不影响会话，静默忽略；401 会经由统一通道触发重定向准备。
pub async fn ping_activity(api: &FleetdeskApi) {
    let Some(username) = stored_username(api.store()) else {
        return;
    };
    let request = ActivityPing {
        device_id: device_id(&username),
    };
    if api.execute(&request).await.is_ok() {
        let keep = keep_session_flag(api.store());
        api.store()
            .write(KEY_LAST_ACTIVITY, &token::now_ms().to_string(), keep);
    }
}

fn keep_session_flag(store: &CredentialStore) -> bool {
    store.read(KEY_KEEP_SESSION).as_deref() == Some("true")
}

/// 从存储的用户档案取回登录名；档案缺失或损坏时返回 `None`
fn stored_username(store: &CredentialStore) -> Option<String> {
    let json = store.read(KEY_USER)?;
    let user: UserProfile = serde_json::from_str(&json).ok()?;
    Some(user.email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_id_has_fixed_suffix() {
        assert_eq!(device_id("ama@example.com"), "ama@example.com-web-browser");
    }

    #[test]
    fn fresh_session_starts_checking() {
        let state = SessionState::default();
        assert_eq!(state.phase, SessionPhase::Checking);
        assert!(!state.is_authenticated());
    }

    #[test]
    fn signed_out_state_is_empty() {
        let state = SessionState::signed_out();
        assert_eq!(state.phase, SessionPhase::Unauthenticated);
        assert!(state.access_token.is_none());
        assert!(state.user.is_none());
    }

    #[test]
    fn refresh_identity_requires_a_stored_profile() {
        let (backend, _) = crate::session::store::tests::MemoryBackend::new();
        let store = CredentialStore::with_backends(vec![Box::new(backend)]);

        // 档案缺失时不得臆造设备标识（"-web-browser" 这类空前缀 id）
        assert_eq!(stored_username(&store), None);

        let user = UserProfile {
            id: 1,
            email: "ama@example.com".to_string(),
            role: fleetdesk_shared::UserRole::Admin,
            is_verified: true,
            is_active: true,
        };
        store.write(KEY_USER, &serde_json::to_string(&user).unwrap(), false);
        assert_eq!(
            stored_username(&store).as_deref(),
            Some("ama@example.com")
        );
        assert_eq!(
            device_id(&stored_username(&store).unwrap()),
            "ama@example.com-web-browser"
        );
    }

    #[test]
    fn corrupt_profile_yields_no_identity() {
        let (backend, _) = crate::session::store::tests::MemoryBackend::new();
        let store = CredentialStore::with_backends(vec![Box::new(backend)]);
        store.write(KEY_USER, "not-json", false);
        assert_eq!(stored_username(&store), None);
    }
}

//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 守卫决策（是否放行/重定向）抽成纯函数，可在原生环境下测试。

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::route::AppRoute;
use crate::auth::SessionPhase;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 守卫决策
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GuardDecision {
    /// 放行，正常加载目标路由
    Allow,
    /// 重定向到另一路由
    Redirect(AppRoute),
}

/// **核心守卫逻辑（纯函数）**
///
/// 未认证用户访问受保护页面 -> 登录页；
/// 已认证用户访问登录页 -> 仪表盘。
/// 初始校验（Checking）期间一律放行：刷新页面时深链接必须
/// 保持原样等待会话恢复，而不是先被推到登录页再弹回。
pub(crate) fn guard(target: AppRoute, phase: SessionPhase) -> GuardDecision {
    if phase == SessionPhase::Checking {
        return GuardDecision::Allow;
    }

    let is_authenticated = phase == SessionPhase::Authenticated;
    if target.requires_auth() && !is_authenticated {
        return GuardDecision::Redirect(AppRoute::auth_failure_redirect());
    }
    if target.should_redirect_when_authenticated() && is_authenticated {
        return GuardDecision::Redirect(AppRoute::auth_success_redirect());
    }
    GuardDecision::Allow
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 通过注入认证检查信号实现与认证系统的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 会话阶段（注入的信号，实现解耦）
    phase: Signal<SessionPhase>,
}

impl RouterService {
    /// 创建新的路由服务，初始路由从 URL 解析
    fn new(phase: Signal<SessionPhase>) -> Self {
        let path = current_path();
        let initial_route = AppRoute::from_path(&path);
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            phase,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    pub fn navigate(&self, path: &str) {
        let target_route = AppRoute::from_path(path);
        self.navigate_to_route(target_route, true);
    }

    /// 导航到指定路由
    ///
    /// # Arguments
    /// * `target_route` - 目标路由
    /// * `use_push` - true 使用 pushState, false 使用 replaceState
    fn navigate_to_route(&self, target_route: AppRoute, use_push: bool) {
        let phase = self.phase.get_untracked();

        let resolved = match guard(target_route, phase) {
            GuardDecision::Allow => target_route,
            GuardDecision::Redirect(redirect) => {
                web_sys::console::log_1(
                    &format!("[Router] Guarded: {} -> {}", target_route, redirect).into(),
                );
                redirect
            }
        };

        if use_push {
            push_history_state(resolved.to_path());
        } else {
            replace_history_state(resolved.to_path());
        }
        self.set_route.set(resolved);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let phase = self.phase;

        let closure = Closure::<dyn Fn()>::new(move || {
            let path = current_path();
            let target_route = AppRoute::from_path(&path);

            // popstate 时也执行守卫逻辑
            match guard(target_route, phase.get_untracked()) {
                GuardDecision::Allow => set_route.set(target_route),
                GuardDecision::Redirect(redirect) => {
                    replace_history_state(redirect.to_path());
                    set_route.set(redirect);
                }
            }
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 设置会话阶段变化时的自动重定向
    ///
    /// 登录成功自动离开登录页；登出/会话失效自动回到登录页。
    /// 初始的 Checking 阶段在 `guard` 中放行，因此此副作用
    /// 在会话恢复完成前不会动当前路由。
    fn setup_auth_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let phase = self.phase;

        Effect::new(move |_| {
            let phase = phase.get();
            let route = current_route.get_untracked();

            if let GuardDecision::Redirect(redirect) = guard(route, phase) {
                push_history_state(redirect.to_path());
                set_route.set(redirect);
                web_sys::console::log_1(
                    &format!("[Router] Auth state changed, redirecting to {}.", redirect).into(),
                );
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(phase: Signal<SessionPhase>) -> RouterService {
    let router = RouterService::new(phase);

    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 会话阶段信号
    phase: Signal<SessionPhase>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(phase);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthenticated_user_is_sent_to_login() {
        assert_eq!(
            guard(AppRoute::Customers, SessionPhase::Unauthenticated),
            GuardDecision::Redirect(AppRoute::Login)
        );
        assert_eq!(
            guard(AppRoute::Dashboard, SessionPhase::Unauthenticated),
            GuardDecision::Redirect(AppRoute::Login)
        );
    }

    #[test]
    fn authenticated_user_leaves_login_page() {
        assert_eq!(
            guard(AppRoute::Login, SessionPhase::Authenticated),
            GuardDecision::Redirect(AppRoute::Dashboard)
        );
    }

    #[test]
    fn allowed_combinations_pass_through() {
        assert_eq!(
            guard(AppRoute::Login, SessionPhase::Unauthenticated),
            GuardDecision::Allow
        );
        assert_eq!(
            guard(AppRoute::Faqs, SessionPhase::Authenticated),
            GuardDecision::Allow
        );
        // 404 页不受守卫限制
        assert_eq!(
            guard(AppRoute::NotFound, SessionPhase::Unauthenticated),
            GuardDecision::Allow
        );
    }

    #[test]
    fn checking_phase_never_redirects() {
        // 刷新页面时深链接原样保留，等初始会话恢复出结果再说
        for route in [AppRoute::Customers, AppRoute::Dashboard, AppRoute::Login] {
            assert_eq!(guard(route, SessionPhase::Checking), GuardDecision::Allow);
        }
    }
}

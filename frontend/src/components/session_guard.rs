//! 会话守卫组件
//!
//! 包在受保护内容外层：
//! 1. 挂载时执行一次初始会话恢复，完成前阻塞渲染（避免未认证内容闪现）；
//! 2. 认证建立后启动三个相互独立、可单独取消的周期任务；
//! 3. 公开路由（登录页）跳过校验直接渲染。
//!
//! 周期任务只在初始校验迁移到 Authenticated 之后才会创建，
//! 保证顺序性；组件卸载或会话失效时随 drop 自动清除。

use crate::api::use_api;
use crate::auth::{
    SessionPhase, ensure_session_valid, ping_activity, refresh_if_expiring, restore_session,
    use_session,
};
use crate::web::router::use_router;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::time::Duration;

/// 粗粒度主动刷新检查间隔：4 分钟
const REFRESH_CHECK_INTERVAL: Duration = Duration::from_secs(4 * 60);
/// 细粒度会话有效性检查间隔：30 秒
const SESSION_CHECK_INTERVAL: Duration = Duration::from_secs(30);
/// 活跃心跳间隔：60 秒
const ACTIVITY_PING_INTERVAL: Duration = Duration::from_secs(60);

#[component]
pub fn SessionGuard(children: ChildrenFn) -> impl IntoView {
    let session = use_session();
    let api = use_api();
    let router = use_router();

    // 挂载时执行一次初始会话恢复
    Effect::new({
        let api = api.clone();
        move |_| {
            if session.state.get_untracked().phase == SessionPhase::Checking {
                let api = api.clone();
                spawn_local(async move {
                    restore_session(&api).await;
                });
            }
        }
    });

    let phase = session.phase_signal();
    let is_public = Signal::derive(move || !router.current_route().get().requires_auth());

    view! {
        <Show
            when=move || is_public.get() || phase.get() == SessionPhase::Authenticated
            fallback=move || {
                view! {
                    // Unauthenticated 时渲染空白，路由服务随即重定向到登录页
                    <Show when=move || phase.get() == SessionPhase::Checking>
                        <div class="flex items-center justify-center min-h-screen bg-base-200">
                            <span class="loading loading-spinner loading-lg text-primary"></span>
                        </div>
                    </Show>
                }
            }
        >
            {children()}
        </Show>
        <Show when=move || session.state.get().is_authenticated()>
            <SessionTimers />
        </Show>
    }
}

/// 认证期间运行的周期任务
///
/// 随 `<Show>` 挂载/卸载，三个定时器在组件清理时各自清除，
/// 不会在登出后继续触发。
#[component]
fn SessionTimers() -> impl IntoView {
    let api = use_api();

    let refresh_loop = {
        let api = api.clone();
        set_interval_with_handle(
            move || {
                let api = api.clone();
                spawn_local(async move {
                    refresh_if_expiring(&api).await;
                });
            },
            REFRESH_CHECK_INTERVAL,
        )
        .ok()
    };

    let validity_loop = {
        let api = api.clone();
        set_interval_with_handle(
            move || {
                let api = api.clone();
                spawn_local(async move {
                    ensure_session_valid(&api).await;
                });
            },
            SESSION_CHECK_INTERVAL,
        )
        .ok()
    };

    let heartbeat_loop = {
        let api = api.clone();
        set_interval_with_handle(
            move || {
                let api = api.clone();
                spawn_local(async move {
                    ping_activity(&api).await;
                });
            },
            ACTIVITY_PING_INTERVAL,
        )
        .ok()
    };

    on_cleanup(move || {
        for handle in [refresh_loop, validity_loop, heartbeat_loop].into_iter().flatten() {
            handle.clear();
        }
    });
}

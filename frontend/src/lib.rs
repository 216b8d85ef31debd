//! FleetDesk 管理后台前端
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route` / `web::router`: 路由定义与路由服务
//! - `session`: 令牌判定、凭证存储、重定向去重
//! - `auth`: 会话状态管理与生命周期迁移
//! - `api`: 统一请求出口（Bearer 注入、401 汇聚）
//! - `components`: UI 组件层

mod api;
mod auth;
mod components {
    pub mod customers;
    pub mod dashboard;
    pub mod document_types;
    pub mod driver_balances;
    pub mod drivers;
    pub mod faqs;
    mod icons;
    mod layout;
    pub mod login;
    pub mod notifications;
    pub mod session_guard;
}
mod config;
mod session;
pub(crate) mod web;

use crate::api::FleetdeskApi;
use crate::auth::SessionContext;
use crate::components::customers::CustomersPage;
use crate::components::dashboard::DashboardPage;
use crate::components::document_types::DocumentTypesPage;
use crate::components::driver_balances::DriverBalancesPage;
use crate::components::drivers::DriversPage;
use crate::components::faqs::FaqsPage;
use crate::components::login::LoginPage;
use crate::components::notifications::NotificationsPage;
use crate::components::session_guard::SessionGuard;

use leptos::prelude::*;

use web::route::AppRoute;
use web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::Customers => view! { <CustomersPage /> }.into_any(),
        AppRoute::Drivers => view! { <DriversPage /> }.into_any(),
        AppRoute::DocumentTypes => view! { <DocumentTypesPage /> }.into_any(),
        AppRoute::Faqs => view! { <FaqsPage /> }.into_any(),
        AppRoute::Notifications => view! { <NotificationsPage /> }.into_any(),
        AppRoute::DriverBalances => view! { <DriverBalancesPage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"页面未找到"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建会话上下文与 API 句柄（进程启动时各一份，非模块级单例）
    let session = SessionContext::new();
    provide_context(session);

    let api = FleetdeskApi::from_env(session);
    provide_context(api);

    // 2. 会话阶段信号注入路由服务，实现守卫与认证系统解耦；
    //    初始 Checking 阶段守卫不做重定向，深链接得以保留
    let phase = session.phase_signal();

    view! {
        <Router phase=phase>
            // 会话守卫：初始恢复完成前阻塞渲染，认证后启动周期任务
            <SessionGuard>
                <RouterOutlet matcher=route_matcher />
            </SessionGuard>
        </Router>
    }
}

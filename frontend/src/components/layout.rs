//! 后台页面骨架
//!
//! 侧边导航 + 顶部工具条，包裹所有受保护页面。
//! 导航与登出都只操作信号，跳转由路由服务完成。

use crate::api::use_api;
use crate::auth::{logout, use_session};
use crate::components::icons::*;
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use leptos::prelude::*;

fn nav_icon(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Dashboard => view! { <LayoutDashboard attr:class="h-4 w-4" /> }.into_any(),
        AppRoute::Customers => view! { <Users attr:class="h-4 w-4" /> }.into_any(),
        AppRoute::Drivers => view! { <Wrench attr:class="h-4 w-4" /> }.into_any(),
        AppRoute::DocumentTypes => view! { <FileText attr:class="h-4 w-4" /> }.into_any(),
        AppRoute::Faqs => view! { <CircleHelp attr:class="h-4 w-4" /> }.into_any(),
        AppRoute::Notifications => view! { <Bell attr:class="h-4 w-4" /> }.into_any(),
        AppRoute::DriverBalances => view! { <Wallet attr:class="h-4 w-4" /> }.into_any(),
        _ => view! { <LayoutDashboard attr:class="h-4 w-4" /> }.into_any(),
    }
}

#[component]
pub fn AdminShell(
    /// 页面标题
    #[prop(into)]
    title: String,
    /// 页面内容
    children: Children,
) -> impl IntoView {
    let api = use_api();
    let session = use_session();
    let router = use_router();

    let user_email = move || {
        session
            .state
            .get()
            .user
            .map(|u| u.email)
            .unwrap_or_default()
    };

    let on_logout = move |_| {
        logout(&api);
    };

    view! {
        <div class="min-h-screen bg-base-200 flex font-sans">
            <aside class="w-60 bg-base-100 shadow-xl flex flex-col">
                <div class="p-4 flex items-center gap-2">
                    <ShieldCheck attr:class="h-6 w-6 text-primary" />
                    <span class="text-lg font-bold">"FleetDesk 管理后台"</span>
                </div>
                <ul class="menu flex-1 w-full">
                    {AppRoute::NAV_ROUTES
                        .iter()
                        .map(|route| {
                            let route = *route;
                            let is_active = move || router.current_route().get() == route;
                            view! {
                                <li>
                                    <a
                                        class:active=is_active
                                        on:click=move |_| router.navigate(route.to_path())
                                    >
                                        {nav_icon(route)}
                                        {route.nav_title()}
                                    </a>
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>
            </aside>

            <div class="flex-1 flex flex-col">
                <div class="navbar bg-base-100 shadow">
                    <div class="flex-1">
                        <span class="text-xl font-bold px-2">{title}</span>
                    </div>
                    <div class="flex-none gap-2">
                        <span class="badge badge-neutral hidden md:inline-flex">{user_email}</span>
                        <button on:click=on_logout class="btn btn-outline btn-error btn-sm gap-2">
                            <LogOut attr:class="h-4 w-4" /> "退出登录"
                        </button>
                    </div>
                </div>
                <main class="p-4 md:p-8 space-y-6">{children()}</main>
            </div>
        </div>
    }
}

/// 页面右上角的浮动通知（消息内容, 是否出错）
#[component]
pub fn Toast(notification: ReadSignal<Option<(String, bool)>>) -> impl IntoView {
    view! {
        <Show when=move || notification.get().is_some()>
            <div class="toast toast-top toast-end z-50">
                <div class=move || {
                    let (_, is_err) = notification.get().unwrap();
                    if is_err {
                        "alert alert-error shadow-lg"
                    } else {
                        "alert alert-success shadow-lg"
                    }
                }>
                    <span>{move || notification.get().unwrap().0}</span>
                </div>
            </div>
        </Show>
    }
}

/// 注册"3 秒后自动清除通知"的副作用
pub fn auto_clear_toast(
    notification: ReadSignal<Option<(String, bool)>>,
    set_notification: WriteSignal<Option<(String, bool)>>,
) {
    Effect::new(move |_| {
        if notification.get().is_some() {
            set_timeout(
                move || set_notification.set(None),
                std::time::Duration::from_secs(3),
            );
        }
    });
}

//! 人员管理页面
//!
//! 司机与技师两个标签页。司机支持启用/停用切换，
//! 切换结果以后端返回的实体为准回写列表。

use crate::api::use_api;
use crate::components::layout::{AdminShell, Toast, auto_clear_toast};
use fleetdesk_shared::protocol::{DriverListRequest, DriverSetActiveRequest, MechanicListRequest};
use fleetdesk_shared::{Driver, Mechanic};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StaffTab {
    Drivers,
    Mechanics,
}

#[component]
pub fn DriversPage() -> impl IntoView {
    let api = use_api();

    let (tab, set_tab) = signal(StaffTab::Drivers);
    let (drivers, set_drivers) = signal(Vec::<Driver>::new());
    let (mechanics, set_mechanics) = signal(Vec::<Mechanic>::new());
    let (page, set_page) = signal(1u64);
    let (total_pages, set_total_pages) = signal(1u64);
    let (loading, set_loading) = signal(true);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None);

    auto_clear_toast(notification, set_notification);

    // 标签或页码变化时加载对应列表
    Effect::new({
        let api = api.clone();
        move |_| {
            let current_tab = tab.get();
            let current_page = page.get();
            let api = api.clone();
            set_loading.set(true);
            spawn_local(async move {
                match current_tab {
                    StaffTab::Drivers => {
                        match api.execute(&DriverListRequest { page: current_page }).await {
                            Ok(Some(data)) => {
                                set_total_pages.set(data.total_pages());
                                set_drivers.set(data.results);
                            }
                            Ok(None) => {}
                            Err(e) => {
                                set_notification
                                    .set(Some((format!("加载司机列表失败: {}", e), true)));
                            }
                        }
                    }
                    StaffTab::Mechanics => {
                        match api
                            .execute(&MechanicListRequest { page: current_page })
                            .await
                        {
                            Ok(Some(data)) => {
                                set_total_pages.set(data.total_pages());
                                set_mechanics.set(data.results);
                            }
                            Ok(None) => {}
                            Err(e) => {
                                set_notification
                                    .set(Some((format!("加载技师列表失败: {}", e), true)));
                            }
                        }
                    }
                }
                set_loading.set(false);
            });
        }
    });

    let switch_tab = move |next: StaffTab| {
        if tab.get() != next {
            set_page.set(1);
            set_tab.set(next);
        }
    };

    let toggle_driver = {
        let api = api.clone();
        move |id: i64, is_active: bool| {
            let api = api.clone();
            spawn_local(async move {
                let request = DriverSetActiveRequest {
                    id,
                    is_active: !is_active,
                };
                match api.execute(&request).await {
                    Ok(Some(updated)) => {
                        set_drivers.update(|list| {
                            if let Some(slot) = list.iter_mut().find(|d| d.id == updated.id) {
                                *slot = updated;
                            }
                        });
                        set_notification.set(Some(("司机状态已更新".to_string(), false)));
                    }
                    Ok(None) => {}
                    Err(e) => {
                        set_notification.set(Some((format!("状态更新失败: {}", e), true)));
                    }
                }
            });
        }
    };

    let drivers_table = move || {
        let toggle_driver = toggle_driver.clone();
        view! {
            <table class="table">
                <thead>
                    <tr>
                        <th>"姓名"</th>
                        <th>"邮箱"</th>
                        <th>"电话"</th>
                        <th>"驾照编号"</th>
                        <th>"状态"</th>
                        <th class="text-right">"操作"</th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || drivers.get()
                        key=|d| (d.id, d.is_active)
                        children=move |driver| {
                            let toggle_driver = toggle_driver.clone();
                            let id = driver.id;
                            let is_active = driver.is_active;
                            let (badge, action) = if is_active {
                                ("badge badge-success badge-sm", "停用")
                            } else {
                                ("badge badge-ghost badge-sm", "启用")
                            };
                            view! {
                                <tr>
                                    <td class="font-medium">{driver.name}</td>
                                    <td>{driver.email}</td>
                                    <td>{driver.phone}</td>
                                    <td class="font-mono text-sm">{driver.license_number}</td>
                                    <td>
                                        <span class=badge>
                                            {if is_active { "活跃" } else { "停用" }}
                                        </span>
                                    </td>
                                    <td class="text-right">
                                        <button
                                            class="btn btn-outline btn-xs"
                                            on:click=move |_| toggle_driver(id, is_active)
                                        >
                                            {action}
                                        </button>
                                    </td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>
        }
    };

    let mechanics_table = move || {
        view! {
            <table class="table">
                <thead>
                    <tr>
                        <th>"姓名"</th>
                        <th>"邮箱"</th>
                        <th>"电话"</th>
                        <th>"专长"</th>
                        <th>"状态"</th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || mechanics.get()
                        key=|m| m.id
                        children=move |mechanic| {
                            let badge = if mechanic.is_active {
                                "badge badge-success badge-sm"
                            } else {
                                "badge badge-ghost badge-sm"
                            };
                            let label = if mechanic.is_active { "活跃" } else { "停用" };
                            view! {
                                <tr>
                                    <td class="font-medium">{mechanic.name}</td>
                                    <td>{mechanic.email}</td>
                                    <td>{mechanic.phone}</td>
                                    <td>{mechanic.specialty}</td>
                                    <td>
                                        <span class=badge>{label}</span>
                                    </td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>
        }
    };

    view! {
        <AdminShell title="人员管理">
            <Toast notification=notification />

            <div role="tablist" class="tabs tabs-boxed w-fit">
                <a
                    role="tab"
                    class="tab"
                    class:tab-active=move || tab.get() == StaffTab::Drivers
                    on:click=move |_| switch_tab(StaffTab::Drivers)
                >
                    "司机"
                </a>
                <a
                    role="tab"
                    class="tab"
                    class:tab-active=move || tab.get() == StaffTab::Mechanics
                    on:click=move |_| switch_tab(StaffTab::Mechanics)
                >
                    "技师"
                </a>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <Show
                        when=move || !loading.get()
                        fallback=|| {
                            view! {
                                <div class="flex justify-center p-12">
                                    <span class="loading loading-spinner loading-lg"></span>
                                </div>
                            }
                        }
                    >
                        <div class="overflow-x-auto">
                            {
                                let drivers_table = drivers_table.clone();
                                let mechanics_table = mechanics_table.clone();
                                view! {
                                    <Show
                                        when=move || tab.get() == StaffTab::Drivers
                                        fallback=mechanics_table
                                    >
                                        {drivers_table.clone()}
                                    </Show>
                                }
                            }
                        </div>
                    </Show>
                </div>
            </div>

            <div class="flex justify-center">
                <div class="join">
                    <button
                        class="join-item btn btn-sm"
                        disabled=move || page.get() <= 1
                        on:click=move |_| set_page.update(|p| *p -= 1)
                    >
                        "上一页"
                    </button>
                    <button class="join-item btn btn-sm btn-disabled">
                        {move || format!("{} / {}", page.get(), total_pages.get())}
                    </button>
                    <button
                        class="join-item btn btn-sm"
                        disabled=move || page.get() >= total_pages.get()
                        on:click=move |_| set_page.update(|p| *p += 1)
                    >
                        "下一页"
                    </button>
                </div>
            </div>
        </AdminShell>
    }
}

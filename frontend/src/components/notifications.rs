//! 通知中心页面
//!
//! 分页通知列表，支持单条标记已读。标记成功后用后端返回的
//! 实体原地替换列表项，不整页重拉。

use crate::api::use_api;
use crate::components::layout::{AdminShell, Toast, auto_clear_toast};
use fleetdesk_shared::NotificationItem;
use fleetdesk_shared::protocol::{NotificationListRequest, NotificationMarkReadRequest};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn NotificationsPage() -> impl IntoView {
    let api = use_api();

    let (items, set_items) = signal(Vec::<NotificationItem>::new());
    let (page, set_page) = signal(1u64);
    let (total_pages, set_total_pages) = signal(1u64);
    let (loading, set_loading) = signal(true);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None);

    auto_clear_toast(notification, set_notification);

    Effect::new({
        let api = api.clone();
        move |_| {
            let request = NotificationListRequest { page: page.get() };
            let api = api.clone();
            set_loading.set(true);
            spawn_local(async move {
                match api.execute(&request).await {
                    Ok(Some(data)) => {
                        set_total_pages.set(data.total_pages());
                        set_items.set(data.results);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        set_notification.set(Some((format!("加载通知失败: {}", e), true)));
                    }
                }
                set_loading.set(false);
            });
        }
    });

    let mark_read = {
        let api = api.clone();
        move |id: i64| {
            let api = api.clone();
            spawn_local(async move {
                let request = NotificationMarkReadRequest { id, is_read: true };
                match api.execute(&request).await {
                    Ok(Some(updated)) => {
                        set_items.update(|list| {
                            if let Some(slot) = list.iter_mut().find(|n| n.id == updated.id) {
                                *slot = updated;
                            }
                        });
                    }
                    Ok(None) => {}
                    Err(e) => {
                        set_notification.set(Some((format!("标记已读失败: {}", e), true)));
                    }
                }
            });
        }
    };

    let unread_count = move || items.get().iter().filter(|n| !n.is_read).count();

    view! {
        <AdminShell title="通知中心">
            <Toast notification=notification />

            <div class="flex items-center gap-2">
                <span class="text-sm text-base-content/60">"本页未读"</span>
                <span class="badge badge-primary">{unread_count}</span>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
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
                        <Show when=move || items.get().is_empty()>
                            <p class="text-center text-base-content/50">"暂无通知。"</p>
                        </Show>
                        <div class="space-y-2">
                            <For
                                each=move || items.get()
                                key=|n| (n.id, n.is_read)
                                children={
                                    let mark_read = mark_read.clone();
                                    move |item: NotificationItem| {
                                    let mark_read = mark_read.clone();
                                    let id = item.id;
                                    let is_read = item.is_read;
                                    let card = if is_read {
                                        "p-4 rounded-lg bg-base-200"
                                    } else {
                                        "p-4 rounded-lg bg-primary/5 border border-primary/20"
                                    };
                                    view! {
                                        <div class=card>
                                            <div class="flex items-start justify-between gap-4">
                                                <div>
                                                    <p class="font-medium">{item.title}</p>
                                                    <p class="text-sm text-base-content/70 mt-1">
                                                        {item.body}
                                                    </p>
                                                    <p class="text-xs text-base-content/50 mt-2">
                                                        {item.created_at.format_date()}
                                                    </p>
                                                </div>
                                                <Show when=move || !is_read>
                                                    <button
                                                        class="btn btn-outline btn-xs shrink-0"
                                                        on:click={
                                                            let mark_read = mark_read.clone();
                                                            move |_| mark_read(id)
                                                        }
                                                    >
                                                        "标为已读"
                                                    </button>
                                                </Show>
                                            </div>
                                        </div>
                                    }
                                }
                                }
                            />
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

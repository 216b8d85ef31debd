//! 客户管理页面
//!
//! 分页 + 搜索的客户列表，支持删除（二次确认）与单据上传。
//! 上传走 multipart 通道，Content-Type 交给浏览器生成。

use crate::api::use_api;
use crate::components::icons::{Search, Trash2, Upload};
use crate::components::layout::{AdminShell, Toast, auto_clear_toast};
use fleetdesk_shared::Customer;
use fleetdesk_shared::protocol::{CustomerDeleteRequest, CustomerListRequest};
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn CustomersPage() -> impl IntoView {
    let api = use_api();

    let (rows, set_rows) = signal(Vec::<Customer>::new());
    let (total_pages, set_total_pages) = signal(1u64);
    let (count, set_count) = signal(0u64);
    let (page, set_page) = signal(1u64);
    // 输入框内容与已提交的搜索词分开，避免每击键一次请求
    let (search_input, set_search_input) = signal(String::new());
    let (search, set_search) = signal(String::new());
    let (loading, set_loading) = signal(true);
    let (reload, set_reload) = signal(0u32);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None);
    // (客户 id, 显示名)
    let (pending_delete, set_pending_delete) = signal(Option::<(i64, String)>::None);
    let (upload_target, set_upload_target) = signal(Option::<(i64, String)>::None);
    let (uploading, set_uploading) = signal(false);
    let file_input: NodeRef<html::Input> = NodeRef::new();

    auto_clear_toast(notification, set_notification);

    // 页码、搜索词或手动刷新变化时重新加载
    Effect::new({
        let api = api.clone();
        move |_| {
            reload.track();
            let request = CustomerListRequest {
                page: page.get(),
                search: search.get(),
            };
            let api = api.clone();
            set_loading.set(true);
            spawn_local(async move {
                match api.execute(&request).await {
                    Ok(Some(data)) => {
                        set_total_pages.set(data.total_pages());
                        set_count.set(data.count);
                        set_rows.set(data.results);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        set_notification.set(Some((format!("加载客户列表失败: {}", e), true)));
                    }
                }
                set_loading.set(false);
            });
        }
    });

    let on_search = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        set_page.set(1);
        set_search.set(search_input.get());
    };

    let confirm_delete = {
        let api = api.clone();
        move |_| {
            let Some((id, name)) = pending_delete.get() else {
                return;
            };
            set_pending_delete.set(None);
            let api = api.clone();
            spawn_local(async move {
                match api.execute(&CustomerDeleteRequest { id }).await {
                    Ok(_) => {
                        set_notification.set(Some((format!("客户 {} 已删除", name), false)));
                        set_reload.update(|n| *n += 1);
                    }
                    Err(e) => {
                        set_notification.set(Some((format!("删除失败: {}", e), true)));
                    }
                }
            });
        }
    };

    let confirm_upload = {
        let api = api.clone();
        move |_| {
            let Some((id, _)) = upload_target.get() else {
                return;
            };
            let Some(input) = file_input.get() else {
                return;
            };
            let Some(file) = input.files().and_then(|list| list.get(0)) else {
                set_notification.set(Some(("请先选择要上传的文件".to_string(), true)));
                return;
            };
            let Ok(form) = leptos::web_sys::FormData::new() else {
                return;
            };
            if form.append_with_blob("file", &file).is_err() {
                return;
            }
            let _ = form.append_with_str("customer", &id.to_string());

            let api = api.clone();
            set_uploading.set(true);
            spawn_local(async move {
                let path = format!("/api/customers/{}/documents/", id);
                match api.upload(&path, form).await {
                    Ok(_) => {
                        set_notification.set(Some(("单据上传成功".to_string(), false)));
                        set_upload_target.set(None);
                    }
                    Err(e) => {
                        set_notification.set(Some((format!("上传失败: {}", e), true)));
                    }
                }
                set_uploading.set(false);
            });
        }
    };

    view! {
        <AdminShell title="客户管理">
            <Toast notification=notification />

            <div class="flex items-center justify-between gap-4">
                <form class="join" on:submit=on_search>
                    <input
                        type="text"
                        placeholder="按姓名 / 邮箱 / 电话搜索"
                        class="input input-bordered join-item w-64"
                        prop:value=search_input
                        on:input=move |ev| set_search_input.set(event_target_value(&ev))
                    />
                    <button type="submit" class="btn join-item">
                        <Search attr:class="h-4 w-4" /> "搜索"
                    </button>
                </form>
                <span class="text-sm text-base-content/60">
                    {move || format!("共 {} 位客户", count.get())}
                </span>
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
                            <table class="table">
                                <thead>
                                    <tr>
                                        <th>"姓名"</th>
                                        <th>"邮箱"</th>
                                        <th>"电话"</th>
                                        <th>"状态"</th>
                                        <th>"注册时间"</th>
                                        <th class="text-right">"操作"</th>
                                    </tr>
                                </thead>
                                <tbody>
                                    <For
                                        each=move || rows.get()
                                        key=|c| c.id
                                        children=move |customer| {
                                            let id = customer.id;
                                            let name = customer.full_name();
                                            let name_for_delete = name.clone();
                                            let name_for_upload = name.clone();
                                            let status = if customer.is_active {
                                                view! { <span class="badge badge-success badge-sm">"活跃"</span> }
                                                    .into_any()
                                            } else {
                                                view! { <span class="badge badge-ghost badge-sm">"停用"</span> }
                                                    .into_any()
                                            };
                                            view! {
                                                <tr>
                                                    <td class="font-medium">{name}</td>
                                                    <td>{customer.email}</td>
                                                    <td>{customer.phone}</td>
                                                    <td>{status}</td>
                                                    <td>{customer.created_at.format_date()}</td>
                                                    <td class="text-right">
                                                        <button
                                                            class="btn btn-ghost btn-xs gap-1"
                                                            on:click=move |_| {
                                                                set_upload_target
                                                                    .set(Some((id, name_for_upload.clone())))
                                                            }
                                                        >
                                                            <Upload attr:class="h-3 w-3" /> "上传单据"
                                                        </button>
                                                        <button
                                                            class="btn btn-ghost btn-xs text-error gap-1"
                                                            on:click=move |_| {
                                                                set_pending_delete
                                                                    .set(Some((id, name_for_delete.clone())))
                                                            }
                                                        >
                                                            <Trash2 attr:class="h-3 w-3" /> "删除"
                                                        </button>
                                                    </td>
                                                </tr>
                                            }
                                        }
                                    />
                                </tbody>
                            </table>
                        </div>
                        <Show when=move || rows.get().is_empty()>
                            <p class="p-8 text-center text-base-content/50">"没有匹配的客户。"</p>
                        </Show>
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

            // 删除确认
            <Show when=move || pending_delete.get().is_some()>
                <div class="modal modal-open">
                    <div class="modal-box">
                        <h3 class="font-bold text-lg">"删除客户"</h3>
                        <p class="py-4">
                            {move || {
                                pending_delete
                                    .get()
                                    .map(|(_, name)| {
                                        format!("确定要删除客户 {} 吗？该操作不可撤销。", name)
                                    })
                                    .unwrap_or_default()
                            }}
                        </p>
                        <div class="modal-action">
                            <button class="btn" on:click=move |_| set_pending_delete.set(None)>
                                "取消"
                            </button>
                            <button class="btn btn-error" on:click=confirm_delete.clone()>
                                "确认删除"
                            </button>
                        </div>
                    </div>
                </div>
            </Show>

            // 单据上传
            <Show when=move || upload_target.get().is_some()>
                <div class="modal modal-open">
                    <div class="modal-box">
                        <h3 class="font-bold text-lg">
                            {move || {
                                upload_target
                                    .get()
                                    .map(|(_, name)| format!("为 {} 上传单据", name))
                                    .unwrap_or_default()
                            }}
                        </h3>
                        <div class="form-control py-4">
                            <input
                                type="file"
                                class="file-input file-input-bordered w-full"
                                node_ref=file_input
                            />
                        </div>
                        <div class="modal-action">
                            <button
                                class="btn"
                                disabled=move || uploading.get()
                                on:click=move |_| set_upload_target.set(None)
                            >
                                "取消"
                            </button>
                            <button
                                class="btn btn-primary"
                                disabled=move || uploading.get()
                                on:click=confirm_upload.clone()
                            >
                                {move || if uploading.get() { "上传中..." } else { "上传" }}
                            </button>
                        </div>
                    </div>
                </div>
            </Show>
        </AdminShell>
    }
}

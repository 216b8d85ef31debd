//! 单据类型管理页面
//!
//! 列表 + 创建表单。编码唯一性由后端校验，
//! 冲突错误在表单上以字段级提示呈现而非通用报错。

use crate::api::{ApiError, use_api};
use crate::components::layout::{AdminShell, Toast, auto_clear_toast};
use fleetdesk_shared::DocumentType;
use fleetdesk_shared::protocol::{DocumentTypeCreateRequest, DocumentTypeListRequest};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 识别"编码已存在"的后端校验错误
///
/// 后端在编码冲突时返回 400/409，错误体里带 already exists 字样。
fn duplicate_code_error(err: &ApiError) -> bool {
    match err {
        ApiError::Http { status, body } => {
            matches!(status, 400 | 409) && body.to_ascii_lowercase().contains("already exists")
        }
        _ => false,
    }
}

#[component]
pub fn DocumentTypesPage() -> impl IntoView {
    let api = use_api();

    let (items, set_items) = signal(Vec::<DocumentType>::new());
    let (loading, set_loading) = signal(true);
    let (reload, set_reload) = signal(0u32);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None);

    let (code, set_code) = signal(String::new());
    let (name, set_name) = signal(String::new());
    let (description, set_description) = signal(String::new());
    let (is_required, set_is_required) = signal(false);
    let (code_error, set_code_error) = signal(Option::<String>::None);
    let (submitting, set_submitting) = signal(false);

    auto_clear_toast(notification, set_notification);

    Effect::new({
        let api = api.clone();
        move |_| {
            reload.track();
            let api = api.clone();
            set_loading.set(true);
            spawn_local(async move {
                match api.execute(&DocumentTypeListRequest).await {
                    Ok(Some(data)) => set_items.set(data),
                    Ok(None) => {}
                    Err(e) => {
                        set_notification.set(Some((format!("加载单据类型失败: {}", e), true)));
                    }
                }
                set_loading.set(false);
            });
        }
    });

    let on_submit = {
        let api = api.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let code_value = code.get().trim().to_string();
            let name_value = name.get().trim().to_string();
            if code_value.is_empty() || name_value.is_empty() {
                set_notification.set(Some(("请填写编码和名称".to_string(), true)));
                return;
            }

            let desc = description.get().trim().to_string();
            let request = DocumentTypeCreateRequest {
                code: code_value,
                name: name_value,
                description: (!desc.is_empty()).then_some(desc),
                is_required: is_required.get(),
            };

            set_code_error.set(None);
            set_submitting.set(true);
            let api = api.clone();
            spawn_local(async move {
                match api.execute(&request).await {
                    Ok(_) => {
                        set_notification.set(Some(("单据类型已创建".to_string(), false)));
                        set_code.set(String::new());
                        set_name.set(String::new());
                        set_description.set(String::new());
                        set_is_required.set(false);
                        set_reload.update(|n| *n += 1);
                    }
                    Err(e) if duplicate_code_error(&e) => {
                        set_code_error.set(Some("该编码已存在，请换一个".to_string()));
                    }
                    Err(e) => {
                        set_notification.set(Some((format!("创建失败: {}", e), true)));
                    }
                }
                set_submitting.set(false);
            });
        }
    };

    view! {
        <AdminShell title="单据类型">
            <Toast notification=notification />

            <div class="grid grid-cols-1 lg:grid-cols-3 gap-6">
                <div class="card bg-base-100 shadow-xl">
                    <form class="card-body" on:submit=on_submit>
                        <h3 class="card-title">"新建单据类型"</h3>
                        <div class="form-control">
                            <label class="label" for="dt-code">
                                <span class="label-text">"编码"</span>
                            </label>
                            <input
                                id="dt-code"
                                type="text"
                                placeholder="INSURANCE"
                                class="input input-bordered font-mono"
                                class:input-error=move || code_error.get().is_some()
                                prop:value=code
                                on:input=move |ev| {
                                    set_code.set(event_target_value(&ev));
                                    set_code_error.set(None);
                                }
                            />
                            <Show when=move || code_error.get().is_some()>
                                <span class="label-text-alt text-error mt-1">
                                    {move || code_error.get().unwrap_or_default()}
                                </span>
                            </Show>
                        </div>
                        <div class="form-control">
                            <label class="label" for="dt-name">
                                <span class="label-text">"名称"</span>
                            </label>
                            <input
                                id="dt-name"
                                type="text"
                                placeholder="保险单"
                                class="input input-bordered"
                                prop:value=name
                                on:input=move |ev| set_name.set(event_target_value(&ev))
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="dt-desc">
                                <span class="label-text">"描述（可选）"</span>
                            </label>
                            <textarea
                                id="dt-desc"
                                class="textarea textarea-bordered"
                                prop:value=description
                                on:input=move |ev| set_description.set(event_target_value(&ev))
                            ></textarea>
                        </div>
                        <div class="form-control">
                            <label class="label cursor-pointer justify-start gap-2">
                                <input
                                    type="checkbox"
                                    class="checkbox checkbox-sm"
                                    prop:checked=is_required
                                    on:change=move |ev| {
                                        set_is_required.set(event_target_checked(&ev))
                                    }
                                />
                                <span class="label-text">"必传单据"</span>
                            </label>
                        </div>
                        <div class="form-control mt-4">
                            <button class="btn btn-primary" disabled=move || submitting.get()>
                                {move || if submitting.get() { "创建中..." } else { "创建" }}
                            </button>
                        </div>
                    </form>
                </div>

                <div class="card bg-base-100 shadow-xl lg:col-span-2">
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
                                            <th>"编码"</th>
                                            <th>"名称"</th>
                                            <th>"描述"</th>
                                            <th>"必传"</th>
                                        </tr>
                                    </thead>
                                    <tbody>
                                        <For
                                            each=move || items.get()
                                            key=|d| d.id
                                            children=move |doc| {
                                                let required = if doc.is_required {
                                                    view! {
                                                        <span class="badge badge-warning badge-sm">"必传"</span>
                                                    }
                                                        .into_any()
                                                } else {
                                                    view! {
                                                        <span class="badge badge-ghost badge-sm">"可选"</span>
                                                    }
                                                        .into_any()
                                                };
                                                view! {
                                                    <tr>
                                                        <td class="font-mono">{doc.code}</td>
                                                        <td class="font-medium">{doc.name}</td>
                                                        <td class="text-base-content/70">
                                                            {doc.description.unwrap_or_default()}
                                                        </td>
                                                        <td>{required}</td>
                                                    </tr>
                                                }
                                            }
                                        />
                                    </tbody>
                                </table>
                            </div>
                            <Show when=move || items.get().is_empty()>
                                <p class="p-8 text-center text-base-content/50">
                                    "还没有配置单据类型。"
                                </p>
                            </Show>
                        </Show>
                    </div>
                </div>
            </div>
        </AdminShell>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_code_detected_from_conflict_body() {
        let err = ApiError::Http {
            status: 400,
            body: r#"{"code":["document type with this code already exists."]}"#.to_string(),
        };
        assert!(duplicate_code_error(&err));

        let err = ApiError::Http {
            status: 409,
            body: "Code ALREADY EXISTS".to_string(),
        };
        assert!(duplicate_code_error(&err));
    }

    #[test]
    fn unrelated_errors_are_not_duplicates() {
        assert!(!duplicate_code_error(&ApiError::Http {
            status: 400,
            body: r#"{"name":["This field is required."]}"#.to_string(),
        }));
        assert!(!duplicate_code_error(&ApiError::Http {
            status: 500,
            body: "already exists".to_string(),
        }));
        assert!(!duplicate_code_error(&ApiError::Network("offline".to_string())));
    }
}

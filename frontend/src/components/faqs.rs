//! 常见问题管理页面

use crate::api::use_api;
use crate::components::icons::Trash2;
use crate::components::layout::{AdminShell, Toast, auto_clear_toast};
use fleetdesk_shared::Faq;
use fleetdesk_shared::protocol::{FaqCreateRequest, FaqDeleteRequest, FaqListRequest};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn FaqsPage() -> impl IntoView {
    let api = use_api();

    let (items, set_items) = signal(Vec::<Faq>::new());
    let (loading, set_loading) = signal(true);
    let (reload, set_reload) = signal(0u32);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None);

    let (question, set_question) = signal(String::new());
    let (answer, set_answer) = signal(String::new());
    let (submitting, set_submitting) = signal(false);
    let (pending_delete, set_pending_delete) = signal(Option::<i64>::None);

    auto_clear_toast(notification, set_notification);

    Effect::new({
        let api = api.clone();
        move |_| {
            reload.track();
            let api = api.clone();
            set_loading.set(true);
            spawn_local(async move {
                match api.execute(&FaqListRequest).await {
                    Ok(Some(mut data)) => {
                        data.sort_by_key(|f| f.position);
                        set_items.set(data);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        set_notification.set(Some((format!("加载常见问题失败: {}", e), true)));
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
            let q = question.get().trim().to_string();
            let a = answer.get().trim().to_string();
            if q.is_empty() || a.is_empty() {
                set_notification.set(Some(("问题和答案都不能为空".to_string(), true)));
                return;
            }

            set_submitting.set(true);
            let api = api.clone();
            spawn_local(async move {
                let request = FaqCreateRequest {
                    question: q,
                    answer: a,
                };
                match api.execute(&request).await {
                    Ok(_) => {
                        set_notification.set(Some(("已添加".to_string(), false)));
                        set_question.set(String::new());
                        set_answer.set(String::new());
                        set_reload.update(|n| *n += 1);
                    }
                    Err(e) => {
                        set_notification.set(Some((format!("添加失败: {}", e), true)));
                    }
                }
                set_submitting.set(false);
            });
        }
    };

    let confirm_delete = {
        let api = api.clone();
        move |_| {
            let Some(id) = pending_delete.get() else {
                return;
            };
            set_pending_delete.set(None);
            let api = api.clone();
            spawn_local(async move {
                match api.execute(&FaqDeleteRequest { id }).await {
                    Ok(_) => {
                        set_notification.set(Some(("已删除".to_string(), false)));
                        set_reload.update(|n| *n += 1);
                    }
                    Err(e) => {
                        set_notification.set(Some((format!("删除失败: {}", e), true)));
                    }
                }
            });
        }
    };

    view! {
        <AdminShell title="常见问题">
            <Toast notification=notification />

            <div class="card bg-base-100 shadow-xl">
                <form class="card-body" on:submit=on_submit>
                    <h3 class="card-title">"新增问题"</h3>
                    <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                        <div class="form-control">
                            <label class="label" for="faq-question">
                                <span class="label-text">"问题"</span>
                            </label>
                            <input
                                id="faq-question"
                                type="text"
                                class="input input-bordered"
                                prop:value=question
                                on:input=move |ev| set_question.set(event_target_value(&ev))
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="faq-answer">
                                <span class="label-text">"答案"</span>
                            </label>
                            <input
                                id="faq-answer"
                                type="text"
                                class="input input-bordered"
                                prop:value=answer
                                on:input=move |ev| set_answer.set(event_target_value(&ev))
                            />
                        </div>
                    </div>
                    <div class="card-actions justify-end mt-2">
                        <button class="btn btn-primary btn-sm" disabled=move || submitting.get()>
                            {move || if submitting.get() { "提交中..." } else { "添加" }}
                        </button>
                    </div>
                </form>
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
                            <p class="text-center text-base-content/50">"还没有常见问题。"</p>
                        </Show>
                        <div class="space-y-2">
                            <For
                                each=move || items.get()
                                key=|f| f.id
                                children=move |faq| {
                                    let id = faq.id;
                                    view! {
                                        <div class="collapse collapse-arrow bg-base-200">
                                            <input type="checkbox" />
                                            <div class="collapse-title font-medium flex items-center justify-between">
                                                <span>{faq.question}</span>
                                            </div>
                                            <div class="collapse-content">
                                                <p class="text-base-content/80">{faq.answer}</p>
                                                <div class="flex justify-end mt-2">
                                                    <button
                                                        class="btn btn-ghost btn-xs text-error gap-1"
                                                        on:click=move |_| set_pending_delete.set(Some(id))
                                                    >
                                                        <Trash2 attr:class="h-3 w-3" /> "删除"
                                                    </button>
                                                </div>
                                            </div>
                                        </div>
                                    }
                                }
                            />
                        </div>
                    </Show>
                </div>
            </div>

            <Show when=move || pending_delete.get().is_some()>
                <div class="modal modal-open">
                    <div class="modal-box">
                        <h3 class="font-bold text-lg">"删除问题"</h3>
                        <p class="py-4">"确定要删除这条常见问题吗？"</p>
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
        </AdminShell>
    }
}

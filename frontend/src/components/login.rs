//! 登录页面

use crate::api::use_api;
use crate::auth::{LoginOutcome, login};
use crate::components::icons::ShieldCheck;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn LoginPage() -> impl IntoView {
    let api = use_api();

    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (keep_session, set_keep_session) = signal(false);
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if username.get().is_empty() || password.get().is_empty() {
            set_error_msg.set(Some("请填写用户名和密码".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let api = api.clone();
        spawn_local(async move {
            let outcome = login(&api, &username.get(), &password.get(), keep_session.get()).await;
            match outcome {
                LoginOutcome::Success => {
                    // 路由服务监听到认证信号后自动进入仪表盘
                }
                LoginOutcome::AccessDenied { message } => {
                    set_error_msg.set(Some(message));
                }
                LoginOutcome::InvalidCredentials => {
                    set_error_msg.set(Some("用户名或密码错误".to_string()));
                }
                LoginOutcome::Failed(msg) => {
                    set_error_msg.set(Some(format!("登录失败: {}", msg)));
                }
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <ShieldCheck attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"FleetDesk 管理后台"</h1>
                        <p class="text-base-content/70">"请使用后台账号登录"</p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="username">
                                <span class="label-text">"用户名 / 邮箱"</span>
                            </label>
                            <input
                                id="username"
                                type="text"
                                placeholder="admin@fleetdesk.example"
                                on:input=move |ev| set_username.set(event_target_value(&ev))
                                prop:value=username
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"密码"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label cursor-pointer justify-start gap-2">
                                <input
                                    type="checkbox"
                                    class="checkbox checkbox-sm"
                                    prop:checked=keep_session
                                    on:change=move |ev| set_keep_session.set(event_target_checked(&ev))
                                />
                                <span class="label-text">"30 天内保持登录"</span>
                            </label>
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || {
                                    if is_submitting.get() {
                                        view! {
                                            <span class="loading loading-spinner"></span>
                                            "登录中..."
                                        }
                                            .into_any()
                                    } else {
                                        "登录".into_any()
                                    }
                                }}
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}

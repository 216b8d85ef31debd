//! 司机余额报表页面
//!
//! 只读报表：每位司机的应付/应收余额与最近付款时间。

use crate::api::use_api;
use crate::components::dashboard::format_cents;
use crate::components::layout::{AdminShell, Toast, auto_clear_toast};
use fleetdesk_shared::DriverBalance;
use fleetdesk_shared::protocol::DriverBalanceListRequest;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn DriverBalancesPage() -> impl IntoView {
    let api = use_api();

    let (rows, set_rows) = signal(Vec::<DriverBalance>::new());
    let (loading, set_loading) = signal(true);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None);

    auto_clear_toast(notification, set_notification);

    Effect::new({
        let api = api.clone();
        move |_| {
            let api = api.clone();
            set_loading.set(true);
            spawn_local(async move {
                match api.execute(&DriverBalanceListRequest).await {
                    Ok(Some(mut data)) => {
                        // 欠款最多的排前面
                        data.sort_by_key(|b| b.balance_cents);
                        set_rows.set(data);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        set_notification.set(Some((format!("加载余额报表失败: {}", e), true)));
                    }
                }
                set_loading.set(false);
            });
        }
    });

    let total = move || format_cents(rows.get().iter().map(|b| b.balance_cents).sum());

    view! {
        <AdminShell title="司机余额">
            <Toast notification=notification />

            <div class="stats shadow bg-base-100">
                <div class="stat">
                    <div class="stat-title">"余额合计"</div>
                    <div class="stat-value text-primary">{total}</div>
                    <div class="stat-desc">"负数表示待向司机支付"</div>
                </div>
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
                                        <th>"司机"</th>
                                        <th class="text-right">"余额"</th>
                                        <th>"最近付款"</th>
                                    </tr>
                                </thead>
                                <tbody>
                                    <For
                                        each=move || rows.get()
                                        key=|b| b.driver_id
                                        children=move |balance| {
                                            let amount_class = if balance.balance_cents < 0 {
                                                "text-right font-mono text-error"
                                            } else {
                                                "text-right font-mono"
                                            };
                                            let last_payment = balance
                                                .last_payment_at
                                                .map(|ts| ts.format_date())
                                                .unwrap_or_else(|| "从未".to_string());
                                            view! {
                                                <tr>
                                                    <td class="font-medium">{balance.driver_name}</td>
                                                    <td class=amount_class>
                                                        {format_cents(balance.balance_cents)}
                                                    </td>
                                                    <td>{last_payment}</td>
                                                </tr>
                                            }
                                        }
                                    />
                                </tbody>
                            </table>
                        </div>
                        <Show when=move || rows.get().is_empty()>
                            <p class="p-8 text-center text-base-content/50">"暂无余额数据。"</p>
                        </Show>
                    </Show>
                </div>
            </div>
        </AdminShell>
    }
}

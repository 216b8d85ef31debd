//! 报表仪表盘
//!
//! 销售/库存汇总指标 + 最近通知。

use crate::api::use_api;
use crate::components::layout::AdminShell;
use fleetdesk_shared::protocol::{NotificationListRequest, SalesSummaryRequest};
use fleetdesk_shared::{NotificationItem, SalesSummary};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 分转元的展示格式
pub(crate) fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}¥{}.{:02}", sign, abs / 100, abs % 100)
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let api = use_api();

    let (summary, set_summary) = signal(Option::<SalesSummary>::None);
    let (recent, set_recent) = signal(Vec::<NotificationItem>::new());
    let (loading, set_loading) = signal(true);

    // 初始加载汇总与最近通知
    Effect::new({
        let api = api.clone();
        move |_| {
            let api = api.clone();
            set_loading.set(true);
            spawn_local(async move {
                if let Ok(Some(data)) = api.execute(&SalesSummaryRequest).await {
                    set_summary.set(Some(data));
                }
                if let Ok(Some(page)) = api.execute(&NotificationListRequest { page: 1 }).await {
                    set_recent.set(page.results.into_iter().take(5).collect());
                }
                set_loading.set(false);
            });
        }
    });

    let revenue = move || {
        summary
            .get()
            .map(|s| format_cents(s.total_revenue_cents))
            .unwrap_or_else(|| "-".to_string())
    };
    let orders = move || summary.get().map(|s| s.total_orders).unwrap_or_default();
    let vehicles = move || {
        summary
            .get()
            .map(|s| s.vehicles_serviced)
            .unwrap_or_default()
    };
    let low_stock = move || summary.get().map(|s| s.low_stock_items).unwrap_or_default();

    view! {
        <AdminShell title="报表仪表盘">
            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                <div class="stat">
                    <div class="stat-title">"总营收"</div>
                    <div class="stat-value text-primary">{revenue}</div>
                    <div class="stat-desc">"含配件销售与工时"</div>
                </div>
                <div class="stat">
                    <div class="stat-title">"订单总数"</div>
                    <div class="stat-value">{orders}</div>
                </div>
                <div class="stat">
                    <div class="stat-title">"维修车辆"</div>
                    <div class="stat-value text-success">{vehicles}</div>
                </div>
                <div class="stat">
                    <div class="stat-title">"低库存配件"</div>
                    <div class="stat-value text-warning">{low_stock}</div>
                    <div class="stat-desc">"需要补货"</div>
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title">"最近通知"</h3>
                    <Show when=move || loading.get()>
                        <span class="loading loading-spinner loading-md"></span>
                    </Show>
                    <Show when=move || !loading.get() && recent.get().is_empty()>
                        <p class="text-base-content/50">"暂无通知。"</p>
                    </Show>
                    <ul class="space-y-2">
                        <For
                            each=move || recent.get()
                            key=|item| item.id
                            children=move |item| {
                                let badge = if item.is_read {
                                    "badge badge-ghost badge-xs"
                                } else {
                                    "badge badge-primary badge-xs"
                                };
                                view! {
                                    <li class="flex items-center gap-2">
                                        <span class=badge></span>
                                        <span class="font-medium">{item.title}</span>
                                        <span class="text-xs text-base-content/50">
                                            {item.created_at.format_date()}
                                        </span>
                                    </li>
                                }
                            }
                        />
                    </ul>
                </div>
            </div>
        </AdminShell>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cents_formatting() {
        assert_eq!(format_cents(0), "¥0.00");
        assert_eq!(format_cents(123456), "¥1234.56");
        assert_eq!(format_cents(5), "¥0.05");
        assert_eq!(format_cents(-250), "-¥2.50");
    }
}

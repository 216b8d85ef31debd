//! FleetDesk 共享数据模型
//!
//! 前端与远端 REST API 之间的数据契约：
//! - 领域模型（客户、司机、技师、单据类型等）
//! - 用户与角色定义（含后台登录白名单）
//! - 分页结构与通用协议（见 `protocol` 模块）

mod date;
pub mod protocol;

pub use date::Timestamp;

use serde::{Deserialize, Serialize};

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 认证头名称
pub const HEADER_AUTHORIZATION: &str = "Authorization";
/// Bearer 凭证前缀
pub const BEARER_PREFIX: &str = "Bearer ";
/// 设备标识后缀，与后端的按设备会话追踪约定一致
pub const DEVICE_ID_SUFFIX: &str = "-web-browser";
/// 设备类型标识
pub const DEVICE_TYPE_WEB: &str = "web";
/// 列表接口的每页条数
pub const PAGE_SIZE: u64 = 10;

// =========================================================
// 用户与角色 (Users & Roles)
// =========================================================

/// 业务角色枚举
///
/// 线上传输形式为大写下划线（如 `"FINANCE"`），与后端一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Manager,
    Finance,
    Support,
    Mechanic,
    Driver,
    Customer,
}

impl UserRole {
    /// 后台允许建立会话的角色白名单
    pub const BACK_OFFICE: [UserRole; 4] = [
        UserRole::Admin,
        UserRole::Manager,
        UserRole::Finance,
        UserRole::Support,
    ];

    /// 该角色是否允许登录管理后台
    pub fn is_back_office(&self) -> bool {
        Self::BACK_OFFICE.contains(self)
    }
}

/// 登录用户档案
///
/// 登录后对客户端只读，仅能整体重新拉取，不做本地推导。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub role: UserRole,
    pub is_verified: bool,
    pub is_active: bool,
}

// =========================================================
// 分页结构 (Pagination)
// =========================================================

/// 列表接口的统一分页包装
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// 满足条件的总条数
    pub count: u64,
    /// 下一页链接（无下一页时为空）
    pub next: Option<String>,
    /// 上一页链接
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    /// 按固定页大小换算的总页数
    pub fn total_pages(&self) -> u64 {
        self.count.div_ceil(PAGE_SIZE).max(1)
    }
}

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub is_active: bool,
    pub created_at: Timestamp,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub license_number: String,
    pub is_active: bool,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mechanic {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub specialty: String,
    pub is_active: bool,
    pub created_at: Timestamp,
}

/// 单据类型（编码全局唯一，由后端校验冲突）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentType {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub is_required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faq {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub position: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationItem {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub is_read: bool,
    pub created_at: Timestamp,
}

/// 司机付款余额行（报表用，金额以分为单位）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverBalance {
    pub driver_id: i64,
    pub driver_name: String,
    pub balance_cents: i64,
    pub last_payment_at: Option<Timestamp>,
}

/// 销售/库存汇总指标（仪表盘用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesSummary {
    pub total_revenue_cents: i64,
    pub total_orders: u64,
    pub vehicles_serviced: u64,
    pub low_stock_items: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_office_gate_rejects_field_roles() {
        assert!(UserRole::Admin.is_back_office());
        assert!(UserRole::Finance.is_back_office());
        assert!(!UserRole::Driver.is_back_office());
        assert!(!UserRole::Mechanic.is_back_office());
        assert!(!UserRole::Customer.is_back_office());
    }

    #[test]
    fn role_wire_form_is_screaming_snake_case() {
        assert_eq!(serde_json::to_string(&UserRole::Driver).unwrap(), "\"DRIVER\"");
        let role: UserRole = serde_json::from_str("\"FINANCE\"").unwrap();
        assert_eq!(role, UserRole::Finance);
    }

    #[test]
    fn paginated_total_pages_rounds_up() {
        let page = Paginated::<Customer> {
            count: 21,
            next: None,
            previous: None,
            results: vec![],
        };
        assert_eq!(page.total_pages(), 3);

        let empty = Paginated::<Customer> {
            count: 0,
            next: None,
            previous: None,
            results: vec![],
        };
        // 空列表仍然算一页，分页控件不为 0
        assert_eq!(empty.total_pages(), 1);
    }

    #[test]
    fn customer_full_name_joins_parts() {
        let customer = Customer {
            id: 1,
            first_name: "Ama".to_string(),
            last_name: "Mensah".to_string(),
            email: "ama@example.com".to_string(),
            phone: "0200000000".to_string(),
            is_active: true,
            created_at: Timestamp::new(0),
        };
        assert_eq!(customer.full_name(), "Ama Mensah");
    }
}

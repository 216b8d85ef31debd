//! API 协议定义
//!
//! 每个端点由一个请求类型描述：响应类型、HTTP 方法与路径。
//! 带路径/查询参数的字段用 `#[serde(skip)]` 排除在请求体之外，
//! 由 `path()` 负责拼装。

use crate::{
    Customer, DocumentType, Driver, DriverBalance, Faq, Mechanic, NotificationItem, Paginated,
    SalesSummary, UserProfile,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP 请求方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

/// 端点元数据 trait：请求-响应关系、方法与路径
pub trait ApiRequest: Serialize {
    /// 该请求对应的响应类型
    type Response: DeserializeOwned + 'static;
    /// HTTP 方法
    const METHOD: HttpMethod;
    /// 请求路径（含查询参数）
    fn path(&self) -> String;
    /// 该请求是否携带 JSON 请求体
    fn has_body(&self) -> bool {
        matches!(
            Self::METHOD,
            HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch
        )
    }
}

/// 简单的查询参数转义，覆盖搜索框输入里最常见的保留字符
fn encode_query(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            ' ' => out.push_str("%20"),
            '&' => out.push_str("%26"),
            '=' => out.push_str("%3D"),
            '#' => out.push_str("%23"),
            '+' => out.push_str("%2B"),
            '?' => out.push_str("%3F"),
            _ => out.push(c),
        }
    }
    out
}

// =========================================================
// 认证端点 (Auth)
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub device_id: String,
    pub device_type: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserProfile,
}

impl ApiRequest for LoginRequest {
    type Response = LoginResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/api/auth/login/".to_string()
    }
}

/// 刷新请求：旧 access token 放在 Authorization 头，刷新凭证在请求体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
    pub device_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

impl ApiRequest for RefreshRequest {
    type Response = RefreshResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/api/auth/refresh/".to_string()
    }
}

/// 活跃心跳：向后端标记该设备仍然在线
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityPing {
    pub device_id: String,
}

impl ApiRequest for ActivityPing {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/api/auth/activity/".to_string()
    }
}

// =========================================================
// 客户 (Customers)
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerListRequest {
    #[serde(skip)]
    pub page: u64,
    #[serde(skip)]
    pub search: String,
}

impl ApiRequest for CustomerListRequest {
    type Response = Paginated<Customer>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        let mut path = format!("/api/customers/?page={}", self.page);
        if !self.search.is_empty() {
            path.push_str("&search=");
            path.push_str(&encode_query(&self.search));
        }
        path
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerDeleteRequest {
    #[serde(skip)]
    pub id: i64,
}

impl ApiRequest for CustomerDeleteRequest {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        format!("/api/customers/{}/", self.id)
    }
}

// =========================================================
// 人员：司机与技师 (Drivers & Mechanics)
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverListRequest {
    #[serde(skip)]
    pub page: u64,
}

impl ApiRequest for DriverListRequest {
    type Response = Paginated<Driver>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/api/drivers/?page={}", self.page)
    }
}

/// 启用/停用司机
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverSetActiveRequest {
    #[serde(skip)]
    pub id: i64,
    pub is_active: bool,
}

impl ApiRequest for DriverSetActiveRequest {
    type Response = Driver;
    const METHOD: HttpMethod = HttpMethod::Patch;
    fn path(&self) -> String {
        format!("/api/drivers/{}/", self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MechanicListRequest {
    #[serde(skip)]
    pub page: u64,
}

impl ApiRequest for MechanicListRequest {
    type Response = Paginated<Mechanic>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/api/mechanics/?page={}", self.page)
    }
}

// =========================================================
// 单据类型 (Document Types)
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentTypeListRequest;

impl ApiRequest for DocumentTypeListRequest {
    type Response = Vec<DocumentType>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/api/document-types/".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentTypeCreateRequest {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub is_required: bool,
}

impl ApiRequest for DocumentTypeCreateRequest {
    type Response = DocumentType;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/api/document-types/".to_string()
    }
}

// =========================================================
// 常见问题 (FAQs)
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqListRequest;

impl ApiRequest for FaqListRequest {
    type Response = Vec<Faq>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/api/faqs/".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqCreateRequest {
    pub question: String,
    pub answer: String,
}

impl ApiRequest for FaqCreateRequest {
    type Response = Faq;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/api/faqs/".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqDeleteRequest {
    #[serde(skip)]
    pub id: i64,
}

impl ApiRequest for FaqDeleteRequest {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        format!("/api/faqs/{}/", self.id)
    }
}

// =========================================================
// 通知 (Notifications)
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationListRequest {
    #[serde(skip)]
    pub page: u64,
}

impl ApiRequest for NotificationListRequest {
    type Response = Paginated<NotificationItem>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/api/notifications/?page={}", self.page)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationMarkReadRequest {
    #[serde(skip)]
    pub id: i64,
    pub is_read: bool,
}

impl ApiRequest for NotificationMarkReadRequest {
    type Response = NotificationItem;
    const METHOD: HttpMethod = HttpMethod::Patch;
    fn path(&self) -> String {
        format!("/api/notifications/{}/", self.id)
    }
}

// =========================================================
// 报表 (Reports)
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesSummaryRequest;

impl ApiRequest for SalesSummaryRequest {
    type Response = SalesSummary;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/api/reports/sales-summary/".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverBalanceListRequest;

impl ApiRequest for DriverBalanceListRequest {
    type Response = Vec<DriverBalance>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/api/reports/driver-balances/".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_path_omits_empty_search() {
        let req = CustomerListRequest {
            page: 2,
            search: String::new(),
        };
        assert_eq!(req.path(), "/api/customers/?page=2");
    }

    #[test]
    fn list_path_escapes_search() {
        let req = CustomerListRequest {
            page: 1,
            search: "kofi & sons".to_string(),
        };
        assert_eq!(req.path(), "/api/customers/?page=1&search=kofi%20%26%20sons");
    }

    #[test]
    fn path_params_stay_out_of_body() {
        let req = DriverSetActiveRequest {
            id: 7,
            is_active: false,
        };
        assert_eq!(req.path(), "/api/drivers/7/");
        // id 只出现在路径，不泄漏进请求体
        assert_eq!(
            serde_json::to_string(&req).unwrap(),
            "{\"is_active\":false}"
        );
    }

    #[test]
    fn methods_with_body() {
        assert!(LoginRequest {
            username: String::new(),
            password: String::new(),
            device_id: String::new(),
            device_type: String::new(),
            email: String::new(),
        }
        .has_body());
        assert!(!CustomerDeleteRequest { id: 1 }.has_body());
        assert!(!DocumentTypeListRequest.has_body());
    }
}

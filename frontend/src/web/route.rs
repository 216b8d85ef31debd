//! 路由定义模块 - 领域模型
//!
//! 纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了后台的所有页面路由及其守卫属性。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面 (默认路由)
    #[default]
    Login,
    /// 报表仪表盘
    Dashboard,
    /// 客户管理
    Customers,
    /// 人员管理（司机与技师）
    Drivers,
    /// 单据类型管理
    DocumentTypes,
    /// 常见问题管理
    Faqs,
    /// 通知中心
    Notifications,
    /// 司机余额报表
    DriverBalances,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        match path {
            "/" | "/login" => Self::Login,
            "/dashboard" => Self::Dashboard,
            "/customers" => Self::Customers,
            "/drivers" => Self::Drivers,
            "/document-types" => Self::DocumentTypes,
            "/faqs" => Self::Faqs,
            "/notifications" => Self::Notifications,
            "/driver-balances" => Self::DriverBalances,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Login => "/",
            Self::Dashboard => "/dashboard",
            Self::Customers => "/customers",
            Self::Drivers => "/drivers",
            Self::DocumentTypes => "/document-types",
            Self::Faqs => "/faqs",
            Self::Notifications => "/notifications",
            Self::DriverBalances => "/driver-balances",
            Self::NotFound => "/404",
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Login | Self::NotFound)
    }

    /// 定义已认证用户是否应该离开此路由（如登录页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取认证成功时的重定向目标（从登录页）
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }

    /// 侧边导航的标题
    pub fn nav_title(&self) -> &'static str {
        match self {
            Self::Login => "登录",
            Self::Dashboard => "报表仪表盘",
            Self::Customers => "客户管理",
            Self::Drivers => "人员管理",
            Self::DocumentTypes => "单据类型",
            Self::Faqs => "常见问题",
            Self::Notifications => "通知中心",
            Self::DriverBalances => "司机余额",
            Self::NotFound => "未找到",
        }
    }

    /// 出现在侧边导航中的路由，按展示顺序排列
    pub const NAV_ROUTES: [AppRoute; 7] = [
        Self::Dashboard,
        Self::Customers,
        Self::Drivers,
        Self::DocumentTypes,
        Self::Faqs,
        Self::Notifications,
        Self::DriverBalances,
    ];
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_round_trip() {
        for route in AppRoute::NAV_ROUTES {
            assert_eq!(AppRoute::from_path(route.to_path()), route);
        }
        assert_eq!(AppRoute::from_path("/"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/login"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/no-such-page"), AppRoute::NotFound);
    }

    #[test]
    fn every_nav_route_is_protected() {
        for route in AppRoute::NAV_ROUTES {
            assert!(route.requires_auth(), "{} 应当需要认证", route);
        }
        assert!(!AppRoute::Login.requires_auth());
    }

    #[test]
    fn only_login_redirects_authenticated_users() {
        assert!(AppRoute::Login.should_redirect_when_authenticated());
        assert!(!AppRoute::Dashboard.should_redirect_when_authenticated());
    }
}

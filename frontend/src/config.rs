//! 环境配置模块
//!
//! API 基础地址在构建时通过 `FLEETDESK_API_URL` 注入，
//! 未设置时使用默认地址。

/// 默认 API 基础地址
pub const DEFAULT_API_BASE_URL: &str = "https://api.fleetdesk.example";

/// 获取 API 基础地址（去除末尾斜杠）
pub fn api_base_url() -> String {
    option_env!("FLEETDESK_API_URL")
        .unwrap_or(DEFAULT_API_BASE_URL)
        .trim_end_matches('/')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_has_no_trailing_slash() {
        let url = api_base_url();
        assert!(!url.is_empty());
        assert!(!url.ends_with('/'));
    }
}

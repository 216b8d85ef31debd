//! Cookie 封装模块
//!
//! 使用 `web_sys::HtmlDocument` 读写 `document.cookie`。
//! 拼装与解析是纯函数，便于在原生环境下测试。

use wasm_bindgen::JsCast;

/// Cookie 操作封装
pub struct CookieJar;

impl CookieJar {
    fn document() -> Option<web_sys::HtmlDocument> {
        web_sys::window()?.document()?.dyn_into().ok()
    }

    /// 读取指定名称的 Cookie 值
    pub fn get(key: &str) -> Option<String> {
        let raw = Self::document()?.cookie().ok()?;
        parse_cookie(&raw, key)
    }

    /// 写入 Cookie
    ///
    /// `max_age_secs` 为 `Some` 时写入持久 Cookie，
    /// 为 `None` 时不带过期属性（浏览器会话级）。
    pub fn set(key: &str, value: &str, max_age_secs: Option<u64>) -> bool {
        let attr = build_set_cookie(key, value, max_age_secs);
        Self::document()
            .and_then(|d| d.set_cookie(&attr).ok())
            .is_some()
    }

    /// 删除 Cookie（写入 Max-Age=0）
    pub fn delete(key: &str) -> bool {
        let attr = format!("{}=; Path=/; Max-Age=0", key);
        Self::document()
            .and_then(|d| d.set_cookie(&attr).ok())
            .is_some()
    }
}

/// 从 `document.cookie` 的原始串中解析指定名称的值
pub(crate) fn parse_cookie(raw: &str, key: &str) -> Option<String> {
    raw.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == key).then(|| value.to_string())
    })
}

/// 拼装写入 `document.cookie` 的属性串
pub(crate) fn build_set_cookie(key: &str, value: &str, max_age_secs: Option<u64>) -> String {
    let mut attr = format!("{}={}; Path=/; SameSite=Lax", key, value);
    if let Some(secs) = max_age_secs {
        attr.push_str("; Max-Age=");
        attr.push_str(&secs.to_string());
    }
    attr
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_finds_value_among_pairs() {
        let raw = "theme=dark; token=abc.def.ghi; refresh=r1";
        assert_eq!(parse_cookie(raw, "token"), Some("abc.def.ghi".to_string()));
        assert_eq!(parse_cookie(raw, "refresh"), Some("r1".to_string()));
        assert_eq!(parse_cookie(raw, "missing"), None);
    }

    #[test]
    fn parse_requires_exact_name() {
        // "token" 不能命中 "access_token"
        let raw = "access_token=zzz";
        assert_eq!(parse_cookie(raw, "token"), None);
    }

    #[test]
    fn persistent_cookie_carries_max_age() {
        let attr = build_set_cookie("token", "abc", Some(2_592_000));
        assert_eq!(attr, "token=abc; Path=/; SameSite=Lax; Max-Age=2592000");
    }

    #[test]
    fn session_cookie_has_no_expiry_attribute() {
        let attr = build_set_cookie("token", "abc", None);
        assert!(!attr.contains("Max-Age"));
        assert!(!attr.contains("Expires"));
    }
}

//! 令牌生命周期判定
//!
//! 只解码 JWT 载荷中的 `exp` 声明，不做签名校验（校验是后端的职责）。
//! 任何解码失败一律视为已过期：宁可多跳一次登录，不可放行坏令牌。
//! 判定函数接受注入的"当前时间"，浏览器侧包装函数再接上 `js_sys::Date`。

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// "即将过期"的默认阈值（分钟）
pub const EXPIRY_THRESHOLD_MINUTES: i64 = 5;

/// 解码令牌的过期时间，返回毫秒时间戳
///
/// JWT 的 `exp` 声明以秒为单位，这里统一换算为毫秒。
/// 格式不合法、载荷不是 JSON、缺少 `exp` 时返回 `None`。
pub fn decode_expiry_ms(token: &str) -> Option<i64> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.as_bytes()).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    let exp_secs = claims.get("exp")?.as_i64()?;
    exp_secs.checked_mul(1000)
}

/// 令牌在 `now_ms` 时刻是否已过期（解码失败视为过期）
pub fn is_expired_at(token: &str, now_ms: i64) -> bool {
    match decode_expiry_ms(token) {
        Some(exp_ms) => exp_ms <= now_ms,
        None => true,
    }
}

/// 令牌在 `now_ms` 时刻是否即将过期（解码失败视为即将过期）
pub fn is_expiring_soon_at(token: &str, threshold_minutes: i64, now_ms: i64) -> bool {
    match decode_expiry_ms(token) {
        Some(exp_ms) => exp_ms - now_ms < threshold_minutes * 60_000,
        None => true,
    }
}

/// 当前毫秒时间戳（浏览器时钟）
pub fn now_ms() -> i64 {
    js_sys::Date::now() as i64
}

/// 令牌是否已过期（以浏览器当前时间判定）
pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, now_ms())
}

/// 令牌是否即将过期（默认阈值，以浏览器当前时间判定）
pub fn is_expiring_soon(token: &str) -> bool {
    is_expiring_soon_at(token, EXPIRY_THRESHOLD_MINUTES, now_ms())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 构造一个载荷里只有 exp 声明的伪 JWT（签名部分随意）
    fn make_token(exp_secs: i64) -> String {
        let payload = URL_SAFE_NO_PAD.encode(format!("{{\"exp\":{}}}", exp_secs));
        format!("header.{}.signature", payload)
    }

    #[test]
    fn malformed_tokens_fail_closed() {
        let malformed = [
            "",
            "not-a-jwt",
            "only.two",
            "a.!!!not-base64!!!.c",
            // 载荷是合法 base64 但不是 JSON
            &format!("a.{}.c", URL_SAFE_NO_PAD.encode("hello")),
            // JSON 但没有 exp
            &format!("a.{}.c", URL_SAFE_NO_PAD.encode("{\"sub\":\"1\"}")),
        ];
        for token in malformed {
            assert!(is_expired_at(token, 0), "{:?} 应判为已过期", token);
            assert!(
                is_expiring_soon_at(token, EXPIRY_THRESHOLD_MINUTES, 0),
                "{:?} 应判为即将过期",
                token
            );
        }
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let now_ms = 1_700_000_000_000;
        let token = make_token(now_ms / 1000);
        // exp == now 即过期
        assert!(is_expired_at(&token, now_ms));
        assert!(!is_expired_at(&token, now_ms - 1));
    }

    #[test]
    fn expiring_soon_boundary_is_strict() {
        let now_ms = 1_700_000_000_000;
        let threshold_ms = EXPIRY_THRESHOLD_MINUTES * 60_000;

        // 恰好还剩 5 分钟：不算即将过期（严格小于）
        let exactly = make_token((now_ms + threshold_ms) / 1000);
        assert!(!is_expiring_soon_at(&exactly, EXPIRY_THRESHOLD_MINUTES, now_ms));

        // 还剩 4 分 59 秒：即将过期
        let within = make_token((now_ms + threshold_ms - 1000) / 1000);
        assert!(is_expiring_soon_at(&within, EXPIRY_THRESHOLD_MINUTES, now_ms));
    }

    #[test]
    fn fresh_token_passes_both_checks() {
        let now_ms = 1_700_000_000_000;
        let token = make_token((now_ms + 3_600_000) / 1000);
        assert!(!is_expired_at(&token, now_ms));
        assert!(!is_expiring_soon_at(&token, EXPIRY_THRESHOLD_MINUTES, now_ms));
    }

    #[test]
    fn decode_converts_seconds_to_millis() {
        let token = make_token(1_700_000_000);
        assert_eq!(decode_expiry_ms(&token), Some(1_700_000_000_000));
    }
}

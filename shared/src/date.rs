//! 时间类型模块
//!
//! 提供可序列化的毫秒时间戳类型 `Timestamp`，用于传输和存储。
//! 刻意不依赖任何浏览器 API，"当前时间"由调用方注入，
//! 以便核心逻辑可以在原生环境下直接测试。

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};
use std::time::Duration;

/// 毫秒时间戳
///
/// 内部存储为 `i64`，表示自 Unix 纪元以来的毫秒数
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// 创建新的时间戳
    #[inline]
    pub const fn new(ms: i64) -> Self {
        Self(ms)
    }

    /// 获取毫秒值
    #[inline]
    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    /// 获取秒值
    #[inline]
    pub const fn as_secs(&self) -> i64 {
        self.0 / 1000
    }

    /// 格式化为 `YYYY-MM-DD HH:MM`（UTC），超出范围时返回占位符
    pub fn format_date(&self) -> String {
        chrono::DateTime::from_timestamp_millis(self.0)
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

impl From<i64> for Timestamp {
    fn from(ms: i64) -> Self {
        Self(ms)
    }
}

impl From<Timestamp> for i64 {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl Add<Duration> for Timestamp {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self(self.0 + rhs.as_millis() as i64)
    }
}

impl Sub<Timestamp> for Timestamp {
    type Output = Duration;

    /// 计算两个时间戳之间的差值（早于 rhs 时返回零）
    fn sub(self, rhs: Timestamp) -> Self::Output {
        let diff_ms = (self.0 - rhs.0).max(0);
        Duration::from_millis(diff_ms as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_arithmetic() {
        let base = Timestamp::new(1_000);
        assert_eq!((base + Duration::from_secs(2)).as_millis(), 3_000);
        assert_eq!(Timestamp::new(5_000) - base, Duration::from_secs(4));
        // 负差值截断为零
        assert_eq!(base - Timestamp::new(5_000), Duration::ZERO);
    }

    #[test]
    fn format_date_renders_utc() {
        let ts = Timestamp::new(0);
        assert_eq!(ts.format_date(), "1970-01-01 00:00");
    }

    #[test]
    fn serde_is_transparent() {
        let ts = Timestamp::new(1_700_000_000_000);
        assert_eq!(serde_json::to_string(&ts).unwrap(), "1700000000000");
        let back: Timestamp = serde_json::from_str("1700000000000").unwrap();
        assert_eq!(back, ts);
    }
}

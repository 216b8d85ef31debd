//! 会话失效重定向模块
//!
//! 三个周期任务与任意一次 API 调用都可能同时发现会话失效。
//! 进程级闩锁保证只安排一次"清凭证 + 回登录页"流程，
//! 闩锁在固定延迟后自行复位，以便后续的失效仍能被检测到。
//!
//! 此路径刻意不输出任何日志：令牌到期是预期内的高频状况，不是故障。

use crate::auth::{SessionContext, SessionState};
use crate::session::store::CredentialStore;
use leptos::prelude::{set_timeout, Set};
use std::cell::Cell;
use std::time::Duration;

/// 闩锁自动复位延迟
pub const LATCH_RESET_DELAY: Duration = Duration::from_secs(3);

/// 单次重定向闩锁
///
/// 单线程事件循环模型下 `Cell` 的置位/复位即是原子的，无需加锁。
pub(crate) struct RedirectLatch {
    active: Cell<bool>,
}

impl RedirectLatch {
    pub(crate) const fn new() -> Self {
        Self {
            active: Cell::new(false),
        }
    }

    /// 尝试占用闩锁；已被占用时返回 false
    pub(crate) fn try_acquire(&self) -> bool {
        if self.active.get() {
            false
        } else {
            self.active.set(true);
            true
        }
    }

    /// 复位闩锁，允许下一次重定向
    pub(crate) fn release(&self) {
        self.active.set(false);
    }
}

thread_local! {
    static LATCH: RedirectLatch = const { RedirectLatch::new() };
}

/// 准备一次回登录页的重定向
///
/// 清除全部持久化凭证并把会话状态置为未认证；
/// 实际导航由路由服务监听认证信号完成。
/// 并发检测到失效时只有第一个调用生效。
pub fn prepare_login_redirect(session: SessionContext, store: &CredentialStore) {
    if !LATCH.with(|latch| latch.try_acquire()) {
        return;
    }

    store.clear_session();
    session.set_state.set(SessionState::signed_out());

    set_timeout(
        || {
            LATCH.with(|latch| latch.release());
        },
        LATCH_RESET_DELAY,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concurrent_detections_acquire_once() {
        let latch = RedirectLatch::new();
        // 两个"同时"检测到会话失效的调用，只有第一个拿到闩锁
        assert!(latch.try_acquire());
        assert!(!latch.try_acquire());
        assert!(!latch.try_acquire());
    }

    #[test]
    fn release_allows_future_detection() {
        let latch = RedirectLatch::new();
        assert!(latch.try_acquire());
        latch.release();
        assert!(latch.try_acquire());
    }
}

//! 会话子系统
//!
//! 认证层中唯一有状态机行为的部分：
//! - `token`: 令牌过期判定（失败视为过期，fail-closed）
//! - `store`: 凭证存储抽象（Cookie + LocalStorage 双写，读取有优先级）
//! - `redirect`: 会话失效后的单次重定向准备（进程级去重）

pub mod redirect;
pub mod store;
pub mod token;

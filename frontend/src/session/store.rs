//! 凭证存储模块
//!
//! 统一的"凭证存储"抽象：Cookie 与 LocalStorage 双后端冗余持久化，
//! 任何一方丢失都不会让会话搁浅。读取按后端声明顺序取第一个命中值
//! （Cookie 优先），写入扇出到所有接受该键的后端。

use crate::web::{CookieJar, LocalStorage};

// =========================================================
// 存储键定义
// =========================================================

pub const KEY_TOKEN: &str = "token";
pub const KEY_REFRESH: &str = "refresh";
pub const KEY_USER: &str = "user";
pub const KEY_KEEP_SESSION: &str = "keepSession";
pub const KEY_LAST_LOGIN: &str = "lastLoginTime";
pub const KEY_LAST_REFRESH: &str = "lastTokenRefresh";
pub const KEY_LAST_ACTIVITY: &str = "lastActivityUpdate";

/// 会话相关的全部存储键，登出/失效时整体清除
pub const SESSION_KEYS: [&str; 7] = [
    KEY_TOKEN,
    KEY_REFRESH,
    KEY_USER,
    KEY_KEEP_SESSION,
    KEY_LAST_LOGIN,
    KEY_LAST_REFRESH,
    KEY_LAST_ACTIVITY,
];

/// "记住登录"时凭证 Cookie 的有效期：30 天
pub const KEEP_SESSION_MAX_AGE_SECS: u64 = 30 * 24 * 60 * 60;

// =========================================================
// 后端抽象
// =========================================================

/// 凭证存储后端
///
/// 存储随 API 句柄在组件树里传递，后端因此要求 `Send + Sync`
/// （浏览器后端均为无状态单元结构体，天然满足）。
pub trait CredentialBackend: Send + Sync {
    /// 该后端是否负责此键
    fn accepts(&self, key: &str) -> bool {
        let _ = key;
        true
    }

    fn read(&self, key: &str) -> Option<String>;

    /// 写入一个键值；`keep` 表示用户勾选了"记住登录"
    fn write(&self, key: &str, value: &str, keep: bool) -> bool;

    fn remove(&self, key: &str) -> bool;
}

/// Cookie 后端：只承载两个令牌键
///
/// `keep` 为 true 时写入 30 天持久 Cookie，否则为会话级 Cookie。
pub struct CookieBackend;

impl CredentialBackend for CookieBackend {
    fn accepts(&self, key: &str) -> bool {
        matches!(key, KEY_TOKEN | KEY_REFRESH)
    }

    fn read(&self, key: &str) -> Option<String> {
        CookieJar::get(key)
    }

    fn write(&self, key: &str, value: &str, keep: bool) -> bool {
        let max_age = keep.then_some(KEEP_SESSION_MAX_AGE_SECS);
        CookieJar::set(key, value, max_age)
    }

    fn remove(&self, key: &str) -> bool {
        CookieJar::delete(key)
    }
}

/// LocalStorage 后端：承载所有会话键的镜像
pub struct StorageBackend;

impl CredentialBackend for StorageBackend {
    fn read(&self, key: &str) -> Option<String> {
        LocalStorage::get(key)
    }

    fn write(&self, key: &str, value: &str, _keep: bool) -> bool {
        LocalStorage::set(key, value)
    }

    fn remove(&self, key: &str) -> bool {
        LocalStorage::delete(key)
    }
}

// =========================================================
// 凭证存储
// =========================================================

/// 组合后端的凭证存储
pub struct CredentialStore {
    backends: Vec<Box<dyn CredentialBackend>>,
}

impl CredentialStore {
    /// 浏览器默认配置：Cookie 优先，LocalStorage 兜底
    pub fn browser() -> Self {
        Self::with_backends(vec![Box::new(CookieBackend), Box::new(StorageBackend)])
    }

    pub fn with_backends(backends: Vec<Box<dyn CredentialBackend>>) -> Self {
        Self { backends }
    }

    /// 按后端声明顺序读取，返回第一个命中值
    pub fn read(&self, key: &str) -> Option<String> {
        self.backends
            .iter()
            .filter(|b| b.accepts(key))
            .find_map(|b| b.read(key))
    }

    /// 写入所有接受该键的后端
    pub fn write(&self, key: &str, value: &str, keep: bool) {
        for backend in self.backends.iter().filter(|b| b.accepts(key)) {
            backend.write(key, value, keep);
        }
    }

    /// 从所有后端删除该键
    pub fn remove(&self, key: &str) {
        for backend in self.backends.iter().filter(|b| b.accepts(key)) {
            backend.remove(key);
        }
    }

    /// 清除全部会话键
    pub fn clear_session(&self) {
        for key in SESSION_KEYS {
            self.remove(key);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    type SharedMap = Arc<Mutex<HashMap<String, String>>>;

    /// 内存后端：模拟单个存储介质，可限定接受的键
    pub(crate) struct MemoryBackend {
        data: SharedMap,
        only: Option<Vec<&'static str>>,
    }

    impl MemoryBackend {
        pub(crate) fn new() -> (Self, SharedMap) {
            let data = SharedMap::default();
            (
                Self {
                    data: data.clone(),
                    only: None,
                },
                data,
            )
        }

        fn restricted(keys: Vec<&'static str>) -> (Self, SharedMap) {
            let data = SharedMap::default();
            (
                Self {
                    data: data.clone(),
                    only: Some(keys),
                },
                data,
            )
        }
    }

    impl CredentialBackend for MemoryBackend {
        fn accepts(&self, key: &str) -> bool {
            match &self.only {
                Some(keys) => keys.contains(&key),
                None => true,
            }
        }

        fn read(&self, key: &str) -> Option<String> {
            self.data.lock().unwrap().get(key).cloned()
        }

        fn write(&self, key: &str, value: &str, _keep: bool) -> bool {
            self.data
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            true
        }

        fn remove(&self, key: &str) -> bool {
            self.data.lock().unwrap().remove(key).is_some()
        }
    }

    fn two_tier_store() -> (CredentialStore, SharedMap, SharedMap) {
        // 模拟浏览器配置：第一层只收令牌键（Cookie），第二层全收（LocalStorage）
        let (primary, primary_data) = MemoryBackend::restricted(vec![KEY_TOKEN, KEY_REFRESH]);
        let (fallback, fallback_data) = MemoryBackend::new();
        let store = CredentialStore::with_backends(vec![Box::new(primary), Box::new(fallback)]);
        (store, primary_data, fallback_data)
    }

    #[test]
    fn read_prefers_first_backend() {
        let (store, primary, fallback) = two_tier_store();
        primary
            .lock()
            .unwrap()
            .insert(KEY_TOKEN.to_string(), "cookie-token".to_string());
        fallback
            .lock()
            .unwrap()
            .insert(KEY_TOKEN.to_string(), "storage-token".to_string());

        assert_eq!(store.read(KEY_TOKEN), Some("cookie-token".to_string()));
    }

    #[test]
    fn read_falls_back_when_first_backend_is_empty() {
        let (store, _primary, fallback) = two_tier_store();
        fallback
            .lock()
            .unwrap()
            .insert(KEY_TOKEN.to_string(), "storage-token".to_string());

        // Cookie 丢了也不会让会话搁浅
        assert_eq!(store.read(KEY_TOKEN), Some("storage-token".to_string()));
    }

    #[test]
    fn write_fans_out_to_accepting_backends() {
        let (store, primary, fallback) = two_tier_store();
        store.write(KEY_TOKEN, "abc", false);
        store.write(KEY_USER, "{}", false);

        assert_eq!(
            primary.lock().unwrap().get(KEY_TOKEN).map(String::as_str),
            Some("abc")
        );
        assert_eq!(
            fallback.lock().unwrap().get(KEY_TOKEN).map(String::as_str),
            Some("abc")
        );
        // 元数据键不进第一层
        assert!(!primary.lock().unwrap().contains_key(KEY_USER));
        assert!(fallback.lock().unwrap().contains_key(KEY_USER));
    }

    #[test]
    fn clear_session_removes_everything() {
        let (store, primary, fallback) = two_tier_store();
        for key in SESSION_KEYS {
            store.write(key, "x", true);
        }
        store.clear_session();

        assert!(primary.lock().unwrap().is_empty());
        assert!(fallback.lock().unwrap().is_empty());
    }
}

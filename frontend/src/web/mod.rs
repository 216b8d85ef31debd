//! 原生 Web API 封装模块
//!
//! 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
//! 以减小 WASM 二进制体积。纯逻辑部分（Cookie 解析、路由守卫等）
//! 不触碰 DOM，可在原生环境下测试。

mod cookie;
mod http;
pub mod route;
pub mod router;
mod storage;

pub use cookie::CookieJar;
pub use http::{HttpClient, HttpError, HttpRequestBuilder, HttpResponse};
pub use storage::LocalStorage;

//! # HTTP Request Module / HTTP 请求模块
//!
//! A small request-builder shared by every test case: a [`RequestSpec`] holds
//! method, path and an optional JSON body, and an [`ApiClient`] sends it to the
//! base address of one configured service.
//!
//! 所有测试用例共享的小型请求构建器：[`RequestSpec`] 包含方法、路径和可选的 JSON 请求体，
//! [`ApiClient`] 将其发送到某个已配置服务的基础地址。

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::core::config::ServiceConfig;
use crate::infra::json_path;

pub use reqwest::Method;

/// Errors raised by the HTTP layer. All of them classify a row as `error`.
/// HTTP 层产生的错误，都会将该行归类为 `error`。
#[derive(Debug, Error)]
pub enum HttpError {
    /// The client could not be constructed from the service configuration.
    #[error("invalid client configuration: {0}")]
    Config(String),
    /// The call did not complete.
    #[error("{method} {url} failed: {message}")]
    Network {
        method: Method,
        url: String,
        message: String,
    },
}

/// One request: method, path relative to the service base address, and an
/// optional JSON body.
/// 一个请求：方法、相对于服务基础地址的路径和可选的 JSON 请求体。
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl RequestSpec {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attaches a JSON body / 附加 JSON 请求体
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// A fully received response.
/// 一个已完整接收的响应。
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: u16,
    text: String,
    json: Option<Value>,
}

impl ApiResponse {
    pub fn new(status: u16, text: impl Into<String>) -> Self {
        let text = text.into();
        let json = serde_json::from_str(&text).ok();
        Self { status, text, json }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The body parsed as JSON, if it was JSON.
    pub fn json(&self) -> Option<&Value> {
        self.json.as_ref()
    }

    /// String rendering of the body field at `path`.
    /// 响应体中 `path` 字段的字符串形式。
    pub fn get_string(&self, path: &str) -> Option<String> {
        self.json.as_ref().and_then(|v| json_path::get_string(v, path))
    }

    /// The body field at `path` as a float.
    pub fn get_f64(&self, path: &str) -> Option<f64> {
        self.json
            .as_ref()
            .and_then(|v| json_path::lookup(v, path))
            .and_then(|v| match v {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.parse().ok(),
                _ => None,
            })
    }

    /// Every value at `path`, fanning out over arrays.
    pub fn get_list(&self, path: &str) -> Vec<&Value> {
        self.json
            .as_ref()
            .map(|v| json_path::collect(v, path))
            .unwrap_or_default()
    }
}

/// Sends [`RequestSpec`]s to one service.
///
/// Each client owns its own connection pool. The runner builds one per
/// invocation, so concurrent rows never share connection state.
///
/// 向单个服务发送 [`RequestSpec`]。每个客户端拥有自己的连接池。
/// 运行器为每次调用构建一个客户端，因此并发的行之间不共享连接状态。
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(service: &ServiceConfig) -> Result<Self, HttpError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &service.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| HttpError::Config(format!("header '{name}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| HttpError::Config(format!("header '{name}': {e}")))?;
            headers.insert(name, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HttpError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: service.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a path relative to the base address.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Sends one request and reads the whole response body.
    /// 发送一个请求并读取完整的响应体。
    pub async fn send(&self, spec: RequestSpec) -> Result<ApiResponse, HttpError> {
        let url = self.url_for(&spec.path);
        debug!(method = %spec.method, %url, body = ?spec.body, "request");

        let mut request = self.client.request(spec.method.clone(), &url);
        if let Some(body) = &spec.body {
            request = request.json(body);
        }

        let network_error = |e: reqwest::Error| HttpError::Network {
            method: spec.method.clone(),
            url: url.clone(),
            message: e.to_string(),
        };

        let response = request.send().await.map_err(network_error)?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(network_error)?;
        debug!(status, body = %text, "response");

        Ok(ApiResponse::new(status, text))
    }
}

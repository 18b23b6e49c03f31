//! # Test Case Contract Module / 测试用例契约模块
//!
//! A test case declares its parameter signature and, given one bound tuple and
//! a client for its target service, performs its HTTP calls and assertions.
//! The runner turns the returned `Result` into a [`CaseResult`].
//!
//! 测试用例声明其参数签名；给定一个已绑定的元组和目标服务的客户端，
//! 执行其 HTTP 调用和断言。运行器将返回的 `Result` 转换为 [`CaseResult`]。
//!
//! [`CaseResult`]: crate::core::models::CaseResult

use async_trait::async_trait;
use thiserror::Error;

use crate::core::binder::{ParameterTuple, Signature};
use crate::core::error::HarnessError;
use crate::core::models::CaseStatus;
use crate::infra::http::{ApiClient, HttpError};

/// Why a single invocation did not pass.
/// 单次调用未通过的原因。
#[derive(Debug, Error)]
pub enum CaseError {
    /// The observed response did not match the expectation.
    /// 观察到的响应与预期不符。
    #[error("{message} (expected {expected}, actual {actual})")]
    Assertion {
        message: String,
        expected: String,
        actual: String,
    },

    /// The HTTP call did not complete.
    /// HTTP 调用未完成。
    #[error(transparent)]
    Network(#[from] HttpError),

    /// The row could not be bound, or the case asked for an undeclared parameter.
    /// 该行无法绑定，或用例请求了未声明的参数。
    #[error(transparent)]
    Binding(#[from] HarnessError),

    /// Anything else the case could not handle, e.g. an unsupported method in
    /// a fixture row or a panic inside the case.
    /// 用例无法处理的其他情况，例如夹具行中不支持的方法或用例内部的 panic。
    #[error("{0}")]
    Unexpected(String),
}

impl CaseError {
    pub fn assertion(
        message: impl Into<String>,
        expected: impl ToString,
        actual: impl ToString,
    ) -> Self {
        CaseError::Assertion {
            message: message.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Assertion mismatches are `fail`; everything else is `error`.
    /// 断言不匹配为 `fail`，其他均为 `error`。
    pub fn status(&self) -> CaseStatus {
        match self {
            CaseError::Assertion { .. } => CaseStatus::Fail,
            _ => CaseStatus::Error,
        }
    }
}

/// A parameterized scenario against one target service.
///
/// Implementations must not depend on other invocations: a flow that needs an
/// existing resource creates it inside the same `execute` call.
///
/// 针对单个目标服务的参数化场景。实现不得依赖其他调用：
/// 需要已有资源的流程必须在同一次 `execute` 调用中自行创建该资源。
#[async_trait]
pub trait TestCase: Send + Sync {
    /// Registry name, e.g. `reqres.get_users`.
    fn name(&self) -> &'static str;

    /// One-line description shown by `list` and in reports.
    fn description(&self) -> &'static str;

    /// Declared parameters in fixture column order.
    fn signature(&self) -> Signature;

    async fn execute(&self, params: &ParameterTuple, client: &ApiClient) -> Result<(), CaseError>;
}

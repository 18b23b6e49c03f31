//! # Assertions Module / 断言模块
//!
//! Response checks shared by the case catalogue. Every helper returns
//! `CaseError::Assertion` with expected and actual values filled in, so the
//! report can show the mismatch without rerunning.
//!
//! 用例目录共享的响应检查。每个辅助函数都会返回填好预期值和实际值的
//! `CaseError::Assertion`，使报告无需重新运行即可显示不匹配之处。

use crate::core::case::CaseError;
use crate::infra::http::ApiResponse;

/// Status must equal `expected`.
pub fn expect_status(response: &ApiResponse, expected: i64) -> Result<(), CaseError> {
    if i64::from(response.status()) == expected {
        Ok(())
    } else {
        Err(CaseError::assertion(
            format!("unexpected status code, body: {}", snippet(response.text())),
            expected,
            response.status(),
        ))
    }
}

/// Status must be one of the documented codes. Returns the observed code so
/// the caller can branch on it.
/// 状态码必须是已记录的代码之一，返回观察到的代码以便调用方据此分支。
pub fn expect_status_in(response: &ApiResponse, documented: &[u16]) -> Result<u16, CaseError> {
    let status = response.status();
    if documented.contains(&status) {
        Ok(status)
    } else {
        Err(CaseError::assertion(
            format!("undocumented status code, body: {}", snippet(response.text())),
            format!("{documented:?}"),
            status,
        ))
    }
}

/// Body field at `path` must render as `expected`.
pub fn expect_field(response: &ApiResponse, path: &str, expected: &str) -> Result<(), CaseError> {
    match response.get_string(path) {
        Some(actual) if actual == expected => Ok(()),
        actual => Err(CaseError::assertion(
            format!("field '{path}' mismatch"),
            format!("{expected:?}"),
            render(actual),
        )),
    }
}

/// Body field at `path` must be missing or `null`.
pub fn expect_field_absent(response: &ApiResponse, path: &str) -> Result<(), CaseError> {
    match response.get_string(path) {
        None => Ok(()),
        actual => Err(CaseError::assertion(
            format!("field '{path}' should be absent"),
            "null",
            render(actual),
        )),
    }
}

/// Numeric body field at `path` must be within `tolerance` of `expected`.
pub fn expect_close(
    response: &ApiResponse,
    path: &str,
    expected: f64,
    tolerance: f64,
) -> Result<(), CaseError> {
    match response.get_f64(path) {
        Some(actual) if (actual - expected).abs() <= tolerance => Ok(()),
        Some(actual) => Err(CaseError::assertion(
            format!("field '{path}' outside tolerance {tolerance}"),
            expected,
            actual,
        )),
        None => Err(CaseError::assertion(
            format!("field '{path}' is not a number"),
            expected,
            "null",
        )),
    }
}

/// Generic condition check.
pub fn expect_that(
    condition: bool,
    message: impl Into<String>,
    expected: impl ToString,
    actual: impl ToString,
) -> Result<(), CaseError> {
    if condition {
        Ok(())
    } else {
        Err(CaseError::assertion(message, expected, actual))
    }
}

/// Body field at `path` as a string, or an assertion failure when absent.
/// Used to pick up server-generated ids.
pub fn require_field(response: &ApiResponse, path: &str) -> Result<String, CaseError> {
    response.get_string(path).ok_or_else(|| {
        CaseError::assertion(
            format!("field '{path}' missing, body: {}", snippet(response.text())),
            "a value",
            "null",
        )
    })
}

fn render(value: Option<String>) -> String {
    value.map(|v| format!("{v:?}")).unwrap_or_else(|| "null".to_string())
}

fn snippet(text: &str) -> String {
    const MAX: usize = 200;
    if text.chars().count() <= MAX {
        text.to_string()
    } else {
        let cut: String = text.chars().take(MAX).collect();
        format!("{cut}...")
    }
}

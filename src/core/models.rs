//! # Data Models Module / 数据模型模块
//!
//! Result types produced by the runner and consumed by the reporters: the
//! outcome of one row ([`CaseResult`]), the results of one suite
//! ([`SuiteReport`]) and the whole run ([`RunReport`]).
//!
//! 运行器产生、报告器消费的结果类型：单行的结果（[`CaseResult`]）、
//! 单个套件的结果（[`SuiteReport`]）以及整个运行（[`RunReport`]）。

use chrono::{DateTime, Local};
use serde::{Serialize, Serializer};
use std::fmt;
use std::time::Duration;

use crate::core::binder::ParameterTuple;
use crate::core::case::CaseError;
use crate::core::error::HarnessError;
use crate::infra::t;

/// Outcome class of one invocation.
/// 单次调用的结果类别。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    /// Every assertion held / 所有断言成立
    Pass,
    /// An assertion did not hold / 有断言不成立
    Fail,
    /// The row could not be bound, the call did not complete, or the case
    /// crashed / 该行无法绑定、调用未完成或用例崩溃
    Error,
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseStatus::Pass => write!(f, "pass"),
            CaseStatus::Fail => write!(f, "fail"),
            CaseStatus::Error => write!(f, "error"),
        }
    }
}

/// Diagnostic context of a result that did not pass.
/// 未通过结果的诊断上下文。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureDetail {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

impl FailureDetail {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            expected: None,
            actual: None,
        }
    }
}

impl From<&CaseError> for FailureDetail {
    fn from(error: &CaseError) -> Self {
        match error {
            CaseError::Assertion {
                message,
                expected,
                actual,
            } => Self {
                message: message.clone(),
                expected: Some(expected.clone()),
                actual: Some(actual.clone()),
            },
            other => Self::message(other.to_string()),
        }
    }
}

impl From<&HarnessError> for FailureDetail {
    fn from(error: &HarnessError) -> Self {
        Self::message(error.to_string())
    }
}

/// The outcome of one (case, row) execution.
/// 一次（用例，行）执行的结果。
#[derive(Debug, Clone, Serialize)]
pub struct CaseResult {
    /// Suite the row belongs to / 该行所属的套件
    pub suite: String,
    /// Registered case name / 已注册的用例名称
    pub case: String,
    /// 1-based data row index; `None` for cases that run without a fixture.
    /// 从 1 开始的数据行索引；无夹具的用例为 `None`。
    pub row: Option<usize>,
    /// Raw fixture cells, kept even when binding failed.
    /// 原始夹具单元格，即使绑定失败也会保留。
    pub inputs: Vec<String>,
    /// The bound tuple, absent when binding failed.
    /// 已绑定的元组，绑定失败时缺省。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<ParameterTuple>,
    pub status: CaseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<FailureDetail>,
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
}

impl CaseResult {
    pub fn is_pass(&self) -> bool {
        self.status == CaseStatus::Pass
    }

    /// Label used to identify the row in reports, e.g. `#3` or `-`.
    /// 报告中标识该行的标签。
    pub fn row_label(&self) -> String {
        self.row
            .map(|row| format!("#{row}"))
            .unwrap_or_else(|| "-".to_string())
    }

    /// Inputs rendered for display: the bound tuple when available, otherwise
    /// the raw cells.
    /// 用于显示的输入：有已绑定元组时显示元组，否则显示原始单元格。
    pub fn inputs_display(&self) -> String {
        match &self.params {
            Some(params) if !params.is_empty() => params.to_string(),
            Some(_) => "()".to_string(),
            None => format!("{:?}", self.inputs),
        }
    }

    /// Localized status label / 本地化的状态标签
    pub fn status_str(&self, locale: &str) -> String {
        match self.status {
            CaseStatus::Pass => t!("report.status_pass", locale = locale).to_string(),
            CaseStatus::Fail => t!("report.status_fail", locale = locale).to_string(),
            CaseStatus::Error => t!("report.status_error", locale = locale).to_string(),
        }
    }

    /// CSS class for the HTML report.
    pub fn status_class(&self) -> &'static str {
        match self.status {
            CaseStatus::Pass => "status-pass",
            CaseStatus::Fail => "status-fail",
            CaseStatus::Error => "status-error",
        }
    }
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

/// Pass/fail/error counts.
/// 通过/失败/错误计数。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
}

impl Totals {
    pub fn of<'a>(results: impl IntoIterator<Item = &'a CaseResult>) -> Self {
        results.into_iter().fold(Totals::default(), |mut acc, r| {
            acc.total += 1;
            match r.status {
                CaseStatus::Pass => acc.passed += 1,
                CaseStatus::Fail => acc.failed += 1,
                CaseStatus::Error => acc.errors += 1,
            }
            acc
        })
    }

    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }
}

/// Results of one suite, in fixture row order.
/// 单个套件的结果，按夹具行顺序排列。
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub name: String,
    pub case: String,
    pub service: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixture: Option<String>,
    pub totals: Totals,
    pub results: Vec<CaseResult>,
}

impl SuiteReport {
    pub fn new(
        name: String,
        case: String,
        service: String,
        fixture: Option<String>,
        results: Vec<CaseResult>,
    ) -> Self {
        let totals = Totals::of(&results);
        Self {
            name,
            case,
            service,
            fixture,
            totals,
            results,
        }
    }
}

/// Results of a whole run.
/// 整个运行的结果。
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub generated_at: DateTime<Local>,
    pub totals: Totals,
    pub suites: Vec<SuiteReport>,
}

impl RunReport {
    pub fn new(suites: Vec<SuiteReport>) -> Self {
        let totals = Totals::of(suites.iter().flat_map(|s| s.results.iter()));
        Self {
            generated_at: Local::now(),
            totals,
            suites,
        }
    }

    /// `true` only if every result of every suite passed. Drives the exit code.
    /// 仅当所有套件的所有结果都通过时为 `true`，决定进程退出码。
    pub fn all_passed(&self) -> bool {
        self.totals.all_passed()
    }

    pub fn results(&self) -> impl Iterator<Item = &CaseResult> {
        self.suites.iter().flat_map(|s| s.results.iter())
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseResult> {
        self.results().filter(|r| !r.is_pass())
    }
}

//! # Test Execution Engine Module / 测试执行引擎模块
//!
//! Runs one case over a sequence of bound rows and produces exactly one
//! [`CaseResult`] per row, in row order. Each invocation runs in its own tokio
//! task with its own HTTP client, so a panic or failure in one row is turned
//! into that row's result and never reaches the others.
//!
//! 对一系列已绑定的行运行一个用例，并按行顺序为每行产生恰好一个 [`CaseResult`]。
//! 每次调用都在独立的 tokio 任务中运行并拥有独立的 HTTP 客户端，
//! 因此某一行中的 panic 或失败只会成为该行的结果，不会影响其他行。

use colored::*;
use futures::{StreamExt, stream};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::core::binder::ParameterTuple;
use crate::core::case::{CaseError, TestCase};
use crate::core::config::ServiceConfig;
use crate::core::error::HarnessError;
use crate::core::models::{CaseResult, CaseStatus, FailureDetail};
use crate::infra::http::ApiClient;
use crate::infra::t;

/// One pending invocation: a fixture row and its binding outcome.
/// 一个待执行的调用：夹具行及其绑定结果。
#[derive(Debug, Clone)]
pub struct Invocation {
    /// 1-based data row index, `None` for fixture-less cases.
    pub row: Option<usize>,
    /// Raw cells of the row / 该行的原始单元格
    pub inputs: Vec<String>,
    /// Bound tuple, or the reason the row could not be bound.
    /// 已绑定的元组，或该行无法绑定的原因。
    pub binding: Result<ParameterTuple, HarnessError>,
}

impl Invocation {
    /// The single invocation of a case that takes no parameters.
    pub fn standalone() -> Self {
        Self {
            row: None,
            inputs: Vec::new(),
            binding: Ok(ParameterTuple::empty()),
        }
    }
}

/// Everything a row needs to run, owned so it can move into a task.
#[derive(Clone)]
pub struct SuiteContext {
    pub suite: String,
    pub case: Arc<dyn TestCase>,
    pub service: ServiceConfig,
}

/// Runs `invocations` of one case and returns one result per invocation in
/// input order.
///
/// # Arguments
/// * `ctx` - The suite, its case and the target service
/// * `invocations` - Rows to run, in fixture order
/// * `jobs` - Maximum concurrent invocations; `1` runs strictly in sequence
///
/// # Returns
/// Results in the same order as `invocations`, regardless of completion order.
///
/// 运行一个用例的所有 `invocations`，并按输入顺序为每个调用返回一个结果。
/// 无论完成顺序如何，结果顺序都与 `invocations` 相同。
pub async fn run_suite(
    ctx: &SuiteContext,
    invocations: Vec<Invocation>,
    jobs: usize,
    locale: &str,
) -> Vec<CaseResult> {
    let jobs = jobs.max(1);
    debug!(suite = %ctx.suite, rows = invocations.len(), jobs, "running suite");

    stream::iter(invocations.into_iter().map(|invocation| {
        let ctx = ctx.clone();
        let locale = locale.to_string();
        async move {
            let result = run_invocation(ctx, invocation).await;
            print_row_result(&result, &locale);
            result
        }
    }))
    .buffered(jobs)
    .collect()
    .await
}

/// Runs a single invocation and converts every outcome into a [`CaseResult`].
///
/// Rows that failed to bind are reported as `error` without touching the
/// network. Bound rows run in a spawned task; a panic inside the case is
/// caught through the task's `JoinError`.
///
/// 运行单个调用并将所有结果转换为 [`CaseResult`]。绑定失败的行直接报告为 `error`，
/// 不进行任何网络访问。已绑定的行在派生的任务中运行；用例中的 panic 通过任务的
/// `JoinError` 捕获。
pub async fn run_invocation(ctx: SuiteContext, invocation: Invocation) -> CaseResult {
    let Invocation {
        row,
        inputs,
        binding,
    } = invocation;

    let base = CaseResult {
        suite: ctx.suite.clone(),
        case: ctx.case.name().to_string(),
        row,
        inputs,
        params: None,
        status: CaseStatus::Error,
        detail: None,
        duration: Duration::ZERO,
    };

    let params = match binding {
        Ok(params) => params,
        Err(e) => {
            warn!(suite = %ctx.suite, row = ?row, error = %e, "row could not be bound");
            return CaseResult {
                detail: Some(FailureDetail::from(&e)),
                ..base
            };
        }
    };

    let start = Instant::now();
    let task_params = params.clone();
    let handle = tokio::spawn(async move {
        let client = ApiClient::new(&ctx.service)?;
        ctx.case.execute(&task_params, &client).await
    });

    let outcome = match handle.await {
        Ok(outcome) => outcome,
        Err(join_error) => Err(CaseError::Unexpected(if join_error.is_panic() {
            format!("case panicked: {}", panic_message(join_error.into_panic()))
        } else {
            format!("case task did not complete: {join_error}")
        })),
    };
    let duration = start.elapsed();

    match outcome {
        Ok(()) => CaseResult {
            params: Some(params),
            status: CaseStatus::Pass,
            duration,
            ..base
        },
        Err(e) => CaseResult {
            params: Some(params),
            status: e.status(),
            detail: Some(FailureDetail::from(&e)),
            duration,
            ..base
        },
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

fn print_row_result(result: &CaseResult, locale: &str) {
    let line = t!(
        "run.row_finished",
        locale = locale,
        suite = &result.suite,
        row = result.row_label(),
        status = result.status_str(locale),
        duration = format!("{:.2?}", result.duration)
    );
    match result.status {
        CaseStatus::Pass => println!("{}", line.green()),
        CaseStatus::Fail => println!("{}", line.red()),
        CaseStatus::Error => println!("{}", line.red().bold()),
    }
}

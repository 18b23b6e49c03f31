//! # Execution Planner Module / 执行计划模块
//!
//! Turns a loaded suite file into an execution plan: applies the name filter,
//! resolves each suite's case and service, reads every fixture and binds its
//! rows. All fixtures are read before anything executes, so a missing file or
//! sheet aborts the run with no case having been started.
//!
//! 将已加载的套件文件转换为执行计划：应用名称过滤，解析每个套件的用例和服务，
//! 读取每个夹具并绑定其行。所有夹具都在执行任何内容之前读取，
//! 因此缺失的文件或工作表会在任何用例开始之前中止运行。

use anyhow::{Context, Result, anyhow};
use std::sync::Arc;

use crate::cases;
use crate::core::binder::bind;
use crate::core::config::{SuiteConfig, SuiteFile};
use crate::core::execution::{Invocation, SuiteContext};
use crate::core::fixture;

/// One suite ready to run.
/// 一个准备运行的套件。
pub struct PlannedSuite {
    pub ctx: SuiteContext,
    /// Registered case name / 已注册的用例名称
    pub case_name: String,
    /// Key of the target service / 目标服务的键
    pub service_name: String,
    /// Fixture description for reports, `None` for fixture-less cases.
    pub fixture: Option<String>,
    pub invocations: Vec<Invocation>,
}

/// Represents a complete execution plan.
/// 表示完整的执行计划。
pub struct ExecutionPlan {
    pub suites: Vec<PlannedSuite>,
    /// Suites left out by the filter / 被过滤掉的套件数量
    pub filtered_count: usize,
}

impl ExecutionPlan {
    pub fn invocation_count(&self) -> usize {
        self.suites.iter().map(|s| s.invocations.len()).sum()
    }
}

/// Creates an execution plan for the given suite file.
///
/// # Arguments
/// * `file` - The loaded and validated suite file
/// * `filter` - Optional substring a suite name must contain to be selected
///
/// # Returns
/// The plan, with suites in configuration order.
///
/// # Errors
/// Any fixture that cannot be resolved (file or sheet missing, no header).
pub fn plan_execution(file: &SuiteFile, filter: Option<&str>) -> Result<ExecutionPlan> {
    let (selected, filtered): (Vec<&SuiteConfig>, Vec<&SuiteConfig>) = file
        .suites
        .iter()
        .partition(|suite| filter.is_none_or(|f| suite.name.contains(f)));

    let suites = selected
        .into_iter()
        .map(|suite| plan_suite(file, suite))
        .collect::<Result<Vec<_>>>()?;

    Ok(ExecutionPlan {
        suites,
        filtered_count: filtered.len(),
    })
}

fn plan_suite(file: &SuiteFile, suite: &SuiteConfig) -> Result<PlannedSuite> {
    let case = cases::find(&suite.case)
        .ok_or_else(|| anyhow!("Suite '{}' refers to unknown case '{}'", suite.name, suite.case))?;
    let service = file
        .services
        .get(&suite.service)
        .cloned()
        .ok_or_else(|| {
            anyhow!(
                "Suite '{}' refers to unknown service '{}'",
                suite.name,
                suite.service
            )
        })?;

    let invocations = match &suite.fixture {
        Some(source) => {
            let table = fixture::read(source)
                .with_context(|| format!("Failed to load fixture for suite '{}'", suite.name))?;
            let signature = case.signature();
            table
                .rows
                .into_iter()
                .map(|row| match row {
                    Ok(record) => Invocation {
                        row: Some(record.index()),
                        binding: bind(&record, signature),
                        inputs: record.cells().to_vec(),
                    },
                    Err(malformed) => Invocation {
                        row: Some(malformed.index),
                        inputs: malformed.raw,
                        binding: Err(malformed.error),
                    },
                })
                .collect()
        }
        None => vec![Invocation::standalone()],
    };

    Ok(PlannedSuite {
        ctx: SuiteContext {
            suite: suite.name.clone(),
            case: Arc::clone(&case),
            service,
        },
        case_name: suite.case.clone(),
        service_name: suite.service.clone(),
        fixture: suite.fixture.as_ref().map(ToString::to_string),
        invocations,
    })
}

//! # Run Command Module / 运行命令模块
//!
//! This module implements the `run` command for the Fixture Runner CLI,
//! which executes every configured suite against its service and reports the
//! outcome of each fixture row.
//!
//! 此模块实现了 Fixture Runner CLI 的 `run` 命令，
//! 针对各自的服务执行所有已配置的套件，并报告每个夹具行的结果。

use anyhow::{Context, Result};
use colored::*;
use std::path::PathBuf;

use crate::{
    core::{
        config::{self, SuiteFile},
        execution::run_suite,
        models::{RunReport, SuiteReport},
        planner::{self, ExecutionPlan},
    },
    infra::{fs::absolute_path, t},
    reporting::{generate_html_report, print_failure_details, print_summary, write_json_report},
};

/// Arguments of `fixture-runner run`.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Path to `Suite.toml`
    pub config: PathBuf,
    /// Overrides the configured concurrency
    pub jobs: Option<usize>,
    /// Substring a suite name must contain to run
    pub filter: Option<String>,
    /// Optional HTML report destination
    pub html: Option<PathBuf>,
    /// Optional JSON report destination
    pub json: Option<PathBuf>,
    /// Language given on the command line; takes precedence over the config
    pub lang_override: Option<String>,
}

/// Executes the run command with the provided arguments.
///
/// # Arguments
/// * `options` - Parsed command-line options
/// * `locale` - Locale resolved before the configuration was read
///
/// # Returns
/// `Ok` only if every invocation of every selected suite passed. Fatal
/// configuration or fixture problems, and any failed or errored row, yield
/// an error so the process exits non-zero.
pub async fn execute(options: RunOptions, locale: &str) -> Result<()> {
    let (suite_file, config_path) = setup_and_parse_config(&options.config, locale)?;

    let locale = match (&options.lang_override, &suite_file.language) {
        (None, Some(configured)) => crate::init(Some(configured.as_str())),
        _ => locale.to_string(),
    };
    let locale = locale.as_str();

    println!(
        "{}",
        t!("run.loading_config", locale = locale, path = config_path.display())
    );

    let plan = planner::plan_execution(&suite_file, options.filter.as_deref())
        .context(t!("run.plan_failed", locale = locale).to_string())?;

    let jobs = resolve_jobs(options.jobs.unwrap_or(suite_file.jobs));
    print_plan(&plan, jobs, locale);

    if plan.suites.is_empty() {
        println!("{}", t!("run.no_suites", locale = locale).yellow());
        return Ok(());
    }

    let mut suite_reports = Vec::with_capacity(plan.suites.len());
    for suite in plan.suites {
        println!(
            "\n{}",
            t!(
                "run.suite_started",
                locale = locale,
                suite = &suite.ctx.suite,
                case = &suite.case_name,
                rows = suite.invocations.len()
            )
            .cyan()
            .bold()
        );
        let results = run_suite(&suite.ctx, suite.invocations, jobs, locale).await;
        suite_reports.push(SuiteReport::new(
            suite.ctx.suite.clone(),
            suite.case_name,
            suite.service_name,
            suite.fixture,
            results,
        ));
    }

    let report = RunReport::new(suite_reports);
    print_summary(&report, locale);

    if let Some(report_path) = &options.html {
        println!(
            "\n{}",
            t!("run.html_generating", locale = locale, path = report_path.display())
        );
        if let Err(e) = generate_html_report(&report, report_path, locale) {
            eprintln!("{} {:#}", t!("run.html_failed", locale = locale).red(), e);
        }
    }

    if let Some(report_path) = &options.json {
        println!(
            "{}",
            t!("run.json_generating", locale = locale, path = report_path.display())
        );
        if let Err(e) = write_json_report(&report, report_path) {
            eprintln!("{} {:#}", t!("run.json_failed", locale = locale).red(), e);
        }
    }

    if report.all_passed() {
        println!("\n{}", t!("run.all_passed", locale = locale).green().bold());
        Ok(())
    } else {
        print_failure_details(&report, locale);
        anyhow::bail!(
            t!(
                "run.some_failed",
                locale = locale,
                failed = report.totals.failed,
                errors = report.totals.errors
            )
            .to_string()
        )
    }
}

/// Resolves the job count: `0` means one per CPU core.
/// 解析并发数：`0` 表示每个 CPU 核心一个。
pub fn resolve_jobs(requested: usize) -> usize {
    if requested == 0 {
        num_cpus::get()
    } else {
        requested
    }
}

/// Sets up and parses the suite configuration file.
fn setup_and_parse_config(config_arg: &PathBuf, locale: &str) -> Result<(SuiteFile, PathBuf)> {
    let config_path = absolute_path(config_arg).with_context(|| {
        t!("run.config_not_found", locale = locale, path = config_arg.display()).to_string()
    })?;

    let suite_file = config::load_suite_file(&config_path)
        .with_context(|| t!("run.config_parse_failed", locale = locale).to_string())?;

    Ok((suite_file, config_path))
}

fn print_plan(plan: &ExecutionPlan, jobs: usize, locale: &str) {
    if plan.filtered_count > 0 {
        println!(
            "{}",
            t!(
                "run.filtered_suites",
                locale = locale,
                filtered = plan.filtered_count,
                total = plan.suites.len()
            )
            .cyan()
        );
    }
    println!(
        "{}",
        t!(
            "run.plan_summary",
            locale = locale,
            suites = plan.suites.len(),
            invocations = plan.invocation_count(),
            jobs = jobs
        )
        .bold()
    );
}

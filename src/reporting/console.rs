//! # Console Reporting Module / 控制台报告模块
//!
//! This module prints the run report to the console: one table per suite,
//! the aggregate counts, and a detail section for every row that did not pass.
//!
//! 此模块将运行报告打印到控制台：每个套件一张表、汇总计数，
//! 以及每个未通过行的详细信息部分。

use colored::*;

use crate::core::models::{CaseResult, CaseStatus, RunReport};
use crate::infra::t;

/// Prints a formatted summary of the run to the console.
///
/// 在控制台打印格式化的运行摘要。
///
/// # Arguments / 参数
/// * `report` - The finished run / 已完成的运行
/// * `locale` - The language locale to use for messages
///              用于消息的语言区域设置
///
/// # Output Format / 输出格式
/// ```text
/// --- Run Summary ---
/// reqres-get-users (reqres.get_users @ reqres, fixtures/reqres_testdata.xlsx#get_users)
///   - Pass     | #1   | (userId: "2", expectedStatus: 200)        |   312.40ms
///   - Fail     | #2   | (userId: "23", expectedStatus: 200)       |   280.11ms
///   - Error    | #3   | ["x", "abc"]                              |       0ns
/// Total: 3  Passed: 1  Failed: 1  Errors: 1
/// ```
pub fn print_summary(report: &RunReport, locale: &str) {
    println!("\n{}", t!("report.summary_banner", locale = locale).bold());

    for suite in &report.suites {
        let source = suite
            .fixture
            .clone()
            .unwrap_or_else(|| t!("report.no_fixture", locale = locale).to_string());
        println!(
            "\n{} ({} @ {}, {})",
            suite.name.cyan().bold(),
            suite.case,
            suite.service,
            source.dimmed()
        );

        for result in &suite.results {
            let status = colorize(result, result.status_str(locale));
            println!(
                "  - {:<8} | {:<4} | {:<40} | {:>10}",
                status,
                result.row_label(),
                truncate(&result.inputs_display(), 40),
                format!("{:.2?}", result.duration)
            );
        }
    }

    let totals = report.totals;
    println!(
        "\n{}",
        t!(
            "report.totals",
            locale = locale,
            total = totals.total,
            passed = totals.passed,
            failed = totals.failed,
            errors = totals.errors
        )
        .bold()
    );
}

/// Prints diagnostic context for every row that did not pass: suite, row,
/// inputs, and expected vs actual when the failure was an assertion.
///
/// 打印每个未通过行的诊断上下文：套件、行、输入，以及断言失败时的预期值与实际值。
pub fn print_failure_details(report: &RunReport, locale: &str) {
    let failures: Vec<&CaseResult> = report.failures().collect();
    if failures.is_empty() {
        return;
    }

    println!("\n{}", t!("report.failure_banner", locale = locale).red().bold());
    println!("{}", "-".repeat(80));

    for (i, result) in failures.iter().enumerate() {
        println!(
            "[{}/{}] {} {} {}",
            i + 1,
            failures.len(),
            colorize(result, result.status_str(locale)),
            result.suite.cyan(),
            result.row_label()
        );
        println!(
            "  {}: {}",
            t!("report.inputs", locale = locale),
            result.inputs_display()
        );
        if let Some(detail) = &result.detail {
            println!("  {}: {}", t!("report.message", locale = locale), detail.message);
            if let Some(expected) = &detail.expected {
                println!("  {}: {}", t!("report.expected", locale = locale), expected.green());
            }
            if let Some(actual) = &detail.actual {
                println!("  {}: {}", t!("report.actual", locale = locale), actual.red());
            }
        }
        println!("{}", "-".repeat(80));
    }
}

fn colorize(result: &CaseResult, label: String) -> ColoredString {
    match result.status {
        CaseStatus::Pass => label.green(),
        CaseStatus::Fail => label.red(),
        CaseStatus::Error => label.red().bold(),
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

//! # HTML Reporting Module / HTML 报告模块
//!
//! This module renders the run report as a standalone HTML page with `maud`:
//! summary counts, one table per suite, and a collapsible detail row under
//! every result that did not pass.
//!
//! 此模块使用 `maud` 将运行报告渲染为独立的 HTML 页面：汇总计数、每个套件一张表，
//! 以及每个未通过结果下方可折叠的详细信息行。

use anyhow::Result;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::path::Path;

use crate::core::models::{CaseResult, RunReport, SuiteReport};
use crate::infra::fs::write_creating_parents;
use crate::infra::t;

/// Embedded CSS styles for HTML reports / HTML 报告的嵌入式 CSS 样式
const HTML_STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; margin: 2em; color: #222; }
h1 { margin-bottom: 0.2em; }
.generated { color: #777; margin-bottom: 1.5em; }
.summary-container { display: flex; gap: 1.5em; margin-bottom: 2em; }
.summary-item { display: flex; flex-direction: column; align-items: center; padding: 0.8em 1.4em; border-radius: 6px; background: #f4f4f4; }
.summary-item .count { font-size: 1.8em; font-weight: bold; }
.passed-text { color: #2e7d32; } .failed-text { color: #c62828; } .error-text { color: #6a1b9a; }
table { border-collapse: collapse; width: 100%; margin-bottom: 2em; }
th, td { border-bottom: 1px solid #ddd; padding: 0.4em 0.6em; text-align: left; vertical-align: top; }
.status-cell { display: inline-block; padding: 0.1em 0.6em; border-radius: 4px; color: #fff; font-weight: bold; }
.status-pass { background: #2e7d32; } .status-fail { background: #c62828; } .status-error { background: #6a1b9a; }
.output-toggle { cursor: pointer; color: #1565c0; font-size: 0.85em; margin-top: 0.3em; }
.output-content { background: #fafafa; padding: 0.8em; white-space: pre-wrap; margin: 0; }
.duration-cell { text-align: right; white-space: nowrap; }
"#;

/// Embedded JavaScript for HTML report interactivity / HTML 报告交互性的嵌入式 JavaScript
const HTML_SCRIPT: &str = r#"
function toggleOutput(id) {
  var row = document.getElementById(id);
  row.style.display = row.style.display === 'none' ? 'table-row' : 'none';
}
"#;

/// Generates an HTML report from a finished run.
///
/// 从已完成的运行生成 HTML 报告。
///
/// # Arguments / 参数
/// * `report` - The finished run / 已完成的运行
/// * `output_path` - Where the HTML file is written / HTML 文件的写入位置
/// * `locale` - The locale to use for internationalization / 用于国际化的语言环境
///
/// # Errors / 错误
/// Fails if the file cannot be written.
pub fn generate_html_report(report: &RunReport, output_path: &Path, locale: &str) -> Result<()> {
    write_creating_parents(output_path, render(report, locale).into_string())
}

/// Renders the report page / 渲染报告页面
pub fn render(report: &RunReport, locale: &str) -> Markup {
    let totals = report.totals;
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (t!("html_report.title", locale = locale)) }
                style { (PreEscaped(HTML_STYLE)) }
            }
            body {
                h1 { (t!("html_report.main_header", locale = locale)) }
                div class="generated" {
                    (t!("html_report.generated_at", locale = locale))
                    " "
                    (report.generated_at.format("%Y-%m-%d %H:%M:%S %:z"))
                }
                div class="summary-container" {
                    (summary_item(totals.total, "", &t!("html_report.summary.total", locale = locale)))
                    (summary_item(totals.passed, "passed-text", &t!("html_report.summary.passed", locale = locale)))
                    (summary_item(totals.failed, "failed-text", &t!("html_report.summary.failed", locale = locale)))
                    (summary_item(totals.errors, "error-text", &t!("html_report.summary.errors", locale = locale)))
                }
                @for (s, suite) in report.suites.iter().enumerate() {
                    (suite_table(s, suite, locale))
                }
                script { (PreEscaped(HTML_SCRIPT)) }
            }
        }
    }
}

fn summary_item(count: usize, class: &str, label: &str) -> Markup {
    html! {
        div class="summary-item" {
            span class={ "count " (class) } { (count) }
            span class="label" { (label) }
        }
    }
}

fn suite_table(index: usize, suite: &SuiteReport, locale: &str) -> Markup {
    html! {
        h2 { (suite.name) }
        p {
            code { (suite.case) } " @ " code { (suite.service) }
            @if let Some(fixture) = &suite.fixture {
                " · " code { (fixture) }
            }
        }
        table {
            thead {
                tr {
                    th { (t!("html_report.table.header.row", locale = locale)) }
                    th { (t!("html_report.table.header.inputs", locale = locale)) }
                    th { (t!("html_report.table.header.status", locale = locale)) }
                    th class="duration-cell" { (t!("html_report.table.header.duration", locale = locale)) }
                }
            }
            tbody {
                @for (i, result) in suite.results.iter().enumerate() {
                    (result_rows(&format!("output-{index}-{i}"), result, locale))
                }
            }
        }
    }
}

fn result_rows(output_id: &str, result: &CaseResult, locale: &str) -> Markup {
    html! {
        tr {
            td { (result.row_label()) }
            td { code { (result.inputs_display()) } }
            td {
                div class={ "status-cell " (result.status_class()) } { (result.status_str(locale)) }
                @if result.detail.is_some() {
                    div class="output-toggle" onclick={ "toggleOutput('" (output_id) "')" } {
                        (t!("html_report.toggle_output", locale = locale))
                    }
                }
            }
            td class="duration-cell" { (format!("{:.2}s", result.duration.as_secs_f64())) }
        }
        @if let Some(detail) = &result.detail {
            tr id=(output_id) style="display:none;" {
                td colspan="4" {
                    pre class="output-content" {
                        (detail.message)
                        @if let Some(expected) = &detail.expected {
                            "\n" (t!("report.expected", locale = locale)) ": " (expected)
                        }
                        @if let Some(actual) = &detail.actual {
                            "\n" (t!("report.actual", locale = locale)) ": " (actual)
                        }
                    }
                }
            }
        }
    }
}

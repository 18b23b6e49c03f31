//! # JSON Reporting Module / JSON 报告模块
//!
//! Serializes the run report for CI tooling.
//!
//! 为 CI 工具序列化运行报告。

use anyhow::{Context, Result};
use std::path::Path;

use crate::core::models::RunReport;
use crate::infra::fs::write_creating_parents;

/// Writes `report` as pretty-printed JSON to `output_path`.
/// 将 `report` 以格式化 JSON 写入 `output_path`。
pub fn write_json_report(report: &RunReport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize run report")?;
    write_creating_parents(output_path, json)
}

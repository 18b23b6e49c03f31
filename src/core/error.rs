//! # Harness Error Module / 测试框架错误模块
//!
//! Error taxonomy for fixture resolution and row binding. Errors that make it
//! impossible to produce any row (missing file, missing sheet, missing header)
//! abort the whole run; row-level errors are converted into `error` results by
//! the runner and never stop the remaining rows.
//!
//! 夹具解析和行绑定的错误分类。无法产生任何行的错误（文件缺失、工作表缺失、
//! 表头缺失）会中止整个运行；行级错误由运行器转换为 `error` 结果，不会阻止其余行。

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading fixtures or binding their rows.
/// 读取夹具或绑定其行时产生的错误。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HarnessError {
    /// The fixture file does not exist or cannot be opened.
    /// 夹具文件不存在或无法打开。
    #[error("fixture not found: {path}")]
    FixtureNotFound { path: PathBuf },

    /// The workbook exists but has no sheet with the requested name.
    /// 工作簿存在，但没有指定名称的工作表。
    #[error("sheet '{sheet}' not found in fixture {path} (available: {available})")]
    SheetNotFound {
        path: PathBuf,
        sheet: String,
        available: String,
    },

    /// The source is empty: there is no header row to discard.
    /// 数据源为空：没有可丢弃的表头行。
    #[error("fixture {path} has no header row")]
    MissingHeader { path: PathBuf },

    /// The file exists but could not be parsed as the expected format.
    /// 文件存在但无法按预期格式解析。
    #[error("failed to read fixture {path}: {message}")]
    FixtureRead { path: PathBuf, message: String },

    /// A data row carries cells beyond the header's column count.
    /// 数据行包含超出表头列数的单元格。
    #[error("row {row}: cell in column {column} is beyond the header's {header_columns} columns")]
    MalformedRow {
        row: usize,
        column: usize,
        header_columns: usize,
    },

    /// A data cell is not valid UTF-8 text.
    /// 数据单元格不是有效的 UTF-8 文本。
    #[error("row {row}: cell in column {column} is not valid UTF-8")]
    InvalidEncoding { row: usize, column: usize },

    /// The case declares more parameters than the row has columns.
    /// 用例声明的参数多于该行的列数。
    #[error("row {row}: signature expects {expected} columns but the fixture has {actual}")]
    SignatureMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// A cell could not be coerced to its declared parameter type.
    /// 单元格无法转换为声明的参数类型。
    #[error("row {row}, column {column} ('{name}'): cannot parse {raw:?} as {expected}")]
    TypeCoercion {
        row: usize,
        column: usize,
        name: String,
        raw: String,
        expected: &'static str,
    },

    /// A parameter was requested by a name the signature does not declare,
    /// or with a type other than the declared one.
    /// 按签名未声明的名称或错误类型请求参数。
    #[error("parameter '{name}' is not bound as {expected}")]
    UnboundParameter { name: String, expected: &'static str },
}

impl HarnessError {
    /// Whether this error prevents the whole run from producing any row.
    /// 此错误是否会阻止整个运行产生任何行。
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            HarnessError::FixtureNotFound { .. }
                | HarnessError::SheetNotFound { .. }
                | HarnessError::MissingHeader { .. }
                | HarnessError::FixtureRead { .. }
        )
    }
}

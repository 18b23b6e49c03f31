//! # Fixture Reader Module / 夹具读取模块
//!
//! Reads tabular fixtures into ordered row records. Two source kinds are
//! supported: spreadsheet workbooks (read through `calamine`) and
//! comma-delimited text files (read through `csv` with quoting disabled, so a
//! line is split on every comma exactly as written).
//!
//! 将表格夹具读取为有序的行记录。支持两种数据源：电子表格工作簿（通过 `calamine`
//! 读取）和逗号分隔的文本文件（通过禁用引号处理的 `csv` 读取，因此每行按逗号原样拆分）。
//!
//! The first row of every source is the header and is discarded after its
//! width has been measured. Every produced record has exactly the header's
//! column count: missing trailing cells become empty strings.

use calamine::{Data, Reader, open_workbook_auto};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::core::error::HarnessError;

/// File extensions handled by the spreadsheet reader.
/// 由电子表格读取器处理的文件扩展名。
const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Identifies a tabular source: a file path plus an optional sheet name.
/// 标识一个表格数据源：文件路径加可选的工作表名称。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureSource {
    /// Path to the fixture file / 夹具文件路径
    pub path: PathBuf,
    /// Sheet to read from a workbook. The first sheet is used when absent.
    /// Ignored for delimited text files.
    /// 要读取的工作簿工作表。缺省时使用第一个工作表。对分隔文本文件无效。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
}

impl FixtureSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sheet: None,
        }
    }

    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    /// Whether this source is read as a spreadsheet workbook.
    /// 此数据源是否作为电子表格工作簿读取。
    pub fn is_spreadsheet(&self) -> bool {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                SPREADSHEET_EXTENSIONS
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}

impl fmt::Display for FixtureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sheet {
            Some(sheet) => write!(f, "{}#{}", self.path.display(), sheet),
            None => write!(f, "{}", self.path.display()),
        }
    }
}

/// One parsed data row. `index` is 1-based and counts data rows only.
/// 一条已解析的数据行。`index` 从 1 开始，仅计数据行。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRecord {
    index: usize,
    cells: Vec<String>,
}

impl RowRecord {
    pub fn new(index: usize, cells: Vec<String>) -> Self {
        Self { index, cells }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Cell at `column`, or `None` past the declared column count.
    pub fn get(&self, column: usize) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }
}

/// Outcome of reading a single data row. A malformed row is reported in place
/// so that the rows after it are still produced.
/// 读取单个数据行的结果。格式错误的行会在原位置报告，其后的行仍会被产生。
pub type RowOutcome = Result<RowRecord, MalformedRow>;

/// A data row that could not be turned into a record, with the raw cells kept
/// for diagnostics.
/// 无法转换为记录的数据行，保留原始单元格用于诊断。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRow {
    pub index: usize,
    pub raw: Vec<String>,
    pub error: HarnessError,
}

/// All rows of one fixture, header excluded.
/// 一个夹具的所有行（不含表头）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureTable {
    pub header: Vec<String>,
    pub rows: Vec<RowOutcome>,
}

impl FixtureTable {
    pub fn column_count(&self) -> usize {
        self.header.len()
    }
}

/// Reads the fixture identified by `source`.
///
/// The underlying file is opened and closed within this call, so reading the
/// same source twice yields identical tables unless the file changed in
/// between.
///
/// 读取 `source` 标识的夹具。底层文件在此调用内打开并关闭，因此除非文件在两次读取之间
/// 发生变化，对同一数据源读取两次会得到相同的表。
///
/// # Errors
/// `FixtureNotFound`, `SheetNotFound`, `MissingHeader` and `FixtureRead` are
/// fatal to the run. Row-level problems are reported inside `FixtureTable::rows`.
pub fn read(source: &FixtureSource) -> Result<FixtureTable, HarnessError> {
    if !source.path.is_file() {
        return Err(HarnessError::FixtureNotFound {
            path: source.path.clone(),
        });
    }

    let grid = if source.is_spreadsheet() {
        read_spreadsheet_grid(&source.path, source.sheet.as_deref())?
    } else {
        read_delimited_grid(&source.path)?
    };

    let table = normalize(&source.path, grid)?;
    info!(
        fixture = %source,
        columns = table.column_count(),
        rows = table.rows.len(),
        "loaded fixture"
    );
    Ok(table)
}

/// One line of the raw grid before it is measured against the header.
struct GridRow {
    cells: Vec<String>,
    /// First column whose bytes were not valid UTF-8.
    undecodable: Option<usize>,
}

impl From<Vec<String>> for GridRow {
    fn from(cells: Vec<String>) -> Self {
        Self {
            cells,
            undecodable: None,
        }
    }
}

/// Splits the raw grid into header and data rows, padding short rows and
/// flagging rows that reach past the header.
fn normalize(path: &Path, grid: Vec<GridRow>) -> Result<FixtureTable, HarnessError> {
    let mut lines = grid.into_iter();
    let header_cells = lines
        .next()
        .ok_or_else(|| HarnessError::MissingHeader {
            path: path.to_path_buf(),
        })?
        .cells;

    // Trailing blank header cells do not count as declared columns.
    let width = header_cells
        .iter()
        .rposition(|cell| !cell.is_empty())
        .map(|last| last + 1)
        .ok_or_else(|| HarnessError::MissingHeader {
            path: path.to_path_buf(),
        })?;
    let header: Vec<String> = header_cells.into_iter().take(width).collect();

    let rows = lines
        .enumerate()
        .map(|(i, GridRow { mut cells, undecodable })| {
            let index = i + 1;
            if let Some(column) = undecodable {
                debug!(row = index, column, "row is not valid UTF-8");
                return Err(MalformedRow {
                    index,
                    raw: cells,
                    error: HarnessError::InvalidEncoding { row: index, column },
                });
            }
            if let Some(column) = cells
                .iter()
                .enumerate()
                .skip(width)
                .find(|(_, cell)| !cell.is_empty())
                .map(|(column, _)| column)
            {
                debug!(row = index, column, "row reaches past the header");
                return Err(MalformedRow {
                    index,
                    raw: cells,
                    error: HarnessError::MalformedRow {
                        row: index,
                        column,
                        header_columns: width,
                    },
                });
            }
            cells.resize(width, String::new());
            Ok(RowRecord::new(index, cells))
        })
        .collect();

    Ok(FixtureTable { header, rows })
}

fn read_delimited_grid(path: &Path) -> Result<Vec<GridRow>, HarnessError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::None)
        .from_path(path)
        .map_err(|e| HarnessError::FixtureRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    // Byte records, so one undecodable line only spoils its own row.
    let mut grid = Vec::new();
    for record in reader.byte_records() {
        let record = record.map_err(|e| HarnessError::FixtureRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let mut undecodable = None;
        let cells = record
            .iter()
            .enumerate()
            .map(|(column, bytes)| {
                let text = match std::str::from_utf8(bytes) {
                    Ok(text) => text.to_string(),
                    Err(_) => {
                        undecodable.get_or_insert(column);
                        String::from_utf8_lossy(bytes).into_owned()
                    }
                };
                text.trim_end_matches('\r').to_string()
            })
            .collect();
        grid.push(GridRow { cells, undecodable });
    }
    Ok(grid)
}

fn read_spreadsheet_grid(
    path: &Path,
    sheet: Option<&str>,
) -> Result<Vec<GridRow>, HarnessError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| HarnessError::FixtureRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let sheet_names = workbook.sheet_names();
    let sheet_name = match sheet {
        Some(wanted) => sheet_names
            .iter()
            .find(|name| name.as_str() == wanted)
            .cloned()
            .ok_or_else(|| HarnessError::SheetNotFound {
                path: path.to_path_buf(),
                sheet: wanted.to_string(),
                available: sheet_names.join(", "),
            })?,
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| HarnessError::MissingHeader {
                path: path.to_path_buf(),
            })?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| HarnessError::FixtureRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    // The range starts at the first used cell; leading empty columns still
    // take part in positional binding.
    let leading_columns = range.start().map(|(_, col)| col as usize).unwrap_or(0);

    let grid = range
        .rows()
        .map(|row| {
            std::iter::repeat_n(String::new(), leading_columns)
                .chain(row.iter().map(cell_to_string))
                .collect::<Vec<_>>()
        })
        // Rows with no content at all are not data rows.
        .filter(|cells| cells.iter().any(|cell| !cell.is_empty()))
        .map(GridRow::from)
        .collect();

    Ok(grid)
}

/// Renders a spreadsheet cell as fixture text.
/// 将电子表格单元格渲染为夹具文本。
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

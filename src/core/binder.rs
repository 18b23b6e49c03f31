//! # Case Binder Module / 用例绑定模块
//!
//! Turns untyped fixture rows into validated parameter tuples before any test
//! logic runs. Binding is positional: parameter *i* of a signature reads cell
//! *i* of the row.
//!
//! 在任何测试逻辑运行之前，将无类型的夹具行转换为经过验证的参数元组。
//! 绑定按位置进行：签名中的第 *i* 个参数读取该行的第 *i* 个单元格。

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::error::HarnessError;
use crate::core::fixture::RowRecord;

/// The type a parameter is coerced to.
/// 参数被转换成的类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamType {
    /// Passed through unchanged / 原样传递
    Text,
    /// Well-formed decimal integer / 格式正确的十进制整数
    Integer,
}

impl ParamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::Text => "text",
            ParamType::Integer => "integer",
        }
    }
}

/// One declared parameter of a test case.
/// 测试用例声明的一个参数。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    pub name: &'static str,
    pub ty: ParamType,
}

impl Param {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            ty: ParamType::Text,
        }
    }

    pub const fn integer(name: &'static str) -> Self {
        Self {
            name,
            ty: ParamType::Integer,
        }
    }
}

/// Ordered parameter list of a test case. An empty signature marks a case
/// that runs once without a fixture.
/// 测试用例的有序参数列表。空签名表示该用例不使用夹具，只运行一次。
pub type Signature = &'static [Param];

/// A bound parameter value.
/// 已绑定的参数值。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Text(String),
    Integer(i64),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(s) => write!(f, "{s:?}"),
            ParamValue::Integer(i) => write!(f, "{i}"),
        }
    }
}

/// Typed arguments for one test case invocation, in signature order.
/// 一次测试用例调用的类型化参数，按签名顺序排列。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParameterTuple {
    values: Vec<(String, ParamValue)>,
}

impl ParameterTuple {
    /// The tuple handed to cases with an empty signature.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Returns a text parameter by name.
    /// 按名称返回文本参数。
    pub fn text(&self, name: &str) -> Result<&str, HarnessError> {
        match self.lookup(name) {
            Some(ParamValue::Text(s)) => Ok(s),
            _ => Err(HarnessError::UnboundParameter {
                name: name.to_string(),
                expected: ParamType::Text.as_str(),
            }),
        }
    }

    /// Returns an integer parameter by name.
    /// 按名称返回整数参数。
    pub fn integer(&self, name: &str) -> Result<i64, HarnessError> {
        match self.lookup(name) {
            Some(ParamValue::Integer(i)) => Ok(*i),
            _ => Err(HarnessError::UnboundParameter {
                name: name.to_string(),
                expected: ParamType::Integer.as_str(),
            }),
        }
    }

    fn lookup(&self, name: &str) -> Option<&ParamValue> {
        self.values
            .iter()
            .find(|(declared, _)| declared == name)
            .map(|(_, value)| value)
    }
}

impl fmt::Display for ParameterTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, (name, value)) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        write!(f, ")")
    }
}

impl<const N: usize> From<[(&str, ParamValue); N]> for ParameterTuple {
    fn from(values: [(&str, ParamValue); N]) -> Self {
        Self {
            values: values
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        }
    }
}

/// Binds `row` against `signature`.
///
/// # Errors
/// * `SignatureMismatch` when the signature declares more parameters than the
///   row has columns. Nothing is padded.
/// * `TypeCoercion` when an `Integer` cell is not a well-formed decimal
///   integer (optional sign followed by ASCII digits, no whitespace).
///
/// 将 `row` 按 `signature` 绑定。签名参数多于列数时返回 `SignatureMismatch`（不做填充）；
/// `Integer` 单元格不是格式正确的十进制整数时返回 `TypeCoercion`。
pub fn bind(row: &RowRecord, signature: Signature) -> Result<ParameterTuple, HarnessError> {
    if signature.len() > row.len() {
        return Err(HarnessError::SignatureMismatch {
            row: row.index(),
            expected: signature.len(),
            actual: row.len(),
        });
    }

    let mut values = Vec::with_capacity(signature.len());
    for (column, param) in signature.iter().enumerate() {
        // Length was checked above.
        let raw = row.get(column).unwrap_or_default();
        let value = match param.ty {
            ParamType::Text => ParamValue::Text(raw.to_string()),
            ParamType::Integer => ParamValue::Integer(parse_integer(raw).ok_or_else(|| {
                HarnessError::TypeCoercion {
                    row: row.index(),
                    column,
                    name: param.name.to_string(),
                    raw: raw.to_string(),
                    expected: ParamType::Integer.as_str(),
                }
            })?),
        };
        values.push((param.name.to_string(), value));
    }

    Ok(ParameterTuple { values })
}

/// Optional sign followed by ASCII digits, nothing else.
fn parse_integer(raw: &str) -> Option<i64> {
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

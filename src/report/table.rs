//! Tabular data and GitHub-flavored Markdown table rendering
//!
//! Any dataframe-like value can be appended to a report by implementing
//! [`TabularData`]. The report snapshots the columns at append time and
//! renders them as a pipe table.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use super::types::{ReportError, Result};

// ============================================================
// Cell Values
// ============================================================

/// A single table cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Missing value, rendered as an empty cell
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Unsigned integer
    UInt(u64),
    /// Floating point
    Float(f64),
    /// Text
    Text(String),
}

impl CellValue {
    /// Check for a missing value
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Numeric view of the cell, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(v) => Some(*v as f64),
            CellValue::UInt(v) => Some(*v as f64),
            CellValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(v) => write!(f, "{}", v),
            CellValue::Int(v) => write!(f, "{}", v),
            CellValue::UInt(v) => write!(f, "{}", v),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Text(v) => f.write_str(v),
        }
    }
}

macro_rules! impl_from_int {
    ($variant:ident: $($ty:ty),*) => {
        $(impl From<$ty> for CellValue {
            fn from(value: $ty) -> Self {
                CellValue::$variant(value.into())
            }
        })*
    };
}

impl_from_int!(Int: i8, i16, i32, i64);
impl_from_int!(UInt: u8, u16, u32, u64);

impl From<f32> for CellValue {
    fn from(value: f32) -> Self {
        CellValue::Float(value.into())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Null, Into::into)
    }
}

// ============================================================
// Tabular Data
// ============================================================

/// Dataframe-like collaborator consumed by table blocks
pub trait TabularData {
    /// Ordered column names
    fn column_names(&self) -> Vec<String>;

    /// Values of one column, top to bottom
    fn column_values(&self, name: &str) -> Option<Vec<CellValue>>;

    /// Number of rows
    fn row_count(&self) -> usize;
}

/// Simple column-oriented table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTable {
    columns: Vec<(String, Vec<CellValue>)>,
}

impl DataTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column
    #[must_use]
    pub fn with_column<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        self.push_column(name, values);
        self
    }

    /// Append a column in place
    pub fn push_column<I, V>(&mut self, name: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        self.columns
            .push((name.into(), values.into_iter().map(Into::into).collect()));
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

impl TabularData for DataTable {
    fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|(name, _)| name.clone()).collect()
    }

    fn column_values(&self, name: &str) -> Option<Vec<CellValue>> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.clone())
    }

    fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |(_, values)| values.len())
    }
}

// ============================================================
// Options
// ============================================================

/// Column selector for formatters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnKey {
    /// By column name
    Name(String),
    /// By zero-based position
    Index(usize),
}

impl From<&str> for ColumnKey {
    fn from(name: &str) -> Self {
        ColumnKey::Name(name.to_string())
    }
}

impl From<String> for ColumnKey {
    fn from(name: String) -> Self {
        ColumnKey::Name(name)
    }
}

impl From<usize> for ColumnKey {
    fn from(index: usize) -> Self {
        ColumnKey::Index(index)
    }
}

/// Cell formatter
#[derive(Clone)]
pub enum CellFormat {
    /// `12.34%` from `12.34`
    Percent,
    /// `12.34%` from `0.1234`
    Percent100,
    /// Two decimals with thousands separators
    Round,
    /// Thousands separators on the value's own digits. Floats keep their fraction.
    RoundInt,
    /// Custom formatting function
    Custom(Arc<dyn Fn(&CellValue) -> String + Send + Sync>),
}

impl CellFormat {
    /// Wrap a closure as a formatter
    pub fn custom(f: impl Fn(&CellValue) -> String + Send + Sync + 'static) -> Self {
        CellFormat::Custom(Arc::new(f))
    }

    /// Look up a named preset (`percent`, `percent100`, `round`, `round_int`)
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "percent" => Some(CellFormat::Percent),
            "percent100" => Some(CellFormat::Percent100),
            "round" => Some(CellFormat::Round),
            "round_int" => Some(CellFormat::RoundInt),
            _ => None,
        }
    }

    fn apply(&self, value: &CellValue) -> String {
        // Integers are grouped from their exact digits, never through f64.
        let exact = match value {
            CellValue::Int(v) => Some(i128::from(*v)),
            CellValue::UInt(v) => Some(i128::from(*v)),
            _ => None,
        };
        if let Some(n) = exact {
            match self {
                CellFormat::Percent => return format!("{}.00%", group_digits(&n.to_string())),
                CellFormat::Percent100 => {
                    return format!("{}.00%", group_digits(&(n * 100).to_string()))
                }
                CellFormat::Round => return format!("{}.00", group_digits(&n.to_string())),
                CellFormat::RoundInt => return group_digits(&n.to_string()),
                CellFormat::Custom(_) => {}
            }
        }

        match (self, value.as_f64()) {
            (CellFormat::Custom(f), _) => f(value),
            (CellFormat::Percent, Some(x)) => format!("{}%", group_thousands(x, 2)),
            (CellFormat::Percent100, Some(x)) => format!("{}%", group_thousands(100.0 * x, 2)),
            (CellFormat::Round, Some(x)) => group_thousands(x, 2),
            (CellFormat::RoundInt, Some(x)) if x.is_finite() => group_digits(&x.to_string()),
            (_, _) => value.to_string(),
        }
    }
}

impl fmt::Debug for CellFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellFormat::Percent => f.write_str("Percent"),
            CellFormat::Percent100 => f.write_str("Percent100"),
            CellFormat::Round => f.write_str("Round"),
            CellFormat::RoundInt => f.write_str("RoundInt"),
            CellFormat::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Options for table rendering
#[derive(Debug, Clone)]
pub struct TableOptions {
    /// Left-align the first column, right-align the rest
    pub align_first_col_left: bool,

    /// Per-column formatters (name lookups win over index lookups)
    pub formatters: HashMap<ColumnKey, CellFormat>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            align_first_col_left: true,
            formatters: HashMap::new(),
        }
    }
}

impl TableOptions {
    /// Create a builder
    pub fn builder() -> TableOptionsBuilder {
        TableOptionsBuilder::default()
    }

    fn formatter_for(&self, name: &str, index: usize) -> Option<&CellFormat> {
        self.formatters
            .get(&ColumnKey::Name(name.to_string()))
            .or_else(|| self.formatters.get(&ColumnKey::Index(index)))
    }
}

/// Builder for TableOptions
#[derive(Debug, Default)]
pub struct TableOptionsBuilder {
    options: TableOptions,
}

impl TableOptionsBuilder {
    /// Set first-column alignment
    #[must_use]
    pub fn align_first_col_left(mut self, left: bool) -> Self {
        self.options.align_first_col_left = left;
        self
    }

    /// Add a formatter for a column
    #[must_use]
    pub fn formatter(mut self, column: impl Into<ColumnKey>, format: CellFormat) -> Self {
        self.options.formatters.insert(column.into(), format);
        self
    }

    /// Build the options
    #[must_use]
    pub fn build(self) -> TableOptions {
        self.options
    }
}

// ============================================================
// Table Block
// ============================================================

/// Snapshot of a table taken at append time
#[derive(Debug, Clone)]
pub struct TableBlock {
    /// Optional title rendered as a level-3 heading
    pub title: Option<String>,
    columns: Vec<String>,
    values: Vec<Option<Vec<CellValue>>>,
    row_count: usize,
    options: TableOptions,
}

impl TableBlock {
    /// Snapshot tabular data
    pub fn new(title: Option<String>, data: &dyn TabularData, options: TableOptions) -> Self {
        let columns = data.column_names();
        let values = columns.iter().map(|name| data.column_values(name)).collect();

        Self {
            title: title.filter(|t| !t.trim().is_empty()),
            columns,
            values,
            row_count: data.row_count(),
            options,
        }
    }

    /// Column names in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Render to markdown lines
    pub fn render(&self) -> Result<Vec<String>> {
        let columns = self.validated_columns()?;
        let mut lines = Vec::with_capacity(self.row_count + 4);

        if let Some(title) = &self.title {
            lines.push(format!("### {}", title.trim()));
            lines.push(String::new());
        }

        lines.push(table_row(self.columns.iter().map(|c| escape_cell(c))));
        lines.push(table_row((0..self.columns.len()).map(|i| {
            if i == 0 && self.options.align_first_col_left {
                ":--".to_string()
            } else {
                "--:".to_string()
            }
        })));

        for row in 0..self.row_count {
            let cells = self.columns.iter().zip(&columns).enumerate().map(
                |(index, (name, values))| {
                    let value = &values[row];
                    if value.is_null() {
                        return String::new();
                    }
                    let text = match self.options.formatter_for(name, index) {
                        Some(format) => format.apply(value),
                        None => default_display(value),
                    };
                    escape_cell(&text)
                },
            );
            lines.push(table_row(cells));
        }

        Ok(lines)
    }

    fn validated_columns(&self) -> Result<Vec<&Vec<CellValue>>> {
        let mut seen = HashSet::new();
        for name in &self.columns {
            if !seen.insert(name.as_str()) {
                return Err(ReportError::Render(format!(
                    "duplicate table column '{}'",
                    name
                )));
            }
        }

        self.columns
            .iter()
            .zip(&self.values)
            .map(|(name, values)| {
                let values = values.as_ref().ok_or_else(|| {
                    ReportError::Render(format!("table column '{}' has no values", name))
                })?;
                if values.len() != self.row_count {
                    return Err(ReportError::Render(format!(
                        "table column '{}' has {} values, expected {} rows",
                        name,
                        values.len(),
                        self.row_count
                    )));
                }
                Ok(values)
            })
            .collect()
    }
}

// ============================================================
// Helpers
// ============================================================

fn table_row(cells: impl Iterator<Item = String>) -> String {
    format!("| {} |", cells.collect::<Vec<_>>().join(" | "))
}

/// Escape text so it cannot break pipe-table syntax
pub fn escape_cell(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '|' => escaped.push_str("\\|"),
            '\r' => {}
            '\n' => escaped.push_str("<br>"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn default_display(value: &CellValue) -> String {
    match value {
        CellValue::Int(_) | CellValue::UInt(_) => CellFormat::RoundInt.apply(value),
        CellValue::Float(x) if x.is_finite() => CellFormat::Round.apply(value),
        _ => value.to_string(),
    }
}

/// Format a number with `,` thousands separators and fixed decimals
fn group_thousands(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let formatted = format!("{:.*}", decimals, value.abs());
    let negative = value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0');
    if negative {
        format!("-{}", group_digits(&formatted))
    } else {
        group_digits(&formatted)
    }
}

/// Insert `,` separators into the integer part of a plain decimal string
fn group_digits(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(number.len() + int_part.len() / 3);
    grouped.push_str(sign);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

// ============================================================
// Tests
// ============================================================

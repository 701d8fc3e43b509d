// ==========================================
// 大学成果分析看板 - 表格数据模型
// ==========================================
// 职责: 读取器产出、清洗器/校验器/映射器共享的内存表
// 约定: CellValue::Missing 是唯一的缺失值记号
// ==========================================

use chrono::NaiveDateTime;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// 单元格取值
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Missing,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl CellValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// 转为 Decimal（文本按数字解析，支持科学计数法）
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            CellValue::Int(v) => Some(Decimal::from(*v)),
            CellValue::Float(v) if v.is_finite() => Decimal::from_str(&v.to_string()).ok(),
            CellValue::Text(s) => {
                let s = s.trim();
                Decimal::from_str(s)
                    .or_else(|_| Decimal::from_scientific(s))
                    .ok()
            }
            _ => None,
        }
    }

    /// 转为整数（小数部分必须为 0）
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            CellValue::Int(v) => Some(*v),
            CellValue::Text(s) => match s.trim().parse::<i64>() {
                Ok(v) => Some(v),
                Err(_) => self.to_decimal().and_then(decimal_to_i64),
            },
            CellValue::Float(_) => self.to_decimal().and_then(decimal_to_i64),
            _ => None,
        }
    }
}

fn decimal_to_i64(d: Decimal) -> Option<i64> {
    if d.fract().is_zero() {
        d.to_i64()
    } else {
        None
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Missing => Ok(()),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Int(v) => write!(f, "{}", v),
            // 整数值的浮点单元格按整数显示（Excel 数字单元格均为浮点）
            CellValue::Float(v) if v.fract() == 0.0 && v.abs() < 1e15 => {
                write!(f, "{}", *v as i64)
            }
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Bool(v) => write!(f, "{}", v),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// 内存表：表头 + 行（每行已补齐到表头宽度）
///
/// 每行同时记录其在源文件中的行号（表头为第 1 行），被跳过的全空行不影响后续行号。
#[derive(Debug, Clone, PartialEq)]
pub struct DataTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
    row_numbers: Vec<usize>,
    last_row_number: usize,
}

impl Default for DataTable {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl DataTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            row_numbers: Vec::new(),
            last_row_number: 1,
        }
    }

    /// 追加紧接上一行的下一行（行号递推）
    pub fn push_row(&mut self, row: Vec<CellValue>) {
        let row_number = self.last_row_number + 1;
        self.push_row_at(row, row_number);
    }

    /// 按源文件行号追加一行（短行补齐；全空行跳过但占用行号）
    pub fn push_row_at(&mut self, mut row: Vec<CellValue>, row_number: usize) {
        self.last_row_number = row_number;
        row.resize(self.columns.len(), CellValue::Missing);
        if row.iter().all(CellValue::is_missing) {
            return;
        }
        self.rows.push(row);
        self.row_numbers.push(row_number);
    }

    /// 第 `index` 个数据行的源文件行号
    pub fn row_number(&self, index: usize) -> Option<usize> {
        self.row_numbers.get(index).copied()
    }

    /// 拆出 (行号, 行) 序列
    pub fn into_numbered_rows(self) -> impl Iterator<Item = (usize, Vec<CellValue>)> {
        self.row_numbers.into_iter().zip(self.rows)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 某列的非缺失值（列不存在时返回空）
    pub fn non_missing_values(&self, name: &str) -> Vec<&CellValue> {
        match self.column_index(name) {
            Some(idx) => self
                .rows
                .iter()
                .map(|row| &row[idx])
                .filter(|v| !v.is_missing())
                .collect(),
            None => Vec::new(),
        }
    }
}

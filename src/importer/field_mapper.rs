// ==========================================
// 大学成果分析看板 - 字段映射器
// ==========================================
// 职责: 模板列 → 领域字段的类型转换（按行）
// 约定: 报错行号取自源文件（表头为第 1 行，与电子表格行号一致）
// ==========================================

use crate::importer::error::{IngestError, IngestResult};
use crate::importer::table::{CellValue, DataTable};
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// 支持的日期文本格式（可带时间部分）
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%Y%m%d"];

static MISSING: CellValue = CellValue::Missing;

/// 单行读取器
pub struct RowReader<'a> {
    table: &'a DataTable,
    row: &'a [CellValue],
    row_number: usize,
}

impl<'a> RowReader<'a> {
    /// `index` 为数据行下标（从 0 开始）
    pub fn new(table: &'a DataTable, index: usize) -> Option<Self> {
        let row = table.rows.get(index)?;
        let row_number = table.row_number(index)?;
        Some(Self {
            table,
            row,
            row_number,
        })
    }

    /// 电子表格行号
    pub fn row_number(&self) -> usize {
        self.row_number
    }

    /// 取单元格（列不存在视为缺失）
    pub fn cell(&self, column: &str) -> &CellValue {
        self.table
            .column_index(column)
            .and_then(|idx| self.row.get(idx))
            .unwrap_or(&MISSING)
    }

    fn type_error(&self, column: &str, expected: &str, cell: &CellValue) -> IngestError {
        let detail = if cell.is_missing() {
            format!("Row {}: value is missing", self.row_number)
        } else {
            format!("Row {}: '{}'", self.row_number, cell)
        };
        IngestError::DataType {
            column: column.to_string(),
            expected: expected.to_string(),
            detail,
        }
    }

    // ==========================================
    // 文本
    // ==========================================

    pub fn optional_text(&self, column: &str) -> Option<String> {
        match self.cell(column) {
            CellValue::Missing => None,
            cell => Some(cell.to_string()),
        }
    }

    pub fn required_text(&self, column: &str) -> IngestResult<String> {
        self.optional_text(column)
            .ok_or_else(|| self.type_error(column, "str", &CellValue::Missing))
    }

    // ==========================================
    // 整数
    // ==========================================

    pub fn optional_i64(&self, column: &str) -> IngestResult<Option<i64>> {
        let cell = self.cell(column);
        if cell.is_missing() {
            return Ok(None);
        }
        cell.to_i64()
            .map(Some)
            .ok_or_else(|| self.type_error(column, "int", cell))
    }

    pub fn required_i64(&self, column: &str) -> IngestResult<i64> {
        self.optional_i64(column)?
            .ok_or_else(|| self.type_error(column, "int", &CellValue::Missing))
    }

    pub fn optional_i32(&self, column: &str) -> IngestResult<Option<i32>> {
        match self.optional_i64(column)? {
            None => Ok(None),
            Some(v) => i32::try_from(v)
                .map(Some)
                .map_err(|_| self.type_error(column, "int", self.cell(column))),
        }
    }

    pub fn required_i32(&self, column: &str) -> IngestResult<i32> {
        self.optional_i32(column)?
            .ok_or_else(|| self.type_error(column, "int", &CellValue::Missing))
    }

    // ==========================================
    // 小数
    // ==========================================

    pub fn optional_decimal(&self, column: &str) -> IngestResult<Option<Decimal>> {
        let cell = self.cell(column);
        if cell.is_missing() {
            return Ok(None);
        }
        cell.to_decimal()
            .map(|d| Some(d.normalize()))
            .ok_or_else(|| self.type_error(column, "decimal", cell))
    }

    pub fn required_decimal(&self, column: &str) -> IngestResult<Decimal> {
        self.optional_decimal(column)?
            .ok_or_else(|| self.type_error(column, "decimal", &CellValue::Missing))
    }

    // ==========================================
    // 日期
    // ==========================================

    pub fn required_date(&self, column: &str) -> IngestResult<NaiveDate> {
        let cell = self.cell(column);
        let parsed = match cell {
            CellValue::DateTime(dt) => Some(dt.date()),
            CellValue::Missing | CellValue::Bool(_) => None,
            other => parse_date_text(&other.to_string()),
        };
        parsed.ok_or_else(|| self.type_error(column, "date", cell))
    }

    // ==========================================
    // 枚举
    // ==========================================

    pub fn optional_enum<T>(
        &self,
        column: &str,
        parse: fn(&str) -> Option<T>,
    ) -> IngestResult<Option<T>> {
        match self.optional_text(column) {
            None => Ok(None),
            Some(text) => parse(&text)
                .map(Some)
                .ok_or_else(|| self.type_error(column, "str", self.cell(column))),
        }
    }

    pub fn required_enum<T>(&self, column: &str, parse: fn(&str) -> Option<T>) -> IngestResult<T> {
        self.optional_enum(column, parse)?
            .ok_or_else(|| self.type_error(column, "str", &CellValue::Missing))
    }
}

/// 解析日期文本（时间部分忽略）
pub fn parse_date_text(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.trim().split([' ', 'T']).next()?;
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

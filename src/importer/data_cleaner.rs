// ==========================================
// 大学成果分析看板 - 数据清洗器
// ==========================================
// 职责: TRIM / NULL 标准化
// 红线: 数值、布尔、日期单元格原样保留
// ==========================================

use crate::config::IngestConfig;
use crate::importer::table::{CellValue, DataTable};

pub struct DataCleaner {
    config: IngestConfig,
}

impl Default for DataCleaner {
    fn default() -> Self {
        Self::new(IngestConfig::default())
    }
}

impl DataCleaner {
    pub fn new(config: IngestConfig) -> Self {
        Self { config }
    }

    /// 清洗整张表
    ///
    /// - 文本单元格去首尾空白
    /// - 去空白后为空串或缺失记号 → Missing
    /// - 清洗后全空的行被丢弃
    pub fn clean(&self, table: DataTable) -> DataTable {
        let mut cleaned = DataTable::new(table.columns.clone());
        for (row_number, row) in table.into_numbered_rows() {
            cleaned.push_row_at(
                row.into_iter().map(|cell| self.clean_cell(cell)).collect(),
                row_number,
            );
        }
        cleaned
    }

    pub fn clean_cell(&self, cell: CellValue) -> CellValue {
        match cell {
            CellValue::Text(s) => self
                .normalize_null(Some(s))
                .map(CellValue::Text)
                .unwrap_or(CellValue::Missing),
            other => other,
        }
    }

    /// TRIM 后为空或为缺失记号时返回 None
    pub fn normalize_null(&self, value: Option<String>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() || self.config.is_missing_marker(trimmed) {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }
}

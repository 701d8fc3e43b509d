// ==========================================
// 大学成果分析看板 - 上传解析 Trait
// ==========================================
// 职责: 定义解析器对外接口与按记录类型的 schema 接口（不包含实现）
// ==========================================

use crate::domain::types::RecordType;
use crate::importer::error::IngestResult;
use crate::importer::field_mapper::RowReader;
use crate::importer::table::DataTable;
use rusqlite::Transaction;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ==========================================
// ParseOutcome - 解析结果
// ==========================================
// 成功: rows_processed 有值；失败: error_message 有值
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOutcome {
    pub success: bool,
    pub rows_processed: Option<usize>,
    pub error_message: Option<String>,
}

impl ParseOutcome {
    pub fn succeeded(rows_processed: usize) -> Self {
        Self {
            success: true,
            rows_processed: Some(rows_processed),
            error_message: None,
        }
    }

    pub fn failed(error_message: impl Into<String>) -> Self {
        Self {
            success: false,
            rows_processed: None,
            error_message: Some(error_message.into()),
        }
    }
}

// ==========================================
// UploadParser Trait
// ==========================================
// 用途: 上传解析主接口
// 实现者: IngestPipeline<S>
pub trait UploadParser {
    /// 解析器对应的记录类型
    fn record_type(&self) -> RecordType;

    /// 解析并落库
    ///
    /// # 参数
    /// - path: 上传文件路径（.csv/.xlsx/.xls）
    /// - user: 上传用户（仅写入审计记录）
    ///
    /// # 返回
    /// 结构化结果；任何失败都在此边界内转换为 `ParseOutcome::failed`，不向外抛出
    fn parse(&self, path: &Path, user: &str) -> ParseOutcome {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.parse_as(path, &file_name, user)
    }

    /// 同 `parse`，审计记录中的文件名使用 `file_name`（暂存文件场景）
    fn parse_as(&self, path: &Path, file_name: &str, user: &str) -> ParseOutcome;
}

// ==========================================
// RecordSchema Trait
// ==========================================
// 用途: 每种记录类型的 校验 / 行映射 / 落库 规则
// 实现者: DepartmentKpiSchema / PublicationSchema / ResearchBudgetSchema / StudentSchema
pub trait RecordSchema {
    type Record;

    const RECORD_TYPE: RecordType;

    /// 整表组合校验（全有或全无闸门）
    fn validate(&self, table: &DataTable) -> IngestResult<()>;

    /// 单行映射
    fn map_row(&self, row: &RowReader<'_>) -> IngestResult<Self::Record>;

    /// 在调用方事务内写入，返回 rows_processed
    fn persist(&self, tx: &Transaction<'_>, records: &[Self::Record]) -> IngestResult<usize>;
}

// ==========================================
// 大学成果分析看板 - 上传导入错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 错误消息即返回给上传页面的 error_message，保持英文原文
// ==========================================

use crate::repository::error::RepositoryError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 上传导入错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IngestError {
    // ===== 文件相关错误 =====
    #[error("Invalid file format '{extension}'. Allowed formats: {allowed}")]
    UnsupportedFormat { extension: String, allowed: String },

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Error reading file: {0}")]
    FileFormat(String),

    #[error("File size ({size_mb:.1}MB) exceeds maximum allowed size ({limit_mb}MB)")]
    FileSize { size_mb: f64, limit_mb: u64 },

    // ===== 结构/数据校验错误 =====
    #[error("Missing required columns: {}", .columns.join(", "))]
    MissingColumn { columns: Vec<String> },

    #[error("Column '{column}' has invalid data type. Expected {expected}.{}", detail_suffix(.detail))]
    DataType {
        column: String,
        expected: String,
        detail: String,
    },

    #[error("Column '{column}' {detail}")]
    ValueRange { column: String, detail: String },

    // ===== 落库错误 =====
    #[error("Duplicate data: {0}")]
    DuplicateData(String),

    #[error("Database error: {0}")]
    Database(String),
}

fn detail_suffix(detail: &str) -> String {
    if detail.is_empty() {
        String::new()
    } else {
        format!(" {}", detail)
    }
}

/// 错误分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    FileFormat,
    FileSize,
    MissingColumn,
    DataType,
    ValueRange,
    DuplicateData,
    Database,
}

impl ErrorKind {
    /// 是否属于“校验/导入失败”大类（数据库故障除外）
    pub fn is_validation(&self) -> bool {
        !matches!(self, ErrorKind::Database)
    }
}

impl IngestError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            IngestError::UnsupportedFormat { .. }
            | IngestError::FileNotFound(_)
            | IngestError::FileFormat(_) => ErrorKind::FileFormat,
            IngestError::FileSize { .. } => ErrorKind::FileSize,
            IngestError::MissingColumn { .. } => ErrorKind::MissingColumn,
            IngestError::DataType { .. } => ErrorKind::DataType,
            IngestError::ValueRange { .. } => ErrorKind::ValueRange,
            IngestError::DuplicateData(_) => ErrorKind::DuplicateData,
            IngestError::Database(_) => ErrorKind::Database,
        }
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        IngestError::FileFormat(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        IngestError::FileFormat(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for IngestError {
    fn from(err: calamine::Error) -> Self {
        IngestError::FileFormat(err.to_string())
    }
}

// 实现 From<RepositoryError>（唯一约束冲突 → DuplicateData）
impl From<RepositoryError> for IngestError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UniqueConstraintViolation(msg) => IngestError::DuplicateData(msg),
            other => IngestError::Database(other.to_string()),
        }
    }
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for IngestError {
    fn from(err: rusqlite::Error) -> Self {
        RepositoryError::from(err).into()
    }
}

/// Result 类型别名
pub type IngestResult<T> = Result<T, IngestError>;

// ==========================================
// 大学成果分析看板 - 上传审计领域模型
// ==========================================
// 红线: 每次解析尝试恰好写入一条，写入后不可修改（append-only）
// 对齐: upload_history 表
// ==========================================

use crate::domain::types::{RecordType, UploadStatus};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// UploadHistory - 上传审计记录（已落库）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadHistory {
    pub id: i64,
    pub user: String,                  // 上传用户（仅用于打标，不做权限判断）
    pub file_name: String,             // 原始文件名
    pub file_size: i64,                // 字节
    pub data_type: RecordType,         // 解析器对应的记录类型
    pub upload_date: NaiveDateTime,    // UTC
    pub status: UploadStatus,
    pub rows_processed: Option<i64>,   // 仅成功时有值
    pub error_message: Option<String>, // 仅失败时有值
    pub trace_id: String,              // 与日志 span 对应
}

// ==========================================
// NewUploadHistory - 待写入的审计记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUploadHistory {
    pub user: String,
    pub file_name: String,
    pub file_size: i64,
    pub data_type: RecordType,
    pub upload_date: NaiveDateTime,
    pub status: UploadStatus,
    pub rows_processed: Option<i64>,
    pub error_message: Option<String>,
    pub trace_id: String,
}

impl NewUploadHistory {
    /// 成功记录
    pub fn success(
        user: &str,
        file_name: &str,
        file_size: u64,
        data_type: RecordType,
        rows_processed: usize,
        trace_id: &str,
    ) -> Self {
        Self {
            user: user.to_string(),
            file_name: file_name.to_string(),
            file_size: file_size as i64,
            data_type,
            upload_date: chrono::Utc::now().naive_utc(),
            status: UploadStatus::Success,
            rows_processed: Some(rows_processed as i64),
            error_message: None,
            trace_id: trace_id.to_string(),
        }
    }

    /// 失败记录
    pub fn failed(
        user: &str,
        file_name: &str,
        file_size: u64,
        data_type: RecordType,
        error_message: &str,
        trace_id: &str,
    ) -> Self {
        Self {
            user: user.to_string(),
            file_name: file_name.to_string(),
            file_size: file_size as i64,
            data_type,
            upload_date: chrono::Utc::now().naive_utc(),
            status: UploadStatus::Failed,
            rows_processed: None,
            error_message: Some(error_message.to_string()),
            trace_id: trace_id.to_string(),
        }
    }
}

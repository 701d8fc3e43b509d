// ==========================================
// 大学成果分析看板 - 上传审计数据仓储
// ==========================================
// 对齐: upload_history 表
// 红线: 只追加，不提供 update/delete
// ==========================================

mod queries;

#[cfg(test)]
mod tests;

use crate::domain::upload_history::NewUploadHistory;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex, MutexGuard};

pub(crate) const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ==========================================
// UploadHistoryRepository - 上传审计仓储
// ==========================================
// 红线: Repository 不做业务逻辑,只做数据映射
pub struct UploadHistoryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl UploadHistoryRepository {
    /// 创建新的上传审计仓储
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    pub(super) fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 追加一条上传审计记录
    ///
    /// # 返回
    /// - `Ok(id)`: 新记录的自增 ID
    /// - `Err(...)`: 数据库错误
    pub fn insert(&self, entry: &NewUploadHistory) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO upload_history (
                user_ref, file_name, file_size, data_type, upload_date,
                status, rows_processed, error_message, trace_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                entry.user,
                entry.file_name,
                entry.file_size,
                entry.data_type.to_db_str(),
                entry.upload_date.format(TS_FORMAT).to_string(),
                entry.status.to_db_str(),
                entry.rows_processed,
                entry.error_message,
                entry.trace_id,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }
}

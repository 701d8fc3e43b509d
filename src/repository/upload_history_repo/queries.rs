use super::{UploadHistoryRepository, TS_FORMAT};
use crate::domain::types::{RecordType, UploadStatus};
use crate::domain::upload_history::UploadHistory;
use crate::repository::error::RepositoryResult;
use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension, Result as SqliteResult, Row};

const SELECT_COLUMNS: &str = r#"
    SELECT id, user_ref, file_name, file_size, data_type, upload_date,
           status, rows_processed, error_message, trace_id
    FROM upload_history
"#;

impl UploadHistoryRepository {
    // ==========================================
    // 查询操作
    // ==========================================

    /// 按 ID 查询
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<UploadHistory>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);

        let entry = conn
            .query_row(&sql, params![id], |row| self.map_row(row))
            .optional()?;

        Ok(entry)
    }

    /// 最近的上传记录（按上传时间倒序）
    pub fn list_recent(&self, limit: usize) -> RepositoryResult<Vec<UploadHistory>> {
        let conn = self.get_conn()?;
        let sql = format!("{} ORDER BY upload_date DESC, id DESC LIMIT ?1", SELECT_COLUMNS);

        let mut stmt = conn.prepare(&sql)?;
        let entries = stmt
            .query_map(params![limit as i64], |row| self.map_row(row))?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(entries)
    }

    /// 指定用户的上传记录
    pub fn list_by_user(&self, user: &str) -> RepositoryResult<Vec<UploadHistory>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} WHERE user_ref = ?1 ORDER BY upload_date DESC, id DESC",
            SELECT_COLUMNS
        );

        let mut stmt = conn.prepare(&sql)?;
        let entries = stmt
            .query_map(params![user], |row| self.map_row(row))?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(entries)
    }

    /// 按状态计数
    pub fn count_by_status(&self, status: UploadStatus) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM upload_history WHERE status = ?1",
            params![status.to_db_str()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 映射数据库行到 UploadHistory
    fn map_row(&self, row: &Row) -> SqliteResult<UploadHistory> {
        let data_type_raw: String = row.get(4)?;
        let upload_date_raw: String = row.get(5)?;
        let status_raw: String = row.get(6)?;

        let data_type = RecordType::from_db_str(&data_type_raw).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                4,
                rusqlite::types::Type::Text,
                format!("unknown data_type: {}", data_type_raw).into(),
            )
        })?;
        let status = UploadStatus::from_db_str(&status_raw).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                6,
                rusqlite::types::Type::Text,
                format!("unknown status: {}", status_raw).into(),
            )
        })?;
        let upload_date = NaiveDateTime::parse_from_str(&upload_date_raw, TS_FORMAT)
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    5,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?;

        Ok(UploadHistory {
            id: row.get(0)?,
            user: row.get(1)?,
            file_name: row.get(2)?,
            file_size: row.get(3)?,
            data_type,
            upload_date,
            status,
            rows_processed: row.get(7)?,
            error_message: row.get(8)?,
            trace_id: row.get(9)?,
        })
    }
}

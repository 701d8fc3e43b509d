// ==========================================
// 上传API
// ==========================================
// 职责: 暂存上传内容 → 识别文件类型 → 分派解析器 → 返回结构化结果
// 说明: 不做权限判断，user 只用于审计打标
// ==========================================

use crate::api::error::ApiResult;
use crate::config::{ConfigManager, IngestConfig};
use crate::domain::types::{RecordType, UploadStatus};
use crate::domain::upload_history::UploadHistory;
use crate::importer::{identify_file_type_with, parser_for, ParseOutcome, StagedUpload};
use crate::repository::UploadHistoryRepository;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::{info, instrument, warn};

/// 无法识别文件类型时返回给上传页面的提示
pub const UNIDENTIFIED_MESSAGE: &str = "파일의 종류를 인식할 수 없습니다. 파일 헤더를 확인해주세요.";

/// 上传API响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UploadResponse {
    /// 表头不匹配任何记录类型（未写入审计记录）
    Unidentified { message: String },
    /// 已交给对应解析器处理
    Processed {
        record_type: RecordType,
        outcome: ParseOutcome,
    },
}

impl UploadResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadResponse::Processed { outcome, .. } if outcome.success)
    }
}

/// 上传审计汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadSummary {
    pub success_count: i64,
    pub failed_count: i64,
    pub recent: Vec<UploadHistory>,
}

// ==========================================
// UploadApi
// ==========================================
pub struct UploadApi {
    conn: Arc<Mutex<Connection>>,
    config: IngestConfig,
    history: UploadHistoryRepository,
}

impl UploadApi {
    pub fn new(conn: Arc<Mutex<Connection>>, config: IngestConfig) -> Self {
        Self {
            history: UploadHistoryRepository::new(conn.clone()),
            conn,
            config,
        }
    }

    /// 使用 config_kv 中的上传配置创建
    pub fn from_stored_config(conn: Arc<Mutex<Connection>>) -> ApiResult<Self> {
        let config = ConfigManager::from_connection(conn.clone()).load_ingest_config()?;
        Ok(Self::new(conn, config))
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// 处理一次上传
    ///
    /// # 参数
    /// - file_name: 原始文件名（写入审计记录，扩展名决定读取方式）
    /// - bytes: 文件内容
    /// - user: 上传用户
    ///
    /// # 返回
    /// - Ok(UploadResponse): 识别失败或解析结果（解析失败也在其中）
    /// - Err: 暂存失败
    #[instrument(skip(self, bytes, user), fields(size = bytes.len()))]
    pub fn upload(&self, file_name: &str, bytes: &[u8], user: &str) -> ApiResult<UploadResponse> {
        let staged = StagedUpload::stage(file_name, bytes)?;

        let Some(record_type) = identify_file_type_with(staged.path(), &self.config) else {
            warn!("文件类型未识别");
            return Ok(UploadResponse::Unidentified {
                message: UNIDENTIFIED_MESSAGE.to_string(),
            });
        };
        info!(record_type = %record_type, "文件类型识别完成");

        let parser = parser_for(record_type, self.conn.clone(), self.config.clone());
        let outcome = parser.parse_as(staged.path(), staged.original_name(), user);

        Ok(UploadResponse::Processed {
            record_type,
            outcome,
        })
    }

    /// 最近上传记录
    pub fn recent_history(&self, limit: usize) -> ApiResult<Vec<UploadHistory>> {
        Ok(self.history.list_recent(limit)?)
    }

    /// 指定用户的上传记录
    pub fn history_for_user(&self, user: &str) -> ApiResult<Vec<UploadHistory>> {
        Ok(self.history.list_by_user(user)?)
    }

    /// 上传审计汇总（成功/失败计数 + 最近记录）
    pub fn summary(&self, limit: usize) -> ApiResult<UploadSummary> {
        Ok(UploadSummary {
            success_count: self.history.count_by_status(UploadStatus::Success)?,
            failed_count: self.history.count_by_status(UploadStatus::Failed)?,
            recent: self.history.list_recent(limit)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_api() -> UploadApi {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        crate::db::init_schema(&conn).unwrap();
        UploadApi::from_stored_config(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_unidentified_upload_writes_no_history() {
        let api = setup_api();
        let response = api.upload("misc.csv", b"foo,bar,baz\n1,2,3\n", "admin").unwrap();

        assert_eq!(
            response,
            UploadResponse::Unidentified {
                message: UNIDENTIFIED_MESSAGE.to_string()
            }
        );
        assert!(api.recent_history(10).unwrap().is_empty());
    }

    #[test]
    fn test_student_upload_round_trip() {
        let api = setup_api();
        let csv = "학번,이름,단과대학,학과,학년,과정구분,학적상태,성별,입학년도\n\
                   2023001,홍길동,공과대학,컴퓨터공학과,1,학사,재학,남,2023\n";
        let response = api.upload("students.csv", csv.as_bytes(), "admin").unwrap();

        assert!(response.is_success());
        let history = api.history_for_user("admin").unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].file_name, "students.csv");
        assert_eq!(history[0].data_type, RecordType::Student);

        let summary = api.summary(5).unwrap();
        assert_eq!(summary.success_count, 1);
        assert_eq!(summary.failed_count, 0);
    }
}

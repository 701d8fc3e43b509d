// ==========================================
// 大学成果分析看板 - 上传解析管道
// ==========================================
// 流程:
// 1. 扩展名 / 大小门禁
// 2. 读取 + 清洗
// 3. 整表组合校验（全有或全无闸门）
// 4. 逐行映射
// 5. 单事务落库（任一行失败则整体回滚）
// 6. 事务外写入一条审计记录（写入失败只记日志）
// 7. 返回结构化结果
// ==========================================

use crate::config::IngestConfig;
use crate::domain::types::RecordType;
use crate::domain::upload_history::NewUploadHistory;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ErrorKind, IngestError, IngestResult};
use crate::importer::field_mapper::RowReader;
use crate::importer::file_reader::FileReader;
use crate::importer::parser_trait::{ParseOutcome, RecordSchema, UploadParser};
use crate::repository::UploadHistoryRepository;
use rusqlite::Connection;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, instrument, warn, Span};
use uuid::Uuid;

// ==========================================
// IngestPipeline - 通用解析管道
// ==========================================
pub struct IngestPipeline<S: RecordSchema> {
    schema: S,
    conn: Arc<Mutex<Connection>>,
    reader: FileReader,
    cleaner: DataCleaner,
    history: UploadHistoryRepository,
}

impl<S: RecordSchema + Default> IngestPipeline<S> {
    /// 创建解析器
    ///
    /// # 参数
    /// - conn: 共享数据库连接（数据与审计记录写入同一库）
    /// - config: 上传配置（大小上限、扩展名、缺失值记号）
    pub fn new(conn: Arc<Mutex<Connection>>, config: IngestConfig) -> Self {
        Self::with_schema(S::default(), conn, config)
    }
}

impl<S: RecordSchema> IngestPipeline<S> {
    pub fn with_schema(schema: S, conn: Arc<Mutex<Connection>>, config: IngestConfig) -> Self {
        Self {
            schema,
            history: UploadHistoryRepository::new(conn.clone()),
            conn,
            reader: FileReader::new(config.clone()),
            cleaner: DataCleaner::new(config),
        }
    }

    /// 步骤 1-5，返回落库行数
    fn run(&self, path: &Path) -> IngestResult<usize> {
        debug!("步骤 1: 扩展名与大小校验");
        self.reader.validate_extension(path)?;
        let size = FileReader::file_size(path)?;
        self.reader.validate_size(size)?;

        debug!("步骤 2: 读取与清洗");
        let table = self.cleaner.clean(self.reader.read(path)?);
        info!(rows = table.row_count(), "文件读取完成");

        debug!("步骤 3: 整表校验");
        self.schema.validate(&table)?;

        debug!("步骤 4: 行映射");
        let mut records = Vec::with_capacity(table.row_count());
        for idx in 0..table.row_count() {
            if let Some(row) = RowReader::new(&table, idx) {
                records.push(self.schema.map_row(&row)?);
            }
        }

        debug!(count = records.len(), "步骤 5: 事务落库");
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| IngestError::Database(format!("数据库锁获取失败: {}", e)))?;
        let tx = conn.transaction()?;
        // 任一行失败时 tx 在作用域结束时回滚
        let rows_processed = self.schema.persist(&tx, &records)?;
        tx.commit()?;

        Ok(rows_processed)
    }

    /// 步骤 6: 写入审计记录（失败只记日志，不影响返回）
    fn record_history(&self, entry: NewUploadHistory) {
        match self.history.insert(&entry) {
            Ok(id) => debug!(history_id = id, "审计记录写入完成"),
            Err(e) => warn!(error = %e, "审计记录写入失败，已忽略"),
        }
    }
}

impl<S: RecordSchema> UploadParser for IngestPipeline<S> {
    fn record_type(&self) -> RecordType {
        S::RECORD_TYPE
    }

    #[instrument(
        skip(self, path, user),
        fields(record_type = %S::RECORD_TYPE, file_name = %file_name, trace_id)
    )]
    fn parse_as(&self, path: &Path, file_name: &str, user: &str) -> ParseOutcome {
        let trace_id = Uuid::new_v4().to_string();
        Span::current().record("trace_id", trace_id.as_str());
        info!(user = %user, "开始解析上传文件");

        match self.run(path) {
            Ok(rows_processed) => {
                let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
                self.record_history(NewUploadHistory::success(
                    user,
                    file_name,
                    size,
                    S::RECORD_TYPE,
                    rows_processed,
                    &trace_id,
                ));
                info!(rows_processed, "上传解析成功");
                ParseOutcome::succeeded(rows_processed)
            }
            Err(e) => {
                let message = e.to_string();
                if e.kind() == ErrorKind::Database {
                    error!(error = %message, "上传落库失败");
                } else {
                    warn!(kind = ?e.kind(), error = %message, "上传校验失败");
                }
                let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
                self.record_history(NewUploadHistory::failed(
                    user,
                    file_name,
                    size,
                    S::RECORD_TYPE,
                    &message,
                    &trace_id,
                ));
                ParseOutcome::failed(message)
            }
        }
    }
}

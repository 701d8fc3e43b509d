// ==========================================
// 大学成果分析看板 - 配置管理器
// ==========================================
// 职责: 上传配置加载、查询、覆写
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::ingest_config::{IngestConfig, MAX_FILE_SIZE_BYTES};
use crate::db::open_sqlite_connection;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    pub fn get_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    /// 写入 global scope 配置（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> RepositoryResult<String> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 获取所有 global 配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> RepositoryResult<String> {
        let conn = self.get_conn()?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        serde_json::to_string(&json!(config_map))
            .map_err(|e| RepositoryError::InternalError(e.to_string()))
    }

    // ===== 上传配置 =====

    /// 读取上传配置，缺省/格式错误时回退默认值
    pub fn load_ingest_config(&self) -> RepositoryResult<IngestConfig> {
        let defaults = IngestConfig::default();

        let max_mb_raw = self.get_config_or_default(
            config_keys::MAX_FILE_SIZE_MB,
            &(MAX_FILE_SIZE_BYTES / (1024 * 1024)).to_string(),
        )?;
        let max_file_size_bytes = match max_mb_raw.trim().parse::<u64>() {
            Ok(mb) if mb > 0 => mb * 1024 * 1024,
            _ => {
                tracing::warn!(
                    config_key = config_keys::MAX_FILE_SIZE_MB,
                    raw_value = %max_mb_raw,
                    "文件大小上限配置格式错误，使用默认值"
                );
                defaults.max_file_size_bytes
            }
        };

        let allowed_extensions = match self.get_config_value(config_keys::ALLOWED_EXTENSIONS)? {
            Some(raw) => {
                let exts: Vec<String> = raw
                    .split(',')
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty())
                    .map(|s| if s.starts_with('.') { s } else { format!(".{}", s) })
                    .collect();
                if exts.is_empty() {
                    defaults.allowed_extensions.clone()
                } else {
                    exts
                }
            }
            None => defaults.allowed_extensions.clone(),
        };

        let missing_markers = match self.get_config_value(config_keys::MISSING_MARKERS)? {
            Some(raw) => serde_json::from_str::<Vec<String>>(&raw).unwrap_or_else(|_| {
                tracing::warn!(
                    config_key = config_keys::MISSING_MARKERS,
                    raw_value = %raw,
                    "缺失值记号配置格式错误，使用默认值"
                );
                defaults.missing_markers.clone()
            }),
            None => defaults.missing_markers.clone(),
        };

        Ok(IngestConfig {
            max_file_size_bytes,
            allowed_extensions,
            missing_markers,
        })
    }
}

/// 默认数据库路径
///
/// 优先级: UNIV_DASHBOARD_DB_PATH → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var("UNIV_DASHBOARD_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./univ_dashboard.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("univ-dashboard");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("univ_dashboard.db");
        }
    }

    path.to_string_lossy().to_string()
}

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    // 文件大小上限（MiB）
    pub const MAX_FILE_SIZE_MB: &str = "ingest.max_file_size_mb";

    // 允许扩展名（逗号分隔）
    pub const ALLOWED_EXTENSIONS: &str = "ingest.allowed_extensions";

    // 缺失值记号（JSON 数组）
    pub const MISSING_MARKERS: &str = "ingest.missing_markers";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{configure_sqlite_connection, init_schema};

    fn setup_manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn test_load_ingest_config_defaults() {
        let manager = setup_manager();
        let config = manager.load_ingest_config().unwrap();
        assert_eq!(config, IngestConfig::default());
    }

    #[test]
    fn test_load_ingest_config_overrides() {
        let manager = setup_manager();
        manager
            .set_config_value(config_keys::MAX_FILE_SIZE_MB, "10")
            .unwrap();
        manager
            .set_config_value(config_keys::ALLOWED_EXTENSIONS, "CSV, xlsx")
            .unwrap();
        manager
            .set_config_value(config_keys::MISSING_MARKERS, r#"["", "-"]"#)
            .unwrap();

        let config = manager.load_ingest_config().unwrap();
        assert_eq!(config.max_file_size_bytes, 10 * 1024 * 1024);
        assert_eq!(config.allowed_extensions, vec![".csv", ".xlsx"]);
        assert_eq!(config.missing_markers, vec!["", "-"]);
    }

    #[test]
    fn test_invalid_size_falls_back() {
        let manager = setup_manager();
        manager
            .set_config_value(config_keys::MAX_FILE_SIZE_MB, "abc")
            .unwrap();
        let config = manager.load_ingest_config().unwrap();
        assert_eq!(config.max_file_size_bytes, MAX_FILE_SIZE_BYTES);
    }

    #[test]
    fn test_config_snapshot() {
        let manager = setup_manager();
        manager
            .set_config_value(config_keys::MAX_FILE_SIZE_MB, "20")
            .unwrap();
        let snapshot = manager.get_config_snapshot().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&snapshot).unwrap();
        assert_eq!(parsed["ingest.max_file_size_mb"], "20");
    }
}

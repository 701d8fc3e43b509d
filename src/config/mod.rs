// ==========================================
// 大学成果分析看板 - 配置层
// ==========================================
// 职责: 上传配置管理（大小上限/扩展名/缺失值记号）
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod ingest_config;

// 重导出核心配置管理器
pub use config_manager::{config_keys, get_default_db_path, ConfigManager};
pub use ingest_config::{IngestConfig, ALLOWED_EXTENSIONS, MAX_FILE_SIZE_BYTES};

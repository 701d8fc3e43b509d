// ==========================================
// 大学成果分析看板 - 数据上传核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 批量上传 → 校验 → 事务落库 → 上传审计
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 文件读取/识别/校验/解析
pub mod importer;

// 配置层 - 上传配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 上传入口（暂存 + 识别 + 分派）
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::types::{RecordType, UploadStatus};
pub use domain::{
    DepartmentKpi, ExecutionRecord, Publication, ResearchProject, Student, UploadHistory,
};
pub use importer::{
    identify_file_type, parser_for, IngestError, IngestResult, ParseOutcome, UploadParser,
};
pub use api::{UploadApi, UploadResponse};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "대학 성과 분석 대시보드";

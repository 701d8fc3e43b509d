// ==========================================
// 大学成果分析看板 - API 层
// ==========================================
// 职责: 提供上传业务 API 接口,供外部 Web 层 / CLI 调用
// ==========================================

pub mod error;
pub mod upload_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use upload_api::{UploadApi, UploadResponse, UploadSummary, UNIDENTIFIED_MESSAGE};

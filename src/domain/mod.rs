// ==========================================
// 大学成果分析看板 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含解析逻辑
// ==========================================

pub mod records;
pub mod types;
pub mod upload_history;

// 重导出核心类型
pub use records::{
    BudgetLine, DepartmentKpi, ExecutionRecord, Publication, ResearchProject, Student,
};
pub use types::{
    EnrollmentStatus, ExecutionStatus, Gender, JournalGrade, ProgramType, ProjectLinked,
    RecordType, UploadStatus,
};
pub use upload_history::{NewUploadHistory, UploadHistory};

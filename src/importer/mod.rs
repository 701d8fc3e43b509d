// ==========================================
// 大学成果分析看板 - 上传导入层
// ==========================================
// 职责: 上传文件 → 校验 → 映射 → 单事务落库 → 审计记录
// 支持: Excel (.xlsx/.xls), CSV
// ==========================================

// 模块声明
pub mod columns;
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_identifier;
pub mod file_reader;
pub mod parser_trait;
pub mod parsers;
pub mod pipeline;
pub mod staging;
pub mod table;
pub mod validators;

// 重导出核心类型
pub use data_cleaner::DataCleaner;
pub use error::{ErrorKind, IngestError, IngestResult};
pub use field_mapper::RowReader;
pub use file_identifier::{
    identify_file_type, identify_file_type_with, identify_headers, score_headers,
    FILE_TYPE_SIGNATURES, MATCH_THRESHOLD,
};
pub use file_reader::FileReader;
pub use parsers::{
    parser_for, DepartmentKpiParser, PublicationParser, ResearchBudgetParser, StudentParser,
};
pub use pipeline::IngestPipeline;
pub use staging::StagedUpload;
pub use table::{CellValue, DataTable};

// 重导出 Trait 接口
pub use parser_trait::{ParseOutcome, RecordSchema, UploadParser};

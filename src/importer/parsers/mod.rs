// ==========================================
// 大学成果分析看板 - 按记录类型的解析器
// ==========================================
// 每种记录类型 = 通用管道 IngestPipeline + 各自的 RecordSchema
// ==========================================

pub mod department_kpi;
pub mod publication;
pub mod research_budget;
pub mod student;

use crate::config::IngestConfig;
use crate::domain::types::RecordType;
use crate::importer::parser_trait::UploadParser;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

pub use department_kpi::{DepartmentKpiParser, DepartmentKpiSchema};
pub use publication::{PublicationParser, PublicationSchema};
pub use research_budget::{ResearchBudgetParser, ResearchBudgetSchema};
pub use student::{StudentParser, StudentSchema};

/// 按记录类型创建解析器
pub fn parser_for(
    record_type: RecordType,
    conn: Arc<Mutex<Connection>>,
    config: IngestConfig,
) -> Box<dyn UploadParser> {
    match record_type {
        RecordType::DepartmentKpi => Box::new(DepartmentKpiParser::new(conn, config)),
        RecordType::Publication => Box::new(PublicationParser::new(conn, config)),
        RecordType::ResearchBudget => Box::new(ResearchBudgetParser::new(conn, config)),
        RecordType::Student => Box::new(StudentParser::new(conn, config)),
    }
}

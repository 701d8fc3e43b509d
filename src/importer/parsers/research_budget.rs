// ==========================================
// 연구비 집행 내역 解析
// ==========================================
// 每行 = 项目（按 과제번호 get-or-create）+ 一条执行记录
// rows_processed = 执行记录条数（不是项目数）
// ==========================================

use crate::domain::records::{BudgetLine, ExecutionRecord, ResearchProject};
use crate::domain::types::{ExecutionStatus, RecordType};
use crate::importer::columns::research_budget as col;
use crate::importer::error::IngestResult;
use crate::importer::field_mapper::RowReader;
use crate::importer::parser_trait::RecordSchema;
use crate::importer::pipeline::IngestPipeline;
use crate::importer::table::DataTable;
use crate::importer::validators::validate_research_budget_data;
use crate::repository::RecordRepository;
use rusqlite::Transaction;
use tracing::debug;

#[derive(Debug, Default, Clone, Copy)]
pub struct ResearchBudgetSchema;

pub type ResearchBudgetParser = IngestPipeline<ResearchBudgetSchema>;

impl RecordSchema for ResearchBudgetSchema {
    type Record = BudgetLine;

    const RECORD_TYPE: RecordType = RecordType::ResearchBudget;

    fn validate(&self, table: &DataTable) -> IngestResult<()> {
        validate_research_budget_data(table)
    }

    fn map_row(&self, row: &RowReader<'_>) -> IngestResult<BudgetLine> {
        let project_number = row.required_text(col::PROJECT_NUMBER)?;

        let project = ResearchProject {
            project_number: project_number.clone(),
            project_name: row.required_text(col::PROJECT_NAME)?,
            principal_investigator: row.required_text(col::PRINCIPAL_INVESTIGATOR)?,
            department: row.required_text(col::DEPARTMENT)?,
            funding_agency: row.required_text(col::FUNDING_AGENCY)?,
            total_budget: row.required_i64(col::TOTAL_BUDGET)?,
        };

        let execution = ExecutionRecord {
            execution_id: row.required_text(col::EXECUTION_ID)?,
            project_number,
            execution_date: row.required_date(col::EXECUTION_DATE)?,
            expense_category: row.required_text(col::EXPENSE_CATEGORY)?,
            amount: row.required_i64(col::AMOUNT)?,
            status: row.required_enum(col::STATUS, ExecutionStatus::from_db_str)?,
            description: row.optional_text(col::DESCRIPTION),
        };

        Ok(BudgetLine { project, execution })
    }

    fn persist(&self, tx: &Transaction<'_>, records: &[BudgetLine]) -> IngestResult<usize> {
        let mut count = 0;
        for line in records {
            let project_id = RecordRepository::get_or_create_project_tx(tx, &line.project)?;
            RecordRepository::insert_execution_record_tx(tx, project_id, &line.execution)?;
            count += 1;
        }
        debug!(executions = count, "执行记录写入完成");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::table::CellValue;
    use rusqlite::Connection;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn budget_row(execution_id: &str, project_number: &str) -> Vec<CellValue> {
        vec![
            text(execution_id),
            text(project_number),
            text("차세대 AI 반도체"),
            text("박교수"),
            text("전자공학과"),
            text("한국연구재단"),
            text("500000000"),
            text("2023-04-01"),
            text("연구장비비"),
            text("25000000"),
            text("집행완료"),
            CellValue::Missing,
        ]
    }

    #[test]
    fn test_persist_shares_project_within_file() {
        let mut table = DataTable::new(col::REQUIRED.iter().map(|c| c.to_string()).collect());
        table.push_row(budget_row("EX-001", "NRF-2023-015"));
        table.push_row(budget_row("EX-002", "NRF-2023-015"));

        let lines: Vec<BudgetLine> = (0..table.row_count())
            .map(|i| ResearchBudgetSchema.map_row(&RowReader::new(&table, i).unwrap()).unwrap())
            .collect();
        assert_eq!(lines[0].execution.description, None);

        let mut conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        let tx = conn.transaction().unwrap();
        let rows = ResearchBudgetSchema.persist(&tx, &lines).unwrap();
        tx.commit().unwrap();

        assert_eq!(rows, 2);
        let projects: i64 = conn
            .query_row("SELECT COUNT(*) FROM research_projects", [], |r| r.get(0))
            .unwrap();
        assert_eq!(projects, 1);
    }
}

// ==========================================
// 학과별 KPI 解析
// ==========================================

use crate::domain::records::DepartmentKpi;
use crate::domain::types::RecordType;
use crate::importer::columns::kpi;
use crate::importer::error::IngestResult;
use crate::importer::field_mapper::RowReader;
use crate::importer::parser_trait::RecordSchema;
use crate::importer::pipeline::IngestPipeline;
use crate::importer::table::DataTable;
use crate::importer::validators::validate_department_kpi_data;
use crate::repository::RecordRepository;
use rusqlite::Transaction;

#[derive(Debug, Default, Clone, Copy)]
pub struct DepartmentKpiSchema;

pub type DepartmentKpiParser = IngestPipeline<DepartmentKpiSchema>;

impl RecordSchema for DepartmentKpiSchema {
    type Record = DepartmentKpi;

    const RECORD_TYPE: RecordType = RecordType::DepartmentKpi;

    fn validate(&self, table: &DataTable) -> IngestResult<()> {
        validate_department_kpi_data(table)
    }

    fn map_row(&self, row: &RowReader<'_>) -> IngestResult<DepartmentKpi> {
        Ok(DepartmentKpi {
            evaluation_year: row.required_i32(kpi::EVALUATION_YEAR)?,
            college: row.required_text(kpi::COLLEGE)?,
            department: row.required_text(kpi::DEPARTMENT)?,
            employment_rate: row.optional_decimal(kpi::EMPLOYMENT_RATE)?,
            full_time_faculty: row.optional_i32(kpi::FULL_TIME_FACULTY)?,
            visiting_faculty: row.optional_i32(kpi::VISITING_FACULTY)?,
            tech_transfer_income: row.optional_decimal(kpi::TECH_TRANSFER_INCOME)?,
            intl_conference_count: row.optional_i32(kpi::INTL_CONFERENCE_COUNT)?,
        })
    }

    fn persist(&self, tx: &Transaction<'_>, records: &[DepartmentKpi]) -> IngestResult<usize> {
        Ok(RecordRepository::insert_department_kpis_tx(tx, records)?)
    }
}

// ==========================================
// 학생 解析
// ==========================================

use crate::domain::records::Student;
use crate::domain::types::{EnrollmentStatus, Gender, ProgramType, RecordType};
use crate::importer::columns::student as col;
use crate::importer::error::IngestResult;
use crate::importer::field_mapper::RowReader;
use crate::importer::parser_trait::RecordSchema;
use crate::importer::pipeline::IngestPipeline;
use crate::importer::table::DataTable;
use crate::importer::validators::validate_student_data;
use crate::repository::RecordRepository;
use rusqlite::Transaction;

#[derive(Debug, Default, Clone, Copy)]
pub struct StudentSchema;

pub type StudentParser = IngestPipeline<StudentSchema>;

impl RecordSchema for StudentSchema {
    type Record = Student;

    const RECORD_TYPE: RecordType = RecordType::Student;

    fn validate(&self, table: &DataTable) -> IngestResult<()> {
        validate_student_data(table)
    }

    fn map_row(&self, row: &RowReader<'_>) -> IngestResult<Student> {
        Ok(Student {
            student_number: row.required_text(col::STUDENT_NUMBER)?,
            name: row.required_text(col::NAME)?,
            college: row.required_text(col::COLLEGE)?,
            department: row.required_text(col::DEPARTMENT)?,
            grade: row.optional_i32(col::GRADE)?,
            program_type: row.optional_enum(col::PROGRAM_TYPE, ProgramType::from_db_str)?,
            enrollment_status: row
                .required_enum(col::ENROLLMENT_STATUS, EnrollmentStatus::from_db_str)?,
            gender: row.optional_enum(col::GENDER, Gender::from_db_str)?,
            admission_year: row.required_i32(col::ADMISSION_YEAR)?,
        })
    }

    fn persist(&self, tx: &Transaction<'_>, records: &[Student]) -> IngestResult<usize> {
        Ok(RecordRepository::insert_students_tx(tx, records)?)
    }
}

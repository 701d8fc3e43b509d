// ==========================================
// 논문 解析
// ==========================================

use crate::domain::records::Publication;
use crate::domain::types::{JournalGrade, ProjectLinked, RecordType};
use crate::importer::columns::publication as col;
use crate::importer::error::IngestResult;
use crate::importer::field_mapper::RowReader;
use crate::importer::parser_trait::RecordSchema;
use crate::importer::pipeline::IngestPipeline;
use crate::importer::table::DataTable;
use crate::importer::validators::validate_publication_data;
use crate::repository::RecordRepository;
use rusqlite::Transaction;

#[derive(Debug, Default, Clone, Copy)]
pub struct PublicationSchema;

pub type PublicationParser = IngestPipeline<PublicationSchema>;

impl RecordSchema for PublicationSchema {
    type Record = Publication;

    const RECORD_TYPE: RecordType = RecordType::Publication;

    fn validate(&self, table: &DataTable) -> IngestResult<()> {
        validate_publication_data(table)
    }

    fn map_row(&self, row: &RowReader<'_>) -> IngestResult<Publication> {
        Ok(Publication {
            publication_id: row.required_text(col::PUBLICATION_ID)?,
            publication_date: row.required_date(col::PUBLICATION_DATE)?,
            college: row.required_text(col::COLLEGE)?,
            department: row.required_text(col::DEPARTMENT)?,
            title: row.required_text(col::TITLE)?,
            first_author: row.required_text(col::FIRST_AUTHOR)?,
            co_authors: row.optional_text(col::CO_AUTHORS),
            journal_name: row.required_text(col::JOURNAL_NAME)?,
            journal_grade: row.optional_enum(col::JOURNAL_GRADE, JournalGrade::from_db_str)?,
            impact_factor: row.optional_decimal(col::IMPACT_FACTOR)?,
            project_linked: row.optional_enum(col::PROJECT_LINKED, ProjectLinked::from_db_str)?,
        })
    }

    fn persist(&self, tx: &Transaction<'_>, records: &[Publication]) -> IngestResult<usize> {
        Ok(RecordRepository::insert_publications_tx(tx, records)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::table::CellValue;
    use chrono::NaiveDate;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_map_row() {
        let mut table = DataTable::new(col::REQUIRED.iter().map(|c| c.to_string()).collect());
        table.push_row(vec![
            text("PUB-2023-001"),
            CellValue::DateTime(
                NaiveDate::from_ymd_opt(2023, 6, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
            ),
            text("공과대학"),
            text("컴퓨터공학과"),
            text("그래프 신경망 연구"),
            text("김교수"),
            CellValue::Missing,
            text("IEEE TNNLS"),
            text("SCIE"),
            CellValue::Float(10.45),
            text("Y"),
        ]);

        let row = RowReader::new(&table, 0).unwrap();
        let publication = PublicationSchema.map_row(&row).unwrap();

        assert_eq!(publication.publication_date, NaiveDate::from_ymd_opt(2023, 6, 1).unwrap());
        assert_eq!(publication.co_authors, None);
        assert_eq!(publication.journal_grade, Some(JournalGrade::Scie));
        assert_eq!(publication.impact_factor.map(|d| d.to_string()), Some("10.45".to_string()));
        assert_eq!(publication.project_linked, Some(ProjectLinked::Yes));
    }

    #[test]
    fn test_malformed_date_fails() {
        let mut table = DataTable::new(col::REQUIRED.iter().map(|c| c.to_string()).collect());
        table.push_row(vec![text("PUB-1"), text("어제")]);

        let row = RowReader::new(&table, 0).unwrap();
        let err = PublicationSchema.map_row(&row).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Column '게재일' has invalid data type. Expected date. Row 2: '어제'"
        );
    }
}

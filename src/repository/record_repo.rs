// ==========================================
// 大学成果分析看板 - 业务记录仓储
// ==========================================
// 对齐: department_kpi / publications / research_projects /
//       execution_records / students 表
// 红线: *_tx 方法只在调用方提供的事务内执行，不自行提交
// ==========================================

use crate::domain::records::{DepartmentKpi, ExecutionRecord, Publication, ResearchProject, Student};
use crate::domain::types::ExecutionStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row, Transaction};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// 允许 count_rows 查询的表
const COUNTABLE_TABLES: [&str; 6] = [
    "department_kpi",
    "publications",
    "research_projects",
    "execution_records",
    "students",
    "upload_history",
];

// ==========================================
// RecordRepository - 业务记录仓储
// ==========================================
pub struct RecordRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RecordRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 事务内写入
    // ==========================================

    /// 在事务中批量插入 DepartmentKpi
    pub fn insert_department_kpis_tx(
        tx: &Transaction,
        kpis: &[DepartmentKpi],
    ) -> RepositoryResult<usize> {
        let mut stmt = tx.prepare(
            r#"
            INSERT INTO department_kpi (
                evaluation_year, college, department, employment_rate,
                full_time_faculty, visiting_faculty, tech_transfer_income,
                intl_conference_count
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )?;

        let mut count = 0;
        for kpi in kpis {
            stmt.execute(params![
                kpi.evaluation_year,
                kpi.college,
                kpi.department,
                kpi.employment_rate.map(|d| d.to_string()),
                kpi.full_time_faculty,
                kpi.visiting_faculty,
                kpi.tech_transfer_income.map(|d| d.to_string()),
                kpi.intl_conference_count,
            ])?;
            count += 1;
        }

        Ok(count)
    }

    /// 在事务中批量插入 Publication（publication_id 重复时失败）
    pub fn insert_publications_tx(
        tx: &Transaction,
        publications: &[Publication],
    ) -> RepositoryResult<usize> {
        let mut stmt = tx.prepare(
            r#"
            INSERT INTO publications (
                publication_id, publication_date, college, department, title,
                first_author, co_authors, journal_name, journal_grade,
                impact_factor, project_linked
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )?;

        let mut count = 0;
        for p in publications {
            stmt.execute(params![
                p.publication_id,
                p.publication_date.format(DATE_FORMAT).to_string(),
                p.college,
                p.department,
                p.title,
                p.first_author,
                p.co_authors,
                p.journal_name,
                p.journal_grade.map(|g| g.to_db_str()),
                p.impact_factor.map(|d| d.to_string()),
                p.project_linked.map(|l| l.to_db_str()),
            ])?;
            count += 1;
        }

        Ok(count)
    }

    /// 在事务中按 project_number 获取或创建 ResearchProject
    ///
    /// 依赖 project_number 唯一约束: 已存在时不覆盖原有字段，直接复用其 id
    pub fn get_or_create_project_tx(
        tx: &Transaction,
        project: &ResearchProject,
    ) -> RepositoryResult<i64> {
        tx.execute(
            r#"
            INSERT INTO research_projects (
                project_number, project_name, principal_investigator,
                department, funding_agency, total_budget
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(project_number) DO NOTHING
            "#,
            params![
                project.project_number,
                project.project_name,
                project.principal_investigator,
                project.department,
                project.funding_agency,
                project.total_budget,
            ],
        )?;

        let id = tx.query_row(
            "SELECT id FROM research_projects WHERE project_number = ?1",
            params![project.project_number],
            |row| row.get(0),
        )?;

        Ok(id)
    }

    /// 在事务中插入一条执行记录
    pub fn insert_execution_record_tx(
        tx: &Transaction,
        project_id: i64,
        record: &ExecutionRecord,
    ) -> RepositoryResult<()> {
        tx.execute(
            r#"
            INSERT INTO execution_records (
                execution_id, project_id, execution_date, expense_category,
                amount, status, description
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                record.execution_id,
                project_id,
                record.execution_date.format(DATE_FORMAT).to_string(),
                record.expense_category,
                record.amount,
                record.status.to_db_str(),
                record.description,
            ],
        )?;
        Ok(())
    }

    /// 在事务中批量插入 Student（student_number 重复时失败）
    pub fn insert_students_tx(tx: &Transaction, students: &[Student]) -> RepositoryResult<usize> {
        let mut stmt = tx.prepare(
            r#"
            INSERT INTO students (
                student_number, name, college, department, grade,
                program_type, enrollment_status, gender, admission_year
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )?;

        let mut count = 0;
        for s in students {
            stmt.execute(params![
                s.student_number,
                s.name,
                s.college,
                s.department,
                s.grade,
                s.program_type.map(|p| p.to_db_str()),
                s.enrollment_status.to_db_str(),
                s.gender.map(|g| g.to_db_str()),
                s.admission_year,
            ])?;
            count += 1;
        }

        Ok(count)
    }

    // ==========================================
    // 查询操作
    // ==========================================

    /// 统计表行数
    pub fn count_rows(&self, table: &str) -> RepositoryResult<i64> {
        if !COUNTABLE_TABLES.contains(&table) {
            return Err(RepositoryError::FieldValueError {
                field: "table".to_string(),
                message: format!("不支持的表: {}", table),
            });
        }

        let conn = self.get_conn()?;
        let count = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
            row.get(0)
        })?;
        Ok(count)
    }

    /// 按项目编号查询（返回 id 与实体）
    pub fn find_project_by_number(
        &self,
        project_number: &str,
    ) -> RepositoryResult<Option<(i64, ResearchProject)>> {
        let conn = self.get_conn()?;
        let project = conn
            .query_row(
                r#"
                SELECT id, project_number, project_name, principal_investigator,
                       department, funding_agency, total_budget
                FROM research_projects
                WHERE project_number = ?1
                "#,
                params![project_number],
                |row| {
                    Ok((
                        row.get(0)?,
                        ResearchProject {
                            project_number: row.get(1)?,
                            project_name: row.get(2)?,
                            principal_investigator: row.get(3)?,
                            department: row.get(4)?,
                            funding_agency: row.get(5)?,
                            total_budget: row.get(6)?,
                        },
                    ))
                },
            )
            .optional()?;
        Ok(project)
    }

    /// 全部 KPI（按插入顺序）
    pub fn list_department_kpis(&self) -> RepositoryResult<Vec<DepartmentKpi>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT evaluation_year, college, department, employment_rate,
                   full_time_faculty, visiting_faculty, tech_transfer_income,
                   intl_conference_count
            FROM department_kpi
            ORDER BY id
            "#,
        )?;

        let kpis = stmt
            .query_map([], |row| {
                Ok(DepartmentKpi {
                    evaluation_year: row.get(0)?,
                    college: row.get(1)?,
                    department: row.get(2)?,
                    employment_rate: decimal_column(row, 3)?,
                    full_time_faculty: row.get(4)?,
                    visiting_faculty: row.get(5)?,
                    tech_transfer_income: decimal_column(row, 6)?,
                    intl_conference_count: row.get(7)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(kpis)
    }

    /// 某项目下的全部执行记录
    pub fn list_executions_for_project(
        &self,
        project_number: &str,
    ) -> RepositoryResult<Vec<ExecutionRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT e.execution_id, p.project_number, e.execution_date,
                   e.expense_category, e.amount, e.status, e.description
            FROM execution_records e
            JOIN research_projects p ON p.id = e.project_id
            WHERE p.project_number = ?1
            ORDER BY e.id
            "#,
        )?;

        let records = stmt
            .query_map(params![project_number], |row| {
                let date_raw: String = row.get(2)?;
                let status_raw: String = row.get(5)?;
                Ok(ExecutionRecord {
                    execution_id: row.get(0)?,
                    project_number: row.get(1)?,
                    execution_date: NaiveDate::parse_from_str(&date_raw, DATE_FORMAT).map_err(
                        |e| conversion_failure(2, Box::new(e)),
                    )?,
                    expense_category: row.get(3)?,
                    amount: row.get(4)?,
                    status: ExecutionStatus::from_db_str(&status_raw).ok_or_else(|| {
                        conversion_failure(5, format!("unknown status: {}", status_raw).into())
                    })?,
                    description: row.get(6)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(records)
    }
}

// ==========================================
// 辅助函数
// ==========================================

fn decimal_column(row: &Row, idx: usize) -> SqliteResult<Option<Decimal>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| Decimal::from_str(&s).map_err(|e| conversion_failure(idx, Box::new(e))))
        .transpose()
}

fn conversion_failure(
    idx: usize,
    err: Box<dyn std::error::Error + Send + Sync + 'static>,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, err)
}

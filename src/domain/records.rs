// ==========================================
// 大学成果分析看板 - 业务记录实体
// ==========================================
// 对齐: department_kpi / publications / research_projects /
//       execution_records / students 表
// 说明: 上传管道只负责“生成并写入”这些记录，不拥有其后续生命周期
// ==========================================

use crate::domain::types::{
    EnrollmentStatus, ExecutionStatus, Gender, JournalGrade, ProgramType, ProjectLinked,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ==========================================
// DepartmentKpi - 학과별 KPI
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentKpi {
    pub evaluation_year: i32,                  // 평가년도 [2000, 2100]
    pub college: String,                       // 단과대학
    pub department: String,                    // 학과
    pub employment_rate: Option<Decimal>,      // 졸업생 취업률 (%) [0, 100]
    pub full_time_faculty: Option<i32>,        // 전임교원 수 (명)
    pub visiting_faculty: Option<i32>,         // 초빙교원 수 (명)
    pub tech_transfer_income: Option<Decimal>, // 연간 기술이전 수입액 (억원)
    pub intl_conference_count: Option<i32>,    // 국제학술대회 개최 횟수
}

// ==========================================
// Publication - 논문
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    pub publication_id: String, // 논문ID (唯一)
    pub publication_date: NaiveDate,
    pub college: String,
    pub department: String,
    pub title: String,
    pub first_author: String,
    pub co_authors: Option<String>,
    pub journal_name: String,
    pub journal_grade: Option<JournalGrade>,
    pub impact_factor: Option<Decimal>,
    pub project_linked: Option<ProjectLinked>,
}

// ==========================================
// ResearchProject - 연구 과제
// ==========================================
// 自然键: project_number（get-or-create）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchProject {
    pub project_number: String,
    pub project_name: String,
    pub principal_investigator: String,
    pub department: String,
    pub funding_agency: String,
    pub total_budget: i64,
}

// ==========================================
// ExecutionRecord - 연구비 집행 내역
// ==========================================
// 通过 project_number 关联 ResearchProject（落库时解析为 project_id）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub execution_id: String,
    pub project_number: String,
    pub execution_date: NaiveDate,
    pub expense_category: String,
    pub amount: i64,
    pub status: ExecutionStatus,
    pub description: Option<String>,
}

/// 预算文件的一行 = 一个（可能已存在的）项目 + 一条执行记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetLine {
    pub project: ResearchProject,
    pub execution: ExecutionRecord,
}

// ==========================================
// Student - 학생
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub student_number: String, // 학번 (唯一)
    pub name: String,
    pub college: String,
    pub department: String,
    pub grade: Option<i32>, // 0: 대학원, 1-4: 학부
    pub program_type: Option<ProgramType>,
    pub enrollment_status: EnrollmentStatus,
    pub gender: Option<Gender>,
    pub admission_year: i32,
}

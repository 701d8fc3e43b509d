// ==========================================
// 大学成果分析看板 - 上传模板列名
// ==========================================
// 红线: 列名是与上传模板的契约（精确匹配，区分大小写），不可随意改动
// ==========================================

/// 학과별 KPI
pub mod kpi {
    pub const EVALUATION_YEAR: &str = "평가년도";
    pub const COLLEGE: &str = "단과대학";
    pub const DEPARTMENT: &str = "학과";
    pub const EMPLOYMENT_RATE: &str = "졸업생 취업률 (%)";
    pub const FULL_TIME_FACULTY: &str = "전임교원 수 (명)";
    pub const VISITING_FACULTY: &str = "초빙교원 수 (명)";
    pub const TECH_TRANSFER_INCOME: &str = "연간 기술이전 수입액 (억원)";
    pub const INTL_CONFERENCE_COUNT: &str = "국제학술대회 개최 횟수";

    pub const REQUIRED: [&str; 8] = [
        EVALUATION_YEAR,
        COLLEGE,
        DEPARTMENT,
        EMPLOYMENT_RATE,
        FULL_TIME_FACULTY,
        VISITING_FACULTY,
        TECH_TRANSFER_INCOME,
        INTL_CONFERENCE_COUNT,
    ];

    pub const SIGNATURE: [&str; 4] = [EVALUATION_YEAR, COLLEGE, DEPARTMENT, EMPLOYMENT_RATE];
}

/// 논문
pub mod publication {
    pub const PUBLICATION_ID: &str = "논문ID";
    pub const PUBLICATION_DATE: &str = "게재일";
    pub const COLLEGE: &str = "단과대학";
    pub const DEPARTMENT: &str = "학과";
    pub const TITLE: &str = "논문제목";
    pub const FIRST_AUTHOR: &str = "주저자";
    pub const CO_AUTHORS: &str = "참여저자";
    pub const JOURNAL_NAME: &str = "학술지명";
    pub const JOURNAL_GRADE: &str = "저널등급";
    pub const IMPACT_FACTOR: &str = "Impact Factor";
    pub const PROJECT_LINKED: &str = "과제연계여부";

    pub const REQUIRED: [&str; 11] = [
        PUBLICATION_ID,
        PUBLICATION_DATE,
        COLLEGE,
        DEPARTMENT,
        TITLE,
        FIRST_AUTHOR,
        CO_AUTHORS,
        JOURNAL_NAME,
        JOURNAL_GRADE,
        IMPACT_FACTOR,
        PROJECT_LINKED,
    ];

    pub const SIGNATURE: [&str; 4] = [PUBLICATION_ID, PUBLICATION_DATE, TITLE, FIRST_AUTHOR];
}

/// 연구비 집행 내역
pub mod research_budget {
    pub const EXECUTION_ID: &str = "집행ID";
    pub const PROJECT_NUMBER: &str = "과제번호";
    pub const PROJECT_NAME: &str = "과제명";
    pub const PRINCIPAL_INVESTIGATOR: &str = "연구책임자";
    pub const DEPARTMENT: &str = "소속학과";
    pub const FUNDING_AGENCY: &str = "지원기관";
    pub const TOTAL_BUDGET: &str = "총연구비";
    pub const EXECUTION_DATE: &str = "집행일자";
    pub const EXPENSE_CATEGORY: &str = "집행항목";
    pub const AMOUNT: &str = "집행금액";
    pub const STATUS: &str = "상태";
    pub const DESCRIPTION: &str = "비고";

    pub const REQUIRED: [&str; 12] = [
        EXECUTION_ID,
        PROJECT_NUMBER,
        PROJECT_NAME,
        PRINCIPAL_INVESTIGATOR,
        DEPARTMENT,
        FUNDING_AGENCY,
        TOTAL_BUDGET,
        EXECUTION_DATE,
        EXPENSE_CATEGORY,
        AMOUNT,
        STATUS,
        DESCRIPTION,
    ];

    pub const SIGNATURE: [&str; 5] = [
        EXECUTION_ID,
        PROJECT_NUMBER,
        PROJECT_NAME,
        TOTAL_BUDGET,
        AMOUNT,
    ];
}

/// 학생
pub mod student {
    pub const STUDENT_NUMBER: &str = "학번";
    pub const NAME: &str = "이름";
    pub const COLLEGE: &str = "단과대학";
    pub const DEPARTMENT: &str = "학과";
    pub const GRADE: &str = "학년";
    pub const PROGRAM_TYPE: &str = "과정구분";
    pub const ENROLLMENT_STATUS: &str = "학적상태";
    pub const GENDER: &str = "성별";
    pub const ADMISSION_YEAR: &str = "입학년도";

    pub const REQUIRED: [&str; 9] = [
        STUDENT_NUMBER,
        NAME,
        COLLEGE,
        DEPARTMENT,
        GRADE,
        PROGRAM_TYPE,
        ENROLLMENT_STATUS,
        GENDER,
        ADMISSION_YEAR,
    ];

    pub const SIGNATURE: [&str; 5] = [STUDENT_NUMBER, NAME, COLLEGE, DEPARTMENT, ENROLLMENT_STATUS];
}

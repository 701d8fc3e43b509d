// ==========================================
// 文件类型识别集成测试
// ==========================================
// 测试目标: 验证按表头签名识别上传文件类型（阈值 0.8）
// ==========================================


use std::path::Path;

use univ_dashboard::config::IngestConfig;
use univ_dashboard::domain::types::RecordType;
use univ_dashboard::importer::{identify_file_type, identify_file_type_with};
use univ_dashboard::logging;
use test_helpers::{write_csv, write_temp_file, KPI_HEADER, STUDENT_HEADER};

#[test]
fn test_fixtures_are_identified() {
    logging::init_test();

    let cases = [
        ("tests/fixtures/department_kpi.csv", RecordType::DepartmentKpi),
        ("tests/fixtures/publications.csv", RecordType::Publication),
        ("tests/fixtures/research_budget.csv", RecordType::ResearchBudget),
        ("tests/fixtures/students.csv", RecordType::Student),
        ("tests/fixtures/department_kpi.xlsx", RecordType::DepartmentKpi),
        ("tests/fixtures/publications.xlsx", RecordType::Publication),
        ("tests/fixtures/research_budget.xlsx", RecordType::ResearchBudget),
        ("tests/fixtures/students.xlsx", RecordType::Student),
    ];

    for (path, expected) in cases {
        assert_eq!(
            identify_file_type(Path::new(path)),
            Some(expected),
            "识别失败: {}",
            path
        );
    }
}

#[test]
fn test_header_only_file_is_identified() {
    let file = write_csv(STUDENT_HEADER, &[], false);
    assert_eq!(identify_file_type(file.path()), Some(RecordType::Student));
}

#[test]
fn test_bom_header_is_identified() {
    let file = write_csv(KPI_HEADER, &[], true);
    assert_eq!(identify_file_type(file.path()), Some(RecordType::DepartmentKpi));
}

#[test]
fn test_identification_ignores_data_quality() {
    // 数据行不合法不影响识别
    let file = write_csv(KPI_HEADER, &["abc,,,999,x,y,z,w"], false);
    assert_eq!(identify_file_type(file.path()), Some(RecordType::DepartmentKpi));
}

#[test]
fn test_signature_threshold() {
    // 5 个签名列命中 4 个 = 0.8，达到阈值
    let budget = write_csv("집행ID,과제번호,과제명,총연구비,기타", &[], false);
    assert_eq!(
        identify_file_type(budget.path()),
        Some(RecordType::ResearchBudget)
    );

    // 4 个签名列命中 3 个 = 0.75，低于阈值
    let kpi = write_csv("평가년도,단과대학,학과,취업률", &[], false);
    assert_eq!(identify_file_type(kpi.path()), None);
}

#[test]
fn test_unrelated_header_is_unidentified() {
    let file = write_csv("name,email,phone", &["a,b,c"], false);
    assert_eq!(identify_file_type(file.path()), None);
}

#[test]
fn test_unreadable_inputs_are_unidentified() {
    let txt = write_temp_file(".txt", STUDENT_HEADER.as_bytes());
    assert_eq!(identify_file_type(txt.path()), None);

    let corrupt = write_temp_file(".xlsx", b"garbage");
    assert_eq!(identify_file_type(corrupt.path()), None);

    assert_eq!(
        identify_file_type(Path::new("/nonexistent/dir/students.csv")),
        None
    );
}

#[test]
fn test_identification_respects_allowed_extensions() {
    let file = write_csv(STUDENT_HEADER, &[], false);
    let excel_only = IngestConfig {
        allowed_extensions: vec![".xlsx".to_string(), ".xls".to_string()],
        ..IngestConfig::default()
    };

    assert_eq!(identify_file_type_with(file.path(), &excel_only), None);
    assert_eq!(
        identify_file_type_with(file.path(), &IngestConfig::default()),
        Some(RecordType::Student)
    );
}

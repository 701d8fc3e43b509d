// ==========================================
// 上传 API 集成测试
// ==========================================
// 测试目标: 验证 暂存 → 识别 → 分派 → 审计查询 的端到端流程
// ==========================================


use univ_dashboard::api::{UploadApi, UploadResponse, UNIDENTIFIED_MESSAGE};
use univ_dashboard::config::{config_keys, ConfigManager, IngestConfig};
use univ_dashboard::domain::types::{RecordType, UploadStatus};
use univ_dashboard::logging;
use test_helpers::{create_test_db, open_shared, KPI_HEADER};

fn setup_api(db_path: &str) -> UploadApi {
    logging::init_test();
    let conn = open_shared(db_path).expect("Failed to open db");
    UploadApi::from_stored_config(conn).expect("Failed to create UploadApi")
}

fn fixture(name: &str) -> Vec<u8> {
    std::fs::read(format!("tests/fixtures/{}", name)).expect("Failed to read fixture")
}

#[test]
fn test_upload_dispatches_by_header() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let api = setup_api(&db_path);

    let cases = [
        ("2023_학과별_KPI.csv", "department_kpi.csv", RecordType::DepartmentKpi, 3),
        ("논문실적.csv", "publications.csv", RecordType::Publication, 3),
        ("연구비_집행내역.csv", "research_budget.csv", RecordType::ResearchBudget, 4),
        ("학생명단.csv", "students.csv", RecordType::Student, 4),
    ];

    for (upload_name, fixture_name, expected_type, expected_rows) in cases {
        let response = api
            .upload(upload_name, &fixture(fixture_name), "admin")
            .unwrap();
        match response {
            UploadResponse::Processed {
                record_type,
                outcome,
            } => {
                assert_eq!(record_type, expected_type);
                assert!(outcome.success, "{}: {:?}", upload_name, outcome.error_message);
                assert_eq!(outcome.rows_processed, Some(expected_rows));
            }
            other => panic!("{} 应被识别: {:?}", upload_name, other),
        }
    }

    // 审计记录保留原始文件名（而非暂存文件名）
    let mut names: Vec<String> = api
        .history_for_user("admin")
        .unwrap()
        .into_iter()
        .map(|h| h.file_name)
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "2023_학과별_KPI.csv",
            "논문실적.csv",
            "연구비_집행내역.csv",
            "학생명단.csv"
        ]
    );

    let summary = api.summary(2).unwrap();
    assert_eq!(summary.success_count, 4);
    assert_eq!(summary.failed_count, 0);
    assert_eq!(summary.recent.len(), 2);
}

#[test]
fn test_workbook_upload_is_staged_and_dispatched() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let api = setup_api(&db_path);

    let response = api
        .upload("논문실적_2023.xlsx", &fixture("publications.xlsx"), "admin")
        .unwrap();

    match response {
        UploadResponse::Processed {
            record_type,
            outcome,
        } => {
            assert_eq!(record_type, RecordType::Publication);
            assert!(outcome.success, "{:?}", outcome.error_message);
            assert_eq!(outcome.rows_processed, Some(3));
        }
        other => panic!("xlsx 应被识别: {:?}", other),
    }

    let history = api.history_for_user("admin").unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].file_name, "논문실적_2023.xlsx");
    assert_eq!(history[0].data_type, RecordType::Publication);
    assert_eq!(history[0].status, UploadStatus::Success);
}

#[test]
fn test_unidentified_upload_returns_message_without_history() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let api = setup_api(&db_path);

    let response = api
        .upload("memo.csv", "제목,내용\n안녕,하세요\n".as_bytes(), "admin")
        .unwrap();

    assert!(!response.is_success());
    assert_eq!(
        response,
        UploadResponse::Unidentified {
            message: UNIDENTIFIED_MESSAGE.to_string()
        }
    );
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["status"], "unidentified");

    assert!(api.recent_history(10).unwrap().is_empty());
}

#[test]
fn test_unsupported_extension_is_unidentified() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let api = setup_api(&db_path);

    let response = api
        .upload("kpi.txt", fixture("department_kpi.csv").as_slice(), "admin")
        .unwrap();

    assert!(matches!(response, UploadResponse::Unidentified { .. }));
}

#[test]
fn test_validation_failure_is_reported_and_audited() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let api = setup_api(&db_path);
    let csv = format!("{}\n1999,공과대학,컴퓨터공학과,85.5,15,5,10.5,2\n", KPI_HEADER);

    let response = api.upload("kpi.csv", csv.as_bytes(), "editor").unwrap();

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["status"], "processed");
    assert_eq!(json["record_type"], "department_kpi");
    assert_eq!(json["outcome"]["success"], false);
    assert_eq!(
        json["outcome"]["error_message"],
        "Column '평가년도' has values below minimum 2000: [1999]"
    );

    let history = api.history_for_user("editor").unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, UploadStatus::Failed);
    assert!(api.history_for_user("admin").unwrap().is_empty());
}

#[test]
fn test_stored_size_limit_is_applied() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    ConfigManager::new(&db_path)
        .unwrap()
        .set_config_value(config_keys::MAX_FILE_SIZE_MB, "1")
        .unwrap();
    let api = setup_api(&db_path);
    assert_eq!(api.config().max_file_size_mb(), 1);
    assert_ne!(api.config(), &IngestConfig::default());

    // 表头可识别，其余用空行填充到 2 MiB
    let mut bytes = format!("{}\n", KPI_HEADER).into_bytes();
    bytes.resize(2 * 1024 * 1024, b'\n');

    let response = api.upload("big_kpi.csv", &bytes, "admin").unwrap();

    match response {
        UploadResponse::Processed { outcome, .. } => {
            assert!(!outcome.success);
            assert_eq!(
                outcome.error_message.as_deref(),
                Some("File size (2.0MB) exceeds maximum allowed size (1MB)")
            );
        }
        other => panic!("应被识别为 KPI: {:?}", other),
    }

    let history = api.recent_history(1).unwrap();
    assert_eq!(history[0].file_size, 2 * 1024 * 1024);
}

use super::UploadHistoryRepository;
use crate::domain::types::{RecordType, UploadStatus};
use crate::domain::upload_history::NewUploadHistory;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

fn setup_test_db() -> Arc<Mutex<Connection>> {
    let conn = Connection::open_in_memory().unwrap();
    crate::db::configure_sqlite_connection(&conn).unwrap();
    crate::db::init_schema(&conn).unwrap();
    Arc::new(Mutex::new(conn))
}

#[test]
fn test_insert_and_find_by_id() {
    let repo = UploadHistoryRepository::new(setup_test_db());

    let entry = NewUploadHistory::success("admin", "kpi.csv", 1024, RecordType::DepartmentKpi, 3, "t-1");
    let id = repo.insert(&entry).unwrap();

    let found = repo.find_by_id(id).unwrap().unwrap();
    assert_eq!(found.user, "admin");
    assert_eq!(found.file_name, "kpi.csv");
    assert_eq!(found.file_size, 1024);
    assert_eq!(found.data_type, RecordType::DepartmentKpi);
    assert_eq!(found.status, UploadStatus::Success);
    assert_eq!(found.rows_processed, Some(3));
    assert_eq!(found.error_message, None);
    assert_eq!(found.trace_id, "t-1");
}

#[test]
fn test_failed_entry_has_no_rows_processed() {
    let repo = UploadHistoryRepository::new(setup_test_db());

    let entry = NewUploadHistory::failed(
        "admin",
        "students.xlsx",
        0,
        RecordType::Student,
        "Missing required columns: 학과",
        "t-2",
    );
    let id = repo.insert(&entry).unwrap();

    let found = repo.find_by_id(id).unwrap().unwrap();
    assert_eq!(found.status, UploadStatus::Failed);
    assert_eq!(found.rows_processed, None);
    assert_eq!(found.error_message.as_deref(), Some("Missing required columns: 학과"));
}

#[test]
fn test_find_by_id_not_found() {
    let repo = UploadHistoryRepository::new(setup_test_db());
    assert!(repo.find_by_id(42).unwrap().is_none());
}

#[test]
fn test_list_recent_and_by_user() {
    let repo = UploadHistoryRepository::new(setup_test_db());

    repo.insert(&NewUploadHistory::success("u1", "a.csv", 1, RecordType::Publication, 1, "a"))
        .unwrap();
    repo.insert(&NewUploadHistory::failed("u2", "b.csv", 2, RecordType::Student, "boom", "b"))
        .unwrap();
    repo.insert(&NewUploadHistory::success("u1", "c.csv", 3, RecordType::ResearchBudget, 2, "c"))
        .unwrap();

    let recent = repo.list_recent(2).unwrap();
    assert_eq!(recent.len(), 2);
    // 同一秒内写入时按 id 倒序
    assert_eq!(recent[0].file_name, "c.csv");

    let by_user = repo.list_by_user("u1").unwrap();
    assert_eq!(by_user.len(), 2);
    assert!(by_user.iter().all(|h| h.user == "u1"));

    assert_eq!(repo.count_by_status(UploadStatus::Success).unwrap(), 2);
    assert_eq!(repo.count_by_status(UploadStatus::Failed).unwrap(), 1);
}

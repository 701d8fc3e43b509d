// ==========================================
// 大学成果分析看板 - 命令行入口
// ==========================================
// 用法:
//   univ-dashboard upload <file> <user> [db_path]
//   univ-dashboard identify <file>
//   univ-dashboard history [db_path]
// ==========================================

use anyhow::{bail, Context};
use std::path::Path;
use std::sync::{Arc, Mutex};
use univ_dashboard::api::UploadApi;
use univ_dashboard::config::get_default_db_path;
use univ_dashboard::db::{init_schema, open_sqlite_connection};
use univ_dashboard::importer::identify_file_type;
use univ_dashboard::logging;

const USAGE: &str = "用法:
  univ-dashboard upload <file> <user> [db_path]
  univ-dashboard identify <file>
  univ-dashboard history [db_path]";

fn main() -> anyhow::Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        bail!("{}", USAGE);
    };

    match command.as_str() {
        "upload" => {
            let (Some(file), Some(user)) = (args.get(1), args.get(2)) else {
                bail!("{}", USAGE);
            };
            let api = open_api(args.get(3))?;

            let path = Path::new(file);
            let bytes = std::fs::read(path).with_context(|| format!("无法读取文件: {}", file))?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.clone());

            let response = api.upload(&file_name, &bytes, user)?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            if !response.is_success() {
                std::process::exit(2);
            }
        }
        "identify" => {
            let Some(file) = args.get(1) else {
                bail!("{}", USAGE);
            };
            match identify_file_type(Path::new(file)) {
                Some(record_type) => println!("{}", record_type),
                None => println!("unknown"),
            }
        }
        "history" => {
            let api = open_api(args.get(1))?;
            println!("{}", serde_json::to_string_pretty(&api.summary(20)?)?);
        }
        other => bail!("未知命令: {}\n{}", other, USAGE),
    }

    Ok(())
}

fn open_api(db_path: Option<&String>) -> anyhow::Result<UploadApi> {
    let db_path = db_path.cloned().unwrap_or_else(get_default_db_path);
    tracing::info!(db_path = %db_path, "使用数据库");

    if let Some(parent) = Path::new(&db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("无法创建数据库目录: {}", parent.display()))?;
        }
    }

    let conn = open_sqlite_connection(&db_path)
        .with_context(|| format!("无法打开数据库: {}", db_path))?;
    init_schema(&conn).context("数据库初始化失败")?;

    Ok(UploadApi::from_stored_config(Arc::new(Mutex::new(conn)))?)
}

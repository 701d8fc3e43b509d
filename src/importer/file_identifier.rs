// ==========================================
// 大学成果分析看板 - 文件类型识别
// ==========================================
// 算法: 对每种记录类型计算 |表头 ∩ 签名列| / |签名列|，
//       取最高者，且不低于 MATCH_THRESHOLD 时返回该类型
// 平局: 按注册顺序，先注册者优先（严格大于才替换）
// ==========================================

use crate::config::IngestConfig;
use crate::domain::types::RecordType;
use crate::importer::columns::{kpi, publication, research_budget, student};
use crate::importer::file_reader::FileReader;
use std::path::Path;
use tracing::{debug, warn};

/// 识别阈值
pub const MATCH_THRESHOLD: f64 = 0.8;

/// 签名注册表（顺序即平局优先级）
pub const FILE_TYPE_SIGNATURES: [(RecordType, &[&str]); 4] = [
    (RecordType::DepartmentKpi, &kpi::SIGNATURE),
    (RecordType::Publication, &publication::SIGNATURE),
    (RecordType::ResearchBudget, &research_budget::SIGNATURE),
    (RecordType::Student, &student::SIGNATURE),
];

/// 每种记录类型的匹配率（注册顺序）
pub fn score_headers<S: AsRef<str>>(headers: &[S]) -> Vec<(RecordType, f64)> {
    FILE_TYPE_SIGNATURES
        .iter()
        .map(|(record_type, signature)| {
            let matched = signature
                .iter()
                .filter(|col| headers.iter().any(|h| h.as_ref() == **col))
                .count();
            (*record_type, matched as f64 / signature.len() as f64)
        })
        .collect()
}

/// 根据表头识别记录类型
pub fn identify_headers<S: AsRef<str>>(headers: &[S]) -> Option<RecordType> {
    let mut best: Option<(RecordType, f64)> = None;
    for (record_type, score) in score_headers(headers) {
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((record_type, score)),
        }
    }

    let (record_type, score) = best?;
    debug!(record_type = %record_type, score, "表头匹配结果");
    if score >= MATCH_THRESHOLD {
        Some(record_type)
    } else {
        None
    }
}

/// 根据文件表头识别记录类型（只读取表头行）
///
/// 扩展名不支持或文件不可读时返回 None
pub fn identify_file_type(path: &Path) -> Option<RecordType> {
    identify_file_type_with(path, &IngestConfig::default())
}

pub fn identify_file_type_with(path: &Path, config: &IngestConfig) -> Option<RecordType> {
    let reader = FileReader::new(config.clone());
    match reader.read_headers(path) {
        Ok(headers) => identify_headers(&headers),
        Err(e) => {
            warn!(file = %path.display(), error = %e, "无法读取表头，文件类型未识别");
            None
        }
    }
}

use serde::{Deserialize, Serialize};

/// 单个上传文件的大小上限（50 MiB）
pub const MAX_FILE_SIZE_BYTES: u64 = 50 * 1024 * 1024;

/// 允许上传的扩展名（小写，含点）
pub const ALLOWED_EXTENSIONS: [&str; 3] = [".xlsx", ".xls", ".csv"];

/// 视为“缺失值”的单元格原文（常见表格导出工具的 NA 记号）
pub const DEFAULT_MISSING_MARKERS: [&str; 17] = [
    "", "#N/A", "#N/A N/A", "#NA", "-NaN", "-nan", "<NA>", "N/A", "NA", "NULL", "NaN", "None",
    "n/a", "nan", "null", "1.#IND", "1.#QNAN",
];

/// 上传/导入配置
///
/// 存储位置：config_kv（scope_id='global'），缺省时使用上面的常量。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// 文件大小上限（字节）
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,

    /// 允许的扩展名（小写，含点）
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,

    /// 缺失值记号（按原文精确匹配）
    #[serde(default = "default_missing_markers")]
    pub missing_markers: Vec<String>,
}

fn default_max_file_size() -> u64 {
    MAX_FILE_SIZE_BYTES
}

fn default_allowed_extensions() -> Vec<String> {
    ALLOWED_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

fn default_missing_markers() -> Vec<String> {
    DEFAULT_MISSING_MARKERS.iter().map(|s| s.to_string()).collect()
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: default_max_file_size(),
            allowed_extensions: default_allowed_extensions(),
            missing_markers: default_missing_markers(),
        }
    }
}

impl IngestConfig {
    /// 文件大小上限（MiB，整数）
    pub fn max_file_size_mb(&self) -> u64 {
        self.max_file_size_bytes / (1024 * 1024)
    }

    /// 是否为缺失值记号
    pub fn is_missing_marker(&self, raw: &str) -> bool {
        self.missing_markers.iter().any(|m| m == raw)
    }
}

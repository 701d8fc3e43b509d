// ==========================================
// 大学成果分析看板 - 上传文件暂存
// ==========================================
// 红线: 暂存文件随 StagedUpload 析构删除（成功、失败、panic 均适用）
// ==========================================

use crate::importer::error::IngestResult;
use std::io::Write;
use std::path::Path;
use tempfile::{Builder, NamedTempFile};

/// 暂存的上传文件
pub struct StagedUpload {
    file: NamedTempFile,
    original_name: String,
}

impl StagedUpload {
    /// 将上传内容写入临时文件（保留原扩展名，供读取器按扩展名分派）
    pub fn stage(original_name: &str, bytes: &[u8]) -> IngestResult<Self> {
        let suffix = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();

        let mut file = Builder::new()
            .prefix("univ-upload-")
            .suffix(&suffix)
            .tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;

        Ok(Self {
            file,
            original_name: original_name.to_string(),
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }
}

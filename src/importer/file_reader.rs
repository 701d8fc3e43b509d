// ==========================================
// 大学成果分析看板 - 文件读取器
// ==========================================
// 支持: Excel (.xlsx/.xls) / CSV (.csv，UTF-8，可带 BOM)
// 职责: 扩展名/大小门禁 + 解码为 DataTable
// ==========================================

use crate::config::IngestConfig;
use crate::importer::error::{IngestError, IngestResult};
use crate::importer::table::{CellValue, DataTable};
use calamine::{open_workbook, open_workbook_auto, Data, DataRef, Range, Reader, Xlsx};
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use std::fs::{self, File};
use std::path::Path;
use tracing::debug;

const BOM: char = '\u{feff}';

// ==========================================
// FileReader
// ==========================================
pub struct FileReader {
    config: IngestConfig,
}

impl Default for FileReader {
    fn default() -> Self {
        Self::new(IngestConfig::default())
    }
}

impl FileReader {
    pub fn new(config: IngestConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// 小写扩展名（含点），无扩展名时为空串
    pub fn extension_of(path: &Path) -> String {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_lowercase()))
            .unwrap_or_default()
    }

    /// 扩展名门禁
    pub fn validate_extension(&self, path: &Path) -> IngestResult<String> {
        let ext = Self::extension_of(path);
        if self.config.allowed_extensions.iter().any(|a| a == &ext) {
            Ok(ext)
        } else {
            Err(IngestError::UnsupportedFormat {
                extension: ext,
                allowed: self.config.allowed_extensions.join(", "),
            })
        }
    }

    /// 大小门禁（恰好等于上限时通过）
    pub fn validate_size(&self, size_bytes: u64) -> IngestResult<()> {
        if size_bytes > self.config.max_file_size_bytes {
            return Err(IngestError::FileSize {
                size_mb: size_bytes as f64 / (1024.0 * 1024.0),
                limit_mb: self.config.max_file_size_mb(),
            });
        }
        Ok(())
    }

    /// 文件字节数
    pub fn file_size(path: &Path) -> IngestResult<u64> {
        match fs::metadata(path) {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(IngestError::FileNotFound(path.display().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    // ==========================================
    // 读取
    // ==========================================

    /// 读取整张表（第一个工作表 / 整个 CSV）
    pub fn read(&self, path: &Path) -> IngestResult<DataTable> {
        let ext = self.validate_extension(path)?;
        if !path.exists() {
            return Err(IngestError::FileNotFound(path.display().to_string()));
        }

        let table = match ext.as_str() {
            ".csv" => self.read_csv(path)?,
            _ => self.read_excel(path)?,
        };

        debug!(
            file = %path.display(),
            columns = table.columns.len(),
            rows = table.row_count(),
            "文件读取完成"
        );
        Ok(table)
    }

    /// 只读取表头行
    ///
    /// CSV 与 .xlsx 只解码到表头行为止；.xls 没有流式单元格读取，仍解码整个工作表。
    pub fn read_headers(&self, path: &Path) -> IngestResult<Vec<String>> {
        let ext = self.validate_extension(path)?;
        if !path.exists() {
            return Err(IngestError::FileNotFound(path.display().to_string()));
        }

        match ext.as_str() {
            ".csv" => {
                let mut reader = ReaderBuilder::new()
                    .has_headers(true)
                    .flexible(true)
                    .from_reader(File::open(path)?);
                Ok(normalize_headers(reader.headers()?.iter()))
            }
            ".xlsx" => xlsx_header_row(path),
            _ => {
                let range = first_sheet(path)?;
                Ok(range
                    .rows()
                    .next()
                    .map(header_row)
                    .unwrap_or_default())
            }
        }
    }

    fn read_csv(&self, path: &Path) -> IngestResult<DataTable> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许短行，超宽行单独拒绝
            .from_reader(File::open(path)?);

        let mut table = DataTable::new(normalize_headers(reader.headers()?.iter()));
        let width = table.columns.len();

        for result in reader.records() {
            let record = result?;
            let line = record.position().map(|pos| pos.line() as usize);

            if record.len() > width {
                return Err(IngestError::FileFormat(format!(
                    "Expected {} fields in line {}, saw {}",
                    width,
                    line.map(|l| l.to_string()).unwrap_or_else(|| "?".to_string()),
                    record.len()
                )));
            }

            let row = record
                .iter()
                .map(|raw| {
                    if self.config.is_missing_marker(raw) {
                        CellValue::Missing
                    } else {
                        CellValue::Text(raw.to_string())
                    }
                })
                .collect();
            match line {
                Some(line) => table.push_row_at(row, line),
                None => table.push_row(row),
            }
        }

        Ok(table)
    }

    fn read_excel(&self, path: &Path) -> IngestResult<DataTable> {
        let range = first_sheet(path)?;
        // 区域起点为第一个非空单元格所在行（0 基）
        let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
        let mut rows = range.rows();

        let Some(header) = rows.next() else {
            return Ok(DataTable::default());
        };
        let mut table = DataTable::new(header_row(header));

        for (offset, data_row) in rows.enumerate() {
            let row = data_row.iter().map(|cell| self.cell_from_data(cell)).collect();
            table.push_row_at(row, first_row + offset + 2);
        }

        Ok(table)
    }

    fn cell_from_data(&self, cell: &Data) -> CellValue {
        match cell {
            Data::Empty | Data::Error(_) => CellValue::Missing,
            Data::String(s) if self.config.is_missing_marker(s) => CellValue::Missing,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Int(v) => CellValue::Int(*v),
            Data::Float(v) => CellValue::Float(*v),
            Data::Bool(v) => CellValue::Bool(*v),
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(value) => CellValue::DateTime(value),
                None => CellValue::Float(dt.as_f64()),
            },
            Data::DateTimeIso(s) => parse_iso(s)
                .map(CellValue::DateTime)
                .unwrap_or_else(|| CellValue::Text(s.clone())),
            Data::DurationIso(s) => CellValue::Text(s.clone()),
        }
    }
}

// ==========================================
// 辅助函数
// ==========================================

fn first_sheet(path: &Path) -> IngestResult<Range<Data>> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IngestError::FileFormat("workbook has no worksheets".to_string()))??;
    Ok(range)
}

/// .xlsx 流式读取第一个工作表，遇到第二个非空行即停止
///
/// 只产出非空表头（识别只按列名集合匹配，不依赖列位置）。
fn xlsx_header_row(path: &Path) -> IngestResult<Vec<String>> {
    let mut workbook: Xlsx<_> = open_workbook(path).map_err(xlsx_error)?;
    let Some(sheet) = workbook.sheet_names().into_iter().next() else {
        return Err(IngestError::FileFormat("workbook has no worksheets".to_string()));
    };
    let mut cells = workbook.worksheet_cells_reader(&sheet).map_err(xlsx_error)?;

    let mut header_row_index = None;
    let mut headers = Vec::new();
    while let Some(cell) = cells.next_cell().map_err(xlsx_error)? {
        if matches!(cell.get_value(), DataRef::Empty) {
            continue;
        }
        let (row, _) = cell.get_position();
        match header_row_index {
            None => header_row_index = Some(row),
            Some(header_row) if row != header_row => break,
            Some(_) => {}
        }

        let header = Data::from(cell.get_value().clone()).to_string().trim().to_string();
        if !header.is_empty() {
            headers.push(header);
        }
    }

    Ok(headers)
}

fn xlsx_error(err: calamine::XlsxError) -> IngestError {
    IngestError::FileFormat(err.to_string())
}

fn header_row(row: &[Data]) -> Vec<String> {
    row.iter().map(|cell| cell.to_string().trim().to_string()).collect()
}

/// 去 BOM + TRIM
fn normalize_headers<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    headers
        .enumerate()
        .map(|(idx, h)| {
            let h = if idx == 0 { h.trim_start_matches(BOM) } else { h };
            h.trim().to_string()
        })
        .collect()
}

fn parse_iso(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn csv_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_validate_extension() {
        let reader = FileReader::default();
        assert_eq!(reader.validate_extension(Path::new("a.XLSX")).unwrap(), ".xlsx");

        let err = reader.validate_extension(Path::new("notes.txt")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid file format '.txt'. Allowed formats: .xlsx, .xls, .csv"
        );

        let err = reader.validate_extension(Path::new("noext")).unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFormat { ref extension, .. } if extension.is_empty()));
    }

    #[test]
    fn test_validate_size_boundary() {
        let reader = FileReader::default();
        assert!(reader.validate_size(50 * 1024 * 1024).is_ok());

        let err = reader.validate_size(50 * 1024 * 1024 + 1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "File size (50.0MB) exceeds maximum allowed size (50MB)"
        );

        let err = reader.validate_size(51 * 1024 * 1024).unwrap_err();
        assert!(err.to_string().contains("51.0MB"));
    }

    #[test]
    fn test_read_csv_with_bom_and_markers() {
        let file = csv_file("\u{feff}학번,이름,학년\n2023001,홍길동,NA\n,,\n2023002, 김철수 ,2\n");
        let table = FileReader::default().read(file.path()).unwrap();

        assert_eq!(table.columns, vec!["학번", "이름", "학년"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[0][2], CellValue::Missing);
        // 读取阶段不做 TRIM
        assert_eq!(table.rows[1][1], CellValue::Text(" 김철수 ".to_string()));
        assert_eq!(table.row_number(1), Some(4));
    }

    #[test]
    fn test_read_csv_rejects_overwide_row() {
        let file = csv_file("학번,이름,비고
2023001,홍길동,장학생
2023002,김철수,장비, 소모품
");
        let err = FileReader::default().read(file.path()).unwrap_err();

        assert!(matches!(err, IngestError::FileFormat(_)));
        assert_eq!(
            err.to_string(),
            "Error reading file: Expected 3 fields in line 3, saw 4"
        );
    }

    #[test]
    fn test_read_csv_pads_short_row() {
        let file = csv_file("학번,이름,비고
2023001,홍길동
");
        let table = FileReader::default().read(file.path()).unwrap();

        assert_eq!(table.rows[0].len(), 3);
        assert_eq!(table.rows[0][2], CellValue::Missing);
    }

    #[test]
    fn test_read_headers_only() {
        let file = csv_file("평가년도,단과대학\n\"unterminated");
        let headers = FileReader::default().read_headers(file.path()).unwrap();
        assert_eq!(headers, vec!["평가년도", "단과대학"]);
    }

    #[test]
    fn test_missing_file() {
        let err = FileReader::default()
            .read(Path::new("/nonexistent/dir/data.csv"))
            .unwrap_err();
        assert!(matches!(err, IngestError::FileNotFound(_)));
        assert!(err.to_string().starts_with("File not found: "));
    }

    #[test]
    fn test_corrupt_xlsx_is_format_error() {
        let mut file = Builder::new().suffix(".xlsx").tempfile().unwrap();
        file.write_all(b"this is not a zip archive").unwrap();
        file.flush().unwrap();

        let err = FileReader::default().read(file.path()).unwrap_err();
        assert!(matches!(err, IngestError::FileFormat(_)));
        assert!(err.to_string().starts_with("Error reading file: "));
    }

    #[test]
    fn test_invalid_utf8_csv_is_format_error() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(b"a,b\n\xff\xfe,1\n").unwrap();
        file.flush().unwrap();

        let err = FileReader::default().read(file.path()).unwrap_err();
        assert!(matches!(err, IngestError::FileFormat(_)));
    }

    fn fixture(name: &str) -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    #[test]
    fn test_read_xlsx_typed_cells() {
        let table = FileReader::default()
            .read(&fixture("department_kpi.xlsx"))
            .unwrap();

        assert_eq!(table.columns.len(), 8);
        assert_eq!(table.columns[0], "평가년도");
        // 第 4 行为空行
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.row_number(0), Some(2));
        assert_eq!(table.row_number(2), Some(5));

        assert_eq!(table.rows[0][0], CellValue::Float(2023.0));
        assert_eq!(table.rows[0][2], CellValue::Text("컴퓨터공학과".to_string()));
        assert_eq!(table.rows[0][3], CellValue::Float(85.5));
        // #DIV/0! 读为缺失
        assert_eq!(table.rows[2][3], CellValue::Missing);
    }

    #[test]
    fn test_read_xlsx_date_cells() {
        let table = FileReader::default()
            .read(&fixture("publications.xlsx"))
            .unwrap();

        let expected = NaiveDate::from_ymd_opt(2023, 3, 15)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        assert_eq!(table.rows[0][1], CellValue::DateTime(expected));
        assert_eq!(table.rows[1][9], CellValue::Missing);
        assert_eq!(table.rows[2][1], CellValue::Text("2023/07/20".to_string()));
    }

    #[test]
    fn test_read_headers_xlsx() {
        let headers = FileReader::default()
            .read_headers(&fixture("students.xlsx"))
            .unwrap();
        assert_eq!(
            headers,
            vec!["학번", "이름", "단과대학", "학과", "학년", "과정구분", "학적상태", "성별", "입학년도"]
        );

        let err = FileReader::default()
            .read_headers(&fixture("missing.xlsx"))
            .unwrap_err();
        assert!(matches!(err, IngestError::FileNotFound(_)));
    }
}

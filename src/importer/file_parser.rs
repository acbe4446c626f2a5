// ==========================================
// 订单分组汇总系统 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// 输出: RawTable（表头 = 第 1 行; 行号从 2 开始,与表格软件一致）
// 说明: 完全空白的行被跳过,但不影响其余行的行号
// ==========================================

use crate::domain::table::{RawRecord, RawTable};
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

// ==========================================
// TableParser Trait
// ==========================================
// 实现者: CsvParser, ExcelParser
pub trait TableParser: Send + Sync {
    /// 解析文件为原始表
    ///
    /// # 参数
    /// - file_path: 文件路径
    /// - sheet: 工作表名（None 表示第一个工作表; CSV 忽略此参数）
    fn parse_table(&self, file_path: &Path, sheet: Option<&str>) -> ImportResult<RawTable>;
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

fn clean_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_string()
}

/// 组装一行记录；完全空白时返回 None
fn build_record(
    headers: &[String],
    values: impl Iterator<Item = String>,
    row_number: usize,
) -> Option<RawRecord> {
    let mut cells = HashMap::new();
    for (header, value) in headers.iter().zip(values) {
        if header.is_empty() {
            continue;
        }
        cells.insert(header.clone(), value.trim().to_string());
    }

    if cells.values().all(|v| v.is_empty()) {
        return None;
    }

    Some(RawRecord { row_number, cells })
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl TableParser for CsvParser {
    fn parse_table(&self, file_path: &Path, _sheet: Option<&str>) -> ImportResult<RawTable> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader.headers()?.iter().map(clean_header).collect();
        let mut table = RawTable::new(headers.iter().filter(|h| !h.is_empty()).cloned().collect());

        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            let row_number = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(idx + 2);

            let values = record.iter().map(str::to_string);
            if let Some(raw) = build_record(&headers, values, row_number) {
                table.push(raw);
            }
        }

        tracing::debug!(
            path = %file_path.display(),
            rows = table.len(),
            "CSV 解析完成"
        );

        Ok(table)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl TableParser for ExcelParser {
    fn parse_table(&self, file_path: &Path, sheet: Option<&str>) -> ImportResult<RawTable> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)?;

        let sheet_names = workbook.sheet_names();
        let sheet_name = match sheet {
            Some(name) => {
                if !sheet_names.iter().any(|s| s == name) {
                    return Err(ImportError::SheetNotFound(name.to_string()));
                }
                name.to_string()
            }
            None => sheet_names
                .first()
                .cloned()
                .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?,
        };

        let range = workbook.worksheet_range(&sheet_name)?;
        // 工作表可能不从 A1 开始
        let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);

        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError(format!("工作表 {} 无数据行", sheet_name)))?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| clean_header(&cell.to_string()))
            .collect();
        let mut table = RawTable::new(headers.iter().filter(|h| !h.is_empty()).cloned().collect());

        for (idx, data_row) in rows.enumerate() {
            // 表头位于 first_row + 1（1 基），数据行依次向下
            let row_number = first_row + idx + 2;
            let values = data_row.iter().map(|cell| cell.to_string());
            if let Some(raw) = build_record(&headers, values, row_number) {
                table.push(raw);
            }
        }

        tracing::debug!(
            path = %file_path.display(),
            sheet = %sheet_name,
            rows = table.len(),
            "Excel 解析完成"
        );

        Ok(table)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(
        &self,
        file_path: P,
        sheet: Option<&str>,
    ) -> ImportResult<RawTable> {
        let path = file_path.as_ref();
        match extension_of(path).as_str() {
            "csv" => CsvParser.parse_table(path, sheet),
            "xlsx" | "xls" => ExcelParser.parse_table(path, sheet),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }

    /// 解析可缺失的文件（文件不存在时返回 None）
    pub fn parse_optional<P: AsRef<Path>>(
        &self,
        file_path: P,
        sheet: Option<&str>,
    ) -> ImportResult<Option<RawTable>> {
        let path = file_path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        self.parse(path, sheet).map(Some)
    }
}

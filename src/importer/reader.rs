// ==========================================
// 多仓库存分析系统 - 文件解析器
// ==========================================
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// 输出: 表头 + "列名 → 原始文字" 行映射
// ==========================================

use crate::importer::error::{LoadError, LoadResult};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

// ==========================================
// RawTable - 原始表格
// ==========================================

/// 解析后的原始表格: 有序表头 + 行映射
///
/// 单元格一律以去空白后的文字承载,类型转换由归一化层负责
#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<HashMap<String, String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<HashMap<String, String>>) -> Self {
        Self { headers, rows }
    }
}

// ==========================================
// 通用入口（根据扩展名自动选择）
// ==========================================

/// 解析文件为原始表格
pub fn read_table<P: AsRef<Path>>(path: P) -> LoadResult<RawTable> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(LoadError::FileNotFound(path.display().to_string()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" => read_csv_table(path),
        "xlsx" | "xls" => read_excel_table(path),
        _ => Err(LoadError::UnsupportedFormat(ext)),
    }
}

// ==========================================
// CSV 解析
// ==========================================

fn read_csv_table(path: &Path) -> LoadResult<RawTable> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // 允许行长度不一致
        .from_reader(file);

    // 读取表头 (去空白,与 Excel 侧口径一致)
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut row_map = HashMap::new();

        for (col_idx, value) in record.iter().enumerate() {
            if let Some(header) = headers.get(col_idx) {
                if header.is_empty() {
                    continue;
                }
                row_map.insert(header.clone(), value.trim().to_string());
            }
        }

        // 跳过完全空白的行
        if row_map.values().all(|v| v.is_empty()) {
            continue;
        }

        rows.push(row_map);
    }

    Ok(RawTable::new(headers, rows))
}

// ==========================================
// Excel 解析
// ==========================================

fn read_excel_table(path: &Path) -> LoadResult<RawTable> {
    let mut workbook = open_workbook_auto(path)?;

    // 读取第一个 sheet
    let sheet_names = workbook.sheet_names().to_owned();
    let sheet_name = sheet_names
        .first()
        .cloned()
        .ok_or_else(|| LoadError::ExcelParse("Excel 文件无工作表".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| LoadError::ExcelParse(e.to_string()))?;

    // 提取表头（第一行）
    let mut sheet_rows = range.rows();
    let header_row = sheet_rows.next().ok_or(LoadError::EmptyFile)?;

    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();

    // 读取数据行
    let mut rows = Vec::new();
    for data_row in sheet_rows {
        let mut row_map = HashMap::new();

        for (col_idx, cell) in data_row.iter().enumerate() {
            if let Some(header) = headers.get(col_idx) {
                if header.is_empty() {
                    continue;
                }
                row_map.insert(header.clone(), cell.to_string().trim().to_string());
            }
        }

        // 跳过完全空白的行
        if row_map.values().all(|v| v.is_empty()) {
            continue;
        }

        rows.push(row_map);
    }

    Ok(RawTable::new(headers, rows))
}

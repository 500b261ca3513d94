// ==========================================
// SEFG 401(K) 季报生成系统 - 表格文件解析器
// ==========================================
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// 红线: 列序与行序必须与源文件一致
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook, Reader, Xlsx};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

// ==========================================
// 原始表 (Raw Table)
// ==========================================
// 表头与单元格均已剥离首尾空白,行内单元格数补齐到表头宽度
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub source: String,
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// number 为源文件中的数据行号 (表头后第一行为 1,空行也占号)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub number: usize,
    pub cells: Vec<String>,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// 查找必需列,缺失即报错
    pub fn require_column(&self, name: &str) -> ImportResult<usize> {
        self.column_index(name)
            .ok_or_else(|| ImportError::MissingColumn {
                file: self.source.clone(),
                column: name.to_string(),
            })
    }
}

/// 表格解析器接口
pub trait TableParser {
    fn parse_table(&self, file_path: &Path) -> ImportResult<RawTable>;
}

// 补齐/截断到表头宽度
fn normalize_cells(cells: Vec<String>, width: usize) -> Vec<String> {
    let mut cells = cells;
    cells.truncate(width);
    cells.resize(width, String::new());
    cells
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl TableParser for CsvParser {
    fn parse_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        let path = file_path;

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 打开 CSV 文件
        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        // 读取表头
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(ImportError::EmptyHeader(path.display().to_string()));
        }

        // 读取所有行
        let mut rows = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            let cells: Vec<String> = record.iter().map(|v| v.trim().to_string()).collect();

            // 跳过完全空白的行
            if cells.iter().all(|v| v.is_empty()) {
                continue;
            }

            rows.push(RawRow {
                number: row_idx + 1,
                cells: normalize_cells(cells, headers.len()),
            });
        }

        Ok(RawTable {
            source: path.display().to_string(),
            headers,
            rows,
        })
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl TableParser for ExcelParser {
    fn parse_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        let path = file_path;

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 打开 Excel 文件
        let mut workbook: Xlsx<_> = open_workbook(path)
            .map_err(|e: calamine::XlsxError| ImportError::ExcelParseError(e.to_string()))?;

        // 读取第一个 sheet
        let sheet_names = workbook.sheet_names();
        if sheet_names.is_empty() {
            return Err(ImportError::ExcelParseError(
                "Excel 文件无工作表".to_string(),
            ));
        }

        let sheet_name = sheet_names[0].clone();
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;

        // 提取表头（第一行）
        let mut range_rows = range.rows();
        let header_row = range_rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无数据行".to_string()))?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(ImportError::EmptyHeader(path.display().to_string()));
        }

        // 读取数据行
        let mut rows = Vec::new();
        for (row_idx, data_row) in range_rows.enumerate() {
            let cells: Vec<String> = data_row
                .iter()
                .map(|cell| cell.to_string().trim().to_string())
                .collect();

            // 跳过完全空白的行
            if cells.iter().all(|v| v.is_empty()) {
                continue;
            }

            rows.push(RawRow {
                number: row_idx + 1,
                cells: normalize_cells(cells, headers.len()),
            });
        }

        Ok(RawTable {
            source: path.display().to_string(),
            headers,
            rows,
        })
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<RawTable> {
        let path = file_path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => CsvParser.parse_table(path),
            "xlsx" | "xls" => ExcelParser.parse_table(path),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}

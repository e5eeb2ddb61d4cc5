// ==========================================
// 线索分配系统 - 文件解析器实现
// ==========================================
// 支持: CSV (text/csv) / Excel (.xlsx/.xls)
// 输出: 统一的 RawRow 序列（校验器与格式无关）
// ==========================================

use crate::domain::lead::{CellValue, HeaderIndex, RawRow};
use crate::importer::error::ParseError;
use crate::importer::lead_importer_trait::FileParser;
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::sync::Arc;
use tracing::debug;

pub const MIME_CSV: &str = "text/csv";
pub const MIME_XLS: &str = "application/vnd.ms-excel";
pub const MIME_XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

// ==========================================
// FileFormat - 调用方声明的文件格式
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileFormat {
    /// 分隔符文本（CSV）
    DelimitedText,
    /// 电子表格工作簿（仅读取第一个工作表）
    Workbook,
}

impl FileFormat {
    /// 按 MIME 类型判定
    pub fn from_mime_type(mime_type: &str) -> Option<Self> {
        match mime_type.trim().to_lowercase().as_str() {
            MIME_CSV => Some(FileFormat::DelimitedText),
            MIME_XLS | MIME_XLSX => Some(FileFormat::Workbook),
            _ => None,
        }
    }

    /// 按扩展名判定（CLI 使用）
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim().to_lowercase().as_str() {
            "csv" => Some(FileFormat::DelimitedText),
            "xlsx" | "xls" => Some(FileFormat::Workbook),
            _ => None,
        }
    }

    pub fn parser(self) -> Box<dyn FileParser> {
        match self {
            FileFormat::DelimitedText => Box::new(CsvParser),
            FileFormat::Workbook => Box::new(ExcelParser),
        }
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_rows(&self, bytes: &[u8]) -> Result<Vec<RawRow>, ParseError> {
        if bytes.is_empty() {
            return Err(ParseError::Empty);
        }

        // 严格模式: 字段数与表头不一致视为格式错误
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(bytes);

        // 读取表头
        let headers = Arc::new(HeaderIndex::from_cells(
            reader.headers()?.iter().enumerate(),
        ));
        if headers.is_empty() {
            return Err(ParseError::Empty);
        }

        // 读取所有行
        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let cells = record.iter().map(CellValue::from_text).collect();
            let mut row = RawRow::new(headers.clone(), cells);
            if let Some(pos) = record.position() {
                row = row.at_line(record_line(bytes, pos));
            }

            // 跳过完全空白的行
            if row.is_blank() {
                continue;
            }
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(ParseError::Empty);
        }

        debug!(rows = rows.len(), columns = headers.columns().len(), "CSV 解析完成");
        Ok(rows)
    }
}

/// 记录在源文件中的起始行号
///
/// csv 的 Position 在跳过空行之前取值，需补上记录前被跳过的换行数
fn record_line(bytes: &[u8], pos: &csv::Position) -> usize {
    let skipped = bytes
        .get(pos.byte() as usize..)
        .unwrap_or_default()
        .iter()
        .take_while(|b| matches!(b, b'\n' | b'\r'))
        .filter(|b| **b == b'\n')
        .count();
    pos.line() as usize + skipped
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_to_raw_rows(&self, bytes: &[u8]) -> Result<Vec<RawRow>, ParseError> {
        if bytes.is_empty() {
            return Err(ParseError::Empty);
        }

        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

        // 只读取第一个工作表
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(ParseError::NoWorksheet)??;

        let rows = rows_from_range(&range)?;
        debug!(rows = rows.len(), "Excel 解析完成");
        Ok(rows)
    }
}

/// 将工作表区域转换为 RawRow
///
/// 区域第一行为表头；非空表头单元格构成列名索引，之后每行按索引取值
/// 区域可能不从工作表第 1 行开始，行号按区域起点换算
pub fn rows_from_range(range: &Range<Data>) -> Result<Vec<RawRow>, ParseError> {
    let header_line = range.start().map_or(1, |(row, _)| row as usize + 1);
    let mut sheet_rows = range.rows();
    let header_row = sheet_rows.next().ok_or(ParseError::Empty)?;

    let headers = Arc::new(HeaderIndex::from_cells(
        header_row
            .iter()
            .enumerate()
            .map(|(idx, cell)| (idx, cell_to_value(cell).as_text())),
    ));
    if headers.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut rows = Vec::new();
    for (offset, data_row) in sheet_rows.enumerate() {
        let cells = data_row.iter().map(cell_to_value).collect();
        let row = RawRow::new(headers.clone(), cells).at_line(header_line + offset + 1);
        if row.is_blank() {
            continue;
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(rows)
}

fn cell_to_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::from_text(s),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        other => CellValue::from_text(&other.to_string()),
    }
}

// ==========================================
// 通用文件解析器（根据声明格式选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse(&self, bytes: &[u8], format: FileFormat) -> Result<Vec<RawRow>, ParseError> {
        format.parser().parse_to_raw_rows(bytes)
    }
}

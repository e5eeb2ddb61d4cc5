// ==========================================
// 线索分配系统 - 线索领域模型
// ==========================================
// 职责: 原始行（RawRow）与已校验线索（WorkItem）
// 红线: WorkItem 只能由校验器创建，创建后不可变
// ==========================================

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

// ==========================================
// CellValue - 单元格标量值
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    /// 由原始文本构造（TRIM 后为空视为 Empty）
    pub fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(trimmed.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }

    /// 转为文本；整数值的浮点数不带小数部分（表格中的纯数字电话）
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

// ==========================================
// HeaderIndex - 表头索引（小写列名 → 列号）
// ==========================================
// 每次解析只构建一次，所有行共享
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderIndex {
    columns: Vec<String>,
    positions: HashMap<String, usize>,
}

impl HeaderIndex {
    /// 从 (列号, 原始表头) 构建索引
    ///
    /// 空表头跳过；同名列以首次出现为准
    pub fn from_cells<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = (usize, S)>,
        S: AsRef<str>,
    {
        let mut index = HeaderIndex::default();
        for (col_idx, raw) in cells {
            let name = normalize_header(raw.as_ref());
            if name.is_empty() || index.positions.contains_key(&name) {
                continue;
            }
            index.columns.push(name.clone());
            index.positions.insert(name, col_idx);
        }
        index
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(&normalize_header(name)).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// 列名（小写，按表头顺序）
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_lowercase()
}

// ==========================================
// RawRow - 解析器输出的原始行
// ==========================================
// 生命周期: 解析器产出，校验后丢弃
// line: 源文件中的行号（1 起）；空白行被跳过后仍指向原始位置
#[derive(Debug, Clone)]
pub struct RawRow {
    headers: Arc<HeaderIndex>,
    cells: Vec<CellValue>,
    line: Option<usize>,
}

impl RawRow {
    pub fn new(headers: Arc<HeaderIndex>, cells: Vec<CellValue>) -> Self {
        Self {
            headers,
            cells,
            line: None,
        }
    }

    /// 记录源文件行号
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn line(&self) -> Option<usize> {
        self.line
    }

    /// 按列名取值（大小写不敏感）
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.headers
            .position(column)
            .and_then(|idx| self.cells.get(idx))
    }

    /// 本行可见的列名（即表头列名）
    pub fn keys(&self) -> &[String] {
        self.headers.columns()
    }

    pub fn headers(&self) -> &HeaderIndex {
        &self.headers
    }

    /// 映射到表头的所有单元格均为空
    pub fn is_blank(&self) -> bool {
        self.keys()
            .iter()
            .all(|k| self.get(k).map_or(true, CellValue::is_empty))
    }
}

// ==========================================
// WorkItem - 已校验线索
// ==========================================
// 只序列化不反序列化: 外部数据必须经过校验器才能成为 WorkItem
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    first_name: String,
    phone: String,
    notes: String,
}

impl WorkItem {
    /// 仅供校验器调用
    pub(crate) fn new_validated(first_name: String, phone: String, notes: String) -> Self {
        Self {
            first_name,
            phone,
            notes,
        }
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }
}

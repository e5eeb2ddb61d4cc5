// ==========================================
// 线索分配系统 - 名单校验器实现
// ==========================================
// 规则: 必需表头 firstname/phone/notes（大小写不敏感）
//       notes 非空 → phone 非空 → phone 符合 E.164
// 策略: 首个违规行即终止，不返回部分结果
// ==========================================

use crate::domain::lead::{CellValue, RawRow, WorkItem};
use crate::importer::error::ValidationError;
use crate::importer::lead_importer_trait::RowValidator;
use regex::Regex;

pub const COL_FIRST_NAME: &str = "firstname";
pub const COL_PHONE: &str = "phone";
pub const COL_NOTES: &str = "notes";

/// 必需列（小写）
pub const REQUIRED_HEADERS: [&str; 3] = [COL_FIRST_NAME, COL_PHONE, COL_NOTES];

/// E.164: '+'，首位 1-9，其后 1-14 位 ASCII 数字
/// （regex 的 \d 会匹配全角等 Unicode 数字，这里显式写 [0-9]）
const PHONE_PATTERN: &str = r"^\+[1-9][0-9]{1,14}$";

pub struct LeadValidator {
    phone_regex: Regex,
}

impl LeadValidator {
    pub fn new() -> Self {
        Self {
            phone_regex: Regex::new(PHONE_PATTERN).expect("phone pattern is a valid regex"),
        }
    }

    pub fn is_valid_phone(&self, phone: &str) -> bool {
        self.phone_regex.is_match(phone)
    }

    /// 检查必需表头（仅依据第一行的列名）
    fn check_headers(&self, first: &RawRow) -> Result<(), ValidationError> {
        let missing: Vec<String> = REQUIRED_HEADERS
            .iter()
            .filter(|h| !first.headers().contains(h))
            .map(|h| h.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingHeaders { missing })
        }
    }

    fn validate_row(&self, row_index: usize, row: &RawRow) -> Result<WorkItem, ValidationError> {
        // 未记录行号时按“表头 + 连续数据行”推算
        let line = row.line().unwrap_or(row_index + 2);

        let notes = cell_text(row, COL_NOTES);
        if notes.trim().is_empty() {
            return Err(ValidationError::EmptyNotes { row_index, line });
        }

        let phone = cell_text(row, COL_PHONE);
        if phone.is_empty() {
            return Err(ValidationError::EmptyPhone { row_index, line });
        }
        if !self.is_valid_phone(&phone) {
            return Err(ValidationError::InvalidPhoneFormat {
                row_index,
                line,
                value: phone,
            });
        }

        Ok(WorkItem::new_validated(
            cell_text(row, COL_FIRST_NAME),
            phone,
            notes,
        ))
    }
}

impl Default for LeadValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl RowValidator for LeadValidator {
    fn validate(&self, rows: &[RawRow]) -> Result<Vec<WorkItem>, ValidationError> {
        let first = match rows.first() {
            Some(row) => row,
            None => return Ok(Vec::new()),
        };
        self.check_headers(first)?;

        rows.iter()
            .enumerate()
            .map(|(idx, row)| self.validate_row(idx, row))
            .collect()
    }
}

fn cell_text(row: &RawRow, column: &str) -> String {
    row.get(column)
        .map(CellValue::as_text)
        .unwrap_or_default()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lead::HeaderIndex;
    use std::sync::Arc;

    fn rows(headers: &[&str], data: &[&[&str]]) -> Vec<RawRow> {
        let index = Arc::new(HeaderIndex::from_cells(headers.iter().copied().enumerate()));
        data.iter()
            .map(|cells| {
                RawRow::new(
                    index.clone(),
                    cells.iter().map(|c| CellValue::from_text(c)).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_phone_format() {
        let v = LeadValidator::new();
        assert!(v.is_valid_phone("+14155552671"));
        assert!(v.is_valid_phone("+12"));
        assert!(v.is_valid_phone("+123456789012345"));
        assert!(!v.is_valid_phone("4155552671"));
        assert!(!v.is_valid_phone("+0123456789"));
        assert!(!v.is_valid_phone("+1234567890123456"));
        assert!(!v.is_valid_phone("+1"));
        assert!(!v.is_valid_phone("+1 415 555 2671"));
        assert!(!v.is_valid_phone("+1415-555"));
        // 非 ASCII 数字
        assert!(!v.is_valid_phone("+1\u{0662}\u{0663}\u{0664}\u{0665}"));
        assert!(!v.is_valid_phone("+1\u{FF12}\u{FF13}\u{FF14}"));
        assert!(!v.is_valid_phone("+\u{FF11}4155552671"));
    }

    #[test]
    fn test_headers_case_insensitive() {
        let v = LeadValidator::new();
        let data: &[&[&str]] = &[&["Ada", "+14155552671", "call"]];
        let upper = v.validate(&rows(&["FirstName", "Phone", "Notes"], data)).unwrap();
        let lower = v.validate(&rows(&["firstname", "phone", "notes"], data)).unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper[0].first_name(), "Ada");
        assert_eq!(upper[0].phone(), "+14155552671");
        assert_eq!(upper[0].notes(), "call");
    }

    #[test]
    fn test_missing_headers_listed() {
        let v = LeadValidator::new();
        let err = v
            .validate(&rows(&["FirstName", "mobile"], &[&["Ada", "+14155552671"]]))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingHeaders {
                missing: vec!["phone".to_string(), "notes".to_string()]
            }
        );
    }

    #[test]
    fn test_fail_fast_on_first_invalid_row() {
        let v = LeadValidator::new();
        let data: &[&[&str]] = &[
            &["A", "+14155552671", "n"],
            &["B", "+14155552672", "n"],
            &["C", "4155552673", "n"],
            &["D", "", ""],
        ];
        let err = v
            .validate(&rows(&["firstname", "phone", "notes"], data))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidPhoneFormat {
                row_index: 2,
                line: 4,
                value: "4155552673".to_string()
            }
        );
    }

    #[test]
    fn test_notes_checked_before_phone() {
        let v = LeadValidator::new();
        let err = v
            .validate(&rows(&["firstname", "phone", "notes"], &[&["A", "", "   "]]))
            .unwrap_err();
        assert_eq!(err, ValidationError::EmptyNotes { row_index: 0, line: 2 });

        let err = v
            .validate(&rows(&["firstname", "phone", "notes"], &[&["A", "", "x"]]))
            .unwrap_err();
        assert_eq!(err, ValidationError::EmptyPhone { row_index: 0, line: 2 });
    }

    #[test]
    fn test_error_reports_source_line() {
        let v = LeadValidator::new();
        let index = Arc::new(HeaderIndex::from_cells(
            ["firstname", "phone", "notes"].into_iter().enumerate(),
        ));
        // 源文件第 3 行为空白行，已被解析器跳过
        let data = vec![
            RawRow::new(
                index.clone(),
                ["A", "+14155550001", "x"].iter().map(|c| CellValue::from_text(c)).collect(),
            )
            .at_line(2),
            RawRow::new(
                index,
                ["B", "4155550002", "y"].iter().map(|c| CellValue::from_text(c)).collect(),
            )
            .at_line(4),
        ];

        let err = v.validate(&data).unwrap_err();
        assert_eq!(err.row_index(), Some(1));
        assert_eq!(err.line(), Some(4));
        assert!(err.to_string().contains("第 4 行"));
    }

    #[test]
    fn test_first_name_may_be_empty() {
        let v = LeadValidator::new();
        let items = v
            .validate(&rows(&["firstname", "phone", "notes"], &[&["", "+447911123456", "x"]]))
            .unwrap();
        assert_eq!(items[0].first_name(), "");
    }

    #[test]
    fn test_order_preserved() {
        let v = LeadValidator::new();
        let data: &[&[&str]] = &[
            &["1", "+14155552671", "A"],
            &["2", "+14155552672", "B"],
            &["3", "+14155552673", "C"],
        ];
        let items = v
            .validate(&rows(&["notes", "phone", "firstname"], data))
            .unwrap();
        let names: Vec<&str> = items.iter().map(|i| i.first_name()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }
}

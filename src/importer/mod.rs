// ==========================================
// 线索分配系统 - 导入层
// ==========================================
// 职责: 上传文件 → RawRow → WorkItem → 分配 → 落库
// 支持: CSV, Excel (xlsx/xls)
// ==========================================

// 模块声明
pub mod error;
pub mod file_parser;
pub mod lead_importer_impl;
pub mod lead_importer_trait;
pub mod lead_validator;

// 重导出核心类型
pub use error::{ImportResult, ParseError, PipelineError, ValidationError};
pub use file_parser::{CsvParser, ExcelParser, FileFormat, UniversalFileParser};
pub use lead_importer_impl::LeadImporterImpl;
pub use lead_validator::LeadValidator;

// 重导出 Trait 接口
pub use lead_importer_trait::{FileParser, LeadImporter, RowValidator, UploadedFile};

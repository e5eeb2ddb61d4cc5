// ==========================================
// 线索分配系统 - API 层
// ==========================================
// 职责: 面向调用方（CLI/HTTP 等）的薄封装与错误转换
// ==========================================

pub mod error;
pub mod upload_api;

pub use error::{ApiError, ApiResult};
pub use upload_api::{UploadApi, UploadListResponse};

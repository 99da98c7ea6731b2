//! 工具模块 - 通用工具函数和类型
//!
//! - [`AppError`] - 应用错误类型 (from shared::error)
//! - [`ErrorBody`] - 错误响应体 (from shared::error)
//! - 日志初始化、请求参数

pub mod logger;
pub mod types;

pub use shared::error::{AppError, AppResult, ErrorBody, ErrorCategory, ErrorCode};

//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] - 应用错误类型与 HTTP 映射
//! - [`geo`] - 大圆距离计算
//! - [`time`] - 业务时区时间工具
//! - 日志、校验等工具

pub mod error;
pub mod geo;
pub mod logger;
pub mod time;
pub mod validation;

pub use error::{AppError, AppResponse, AppResult, ok};

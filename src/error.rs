//! # 统一错误处理模块
//!
//! 定义 fwdxrd 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// fwdxrd 统一错误类型
#[derive(Error, Debug)]
pub enum FwdxrdError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("Missing parameter '{key}' in instrument file")]
    MissingParameter { key: String },

    #[error("Invalid value for parameter '{key}': {value}")]
    InvalidParameter { key: String, value: String },

    // ─────────────────────────────────────────────────────────────
    // 几何/输入校验错误
    // ─────────────────────────────────────────────────────────────
    #[error("Grain {index}: orientation matrix is not a proper rotation ({reason})")]
    InvalidOrientation { index: usize, reason: String },

    #[error("Peak table columns have mismatched lengths: {detail}")]
    ColumnMismatch { detail: String },

    #[error("Invalid scan window: {0}")]
    InvalidScanWindow(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("Plot error: {0}")]
    PlotError(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, FwdxrdError>;

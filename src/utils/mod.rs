//! # 工具模块
//!
//! 终端输出与进度条工具。
//!
//! ## 依赖关系
//! - 被 `commands/` 与 `batch/` 使用

pub mod output;
pub mod progress;

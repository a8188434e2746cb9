//! # 晶粒批量处理模块
//!
//! 正向计算按晶粒相互独立，适合并行：本模块提供跨晶粒的
//! 并行执行器与进度反馈。
//!
//! ## 依赖关系
//! - 被各命令模块使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度

pub mod runner;

pub use runner::GrainRunner;

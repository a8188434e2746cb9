//! # 解析器模块
//!
//! 提供仪器参数文件、晶粒表文件与观测峰 CSV 的读写。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: par, grains, peaks

pub mod grains;
pub mod par;
pub mod peaks;

pub use grains::parse_grain_file;
pub use par::parse_par_file;
pub use peaks::{read_peaks_csv, write_peaks_csv};

//! # 数据模型模块
//!
//! 定义晶粒、晶胞、仪器参数与观测峰表的数据模型。
//!
//! ## 依赖关系
//! - 被 `forward/`、`matching/`、`parsers/` 和 `commands/` 使用
//! - 子模块: cell, grain, instrument, peaks

pub mod cell;
pub mod grain;
pub mod instrument;
pub mod peaks;

pub use cell::UnitCell;
pub use grain::Grain;
pub use instrument::{BeamStop, Instrument, ECONST};
pub use peaks::{PeakRecord, PeakTable};

//! # 正向衍射模拟模块
//!
//! 从晶粒取向、位置与晶胞出发，预测样品旋转过程中衍射斑
//! 落在平板探测器上的位置。
//!
//! ## 子模块
//! - `hkl`: 反射（hkl 晶面族）枚举
//! - `projector`: 衍射束到探测器平面的投影与命中判定
//! - `simulate`: 正向模拟驱动器
//! - `export`: 模拟事件导出
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `geometry/` 与 `models/`

pub mod export;
pub mod hkl;
pub mod projector;
pub mod simulate;

pub use export::events_to_csv;
pub use hkl::Reflection;
pub use projector::DetectorHit;
pub use simulate::{forward_simulate, DiffractionEvent, ScanWindow, Simulation};

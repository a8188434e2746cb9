//! # 几何基元模块
//!
//! 提供实验室坐标系下的旋转矩阵与 Bragg 条件的 omega 角求解。
//!
//! 实验室坐标约定：x 沿入射 X 射线方向，y 水平指向同步辐射环外侧，
//! z 竖直向上（右手系）。样品绕 z 轴旋转。
//!
//! ## 子模块
//! - `rotation`: 旋转矩阵构造、象限求角、3×3 矩阵/向量运算
//! - `omega`: Bragg 条件的旋转角求解器
//!
//! ## 依赖关系
//! - 被 `forward/` 模块使用
//! - 无外部模块依赖

pub mod omega;
pub mod rotation;

pub use omega::{find_omega, wrap_into_scan};
pub use rotation::{angle_from_cos_sin, omega_matrix, tilt_matrix};

//! # 峰匹配模块
//!
//! 把观测峰表与正向模拟事件在 (omega, 2θ, fc, sc) 四维上做
//! 容差匹配，并提供峰集合的过滤与差集工具。
//!
//! ## 子模块
//! - `matcher`: 观测峰 × 模拟事件的稠密全对匹配与完备度
//! - `setops`: 强度过滤、容差差集、按晶粒过滤、多晶粒清理
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/peaks.rs` 与 `forward/simulate.rs`

pub mod matcher;
pub mod setops;

pub use matcher::{find_matching_peaks, MatchOutcome};
pub use setops::{filter_for_grain, remove_unmatched_peaks, remove_weak_peaks, set_difference};

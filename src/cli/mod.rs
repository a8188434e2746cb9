//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `simulate`: 晶粒正向衍射模拟
//! - `match`: 模拟事件与观测峰匹配
//! - `peaks`: 峰表工具（嵌套子命令）
//!   - `filter`: 按强度过滤
//!   - `diff`: 两张峰表的对称差
//!   - `grain`: 按晶粒编号提取
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: simulate, match_peaks, peaks

pub mod match_peaks;
pub mod peaks;
pub mod simulate;

use clap::{Parser, Subcommand};

/// fwdxrd - 三维 X 射线衍射正向模拟与峰匹配工具
#[derive(Parser)]
#[command(name = "fwdxrd")]
#[command(version)]
#[command(about = "Forward diffraction simulation and peak matching for 3DXRD", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Simulate forward diffraction events for a grain map
    Simulate(simulate::SimulateArgs),

    /// Match simulated events against an observed peak table
    #[command(name = "match")]
    Match(match_peaks::MatchArgs),

    /// Peak table utilities (filter, diff, grain extraction)
    Peaks(peaks::PeaksArgs),
}

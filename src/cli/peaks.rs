//! # peaks 子命令 CLI 定义
//!
//! 峰表工具统一入口，包含多个子命令：
//! - `filter`: 按积分强度阈值过滤弱峰
//! - `diff`: 按容差求两张峰表的对称差
//! - `grain`: 按晶粒编号提取子表
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/peaks.rs`

use clap::{Args, Subcommand};
use std::path::PathBuf;

/// peaks 主命令参数
#[derive(Args, Debug)]
pub struct PeaksArgs {
    #[command(subcommand)]
    pub command: PeaksCommands,
}

/// peaks 子命令
#[derive(Subcommand, Debug)]
pub enum PeaksCommands {
    /// Remove weak peaks below an intensity threshold
    Filter(FilterArgs),

    /// Compute the symmetric difference of two peak tables
    Diff(DiffArgs),

    /// Extract the peaks assigned to one grain
    Grain(GrainArgs),
}

/// filter 子命令参数
#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Input peak table CSV
    pub input: PathBuf,

    /// Output peak table CSV
    #[arg(short, long)]
    pub output: PathBuf,

    /// Absolute intensity threshold (default: percentile-based)
    #[arg(long)]
    pub thres: Option<f64>,

    /// Percentile used when no absolute threshold is given
    #[arg(long, default_value_t = 20.0)]
    pub percent: f64,
}

/// diff 子命令参数
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// First peak table CSV
    pub a: PathBuf,

    /// Second peak table CSV
    pub b: PathBuf,

    /// Per-column tolerance on omega, dty, fc and sc
    #[arg(long, default_value_t = 0.001)]
    pub tol: f64,

    /// Output CSV for peaks only in the first table
    #[arg(long, default_value = "only_a.csv")]
    pub out_a: PathBuf,

    /// Output CSV for peaks only in the second table
    #[arg(long, default_value = "only_b.csv")]
    pub out_b: PathBuf,
}

/// grain 子命令参数
#[derive(Args, Debug)]
pub struct GrainArgs {
    /// Input peak table CSV
    pub input: PathBuf,

    /// Output peak table CSV
    #[arg(short, long)]
    pub output: PathBuf,

    /// Grain id to extract
    #[arg(long)]
    pub grain_id: i64,
}

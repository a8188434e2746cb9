//! # simulate 子命令 CLI 定义
//!
//! 对晶粒图中的每个晶粒做正向衍射模拟，导出逐晶粒事件表。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/simulate.rs`

use clap::Args;
use std::path::PathBuf;

/// simulate 子命令参数
#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Instrument geometry parameter file (key-value .par format)
    #[arg(short, long)]
    pub par: PathBuf,

    /// Grain map file (u/b matrices and translations)
    #[arg(short, long)]
    pub grains: PathBuf,

    /// Maximum scattering vector length 1/d in 1/Å (default: largest ds reaching the detector)
    #[arg(long)]
    pub dsmax: Option<f64>,

    /// Rotation scan start in degrees
    #[arg(long, default_value_t = -90.0)]
    pub omega_start: f64,

    /// Rotation scan end in degrees (exclusive)
    #[arg(long, default_value_t = 90.0)]
    pub omega_end: f64,

    /// Rotation step in degrees
    #[arg(long, default_value_t = 0.05)]
    pub omega_step: f64,

    /// Output directory for per-grain event CSV files
    #[arg(short, long, default_value = "fwd_out")]
    pub output: PathBuf,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,
}

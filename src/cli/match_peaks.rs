//! # match 子命令 CLI 定义
//!
//! 正向模拟叠加峰匹配：对每个晶粒模拟事件，再与观测峰表按
//! (omega, tth, fc, sc) 容差匹配，报告完整度。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/match_peaks.rs`

use clap::Args;
use std::path::PathBuf;

/// match 子命令参数
#[derive(Args, Debug)]
pub struct MatchArgs {
    /// Observed peak table (CSV with omega, dty, tth, fc, sc, sum_intensity)
    #[arg(long)]
    pub peaks: PathBuf,

    /// Grain map file (u/b matrices and translations)
    #[arg(short, long)]
    pub grains: PathBuf,

    /// Instrument geometry parameter file (key-value .par format)
    #[arg(short, long)]
    pub par: PathBuf,

    /// Maximum scattering vector length 1/d in 1/Å (default: largest ds reaching the detector)
    #[arg(long)]
    pub dsmax: Option<f64>,

    /// Angular tolerance for omega and two-theta, in degrees
    #[arg(long, default_value_t = 1.0)]
    pub tol_angle: f64,

    /// Pixel tolerance for detector fast/slow coordinates
    #[arg(long, default_value_t = 10.0)]
    pub tol_pixel: f64,

    /// Intensity threshold for pre-filtering weak peaks (default: keep all)
    #[arg(long)]
    pub thres_int: Option<f64>,

    /// Rotation scan start in degrees (default: min observed omega - 0.1)
    #[arg(long)]
    pub omega_start: Option<f64>,

    /// Rotation scan end in degrees (default: max observed omega + 0.1)
    #[arg(long)]
    pub omega_end: Option<f64>,

    /// Rotation step in degrees
    #[arg(long, default_value_t = 0.05)]
    pub omega_step: f64,

    /// Output directory for matched peak tables
    #[arg(short, long, default_value = "match_out")]
    pub output: PathBuf,

    /// Write the residual table of peaks unmatched by any grain
    #[arg(long, default_value_t = false)]
    pub clean: bool,

    /// Write a sinogram PNG of observed and matched peaks
    #[arg(long)]
    pub plot: Option<PathBuf>,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,
}

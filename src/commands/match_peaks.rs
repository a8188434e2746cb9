//! # match 子命令实现
//!
//! 正向模拟叠加峰匹配：对每个晶粒并行模拟衍射事件，再与观测峰表
//! 按 (omega, tth, fc, sc) 容差匹配，逐晶粒导出匹配峰集并报告
//! 完整度。可选输出清理后的母表（剔除未被任何晶粒匹配的峰）与
//! 正弦图。
//!
//! ## 依赖关系
//! - 使用 `cli/match_peaks.rs` 定义的 MatchArgs
//! - 使用 `batch/` 模块进行并行处理
//! - 使用 `forward/` 与 `matching/` 模块
//! - 使用 `parsers/` 读取输入，`plot.rs` 绘制正弦图

use crate::batch::GrainRunner;
use crate::cli::match_peaks::MatchArgs;
use crate::error::{FwdxrdError, Result};
use crate::forward::{self, ScanWindow, Simulation};
use crate::matching::{self, MatchOutcome};
use crate::models::PeakTable;
use crate::parsers;
use crate::plot;
use crate::utils::output;

use std::fs;
use tabled::{Table, Tabled};

/// 清理与差集使用的峰坐标容差
const PEAK_IDENTITY_TOL: f64 = 1e-3;

/// 摘要表行
#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Grain")]
    grain: usize,
    #[tabled(rename = "Events")]
    events: usize,
    #[tabled(rename = "Hits")]
    hits: usize,
    #[tabled(rename = "Matched peaks")]
    matched: usize,
    #[tabled(rename = "Completeness")]
    completeness: String,
    #[tabled(rename = "Hit completeness")]
    hit_completeness: String,
}

/// 执行正向匹配
pub fn execute(args: MatchArgs) -> Result<()> {
    output::print_header("Forward Simulation and Peak Matching");

    let (instrument, cell) = parsers::parse_par_file(&args.par)?;
    let grains = parsers::parse_grain_file(&args.grains)?;
    let observed = parsers::read_peaks_csv(&args.peaks)?;

    if grains.is_empty() {
        output::print_warning("Grain map contains no grains, nothing to do");
        return Ok(());
    }

    output::print_info(&format!(
        "{} observed peaks, {} grains",
        observed.nrows(),
        grains.len()
    ));
    if let Some(thres) = args.thres_int {
        output::print_info(&format!(
            "Matched peaks with intensity <= {} will be dropped after matching",
            thres
        ));
    }

    let scan = scan_window(&args, &observed)?;
    let ds_max = args
        .dsmax
        .unwrap_or_else(|| instrument.ds_max_on_detector());

    output::print_info(&format!(
        "Scan [{}, {})° step {}°, ds_max {:.4} 1/Å, tol {}° / {} px",
        scan.start, scan.end, scan.step, ds_max, args.tol_angle, args.tol_pixel
    ));

    fs::create_dir_all(&args.output).map_err(|e| FwdxrdError::FileWriteError {
        path: args.output.display().to_string(),
        source: e,
    })?;

    let runner = GrainRunner::new(args.jobs);
    let results: Vec<Result<(Simulation, MatchOutcome)>> =
        runner.run(&grains, "Matching grains", |grain| {
            let sim = forward::forward_simulate(grain, &cell, &instrument, ds_max, &scan)?;
            let outcome =
                matching::find_matching_peaks(&observed, &sim.events, args.tol_angle, args.tol_pixel)?;
            Ok((sim, outcome))
        });

    let mut rows = Vec::with_capacity(grains.len());
    let mut matched_tables = Vec::with_capacity(grains.len());
    for (grain, result) in grains.iter().zip(results) {
        let (sim, outcome) = result?;

        // 完备度基于全部观测峰；强度阈值只收窄落盘的匹配峰集
        let mut matched = apply_intensity_filter(&outcome.matched_peaks, args.thres_int)?;
        for g in matched.grain_id.iter_mut() {
            *g = grain.id as i64;
        }
        let path = args.output.join(format!("grain_{}_matched.csv", grain.id));
        parsers::write_peaks_csv(&matched, &path)?;

        let hit_completeness = if sim.n_hits > 0 {
            format!("{:.3}", matched.nrows() as f64 / sim.n_hits as f64)
        } else {
            "-".to_string()
        };
        rows.push(SummaryRow {
            grain: grain.id,
            events: sim.events.len(),
            hits: sim.n_hits,
            matched: matched.nrows(),
            completeness: format!("{:.3}", outcome.completeness),
            hit_completeness,
        });
        matched_tables.push(matched);
    }

    println!("{}", Table::new(&rows));

    if args.clean {
        let cleaned = matching::remove_unmatched_peaks(&observed, &matched_tables, PEAK_IDENTITY_TOL)?;
        let path = args.output.join("cleaned_peaks.csv");
        parsers::write_peaks_csv(&cleaned, &path)?;
        output::print_info(&format!(
            "Cleaned table: {} of {} peaks matched by at least one grain -> '{}'",
            cleaned.nrows(),
            observed.nrows(),
            path.display()
        ));
    }

    if let Some(plot_path) = &args.plot {
        let mut panels: Vec<(String, &PeakTable)> = vec![("observed".to_string(), &observed)];
        for (grain, table) in grains.iter().zip(matched_tables.iter()) {
            panels.push((format!("grain {}", grain.id), table));
        }
        plot::plot_sinograms(&panels, plot_path)?;
        output::print_info(&format!("Sinogram written to '{}'", plot_path.display()));
    }

    output::print_success(&format!(
        "Wrote {} matched tables to '{}'",
        matched_tables.len(),
        args.output.display()
    ));

    Ok(())
}

/// 匹配后的强度过滤：弱峰可以参与匹配并计入完备度，
/// 只在落盘前从匹配峰集中剔除
fn apply_intensity_filter(matched: &PeakTable, thres: Option<f64>) -> Result<PeakTable> {
    match thres {
        Some(t) => matching::remove_weak_peaks(matched, Some(t), 0.0),
        None => Ok(matched.clone()),
    }
}

/// 扫描窗口：未显式给出时由观测 omega 范围外扩 0.1° 推得
fn scan_window(args: &MatchArgs, cf: &PeakTable) -> Result<ScanWindow> {
    let start = match args.omega_start {
        Some(s) => s,
        None => observed_omega_bound(cf, true)? - 0.1,
    };
    let end = match args.omega_end {
        Some(e) => e,
        None => observed_omega_bound(cf, false)? + 0.1,
    };
    ScanWindow::new(start, end, args.omega_step)
}

fn observed_omega_bound(cf: &PeakTable, min: bool) -> Result<f64> {
    if cf.is_empty() {
        return Err(FwdxrdError::InvalidScanWindow(
            "peak table is empty, give --omega-start/--omega-end explicitly".to_string(),
        ));
    }
    let fold = if min { f64::min } else { f64::max };
    let init = if min { f64::INFINITY } else { f64::NEG_INFINITY };
    Ok(cf.omega.iter().cloned().fold(init, fold))
}

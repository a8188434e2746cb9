//! # simulate 子命令实现
//!
//! 读取几何参数与晶粒图，对每个晶粒并行执行正向模拟，
//! 逐晶粒导出事件表并打印统计摘要。
//!
//! ## 依赖关系
//! - 使用 `cli/simulate.rs` 定义的 SimulateArgs
//! - 使用 `batch/` 模块进行并行处理
//! - 使用 `forward/` 模块进行模拟与导出
//! - 使用 `parsers/` 读取参数与晶粒图

use crate::batch::GrainRunner;
use crate::cli::simulate::SimulateArgs;
use crate::error::{FwdxrdError, Result};
use crate::forward::{self, ScanWindow, Simulation};
use crate::parsers;
use crate::utils::output;

use std::fs;
use tabled::{Table, Tabled};

/// 摘要表行
#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Grain")]
    grain: usize,
    #[tabled(rename = "Reflections")]
    reflections: usize,
    #[tabled(rename = "Families")]
    families: usize,
    #[tabled(rename = "Events")]
    events: usize,
    #[tabled(rename = "Hits")]
    hits: usize,
}

/// 执行正向模拟
pub fn execute(args: SimulateArgs) -> Result<()> {
    output::print_header("Forward Diffraction Simulation");

    let (instrument, cell) = parsers::parse_par_file(&args.par)?;
    let grains = parsers::parse_grain_file(&args.grains)?;

    if grains.is_empty() {
        output::print_warning("Grain map contains no grains, nothing to do");
        return Ok(());
    }

    let ds_max = args
        .dsmax
        .unwrap_or_else(|| instrument.ds_max_on_detector());
    let scan = ScanWindow::new(args.omega_start, args.omega_end, args.omega_step)?;

    output::print_info(&format!(
        "{} grains, scan [{}, {})° step {}°, ds_max {:.4} 1/Å",
        grains.len(),
        scan.start,
        scan.end,
        scan.step,
        ds_max
    ));

    fs::create_dir_all(&args.output).map_err(|e| FwdxrdError::FileWriteError {
        path: args.output.display().to_string(),
        source: e,
    })?;

    let runner = GrainRunner::new(args.jobs);
    let results: Vec<Result<Simulation>> = runner.run(&grains, "Simulating grains", |grain| {
        forward::forward_simulate(grain, &cell, &instrument, ds_max, &scan)
    });

    let mut rows = Vec::with_capacity(grains.len());
    for (grain, result) in grains.iter().zip(results) {
        let sim = result?;
        let path = args.output.join(format!("grain_{}_fwd.csv", grain.id));
        forward::events_to_csv(&sim.events, &path)?;

        rows.push(SummaryRow {
            grain: grain.id,
            reflections: sim.n_reflections,
            families: sim.n_families,
            events: sim.events.len(),
            hits: sim.n_hits,
        });
    }

    println!("{}", Table::new(&rows));
    output::print_success(&format!(
        "Wrote {} event tables to '{}'",
        rows.len(),
        args.output.display()
    ));

    Ok(())
}

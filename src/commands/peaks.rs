//! # peaks 子命令实现
//!
//! 峰表工具：强度过滤、容差差集与按晶粒提取。
//!
//! ## 依赖关系
//! - 使用 `cli/peaks.rs` 定义的参数
//! - 使用 `matching/setops.rs` 的集合操作
//! - 使用 `parsers/peaks.rs` 读写 CSV

use crate::cli::peaks::{DiffArgs, FilterArgs, GrainArgs, PeaksArgs, PeaksCommands};
use crate::error::Result;
use crate::matching;
use crate::parsers;
use crate::utils::output;

/// 执行峰表工具
pub fn execute(args: PeaksArgs) -> Result<()> {
    match args.command {
        PeaksCommands::Filter(args) => execute_filter(args),
        PeaksCommands::Diff(args) => execute_diff(args),
        PeaksCommands::Grain(args) => execute_grain(args),
    }
}

/// 按强度过滤弱峰
fn execute_filter(args: FilterArgs) -> Result<()> {
    output::print_header("Peak Intensity Filter");

    let cf = parsers::read_peaks_csv(&args.input)?;
    let filtered = matching::remove_weak_peaks(&cf, args.thres, args.percent)?;
    parsers::write_peaks_csv(&filtered, &args.output)?;

    let how = match args.thres {
        Some(t) => format!("threshold {}", t),
        None => format!("{}th percentile", args.percent),
    };
    output::print_success(&format!(
        "{} of {} peaks kept ({}) -> '{}'",
        filtered.nrows(),
        cf.nrows(),
        how,
        args.output.display()
    ));
    Ok(())
}

/// 两张峰表的对称差
fn execute_diff(args: DiffArgs) -> Result<()> {
    output::print_header("Peak Table Difference");

    let cf_a = parsers::read_peaks_csv(&args.a)?;
    let cf_b = parsers::read_peaks_csv(&args.b)?;

    let (only_a, only_b) = matching::set_difference(&cf_a, &cf_b, args.tol)?;
    parsers::write_peaks_csv(&only_a, &args.out_a)?;
    parsers::write_peaks_csv(&only_b, &args.out_b)?;

    output::print_info(&format!(
        "'{}': {} peaks, {} unshared",
        args.a.display(),
        cf_a.nrows(),
        only_a.nrows()
    ));
    output::print_info(&format!(
        "'{}': {} peaks, {} unshared",
        args.b.display(),
        cf_b.nrows(),
        only_b.nrows()
    ));
    output::print_success(&format!(
        "Wrote '{}' and '{}'",
        args.out_a.display(),
        args.out_b.display()
    ));
    Ok(())
}

/// 按晶粒编号提取子表
fn execute_grain(args: GrainArgs) -> Result<()> {
    output::print_header("Grain Peak Extraction");

    let cf = parsers::read_peaks_csv(&args.input)?;
    let sub = matching::filter_for_grain(&cf, args.grain_id)?;
    parsers::write_peaks_csv(&sub, &args.output)?;

    if sub.is_empty() {
        output::print_warning(&format!("No peaks assigned to grain {}", args.grain_id));
    }
    output::print_success(&format!(
        "{} of {} peaks belong to grain {} -> '{}'",
        sub.nrows(),
        cf.nrows(),
        args.grain_id,
        args.output.display()
    ));
    Ok(())
}

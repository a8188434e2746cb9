//! # 正弦图绘制
//!
//! 使用 `plotters` 为观测峰表绘制正弦图（omega vs dty 散点，
//! 颜色编码 log10 积分强度）。多张表并排成列，便于对比母表与
//! 各晶粒的匹配峰集。
//!
//! ## 依赖关系
//! - 被 `commands/match_peaks.rs` 调用
//! - 使用 `models/peaks.rs` 的 PeakTable
//! - 使用 `plotters` 渲染图表

use crate::error::{FwdxrdError, Result};
use crate::models::PeakTable;

use plotters::prelude::*;
use std::path::Path;

/// 单块面板的像素尺寸
const PANEL_WIDTH: u32 = 600;
const PANEL_HEIGHT: u32 = 600;

/// 为一组峰表绘制并排正弦图，输出 PNG
pub fn plot_sinograms(panels: &[(String, &PeakTable)], output_path: &Path) -> Result<()> {
    if panels.is_empty() {
        return Err(FwdxrdError::InvalidArgument(
            "no peak tables to plot".to_string(),
        ));
    }

    let n = panels.len() as u32;
    let root = BitMapBackend::new(output_path, (PANEL_WIDTH * n, PANEL_HEIGHT))
        .into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| FwdxrdError::PlotError(format!("{:?}", e)))?;

    let areas = root.split_evenly((1, panels.len()));
    for ((title, table), area) in panels.iter().zip(areas.iter()) {
        draw_sinogram(area, title, table)?;
    }

    root.present()
        .map_err(|e| FwdxrdError::PlotError(e.to_string()))?;
    Ok(())
}

fn draw_sinogram<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    title: &str,
    table: &PeakTable,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let (omega_range, dty_range) = axis_ranges(table);

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 24).into_font())
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(omega_range, dty_range)
        .map_err(|e| FwdxrdError::PlotError(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .x_desc("omega (°)")
        .y_desc("dty (µm)")
        .x_label_style(("sans-serif", 14))
        .y_label_style(("sans-serif", 14))
        .draw()
        .map_err(|e| FwdxrdError::PlotError(format!("{:?}", e)))?;

    // log10 强度映射到颜色
    let logs: Vec<f64> = table
        .sum_intensity
        .iter()
        .map(|&i| i.max(1e-12).log10())
        .collect();
    let lo = logs.iter().cloned().fold(f64::INFINITY, f64::min);
    let hi = logs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let span = if (hi - lo).abs() < 1e-12 { 1.0 } else { hi - lo };

    chart
        .draw_series((0..table.nrows()).map(|i| {
            let t = (logs[i] - lo) / span;
            Circle::new((table.omega[i], table.dty[i]), 2, intensity_color(t).filled())
        }))
        .map_err(|e| FwdxrdError::PlotError(format!("{:?}", e)))?;

    Ok(())
}

/// 带边距的坐标范围；空表退回固定范围
fn axis_ranges(table: &PeakTable) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
    if table.is_empty() {
        return (-180.0..180.0, -1.0..1.0);
    }
    let pad = |lo: f64, hi: f64| {
        let margin = ((hi - lo) * 0.05).max(1e-6);
        (lo - margin)..(hi + margin)
    };
    let omega_lo = table.omega.iter().cloned().fold(f64::INFINITY, f64::min);
    let omega_hi = table.omega.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let dty_lo = table.dty.iter().cloned().fold(f64::INFINITY, f64::min);
    let dty_hi = table.dty.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    (pad(omega_lo, omega_hi), pad(dty_lo, dty_hi))
}

/// 三段线性渐变：暗紫 → 青绿 → 明黄
fn intensity_color(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    let stops: [(f64, (u8, u8, u8)); 3] = [
        (0.0, (68, 1, 84)),
        (0.5, (33, 145, 140)),
        (1.0, (253, 231, 37)),
    ];
    for pair in stops.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            let f = (t - t0) / (t1 - t0);
            let lerp = |a: u8, b: u8| (a as f64 + f * (b as f64 - a as f64)).round() as u8;
            return RGBColor(lerp(c0.0, c1.0), lerp(c0.1, c1.1), lerp(c0.2, c1.2));
        }
    }
    RGBColor(253, 231, 37)
}

//! # 峰集合工具
//!
//! 观测峰表的强度过滤、容差差集、按晶粒过滤与多晶粒清理。
//! 所有操作都遵循先复制再过滤的纪律，输入表从不被修改。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/peaks.rs`

use crate::error::{FwdxrdError, Result};
use crate::models::PeakTable;

/// 移除弱峰：强度不高于阈值的行被丢弃
///
/// 阈值可显式给出；缺省时取强度分布的 `percent` 百分位。
pub fn remove_weak_peaks(cf: &PeakTable, thres: Option<f64>, percent: f64) -> Result<PeakTable> {
    cf.validate()?;

    let thres = match thres {
        Some(t) => t,
        None => {
            if cf.is_empty() {
                return Ok(PeakTable::default());
            }
            percentile(&cf.sum_intensity, percent)?
        }
    };

    let mask: Vec<bool> = cf.sum_intensity.iter().map(|&i| i > thres).collect();
    cf.filter(&mask)
}

/// 线性插值百分位（与 numpy.percentile 的缺省行为一致）
fn percentile(values: &[f64], pct: f64) -> Result<f64> {
    if values.is_empty() {
        return Err(FwdxrdError::InvalidArgument(
            "percentile of empty set".to_string(),
        ));
    }
    if !(0.0..=100.0).contains(&pct) {
        return Err(FwdxrdError::InvalidArgument(format!(
            "percentile must lie in [0, 100], got {}",
            pct
        )));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;

    Ok(sorted[lo] * (1.0 - frac) + sorted[hi] * frac)
}

/// 两个峰表的容差差集
///
/// 在 (omega, dty, fc, sc) 四个量上同时落入 `tol` 的行对视为同一峰。
/// 返回 (仅在 cf1 中的行, 仅在 cf2 中的行)，均为保序副本。
pub fn set_difference(cf1: &PeakTable, cf2: &PeakTable, tol: f64) -> Result<(PeakTable, PeakTable)> {
    cf1.validate()?;
    cf2.validate()?;

    let mut mask1 = vec![true; cf1.nrows()];
    let mut mask2 = vec![true; cf2.nrows()];

    for i in 0..cf1.nrows() {
        for j in 0..cf2.nrows() {
            if (cf1.omega[i] - cf2.omega[j]).abs() < tol
                && (cf1.dty[i] - cf2.dty[j]).abs() < tol
                && (cf1.fc[i] - cf2.fc[j]).abs() < tol
                && (cf1.sc[i] - cf2.sc[j]).abs() < tol
            {
                mask1[i] = false;
                mask2[j] = false;
            }
        }
    }

    Ok((cf1.filter(&mask1)?, cf2.filter(&mask2)?))
}

/// 按晶粒归属标签过滤
pub fn filter_for_grain(cf: &PeakTable, grain_id: i64) -> Result<PeakTable> {
    cf.validate()?;
    let mask: Vec<bool> = cf.grain_id.iter().map(|&g| g == grain_id).collect();
    cf.filter(&mask)
}

/// 多晶粒清理：从母表中剔除所有未被任何晶粒匹配到的峰
///
/// 反复对母表做差集，逐个剥离各晶粒的匹配峰集，剩下的即
/// "无归属"峰；再对母表与无归属峰做一次差集，得到清理后的表
/// （等效于全部晶粒匹配峰的并集）。
pub fn remove_unmatched_peaks(
    cf_strong: &PeakTable,
    matched: &[PeakTable],
    tol: f64,
) -> Result<PeakTable> {
    let mut cf_diff = cf_strong.clone();
    for cf_matched in matched {
        let (rest, _) = set_difference(&cf_diff, cf_matched, tol)?;
        cf_diff = rest;
    }

    let (cf_clean, _) = set_difference(cf_strong, &cf_diff, tol)?;
    Ok(cf_clean)
}

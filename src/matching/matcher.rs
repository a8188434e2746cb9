//! # 观测峰与模拟事件的匹配
//!
//! 稠密全对比较：观测峰与模拟事件在 omega、2θ（角容差）以及
//! fc、sc（像素容差）四个量上同时落入容差即记为一对匹配。
//! O(N_obs × N_events)，两个集合都以千计，可接受。
//!
//! 一个观测峰可以匹配多个事件，反之亦然；这种多对多歧义被保留
//! 而不以最近邻启发式消解，完备度按去重后的匹配事件数计。
//!
//! ## 依赖关系
//! - 被 `commands/match_peaks.rs` 调用
//! - 使用 `models/peaks.rs` 与 `forward/simulate.rs`

use crate::error::Result;
use crate::forward::simulate::DiffractionEvent;
use crate::models::PeakTable;

/// 匹配结果
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    /// 至少匹配到一个事件的观测峰（保序过滤副本）
    pub matched_peaks: PeakTable,
    /// 至少匹配到一个观测峰的事件（按事件索引去重、升序）
    pub matched_events: Vec<DiffractionEvent>,
    /// 全部匹配对 (观测峰行号, 事件索引)
    pub pairs: Vec<(usize, usize)>,
    /// 完备度 = 去重匹配事件数 / 事件总数，空输入时为 0
    pub completeness: f64,
}

/// 在观测峰表与事件列表之间寻找全部容差匹配对
///
/// `tol_angle` 同时作用于 omega 与 2θ（度），`tol_pixel` 分别作用
/// 于 fc 与 sc 两个像素轴。任一输入为空时返回空匹配集与完备度 0。
pub fn find_matching_peaks(
    cf: &PeakTable,
    events: &[DiffractionEvent],
    tol_angle: f64,
    tol_pixel: f64,
) -> Result<MatchOutcome> {
    cf.validate()?;

    if cf.is_empty() || events.is_empty() {
        return Ok(MatchOutcome::default());
    }

    let n_obs = cf.nrows();
    let mut peak_mask = vec![false; n_obs];
    let mut event_mask = vec![false; events.len()];
    let mut pairs = Vec::new();

    for i in 0..n_obs {
        for (j, ev) in events.iter().enumerate() {
            if (cf.omega[i] - ev.rot).abs() < tol_angle
                && (cf.tth[i] - ev.tth).abs() < tol_angle
                && (cf.fc[i] - ev.dety).abs() < tol_pixel
                && (cf.sc[i] - ev.detz).abs() < tol_pixel
            {
                peak_mask[i] = true;
                event_mask[j] = true;
                pairs.push((i, j));
            }
        }
    }

    let matched_peaks = cf.filter(&peak_mask)?;
    let matched_events: Vec<DiffractionEvent> = event_mask
        .iter()
        .zip(events.iter())
        .filter(|(m, _)| **m)
        .map(|(_, ev)| ev.clone())
        .collect();

    let completeness = matched_events.len() as f64 / events.len() as f64;

    Ok(MatchOutcome {
        matched_peaks,
        matched_events,
        pairs,
        completeness,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::peaks::PeakRecord;

    fn event(rot: f64, tth: f64, dety: f64, detz: f64) -> DiffractionEvent {
        DiffractionEvent {
            rot,
            hkl: [1, 0, 0],
            tth,
            gt: [0.0, 0.0, 0.0],
            dety,
            detz,
            dety_mm: 0.0,
            detz_mm: 0.0,
            hit: true,
        }
    }

    fn peak(omega: f64, tth: f64, fc: f64, sc: f64) -> PeakRecord {
        PeakRecord {
            omega,
            dty: 0.0,
            tth,
            fc,
            sc,
            sum_intensity: 100.0,
            grain_id: -1,
        }
    }

    #[test]
    fn test_basic_match() {
        let cf = PeakTable::from_records(vec![
            peak(10.0, 5.0, 1000.0, 1000.0),
            peak(50.0, 8.0, 200.0, 300.0),
        ]);
        let events = vec![
            event(10.2, 5.1, 1003.0, 998.0),
            event(-40.0, 12.0, 1500.0, 700.0),
        ];

        let out = find_matching_peaks(&cf, &events, 0.5, 10.0).unwrap();
        assert_eq!(out.pairs, vec![(0, 0)]);
        assert_eq!(out.matched_peaks.nrows(), 1);
        assert_eq!(out.matched_events.len(), 1);
        assert!((out.completeness - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_all_four_tolerances_required() {
        let cf = PeakTable::from_records(vec![peak(10.0, 5.0, 1000.0, 1000.0)]);
        // 只有 sc 超差
        let events = vec![event(10.0, 5.0, 1000.0, 1020.0)];
        let out = find_matching_peaks(&cf, &events, 0.5, 10.0).unwrap();
        assert!(out.pairs.is_empty());
        assert_eq!(out.completeness, 0.0);
    }

    #[test]
    fn test_empty_inputs_give_zero_completeness() {
        let cf = PeakTable::default();
        let events = vec![event(0.0, 5.0, 100.0, 100.0)];
        let out = find_matching_peaks(&cf, &events, 0.5, 10.0).unwrap();
        assert_eq!(out.completeness, 0.0);
        assert!(out.pairs.is_empty());

        let cf = PeakTable::from_records(vec![peak(0.0, 5.0, 100.0, 100.0)]);
        let out = find_matching_peaks(&cf, &[], 0.5, 10.0).unwrap();
        assert_eq!(out.completeness, 0.0);
    }

    #[test]
    fn test_many_to_many_is_tolerated() {
        // 两个观测峰都匹配同一个事件：事件只计一次
        let cf = PeakTable::from_records(vec![
            peak(10.0, 5.0, 1000.0, 1000.0),
            peak(10.1, 5.0, 1001.0, 1001.0),
        ]);
        let events = vec![event(10.0, 5.0, 1000.0, 1000.0)];

        let out = find_matching_peaks(&cf, &events, 0.5, 10.0).unwrap();
        assert_eq!(out.pairs.len(), 2);
        assert_eq!(out.matched_events.len(), 1);
        assert!((out.completeness - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_completeness_monotonic_under_peak_removal() {
        let cf = PeakTable::from_records(vec![
            peak(10.0, 5.0, 1000.0, 1000.0),
            peak(50.0, 8.0, 200.0, 300.0),
            peak(-30.0, 6.0, 700.0, 1500.0),
        ]);
        let events = vec![
            event(10.0, 5.0, 1000.0, 1000.0),
            event(50.0, 8.0, 200.0, 300.0),
            event(-30.0, 6.0, 700.0, 1500.0),
        ];

        let full = find_matching_peaks(&cf, &events, 0.5, 10.0).unwrap();

        // 去掉观测峰的任意子集都不应增加匹配事件数
        let masks: [[bool; 3]; 4] = [
            [true, true, false],
            [true, false, false],
            [false, true, true],
            [false, false, false],
        ];
        for mask in masks {
            let reduced = cf.filter(&mask).unwrap();
            let out = find_matching_peaks(&reduced, &events, 0.5, 10.0).unwrap();
            assert!(out.matched_events.len() <= full.matched_events.len());
        }
    }

    #[test]
    fn test_matched_peaks_preserve_order() {
        let cf = PeakTable::from_records(vec![
            peak(10.0, 5.0, 1000.0, 1000.0),
            peak(50.0, 8.0, 200.0, 300.0),
            peak(-30.0, 6.0, 700.0, 1500.0),
        ]);
        let events = vec![
            event(-30.0, 6.0, 700.0, 1500.0),
            event(10.0, 5.0, 1000.0, 1000.0),
        ];

        let out = find_matching_peaks(&cf, &events, 0.5, 10.0).unwrap();
        assert_eq!(out.matched_peaks.omega, vec![10.0, -30.0]);
    }
}

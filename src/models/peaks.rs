//! # 观测峰表数据模型
//!
//! 实验峰的列式表：每行携带旋转角、横向扫描坐标、散射角、
//! 两个探测器像素坐标、积分强度与可选的晶粒归属标签。
//!
//! 表被当作不可变值使用：所有过滤操作先复制再筛选，
//! 绝不就地修改，多个晶粒可安全地对同一母表反复过滤。
//!
//! ## 依赖关系
//! - 被 `matching/` 和 `parsers/peaks.rs` 使用
//! - 使用 `serde` 派生行记录

use crate::error::{FwdxrdError, Result};

use serde::{Deserialize, Serialize};

/// 未归属晶粒的标签值
pub const UNASSIGNED: i64 = -1;

/// 单行峰记录，用于 CSV 读写
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeakRecord {
    /// 旋转角 omega (度)
    pub omega: f64,
    /// 横向扫描坐标 dty (µm)
    pub dty: f64,
    /// 散射角 2θ (度)
    pub tth: f64,
    /// 探测器像素坐标（快轴）
    pub fc: f64,
    /// 探测器像素坐标（慢轴）
    pub sc: f64,
    /// 积分强度
    pub sum_intensity: f64,
    /// 晶粒归属标签，-1 表示未归属
    #[serde(default = "default_grain_id")]
    pub grain_id: i64,
}

fn default_grain_id() -> i64 {
    UNASSIGNED
}

/// 观测峰列式表
#[derive(Debug, Clone, Default)]
pub struct PeakTable {
    pub omega: Vec<f64>,
    pub dty: Vec<f64>,
    pub tth: Vec<f64>,
    pub fc: Vec<f64>,
    pub sc: Vec<f64>,
    pub sum_intensity: Vec<f64>,
    pub grain_id: Vec<i64>,
}

impl PeakTable {
    /// 行数
    pub fn nrows(&self) -> usize {
        self.omega.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nrows() == 0
    }

    /// 校验所有列长度一致，结构性非法输入在边界处失败
    pub fn validate(&self) -> Result<()> {
        let n = self.omega.len();
        let lens = [
            ("dty", self.dty.len()),
            ("tth", self.tth.len()),
            ("fc", self.fc.len()),
            ("sc", self.sc.len()),
            ("sum_intensity", self.sum_intensity.len()),
            ("grain_id", self.grain_id.len()),
        ];
        for (name, len) in lens {
            if len != n {
                return Err(FwdxrdError::ColumnMismatch {
                    detail: format!("omega has {} rows but {} has {}", n, name, len),
                });
            }
        }
        Ok(())
    }

    /// 追加一行
    pub fn push(&mut self, rec: PeakRecord) {
        self.omega.push(rec.omega);
        self.dty.push(rec.dty);
        self.tth.push(rec.tth);
        self.fc.push(rec.fc);
        self.sc.push(rec.sc);
        self.sum_intensity.push(rec.sum_intensity);
        self.grain_id.push(rec.grain_id);
    }

    /// 取出第 i 行记录
    pub fn row(&self, i: usize) -> PeakRecord {
        PeakRecord {
            omega: self.omega[i],
            dty: self.dty[i],
            tth: self.tth[i],
            fc: self.fc[i],
            sc: self.sc[i],
            sum_intensity: self.sum_intensity[i],
            grain_id: self.grain_id[i],
        }
    }

    /// 从行记录构造表
    pub fn from_records(records: impl IntoIterator<Item = PeakRecord>) -> Self {
        let mut table = PeakTable::default();
        for rec in records {
            table.push(rec);
        }
        table
    }

    /// 按布尔掩码过滤，返回保序的新副本
    ///
    /// 掩码长度必须等于行数，否则返回错误。
    pub fn filter(&self, mask: &[bool]) -> Result<PeakTable> {
        if mask.len() != self.nrows() {
            return Err(FwdxrdError::ColumnMismatch {
                detail: format!(
                    "filter mask has {} entries for {} rows",
                    mask.len(),
                    self.nrows()
                ),
            });
        }

        let mut out = PeakTable::default();
        for (i, keep) in mask.iter().enumerate() {
            if *keep {
                out.push(self.row(i));
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn sample_table() -> PeakTable {
        PeakTable::from_records(vec![
            PeakRecord {
                omega: -45.0,
                dty: 10.0,
                tth: 5.2,
                fc: 1000.0,
                sc: 1200.0,
                sum_intensity: 500.0,
                grain_id: 0,
            },
            PeakRecord {
                omega: 12.5,
                dty: -3.0,
                tth: 8.1,
                fc: 400.0,
                sc: 300.0,
                sum_intensity: 80.0,
                grain_id: 1,
            },
            PeakRecord {
                omega: 60.0,
                dty: 0.0,
                tth: 11.0,
                fc: 1500.0,
                sc: 800.0,
                sum_intensity: 2000.0,
                grain_id: UNASSIGNED,
            },
        ])
    }

    #[test]
    fn test_filter_returns_copy() {
        let table = sample_table();
        let filtered = table.filter(&[true, false, true]).unwrap();

        assert_eq!(filtered.nrows(), 2);
        assert_eq!(filtered.grain_id, vec![0, UNASSIGNED]);
        // 原表不变
        assert_eq!(table.nrows(), 3);
    }

    #[test]
    fn test_filter_preserves_order() {
        let table = sample_table();
        let filtered = table.filter(&[true, true, true]).unwrap();
        assert_eq!(filtered.omega, table.omega);
    }

    #[test]
    fn test_filter_rejects_bad_mask_length() {
        let table = sample_table();
        assert!(table.filter(&[true, false]).is_err());
    }

    #[test]
    fn test_validate_catches_mismatch() {
        let mut table = sample_table();
        table.fc.pop();
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_empty_table() {
        let table = PeakTable::default();
        assert!(table.is_empty());
        assert!(table.validate().is_ok());
        assert_eq!(table.filter(&[]).unwrap().nrows(), 0);
    }
}

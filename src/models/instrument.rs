//! # 仪器参数数据模型
//!
//! 正向计算所需的全部探测器/光束几何参数的扁平结构：样品-探测器
//! 距离、探测器倾斜矩阵、束心、像素尺寸、探测器尺寸、束挡板矩形、
//! 翻转标志与光束能量。由 `parsers/par.rs` 一次性转换得到，
//! 单次正向模拟期间不可变。
//!
//! ## 依赖关系
//! - 被 `forward/` 使用
//! - 由 `parsers/par.rs` 构造

use crate::geometry::rotation::Mat3;

use serde::{Deserialize, Serialize};

/// 能量-波长换算常数：λ[Å] = ECONST / E[keV]
pub const ECONST: f64 = 12.3984;

/// 束挡板矩形排除区（像素，含边界）
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BeamStop {
    /// y 方向像素范围 [min, max]
    pub y: [f64; 2],
    /// z 方向像素范围 [min, max]
    pub z: [f64; 2],
}

impl BeamStop {
    /// 点是否落在排除区内（两轴同时含边界）
    pub fn contains(&self, dety: f64, detz: f64) -> bool {
        self.y[0] <= dety && dety <= self.y[1] && self.z[0] <= detz && detz <= self.z[1]
    }
}

/// 仪器参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instrument {
    /// 样品到探测器距离 (mm)
    pub distance: f64,

    /// 束心像素坐标
    pub dety0: f64,
    pub detz0: f64,

    /// 探测器物理偏移 (mm)
    pub dety00: f64,
    pub detz00: f64,

    /// 像素尺寸 (mm)
    pub pixel_y: f64,
    pub pixel_z: f64,

    /// 探测器尺寸（像素）
    pub dety_size: f64,
    pub detz_size: f64,

    /// 束挡板，None 表示无排除区
    pub beamstop: Option<BeamStop>,

    /// 左右/上下翻转标志
    pub flip_lr: bool,
    pub flip_ud: bool,

    /// 光束能量 (keV)
    pub energy: f64,

    /// 探测器倾斜旋转矩阵
    pub rot_det: Mat3,

    /// 样品系 → 实验室系基变换（固定，通常为单位矩阵）
    pub s: Mat3,
}

impl Instrument {
    /// 波长 (Å)
    pub fn wavelength(&self) -> f64 {
        ECONST / self.energy
    }

    /// 入射波数 1/λ (Å⁻¹)
    pub fn wavenumber(&self) -> f64 {
        self.energy / ECONST
    }

    /// 探测器上可探测的最大 ds = 1/d (Å⁻¹)
    ///
    /// 由探测器半对角线对应的最大 2θ 与 Bragg 定律给出。
    pub fn ds_max_on_detector(&self) -> f64 {
        let half_y = self.dety_size * self.pixel_y / 2.0;
        let half_z = self.detz_size * self.pixel_z / 2.0;
        let ttheta_max = ((half_y * half_y + half_z * half_z).sqrt() / self.distance).atan();
        2.0 * (ttheta_max / 2.0).sin() / self.wavelength()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::rotation::IDENTITY;

    fn test_instrument() -> Instrument {
        Instrument {
            distance: 150.0,
            dety0: 1024.0,
            detz0: 1024.0,
            dety00: 0.0,
            detz00: 0.0,
            pixel_y: 0.05,
            pixel_z: 0.05,
            dety_size: 2048.0,
            detz_size: 2048.0,
            beamstop: None,
            flip_lr: false,
            flip_ud: false,
            energy: 45.0,
            rot_det: IDENTITY,
            s: IDENTITY,
        }
    }

    #[test]
    fn test_wavelength_relation() {
        let p = test_instrument();
        assert!((p.wavelength() - 12.3984 / 45.0).abs() < 1e-12);
        assert!((p.wavelength() * p.wavenumber() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_ds_max_on_detector() {
        let p = test_instrument();
        // 半对角线 72.4 mm @ 150 mm：2θ_max ≈ 25.8°
        let ds = p.ds_max_on_detector();
        let half = (51.2_f64 * 51.2 * 2.0).sqrt();
        let ttheta = (half / 150.0).atan();
        let expected = 2.0 * (ttheta / 2.0).sin() / p.wavelength();
        assert!((ds - expected).abs() < 1e-12);
        assert!(ds > 0.0);
    }

    #[test]
    fn test_beamstop_contains_inclusive_bounds() {
        let bs = BeamStop {
            y: [1000.0, 1100.0],
            z: [900.0, 1150.0],
        };
        assert!(bs.contains(1000.0, 900.0));
        assert!(bs.contains(1100.0, 1150.0));
        assert!(bs.contains(1050.0, 1000.0));
        assert!(!bs.contains(999.9, 1000.0));
        assert!(!bs.contains(1050.0, 1150.1));
    }
}

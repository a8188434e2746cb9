//! # 晶胞数据模型
//!
//! 以晶格参数 (a, b, c, α, β, γ) 表示晶胞，提供直格矢矩阵与
//! 倒格矢 B 矩阵（晶体学约定，不含 2π 因子，|B·hkl| = 1/d）。
//!
//! ## 依赖关系
//! - 被 `forward/hkl.rs` 和 `parsers/par.rs` 使用
//! - 无外部模块依赖

use crate::error::{FwdxrdError, Result};
use crate::geometry::rotation::{cross, dot, Mat3};

use serde::{Deserialize, Serialize};

/// 晶胞参数，长度单位 Å，角度单位度
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitCell {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl UnitCell {
    pub fn new(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Result<Self> {
        if a <= 0.0 || b <= 0.0 || c <= 0.0 {
            return Err(FwdxrdError::InvalidArgument(format!(
                "cell edges must be positive: a={}, b={}, c={}",
                a, b, c
            )));
        }
        let in_open_range = |angle: f64| angle > 0.0 && angle < 180.0;
        if !in_open_range(alpha) || !in_open_range(beta) || !in_open_range(gamma) {
            return Err(FwdxrdError::InvalidArgument(format!(
                "cell angles must lie in (0, 180): alpha={}, beta={}, gamma={}",
                alpha, beta, gamma
            )));
        }

        let cell = UnitCell {
            a,
            b,
            c,
            alpha,
            beta,
            gamma,
        };

        // 三个角虽各自合法，组合仍可能无法闭合成三维晶胞
        // （c 向量的 z 分量平方为负）
        let m = cell.direct_matrix();
        if !(m[2][2] > 0.0 && m[2][2].is_finite()) {
            return Err(FwdxrdError::InvalidArgument(format!(
                "cell angles do not define a valid cell: alpha={}, beta={}, gamma={}",
                alpha, beta, gamma
            )));
        }

        Ok(cell)
    }

    /// 立方晶胞快捷构造
    pub fn cubic(a: f64) -> Result<Self> {
        UnitCell::new(a, a, a, 90.0, 90.0, 90.0)
    }

    /// 直格矢矩阵，行向量为 a, b, c（a 沿 x，b 在 xy 平面）
    pub fn direct_matrix(&self) -> Mat3 {
        let alpha = self.alpha.to_radians();
        let beta = self.beta.to_radians();
        let gamma = self.gamma.to_radians();

        let cos_alpha = alpha.cos();
        let cos_beta = beta.cos();
        let cos_gamma = gamma.cos();
        let sin_gamma = gamma.sin();

        let a_vec = [self.a, 0.0, 0.0];
        let b_vec = [self.b * cos_gamma, self.b * sin_gamma, 0.0];

        let c1 = self.c * cos_beta;
        let c2 = self.c * (cos_alpha - cos_beta * cos_gamma) / sin_gamma;
        let c3 = (self.c * self.c - c1 * c1 - c2 * c2).sqrt();

        [a_vec, b_vec, [c1, c2, c3]]
    }

    /// 晶胞体积 (Å³)
    pub fn volume(&self) -> f64 {
        let m = self.direct_matrix();
        dot(&m[0], &cross(&m[1], &m[2]))
    }

    /// 倒格矢 B 矩阵，列向量为 b1, b2, b3
    ///
    /// b1 = (b×c)/V 等，不含 2π 因子，因此 |B·hkl| = ds = 1/d。
    pub fn b_matrix(&self) -> Mat3 {
        let m = self.direct_matrix();
        let volume = dot(&m[0], &cross(&m[1], &m[2]));

        let b1 = cross(&m[1], &m[2]);
        let b2 = cross(&m[2], &m[0]);
        let b3 = cross(&m[0], &m[1]);

        let mut out = [[0.0; 3]; 3];
        for i in 0..3 {
            out[i][0] = b1[i] / volume;
            out[i][1] = b2[i] / volume;
            out[i][2] = b3[i] / volume;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::rotation::mat_vec;

    #[test]
    fn test_cubic_volume() {
        let cell = UnitCell::cubic(4.0).unwrap();
        assert!((cell.volume() - 64.0).abs() < 1e-9);
    }

    #[test]
    fn test_cubic_b_matrix_is_diagonal() {
        let cell = UnitCell::cubic(4.0).unwrap();
        let b = cell.b_matrix();
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 0.25 } else { 0.0 };
                assert!((b[i][j] - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_b_matrix_ds_of_100() {
        // (100) 的 ds = 1/d = 1/a
        let cell = UnitCell::new(4.0, 5.0, 6.0, 90.0, 90.0, 90.0).unwrap();
        let b = cell.b_matrix();
        let g = mat_vec(&b, &[1.0, 0.0, 0.0]);
        let ds = (g[0] * g[0] + g[1] * g[1] + g[2] * g[2]).sqrt();
        assert!((ds - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_hexagonal_d_spacing() {
        // 六方晶胞 (100)：d = a·sin(60°)
        let cell = UnitCell::new(3.0, 3.0, 5.0, 90.0, 90.0, 120.0).unwrap();
        let b = cell.b_matrix();
        let g = mat_vec(&b, &[1.0, 0.0, 0.0]);
        let ds = (g[0] * g[0] + g[1] * g[1] + g[2] * g[2]).sqrt();
        let expected = 1.0 / (3.0 * 60.0_f64.to_radians().sin());
        assert!((ds - expected).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(UnitCell::new(-1.0, 4.0, 4.0, 90.0, 90.0, 90.0).is_err());
        assert!(UnitCell::new(4.0, 4.0, 4.0, 90.0, 90.0, 190.0).is_err());
    }

    #[test]
    fn test_rejects_degenerate_angles() {
        // 区间端点不合法
        assert!(UnitCell::new(4.0, 4.0, 4.0, 90.0, 90.0, 0.0).is_err());
        assert!(UnitCell::new(4.0, 4.0, 4.0, 180.0, 90.0, 90.0).is_err());
    }

    #[test]
    fn test_rejects_unclosable_angle_combination() {
        // 各角合法但组合无法闭合：c 向量 z 分量平方为负
        assert!(UnitCell::new(4.0, 4.0, 4.0, 30.0, 30.0, 120.0).is_err());
        // 相近但可闭合的组合仍接受
        assert!(UnitCell::new(4.0, 4.0, 4.0, 80.0, 80.0, 120.0).is_ok());
    }
}

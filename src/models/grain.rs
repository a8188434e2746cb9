//! # 晶粒数据模型
//!
//! 晶粒由取向矩阵 U（3×3 正规旋转，晶体系 → 样品系）、
//! B 矩阵（编码晶胞形状）与样品系位置向量组成。
//!
//! ## 依赖关系
//! - 被 `forward/` 和 `parsers/grains.rs` 使用
//! - 使用 `geometry/rotation.rs` 的矩阵运算

use crate::error::{FwdxrdError, Result};
use crate::geometry::rotation::{det, mat_mul, transpose, Mat3, Vec3, IDENTITY};

use serde::{Deserialize, Serialize};

/// 正交性与行列式检验容差
const ORTHO_TOL: f64 = 1e-6;

/// 晶粒：取向、B 矩阵与样品系位置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grain {
    /// 晶粒编号
    pub id: usize,

    /// 取向矩阵 U（晶体系 → 样品系）
    pub u: Mat3,

    /// B 矩阵（倒格矢基，|B·hkl| = 1/d）
    pub b: Mat3,

    /// 样品系位置 (mm)
    pub translation: Vec3,
}

impl Grain {
    pub fn new(id: usize, u: Mat3, b: Mat3, translation: Vec3) -> Result<Self> {
        let grain = Grain {
            id,
            u,
            b,
            translation,
        };
        grain.validate()?;
        Ok(grain)
    }

    /// 校验取向矩阵是正规旋转：U·Uᵀ = I 且 det(U) = +1
    ///
    /// 结构性非法输入在边界处直接失败，避免静默产生错误几何。
    pub fn validate(&self) -> Result<()> {
        let d = det(&self.u);
        if (d - 1.0).abs() > ORTHO_TOL {
            return Err(FwdxrdError::InvalidOrientation {
                index: self.id,
                reason: format!("det(U) = {:.6}, expected +1", d),
            });
        }

        let prod = mat_mul(&self.u, &transpose(&self.u));
        for i in 0..3 {
            for j in 0..3 {
                if (prod[i][j] - IDENTITY[i][j]).abs() > ORTHO_TOL {
                    return Err(FwdxrdError::InvalidOrientation {
                        index: self.id,
                        reason: format!(
                            "U·Uᵀ deviates from identity at ({}, {}): {:.2e}",
                            i,
                            j,
                            (prod[i][j] - IDENTITY[i][j]).abs()
                        ),
                    });
                }
            }
        }

        Ok(())
    }
}

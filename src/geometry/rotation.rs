//! # 旋转矩阵与向量运算
//!
//! 构造样品旋转矩阵、探测器倾斜矩阵，以及少量 3×3 矩阵/向量辅助函数。
//!
//! ## 依赖关系
//! - 被 `geometry/omega.rs` 和 `forward/` 使用
//! - 无外部模块依赖

use std::f64::consts::PI;

/// 3×3 矩阵类型别名，行优先存储
pub type Mat3 = [[f64; 3]; 3];

/// 3 维向量类型别名
pub type Vec3 = [f64; 3];

/// 单位矩阵
pub const IDENTITY: Mat3 = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// 构造绕竖直 z 轴旋转 omega（弧度）的旋转矩阵（右手系）
///
/// ```text
/// | cos ω  -sin ω  0 |
/// | sin ω   cos ω  0 |
/// |   0       0    1 |
/// ```
pub fn omega_matrix(omega: f64) -> Mat3 {
    let (s, c) = omega.sin_cos();
    [[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]]
}

/// 从 (cos, sin) 对恢复 [0, 2π) 范围内的角度
///
/// arccos 只能给出 [0, π]，象限由配对的 sin 分量符号决定：
///
/// ```text
/// cos ≥ 0, sin ≥ 0  →  第一象限, acos(cos)
/// cos < 0, sin ≥ 0  →  第二象限, acos(cos)
/// cos < 0, sin < 0  →  第三象限, 2π − acos(cos)
/// cos ≥ 0, sin < 0  →  第四象限, 2π − acos(cos)
/// ```
///
/// cos 分量被钳制到 [-1, 1] 以吸收浮点舍入。
pub fn angle_from_cos_sin(c: f64, s: f64) -> f64 {
    let angle = c.clamp(-1.0, 1.0).acos();
    if s < 0.0 {
        2.0 * PI - angle
    } else {
        angle
    }
}

/// 构造探测器倾斜矩阵 R = Rz(tz) · Ry(ty) · Rx(tx)
///
/// 倾斜角单位：弧度。全零时返回单位矩阵。
pub fn tilt_matrix(tilt_x: f64, tilt_y: f64, tilt_z: f64) -> Mat3 {
    let (sx, cx) = tilt_x.sin_cos();
    let (sy, cy) = tilt_y.sin_cos();
    let (sz, cz) = tilt_z.sin_cos();

    let rx = [[1.0, 0.0, 0.0], [0.0, cx, -sx], [0.0, sx, cx]];
    let ry = [[cy, 0.0, sy], [0.0, 1.0, 0.0], [-sy, 0.0, cy]];
    let rz = [[cz, -sz, 0.0], [sz, cz, 0.0], [0.0, 0.0, 1.0]];

    mat_mul(&rz, &mat_mul(&ry, &rx))
}

/// 矩阵乘向量 m·v
pub fn mat_vec(m: &Mat3, v: &Vec3) -> Vec3 {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

/// 矩阵乘矩阵 a·b
pub fn mat_mul(a: &Mat3, b: &Mat3) -> Mat3 {
    let mut out = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            out[i][j] = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
        }
    }
    out
}

/// 矩阵转置
pub fn transpose(m: &Mat3) -> Mat3 {
    [
        [m[0][0], m[1][0], m[2][0]],
        [m[0][1], m[1][1], m[2][1]],
        [m[0][2], m[1][2], m[2][2]],
    ]
}

/// 向量点积
pub fn dot(a: &Vec3, b: &Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// 向量叉积
pub fn cross(a: &Vec3, b: &Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// 向量模长
pub fn norm(v: &Vec3) -> f64 {
    dot(v, v).sqrt()
}

/// 行列式
pub fn det(m: &Mat3) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_omega_matrix_zero() {
        let m = omega_matrix(0.0);
        for i in 0..3 {
            for j in 0..3 {
                assert!((m[i][j] - IDENTITY[i][j]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_omega_matrix_quarter_turn() {
        // 90° 旋转把 x 轴送到 y 轴
        let m = omega_matrix(PI / 2.0);
        let v = mat_vec(&m, &[1.0, 0.0, 0.0]);
        assert!((v[0]).abs() < 1e-12);
        assert!((v[1] - 1.0).abs() < 1e-12);
        assert!((v[2]).abs() < 1e-12);
    }

    #[test]
    fn test_angle_from_cos_sin_quadrants() {
        let cases = [
            (PI / 6.0),       // 第一象限
            (2.0 * PI / 3.0), // 第二象限
            (4.0 * PI / 3.0), // 第三象限
            (11.0 * PI / 6.0),// 第四象限
        ];
        for expected in cases {
            let got = angle_from_cos_sin(expected.cos(), expected.sin());
            assert!(
                (got - expected).abs() < 1e-12,
                "expected {}, got {}",
                expected,
                got
            );
        }
    }

    #[test]
    fn test_angle_from_cos_sin_clamps_rounding() {
        // cos 略微越过 1 不应产生 NaN
        let got = angle_from_cos_sin(1.0 + 1e-15, 0.0);
        assert!(got.is_finite());
        assert!(got.abs() < 1e-6);
    }

    #[test]
    fn test_tilt_matrix_zero_is_identity() {
        let m = tilt_matrix(0.0, 0.0, 0.0);
        for i in 0..3 {
            for j in 0..3 {
                assert!((m[i][j] - IDENTITY[i][j]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_tilt_matrix_is_rotation() {
        let m = tilt_matrix(0.1, -0.2, 0.3);
        assert!((det(&m) - 1.0).abs() < 1e-12);
        let mt = transpose(&m);
        let prod = mat_mul(&m, &mt);
        for i in 0..3 {
            for j in 0..3 {
                assert!((prod[i][j] - IDENTITY[i][j]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_cross_right_handed() {
        let z = cross(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]);
        assert!((z[2] - 1.0).abs() < 1e-12);
    }
}

//! # Bragg 条件的 omega 角求解器
//!
//! 倒格矢绕竖直轴旋转时满足弹性散射（Bragg）条件的方程可化为
//! `a·cos ω + b·sin ω = c`，其中 a、b 来自倒格矢在实验室系的投影分量，
//! c = −sin θ 来自 Bragg 几何。该方程在一整圈内有 0 或 2 个解。
//!
//! ## 依赖关系
//! - 被 `forward/simulate.rs` 调用
//! - 使用 `geometry/rotation.rs` 的象限求角函数

use crate::geometry::rotation::angle_from_cos_sin;

use std::f64::consts::PI;

/// 判别式与除数下界，低于该值视为无解
const EPS: f64 = 1e-12;

/// 求解 `a·cos ω + b·sin ω = c` 在 [0, 2π) 内的旋转角
///
/// 输入 d = a² + b²。判别式 d − c² 为负时 Bragg 球在整圈旋转中
/// 不被穿越，返回 `None`，调用方静默跳过该反射。判别式恰为零是
/// 相切情形，返回两个重合的角。
///
/// 两组 (cos, sin) 解由代数公式给出，再经象限分辨恢复角度。
pub fn find_omega(a: f64, b: f64, c: f64, d: f64) -> Option<[f64; 2]> {
    if d < EPS {
        // 倒格矢近乎平行于旋转轴，旋转不改变其 x 分量
        return None;
    }

    let sq_d = d - c * c;
    if sq_d < 0.0 {
        return None;
    }
    let root = sq_d.sqrt();

    let cos1 = (a * c + b * root) / d;
    let sin1 = (b * c - a * root) / d;

    let cos2 = cos1 - 2.0 * b * root / d;
    let sin2 = sin1 + 2.0 * a * root / d;

    Some([
        angle_from_cos_sin(cos1, sin1),
        angle_from_cos_sin(cos2, sin2),
    ])
}

/// 把 [0, 2π) 内的解重新缠绕到扫描窗口
///
/// 扫描起点为负角度（度）时，大于 2π + 起点 的解减去 2π，
/// 使解与跨零扫描窗口 [start, 2π + start) 对齐。
pub fn wrap_into_scan(omega: f64, rot_start_deg: f64) -> f64 {
    if rot_start_deg < 0.0 && omega > 2.0 * PI + rot_start_deg.to_radians() {
        omega - 2.0 * PI
    } else {
        omega
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 两个解都应满足原方程 a·cos ω + b·sin ω = c
    fn assert_solves(a: f64, b: f64, c: f64) {
        let d = a * a + b * b;
        let sols = find_omega(a, b, c, d).expect("should have solutions");
        for omega in sols {
            let lhs = a * omega.cos() + b * omega.sin();
            assert!(
                (lhs - c).abs() < 1e-10,
                "omega {} does not satisfy equation: {} vs {}",
                omega,
                lhs,
                c
            );
        }
    }

    #[test]
    fn test_solutions_satisfy_equation() {
        assert_solves(0.6, 0.8, -0.3);
        assert_solves(-0.5, 0.5, -0.1);
        assert_solves(0.9, -0.1, -0.7);
    }

    #[test]
    fn test_solutions_in_range() {
        let sols = find_omega(0.6, 0.8, -0.3, 1.0).unwrap();
        for omega in sols {
            assert!(omega >= 0.0 && omega < 2.0 * PI);
        }
    }

    #[test]
    fn test_tangency_gives_coincident_angles() {
        // d = c² 恰好相切：两支收敛到同一个角
        let (a, b) = (0.6, 0.8);
        let c = -1.0;
        let d = a * a + b * b; // 1.0 == c²
        let sols = find_omega(a, b, c, d).expect("tangency is still a solution");
        assert!((sols[0] - sols[1]).abs() < 1e-10);
    }

    #[test]
    fn test_negative_discriminant_returns_none() {
        // |c| > sqrt(d)：Bragg 球永不相交
        assert!(find_omega(0.3, 0.4, -0.9, 0.25).is_none());
    }

    #[test]
    fn test_vertical_vector_returns_none() {
        // a = b = 0：倒格矢沿旋转轴
        assert!(find_omega(0.0, 0.0, -0.5, 0.0).is_none());
    }

    #[test]
    fn test_wrap_into_scan_negative_start() {
        // 起点 -90°：350° 的解应缠绕为 -10°
        let omega = 350.0_f64.to_radians();
        let wrapped = wrap_into_scan(omega, -90.0);
        assert!((wrapped.to_degrees() + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_wrap_into_scan_positive_start_untouched() {
        let omega = 350.0_f64.to_radians();
        assert!((wrap_into_scan(omega, 0.0) - omega).abs() < 1e-12);
    }

    #[test]
    fn test_wrap_into_scan_below_threshold_untouched() {
        let omega = 200.0_f64.to_radians();
        assert!((wrap_into_scan(omega, -90.0) - omega).abs() < 1e-12);
    }
}

//! # 探测器投影
//!
//! 给定晶粒位置、旋转角、零转角下的倒格矢与散射半角，计算衍射束
//! 与倾斜/偏移探测器平面的交点，换算为像素坐标并做命中判定。
//!
//! 计算全程在实验室系进行：x 沿入射束，y 水平向外，z 竖直向上。
//!
//! ## 退化几何
//! 倒格矢的横向分量趋于零（衍射束沿入射束直行）或衍射束与探测器
//! 法向投影方向近乎平行时，除数趋于零。这两种情形均显式判定为
//! 未命中并返回 NaN 坐标，而不是让除法静默产生无穷大。
//!
//! ## 依赖关系
//! - 被 `forward/simulate.rs` 调用
//! - 使用 `geometry/rotation.rs` 与 `models/instrument.rs`

use crate::geometry::rotation::{mat_vec, omega_matrix, Vec3};
use crate::models::Instrument;

/// 除数退化判定下界
const DEGENERATE_EPS: f64 = 1e-12;

/// 探测器交点：像素与物理坐标、旋转后的倒格矢、命中标志
#[derive(Debug, Clone, Copy)]
pub struct DetectorHit {
    /// 像素坐标（y 方向，快轴）
    pub dety: f64,
    /// 像素坐标（z 方向，慢轴）
    pub detz: f64,
    /// 物理坐标 (mm)
    pub dety_mm: f64,
    pub detz_mm: f64,
    /// 旋转到实验室系的倒格矢
    pub gt: Vec3,
    /// 是否落在探测器有效区域内（界内且不在束挡板内）
    pub hit: bool,
}

impl DetectorHit {
    /// 退化几何：未命中，坐标为 NaN
    fn degenerate(gt: Vec3) -> Self {
        DetectorHit {
            dety: f64::NAN,
            detz: f64::NAN,
            dety_mm: f64::NAN,
            detz_mm: f64::NAN,
            gt,
            hit: false,
        }
    }
}

/// 把衍射束投影到探测器平面
///
/// 步骤：
/// 1. 以给定 omega 构造旋转矩阵，把倒格矢与样品位置旋入实验室系；
/// 2. 沿束方向把样品位置投影到探测器距离处，由 tan(2θ) 与倒格矢的
///    面内方向得到未倾斜的原始交点；
/// 3. 由样品位置指向原始交点得到单位衍射束方向；
/// 4. 解平面相交方程得到沿射线的距离参数，回代到探测器自身的
///    面内基向量得到物理坐标；
/// 5. 像素换算（像素轴与内部物理轴反向，符号翻转）并施加可选的
///    左右/上下翻转；
/// 6. 命中判定：像素坐标落在 [1, size] 且不在束挡板矩形内。
pub fn project(
    pos: &Vec3,
    omega: f64,
    gw: &Vec3,
    theta: f64,
    p: &Instrument,
) -> DetectorHit {
    let om = omega_matrix(omega);
    let gt = mat_vec(&om, gw);
    let sampos = mat_vec(&om, &mat_vec(&p.s, pos));

    // 样品中心投影到探测器距离处
    let center_y = sampos[1];
    let center_z = sampos[2];

    // 面内偏移量 (mm)
    let diffvec = (p.distance - sampos[0]) * (2.0 * theta).tan();
    let konst = (gt[1] * gt[1] + gt[2] * gt[2]).sqrt();
    if konst < DEGENERATE_EPS {
        return DetectorHit::degenerate(gt);
    }

    let dety22 = center_y + diffvec * gt[1] / konst;
    let detz22 = center_z + diffvec * gt[2] / konst;

    // 单位衍射束方向
    let kv = [
        p.distance - sampos[0],
        dety22 - sampos[1],
        detz22 - sampos[2],
    ];
    let klen = (kv[0] * kv[0] + kv[1] * kv[1] + kv[2] * kv[2]).sqrt();
    let k_out = [kv[0] / klen, kv[1] / klen, kv[2] / klen];

    // 与真实（倾斜、偏移）探测器平面相交：解单一线性参数 t
    let rd = &p.rot_det;
    let denom = rd[0][0] * k_out[0] + rd[1][0] * k_out[1] + rd[2][0] * k_out[2];
    if denom.abs() < DEGENERATE_EPS {
        return DetectorHit::degenerate(gt);
    }
    let t = (rd[0][0] * (p.distance - sampos[0])
        + rd[1][0] * (p.dety00 - sampos[1])
        + rd[2][0] * (p.detz00 - sampos[2]))
        / denom;

    let rel = [
        sampos[0] - p.distance,
        sampos[1] - p.dety00,
        sampos[2] - p.detz00,
    ];
    let v = [
        t * k_out[0] + rel[0],
        t * k_out[1] + rel[1],
        t * k_out[2] + rel[2],
    ];

    // 回代到探测器面内基向量（倾斜矩阵第 1、2 列）
    let mut dety_mm = rd[0][1] * v[0] + rd[1][1] * v[1] + rd[2][1] * v[2];
    let mut detz_mm = rd[0][2] * v[0] + rd[1][2] * v[1] + rd[2][2] * v[2];

    // 像素轴与物理轴反向
    let mut dety = -dety_mm / p.pixel_y + p.dety0;
    let mut detz = -detz_mm / p.pixel_z + p.detz0;

    if p.flip_lr {
        dety = flip_about_center(dety, p.dety_size, p.dety0);
        dety_mm = p.dety_size * p.pixel_y - dety_mm;
    }
    if p.flip_ud {
        detz = flip_about_center(detz, p.detz_size, p.detz0);
        detz_mm = p.detz_size * p.pixel_z - detz_mm;
    }

    let hit = hits_active_area(dety, detz, p);

    DetectorHit {
        dety,
        detz,
        dety_mm,
        detz_mm,
        gt,
        hit,
    }
}

/// 关于探测器中线反射像素坐标，束心是翻转的不动点
fn flip_about_center(px: f64, size: f64, center: f64) -> f64 {
    size - px + 2.0 * (center - size / 2.0)
}

/// 命中判定：两个像素坐标都落在 [1, size] 且不在束挡板内
///
/// NaN 坐标的比较恒为假，自然判为未命中。
fn hits_active_area(dety: f64, detz: f64, p: &Instrument) -> bool {
    let in_bounds =
        (1.0..=p.dety_size).contains(&dety) && (1.0..=p.detz_size).contains(&detz);
    let in_beamstop = p
        .beamstop
        .map(|bs| bs.contains(dety, detz))
        .unwrap_or(false);
    in_bounds && !in_beamstop
}

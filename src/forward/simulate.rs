//! # 正向模拟驱动器
//!
//! 枚举分辨率截断内的全部反射，对每个反射求解 Bragg 条件的
//! 0–2 个旋转角，落在扫描窗口内的解逐一投影到探测器，产出
//! 衍射事件列表与命中计数。
//!
//! 角度在内部以弧度记账，接口（扫描窗口、事件字段）使用度，
//! 仅在边界处转换。
//!
//! ## 依赖关系
//! - 被 `commands/simulate.rs` 与 `commands/match_peaks.rs` 调用
//! - 使用 `geometry/`、`forward/hkl.rs`、`forward/projector.rs`

use crate::error::{FwdxrdError, Result};
use crate::forward::hkl::{self, Reflection};
use crate::forward::projector::{self, DetectorHit};
use crate::geometry::omega::{find_omega, wrap_into_scan};
use crate::geometry::rotation::{mat_vec, norm, Vec3};
use crate::models::{Grain, Instrument, UnitCell};

/// 扫描窗口（度）：[start, end) 上界收进半步以避免边界重复采样
#[derive(Debug, Clone, Copy)]
pub struct ScanWindow {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

impl ScanWindow {
    pub fn new(start: f64, end: f64, step: f64) -> Result<Self> {
        if !(step > 0.0) {
            return Err(FwdxrdError::InvalidScanWindow(format!(
                "step must be positive, got {}",
                step
            )));
        }
        if !(end > start) {
            return Err(FwdxrdError::InvalidScanWindow(format!(
                "end ({}) must exceed start ({})",
                end, start
            )));
        }
        Ok(ScanWindow { start, end, step })
    }

    /// 角度（度）是否在窗口内：下界闭、上界收进半步后开
    pub fn contains(&self, rot: f64) -> bool {
        rot >= self.start && rot < self.end - self.step / 2.0
    }
}

/// 单个衍射事件：一个反射在一个角解处的预测
#[derive(Debug, Clone)]
pub struct DiffractionEvent {
    /// 旋转角 (度)
    pub rot: f64,
    /// 反射指数
    pub hkl: [i32; 3],
    /// 散射角 2θ (度)
    pub tth: f64,
    /// 实验室系衍射矢量（该转角下的倒格矢）
    pub gt: Vec3,
    /// 探测器像素坐标
    pub dety: f64,
    pub detz: f64,
    /// 探测器物理坐标 (mm)
    pub dety_mm: f64,
    pub detz_mm: f64,
    /// 命中标志
    pub hit: bool,
}

/// 正向模拟结果
#[derive(Debug, Clone, Default)]
pub struct Simulation {
    /// 扫描窗口内的全部衍射事件（命中与未命中）
    pub events: Vec<DiffractionEvent>,
    /// 命中探测器有效区域的事件数
    pub n_hits: usize,
    /// 枚举的反射总数
    pub n_reflections: usize,
    /// 按 ds 去重后的晶面族数
    pub n_families: usize,
}

/// 对单个晶粒执行正向模拟
///
/// 对每个反射：
/// 1. 计算零转角晶体姿态下的实验室系倒格矢 Gw = S·U·B·hkl；
/// 2. 由 |Gw| 与入射波数得到散射半角 θ，|sin θ| > 1 的反射
///    物理上不可行，静默跳过；
/// 3. 导出 omega 求解器的四个标量输入并求解 0–2 个候选转角；
/// 4. 负判别式（无实数解）的反射同样静默跳过，不进入事件列表
///    也不计入分母；
/// 5. 每个落在扫描窗口内的候选角投影到探测器，产出一个事件。
pub fn forward_simulate(
    grain: &Grain,
    cell: &UnitCell,
    p: &Instrument,
    ds_max: f64,
    scan: &ScanWindow,
) -> Result<Simulation> {
    grain.validate()?;

    let refs = hkl::generate_hkls(cell, ds_max)?;
    let klen = p.wavenumber();

    let mut sim = Simulation {
        n_reflections: refs.len(),
        n_families: hkl::family_ds(&refs).len(),
        ..Default::default()
    };

    for r in &refs {
        if let Some((gw, theta)) = lab_g_vector(grain, p, r, klen) {
            let glen = norm(&gw);

            // omega 求解器的标量输入
            let a = gw[0] / glen;
            let b = -gw[1] / glen;
            let cos_tth = (2.0 * theta).cos();
            let c = (cos_tth - 1.0) / (2.0 * (1.0 - cos_tth)).sqrt();
            let d = a * a + b * b;

            let Some(omegas) = find_omega(a, b, c, d) else {
                continue;
            };

            for omega in omegas {
                let omega = wrap_into_scan(omega, scan.start);
                let rot = omega.to_degrees();
                if !scan.contains(rot) {
                    continue;
                }

                let hit = projector::project(&grain.translation, omega, &gw, theta, p);
                if hit.hit {
                    sim.n_hits += 1;
                }
                sim.events.push(event_from_hit(rot, r, theta, hit));
            }
        }
    }

    Ok(sim)
}

/// 零转角下的实验室系倒格矢与散射半角
///
/// |sin θ| > 1（反射超出 Ewald 极限）或 |G| 退化为零时返回 None。
fn lab_g_vector(
    grain: &Grain,
    p: &Instrument,
    r: &Reflection,
    klen: f64,
) -> Option<(Vec3, f64)> {
    let hkl = [r.hkl[0] as f64, r.hkl[1] as f64, r.hkl[2] as f64];
    let gw = mat_vec(&p.s, &mat_vec(&grain.u, &mat_vec(&grain.b, &hkl)));

    let glen = norm(&gw);
    if glen < 1e-12 {
        return None;
    }

    let sin_theta = glen / (2.0 * klen);
    if sin_theta.abs() > 1.0 {
        return None;
    }

    Some((gw, sin_theta.asin()))
}

fn event_from_hit(rot: f64, r: &Reflection, theta: f64, hit: DetectorHit) -> DiffractionEvent {
    DiffractionEvent {
        rot,
        hkl: r.hkl,
        tth: 2.0 * theta.to_degrees(),
        gt: hit.gt,
        dety: hit.dety,
        detz: hit.detz,
        dety_mm: hit.dety_mm,
        detz_mm: hit.detz_mm,
        hit: hit.hit,
    }
}

//! # 反射枚举
//!
//! 枚举晶胞在分辨率截断 ds_max = 1/d_min 以内的全部 (hkl) 晶面，
//! 并提取按 ds 去重后的晶面族列表。
//!
//! ## 依赖关系
//! - 被 `forward/simulate.rs` 调用
//! - 使用 `models/cell.rs` 的 B 矩阵

use crate::error::{FwdxrdError, Result};
use crate::geometry::rotation::mat_vec;
use crate::models::UnitCell;

/// 族 ds 去重容差 (Å⁻¹)
const FAMILY_TOL: f64 = 1e-8;

/// 每个指数方向的枚举上限，防止病态晶胞导致的组合爆炸
const MAX_INDEX: i32 = 50;

/// 单个反射：整数指数三元组与其分辨率值 ds = 1/d
#[derive(Debug, Clone, Copy)]
pub struct Reflection {
    pub hkl: [i32; 3],
    pub ds: f64,
}

/// 枚举 ds ≤ ds_max 的全部反射，按 (ds, h, k, l) 排序
///
/// (0,0,0) 被跳过。每个方向的搜索上界由 ds_max 与晶胞边长的
/// 保守估计给出。
pub fn generate_hkls(cell: &UnitCell, ds_max: f64) -> Result<Vec<Reflection>> {
    if ds_max <= 0.0 {
        return Err(FwdxrdError::InvalidArgument(format!(
            "ds_max must be positive, got {}",
            ds_max
        )));
    }

    let b = cell.b_matrix();

    let h_max = index_bound(ds_max, cell.a);
    let k_max = index_bound(ds_max, cell.b);
    let l_max = index_bound(ds_max, cell.c);

    let mut refs = Vec::new();
    for h in -h_max..=h_max {
        for k in -k_max..=k_max {
            for l in -l_max..=l_max {
                if h == 0 && k == 0 && l == 0 {
                    continue;
                }
                let g = mat_vec(&b, &[h as f64, k as f64, l as f64]);
                let ds = (g[0] * g[0] + g[1] * g[1] + g[2] * g[2]).sqrt();
                if ds <= ds_max + FAMILY_TOL {
                    refs.push(Reflection { hkl: [h, k, l], ds });
                }
            }
        }
    }

    refs.sort_by(|a, b| {
        a.ds.partial_cmp(&b.ds)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.hkl.cmp(&b.hkl))
    });

    Ok(refs)
}

/// 按 ds 去重的晶面族分辨率列表（升序，每族唯一）
pub fn family_ds(refs: &[Reflection]) -> Vec<f64> {
    let mut families: Vec<f64> = Vec::new();
    for r in refs {
        match families.last() {
            Some(last) if (r.ds - last).abs() < FAMILY_TOL => {}
            _ => families.push(r.ds),
        }
    }
    families
}

fn index_bound(ds_max: f64, edge: f64) -> i32 {
    ((ds_max * edge).ceil() as i32 + 1).min(MAX_INDEX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cubic_first_family() {
        // 立方 a=4：最小 ds = 0.25，截断 0.3 只留 {100} 族 6 个反射
        let cell = UnitCell::cubic(4.0).unwrap();
        let refs = generate_hkls(&cell, 0.3).unwrap();
        assert_eq!(refs.len(), 6);
        for r in &refs {
            assert!((r.ds - 0.25).abs() < 1e-9);
            let order: i32 = r.hkl.iter().map(|x| x.abs()).sum();
            assert_eq!(order, 1);
        }
    }

    #[test]
    fn test_family_ds_unique() {
        let cell = UnitCell::cubic(4.0).unwrap();
        let refs = generate_hkls(&cell, 0.8).unwrap();
        let families = family_ds(&refs);

        assert!(!families.is_empty());
        for pair in families.windows(2) {
            assert!(pair[1] - pair[0] > FAMILY_TOL, "family ds must be unique");
        }
        // {100}, {110}, {111}, {200}, {210}, {211}, {220}, {300}/{221}, {310}
        assert!((families[0] - 0.25).abs() < 1e-9);
        assert!((families[1] - 0.25 * 2.0_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_cutoff_respected() {
        let cell = UnitCell::cubic(4.0).unwrap();
        let refs = generate_hkls(&cell, 0.8).unwrap();
        for r in &refs {
            assert!(r.ds <= 0.8 + 1e-6);
        }
    }

    #[test]
    fn test_sorted_by_ds() {
        let cell = UnitCell::cubic(4.0).unwrap();
        let refs = generate_hkls(&cell, 0.8).unwrap();
        for pair in refs.windows(2) {
            assert!(pair[0].ds <= pair[1].ds + 1e-12);
        }
    }

    #[test]
    fn test_rejects_nonpositive_cutoff() {
        let cell = UnitCell::cubic(4.0).unwrap();
        assert!(generate_hkls(&cell, 0.0).is_err());
    }
}

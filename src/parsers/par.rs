//! # 仪器参数文件解析器
//!
//! 解析 `key value` 形式的仪器参数文本文件并一次性转换为扁平的
//! `Instrument` 结构与 `UnitCell`。
//!
//! ## 格式说明
//! ```text
//! # comment
//! distance      150.0        # 样品-探测器距离 [mm]
//! dety_center   1024.0       # 束心 [像素]
//! detz_center   1024.0
//! pixel_y_size  0.05         # 像素尺寸 [mm]
//! pixel_z_size  0.05
//! dety_size     2048
//! detz_size     2048
//! energy        45.0         # 光束能量 [keV]
//! tilt_x        0.0          # 探测器倾斜 [度]，可选
//! tilt_y        0.0
//! tilt_z        0.0
//! dety_offset   0.0          # 探测器物理偏移 [mm]，可选
//! detz_offset   0.0
//! flip_lr       0            # 翻转标志，可选
//! flip_ud       0
//! beamstop_y    1000 1100    # 束挡板像素范围，可选
//! beamstop_z    950 1150
//! cell_a        4.0          # 晶胞参数 [Å / 度]
//! cell_b        4.0
//! cell_c        4.0
//! cell_alpha    90.0
//! cell_beta     90.0
//! cell_gamma    90.0
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/instrument.rs` 与 `models/cell.rs`
//! - 使用 `regex` 分词

use crate::error::{FwdxrdError, Result};
use crate::geometry::rotation::{tilt_matrix, IDENTITY};
use crate::models::{BeamStop, Instrument, UnitCell};

use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// 解析仪器参数文件
pub fn parse_par_file(path: &Path) -> Result<(Instrument, UnitCell)> {
    let content = fs::read_to_string(path).map_err(|e| FwdxrdError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_par_content(&content)
}

/// 从字符串内容解析仪器参数
pub fn parse_par_content(content: &str) -> Result<(Instrument, UnitCell)> {
    let line_re = Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s+(.+?)\s*$").expect("static regex");

    let mut map: HashMap<String, String> = HashMap::new();
    for line in content.lines() {
        // 去掉行内注释
        let line = line.split('#').next().unwrap_or("");
        if line.trim().is_empty() {
            continue;
        }
        if let Some(caps) = line_re.captures(line) {
            map.insert(caps[1].to_lowercase(), caps[2].to_string());
        }
    }

    let cell = UnitCell::new(
        require_f64(&map, "cell_a")?,
        require_f64(&map, "cell_b")?,
        require_f64(&map, "cell_c")?,
        require_f64(&map, "cell_alpha")?,
        require_f64(&map, "cell_beta")?,
        require_f64(&map, "cell_gamma")?,
    )?;

    let tilt_x = optional_f64(&map, "tilt_x")?.unwrap_or(0.0);
    let tilt_y = optional_f64(&map, "tilt_y")?.unwrap_or(0.0);
    let tilt_z = optional_f64(&map, "tilt_z")?.unwrap_or(0.0);

    let beamstop = parse_beamstop(&map)?;

    let instrument = Instrument {
        distance: require_f64(&map, "distance")?,
        dety0: require_f64(&map, "dety_center")?,
        detz0: require_f64(&map, "detz_center")?,
        dety00: optional_f64(&map, "dety_offset")?.unwrap_or(0.0),
        detz00: optional_f64(&map, "detz_offset")?.unwrap_or(0.0),
        pixel_y: require_f64(&map, "pixel_y_size")?,
        pixel_z: require_f64(&map, "pixel_z_size")?,
        dety_size: require_f64(&map, "dety_size")?,
        detz_size: require_f64(&map, "detz_size")?,
        beamstop,
        flip_lr: optional_flag(&map, "flip_lr")?,
        flip_ud: optional_flag(&map, "flip_ud")?,
        energy: require_f64(&map, "energy")?,
        rot_det: tilt_matrix(
            tilt_x.to_radians(),
            tilt_y.to_radians(),
            tilt_z.to_radians(),
        ),
        s: IDENTITY,
    };

    if instrument.distance <= 0.0 || instrument.energy <= 0.0 {
        return Err(FwdxrdError::InvalidParameter {
            key: "distance/energy".to_string(),
            value: format!("{} / {}", instrument.distance, instrument.energy),
        });
    }

    Ok((instrument, cell))
}

fn require_f64(map: &HashMap<String, String>, key: &str) -> Result<f64> {
    let raw = map
        .get(key)
        .ok_or_else(|| FwdxrdError::MissingParameter {
            key: key.to_string(),
        })?;
    raw.trim()
        .parse()
        .map_err(|_| FwdxrdError::InvalidParameter {
            key: key.to_string(),
            value: raw.clone(),
        })
}

fn optional_f64(map: &HashMap<String, String>, key: &str) -> Result<Option<f64>> {
    match map.get(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| FwdxrdError::InvalidParameter {
                key: key.to_string(),
                value: raw.clone(),
            }),
    }
}

fn optional_flag(map: &HashMap<String, String>, key: &str) -> Result<bool> {
    match map.get(key).map(|s| s.trim()) {
        None | Some("0") => Ok(false),
        Some("1") => Ok(true),
        Some(other) => Err(FwdxrdError::InvalidParameter {
            key: key.to_string(),
            value: other.to_string(),
        }),
    }
}

/// beamstop_y / beamstop_z 各携带两个值；必须同时给出或同时缺省
fn parse_beamstop(map: &HashMap<String, String>) -> Result<Option<BeamStop>> {
    let parse_pair = |key: &str| -> Result<Option<[f64; 2]>> {
        match map.get(key) {
            None => Ok(None),
            Some(raw) => {
                let vals: Vec<f64> = raw
                    .split_whitespace()
                    .map(|t| t.parse::<f64>())
                    .collect::<std::result::Result<_, _>>()
                    .map_err(|_| FwdxrdError::InvalidParameter {
                        key: key.to_string(),
                        value: raw.clone(),
                    })?;
                if vals.len() != 2 || vals[0] > vals[1] {
                    return Err(FwdxrdError::InvalidParameter {
                        key: key.to_string(),
                        value: raw.clone(),
                    });
                }
                Ok(Some([vals[0], vals[1]]))
            }
        }
    };

    match (parse_pair("beamstop_y")?, parse_pair("beamstop_z")?) {
        (Some(y), Some(z)) => Ok(Some(BeamStop { y, z })),
        (None, None) => Ok(None),
        _ => Err(FwdxrdError::InvalidParameter {
            key: "beamstop_y/beamstop_z".to_string(),
            value: "both ranges must be given together".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = "\
# standard far-field geometry
distance      150.0
dety_center   1024.0
detz_center   1024.0
pixel_y_size  0.05
pixel_z_size  0.05
dety_size     2048
detz_size     2048
energy        45.0
cell_a        4.0
cell_b        4.0
cell_c        4.0
cell_alpha    90.0
cell_beta     90.0
cell_gamma    90.0
";

    #[test]
    fn test_parse_minimal() {
        let (p, cell) = parse_par_content(MINIMAL).unwrap();
        assert!((p.distance - 150.0).abs() < 1e-12);
        assert!((p.dety0 - 1024.0).abs() < 1e-12);
        assert!(!p.flip_lr);
        assert!(p.beamstop.is_none());
        assert!((cell.a - 4.0).abs() < 1e-12);
        // 无倾斜时为单位矩阵
        for i in 0..3 {
            assert!((p.rot_det[i][i] - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_parse_optional_keys() {
        let content = format!(
            "{}flip_lr 1\ntilt_y 0.5\nbeamstop_y 1000 1100\nbeamstop_z 950 1150\n",
            MINIMAL
        );
        let (p, _) = parse_par_content(&content).unwrap();
        assert!(p.flip_lr);
        assert!(!p.flip_ud);
        let bs = p.beamstop.unwrap();
        assert_eq!(bs.y, [1000.0, 1100.0]);
        // 倾斜 0.5° 不再是单位矩阵
        assert!((p.rot_det[0][0] - 1.0).abs() > 1e-9);
    }

    #[test]
    fn test_missing_key_fails() {
        let content = MINIMAL.replace("energy        45.0\n", "");
        match parse_par_content(&content) {
            Err(FwdxrdError::MissingParameter { key }) => assert_eq!(key, "energy"),
            other => panic!("expected MissingParameter, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_lone_beamstop_axis_fails() {
        let content = format!("{}beamstop_y 1000 1100\n", MINIMAL);
        assert!(parse_par_content(&content).is_err());
    }

    #[test]
    fn test_inline_comments_ignored() {
        let content = MINIMAL.replace("energy        45.0", "energy 45.0 # keV");
        let (p, _) = parse_par_content(&content).unwrap();
        assert!((p.energy - 45.0).abs() < 1e-12);
    }
}

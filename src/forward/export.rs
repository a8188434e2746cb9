//! # 模拟事件导出
//!
//! 把正向模拟产生的衍射事件写为 CSV。
//!
//! ## 依赖关系
//! - 被 `commands/simulate.rs` 调用
//! - 使用 `forward/simulate.rs` 的 DiffractionEvent
//! - 使用 `csv` 库写入

use crate::error::{FwdxrdError, Result};
use crate::forward::simulate::DiffractionEvent;

use std::path::Path;

/// 导出衍射事件为 CSV
pub fn events_to_csv(events: &[DiffractionEvent], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record([
        "rot", "h", "k", "l", "tth", "gx", "gy", "gz", "dety", "detz", "dety_mm", "detz_mm",
        "hit",
    ])?;

    for ev in events {
        wtr.write_record(&[
            format!("{:.4}", ev.rot),
            ev.hkl[0].to_string(),
            ev.hkl[1].to_string(),
            ev.hkl[2].to_string(),
            format!("{:.4}", ev.tth),
            format!("{:.6}", ev.gt[0]),
            format!("{:.6}", ev.gt[1]),
            format!("{:.6}", ev.gt[2]),
            format!("{:.3}", ev.dety),
            format!("{:.3}", ev.detz),
            format!("{:.4}", ev.dety_mm),
            format!("{:.4}", ev.detz_mm),
            (ev.hit as u8).to_string(),
        ])?;
    }

    wtr.flush().map_err(|e| FwdxrdError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

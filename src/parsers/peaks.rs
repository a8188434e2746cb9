//! # 观测峰 CSV 读写
//!
//! 观测峰表的 CSV 读写，行记录经 `serde` 派生直接映射到
//! `PeakRecord`。列：omega, dty, tth, fc, sc, sum_intensity,
//! grain_id（可缺省，缺省为 -1）。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/peaks.rs`
//! - 使用 `csv` + `serde` 读写

use crate::error::{FwdxrdError, Result};
use crate::models::peaks::{PeakRecord, PeakTable};

use std::io::Read;
use std::path::Path;

/// 读取观测峰 CSV 文件
pub fn read_peaks_csv(path: &Path) -> Result<PeakTable> {
    if !path.is_file() {
        return Err(FwdxrdError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let rdr = csv::Reader::from_path(path)?;
    read_peaks_from(rdr)
}

/// 从任意 reader 读取观测峰表
pub fn read_peaks_from<R: Read>(mut rdr: csv::Reader<R>) -> Result<PeakTable> {
    let mut table = PeakTable::default();
    for record in rdr.deserialize::<PeakRecord>() {
        table.push(record?);
    }
    table.validate()?;
    Ok(table)
}

/// 写出观测峰 CSV 文件
pub fn write_peaks_csv(cf: &PeakTable, path: &Path) -> Result<()> {
    cf.validate()?;

    let mut wtr = csv::Writer::from_path(path)?;
    for i in 0..cf.nrows() {
        wtr.serialize(cf.row(i))?;
    }
    wtr.flush().map_err(|e| FwdxrdError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(())
}

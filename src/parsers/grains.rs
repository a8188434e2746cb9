//! # 晶粒表文件解析器
//!
//! 解析按块组织的晶粒文本文件：每块以 `grain <id>` 开头，
//! 随后三行 `u` 给出取向矩阵、三行 `b` 给出 B 矩阵，
//! 可选一行 `t` 给出平移（µm，加载时转换为 mm）。
//!
//! ## 格式说明
//! ```text
//! # grains indexed from scan 42
//! grain 0
//! u  1.0 0.0 0.0
//! u  0.0 1.0 0.0
//! u  0.0 0.0 1.0
//! b  0.25 0.0 0.0
//! b  0.0 0.25 0.0
//! b  0.0 0.0 0.25
//! t  120.0 -35.0 0.0
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/grain.rs`（取向在加载时即校验）

use crate::error::{FwdxrdError, Result};
use crate::models::Grain;

use std::fs;
use std::path::Path;

/// 解析晶粒表文件
pub fn parse_grain_file(path: &Path) -> Result<Vec<Grain>> {
    let content = fs::read_to_string(path).map_err(|e| FwdxrdError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_grain_content(&content).map_err(|e| match e {
        FwdxrdError::ParseError { format, reason, .. } => FwdxrdError::ParseError {
            format,
            path: path.display().to_string(),
            reason,
        },
        other => other,
    })
}

/// 正在累积的晶粒块
#[derive(Default)]
struct Block {
    id: Option<usize>,
    u_rows: Vec<[f64; 3]>,
    b_rows: Vec<[f64; 3]>,
    translation: Option<[f64; 3]>,
}

impl Block {
    fn finish(self) -> Result<Grain> {
        let id = self.id.ok_or_else(|| parse_err("block without grain id"))?;
        if self.u_rows.len() != 3 {
            return Err(parse_err(&format!(
                "grain {}: expected 3 'u' rows, got {}",
                id,
                self.u_rows.len()
            )));
        }
        if self.b_rows.len() != 3 {
            return Err(parse_err(&format!(
                "grain {}: expected 3 'b' rows, got {}",
                id,
                self.b_rows.len()
            )));
        }

        let u = [self.u_rows[0], self.u_rows[1], self.u_rows[2]];
        let b = [self.b_rows[0], self.b_rows[1], self.b_rows[2]];

        // 平移以 µm 存储，内部以 mm 计算
        let t = self.translation.unwrap_or([0.0, 0.0, 0.0]);
        let translation = [t[0] / 1000.0, t[1] / 1000.0, t[2] / 1000.0];

        Grain::new(id, u, b, translation)
    }
}

/// 从字符串内容解析晶粒表
pub fn parse_grain_content(content: &str) -> Result<Vec<Grain>> {
    let mut grains = Vec::new();
    let mut current: Option<Block> = None;

    for (lineno, raw) in content.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0].to_lowercase().as_str() {
            "grain" => {
                if let Some(block) = current.take() {
                    grains.push(block.finish()?);
                }
                let id = parts
                    .get(1)
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| parse_err(&format!("line {}: bad grain id", lineno + 1)))?;
                current = Some(Block {
                    id: Some(id),
                    ..Default::default()
                });
            }
            "u" => {
                let block = current
                    .as_mut()
                    .ok_or_else(|| parse_err(&format!("line {}: 'u' before 'grain'", lineno + 1)))?;
                block.u_rows.push(parse_row(&parts[1..], lineno)?);
            }
            "b" => {
                let block = current
                    .as_mut()
                    .ok_or_else(|| parse_err(&format!("line {}: 'b' before 'grain'", lineno + 1)))?;
                block.b_rows.push(parse_row(&parts[1..], lineno)?);
            }
            "t" => {
                let block = current
                    .as_mut()
                    .ok_or_else(|| parse_err(&format!("line {}: 't' before 'grain'", lineno + 1)))?;
                block.translation = Some(parse_row(&parts[1..], lineno)?);
            }
            other => {
                return Err(parse_err(&format!(
                    "line {}: unknown record '{}'",
                    lineno + 1,
                    other
                )));
            }
        }
    }

    if let Some(block) = current.take() {
        grains.push(block.finish()?);
    }

    if grains.is_empty() {
        return Err(parse_err("no grains found"));
    }

    Ok(grains)
}

fn parse_row(tokens: &[&str], lineno: usize) -> Result<[f64; 3]> {
    if tokens.len() != 3 {
        return Err(parse_err(&format!(
            "line {}: expected 3 values, got {}",
            lineno + 1,
            tokens.len()
        )));
    }
    let mut row = [0.0; 3];
    for (i, tok) in tokens.iter().enumerate() {
        row[i] = tok
            .parse()
            .map_err(|_| parse_err(&format!("line {}: bad number '{}'", lineno + 1, tok)))?;
    }
    Ok(row)
}

fn parse_err(reason: &str) -> FwdxrdError {
    FwdxrdError::ParseError {
        format: "grain map".to_string(),
        path: String::new(),
        reason: reason.to_string(),
    }
}

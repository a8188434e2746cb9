//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `parsers/`, `forward/`, `matching/`, `utils/`
//! - 子模块: simulate, match_peaks, peaks

pub mod match_peaks;
pub mod peaks;
pub mod simulate;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Simulate(args) => simulate::execute(args),
        Commands::Match(args) => match_peaks::execute(args),
        Commands::Peaks(args) => peaks::execute(args),
    }
}

//! # fwdxrd - 三维 X 射线衍射正向模拟与峰匹配工具
//!
//! 从晶粒图（取向矩阵、倒易度量与质心位置）出发预测旋转扫描中
//! 衍射斑的探测器落点，并与观测峰表做容差匹配，评估晶粒的
//! 衍射完整度。
//!
//! ## 子命令
//! - `simulate` - 晶粒正向衍射模拟，逐晶粒导出事件表
//! - `match`    - 模拟事件与观测峰匹配，报告完整度
//! - `peaks`    - 峰表工具
//!   - `filter` - 按强度过滤弱峰
//!   - `diff`   - 两张峰表的对称差
//!   - `grain`  - 按晶粒编号提取
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/   (参数、晶粒图与峰表解析)
//!   │     ├── forward/   (正向模拟)
//!   │     ├── matching/  (峰匹配与集合操作)
//!   │     └── models/    (数据模型)
//!   ├── geometry/   (旋转与 Bragg 角求解)
//!   ├── batch/      (晶粒并行执行器)
//!   ├── plot.rs     (正弦图)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod forward;
mod geometry;
mod matching;
mod models;
mod parsers;
mod plot;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}

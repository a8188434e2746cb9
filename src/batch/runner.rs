//! # 晶粒并行执行器
//!
//! 基于 rayon 的跨晶粒并行迭代，保序收集每个晶粒的处理结果。
//! 单个晶粒的正向模拟与匹配是纯函数式的批量数值计算，不共享
//! 可变状态，并行是安全的。
//!
//! ## 依赖关系
//! - 被 `commands/simulate.rs` 与 `commands/match_peaks.rs` 调用
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 进行并行计算

use crate::utils::progress;

use rayon::prelude::*;

/// 晶粒并行执行器
pub struct GrainRunner {
    /// 并行作业数，0 表示使用全部 CPU
    jobs: usize,
}

impl GrainRunner {
    pub fn new(jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self { jobs }
    }

    /// 对条目列表并行应用处理函数，结果按输入顺序返回
    pub fn run<T, R, F>(&self, items: &[T], message: &str, processor: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync + Send,
    {
        let pb = progress::create_progress_bar(items.len() as u64, message);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
            .unwrap();

        let results: Vec<R> = pool.install(|| {
            items
                .par_iter()
                .map(|item| {
                    let result = processor(item);
                    pb.inc(1);
                    result
                })
                .collect()
        });

        pb.finish_and_clear();
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_preserve_input_order() {
        let runner = GrainRunner::new(4);
        let items: Vec<usize> = (0..32).collect();
        let results = runner.run(&items, "test", |i| i * 2);
        assert_eq!(results, (0..32).map(|i| i * 2).collect::<Vec<_>>());
    }

    #[test]
    fn test_zero_jobs_uses_all_cpus() {
        let runner = GrainRunner::new(0);
        let results = runner.run(&[1, 2, 3], "test", |i| *i);
        assert_eq!(results, vec![1, 2, 3]);
    }
}

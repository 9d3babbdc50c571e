//! 畳み込み層の順伝播
//!
//! 入力 1 枚と同サイズのカーネル群から、カーネルごとのプーリング結果を作る。
//!
//! ```text
//! input [n]
//!    ↓  ZeroPad(k / 2)            … 全分岐で共有（読み取り専用）
//! padded [n + 2·(k/2)]
//!    ├─ kernel #0 → CrossCorrelation → Sigmoid → MaxPool → pooled #0
//!    ├─ kernel #1 → CrossCorrelation → Sigmoid → MaxPool → pooled #1
//!    └─ kernel #2 → ...
//! ```
//!
//! 各分岐は互いに独立で、出力グリッドを排他的に所有する。
//! 並列実行時も結果はカーネル順に並ぶ。

use crate::error::{ConvError, ConvResult};
use crate::grid::Grid;
use crate::kernel::Kernel;
use crate::layers::{CrossCorrelation, Execution, MaxPool, Sigmoid, ZeroPad, conv_output_size};
use rayon::prelude::*;
use std::time::Instant;

/// 既定のプーリング窓
pub const DEFAULT_POOL_SIZE: usize = 2;
/// 既定のプーリングストライド
pub const DEFAULT_POOL_STRIDE: usize = 2;

/// パイプライン設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    pub pool_size: usize,
    pub stride: usize,
    pub execution: Execution,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            stride: DEFAULT_POOL_STRIDE,
            execution: Execution::default(),
        }
    }
}

/// 各段の一辺
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageSizes {
    pub input: usize,
    pub padded: usize,
    pub conv: usize,
    pub pooled: usize,
}

/// パディング → 相互相関 → シグモイド → 最大値プーリング
#[derive(Debug, Clone, Copy)]
pub struct Pipeline {
    conv: CrossCorrelation,
    pool: MaxPool,
    execution: Execution,
}

impl Pipeline {
    pub fn new(config: &PipelineConfig) -> ConvResult<Self> {
        let pool = MaxPool::new(config.pool_size, config.stride)?.with_execution(config.execution);
        Ok(Self {
            conv: CrossCorrelation::new(config.execution),
            pool,
            execution: config.execution,
        })
    }

    /// 入力一辺とカーネル一辺から各段の一辺を求める
    ///
    /// 計算を始める前に寸法の不整合（`InvalidDimensions`）を検出するために使う。
    pub fn stage_sizes(&self, input_size: usize, kernel_size: usize) -> ConvResult<StageSizes> {
        let padded = ZeroPad::for_kernel(kernel_size).output_size(input_size);
        let conv = conv_output_size(padded, kernel_size).ok_or_else(|| {
            ConvError::invalid(
                "convolution",
                format!("kernel {kernel_size}x{kernel_size} does not fit padded input {padded}x{padded}"),
            )
        })?;
        let pooled = self.pool.output_size(conv).ok_or_else(|| {
            ConvError::invalid(
                "pooling",
                format!(
                    "pool window {0}x{0} does not fit convolution output {conv}x{conv}",
                    self.pool.size()
                ),
            )
        })?;
        Ok(StageSizes {
            input: input_size,
            padded,
            conv,
            pooled,
        })
    }

    /// 全カーネルについて順伝播し、カーネル順にプーリング結果を返す
    ///
    /// 失敗時は部分的な結果を返さない。
    pub fn forward<G: Grid>(&self, input: &G, kernels: &[Kernel<G>]) -> ConvResult<Vec<G>> {
        let kernel_size = common_kernel_size(kernels)?;
        let sizes = self.stage_sizes(input.dimension(), kernel_size)?;
        log::debug!(
            "forward: layout={} input={} kernel={} padded={} conv={} pooled={} kernels={} execution={:?}",
            G::LAYOUT,
            sizes.input,
            kernel_size,
            sizes.padded,
            sizes.conv,
            sizes.pooled,
            kernels.len(),
            self.execution
        );

        let padded = ZeroPad::for_kernel(kernel_size).apply(input)?;

        match self.execution {
            Execution::Sequential => kernels
                .iter()
                .enumerate()
                .map(|(index, kernel)| self.branch(index, &padded, kernel))
                .collect(),
            Execution::Parallel => kernels
                .par_iter()
                .enumerate()
                .map(|(index, kernel)| self.branch(index, &padded, kernel))
                .collect(),
        }
    }

    /// 1 カーネル分の 相互相関 → シグモイド → プーリング
    fn branch<G: Grid>(&self, index: usize, padded: &G, kernel: &Kernel<G>) -> ConvResult<G> {
        let start = Instant::now();
        let mut activated = self.conv.apply(padded, kernel.grid())?;
        Sigmoid::apply(&mut activated);
        let pooled = self.pool.apply(&activated)?;
        log::debug!(
            "kernel #{index}: conv {}x{} -> pooled {}x{} in {:.3} ms",
            activated.dimension(),
            activated.dimension(),
            pooled.dimension(),
            pooled.dimension(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(pooled)
    }
}

/// 全カーネルが同じ一辺であることを確認し、その一辺を返す
pub fn common_kernel_size<G: Grid>(kernels: &[Kernel<G>]) -> ConvResult<usize> {
    let first = kernels.first().ok_or(ConvError::NoKernels)?;
    let expected = first.size();
    if let Some((index, bad)) = kernels.iter().enumerate().find(|(_, k)| k.size() != expected) {
        return Err(ConvError::KernelSizeMismatch {
            index,
            expected,
            actual: bad.size(),
        });
    }
    Ok(expected)
}

#[cfg(test)]
mod tests;

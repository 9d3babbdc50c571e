//! 2D 相互相関（カーネル非反転）
//!
//! `output[y][x] = Σ_i Σ_j input[y + i][x + j] * kernel[i][j]`
//!
//! 出力一辺は `input - kernel + 1`。計算量は O(out² · k²) で、
//! このステージがパイプライン全体のホットループになる。

use super::{Execution, fill_rows};
use crate::error::{ConvError, ConvResult};
use crate::grid::Grid;

/// 畳み込み出力の一辺（カーネルが空、または入力より大きい場合は `None`）
#[inline]
pub const fn conv_output_size(input_size: usize, kernel_size: usize) -> Option<usize> {
    if kernel_size == 0 || kernel_size > input_size {
        None
    } else {
        Some(input_size - kernel_size + 1)
    }
}

/// 相互相関ステージ
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossCorrelation {
    execution: Execution,
}

impl CrossCorrelation {
    pub const fn new(execution: Execution) -> Self {
        Self { execution }
    }

    /// `input` と `kernel` の相互相関を計算
    ///
    /// 各セルは倍精度で (i, j) の行優先順に累積する。
    /// カーネルが入力に収まらない場合は `InvalidDimensions`（出力は作らない）。
    pub fn apply<G: Grid>(&self, input: &G, kernel: &G) -> ConvResult<G> {
        let n = input.dimension();
        let k = kernel.dimension();
        let out_size = conv_output_size(n, k).ok_or_else(|| {
            ConvError::invalid(
                "convolution",
                format!("kernel {k}x{k} does not fit input {n}x{n}"),
            )
        })?;

        let mut out = G::create(out_size)?;
        fill_rows(&mut out, self.execution, |y, row| {
            for (x, cell) in row.iter_mut().enumerate() {
                let mut sum = 0.0f64;
                for i in 0..k {
                    let window = &input.row(y + i)[x..x + k];
                    for (a, w) in window.iter().zip(kernel.row(i)) {
                        sum += a * w;
                    }
                }
                *cell = sum;
            }
        });
        Ok(out)
    }
}

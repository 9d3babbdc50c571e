//! 最大値プーリング
//!
//! 出力一辺は `⌊(input - size) / stride⌋ + 1`。
//! `stride < size` なら窓が重なり、`stride > size` なら要素を読み飛ばす。
//! 最後の完全な窓より先の要素は無視する（パディングしない）。

use super::{Execution, fill_rows};
use crate::error::{ConvError, ConvResult};
use crate::grid::Grid;

/// 正方窓の最大値プーリング
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxPool {
    size: usize,
    stride: usize,
    execution: Execution,
}

impl MaxPool {
    /// 窓 `size`、ストライド `stride`（いずれも 1 以上）
    pub fn new(size: usize, stride: usize) -> ConvResult<Self> {
        if size == 0 || stride == 0 {
            return Err(ConvError::invalid(
                "pooling",
                format!("pool size {size} and stride {stride} must both be >= 1"),
            ));
        }
        Ok(Self {
            size,
            stride,
            execution: Execution::default(),
        })
    }

    pub fn with_execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    #[inline]
    pub const fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub const fn stride(&self) -> usize {
        self.stride
    }

    /// 入力一辺に対する出力一辺（窓が入力に収まらなければ `None`）
    #[inline]
    pub const fn output_size(&self, input_size: usize) -> Option<usize> {
        if self.size > input_size {
            None
        } else {
            Some((input_size - self.size) / self.stride + 1)
        }
    }

    /// プーリングを適用
    ///
    /// 窓内の最大値のみを残す（同値の位置は保持しない）。NaN は比較で常に負けるため無視される。
    pub fn apply<G: Grid>(&self, input: &G) -> ConvResult<G> {
        let n = input.dimension();
        let out_size = self.output_size(n).ok_or_else(|| {
            ConvError::invalid(
                "pooling",
                format!("pool window {0}x{0} does not fit input {n}x{n}", self.size),
            )
        })?;

        let (size, stride) = (self.size, self.stride);
        let mut out = G::create(out_size)?;
        fill_rows(&mut out, self.execution, |y, row| {
            for (x, cell) in row.iter_mut().enumerate() {
                let mut best = f64::NEG_INFINITY;
                for i in 0..size {
                    for &v in &input.row(y * stride + i)[x * stride..x * stride + size] {
                        if v > best {
                            best = v;
                        }
                    }
                }
                *cell = best;
            }
        });
        Ok(out)
    }
}

//! ゼロパディング

use crate::error::ConvResult;
use crate::grid::Grid;

/// カーネル一辺 `kernel_size` に対するパディング幅（整数除算）
#[inline]
pub const fn pad_width_for(kernel_size: usize) -> usize {
    kernel_size / 2
}

/// 四辺に幅 `width` のゼロ縁を付ける
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZeroPad {
    pub width: usize,
}

impl ZeroPad {
    pub const fn new(width: usize) -> Self {
        Self { width }
    }

    pub const fn for_kernel(kernel_size: usize) -> Self {
        Self::new(pad_width_for(kernel_size))
    }

    /// パディング後の一辺 `input_size + 2 * width`
    #[inline]
    pub const fn output_size(&self, input_size: usize) -> usize {
        input_size + 2 * self.width
    }

    /// `input` を内側にコピーしたパディング済みグリッドを返す
    ///
    /// 出力はゼロ初期化で確保するため、縁は書き込まずに 0.0 のまま残る。
    /// 固定容量グリッドでは `output_size` が容量を超えると `CapacityExceeded`。
    pub fn apply<G: Grid>(&self, input: &G) -> ConvResult<G> {
        let n = input.dimension();
        let p = self.width;
        let mut out = G::create(self.output_size(n))?;
        for i in 0..n {
            out.row_mut(i + p)[p..p + n].copy_from_slice(input.row(i));
        }
        Ok(out)
    }
}

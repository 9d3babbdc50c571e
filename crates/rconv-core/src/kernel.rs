//! 畳み込みカーネル

use crate::error::{ConvError, ConvResult};
use crate::grid::Grid;
use crate::layers::pad_width_for;

/// 読み込み後は不変のフィルタグリッド
///
/// 通常は奇数サイズ。偶数サイズも受け付けるが、パディング幅 `size / 2` では
/// 出力が入力より 1 大きくなるため警告を出す。
#[derive(Debug, Clone)]
pub struct Kernel<G: Grid> {
    grid: G,
}

impl<G: Grid> Kernel<G> {
    pub fn new(grid: G) -> ConvResult<Self> {
        let size = grid.dimension();
        if size == 0 {
            return Err(ConvError::invalid("kernel", "kernel must be at least 1x1"));
        }
        if size % 2 == 0 {
            log::warn!("even kernel size {size}: padded convolution output grows by one");
        }
        Ok(Self { grid })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.grid.dimension()
    }

    /// 対称ゼロパディング幅（`size / 2`）
    #[inline]
    pub fn pad_width(&self) -> usize {
        pad_width_for(self.size())
    }

    #[inline]
    pub fn grid(&self) -> &G {
        &self.grid
    }

    pub fn into_inner(self) -> G {
        self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::DynamicGrid;

    #[test]
    fn test_pad_width() {
        let k = Kernel::new(DynamicGrid::create(5).unwrap()).unwrap();
        assert_eq!(k.size(), 5);
        assert_eq!(k.pad_width(), 2);
        let k = Kernel::new(DynamicGrid::create(1).unwrap()).unwrap();
        assert_eq!(k.pad_width(), 0);
    }

    #[test]
    fn test_empty_kernel_rejected() {
        assert!(Kernel::new(DynamicGrid::create(0).unwrap()).is_err());
    }
}

//! 固定容量グリッド
//!
//! `CAP × CAP` の領域を生成時に一括確保し、左上 `size × size` のみを使う。
//! 行ストライドは常に `CAP`。`size > CAP` の生成は `CapacityExceeded` で拒否する。

use super::{Grid, GridLayout};
use crate::error::{ConvError, ConvResult};
use std::fmt;

/// 既定の最大一辺長
pub const DEFAULT_CAPACITY: usize = 300;

/// 固定容量の正方グリッド
#[derive(Clone)]
pub struct BoundedGrid<const CAP: usize = DEFAULT_CAPACITY> {
    size: usize,
    /// 長さ `CAP * CAP`、行ストライド `CAP`
    buf: Box<[f64]>,
}

impl<const CAP: usize> BoundedGrid<CAP> {
    /// 一辺の最大要素数
    pub const CAPACITY: usize = CAP;

    #[inline]
    fn row_start(&self, row: usize) -> usize {
        assert!(
            row < self.size,
            "row {row} out of bounds for {0}x{0} bounded grid",
            self.size
        );
        row * CAP
    }
}

impl<const CAP: usize> Grid for BoundedGrid<CAP> {
    const LAYOUT: GridLayout = GridLayout::Bounded;

    fn create(size: usize) -> ConvResult<Self> {
        if size > CAP {
            return Err(ConvError::CapacityExceeded {
                requested: size,
                capacity: CAP,
            });
        }
        Ok(Self {
            size,
            buf: vec![0.0; CAP * CAP].into_boxed_slice(),
        })
    }

    #[inline]
    fn dimension(&self) -> usize {
        self.size
    }

    fn max_dimension() -> Option<usize> {
        Some(CAP)
    }

    #[inline]
    fn row(&self, row: usize) -> &[f64] {
        let start = self.row_start(row);
        &self.buf[start..start + self.size]
    }

    #[inline]
    fn row_mut(&mut self, row: usize) -> &mut [f64] {
        let start = self.row_start(row);
        let size = self.size;
        &mut self.buf[start..start + size]
    }

    fn rows_mut(&mut self) -> Vec<&mut [f64]> {
        let size = self.size;
        if size == 0 {
            return Vec::new();
        }
        self.buf
            .chunks_exact_mut(CAP)
            .take(size)
            .map(|row| &mut row[..size])
            .collect()
    }
}

impl<const CAP: usize> fmt::Debug for BoundedGrid<CAP> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedGrid")
            .field("size", &self.size)
            .field("capacity", &CAP)
            .field("rows", &self.to_rows())
            .finish()
    }
}

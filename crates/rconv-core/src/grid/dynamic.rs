//! 動的確保グリッド
//!
//! `size` 本の行をそれぞれ長さ `size` で確保する。容量上限はない。

use super::{Grid, GridLayout};
use crate::error::{ConvError, ConvResult};

/// 行単位で確保する正方グリッド
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicGrid {
    rows: Vec<Box<[f64]>>,
}

impl DynamicGrid {
    /// 行のリストから作る（正方でなければ `InvalidDimensions`）
    pub fn from_rows(rows: Vec<Vec<f64>>) -> ConvResult<Self> {
        let size = rows.len();
        if let Some((r, bad)) = rows.iter().enumerate().find(|(_, row)| row.len() != size) {
            return Err(ConvError::invalid(
                "grid",
                format!("row {r} has {} elements, expected {size}", bad.len()),
            ));
        }
        Ok(Self {
            rows: rows.into_iter().map(Vec::into_boxed_slice).collect(),
        })
    }
}

impl Grid for DynamicGrid {
    const LAYOUT: GridLayout = GridLayout::Dynamic;

    fn create(size: usize) -> ConvResult<Self> {
        Ok(Self {
            rows: (0..size).map(|_| vec![0.0; size].into_boxed_slice()).collect(),
        })
    }

    #[inline]
    fn dimension(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    fn row(&self, row: usize) -> &[f64] {
        &self.rows[row]
    }

    #[inline]
    fn row_mut(&mut self, row: usize) -> &mut [f64] {
        &mut self.rows[row]
    }

    fn rows_mut(&mut self) -> Vec<&mut [f64]> {
        self.rows.iter_mut().map(|row| &mut row[..]).collect()
    }
}

//! 正方グリッド
//!
//! パイプライン全体が扱う `size × size` の f64 バッファ。
//! 表現は 2 種類あり、どちらも [`Grid`] を実装する:
//!
//! - [`BoundedGrid`]: 固定容量 `CAP × CAP` を生成時に確保し、その範囲内で使う
//! - [`DynamicGrid`]: `size` 行をちょうどの長さで行ごとに確保する
//!
//! 各ステージ（パディング・畳み込み・活性化・プーリング）は [`Grid`] のみに依存し、
//! どちらの表現が渡されても同じ結果を返す。
//!
//! # 範囲外アクセス
//!
//! `get`/`set`/`row` の範囲外アクセスはプログラミングエラーとして panic する。
//! 外部入力由来の座標を扱う場合は `try_get`/`try_set` を使うこと。

mod bounded;
mod dynamic;

pub use bounded::{BoundedGrid, DEFAULT_CAPACITY};
pub use dynamic::DynamicGrid;

use crate::error::{ConvError, ConvResult};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// グリッドのメモリ表現
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridLayout {
    /// 固定容量バッファ（[`BoundedGrid`]）
    Bounded,
    /// 行単位の動的確保（[`DynamicGrid`]）
    #[default]
    Dynamic,
}

impl GridLayout {
    pub const fn name(self) -> &'static str {
        match self {
            GridLayout::Bounded => "bounded",
            GridLayout::Dynamic => "dynamic",
        }
    }
}

impl fmt::Display for GridLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GridLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bounded" => Ok(GridLayout::Bounded),
            "dynamic" => Ok(GridLayout::Dynamic),
            other => Err(format!("unknown grid layout '{other}' (expected bounded|dynamic)")),
        }
    }
}

/// `size × size` の倍精度グリッド
///
/// 生成後のリサイズは不可。行は長さ `dimension()` のスライスとして公開する。
pub trait Grid: Clone + Send + Sync + Sized {
    /// この実装のメモリ表現
    const LAYOUT: GridLayout;

    /// ゼロ初期化した `size × size` グリッドを確保
    fn create(size: usize) -> ConvResult<Self>;

    /// 一辺の要素数
    fn dimension(&self) -> usize;

    /// 生成できる一辺の上限（無制限なら `None`）
    fn max_dimension() -> Option<usize> {
        None
    }

    /// 行 `row` への参照（長さは `dimension()`）
    fn row(&self, row: usize) -> &[f64];

    /// 行 `row` への可変参照（長さは `dimension()`）
    fn row_mut(&mut self, row: usize) -> &mut [f64];

    /// 全行への互いに重ならない可変参照（行順）
    ///
    /// 行ごとに別スレッドへ渡して直接書き込むために使う。
    fn rows_mut(&mut self) -> Vec<&mut [f64]>;

    #[inline]
    fn get(&self, row: usize, col: usize) -> f64 {
        self.row(row)[col]
    }

    #[inline]
    fn set(&mut self, row: usize, col: usize, value: f64) {
        self.row_mut(row)[col] = value;
    }

    /// 範囲検査付きの読み出し
    fn try_get(&self, row: usize, col: usize) -> ConvResult<f64> {
        let size = self.dimension();
        if row >= size || col >= size {
            return Err(ConvError::OutOfBounds { row, col, size });
        }
        Ok(self.get(row, col))
    }

    /// 範囲検査付きの書き込み
    fn try_set(&mut self, row: usize, col: usize, value: f64) -> ConvResult<()> {
        let size = self.dimension();
        if row >= size || col >= size {
            return Err(ConvError::OutOfBounds { row, col, size });
        }
        self.set(row, col, value);
        Ok(())
    }

    /// 行優先に並んだ `size * size` 個の値からグリッドを作る
    fn from_values(size: usize, values: &[f64]) -> ConvResult<Self> {
        let expected = size
            .checked_mul(size)
            .ok_or_else(|| ConvError::invalid("grid", format!("size {size} is too large")))?;
        if values.len() != expected {
            return Err(ConvError::invalid(
                "grid",
                format!("{} values given for a {size}x{size} grid", values.len()),
            ));
        }
        let mut grid = Self::create(size)?;
        if size > 0 {
            for (r, chunk) in values.chunks_exact(size).enumerate() {
                grid.row_mut(r).copy_from_slice(chunk);
            }
        }
        Ok(grid)
    }

    /// 全要素に `f` を適用（確保なし）
    fn map_in_place<F: Fn(f64) -> f64>(&mut self, f: F) {
        for r in 0..self.dimension() {
            for v in self.row_mut(r).iter_mut() {
                *v = f(*v);
            }
        }
    }

    fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.dimension()).map(|r| self.row(r).to_vec()).collect()
    }

    /// 同じ大きさのグリッドとの要素差の最大絶対値（大きさが違えば `None`）
    fn max_abs_diff<H: Grid>(&self, other: &H) -> Option<f64> {
        if self.dimension() != other.dimension() {
            return None;
        }
        let mut worst = 0.0f64;
        for r in 0..self.dimension() {
            for (a, b) in self.row(r).iter().zip(other.row(r)) {
                worst = worst.max((a - b).abs());
            }
        }
        Some(worst)
    }
}

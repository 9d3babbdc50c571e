//! レイヤーステージの実装
//!
//! - `ZeroPad`: カーネル幅の半分による対称ゼロパディング
//! - `CrossCorrelation`: カーネルを反転しない 2D 畳み込み
//! - `Sigmoid`: 要素ごとのロジスティック関数（インプレース）
//! - `MaxPool`: ストライド付き最大値プーリング
//!
//! 各ステージは入力グリッドを借用し、新しいグリッドを所有権ごと返す
//! （`Sigmoid` のみ受け取ったグリッドを書き換える）。

mod activation;
mod convolution;
mod padding;
mod pooling;

pub use activation::{Sigmoid, sigmoid};
pub use convolution::{CrossCorrelation, conv_output_size};
pub use padding::{ZeroPad, pad_width_for};
pub use pooling::MaxPool;

use crate::grid::Grid;
use rayon::prelude::*;

/// 行方向の実行方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Execution {
    /// 呼び出しスレッドで順に計算
    Sequential,
    /// rayon で出力行・カーネル分岐を並列計算
    #[default]
    Parallel,
}

/// 出力グリッドの各行を `fill_row(y, row)` で埋める
///
/// 各セルは入力の読み取り専用領域に対する独立な縮約なので、行単位で分割しても
/// セルごとの加算順序は変わらない（逐次と並列で結果はビット単位で一致する）。
pub(crate) fn fill_rows<G, F>(out: &mut G, execution: Execution, fill_row: F)
where
    G: Grid,
    F: Fn(usize, &mut [f64]) + Send + Sync,
{
    let size = out.dimension();
    match execution {
        Execution::Sequential => {
            for y in 0..size {
                fill_row(y, out.row_mut(y));
            }
        }
        Execution::Parallel => {
            out.rows_mut()
                .into_par_iter()
                .enumerate()
                .for_each(|(y, row)| fill_row(y, row));
        }
    }
}

//! # rconv-core: 単層畳み込みの順伝播
//!
//! 正方グリッドの入力と同サイズのカーネル群から、カーネルごとに
//! ゼロパディング → 相互相関 → シグモイド → 最大値プーリング を行う。
//!
//! ## 構成
//!
//! - **grid**: `Grid` トレイトと 2 つの表現（固定容量 / 動的確保）
//! - **layers**: 各ステージ（`ZeroPad`, `CrossCorrelation`, `Sigmoid`, `MaxPool`）
//! - **pipeline**: カーネル分岐を束ねる `Pipeline`
//! - **matrix_io** / **report**: 行列ファイルの読み込みと結果テキストの出力
//!
//! ## 使い方
//!
//! ```ignore
//! use rconv_core::*;
//!
//! let input: DynamicGrid = load_matrix("input.txt")?;
//! let kernels = ["kernel1.txt", "kernel2.txt", "kernel3.txt"]
//!     .iter()
//!     .map(|p| Kernel::new(load_matrix(p)?))
//!     .collect::<ConvResult<Vec<_>>>()?;
//!
//! let pipeline = Pipeline::new(&PipelineConfig::default())?;
//! let pooled = pipeline.forward(&input, &kernels)?;
//! print!("{}", render_pooled(&pooled));
//! ```

pub mod error;
pub mod grid;
pub mod kernel;
pub mod layers;
pub mod matrix_io;
pub mod pipeline;
pub mod report;
pub mod stream;

// Re-export primary types
pub use error::{ConvError, ConvResult};
pub use grid::{BoundedGrid, DEFAULT_CAPACITY, DynamicGrid, Grid, GridLayout};
pub use kernel::Kernel;
pub use layers::{CrossCorrelation, Execution, MaxPool, Sigmoid, ZeroPad, sigmoid};
pub use matrix_io::{load_matrix, parse_matrix, read_matrix, write_matrix};
pub use pipeline::{Pipeline, PipelineConfig, StageSizes};
pub use report::{RESULT_HEADER, format_scientific, render_pooled, write_pooled};
pub use stream::{OutputSink, open_reader};

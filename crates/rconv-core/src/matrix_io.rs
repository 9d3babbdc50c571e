//! 行列ファイルの読み書き
//!
//! # フォーマット
//!
//! 空白区切りのトークン列。先頭が一辺 `size`（正の整数）、続いて
//! `size × size` 個の実数が行優先で並ぶ。改行位置は意味を持たない。
//!
//! ```text
//! 3
//! 0.1 0.2 0.3
//! 0.4 0.5 0.6
//! 0.7 0.8 0.9
//! ```

use crate::error::{ConvError, ConvResult};
use crate::grid::Grid;
use crate::stream::open_reader;
use std::io::{self, Read, Write};
use std::path::Path;

/// テキストから行列を読み込む
///
/// 値の後に余分なトークンがあれば警告して無視する。
pub fn read_matrix<G: Grid, R: Read>(mut reader: R) -> ConvResult<G> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_matrix(&text)
}

/// ファイルから行列を読み込む（`.gz` は展開、`-` は標準入力）
pub fn load_matrix<G: Grid, P: AsRef<Path>>(path: P) -> ConvResult<G> {
    let path = path.as_ref();
    let grid: G = read_matrix(open_reader(path)?)?;
    log::debug!(
        "loaded {}x{} matrix from {}",
        grid.dimension(),
        grid.dimension(),
        path.display()
    );
    Ok(grid)
}

/// 文字列から行列を解析する
pub fn parse_matrix<G: Grid>(text: &str) -> ConvResult<G> {
    let mut tokens = text.split_whitespace();

    let size_token = tokens.next().ok_or_else(|| ConvError::MatrixFormat {
        token: 0,
        reason: "missing size".to_string(),
    })?;
    let size: usize = size_token.parse().map_err(|_| ConvError::MatrixFormat {
        token: 0,
        reason: format!("size '{size_token}' is not a non-negative integer"),
    })?;
    if size == 0 {
        return Err(ConvError::MatrixFormat {
            token: 0,
            reason: "size must be positive".to_string(),
        });
    }
    let Some(expected) = size.checked_mul(size) else {
        return Err(ConvError::MatrixFormat {
            token: 0,
            reason: format!("size {size} is too large"),
        });
    };
    if let Some(capacity) = G::max_dimension() {
        if size > capacity {
            return Err(ConvError::CapacityExceeded { requested: size, capacity });
        }
    }

    // 値が揃うまでグリッドは確保しない（巨大な一辺だけのファイル対策）
    let mut values = Vec::new();
    for index in 1..=expected {
        let token = tokens.next().ok_or_else(|| ConvError::MatrixFormat {
            token: index,
            reason: format!("expected {expected} values, found {}", index - 1),
        })?;
        values.push(token.parse::<f64>().map_err(|_| ConvError::MatrixFormat {
            token: index,
            reason: format!("'{token}' is not a number"),
        })?);
    }
    let grid = G::from_values(size, &values)?;

    let trailing = tokens.count();
    if trailing > 0 {
        log::warn!("ignoring {trailing} trailing token(s) after {size}x{size} matrix");
    }
    Ok(grid)
}

/// 読み込みと同じフォーマットで書き出す（一辺を 1 行目、以降 1 行 1 行）
pub fn write_matrix<G: Grid, W: Write>(writer: &mut W, grid: &G) -> io::Result<()> {
    writeln!(writer, "{}", grid.dimension())?;
    for r in 0..grid.dimension() {
        let mut first = true;
        for v in grid.row(r) {
            if !first {
                writer.write_all(b" ")?;
            }
            write!(writer, "{v}")?;
            first = false;
        }
        writer.write_all(b"\n")?;
    }
    Ok(())
}

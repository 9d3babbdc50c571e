//! プーリング結果のテキスト出力
//!
//! # フォーマット
//!
//! ```text
//! Max Pooled Result:
//! [[v00 v01]
//!  [v10 v11]]
//!
//! [[...]
//!  [...]]
//!
//! [[...]
//!  [...]]]
//! ```
//!
//! 値は C の `%.8e` 相当（仮数 8 桁、指数は符号付き 2 桁以上）。
//! 最後のブロックのみ閉じ括弧が 2 つ続く。

use crate::grid::Grid;
use std::io::{self, Write};

/// 出力の見出し行
pub const RESULT_HEADER: &str = "Max Pooled Result:";

/// C の `%.8e` と同じ表記にする
///
/// Rust の `{:.8e}` は `5.00000000e-1` となるため、指数部を `e-01` 形式に直す。
pub fn format_scientific(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let formatted = format!("{value:.8e}");
    let Some((mantissa, exponent)) = formatted.split_once('e') else {
        return formatted;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return formatted;
    };
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
}

/// 全ブロックを 1 つの文字列に整形する
pub fn render_pooled<G: Grid>(outputs: &[G]) -> String {
    let mut out = String::new();
    out.push_str(RESULT_HEADER);
    out.push_str("\n[");
    if outputs.is_empty() {
        out.push_str("]\n");
        return out;
    }

    for (b, grid) in outputs.iter().enumerate() {
        let size = grid.dimension();
        for r in 0..size {
            out.push('[');
            for (c, &v) in grid.row(r).iter().enumerate() {
                if c > 0 {
                    out.push(' ');
                }
                out.push_str(&format_scientific(v));
            }
            out.push(']');
            if r + 1 < size {
                out.push_str("\n ");
            }
        }
        if b + 1 < outputs.len() {
            out.push_str("]\n\n[");
        } else {
            out.push_str("]]\n");
        }
    }
    out
}

/// 整形済みの結果を書き出す
///
/// 先に全体を文字列化するため、書き込み開始後に整形で失敗することはない。
pub fn write_pooled<G: Grid, W: Write>(writer: &mut W, outputs: &[G]) -> io::Result<()> {
    writer.write_all(render_pooled(outputs).as_bytes())
}

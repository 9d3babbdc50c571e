//! 実行設定
//!
//! TOML ファイル（任意）で与え、コマンドライン引数で個別に上書きする。
//! 既定値は入力 `input.txt`、カーネル `kernel1.txt`〜`kernel3.txt`、出力 `output.txt`、
//! プーリング 2×2・ストライド 2。

use anyhow::{Context, Result, bail};
use rconv_core::{Execution, GridLayout, PipelineConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// `rconv` の実行設定
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// 入力行列ファイル
    pub input: PathBuf,
    /// カーネル行列ファイル（この順に結果ブロックを出力）
    pub kernels: Vec<PathBuf>,
    /// 結果ファイル（`-` で標準出力、`.gz` で圧縮）
    pub output: PathBuf,
    pub pool_size: usize,
    pub stride: usize,
    /// グリッド表現
    pub layout: GridLayout,
    /// カーネル分岐・出力行を rayon で並列計算するか
    pub parallel: bool,
    /// rayon のワーカー数（0 = rayon 既定）
    pub threads: usize,
    /// 経過表示の間隔（秒、0 で無効）
    pub status_interval_secs: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("input.txt"),
            kernels: vec![
                PathBuf::from("kernel1.txt"),
                PathBuf::from("kernel2.txt"),
                PathBuf::from("kernel3.txt"),
            ],
            output: PathBuf::from("output.txt"),
            pool_size: rconv_core::pipeline::DEFAULT_POOL_SIZE,
            stride: rconv_core::pipeline::DEFAULT_POOL_STRIDE,
            layout: GridLayout::default(),
            parallel: true,
            threads: 0,
            status_interval_secs: 2,
        }
    }
}

impl RunConfig {
    /// TOML ファイルから読み込む（未指定のキーは既定値）
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.kernels.is_empty() {
            bail!("at least one kernel file is required");
        }
        if self.pool_size == 0 || self.stride == 0 {
            bail!(
                "pool_size ({}) and stride ({}) must both be >= 1",
                self.pool_size,
                self.stride
            );
        }
        Ok(())
    }

    pub fn execution(&self) -> Execution {
        if self.parallel { Execution::Parallel } else { Execution::Sequential }
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            pool_size: self.pool_size,
            stride: self.stride,
            execution: self.execution(),
        }
    }
}

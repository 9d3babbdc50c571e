//! 入力行列・カーネル生成ツール
//!
//! `rconv` が読む `input.txt` と `kernel1.txt`〜`kernelN.txt` を乱数で作る。
//! シード指定時は同じ内容を再現できる。

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rconv_core::{DynamicGrid, Grid, OutputSink, write_matrix};

#[derive(Parser, Debug)]
#[command(name = "generate_matrices")]
#[command(about = "rconv 用の入力行列とカーネルを乱数で生成する")]
struct Cli {
    /// 入力行列の一辺
    #[arg(long, default_value_t = 300)]
    size: usize,

    /// カーネルの一辺（奇数推奨）
    #[arg(long, default_value_t = 3)]
    kernel_size: usize,

    /// カーネル数
    #[arg(long, default_value_t = 3)]
    kernels: usize,

    /// 乱数シード（省略時はランダム）
    #[arg(long)]
    seed: Option<u64>,

    /// 出力ディレクトリ
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// gzip 圧縮して `.txt.gz` で書き出す
    #[arg(long, default_value_t = false)]
    gzip: bool,
}

fn random_grid(rng: &mut Xoshiro256PlusPlus, size: usize, low: f64, high: f64) -> Result<DynamicGrid> {
    let mut grid = DynamicGrid::create(size)?;
    for r in 0..size {
        for v in grid.row_mut(r) {
            *v = rng.random_range(low..high);
        }
    }
    Ok(grid)
}

fn write_grid(path: &Path, grid: &DynamicGrid) -> Result<()> {
    let mut sink =
        OutputSink::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    write_matrix(&mut sink, grid).with_context(|| format!("failed to write {}", path.display()))?;
    sink.finish().with_context(|| format!("failed to finish {}", path.display()))?;
    log::info!("wrote {0}x{0} matrix to {1}", grid.dimension(), path.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if cli.size == 0 || cli.kernel_size == 0 {
        bail!("size ({}) and kernel-size ({}) must be >= 1", cli.size, cli.kernel_size);
    }
    if cli.kernels == 0 {
        bail!("at least one kernel is required");
    }
    if cli.kernel_size % 2 == 0 {
        log::warn!("even kernel size {} changes the convolution output size", cli.kernel_size);
    }

    let seed = cli.seed.unwrap_or_else(|| rand::rng().random());
    log::info!("seed: {seed}");
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);

    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("failed to create {}", cli.out_dir.display()))?;
    let ext = if cli.gzip { "txt.gz" } else { "txt" };

    let input = random_grid(&mut rng, cli.size, 0.0, 1.0)?;
    write_grid(&cli.out_dir.join(format!("input.{ext}")), &input)?;

    for i in 1..=cli.kernels {
        let kernel = random_grid(&mut rng, cli.kernel_size, -1.0, 1.0)?;
        write_grid(&cli.out_dir.join(format!("kernel{i}.{ext}")), &kernel)?;
    }
    Ok(())
}

//! rconv: 行列ファイルに対して畳み込み層を 1 回適用する

mod config;
mod status;

use anyhow::{Context, Result};
use clap::Parser;
use config::RunConfig;
use rconv_core::{
    BoundedGrid, DynamicGrid, Grid, GridLayout, Kernel, OutputSink, Pipeline, load_matrix,
    render_pooled,
};
use status::StatusReporter;
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "rconv", author, version)]
#[command(about = "Zero-pad, cross-correlate, sigmoid and max-pool a matrix with each kernel")]
struct Cli {
    /// TOML configuration file (flags below override its values)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input matrix file
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Kernel matrix file; repeat once per kernel, in output order
    #[arg(short = 'k', long = "kernel")]
    kernels: Vec<PathBuf>,

    /// Result file (`-` for stdout, `.gz` for gzip)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Max-pooling window size
    #[arg(long)]
    pool_size: Option<usize>,

    /// Max-pooling stride
    #[arg(long)]
    stride: Option<usize>,

    /// Grid representation: bounded | dynamic
    #[arg(long)]
    layout: Option<GridLayout>,

    /// Run kernel branches and rows on the calling thread only
    #[arg(long)]
    sequential: bool,

    /// Rayon worker threads (0 = rayon default)
    #[arg(long)]
    threads: Option<usize>,

    /// Seconds between "still computing" messages (0 disables)
    #[arg(long = "status-interval")]
    status_interval: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn init_logger(debug: bool) {
    let log_level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, log_level),
    )
    .format(|buf, record| writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args()))
    .write_style(env_logger::WriteStyle::Never)
    .init();
}

/// 設定ファイル（あれば）にコマンドライン引数を重ねる
fn resolve_config(cli: &Cli) -> Result<RunConfig> {
    let mut config = match &cli.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    if let Some(input) = &cli.input {
        config.input = input.clone();
    }
    if !cli.kernels.is_empty() {
        config.kernels = cli.kernels.clone();
    }
    if let Some(output) = &cli.output {
        config.output = output.clone();
    }
    if let Some(pool_size) = cli.pool_size {
        config.pool_size = pool_size;
    }
    if let Some(stride) = cli.stride {
        config.stride = stride;
    }
    if let Some(layout) = cli.layout {
        config.layout = layout;
    }
    if cli.sequential {
        config.parallel = false;
    }
    if let Some(threads) = cli.threads {
        config.threads = threads;
    }
    if let Some(secs) = cli.status_interval {
        config.status_interval_secs = secs;
    }
    config.validate()?;
    Ok(config)
}

/// 読み込み → 順伝播 → 書き出し
///
/// 結果は全て整形してから出力ファイルを作るため、失敗時に出力は残らない。
fn run<G: Grid>(config: &RunConfig) -> Result<()> {
    let input: G = load_matrix(&config.input)
        .with_context(|| format!("failed to load input matrix {}", config.input.display()))?;

    let kernels = config
        .kernels
        .iter()
        .map(|path| {
            let grid: G = load_matrix(path)
                .with_context(|| format!("failed to load kernel {}", path.display()))?;
            Kernel::new(grid).with_context(|| format!("invalid kernel {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    log::info!(
        "input {0}x{0}, {1} kernel(s), layout={2}, pool={3} stride={4}, execution={5:?}",
        input.dimension(),
        kernels.len(),
        G::LAYOUT,
        config.pool_size,
        config.stride,
        config.execution()
    );

    let pipeline = Pipeline::new(&config.pipeline_config())?;
    let pooled = pipeline.forward(&input, &kernels).context("forward pass failed")?;
    let text = render_pooled(&pooled);

    let mut sink = OutputSink::create(&config.output)
        .with_context(|| format!("failed to create {}", config.output.display()))?;
    sink.write_all(text.as_bytes())
        .with_context(|| format!("failed to write {}", config.output.display()))?;
    sink.finish()
        .with_context(|| format!("failed to finish {}", config.output.display()))?;

    let pooled_size = pooled.first().map_or(0, Grid::dimension);
    log::info!(
        "wrote {} block(s) of {pooled_size}x{pooled_size} to {}",
        pooled.len(),
        config.output.display()
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.debug);

    let config = resolve_config(&cli)?;
    log::debug!("config: {config:?}");

    if config.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build_global()
            .context("failed to build rayon thread pool")?;
    }

    let reporter = if config.status_interval_secs > 0 {
        Some(
            StatusReporter::spawn(Duration::from_secs(config.status_interval_secs))
                .context("failed to spawn status reporter")?,
        )
    } else {
        None
    };

    let start = Instant::now();
    let result = match config.layout {
        GridLayout::Bounded => run::<BoundedGrid>(&config),
        GridLayout::Dynamic => run::<DynamicGrid>(&config),
    };

    if let Some(reporter) = reporter {
        let reports = reporter.finish();
        log::debug!("status reporter stopped after {reports} report(s)");
    }
    result?;

    println!("Total execution time: {:.2} seconds", start.elapsed().as_secs_f64());
    Ok(())
}

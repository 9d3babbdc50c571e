//! 経過表示スレッド
//!
//! 計算中、一定間隔で経過時間をログに出す。停止は共有フラグ 1 つで伝え、
//! 計算データには一切触れない。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// バックグラウンドの経過表示
pub struct StatusReporter {
    stop: Arc<AtomicBool>,
    reports: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
}

impl StatusReporter {
    pub fn spawn(interval: Duration) -> std::io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let reports = Arc::new(AtomicU64::new(0));
        let handle = {
            let stop = Arc::clone(&stop);
            let reports = Arc::clone(&reports);
            thread::Builder::new()
                .name("rconv-status".to_string())
                .spawn(move || report_loop(&stop, &reports, interval))?
        };
        Ok(Self {
            stop,
            reports,
            handle: Some(handle),
        })
    }

    /// 停止してスレッドを回収し、出力した経過表示の回数を返す
    pub fn finish(mut self) -> u64 {
        self.shutdown();
        self.reports.load(Ordering::Relaxed)
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            // 待機中でも次の周期を待たずに抜けさせる
            handle.thread().unpark();
            if handle.join().is_err() {
                log::warn!("status reporter thread panicked");
            }
        }
    }
}

impl Drop for StatusReporter {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn report_loop(stop: &AtomicBool, reports: &AtomicU64, interval: Duration) {
    let start = Instant::now();
    let mut next = interval;
    while !stop.load(Ordering::Relaxed) {
        let elapsed = start.elapsed();
        if elapsed < next {
            thread::park_timeout(next - elapsed);
            continue;
        }
        log::info!("still computing... {:.0} s elapsed", elapsed.as_secs_f64());
        reports.fetch_add(1, Ordering::Relaxed);
        next += interval;
    }
}

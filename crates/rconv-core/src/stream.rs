//! Matrix/result stream helpers (gzip aware)
//!
//! `-` selects stdin/stdout; a `.gz` extension selects gzip (de)compression.

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

const STREAM_BUF_CAP: usize = 64 * 1024; // 64 KiB

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn is_gzip(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gz"))
}

/// Open `path` for buffered reading, transparently gunzipping `.gz` files.
pub fn open_reader<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    if is_stdio(path) {
        return Ok(Box::new(BufReader::with_capacity(STREAM_BUF_CAP, io::stdin())));
    }
    let file = File::open(path)?;
    if is_gzip(path) {
        return Ok(Box::new(BufReader::with_capacity(STREAM_BUF_CAP, GzDecoder::new(file))));
    }
    Ok(Box::new(BufReader::with_capacity(STREAM_BUF_CAP, file)))
}

/// Output destination; `finish()` must be called to surface flush/trailer errors.
#[must_use = "call .finish() to propagate compression/IO errors"]
pub enum OutputSink {
    File(BufWriter<File>),
    Stdout(io::Stdout),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl OutputSink {
    /// Create (truncate) `path`; gzip-compress when it ends in `.gz`.
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        if is_stdio(path) {
            return Ok(OutputSink::Stdout(io::stdout()));
        }
        let file = BufWriter::new(File::create(path)?);
        if is_gzip(path) {
            return Ok(OutputSink::Gzip(GzEncoder::new(file, Compression::default())));
        }
        Ok(OutputSink::File(file))
    }

    /// Write the gzip trailer (if any) and flush everything down to the file.
    pub fn finish(self) -> io::Result<()> {
        match self {
            OutputSink::File(w) => w.into_inner().map_err(|e| e.into_error())?.flush(),
            OutputSink::Stdout(mut s) => s.flush(),
            OutputSink::Gzip(e) => e.finish()?.into_inner().map_err(|e| e.into_error())?.flush(),
        }
    }
}

impl Write for OutputSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputSink::File(w) => w.write(buf),
            OutputSink::Stdout(s) => s.write(buf),
            OutputSink::Gzip(e) => e.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputSink::File(w) => w.flush(),
            OutputSink::Stdout(s) => s.flush(),
            OutputSink::Gzip(e) => e.flush(),
        }
    }
}

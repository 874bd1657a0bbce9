//! JSON-Lines file writer
//!
//! One writer owns one output file. Records are appended one JSON object per
//! line, in the order they are handed in.

use crate::CrawlError;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

/// Buffered writer for a single `.jsonl` file
pub struct JsonLinesWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    lines: usize,
}

impl JsonLinesWriter {
    /// Creates the file, truncating any previous contents
    pub async fn create(path: impl Into<PathBuf>) -> Result<Self, CrawlError> {
        let path = path.into();
        let file = File::create(&path)
            .await
            .map_err(|e| output_error(&path, e))?;

        Ok(Self {
            path,
            writer: BufWriter::new(file),
            lines: 0,
        })
    }

    /// Serializes `record` and appends it as one line
    pub async fn append<T: Serialize>(&mut self, record: &T) -> Result<(), CrawlError> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        self.writer
            .write_all(&line)
            .await
            .map_err(|e| output_error(&self.path, e))?;
        self.lines += 1;
        Ok(())
    }

    /// Number of lines appended so far
    pub fn lines_written(&self) -> usize {
        self.lines
    }

    /// Flushes buffered lines to disk and closes the file
    pub async fn finish(mut self) -> Result<usize, CrawlError> {
        self.writer
            .flush()
            .await
            .map_err(|e| output_error(&self.path, e))?;
        self.writer
            .get_mut()
            .sync_all()
            .await
            .map_err(|e| output_error(&self.path, e))?;
        Ok(self.lines)
    }
}

fn output_error(path: &Path, source: std::io::Error) -> CrawlError {
    CrawlError::Output {
        path: path.display().to_string(),
        source,
    }
}

//! JSON-lines writer for captured pages
//!
//! One object per line, `{"URL": ..., "HTML": ...}`, appended to
//! `<directory>/<prefix>_<YYYYmmdd_HHMMSS>.jsonl`.

use crate::fetch::FetchedPage;
use crate::output::OutputError;
use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct PageLine<'a> {
    #[serde(rename = "URL")]
    url: &'a str,

    #[serde(rename = "HTML")]
    html: &'a str,
}

/// Builds `<prefix>_<YYYYmmdd_HHMMSS>.jsonl`
pub fn output_file_name<Tz: TimeZone>(prefix: &str, timestamp: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}_{}.jsonl", prefix, timestamp.format("%Y%m%d_%H%M%S"))
}

/// Appends captured pages to a timestamped JSON-lines file
#[derive(Debug)]
pub struct JsonLinesWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    lines: usize,
}

impl JsonLinesWriter {
    /// Opens a file stamped with the current local time, creating `directory`
    /// if needed
    pub fn create(directory: &Path, prefix: &str) -> Result<Self, OutputError> {
        Self::create_at(directory, prefix, &Local::now())
    }

    /// Opens a file stamped with `timestamp`
    pub fn create_at(
        directory: &Path,
        prefix: &str,
        timestamp: &DateTime<Local>,
    ) -> Result<Self, OutputError> {
        fs::create_dir_all(directory)?;
        let path = directory.join(output_file_name(prefix, timestamp));

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        tracing::debug!("Writing pages to {}", path.display());

        Ok(Self {
            path,
            writer: BufWriter::new(file),
            lines: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lines written by this writer
    pub fn lines(&self) -> usize {
        self.lines
    }

    pub fn write_page(&mut self, url: &str, html: &str) -> Result<(), OutputError> {
        serde_json::to_writer(&mut self.writer, &PageLine { url, html })?;
        self.writer.write_all(b"\n")?;
        self.lines += 1;
        Ok(())
    }

    pub fn write_pages(&mut self, pages: &[FetchedPage]) -> Result<(), OutputError> {
        for page in pages {
            self.write_page(&page.url, &page.html)?;
        }
        Ok(())
    }

    /// Flushes buffered lines and returns the file path
    pub fn finish(mut self) -> Result<PathBuf, OutputError> {
        self.writer.flush()?;
        Ok(self.path)
    }
}

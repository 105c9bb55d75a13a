//! Edge-list reading.
//!
//! [`EdgeListReader`] yields one [`Edge`] per well-formed line. Blank lines
//! are skipped silently; lines with the wrong number of fields or invalid
//! UTF-8 are skipped and recorded in the reader's [`WarningCollector`].

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::edge::Edge;
use crate::error::Result;
use crate::warning::{Warning, WarningCollector};

/// Streaming reader for edge-list data.
///
/// The reader is an [`Iterator`] over `Result<Edge>`. Only I/O failures are
/// yielded as errors; after the first error (or end of input) the iterator
/// is exhausted.
///
/// # Examples
///
/// ```
/// use std::io::Cursor;
/// use wikidepth_edgelist::{Edge, EdgeListReader};
///
/// let data = Cursor::new("Physics Optics\nbroken line here\nOptics Lasers\n");
/// let mut reader = EdgeListReader::new(data);
/// let edges: Vec<Edge> = reader.by_ref().collect::<Result<_, _>>()?;
///
/// assert_eq!(edges.len(), 2);
/// assert_eq!(reader.warnings().len(), 1);
/// # Ok::<(), wikidepth_edgelist::Error>(())
/// ```
pub struct EdgeListReader<R> {
    reader: R,
    /// 1-based number of the last line read, 0 before any line.
    line_number: usize,
    buf: Vec<u8>,
    warnings: WarningCollector,
    done: bool,
}

impl EdgeListReader<BufReader<File>> {
    /// Opens an edge-list file for reading.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> EdgeListReader<R> {
    /// Creates a reader with its own warning collector.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self::with_collector(reader, WarningCollector::new())
    }

    /// Creates a reader that reports into an existing collector.
    #[must_use]
    pub fn with_collector(reader: R, warnings: WarningCollector) -> Self {
        Self {
            reader,
            line_number: 0,
            buf: Vec::new(),
            warnings,
            done: false,
        }
    }

    /// Returns the 1-based number of the last line read.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Returns the collector receiving this reader's warnings.
    #[must_use]
    pub fn warnings(&self) -> &WarningCollector {
        &self.warnings
    }

    /// Consumes the reader, returning the underlying buffered reader.
    #[must_use]
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn next_edge(&mut self) -> Result<Option<Edge>> {
        loop {
            self.buf.clear();
            if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let Ok(line) = std::str::from_utf8(&self.buf) else {
                debug!(line = self.line_number, "Skipping non UTF-8 edge line");
                self.warnings.add(Warning::InvalidUtf8 {
                    line_number: self.line_number,
                });
                continue;
            };

            let line = line.trim_end_matches(['\n', '\r']);
            if line.trim().is_empty() {
                continue;
            }

            match Edge::parse_line(line) {
                Ok(edge) => return Ok(Some(edge)),
                Err(field_count) => {
                    debug!(
                        line = self.line_number,
                        field_count, "Skipping malformed edge line"
                    );
                    self.warnings.add(Warning::MalformedLine {
                        line_number: self.line_number,
                        field_count,
                    });
                }
            }
        }
    }
}

impl<R: BufRead> Iterator for EdgeListReader<R> {
    type Item = Result<Edge>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let next = self.next_edge().transpose();
        if !matches!(next, Some(Ok(_))) {
            self.done = true;
        }
        next
    }
}

/// Reads a whole edge-list file into memory.
///
/// Returns the edges in file order together with any warnings.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn read_edge_list(path: impl AsRef<Path>) -> Result<(Vec<Edge>, Vec<Warning>)> {
    let mut reader = EdgeListReader::open(path)?;
    let edges = reader.by_ref().collect::<Result<Vec<_>>>()?;
    Ok((edges, reader.warnings().warnings()))
}

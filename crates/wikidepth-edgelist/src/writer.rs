//! Edge-list writing.

use std::io::{BufWriter, Write};

use crate::edge::{validate_title, Edge};
use crate::error::Result;

/// Buffered writer for edge-list data.
///
/// Every title is validated before it is written so that the output can be
/// read back to the identical edge multiset.
///
/// # Examples
///
/// ```
/// use wikidepth_edgelist::EdgeListWriter;
///
/// let mut writer = EdgeListWriter::new(Vec::new());
/// writer.write_edge("Physics", "Optics")?;
/// let bytes = writer.into_inner()?;
/// assert_eq!(bytes, b"Physics Optics\n");
/// # Ok::<(), wikidepth_edgelist::Error>(())
/// ```
pub struct EdgeListWriter<W: Write> {
    writer: BufWriter<W>,
    edges_written: usize,
}

impl<W: Write> EdgeListWriter<W> {
    /// Creates a new `EdgeListWriter` wrapping the given writer.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            edges_written: 0,
        }
    }

    /// Creates a new `EdgeListWriter` with a custom buffer capacity.
    #[must_use]
    pub fn with_capacity(writer: W, capacity: usize) -> Self {
        Self {
            writer: BufWriter::with_capacity(capacity, writer),
            edges_written: 0,
        }
    }

    /// Writes one `parent child` line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidField`](crate::Error::InvalidField) if either
    /// title is empty or contains whitespace, or an I/O error.
    pub fn write_edge(&mut self, parent: &str, child: &str) -> Result<()> {
        validate_title(parent)?;
        validate_title(child)?;
        writeln!(self.writer, "{parent} {child}")?;
        self.edges_written += 1;
        Ok(())
    }

    /// Writes every edge from an iterator, returning how many were written.
    ///
    /// # Errors
    ///
    /// Stops at the first invalid title or I/O error.
    pub fn write_all<'a, I>(&mut self, edges: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a Edge>,
    {
        let before = self.edges_written;
        for edge in edges {
            self.write_edge(&edge.parent, &edge.child)?;
        }
        Ok(self.edges_written - before)
    }

    /// Number of edges written so far.
    #[must_use]
    pub fn edges_written(&self) -> usize {
        self.edges_written
    }

    /// Flushes buffered data to the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flushes and returns the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the final flush fails.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| crate::Error::Io(e.into_error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn writes_one_line_per_edge() {
        let mut writer = EdgeListWriter::new(Vec::new());
        writer.write_edge("A", "B").expect("valid edge");
        writer.write_edge("B", "A").expect("valid edge");

        assert_eq!(writer.edges_written(), 2);
        let bytes = writer.into_inner().expect("flush to Vec");
        assert_eq!(String::from_utf8(bytes).expect("utf8"), "A B\nB A\n");
    }

    #[test]
    fn write_all_counts_edges() {
        let edges = [Edge::new("A", "B"), Edge::new("A", "A")];
        let mut writer = EdgeListWriter::with_capacity(Vec::new(), 64);

        let written = writer.write_all(&edges).expect("valid edges");
        assert_eq!(written, 2);
    }

    #[test]
    fn rejects_titles_with_spaces() {
        let mut writer = EdgeListWriter::new(Vec::new());
        let result = writer.write_edge("Quantum mechanics", "Optics");

        assert!(matches!(result, Err(Error::InvalidField(_))));
        assert_eq!(writer.edges_written(), 0);
        assert!(writer.into_inner().expect("flush").is_empty());
    }

    #[test]
    fn rejects_empty_child() {
        let mut writer = EdgeListWriter::new(Vec::new());
        assert!(writer.write_edge("Physics", "").is_err());
    }
}

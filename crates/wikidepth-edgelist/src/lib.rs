//! Reading and writing the subcategory edge-list cache.
//!
//! The cache is a plain text file with one `"<parent> <child>"` pair per line.
//! Titles never contain whitespace, so a single space separates the fields.
//! Reading is resilient: malformed lines are reported as [`Warning`]s and
//! skipped, and only I/O failures stop a read.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod atomic;
pub mod edge;
pub mod error;
pub mod reader;
pub mod warning;
pub mod writer;

pub use atomic::{write_edge_list_atomic, AtomicEdgeListFile};
pub use edge::{validate_title, Edge};
pub use error::{Error, Result};
pub use reader::{read_edge_list, EdgeListReader};
pub use warning::{Warning, WarningCollector};
pub use writer::EdgeListWriter;

/*!
 * Line-oriented document model for subtitle translation.
 *
 * A [`SourceDocument`] is the full input file as an ordered sequence of raw
 * lines, loaded once and never mutated. [`Chunk`]s are contiguous,
 * offset-tagged spans of those lines; together they partition the document
 * exactly, with no gaps and no overlap, so concurrent chunk tasks always write
 * disjoint line positions.
 */

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::error;

/// A contiguous span of document lines, tagged with its absolute start offset
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Absolute index of the first line of this chunk in the source document
    pub start: usize,

    /// The lines of this chunk, in original order
    pub lines: Vec<String>,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(start: usize, lines: Vec<String>) -> Self {
        Chunk { start, lines }
    }

    /// Number of lines in this chunk
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the chunk contains no lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// The full input document as an ordered, index-addressable line sequence
#[derive(Debug)]
pub struct SourceDocument {
    /// Raw lines in original order, trailing newlines stripped
    pub lines: Vec<String>,
}

impl SourceDocument {
    /// Create a document from already-loaded lines
    pub fn from_lines(lines: Vec<String>) -> Self {
        SourceDocument { lines }
    }

    /// Load a document from a UTF-8 text file.
    ///
    /// A read failure here is fatal for the whole job, so it propagates.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?;

        let lines = content.lines().map(|line| line.to_string()).collect();
        Ok(SourceDocument { lines })
    }

    /// Number of lines in the document
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the document contains no lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Split the document into fixed-size chunks that partition it exactly.
    ///
    /// Each chunk carries its absolute start offset; the last chunk may be
    /// shorter than `chunk_size`. Chunk size trades backend call overhead
    /// against the blast radius of a failed batch, so it is caller-tunable.
    pub fn chunks(&self, chunk_size: usize) -> Vec<Chunk> {
        let effective_size = chunk_size.max(1);

        let chunks: Vec<Chunk> = self
            .lines
            .chunks(effective_size)
            .enumerate()
            .map(|(i, window)| Chunk::new(i * effective_size, window.to_vec()))
            .collect();

        // Partition must be total and disjoint
        let total_chunked: usize = chunks.iter().map(|c| c.len()).sum();
        if total_chunked != self.lines.len() {
            error!(
                "Lost lines during chunking! Original: {}, after chunking: {}",
                self.lines.len(),
                total_chunked
            );
        }

        chunks
    }

    /// Write a final line sequence to a file, joined by newlines.
    ///
    /// Creates the parent directory if needed. A write failure is fatal for
    /// this document only and propagates to the caller.
    pub fn write_lines<P: AsRef<Path>>(path: P, lines: &[String]) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }

        fs::write(path, lines.join("\n"))
            .with_context(|| format!("Failed to write output file: {}", path.display()))
    }
}

//! Streaming CSV reader with iterator interface
//!
//! Provides a streaming iterator over ledger entries from a CSV file,
//! delegating format concerns to the csv_format module.
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Individual row parsing errors are yielded as Err variants in the
//!   iterator, with line numbers for debugging, and do not stop iteration

use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

use crate::io::csv_format::{convert_csv_record, CsvRecord, LedgerEntry};

/// Streaming ledger CSV reader
///
/// Reads one row at a time; memory usage is O(1) per row, not O(file size).
#[derive(Debug)]
pub struct LedgerReader {
    reader: csv::Reader<File>,
    line_num: usize,
}

impl LedgerReader {
    /// Open a ledger CSV file for streaming iteration
    ///
    /// The CSV reader trims whitespace and allows flexible field counts so
    /// the trailing optional columns can be omitted.
    ///
    /// # Errors
    ///
    /// Returns a message when the file cannot be opened.
    pub fn new(path: &Path) -> Result<Self, String> {
        let file = File::open(path)
            .map_err(|e| format!("Failed to open file '{}': {}", path.display(), e))?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 0,
        })
    }
}

impl Iterator for LedgerReader {
    type Item = Result<LedgerEntry, String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<CsvRecord>();

        match deserializer.next()? {
            Ok(csv_record) => {
                self.line_num += 1;
                // Line numbers are 1-based and offset by the header row.
                Some(
                    convert_csv_record(csv_record)
                        .map_err(|e| format!("Line {}: {}", self.line_num + 1, e)),
                )
            }
            Err(e) => {
                self.line_num += 1;
                Some(Err(format!(
                    "Line {}: CSV parse error: {}",
                    self.line_num + 1,
                    e
                )))
            }
        }
    }
}

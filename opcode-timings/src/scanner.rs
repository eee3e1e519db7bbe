//! The table scanner, which turns rows of cell text into opcode entries.

use log::{debug, info, warn};
use thiserror::Error;

use crate::cell::{parse_cell, CellParseError};
use crate::entry::OpcodeEntry;

/// Number of leading rows of the table which are headers and produce no entries.
pub const HEADER_ROWS: usize = 1;

/// What to do with a cell whose text can't be parsed.
#[derive(Default, Debug, Copy, Clone, Eq, PartialEq)]
pub enum MalformedCellPolicy {
    /// Emit the `<invalid>` sentinel for the cell and keep going.
    #[default]
    Lenient,
    /// Stop scanning and report the cell.
    Strict,
}

/// Error from scanning a table.
#[derive(Debug, Error)]
pub enum ScanError {
    /// A cell couldn't be parsed while scanning with [`MalformedCellPolicy::Strict`]. `row`
    /// and `column` are zero-based and count the header row.
    #[error("Malformed cell at row {row}, column {column} (opcode {opcode:#x}): {source}")]
    MalformedCell {
        opcode: u32,
        row: usize,
        column: usize,
        #[source]
        source: CellParseError,
    },
}

/// Counts describing the result of a scan.
#[derive(Default, Debug, Copy, Clone, Eq, PartialEq)]
pub struct ScanSummary {
    /// Total number of entries, one per cell.
    pub entries: usize,
    /// Number of entries which are the `<invalid>` sentinel.
    pub invalid: usize,
}

impl ScanSummary {
    pub fn of(entries: &[OpcodeEntry]) -> Self {
        Self {
            entries: entries.len(),
            invalid: entries.iter().filter(|entry| entry.is_invalid()).count(),
        }
    }
}

/// Accumulator threaded through the rows and cells of the table.
#[derive(Default)]
struct Scan {
    next_opcode: u32,
    entries: Vec<OpcodeEntry>,
}

impl Scan {
    fn push_cell(
        mut self,
        row: usize,
        column: usize,
        text: &str,
        policy: MalformedCellPolicy,
    ) -> Result<Self, ScanError> {
        let opcode = self.next_opcode;
        let entry = match parse_cell(text) {
            Ok(timing) => timing.into_entry(opcode),
            Err(source) if policy == MalformedCellPolicy::Strict => {
                return Err(ScanError::MalformedCell {
                    opcode,
                    row,
                    column,
                    source,
                });
            }
            // Unused opcodes have a single line in the table.
            Err(CellParseError::MissingTimingLine) => OpcodeEntry::invalid(opcode),
            Err(err) => {
                warn!(
                    "Cell at row {}, column {} (opcode {:#x}) is malformed, marking invalid: {}",
                    row, column, opcode, err
                );
                OpcodeEntry::invalid(opcode)
            }
        };
        debug!("Row {row}, column {column}: {entry}");
        self.entries.push(entry);
        self.next_opcode += 1;
        Ok(self)
    }
}

/// Scan a table, producing one entry per cell in every row after the header.
///
/// Opcodes are numbered from zero in the order cells are visited: every cell of a row, then
/// the next row. The numbering ignores row lengths, so a table can be split across rows of
/// any width (or across several tables) without leaving gaps.
pub fn scan_table<R>(
    rows: R,
    policy: MalformedCellPolicy,
) -> Result<Vec<OpcodeEntry>, ScanError>
where
    R: IntoIterator,
    R::Item: IntoIterator,
    <R::Item as IntoIterator>::Item: AsRef<str>,
{
    let scan = rows
        .into_iter()
        .enumerate()
        .skip(HEADER_ROWS)
        .try_fold(Scan::default(), |scan, (row, cells)| {
            cells
                .into_iter()
                .enumerate()
                .try_fold(scan, |scan, (column, text)| {
                    scan.push_cell(row, column, text.as_ref(), policy)
                })
        })?;

    let summary = ScanSummary::of(&scan.entries);
    info!(
        "Scanned {} opcode entries, {} invalid",
        summary.entries, summary.invalid
    );
    Ok(scan.entries)
}

/// Render entries as a C initializer list: each entry followed by a comma, nothing between.
pub fn render_entries(entries: &[OpcodeEntry]) -> String {
    entries.iter().map(|entry| format!("{entry},")).collect()
}

/// Scan a table and render the result in one go.
pub fn extract<R>(rows: R, policy: MalformedCellPolicy) -> Result<String, ScanError>
where
    R: IntoIterator,
    R::Item: IntoIterator,
    <R::Item as IntoIterator>::Item: AsRef<str>,
{
    Ok(render_entries(&scan_table(rows, policy)?))
}

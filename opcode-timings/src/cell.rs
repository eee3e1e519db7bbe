//! Parsing the text of a single opcode table cell.
//!
//! A cell holds the instruction name on its first line and a cycle-count descriptor on its
//! second, e.g. `"JR NZ,r8\n2  12t-8t\n- - - -"`. The descriptor is the second
//! whitespace-delimited token of the second line. It has one or two `-`-separated cycle
//! counts, each with a trailing unit character.

use std::num::ParseIntError;

use thiserror::Error;

use crate::entry::OpcodeEntry;

/// Name and cycle counts parsed out of one cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellTiming {
    pub name: String,
    pub cycles: u32,
    pub cycles_branch_taken: u32,
}

impl CellTiming {
    /// Attach the opcode index the cell was found at.
    pub fn into_entry(self, opcode: u32) -> OpcodeEntry {
        OpcodeEntry {
            opcode,
            name: self.name,
            cycles: self.cycles,
            cycles_branch_taken: self.cycles_branch_taken,
        }
    }
}

/// Ways a cell's text can fail to describe an instruction.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CellParseError {
    /// The cell has fewer than two lines. Unused opcodes are represented this way in the
    /// table, so this isn't necessarily a problem.
    #[error("Cell has no cycle count line")]
    MissingTimingLine,
    /// The second line has fewer than two whitespace-separated tokens.
    #[error("Cycle count line {line:?} has no cycle descriptor")]
    MissingCycleDescriptor { line: String },
    /// One of the `-` separated parts of the descriptor isn't a number.
    #[error("Invalid cycle count {segment:?}")]
    BadCycleCount {
        segment: String,
        #[source]
        source: ParseIntError,
    },
}

/// Parse the text of one cell.
pub fn parse_cell(text: &str) -> Result<CellTiming, CellParseError> {
    let mut lines = text.split('\n');
    let name = lines.next().unwrap_or_default();
    let timing = lines.next().ok_or(CellParseError::MissingTimingLine)?;

    let descriptor = timing.split_whitespace().nth(1).ok_or_else(|| {
        CellParseError::MissingCycleDescriptor {
            line: timing.to_string(),
        }
    })?;

    // Anything after a second '-' is ignored.
    let mut segments = descriptor.split('-');
    let cycles = parse_cycle_count(segments.next().unwrap_or_default())?;
    let cycles_branch_taken = match segments.next() {
        Some(segment) => parse_cycle_count(segment)?,
        None => cycles,
    };

    Ok(CellTiming {
        name: name.to_string(),
        cycles,
        cycles_branch_taken,
    })
}

/// Parse one cycle count, dropping its trailing unit character if it has one.
fn parse_cycle_count(segment: &str) -> Result<u32, CellParseError> {
    let digits = match segment.chars().next_back() {
        Some(unit) if !unit.is_ascii_digit() => &segment[..segment.len() - unit.len_utf8()],
        _ => segment,
    };
    digits
        .parse()
        .map_err(|source| CellParseError::BadCycleCount {
            segment: segment.to_string(),
            source,
        })
}

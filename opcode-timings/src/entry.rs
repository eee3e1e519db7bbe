//! Per-opcode entries and their C initializer literal form.
//!
//! An entry renders as `{ 0x<opcode>, "<name>", <cycles>, <cycles_branch_taken> }`, which
//! matches the layout of `struct instruction { int opcode; const char *format; int cycles; int
//! cycles_branch; }`. The scanner emits one of these per table cell, each followed by a comma.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use thiserror::Error;

/// Name used for the entry of a cell which couldn't be parsed.
pub const INVALID_NAME: &str = "<invalid>";

/// Pattern for a single rendered entry, without the trailing comma.
const ENTRY_PATTERN: &str =
    r#"\{ 0x(?P<opcode>[0-9a-fA-F]+), "(?P<name>.*?)", (?P<cycles>[0-9]+), (?P<taken>[0-9]+) \}"#;

/// Timing information for one opcode, taken from one cell of the table.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OpcodeEntry {
    /// Sequential index of the cell this entry came from.
    pub opcode: u32,
    /// Instruction name, verbatim from the first line of the cell.
    pub name: String,
    /// Cycles charged for the instruction. For a conditional branch this is the not-taken
    /// cost.
    pub cycles: u32,
    /// Cycles charged when a conditional branch is taken. Same as `cycles` for everything
    /// else.
    pub cycles_branch_taken: u32,
}

impl OpcodeEntry {
    pub fn new(
        opcode: u32,
        name: impl Into<String>,
        cycles: u32,
        cycles_branch_taken: u32,
    ) -> Self {
        Self {
            opcode,
            name: name.into(),
            cycles,
            cycles_branch_taken,
        }
    }

    /// Sentinel entry for a cell that had no usable timing information.
    pub fn invalid(opcode: u32) -> Self {
        Self::new(opcode, INVALID_NAME, 0, 0)
    }

    /// Whether this is the `<invalid>` sentinel.
    pub fn is_invalid(&self) -> bool {
        self.name == INVALID_NAME && self.cycles == 0 && self.cycles_branch_taken == 0
    }

    /// Whether taking the branch costs something different from not taking it.
    pub fn is_conditional(&self) -> bool {
        self.cycles != self.cycles_branch_taken
    }

    fn from_captures(caps: &Captures) -> Result<Self, ParseInitializerError> {
        let opcode = &caps["opcode"];
        let opcode = u32::from_str_radix(opcode, 16).map_err(|source| {
            ParseInitializerError::BadNumber {
                text: opcode.to_string(),
                source,
            }
        })?;
        Ok(Self::new(
            opcode,
            &caps["name"],
            parse_decimal(&caps["cycles"])?,
            parse_decimal(&caps["taken"])?,
        ))
    }
}

impl fmt::Display for OpcodeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ {:#x}, \"{}\", {}, {} }}",
            self.opcode, self.name, self.cycles, self.cycles_branch_taken
        )
    }
}

impl FromStr for OpcodeEntry {
    type Err = ParseInitializerError;

    /// Parses a single rendered entry, with no trailing comma.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        static SINGLE: Lazy<Regex> = Lazy::new(|| {
            Regex::new(&format!("^{ENTRY_PATTERN}$")).expect("entry pattern is valid")
        });
        let s = s.trim();
        match SINGLE.captures(s) {
            Some(caps) => Self::from_captures(&caps),
            None => Err(ParseInitializerError::Malformed { offset: 0 }),
        }
    }
}

/// Errors from reading rendered entries back in.
#[derive(Debug, Error)]
pub enum ParseInitializerError {
    /// The text at this byte offset is not a `{ 0x.., "..", .., .. },` entry.
    #[error("Expected an opcode entry at byte offset {offset}")]
    Malformed { offset: usize },
    /// A number in an entry doesn't fit in a `u32`.
    #[error("Number {text:?} in opcode entry is out of range")]
    BadNumber {
        text: String,
        #[source]
        source: ParseIntError,
    },
}

/// Reads a blob of rendered entries, as printed by the extractor, back into entries.
///
/// Every entry must be followed by a comma. Whitespace between entries and around the blob
/// is ignored.
pub fn parse_initializer(text: &str) -> Result<Vec<OpcodeEntry>, ParseInitializerError> {
    static LISTED: Lazy<Regex> = Lazy::new(|| {
        Regex::new(&format!("^{ENTRY_PATTERN},")).expect("entry pattern is valid")
    });

    let mut entries = Vec::new();
    let mut offset = 0;
    loop {
        let rest = &text[offset..];
        let trimmed = rest.trim_start();
        offset += rest.len() - trimmed.len();
        if trimmed.is_empty() {
            break;
        }
        let caps = LISTED
            .captures(trimmed)
            .ok_or(ParseInitializerError::Malformed { offset })?;
        entries.push(OpcodeEntry::from_captures(&caps)?);
        offset += caps.get(0).map_or(0, |m| m.end());
    }
    Ok(entries)
}

fn parse_decimal(text: &str) -> Result<u32, ParseInitializerError> {
    text.parse().map_err(|source| ParseInitializerError::BadNumber {
        text: text.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_lowercase_unpadded_hex() {
        assert_eq!(
            OpcodeEntry::new(0, "NOP", 4, 4).to_string(),
            r#"{ 0x0, "NOP", 4, 4 }"#
        );
        assert_eq!(
            OpcodeEntry::new(0x1ab, "SET 5,E", 8, 8).to_string(),
            r#"{ 0x1ab, "SET 5,E", 8, 8 }"#
        );
    }

    #[test]
    fn invalid_sentinel() {
        let entry = OpcodeEntry::invalid(0xd3);
        assert!(entry.is_invalid());
        assert!(!entry.is_conditional());
        assert_eq!(entry.to_string(), r#"{ 0xd3, "<invalid>", 0, 0 }"#);
        assert!(!OpcodeEntry::new(0xd3, INVALID_NAME, 4, 4).is_invalid());
    }

    #[test]
    fn parses_single_entry() {
        let entry: OpcodeEntry = r#" { 0x20, "JR NZ,r8", 8, 12 } "#.parse().unwrap();
        assert_eq!(entry, OpcodeEntry::new(0x20, "JR NZ,r8", 8, 12));
        assert!(entry.is_conditional());
    }

    #[test]
    fn single_entry_rejects_trailing_text() {
        assert!(matches!(
            r#"{ 0x20, "JR NZ,r8", 8, 12 },"#.parse::<OpcodeEntry>(),
            Err(ParseInitializerError::Malformed { offset: 0 })
        ));
    }

    #[test]
    fn parses_initializer_blob() {
        let text = "{ 0x0, \"NOP\", 4, 4 },{ 0x1, \"LD BC,d16\", 12, 12 },\n";
        let entries = parse_initializer(text).unwrap();
        assert_eq!(
            entries,
            vec![
                OpcodeEntry::new(0, "NOP", 4, 4),
                OpcodeEntry::new(1, "LD BC,d16", 12, 12),
            ]
        );
    }

    #[test]
    fn empty_initializer_has_no_entries() {
        assert!(parse_initializer("").unwrap().is_empty());
        assert!(parse_initializer(" \n").unwrap().is_empty());
    }

    #[test]
    fn initializer_reports_offset_of_bad_entry() {
        let text = "{ 0x0, \"NOP\", 4, 4 }, { 0x1, \"LD\", 4 },";
        match parse_initializer(text) {
            Err(ParseInitializerError::Malformed { offset }) => assert_eq!(offset, 22),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn initializer_requires_trailing_comma() {
        assert!(matches!(
            parse_initializer("{ 0x0, \"NOP\", 4, 4 }"),
            Err(ParseInitializerError::Malformed { offset: 0 })
        ));
    }

    #[test]
    fn out_of_range_numbers() {
        assert!(matches!(
            parse_initializer("{ 0x0, \"NOP\", 99999999999, 4 },"),
            Err(ParseInitializerError::BadNumber { .. })
        ));
    }
}

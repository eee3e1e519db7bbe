//! Extracts instruction cycle timings from an HTML opcode table and renders them as C
//! initializer literals of the form `{ 0x<opcode>, "<name>", <cycles>, <cycles_branch> },`.

pub mod cell;
pub mod entry;
pub mod html;
pub mod scanner;

pub use entry::{parse_initializer, OpcodeEntry, ParseInitializerError};
pub use scanner::{extract, render_entries, scan_table, MalformedCellPolicy, ScanError};

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};
use opcode_timings::extract;
use opcode_timings::html::document_rows;

use crate::policy_selector::PolicySelector;

mod policy_selector;

/// Prints the opcode timings from an HTML opcode table as C initializer literals.
#[derive(Parser, Debug)]
struct Args {
    /// HTML page containing the opcode table. Read from stdin if omitted or `-`.
    page: Option<PathBuf>,
    /// What to do with table cells that don't contain valid timings.
    #[arg(long, value_enum, default_value_t)]
    on_malformed: PolicySelector,
}

/// Read the whole page from the given file, or stdin.
fn read_page(path: Option<&Path>) -> io::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path),
        _ => {
            let mut page = String::new();
            io::stdin().read_to_string(&mut page)?;
            Ok(page)
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let page = match read_page(args.page.as_deref()) {
        Ok(page) => page,
        Err(err) => {
            error!("Unable to read opcode table page: {}", err);
            return ExitCode::FAILURE;
        }
    };
    info!("Read {} bytes of HTML", page.len());

    let table = match extract(&document_rows(&page), args.on_malformed.into()) {
        Ok(table) => table,
        Err(err) => {
            error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    let mut stdout = io::stdout().lock();
    if let Err(err) = writeln!(stdout, "{table}").and_then(|()| stdout.flush()) {
        error!("Error writing opcode table: {}", err);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

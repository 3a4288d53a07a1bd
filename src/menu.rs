//! Interactive console menu over the query catalog.

use std::io::{self, BufRead, Write};

use tracing::error;

use crate::dataset::Datasets;
use crate::query::Query;

/// Menu entry that leaves the loop.
pub const EXIT_CHOICE: u8 = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Run(Query),
    Exit,
    Invalid,
}

impl Choice {
    pub fn parse(input: &str) -> Self {
        match input.trim().parse::<u8>() {
            Ok(EXIT_CHOICE) => Choice::Exit,
            Ok(n) => Query::from_number(n).map_or(Choice::Invalid, Choice::Run),
            Err(_) => Choice::Invalid,
        }
    }
}

fn print_menu(out: &mut impl Write) -> io::Result<()> {
    writeln!(
        out,
        "====================== Car Crash Analytics ====================="
    )?;
    for q in Query::ALL {
        writeln!(out, "{q}")?;
    }
    writeln!(out, "{EXIT_CHOICE}. Exit")?;
    write!(out, "Enter your choice: ")?;
    out.flush()
}

/// Prompt, run the chosen query, wait for Enter, repeat until exit or EOF.
///
/// A failing query is reported and the menu carries on.
pub fn run_menu(data: &Datasets, input: &mut impl BufRead, out: &mut impl Write) -> io::Result<()> {
    let mut line = String::new();
    loop {
        print_menu(out)?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(());
        }

        match Choice::parse(&line) {
            Choice::Exit => {
                writeln!(out, "Exiting")?;
                return Ok(());
            }
            Choice::Invalid => writeln!(out, "Invalid choice. Please try again.")?,
            Choice::Run(query) => match query.run(data) {
                Ok(report) => writeln!(out, "{report}")?,
                Err(e) => {
                    error!(query = query.number(), error = %e, "query failed");
                    writeln!(out, "Query {} failed: {e}", query.number())?;
                }
            },
        }

        write!(out, "Press Enter to continue...")?;
        out.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(());
        }
    }
}

//! `separability` — Decides whether an n-qubit amplitude vector is entangled.
//!
//! **Usage:**
//! ```text
//! separability check --qubits 4 --amplitudes "4,3,2,1,6,3,2,7,10,5,3,7,1,3,9,8" --records
//! separability check --qubits 4 --file psi.txt --tolerance 1e-12
//! separability check --qubits 3 --interactive --source prompt
//! separability check --qubits 5 --random --seed 7 --format json
//! separability decompose --qubits 4 1101
//! separability transform --qubits 2 --source 01 --amplitudes "0,1,1,0"
//! ```
//!
//! Exits with status 2 when every amplitude is zero.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::io;
use std::process;

use anyhow::Result;
use clap::Parser;
use separability_clients::cli::Cli;
use separability_clients::commands::{self, Status};
use separability_clients::logging;
use separability_clients::prompt::Prompter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let stdin = io::stdin();
    let prompter = Prompter::new(stdin.lock(), io::stderr());
    let mut stdout = io::stdout().lock();

    match commands::run(&cli, prompter, &mut stdout)? {
        Status::Done => Ok(()),
        Status::Unsatisfiable => {
            eprintln!("Every amplitude is zero; no separability determination possible.");
            process::exit(2);
        }
    }
}

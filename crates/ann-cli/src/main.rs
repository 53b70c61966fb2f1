//! `ann-replay`: run a recorded annotator session and print every entry-list
//! snapshot the widget would have handed to its host, one JSON array per
//! line.
//!
//! ```text
//! ann-replay session.json
//! RUST_LOG=debug ann-replay session.json
//! ```

mod session;

use session::{ReplayError, Session};
use std::io::Write;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: ann-replay <session.json>");
        return ExitCode::from(2);
    };

    match run(&path) {
        Ok(count) => {
            log::info!("{count} snapshots emitted");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{path}: {e}");
            eprintln!("ann-replay: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(path: &str) -> Result<usize, ReplayError> {
    let text = std::fs::read_to_string(path)?;
    let session = Session::from_json(&text)?;
    let snapshots = session.replay()?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for snapshot in &snapshots {
        serde_json::to_writer(&mut out, snapshot)?;
        writeln!(out)?;
    }
    Ok(snapshots.len())
}

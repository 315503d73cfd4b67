//! Minimal command-line front end: list paths whose names match a glob.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use pathq::{filters, query};

#[derive(Parser)]
#[command(
    name = "pq",
    about = "List files whose names match a case-insensitive glob pattern"
)]
struct Cli {
    /// Shell-style glob matched against filenames (e.g. "report_*.txt")
    pattern: String,

    /// Directory to search
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Do not descend into subdirectories
    #[arg(long)]
    shallow: bool,

    /// Include directories and symlinks, not just regular files
    #[arg(long)]
    everything: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let expr = match filters::name(&cli.pattern) {
        Ok(expr) => expr,
        Err(err) => {
            eprintln!("pq: {err}");
            return ExitCode::FAILURE;
        }
    };

    let q = query()
        .from_path(cli.root)
        .filter(expr)
        .recursive(!cli.shallow)
        .files_only(!cli.everything);

    let stream = match q.stream() {
        Ok(stream) => stream,
        Err(err) => {
            eprintln!("pq: {err}");
            return ExitCode::FAILURE;
        }
    };

    for item in stream {
        match item {
            Ok(path) => println!("{}", path.display()),
            Err(err) => {
                eprintln!("pq: {err}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

use geojson_validate::output::{Output, Summary};
use geojson_validate::routes::{ROUTES, SCHEMAS};
use geojson_validate::{check, Input, Validator};
use log::info;
use serde::Serialize;
use serde_json::to_string;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process;
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(name = "geojson_validate", about = "Validate GeoJSON objects (RFC 7946)")]
enum Opt {
    /// Validate GeoJSON documents and report one line per document
    Check {
        /// Only check nesting and numeric positions (no ring closure, arity or size rules)
        #[structopt(short, long)]
        permissive: bool,
        /// Report every malformed feature or geometry instead of the first one
        #[structopt(short, long)]
        collect_all: bool,
        /// Read newline-delimited GeoJSON, one object per line
        #[structopt(short, long)]
        lines: bool,
        /// Human readable output instead of JSON lines
        #[structopt(short, long)]
        text: bool,
        /// Input file, stdin if omitted
        #[structopt(parse(from_os_str))]
        input: Option<PathBuf>,
    },
    /// Print the declared API routes as JSON lines
    Routes,
    /// Print the request and response shapes referenced by the routes
    Schemas,
}

fn run_check(
    permissive: bool,
    collect_all: bool,
    lines: bool,
    text: bool,
    input: Option<PathBuf>,
) -> Result<Summary, Box<dyn Error>> {
    let mut validator = Validator::new();
    if permissive {
        validator = validator.permissive();
    }
    if collect_all {
        validator = validator.collect_all();
    }
    let mode = if lines { Input::Lines } else { Input::Document };

    let reports = match input {
        Some(path) => {
            info!("checking {}", path.display());
            check(BufReader::new(File::open(path)?), &validator, mode)?
        }
        None => {
            let stdin = io::stdin();
            let reports = check(stdin.lock(), &validator, mode)?;
            reports
        }
    };

    let stdout = io::stdout();
    let mut handle = BufWriter::new(stdout.lock());
    if text {
        reports.write_text(&mut handle)?;
    } else {
        reports.write_json_lines(&mut handle)?;
    }
    handle.flush()?;

    let summary = Summary::from(reports.as_slice());
    info!("{} valid, {} invalid", summary.valid, summary.invalid);
    Ok(summary)
}

fn print_json_lines<T: Serialize>(items: &[T]) -> Result<(), Box<dyn Error>> {
    let stdout = io::stdout();
    let mut handle = BufWriter::new(stdout.lock());
    for item in items {
        writeln!(handle, "{}", to_string(item)?)?;
    }
    handle.flush()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    match Opt::from_args() {
        Opt::Check {
            permissive,
            collect_all,
            lines,
            text,
            input,
        } => {
            let summary = run_check(permissive, collect_all, lines, text, input)?;
            if summary.invalid > 0 {
                process::exit(1);
            }
        }
        Opt::Routes => print_json_lines(ROUTES)?,
        Opt::Schemas => print_json_lines(SCHEMAS)?,
    }
    Ok(())
}

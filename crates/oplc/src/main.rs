//! OPLang static checker
//!
//! Usage: oplc [OPTIONS] <input>

use anyhow::Context;
use clap::Parser as ClapParser;
use log::{debug, LevelFilter};
use oplc::common::DiagnosticReporter;
use oplc::driver::{self, CheckConfig};
use simple_logger::SimpleLogger;
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(ClapParser, Debug)]
#[command(name = "oplc")]
#[command(version)]
#[command(about = "Static semantic checker for OPLang programs", long_about = None)]
struct Args {
    /// Input source file
    #[arg(required = true)]
    input: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Dump AST (for debugging)
    #[arg(long)]
    dump_ast: bool,

    /// Dump tokens (for debugging)
    #[arg(long)]
    dump_tokens: bool,
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    if let Err(e) = SimpleLogger::new().with_level(level).init() {
        eprintln!("warning: logger unavailable: {}", e);
    }

    match run(&args) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("error: {:#}", e);
            process::exit(1);
        }
    }
}

/// Check one file; `Ok(false)` when the program has a diagnostic
fn run(args: &Args) -> anyhow::Result<bool> {
    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("cannot read {}", args.input.display()))?;
    let filename = args.input.display().to_string();

    let mut reporter = DiagnosticReporter::new();
    let file_id = reporter.add_file(&filename, &source);

    let config = CheckConfig {
        dump_tokens: args.dump_tokens,
        dump_ast: args.dump_ast,
        verbose: args.verbose,
    };

    debug!("checking {}", filename);
    let result = driver::check_source(&source, &config);
    println!("{}", driver::verdict(&result));

    match result {
        Ok(()) => Ok(true),
        Err(e) => {
            reporter.report_error(file_id, &e);
            Ok(false)
        }
    }
}

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use lox_interpreter as lox;

use lox::runner::{self, RunReport};
use lox::scanner::Scanner;

#[derive(ClapParser, Debug)]
#[command(version, about = "Lox language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize { filename: Option<PathBuf> },

    /// Runs input from a file as a Lox program
    Run {
        filename: Option<PathBuf>,

        /// Print the whole run report as JSON instead of streaming output
        #[arg(long)]
        json: bool,
    },
}

/// Reads a whole source file as UTF‑8 text.
fn read_file(filename: &Path) -> Result<String> {
    info!("Reading file: {:?}", filename);

    let file = File::open(filename).with_context(|| format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();

    let bytes = reader
        .read_to_end(&mut buf)
        .with_context(|| format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    String::from_utf8(buf).with_context(|| format!("File {:?} is not valid UTF-8", filename))
}

/// Unreadable input is reported and mapped to exit code 74.
fn read_or_exit(filename: &Path) -> String {
    match read_file(filename) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("{:#}", e);
            process::exit(74);
        }
    }
}

fn init_logger() -> Result<()> {
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    Builder::new()
        .format(|buf, record| {
            let module = record.module_path().unwrap_or("<unnamed>");
            let module = module.strip_prefix("lox_interpreter::").unwrap_or(module);

            writeln!(
                buf,
                "{} [{}:{}] - {}",
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

fn tokenize(filename: &Path) {
    info!("Running Tokenize subcommand");

    let source = read_or_exit(filename);
    let mut tokenized = true;

    for token in Scanner::new(&source) {
        match token {
            Ok(token) => {
                debug!("Scanned token: {}", token);
                println!("{}", token);
            }

            Err(e) => {
                tokenized = false;
                eprintln!("{}", e);
            }
        }
    }

    if !tokenized {
        debug!("Tokenization failed, exiting with code 65");
        process::exit(65);
    }

    info!("Tokenization completed successfully");
}

fn run(filename: &Path, json: bool) -> Result<()> {
    info!("Running Run subcommand");

    let source = read_or_exit(filename);

    let report: RunReport = if json {
        let report = runner::run(&source);
        let rendered = serde_json::to_string_pretty(&report).context("Failed to encode report")?;
        println!("{}", rendered);
        report
    } else {
        let report = runner::run_with_output(&source, Box::new(io::stdout()));
        for diagnostic in &report.diagnostics {
            eprintln!("{}", diagnostic);
        }
        report
    };

    let code = report.exit_code();
    if code != 0 {
        debug!("Run ended with {:?}, exiting with code {}", report.status, code);
        process::exit(code);
    }

    Ok(())
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    // Initialize logger only if --log flag is provided
    if args.log {
        init_logger()?;
    }

    info!("CLI arguments: {:?}", args);

    match &args.commands {
        Commands::Tokenize { filename: Some(filename) } => tokenize(filename),
        Commands::Run {
            filename: Some(filename),
            json,
        } => run(filename, *json)?,
        Commands::Tokenize { filename: None } | Commands::Run { filename: None, .. } => {
            info!("No filepath provided");
            println!("No input filepath was provided. Exiting...");
        }
    }

    Ok(())
}

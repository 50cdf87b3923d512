use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use sparselp_solver::{
    Assembler, Bound, BoundKind, CoordinateList, LinearProgram, MicrolpPort, RecordingPort,
    VariableKind,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod demo;
mod input;

use input::ProblemFile;

#[derive(Parser)]
#[command(name = "sparselp")]
#[command(about = "Assemble and solve sparse linear programs", long_about = None)]
struct Cli {
    /// Log more (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Pretty,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a JSON problem file and print the solution
    Solve {
        /// The problem file
        file: PathBuf,
        /// Time limit in seconds
        #[arg(short, long)]
        time_limit: Option<u64>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
    },
    /// Print the assembled bounds and coordinate list without solving
    Assemble {
        /// The problem file
        file: PathBuf,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
    },
    /// Run the built-in sample programs
    Demo,
}

#[derive(Serialize)]
struct Column<'a> {
    name: &'a str,
    objective: f64,
    bound: Bound,
    kind: VariableKind,
}

#[derive(Serialize)]
struct Row<'a> {
    name: &'a str,
    bound: Bound,
}

#[derive(Serialize)]
struct Assembled<'a> {
    columns: Vec<Column<'a>>,
    rows: Vec<Row<'a>>,
    matrix: &'a CoordinateList,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

fn load(file: &Path) -> LinearProgram {
    let source = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            std::process::exit(1);
        }
    };

    let problem = match ProblemFile::parse(&source) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Parse error: {}", e);
            std::process::exit(1);
        }
    };

    match problem.into_program() {
        Ok(lp) => lp,
        Err(e) => {
            eprintln!("Model error: {}", e);
            std::process::exit(1);
        }
    }
}

fn describe(bound: &Bound) -> String {
    let (lower, upper) = bound.limits();
    match bound.kind {
        BoundKind::Free => "free".to_string(),
        BoundKind::Lower => format!("[{}, +inf)", lower),
        BoundKind::Upper => format!("(-inf, {}]", upper),
        BoundKind::Double => format!("[{}, {}]", lower, upper),
        BoundKind::Fixed => format!("= {}", lower),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Solve {
            file,
            time_limit,
            format,
        } => {
            let lp = load(&file);

            let mut assembler = Assembler::new(MicrolpPort::new()).with_verbose(cli.verbose > 0);
            if let Some(secs) = time_limit {
                assembler = assembler.with_time_limit(Duration::from_secs(secs));
            }

            let solution = match assembler.solve(&lp) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Solve error: {}", e);
                    std::process::exit(1);
                }
            };

            if format == Format::Json {
                match serde_json::to_string_pretty(&solution) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error writing JSON: {}", e);
                        std::process::exit(1);
                    }
                }
                return;
            }

            println!("Status: {}", solution.status);
            println!("Objective: {:.4}", solution.objective_value);
            println!();
            println!("Variables:");
            for (name, value) in lp.variables().iter().zip(&solution.values) {
                println!("  {:20} {:12.4}", name, value);
            }
        }
        Commands::Assemble { file, format } => {
            let lp = load(&file);

            let mut assembler = Assembler::new(RecordingPort::new());
            if let Err(e) = assembler.assemble(&lp) {
                eprintln!("Assembly error: {}", e);
                std::process::exit(1);
            }
            let port = assembler.port();

            if format == Format::Json {
                let assembled = Assembled {
                    columns: port
                        .col_names
                        .iter()
                        .enumerate()
                        .map(|(j, name)| Column {
                            name,
                            objective: port.objective[j],
                            bound: port.col_bounds[j],
                            kind: port.col_kinds[j],
                        })
                        .collect(),
                    rows: port
                        .row_names
                        .iter()
                        .zip(&port.row_bounds)
                        .map(|(name, bound)| Row {
                            name,
                            bound: *bound,
                        })
                        .collect(),
                    matrix: &port.matrix,
                };
                match serde_json::to_string_pretty(&assembled) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error writing JSON: {}", e);
                        std::process::exit(1);
                    }
                }
                return;
            }

            let direction = if lp.is_minimize() { "minimize" } else { "maximize" };
            println!("Direction: {}", direction);
            println!();
            println!("Columns:");
            for (j, name) in port.col_names.iter().enumerate() {
                let kind = match port.col_kinds[j] {
                    VariableKind::Continuous => "",
                    VariableKind::Integer => "integer",
                };
                println!(
                    "  {:4} {:20} {:10.4} {:24} {}",
                    j + 1,
                    name,
                    port.objective[j],
                    describe(&port.col_bounds[j]),
                    kind
                );
            }
            println!();
            println!("Rows:");
            for (i, (name, bound)) in port.row_names.iter().zip(&port.row_bounds).enumerate() {
                println!("  {:4} {:20} {}", i + 1, name, describe(bound));
            }
            println!();
            println!("Matrix ({} nonzeros):", port.matrix.len());
            for (row, col, value) in port.matrix.iter() {
                println!("  ({}, {}) = {}", row, col, value);
            }
        }
        Commands::Demo => {
            let programs = match demo::programs() {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Model error: {}", e);
                    std::process::exit(1);
                }
            };
            let reports = demo::run(&programs);
            demo::print(&reports);

            if !reports.iter().all(|r| r.passed()) {
                std::process::exit(1);
            }
        }
    }
}

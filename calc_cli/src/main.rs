//! # Chargeplan CLI Application
//!
//! Command-line front end for EV charger infrastructure sizing.
//!
//! One-shot mode sizes the chargers given with `--charger` and prints the
//! result (text or `--json`), optionally writing the diagram and report.
//! Without chargers, or with `--interactive`, it runs an interactive session
//! where each change is recomputed immediately.
//!
//! Logging goes to stderr and is controlled with `RUST_LOG` (default `warn`).

mod commands;
mod output;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use calc_core::diagram::{self, SingleLineDiagram};
use calc_core::pdf::write_session_pdf;
use calc_core::{CalcError, CalcResult, CalculationParameters, ChargerSpec, Session, SizingResult, StandardTables};

use commands::{Command, HELP};
use output::JsonExport;

#[derive(Parser, Debug)]
#[command(version, about = "Size EV charger circuits, main switchboard and supply to AS/NZS", long_about = None)]
struct Args {
    /// Charger line as <ac|dc>:<kW>[:<qty>[:<1p|3p>]], repeatable
    #[arg(short, long = "charger", value_name = "SPEC")]
    chargers: Vec<ChargerSpec>,

    /// TOML file with calculation parameters
    #[arg(short, long, value_name = "FILE")]
    params: Option<PathBuf>,

    /// TOML or JSON file with an alternative standard table edition
    #[arg(short, long, value_name = "FILE")]
    tables: Option<PathBuf>,

    /// Project title for the diagram and report
    #[arg(long, default_value = "EV Charging Infrastructure")]
    title: String,

    /// Print session and result as JSON
    #[arg(long)]
    json: bool,

    /// Write the single line diagram as Graphviz DOT
    #[arg(long, value_name = "PATH")]
    dot: Option<PathBuf>,

    /// Render the single line diagram (svg, png or pdf, by extension)
    #[arg(long, value_name = "PATH")]
    diagram: Option<PathBuf>,

    /// Write the PDF sizing report
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Start an interactive session (the default when no chargers are given)
    #[arg(short, long)]
    interactive: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Session plus the tables it is sized against
struct App {
    session: Session,
    tables: StandardTables,
}

impl App {
    fn from_args(args: &Args) -> CalcResult<Self> {
        let params = match &args.params {
            Some(path) => CalculationParameters::from_toml_file(path)?,
            None => CalculationParameters::default(),
        };
        let tables = match &args.tables {
            Some(path) => StandardTables::from_file(path)?,
            None => StandardTables::as_nzs(),
        };
        let mut session = Session::with_params(args.title.clone(), params)?;
        for spec in &args.chargers {
            session.add_charger(spec.clone())?;
        }
        Ok(App { session, tables })
    }

    fn calculate(&self) -> SizingResult {
        self.session.calculate_with(&self.tables)
    }

    fn dot(&self, result: &SizingResult) -> String {
        SingleLineDiagram::from_result(result, &self.session.meta.title).to_dot()
    }

    fn write_dot(&self, result: &SizingResult, path: &Path) -> CalcResult<()> {
        std::fs::write(path, self.dot(result))
            .map_err(|e| CalcError::file_error("write", path.display().to_string(), e.to_string()))
    }

    fn json(&self, result: &SizingResult) -> CalcResult<String> {
        let export = JsonExport {
            session: &self.session,
            result,
        };
        Ok(serde_json::to_string_pretty(&export)?)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging();

    let mut app = match App::from_args(&args) {
        Ok(app) => app,
        Err(e) => {
            print_error(&e);
            return ExitCode::FAILURE;
        }
    };

    if args.interactive || args.chargers.is_empty() {
        run_interactive(&mut app);
        return ExitCode::SUCCESS;
    }

    run_once(&app, &args)
}

fn run_once(app: &App, args: &Args) -> ExitCode {
    let result = app.calculate();

    if args.json {
        match app.json(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                print_error(&e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        print!("{}", output::result(&result));
    }

    // Output files are independent: one failing does not stop the others
    let mut ok = true;
    if let Some(path) = &args.dot {
        ok &= report_outcome("DOT", path, app.write_dot(&result, path));
    }
    if let Some(path) = &args.diagram {
        ok &= report_outcome("diagram", path, diagram::render_to_file(&app.dot(&result), path));
    }
    if let Some(path) = &args.report {
        ok &= report_outcome("report", path, write_session_pdf(&app.session, &result, path));
    }

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn report_outcome(what: &str, path: &Path, outcome: CalcResult<()>) -> bool {
    match outcome {
        Ok(()) => {
            eprintln!("Wrote {} to {}", what, path.display());
            true
        }
        Err(e) => {
            eprintln!("Could not write {}: {}", what, e);
            false
        }
    }
}

fn print_error(e: &CalcError) {
    eprintln!("Error: {}", e);
    if let Ok(json) = serde_json::to_string_pretty(e) {
        tracing::debug!(error = %json, "error details");
    }
}

fn run_interactive(app: &mut App) {
    println!("Chargeplan - EV Charger Infrastructure Sizing");
    println!("==============================================");
    println!("Standards: {}", app.tables.edition);
    println!("Type help for commands.");
    println!();
    if !app.session.is_empty() {
        println!("{}", output::summary(&app.calculate()));
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            break;
        }
        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
            None => break,
        };

        match commands::parse(&line) {
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => {
                if let Err(e) = execute(app, command) {
                    eprintln!("{}", e);
                }
            }
            Ok(None) => {}
            Err(e) => eprintln!("{}", e),
        }
    }
}

/// Run one interactive command. Validation errors leave the session unchanged.
fn execute(app: &mut App, command: Command) -> CalcResult<()> {
    let mutating = command.is_mutating();
    match command {
        Command::Add(spec) => {
            app.session.add_charger(spec)?;
        }
        Command::Remove(position) => {
            let removed = app.session.remove_at(position)?;
            println!("Removed {}", removed.label());
        }
        Command::Clear => app.session.clear(),
        Command::Set(parameter, value) => {
            app.session.set_parameter(parameter.name(), value)?;
        }
        Command::List => print!("{}", output::schedule(&app.session)),
        Command::Params => print!("{}", output::params(&app.session.params)),
        Command::Calc => print!("{}", output::result(&app.calculate())),
        Command::Json => println!("{}", app.json(&app.calculate())?),
        Command::Dot(None) => print!("{}", app.dot(&app.calculate())),
        Command::Dot(Some(path)) => {
            app.write_dot(&app.calculate(), &path)?;
            println!("Wrote DOT to {}", path.display());
        }
        Command::Diagram(path) => {
            diagram::render_to_file(&app.dot(&app.calculate()), &path)?;
            println!("Wrote diagram to {}", path.display());
        }
        Command::Report(path) => {
            write_session_pdf(&app.session, &app.calculate(), &path)?;
            println!("Wrote report to {}", path.display());
        }
        Command::Catalog => print!("{}", output::catalog()),
        Command::Help => println!("{}", HELP),
        Command::Quit => {}
    }

    if mutating {
        println!("{}", output::summary(&app.calculate()));
    }
    Ok(())
}

//! `groc`: track and review purchases from the command line.
//!
//! # Usage
//!
//! ```
//! groc init
//! groc add --store "Corner Market" --total 12.50 --description "Bread"
//! groc add --source ~/receipts/
//! groc list --month 01 --year 2019 --all
//! groc breakdown --year 2019 --verbose
//! ```

mod commands;
mod settings;
mod table;


use std::{
  io::{self, Write},
  path::{Path, PathBuf},
  process::ExitCode,
  str::FromStr as _,
};

use anyhow::{Context as _, bail};
use chrono::{Local, NaiveDate};
use clap::{ArgGroup, Args, Parser, Subcommand};
use groc_store_sqlite::SqliteStore;
use rust_decimal::Decimal;
use settings::Settings;
use tracing::{debug, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
  name = "groc",
  version,
  about = "A simple bill tracking tool to help you review and analyze purchases"
)]
struct Cli {
  /// Path to a TOML config file (default: ~/.groc/config.toml).
  #[arg(short, long, global = true, value_name = "FILE")]
  config: Option<PathBuf>,

  /// SQLite database file, overriding the configured one.
  #[arg(long, global = true, value_name = "PATH")]
  database: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Create the groc directory and database.
  Init {
    #[arg(long)]
    verbose: bool,
  },

  /// Delete all purchase entries.
  Reset {
    /// Only report how many purchases would be deleted.
    #[arg(long)]
    dry_run: bool,
  },

  /// List purchases, newest first.
  List(ListArgs),

  /// Show monthly purchase stats.
  Breakdown(BreakdownArgs),

  /// Delete purchases by id.
  Delete(DeleteArgs),

  /// Add purchases from the command line, a CSV file, or a directory.
  Add(AddArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
  /// Number of latest purchases to show. At most 100.
  #[arg(short, long, default_value_t = 50, conflicts_with = "all")]
  pub limit: usize,

  /// Month as a number, 1 to 12.
  #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
  pub month: Option<u32>,

  /// Four digit year (default: current year).
  #[arg(short, long, requires = "month")]
  pub year: Option<i32>,

  /// Show every purchase for the month.
  #[arg(short, long, requires = "month")]
  pub all: bool,

  /// Include purchase ids.
  #[arg(long)]
  pub verbose: bool,

  #[arg(long)]
  pub json: bool,
}

#[derive(Args, Debug)]
pub struct BreakdownArgs {
  /// Month as a number, 1 to 12. May be repeated.
  #[arg(short, long = "month", value_parser = clap::value_parser!(u32).range(1..=12))]
  pub months: Vec<u32>,

  /// Four digit year. May be repeated.
  #[arg(short, long = "year")]
  pub years: Vec<i32>,

  /// Include min, max and average purchase and store count.
  #[arg(long)]
  pub verbose: bool,

  #[arg(long)]
  pub json: bool,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
  /// Purchase id. May be repeated.
  #[arg(short, long = "id", required = true)]
  pub ids: Vec<i64>,

  /// Show what would be deleted without deleting.
  #[arg(long)]
  pub dry_run: bool,

  /// Show the purchases being deleted.
  #[arg(long)]
  pub verbose: bool,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("input").required(true).args(["source", "store"])))]
pub struct AddArgs {
  /// CSV file, or directory of CSV files.
  #[arg(long, value_name = "PATH")]
  pub source: Option<PathBuf>,

  /// Store name where the purchase was made.
  #[arg(long, requires = "total", conflicts_with = "source")]
  pub store: Option<String>,

  /// Dollar amount of the purchase, e.g. 12.50.
  #[arg(long, value_parser = parse_total, requires = "store", conflicts_with = "source")]
  pub total: Option<Decimal>,

  /// Purchase date as YYYY-MM-DD (default: today).
  #[arg(long, value_parser = parse_date, requires = "store", conflicts_with = "source")]
  pub date: Option<NaiveDate>,

  /// Brief description of the purchase.
  #[arg(long, requires = "store", conflicts_with = "source")]
  pub description: Option<String>,

  /// Skip purchases that are already recorded instead of failing.
  #[arg(long)]
  pub ignore_duplicate: bool,
}

fn parse_total(s: &str) -> Result<Decimal, String> {
  Decimal::from_str(s)
    .or_else(|_| Decimal::from_scientific(s))
    .map_err(|e| format!("expected a dollar amount like 12.50: {e}"))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .with_writer(io::stderr)
    .init();

  let cli = Cli::parse();
  let mut stdout = io::stdout().lock();

  match run(cli, &mut stdout) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      report(&err, &mut stdout, &mut io::stderr().lock());
      ExitCode::FAILURE
    }
  }
}

/// Print `err` after any report already written to `out`.
fn report(err: &anyhow::Error, out: &mut dyn Write, err_out: &mut dyn Write) {
  debug!("{err:?}");
  out.flush().ok();
  writeln!(err_out, "error: {err}").ok();
}

fn run(cli: Cli, out: &mut dyn Write) -> anyhow::Result<()> {
  let settings = Settings::load(cli.config.as_deref())?.with_database(cli.database);
  let database = settings.database_path.as_path();
  let today = Local::now().date_naive();

  // `init` is the only command that may run before the database exists.
  if let Command::Init { verbose } = cli.command {
    return commands::init(database, verbose, out);
  }

  let mut store = open_existing(database)?;
  match cli.command {
    // Handled above.
    Command::Init { .. } => Ok(()),
    Command::Reset { dry_run } => commands::reset(&mut store, dry_run, out),
    Command::List(args) => commands::list(&store, &args, today, out),
    Command::Breakdown(args) => commands::breakdown(&store, &args, today, out),
    Command::Delete(args) => commands::delete(&mut store, &args, out),
    Command::Add(args) => commands::add(&mut store, args, today, out),
  }
}

fn open_existing(path: &Path) -> anyhow::Result<SqliteStore> {
  if !path.is_file() {
    bail!("Error connecting to database. Make sure database is initialized.");
  }
  SqliteStore::open(path).context("Error connecting to database.")
}

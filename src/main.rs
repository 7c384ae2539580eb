use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};

use tennisdata::delimited;
use tennisdata::import;
use tennisdata::schema::COLUMNS;
use tennisdata::store::{self, DEFAULT_DB_PATH};
use tennisdata::xlsx;
use tennisdata::{ErrorClass, LoadMode, MatchFilter, Page, Store, StoreConfig, TennisDataError, DEFAULT_LIMIT};

#[derive(Parser)]
#[command(name = "tennisdata")]
#[command(about = "Load tennis-data.co.uk match sheets into a database and query them", long_about = None)]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "TENNISDATA_DB", default_value = DEFAULT_DB_PATH, global = true)]
    db: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a match sheet (xlsx, xls, ods or csv)
    Import {
        /// Sheet to import
        input: PathBuf,

        /// Add to the stored matches instead of replacing them
        #[arg(long)]
        append: bool,
    },

    /// Print one match by key
    Get {
        /// Match key, e.g. 20230105_NadalR_FedererR
        key: String,
    },

    /// List matches as CSV
    List(ListArgs),

    /// Write every stored match to a file (xlsx or csv) that can be imported again
    Export {
        /// Output file
        output: PathBuf,
    },

    /// Show the expected sheet columns
    Columns,

    /// Show what the database holds
    Info,
}

#[derive(Args)]
struct ListArgs {
    /// Number of matches to skip
    #[arg(long, default_value_t = 0)]
    skip: usize,

    /// Maximum number of matches to print
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    limit: usize,

    /// Exact match key
    #[arg(long)]
    id: Option<String>,

    /// Tournament number
    #[arg(long)]
    atp: Option<i64>,

    /// Venue of the tournament
    #[arg(long)]
    location: Option<String>,

    /// Name of the tournament
    #[arg(long)]
    tournament: Option<String>,

    /// Match date, YYYY-MM-DD
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Tournament series
    #[arg(long)]
    series: Option<String>,

    /// Court type (Indoor, Outdoor)
    #[arg(long)]
    court: Option<String>,

    /// Surface (Hard, Clay, Carpet, Grass)
    #[arg(long)]
    surface: Option<String>,

    /// Round of the tournament
    #[arg(long)]
    round: Option<String>,

    /// Name of the winner
    #[arg(long)]
    winner: Option<String>,

    /// Name of the loser
    #[arg(long)]
    loser: Option<String>,
}

impl ListArgs {
    fn filter(&self) -> MatchFilter {
        MatchFilter {
            id: self.id.clone(),
            atp: self.atp,
            location: self.location.clone(),
            tournament: self.tournament.clone(),
            date: self.date,
            series: self.series.clone(),
            court: self.court.clone(),
            surface: self.surface.clone(),
            round: self.round.clone(),
            winner: self.winner.clone(),
            loser: self.loser.clone(),
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        let code = match e.downcast_ref::<TennisDataError>().map(TennisDataError::class) {
            Some(ErrorClass::Client) => 2,
            Some(ErrorClass::NotFound) => 3,
            Some(ErrorClass::Server) | None => 1,
        };
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Commands::Columns = cli.command {
        columns();
        return Ok(());
    }

    let store = Store::open(StoreConfig::new(&cli.db))
        .with_context(|| format!("Failed to open database {}", cli.db.display()))?;

    match cli.command {
        Commands::Import { input, append } => {
            import_file(&store, &input, LoadMode::from_replace_flag(!append))?;
        }
        Commands::Get { key } => {
            let record = store::get_match(&store, &key)?;
            delimited::write_records_csv(&[record], io::stdout().lock())?;
        }
        Commands::List(args) => {
            let records =
                store::list_matches(&store, &args.filter(), Page::new(args.skip, args.limit))?;
            delimited::write_records_csv(&records, io::stdout().lock())?;
        }
        Commands::Export { output } => {
            export(&store, &output)?;
        }
        Commands::Info => {
            println!("Database: {}", store.path().display());
            println!("Matches: {}", store.count()?);
            println!("Generation: {}", store.generation()?);
        }
        Commands::Columns => {}
    }

    Ok(())
}

fn import_file(store: &Store, input: &Path, mode: LoadMode) -> Result<()> {
    println!("Reading match sheet: {}", input.display());
    let written = import::import_path(store, input, mode)
        .with_context(|| format!("Failed to import {}", input.display()))?;
    println!("Affected rows: {}", written);
    Ok(())
}

fn export(store: &Store, output: &Path) -> Result<()> {
    let ext = output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let records = store::scan_matches(store)?;
    println!("Found {} matches", records.len());

    match ext.as_str() {
        "xlsx" => {
            println!("Writing Excel file: {}", output.display());
            xlsx::write_matches_to_xlsx(&records, output).context("Failed to write Excel file")?;
        }
        "csv" => {
            println!("Writing CSV file: {}", output.display());
            let file = std::fs::File::create(output)
                .with_context(|| format!("Failed to create {}", output.display()))?;
            delimited::write_matches_csv(&records, file).context("Failed to write CSV file")?;
        }
        _ => {
            anyhow::bail!("Unsupported output format: {}", ext);
        }
    }

    println!("Done!");
    Ok(())
}

fn columns() {
    println!("{:<12} {:<12} {}", "Column", "Field", "Type");
    for column in COLUMNS.iter() {
        println!("{:<12} {:<12} {}", column.external, column.internal, column.kind);
    }
}

//! csvconf CLI
//!
//! Command-line tool for listing, loading and querying CSV configuration tables.

use clap::{Args, Parser, Subcommand};
use csvconf_core::{Query, Row, Store, StoreConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "csvconf")]
#[command(about = "CSV configuration table loader and query tool", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// JSON config file with `path_prefix` and `file_suffix`
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the table files (overrides the default search dirs)
    #[arg(short, long, global = true)]
    prefix: Option<PathBuf>,

    /// File suffix appended to table names
    #[arg(short, long, global = true)]
    suffix: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List tables available in the search directories
    Tables,

    /// Load tables and print a load report
    Report {
        /// Tables to load; all available tables when omitted
        tables: Vec<String>,
    },

    /// Print every row of a table
    All {
        /// Table name
        table: String,

        /// Maximum number of rows to print
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Print one field of the first row where FIELD equals VALUE
    Get {
        /// Table name
        table: String,

        /// Field to match on
        field: String,

        /// Value to match
        value: String,

        /// Field to print from the matching row
        result: String,
    },

    /// Print rows matching all `field=value` predicates
    Lines {
        /// Table name
        table: String,

        /// Predicates, e.g. `kind=weapon`
        #[arg(short = 'w', long = "where")]
        predicates: Vec<String>,

        /// Print only the first match
        #[arg(long)]
        first: bool,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> csvconf_core::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let store = Store::new(build_config(&cli.source)?);

    match cli.command {
        Commands::Tables => cmd_tables(&store),
        Commands::Report { tables } => cmd_report(&store, &tables),
        Commands::All { table, limit } => cmd_all(&store, &table, limit),
        Commands::Get {
            table,
            field,
            value,
            result,
        } => cmd_get(&store, &table, &field, &value, &result),
        Commands::Lines {
            table,
            predicates,
            first,
        } => cmd_lines(&store, &table, &predicates, first),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn build_config(args: &SourceArgs) -> csvconf_core::Result<StoreConfig> {
    let mut config = match &args.config {
        Some(path) => StoreConfig::load(path)?,
        None => StoreConfig::default(),
    };
    if let Some(prefix) = &args.prefix {
        config = config.with_path_prefix(prefix);
    }
    if let Some(suffix) = &args.suffix {
        config = config.with_file_suffix(suffix);
    }
    Ok(config)
}

fn cmd_tables(store: &Store) -> csvconf_core::Result<()> {
    let tables = store.available_tables()?;

    println!("Searched {} location(s):", store.resolver().dirs().len());
    for dir in store.resolver().dirs() {
        println!("  {}", dir.display());
    }
    println!();
    println!("Tables ({}):", tables.len());
    for table in &tables {
        println!("  {}", table);
    }

    Ok(())
}

fn cmd_report(store: &Store, tables: &[String]) -> csvconf_core::Result<()> {
    let report = if tables.is_empty() {
        store.load_all()?
    } else {
        store.load(tables)?
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_all(store: &Store, table: &str, limit: Option<usize>) -> csvconf_core::Result<()> {
    store.load([table])?;

    let rows = store.get_all(table).unwrap_or_default();
    let row_limit = limit.unwrap_or(rows.len());
    print_rows(&rows[..row_limit.min(rows.len())])?;

    if rows.len() > row_limit {
        eprintln!("... ({} more rows)", rows.len() - row_limit);
    }

    Ok(())
}

fn cmd_get(
    store: &Store,
    table: &str,
    field: &str,
    value: &str,
    result: &str,
) -> csvconf_core::Result<()> {
    store.load([table])?;
    println!("{}", store.get_string(table, field, value, result));
    Ok(())
}

fn cmd_lines(
    store: &Store,
    table: &str,
    predicates: &[String],
    first: bool,
) -> csvconf_core::Result<()> {
    let queries = predicates
        .iter()
        .map(|p| Query::parse(p))
        .collect::<csvconf_core::Result<Vec<_>>>()?;

    store.load([table])?;

    if first {
        match store.get_line(table, &queries) {
            Some(row) => println!("{}", serde_json::to_string_pretty(&row)?),
            None => eprintln!("no matching row"),
        }
        return Ok(());
    }

    let rows = store.get_lines(table, &queries);
    print_rows(&rows)?;
    eprintln!("{} matching row(s)", rows.len());
    Ok(())
}

fn print_rows(rows: &[Arc<Row>]) -> csvconf_core::Result<()> {
    println!("{}", serde_json::to_string_pretty(rows)?);
    Ok(())
}

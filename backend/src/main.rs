//! Revsplit CLI - build reservation revenue summaries
//!
//! ```bash
//! revsplit split bookings.xlsx              # Write reservation_revenue_summary.xlsx
//! revsplit split bookings.csv -o out.xlsx   # Choose the output path
//! revsplit preview bookings.xlsx --rows 10  # Print both tables
//! revsplit columns                          # Show the fixed column lists
//! revsplit serve                            # Start HTTP server (port 3000)
//! ```

use clap::{Parser, Subcommand};
use revsplit::{columns_description, split_file, ServerConfig, Table, OUTPUT_FILE_NAME};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "revsplit")]
#[command(about = "Build a reservation revenue summary workbook from a spreadsheet export", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full pipeline: spreadsheet → two-sheet workbook
    Split {
        /// Input spreadsheet (xlsx, xls, xlsm, ods, csv)
        input: PathBuf,

        /// Output workbook
        #[arg(short, long, default_value = OUTPUT_FILE_NAME)]
        output: PathBuf,
    },

    /// Print the original data and the summary without writing anything
    Preview {
        /// Input spreadsheet
        input: PathBuf,

        /// Rows shown per table
        #[arg(long, default_value = "5")]
        rows: usize,

        /// Print JSON instead of text tables
        #[arg(long)]
        json: bool,
    },

    /// Show the date, revenue and output column lists
    Columns,

    /// Start HTTP server
    Serve {
        /// Port to listen on (default: REVSPLIT_PORT or 3000)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Split { input, output } => cmd_split(&input, &output),
        Commands::Preview { input, rows, json } => cmd_preview(&input, rows, json),
        Commands::Columns => cmd_columns(),
        Commands::Serve { port } => cmd_serve(port).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_split(input: &Path, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Processing: {}", input.display());

    let result = split_file(input)?;

    eprintln!("   Format: {}", result.source.format);
    if let Some(ref sheet) = result.source.sheet {
        eprintln!("   Sheet: {}", sheet);
    }
    eprintln!("   Rows: {}", result.original.len());
    eprintln!("   Summary columns: {}", result.summary.columns().join(", "));

    let bytes = result.to_workbook()?;
    fs::write(output, &bytes)?;
    eprintln!("💾 Workbook written to: {}", output.display());

    eprintln!("\n✨ Done!");
    Ok(())
}

fn cmd_preview(input: &Path, rows: usize, as_json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let result = split_file(input)?;

    if as_json {
        let value = json!({
            "source": result.source,
            "original": result.original.preview(rows),
            "summary": result.summary.preview(rows),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("📋 Original Data ({} rows)", result.original.len());
    print_table(&result.original, rows);
    println!();
    println!("📊 Reservation Revenue Summary ({} rows)", result.summary.len());
    print_table(&result.summary, rows);
    Ok(())
}

fn print_table(table: &Table, rows: usize) {
    println!("   {}", table.columns().join(" | "));
    for row in table.head(rows).rows() {
        let cells: Vec<String> = row.iter().map(|c| c.display()).collect();
        println!("   {}", cells.join(" | "));
    }
    if table.len() > rows {
        println!("   ... +{} rows", table.len() - rows);
    }
}

fn cmd_columns() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", columns_description());
    Ok(())
}

async fn cmd_serve(port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ServerConfig::from_env()?;
    if let Some(port) = port {
        config = config.with_port(port);
    }
    revsplit::server::start_server(config).await
}

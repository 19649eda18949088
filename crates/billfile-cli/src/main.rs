//! billfile CLI - file pending bill annotations from the terminal
//!
//! Lists the open rows of the configured sheet and submits filing entries
//! back through the Apps Script endpoint.

use std::path::{Path, PathBuf};

use billfile_core::{FilingSession, FilingStatus, Record, SheetClient, SheetConfig};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use thiserror::Error;

mod config_file;

#[derive(Parser)]
#[command(name = "billfile")]
#[command(about = "File pending bill annotations against a published Google Sheet")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Optional path to the config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List open rows ready for filing
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Submit a filing entry for one row
    Submit {
        /// Lift number identifying the row
        #[arg(long, value_name = "NO")]
        lift: String,
        /// Filing status to record
        #[arg(long, value_enum, default_value_t = StatusArg::NotDone)]
        status: StatusArg,
        /// Free-text remarks
        #[arg(long, default_value = "")]
        remarks: String,
        /// Skip the post-submit refresh check
        #[arg(long)]
        no_refresh: bool,
    },
    /// Manage the CLI configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
enum StatusArg {
    Done,
    NotDone,
}

impl From<StatusArg> for FilingStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Done => Self::Done,
            StatusArg::NotDone => Self::NotDone,
        }
    }
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Initialize or update the config file
    Init {
        /// Spreadsheet document id
        #[arg(long, value_name = "ID")]
        sheet_id: String,
        /// Tab name within the spreadsheet
        #[arg(long, value_name = "NAME")]
        sheet_name: String,
        /// Apps Script web app URL
        #[arg(long, value_name = "URL")]
        script_url: String,
        /// Feature tag distinguishing this page's writes
        #[arg(long, value_name = "TAG")]
        feature_tag: String,
    },
    /// Show the active configuration
    Show,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Core(#[from] billfile_core::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("{0}")]
    Config(String),
    #[error("No sheet is configured. Run `billfile config init` first.")]
    NotConfigured,
    #[error("No open row found for lift number: {0}")]
    RecordNotFound(String),
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("billfile_core=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let config_path = cli
        .config
        .unwrap_or_else(config_file::default_config_path);

    match cli.command {
        Commands::List { json } => run_list(json, &config_path).await,
        Commands::Submit {
            lift,
            status,
            remarks,
            no_refresh,
        } => run_submit(&lift, status.into(), remarks, no_refresh, &config_path).await,
        Commands::Config { command } => run_config(command, &config_path),
    }
}

async fn run_list(as_json: bool, config_path: &Path) -> Result<(), CliError> {
    let client = open_client(config_path)?;
    let records = client.fetch_records().await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        for line in format_record_lines(&records) {
            println!("{line}");
        }
        println!();
        println!("Showing {} records ready for filing", records.len());
    }

    Ok(())
}

async fn run_submit(
    lift: &str,
    status: FilingStatus,
    remarks: String,
    no_refresh: bool,
    config_path: &Path,
) -> Result<(), CliError> {
    let client = open_client(config_path)?;
    let mut session = FilingSession::new();
    session.load(client.fetch_records().await?);

    let record_id = session
        .find_by_lift_number(lift)
        .map(|record| record.id)
        .ok_or_else(|| CliError::RecordNotFound(lift.to_string()))?;

    session.begin_edit(record_id)?;
    if let Some(draft) = session.draft_mut() {
        draft.status = status;
        draft.remarks = remarks;
    }

    let request = session.prepare_submission(Local::now().naive_local())?;
    let actual = request.entry.actual.clone();
    let delay = request.entry.delay.clone();

    match client.submit_filing(&request).await {
        Ok(()) => session.complete_submission()?,
        Err(error) => {
            session.fail_submission()?;
            return Err(error.into());
        }
    }

    println!("Filing entry submitted for lift number {lift}");
    println!("  Actual: {actual}");
    println!("  Delay: {delay} days");

    if !no_refresh {
        // let the remote write settle before re-reading the sheet
        tokio::time::sleep(client.config().settle_delay()).await;
        session.load(client.fetch_records().await?);
        if session.find_by_lift_number(lift).is_some() {
            println!("Row is still listed after refresh; the write may not have settled yet");
        } else {
            println!("Row no longer listed after refresh");
        }
    }

    Ok(())
}

fn run_config(command: ConfigCommands, config_path: &Path) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            sheet_id,
            sheet_name,
            script_url,
            feature_tag,
        } => {
            let config = SheetConfig::new(sheet_id, sheet_name, script_url, feature_tag)?;
            config_file::save_to_path(&config, config_path).map_err(CliError::Config)?;
            println!("{}", config_path.display());
            Ok(())
        }
        ConfigCommands::Show => {
            let config = load_required_config(config_path)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn open_client(config_path: &Path) -> Result<SheetClient, CliError> {
    let config = load_required_config(config_path)?;
    Ok(SheetClient::new(config)?)
}

fn load_required_config(config_path: &Path) -> Result<SheetConfig, CliError> {
    config_file::load_from_path(config_path)
        .map_err(CliError::Config)?
        .ok_or(CliError::NotConfigured)
}

const LIST_HEADER: [&str; 8] = [
    "Timestamp",
    "Lift Number",
    "Type",
    "Bill No.",
    "Party Name",
    "Product Name",
    "Qty",
    "Transporter",
];

/// Render records as aligned text columns, header first.
fn format_record_lines(records: &[Record]) -> Vec<String> {
    let mut table: Vec<Vec<&str>> = vec![LIST_HEADER.to_vec()];
    table.extend(records.iter().map(|record| {
        vec![
            record.timestamp.as_str(),
            record.lift_number.as_str(),
            record.bill_type.as_str(),
            record.bill_number.as_str(),
            record.party_name.as_str(),
            record.product_name.as_str(),
            record.quantity.as_str(),
            record.transporter_name.as_str(),
        ]
    }));

    let widths: Vec<usize> = (0..LIST_HEADER.len())
        .map(|column| {
            table
                .iter()
                .map(|row| row[column].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    table
        .iter()
        .map(|row| {
            row.iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:<width$}"))
                .collect::<Vec<String>>()
                .join("  ")
                .trim_end()
                .to_string()
        })
        .collect()
}

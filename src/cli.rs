use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Reconcile CSV and JSON exports of a study-tracking dataset",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compare the CSV and JSON exports table by table and print a report
    Reconcile(ReconcileArgs),
    /// Show the effective table registry and its field maps
    Tables(TablesArgs),
}

#[derive(Debug, Args)]
pub struct ReconcileArgs {
    /// Base directory containing both export directories
    #[arg(short = 'b', long = "base", default_value = ".")]
    pub base: PathBuf,
    /// Directory with the CSV exports, relative to the base directory
    #[arg(long = "csv-dir", default_value = "analistData")]
    pub csv_dir: PathBuf,
    /// Directory with the JSON exports, relative to the base directory
    #[arg(long = "json-dir", default_value = "tmp_gas_data")]
    pub json_dir: PathBuf,
    /// Restrict the run to these tables (repeatable, case-insensitive)
    #[arg(short = 't', long = "table", action = clap::ArgAction::Append)]
    pub tables: Vec<String>,
    /// YAML mapping file replacing the built-in table registry
    #[arg(long = "mapping")]
    pub mapping: Option<PathBuf>,
    /// Maximum sample tuples shown per side for a mismatching table
    #[arg(long, default_value_t = 3)]
    pub samples: usize,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the CSV files (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Write the report to this file instead of stdout
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Exit non-zero when any table mismatches
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Args)]
pub struct TablesArgs {
    /// YAML mapping file replacing the built-in table registry
    #[arg(long = "mapping")]
    pub mapping: Option<PathBuf>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

pub mod cli;
pub mod compare;
pub mod io_utils;
pub mod loader;
pub mod normalize;
pub mod report;
pub mod table;
pub mod tables;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result, bail};
use clap::Parser;
use itertools::Itertools;
use log::{LevelFilter, debug, info};

use crate::cli::{Cli, Commands};
use crate::report::ReportBuilder;
use crate::tables::TableSpec;

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("study_reconcile", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Reconcile(args) => handle_reconcile(&args),
        Commands::Tables(args) => handle_tables(&args),
    }
}

fn load_registry(mapping: Option<&std::path::Path>) -> Result<Vec<TableSpec>> {
    match mapping {
        Some(path) => tables::load_mapping(path),
        None => Ok(tables::builtin_tables()),
    }
}

fn handle_reconcile(args: &cli::ReconcileArgs) -> Result<()> {
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let registry = load_registry(args.mapping.as_deref())?;
    let selected = tables::select_tables(registry, &args.tables)?;

    let csv_dir = args.base.join(&args.csv_dir);
    let json_dir = args.base.join(&args.json_dir);
    info!(
        "Reconciling {} table(s): CSV from {:?}, JSON from {:?}",
        selected.len(),
        csv_dir,
        json_dir
    );

    let mut builder = ReportBuilder::new(args.samples);
    let mut mismatched = 0usize;
    for spec in &selected {
        let csv_path = csv_dir.join(&spec.csv_file);
        let json_path = json_dir.join(&spec.json_file);
        let delimiter = io_utils::resolve_input_delimiter(&csv_path, args.delimiter);
        debug!(
            "{}: comparing {:?} (delimiter '{}') against {:?}",
            spec.name,
            csv_path,
            io_utils::printable_delimiter(delimiter),
            json_path
        );
        let csv_rows = loader::read_csv_rows(&csv_path, delimiter, encoding)
            .with_context(|| format!("Loading CSV side of table '{}'", spec.name))?;
        let json_rows = loader::read_json_rows(&json_path)
            .with_context(|| format!("Loading JSON side of table '{}'", spec.name))?;

        let diff = compare::diff_table(spec, &csv_rows, &json_rows);
        if diff.is_match() {
            info!("{}: match ({} row(s) per side)", spec.name, diff.csv_count);
        } else {
            info!(
                "{}: mismatch ({} only in CSV, {} only in JSON)",
                spec.name,
                diff.only_in_csv.len(),
                diff.only_in_json.len()
            );
            mismatched += 1;
        }
        builder.push_table(&diff);
    }

    report::emit(&builder.render(), args.output.as_deref())?;
    if args.strict && mismatched > 0 {
        bail!("{mismatched} table(s) differ between the exports");
    }
    Ok(())
}

fn handle_tables(args: &cli::TablesArgs) -> Result<()> {
    let registry = load_registry(args.mapping.as_deref())?;
    let headers = [
        "table",
        "csv file",
        "json file",
        "compared fields",
        "ignored",
    ]
    .map(String::from)
    .to_vec();
    let rows = registry
        .iter()
        .map(|spec| {
            vec![
                spec.name.clone(),
                spec.csv_file.clone(),
                spec.json_file.clone(),
                spec.compared_fields().map(|f| f.output()).join(", "),
                spec.ignore.iter().join(", "),
            ]
        })
        .collect::<Vec<_>>();
    table::print_table(&headers, &rows);
    Ok(())
}

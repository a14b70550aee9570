//! Table registry: which files to reconcile and which fields participate.
//!
//! The four built-in tables mirror the study-tracker exports. A YAML mapping
//! file can replace them for other datasets; field entries are either a bare
//! name (output key equals source key) or an `output`/`source` pair.

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldSpec {
    /// Output key and source key are the same.
    Name(String),
    Renamed { output: String, source: String },
}

impl FieldSpec {
    pub fn output(&self) -> &str {
        match self {
            FieldSpec::Name(name) => name,
            FieldSpec::Renamed { output, .. } => output,
        }
    }

    pub fn source(&self) -> &str {
        match self {
            FieldSpec::Name(name) => name,
            FieldSpec::Renamed { source, .. } => source,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSpec {
    pub name: String,
    pub csv_file: String,
    pub json_file: String,
    pub fields: Vec<FieldSpec>,
    /// Output keys excluded from comparison.
    #[serde(default)]
    pub ignore: Vec<String>,
    /// Output keys normalized as booleans rather than text.
    #[serde(default)]
    pub boolean_fields: Vec<String>,
}

impl TableSpec {
    pub fn is_boolean(&self, output_key: &str) -> bool {
        self.boolean_fields.iter().any(|f| f == output_key)
    }

    pub fn is_ignored(&self, output_key: &str) -> bool {
        self.ignore.iter().any(|f| f == output_key)
    }

    /// Fields that actually participate in comparison, in declaration order.
    pub fn compared_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| !self.is_ignored(f.output()))
    }
}

fn table(
    name: &str,
    csv_file: &str,
    json_file: &str,
    fields: &[&str],
    ignore: &[&str],
    boolean_fields: &[&str],
) -> TableSpec {
    TableSpec {
        name: name.to_string(),
        csv_file: csv_file.to_string(),
        json_file: json_file.to_string(),
        fields: fields
            .iter()
            .map(|f| FieldSpec::Name((*f).to_string()))
            .collect(),
        ignore: ignore.iter().map(|f| (*f).to_string()).collect(),
        boolean_fields: boolean_fields.iter().map(|f| (*f).to_string()).collect(),
    }
}

/// The study-tracker export registry. `W szkole` is a literal CSV header in
/// StudyTasks and compares as-is; the StudySessions CSV carries an extra
/// `date` column the JSON export does not expose, so it is ignored.
pub fn builtin_tables() -> Vec<TableSpec> {
    vec![
        table(
            "Subjects",
            "Matura - Subjects.csv",
            "subjects.json",
            &["subject_name", "color", "icon", "active"],
            &[],
            &["active"],
        ),
        table(
            "Categories",
            "Matura - Categories.csv",
            "categories.json",
            &["category_name", "subject_name", "difficulty", "active"],
            &[],
            &["active"],
        ),
        table(
            "StudyTasks",
            "Matura - StudyTasks.csv",
            "study_tasks.json",
            &[
                "task_id",
                "task_name",
                "description",
                "categories",
                "correctly_completed",
                "start_time",
                "end_time",
                "W szkole",
                "subject",
                "session_id",
            ],
            &[],
            &[],
        ),
        table(
            "StudySessions",
            "Matura - StudySessions.csv",
            "study_sessions.json",
            &[
                "session_id",
                "start_time",
                "end_time",
                "duration_minutes",
                "total_tasks",
                "correct_tasks",
                "accuracy_percentage",
                "notes",
            ],
            &["date"],
            &[],
        ),
    ]
}

pub fn load_mapping(path: &Path) -> Result<Vec<TableSpec>> {
    let file = File::open(path).with_context(|| format!("Opening mapping file {path:?}"))?;
    let reader = BufReader::new(file);
    let tables: Vec<TableSpec> =
        serde_yaml::from_reader(reader).with_context(|| format!("Parsing mapping YAML {path:?}"))?;
    validate_mapping(&tables)?;
    Ok(tables)
}

fn validate_mapping(tables: &[TableSpec]) -> Result<()> {
    if tables.is_empty() {
        bail!("Mapping file defines no tables");
    }
    for spec in tables {
        if spec.fields.is_empty() {
            bail!("Table '{}' defines no fields", spec.name);
        }
        for ignored in &spec.ignore {
            if !spec.fields.iter().any(|f| f.output() == ignored) {
                bail!(
                    "Table '{}' ignores unknown field '{}'",
                    spec.name,
                    ignored
                );
            }
        }
        for boolean in &spec.boolean_fields {
            if !spec.fields.iter().any(|f| f.output() == boolean) {
                bail!(
                    "Table '{}' marks unknown field '{}' as boolean",
                    spec.name,
                    boolean
                );
            }
        }
    }
    Ok(())
}

/// Keeps only the named tables, preserving registry order. Unknown names are
/// an error so a typo does not silently reconcile nothing.
pub fn select_tables(tables: Vec<TableSpec>, names: &[String]) -> Result<Vec<TableSpec>> {
    if names.is_empty() {
        return Ok(tables);
    }
    for name in names {
        if !tables.iter().any(|t| t.name.eq_ignore_ascii_case(name)) {
            bail!("Unknown table '{name}'");
        }
    }
    Ok(tables
        .into_iter()
        .filter(|t| names.iter().any(|n| t.name.eq_ignore_ascii_case(n)))
        .collect())
}

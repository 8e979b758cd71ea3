//! Data-quality audit for the worldwide gross CSV.
//!
//! Checks are shallow on purpose: the currency check only asks for a leading
//! `$`, so a degenerate `$` cell passes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::Path;
use tracing::{info, warn};

use crate::config::AuditConfig;
use crate::constants::{COL_FILM_NAME, COL_GROSS_USD, COL_YEAR_RELEASED};
use crate::csv::CsvTable;
use crate::error::{Result, ScraperError};

/// Outcome of a single check, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum CheckStatus {
    Pass,
    Warning,
    Fail,
    Critical,
}

impl CheckStatus {
    fn icon(self) -> &'static str {
        match self {
            CheckStatus::Pass => "✅ PASS",
            CheckStatus::Warning => "⚠️ WARNING",
            CheckStatus::Fail => "❌ FAIL",
            CheckStatus::Critical => "❌ CRITICAL",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub summary: String,
    /// Offending columns or rows, one per entry
    pub details: Vec<String>,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, summary: impl Into<String>, details: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            status,
            summary: summary.into(),
            details,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub file: String,
    pub total_rows: usize,
    pub generated_at: DateTime<Utc>,
    pub checks: Vec<CheckResult>,
}

impl AuditReport {
    pub fn worst(&self) -> CheckStatus {
        self.checks
            .iter()
            .map(|c| c.status)
            .max()
            .unwrap_or(CheckStatus::Pass)
    }

    pub fn check(&self, name: &str) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.name == name)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "📊 Auditing '{}'...\n", self.file);
        for check in &self.checks {
            let _ = writeln!(out, "{}: {}", check.status.icon(), check.summary);
            for detail in &check.details {
                let _ = writeln!(out, "    {}", detail);
            }
        }
        let _ = writeln!(out, "{}", "-".repeat(30));
        let _ = writeln!(out, "Total Rows Checked: {}", self.total_rows);
        let _ = writeln!(out, "{}", "-".repeat(30));
        out
    }
}

pub struct Auditor {
    min_year: i32,
    max_year: i32,
}

impl Auditor {
    pub fn new(config: &AuditConfig) -> Self {
        Self {
            min_year: config.min_year,
            max_year: config.max_year,
        }
    }

    /// Audit a CSV on disk. A missing file is reported as a critical check,
    /// not as an error.
    pub fn audit_file(&self, path: &Path) -> Result<AuditReport> {
        let file = path.display().to_string();
        match CsvTable::from_path(path) {
            Ok(table) => Ok(self.audit_table(&file, &table)),
            Err(ScraperError::MissingFile(_)) => {
                warn!(%file, "Audit target not found");
                Ok(AuditReport {
                    file: file.clone(),
                    total_rows: 0,
                    generated_at: Utc::now(),
                    checks: vec![CheckResult::new(
                        "file_exists",
                        CheckStatus::Critical,
                        format!("File '{}' not found.", file),
                        Vec::new(),
                    )],
                })
            }
            Err(e) => Err(e),
        }
    }

    pub fn audit_table(&self, file: &str, table: &CsvTable) -> AuditReport {
        if table.is_empty() {
            warn!(file, "CSV has no data rows");
        }
        let checks = vec![
            check_missing_values(table),
            check_duplicates(table),
            check_currency_format(table),
            self.check_years(table),
        ];

        let report = AuditReport {
            file: file.to_string(),
            total_rows: table.len(),
            generated_at: Utc::now(),
            checks,
        };
        info!(file, rows = report.total_rows, worst = ?report.worst(), "Audit finished");
        report
    }

    fn check_years(&self, table: &CsvTable) -> CheckResult {
        const NAME: &str = "valid_years";
        let Some(col) = table.column_index(COL_YEAR_RELEASED) else {
            return missing_column(NAME, COL_YEAR_RELEASED);
        };

        let invalid: Vec<String> = (0..table.len())
            .filter(|&row| !self.is_valid_year(table.cell(row, col)))
            .map(|row| format!("{} | {}", film_name(table, row), table.cell(row, col)))
            .collect();

        if invalid.is_empty() {
            CheckResult::new(NAME, CheckStatus::Pass, "All years are valid numbers.", invalid)
        } else {
            CheckResult::new(NAME, CheckStatus::Fail, "Found invalid years:", invalid)
        }
    }

    fn is_valid_year(&self, cell: &str) -> bool {
        match cell.trim().parse::<f64>() {
            Ok(year) if year.is_finite() => {
                year >= f64::from(self.min_year) && year <= f64::from(self.max_year)
            }
            _ => false,
        }
    }
}

fn missing_column(name: &str, column: &str) -> CheckResult {
    CheckResult::new(
        name,
        CheckStatus::Fail,
        format!("Column '{}' is missing.", column),
        Vec::new(),
    )
}

fn film_name(table: &CsvTable, row: usize) -> &str {
    table
        .column_index(COL_FILM_NAME)
        .map(|col| table.cell(row, col))
        .unwrap_or("")
}

/// Cell values the data-quality tooling reads as missing, besides empty.
const NA_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_missing(cell: &str) -> bool {
    cell.is_empty() || NA_TOKENS.contains(&cell)
}

fn check_missing_values(table: &CsvTable) -> CheckResult {
    const NAME: &str = "missing_values";
    let details: Vec<String> = table
        .headers
        .iter()
        .enumerate()
        .filter_map(|(col, header)| {
            let missing = (0..table.len())
                .filter(|&row| is_missing(table.cell(row, col)))
                .count();
            (missing > 0).then(|| format!("{}: {}", header, missing))
        })
        .collect();

    if details.is_empty() {
        CheckResult::new(NAME, CheckStatus::Pass, "No missing fields.", details)
    } else {
        CheckResult::new(NAME, CheckStatus::Fail, "Found missing values:", details)
    }
}

fn check_duplicates(table: &CsvTable) -> CheckResult {
    const NAME: &str = "duplicates";
    let Some(col) = table.column_index(COL_FILM_NAME) else {
        return missing_column(NAME, COL_FILM_NAME);
    };

    let mut seen = HashSet::new();
    let duplicates: Vec<String> = (0..table.len())
        .map(|row| table.cell(row, col))
        .filter(|name| !seen.insert(*name))
        .map(str::to_string)
        .collect();

    if duplicates.is_empty() {
        CheckResult::new(NAME, CheckStatus::Pass, "No duplicate movies found.", duplicates)
    } else {
        let summary = format!("Found {} duplicate movies:", duplicates.len());
        CheckResult::new(NAME, CheckStatus::Fail, summary, duplicates)
    }
}

fn check_currency_format(table: &CsvTable) -> CheckResult {
    const NAME: &str = "currency_format";
    let Some(col) = table.column_index(COL_GROSS_USD) else {
        return missing_column(NAME, COL_GROSS_USD);
    };

    let bad: Vec<String> = (0..table.len())
        .filter(|&row| !table.cell(row, col).starts_with('$'))
        .map(|row| format!("{} | {}", film_name(table, row), table.cell(row, col)))
        .collect();

    if bad.is_empty() {
        CheckResult::new(NAME, CheckStatus::Pass, "All currency values start with '$'.", bad)
    } else {
        let summary = format!("{} rows have bad currency format (Missing '$'):", bad.len());
        CheckResult::new(NAME, CheckStatus::Warning, summary, bad)
    }
}

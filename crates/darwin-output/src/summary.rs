//! Descriptive statistics for a finished panel.

use crate::error::{OutputError, Result};
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

const GVKEY: &str = "gvkey";
const DATA_DATE: &str = "datadate";
const FISCAL_YEAR: &str = "fyear";
const DEFAULT_FLAG: &str = "dflt_flag";

/// Statement and default counts for one fiscal year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearBreakdown {
    /// Fiscal year.
    pub fiscal_year: i32,

    /// Statement rows in this fiscal year.
    pub statements: u32,

    /// Rows flagged as defaults.
    pub defaults: u32,

    /// Defaults as a share of statements.
    pub default_rate: f64,
}

/// Panel-level descriptive statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelSummary {
    /// Total statement rows.
    pub rows: usize,

    /// Distinct issuers.
    pub issuers: usize,

    /// Earliest statement date.
    pub first_statement: Option<NaiveDate>,

    /// Latest statement date.
    pub last_statement: Option<NaiveDate>,

    /// Rows flagged as defaults.
    pub defaults: u32,

    /// Defaults as a share of rows.
    pub default_rate: f64,

    /// Per-fiscal-year breakdown, ascending by year.
    pub by_year: Vec<YearBreakdown>,
}

impl PanelSummary {
    /// Compute a summary from a finished panel.
    ///
    /// Rows with a null fiscal year are counted in the panel totals but
    /// excluded from the per-year breakdown.
    pub fn from_panel(panel: &DataFrame) -> Result<Self> {
        check_columns(panel, "panel", &[GVKEY, DATA_DATE, FISCAL_YEAR, DEFAULT_FLAG])?;

        let rows = panel.height();
        let issuers = panel.column(GVKEY)?.n_unique()?;

        let dates = panel.column(DATA_DATE)?.date()?;
        let first_statement = dates.as_date_iter().flatten().min();
        let last_statement = dates.as_date_iter().flatten().max();

        let defaults = panel
            .column(DEFAULT_FLAG)?
            .cast(&DataType::Int64)?
            .i64()?
            .sum()
            .unwrap_or(0) as u32;
        let default_rate = rate(defaults, rows);

        let by_year = yearly_breakdown(panel)?;

        Ok(Self {
            rows,
            issuers,
            first_statement,
            last_statement,
            defaults,
            default_rate,
            by_year,
        })
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str("\nPanel Summary\n");
        output.push_str(&"=".repeat(56));
        output.push('\n');
        output.push_str(&format!("  Rows:          {}\n", self.rows));
        output.push_str(&format!("  Issuers:       {}\n", self.issuers));
        output.push_str(&format!(
            "  Statements:    {} to {}\n",
            format_date(self.first_statement),
            format_date(self.last_statement)
        ));
        output.push_str(&format!(
            "  Defaults:      {} ({:.2}%)\n",
            self.defaults,
            self.default_rate * 100.0
        ));

        if !self.by_year.is_empty() {
            output.push('\n');
            output.push_str(&format!(
                "{:>6} {:>12} {:>10} {:>8}\n",
                "Year", "Statements", "Defaults", "Rate"
            ));
            output.push_str(&"-".repeat(56));
            output.push('\n');
            for year in &self.by_year {
                output.push_str(&format!(
                    "{:>6} {:>12} {:>10} {:>7.2}%\n",
                    year.fiscal_year,
                    year.statements,
                    year.defaults,
                    year.default_rate * 100.0
                ));
            }
        }

        output.push_str(&"=".repeat(56));
        output.push('\n');

        output
    }
}

impl fmt::Display for PanelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Panel: {} rows, {} issuers", self.rows, self.issuers)?;
        writeln!(
            f,
            "  Statements: {} to {}",
            format_date(self.first_statement),
            format_date(self.last_statement)
        )?;
        writeln!(
            f,
            "  Defaults: {} ({:.2}%)",
            self.defaults,
            self.default_rate * 100.0
        )?;
        Ok(())
    }
}

fn yearly_breakdown(panel: &DataFrame) -> Result<Vec<YearBreakdown>> {
    let grouped = panel
        .clone()
        .lazy()
        .filter(col(FISCAL_YEAR).is_not_null())
        .group_by([col(FISCAL_YEAR).cast(DataType::Int32)])
        .agg([
            len().alias("statements"),
            col(DEFAULT_FLAG)
                .cast(DataType::Int64)
                .sum()
                .alias("defaults"),
        ])
        .sort([FISCAL_YEAR], SortMultipleOptions::default())
        .collect()?;

    let years = grouped.column(FISCAL_YEAR)?.i32()?;
    let statements = grouped.column("statements")?.cast(&DataType::UInt32)?;
    let statements = statements.u32()?;
    let defaults = grouped.column("defaults")?.cast(&DataType::UInt32)?;
    let defaults = defaults.u32()?;

    let breakdown = years
        .iter()
        .zip(statements.iter())
        .zip(defaults.iter())
        .filter_map(|((year, count), dflt)| {
            let (year, count, dflt) = (year?, count?, dflt?);
            Some(YearBreakdown {
                fiscal_year: year,
                statements: count,
                defaults: dflt,
                default_rate: rate(dflt, count as usize),
            })
        })
        .collect();

    Ok(breakdown)
}

fn rate(defaults: u32, rows: usize) -> f64 {
    if rows == 0 {
        0.0
    } else {
        f64::from(defaults) / rows as f64
    }
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "-".to_string(), |d| d.to_string())
}

fn check_columns(df: &DataFrame, table: &str, required: &[&str]) -> Result<()> {
    for column in required {
        if df.column(column).is_err() {
            return Err(OutputError::MissingColumn {
                column: (*column).to_string(),
                table: table.to_string(),
            });
        }
    }
    Ok(())
}

//! Snapshot loading for the raw input tables.
//!
//! A snapshot directory holds the four tables the engine consumes, one CSV
//! each. Every column is read as a string and then coerced per dataset:
//! dates parse `%Y-%m-%d` non-strictly (failures become null), statement
//! line items cast to Float64, and fiscal year fields to Int32.

use crate::error::{DataError, Result};
use chrono::NaiveDate;
use darwin_panel::RatingSymbol;
use polars::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};

/// Logical input tables of a snapshot directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    /// Issuer identity map (`gvkey.csv`).
    Identity,
    /// Rating event stream (`ratings.csv`).
    Ratings,
    /// Financial statement observations (`financials.csv`).
    Financials,
    /// Company descriptors feeding sector derivation (`company.csv`).
    Company,
}

impl Dataset {
    /// All datasets a complete snapshot provides.
    pub const fn all() -> [Self; 4] {
        [Self::Identity, Self::Ratings, Self::Financials, Self::Company]
    }

    /// File name of the dataset inside a snapshot directory.
    pub const fn file_name(&self) -> &'static str {
        match self {
            Self::Identity => "gvkey.csv",
            Self::Ratings => "ratings.csv",
            Self::Financials => "financials.csv",
            Self::Company => "company.csv",
        }
    }

    /// Short name used in error messages and logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Ratings => "ratings",
            Self::Financials => "financials",
            Self::Company => "company",
        }
    }

    /// Columns the dataset must provide.
    pub const fn required_columns(&self) -> &'static [&'static str] {
        match self {
            Self::Identity => &["gvkey", "companyid", "startdate", "enddate"],
            Self::Ratings => &[
                "companyid",
                "entity_pname",
                "ratingdate",
                "ratingsymbol",
                "ratingactionword",
                "unsol",
            ],
            Self::Financials => &["gvkey", "datadate", "fyear"],
            Self::Company => &["gvkey", "conm", "gsector", "ggroup", "sic"],
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Loads snapshot tables with per-dataset coercions.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
    min_rating_date: Option<NaiveDate>,
}

impl SnapshotStore {
    /// Create a store over a snapshot directory.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            min_rating_date: None,
        }
    }

    /// Discard rating events dated before `date` at load time.
    pub fn with_min_rating_date(mut self, date: NaiveDate) -> Self {
        self.min_rating_date = Some(date);
        self
    }

    /// Path of a dataset's CSV file.
    pub fn path(&self, dataset: Dataset) -> PathBuf {
        self.root.join(dataset.file_name())
    }

    /// Load one dataset, verifying presence and required columns.
    pub fn load(&self, dataset: Dataset) -> Result<DataFrame> {
        let path = self.path(dataset);
        if !path.exists() {
            return Err(DataError::MissingInput {
                dataset: dataset.name().to_string(),
                path: path.display().to_string(),
            });
        }

        let raw = LazyCsvReader::new(&path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?;

        for column in dataset.required_columns() {
            if raw.column(column).is_err() {
                return Err(DataError::MissingColumn {
                    column: (*column).to_string(),
                    dataset: dataset.name().to_string(),
                });
            }
        }

        let coerced = match dataset {
            Dataset::Identity => coerce_identity(raw)?,
            Dataset::Ratings => self.coerce_ratings(raw)?,
            Dataset::Financials => coerce_financials(raw)?,
            Dataset::Company => raw,
        };

        log::debug!("loaded {} snapshot: {} rows", dataset, coerced.height());
        Ok(coerced)
    }
}

fn parse_date(column: &str) -> Expr {
    col(column).str().to_date(StrptimeOptions {
        format: Some("%Y-%m-%d".into()),
        strict: false,
        ..Default::default()
    })
}

fn coerce_identity(df: DataFrame) -> Result<DataFrame> {
    Ok(df
        .lazy()
        .with_columns([parse_date("startdate"), parse_date("enddate")])
        .collect()?)
}

fn coerce_financials(df: DataFrame) -> Result<DataFrame> {
    let names: Vec<String> = df
        .get_column_names_str()
        .iter()
        .map(|name| name.to_string())
        .collect();

    let mut casts = vec![parse_date("datadate")];
    for name in &names {
        match name.as_str() {
            "gvkey" | "datadate" => {}
            "fyear" | "fyr" => casts.push(col(name.as_str()).cast(DataType::Int32)),
            _ => casts.push(col(name.as_str()).cast(DataType::Float64)),
        }
    }

    Ok(df.lazy().with_columns(casts).collect()?)
}

impl SnapshotStore {
    fn coerce_ratings(&self, df: DataFrame) -> Result<DataFrame> {
        let symbols: Vec<&str> = RatingSymbol::all()
            .iter()
            .map(|symbol| symbol.as_str())
            .collect();
        let known = Series::new("ratingsymbol".into(), symbols);

        let before = df.height();
        let mut frame = df
            .lazy()
            .with_column(parse_date("ratingdate"))
            .filter(col("ratingsymbol").is_in(lit(known)))
            .collect()?;

        if let Some(floor) = self.min_rating_date {
            frame = frame
                .lazy()
                .filter(col("ratingdate").gt_eq(darwin_panel::schema::date_lit(floor)))
                .collect()?;
        }

        let dropped = before - frame.height();
        if dropped > 0 {
            log::debug!("ratings snapshot: dropped {} rows at ingest", dropped);
        }
        Ok(frame)
    }
}

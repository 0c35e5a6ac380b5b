//! Issuer sector derivation.
//!
//! Every rated issuer gets exactly one sector label, preferring its GICS
//! classification and falling back to the SIC division implied by its SIC
//! code. Both vocabularies are then folded into the normalized
//! [`Sector`](crate::taxonomy::sector::Sector) taxonomy.

use crate::taxonomy::gics::GicsSector;
use darwin_data::ReferenceTables;
use darwin_panel::schema::{GVKEY, SECTOR};
use polars::prelude::*;
use thiserror::Error;

/// Company descriptor columns consumed by derivation.
const COMPANY_NAME: &str = "conm";
const GICS_SECTOR: &str = "gsector";
const GICS_GROUP: &str = "ggroup";
const SIC_CODE: &str = "sic";

/// Intermediate columns.
const MAJOR_GROUP: &str = "major_group";
const SIC_DIVISION: &str = "sic_division";
const GICS_CODE: &str = "gsector_code";
const GICS_NAME: &str = "gics_name";
const MAPPED: &str = "sector_mapped";

/// The SIC division whose issuers split between Transportation, Services
/// and Utilities by major group.
const TCEGS: &str = "Transportation, Communications, Electric, Gas, And Sanitary Services";

/// GICS industry group for airlines, reclassified as Transportation.
const AIRLINES_GROUP: i32 = 2030;

/// Errors from sector derivation.
#[derive(Debug, Error)]
pub enum SectorError {
    /// A required column is missing from an input table.
    #[error("column '{column}' missing from {table} table")]
    MissingColumn {
        /// The missing column name.
        column: String,
        /// The table it was expected in.
        table: String,
    },

    /// A polars transform failed.
    #[error("dataframe operation failed: {0}")]
    Polars(#[from] PolarsError),
}

/// Result alias for sector derivation.
pub type Result<T> = std::result::Result<T, SectorError>;

/// Derives one sector per rated issuer from company descriptors.
#[derive(Debug, Clone)]
pub struct SectorDeriver {
    major_groups: DataFrame,
    divisions: DataFrame,
}

impl SectorDeriver {
    /// Create a deriver backed by the fetched SIC reference tables.
    pub fn new(reference: &ReferenceTables) -> Self {
        Self {
            major_groups: reference.major_groups.clone(),
            divisions: reference.divisions.clone(),
        }
    }

    /// Derive a `(gvkey, sector)` table for the rated issuers.
    ///
    /// The company table is restricted to `rated_gvkeys` and deduplicated to
    /// one row per issuer before classification. The returned sector column
    /// is null for issuers whose descriptors match no taxonomy entry.
    pub fn derive(&self, company: &DataFrame, rated_gvkeys: &Series) -> Result<DataFrame> {
        check_columns(
            company,
            "company",
            &[GVKEY, COMPANY_NAME, GICS_SECTOR, GICS_GROUP, SIC_CODE],
        )?;
        check_columns(&self.major_groups, "major groups", &["Major Group", "Division"])?;
        check_columns(&self.divisions, "divisions", &["Division", "Description"])?;

        let rated = company
            .clone()
            .lazy()
            .filter(col(GVKEY).is_in(lit(rated_gvkeys.clone())))
            .collect()?;
        let deduped = rated.unique_stable(
            Some(&[GVKEY.to_string()]),
            UniqueKeepStrategy::First,
            None,
        )?;

        log::debug!(
            "deriving sectors for {} issuers ({} company rows matched)",
            deduped.height(),
            rated.height()
        );

        let classified = self
            .with_sic_division(deduped.lazy())
            .with_column(col(GICS_SECTOR).cast(DataType::Int32).alias(GICS_CODE))
            .join(
                gics_frame()?.lazy(),
                [col(GICS_CODE)],
                [col(GICS_CODE)],
                JoinArgs::new(JoinType::Left),
            )
            .with_column(coalesce(&[col(GICS_NAME), col(SIC_DIVISION)]).alias(SECTOR))
            .with_column(corrected_names())
            .with_column(consumer_to_division())
            .join(
                normalization_frame()?.lazy(),
                [col(SECTOR)],
                [col(SECTOR)],
                JoinArgs::new(JoinType::Left),
            )
            .with_column(col(MAPPED).alias(SECTOR))
            .with_column(split_tcegs())
            .with_column(airlines_to_transportation())
            .select([col(GVKEY), col(SECTOR)])
            .collect()?;

        Ok(classified)
    }

    /// Attach the SIC division name implied by the first two SIC digits.
    fn with_sic_division(&self, company: LazyFrame) -> LazyFrame {
        company
            .with_column(
                col(SIC_CODE)
                    .cast(DataType::String)
                    .str()
                    .slice(lit(0), lit(2))
                    .str()
                    .pad_start(2, '0')
                    .alias(MAJOR_GROUP),
            )
            .join(
                self.major_groups
                    .clone()
                    .lazy()
                    .select([col("Major Group"), col("Division")]),
                [col(MAJOR_GROUP)],
                [col("Major Group")],
                JoinArgs::new(JoinType::Left),
            )
            .join(
                self.divisions
                    .clone()
                    .lazy()
                    .select([col("Division"), col("Description").alias(SIC_DIVISION)]),
                [col("Division")],
                [col("Division")],
                JoinArgs::new(JoinType::Left),
            )
    }
}

/// Hand corrections for issuers whose descriptors misclassify them.
fn corrected_names() -> Expr {
    when(col(COMPANY_NAME).eq(lit("ARGO GROUP INTL 6.5 SR NT 42")))
        .then(lit("Insurance"))
        .when(col(COMPANY_NAME).eq(lit("HILFIGER (TOMMY) U S A INC")))
        .then(lit("Manufacturing"))
        .when(col(COMPANY_NAME).eq(lit("NOVA SCOTIA POWER INC")))
        .then(lit("Utilities"))
        .otherwise(col(SECTOR))
        .alias(SECTOR)
}

/// The consumer GICS sectors are too coarse; their issuers take the SIC
/// division instead.
fn consumer_to_division() -> Expr {
    when(
        col(SECTOR)
            .eq(lit("Consumer Discretionary"))
            .or(col(SECTOR).eq(lit("Consumer Staples"))),
    )
    .then(col(SIC_DIVISION))
    .otherwise(col(SECTOR))
    .alias(SECTOR)
}

/// Split the TCEGS division by SIC major group.
fn split_tcegs() -> Expr {
    let group = col(MAJOR_GROUP).cast(DataType::Int32);
    when(col(SECTOR).eq(lit(TCEGS)))
        .then(
            when(group.clone().eq(lit(48)))
                .then(lit("Services"))
                .when(group.clone().gt_eq(lit(40)).and(group.lt(lit(48))))
                .then(lit("Transportation"))
                .otherwise(lit("Utilities")),
        )
        .otherwise(col(SECTOR))
        .alias(SECTOR)
}

/// Airlines carry a Transportation label regardless of GICS sector.
fn airlines_to_transportation() -> Expr {
    when(
        col(GICS_GROUP)
            .cast(DataType::Int32)
            .eq(lit(AIRLINES_GROUP)),
    )
    .then(lit("Transportation"))
    .otherwise(col(SECTOR))
    .alias(SECTOR)
}

/// Static GICS code-to-name lookup frame.
fn gics_frame() -> Result<DataFrame> {
    let codes: Vec<i32> = GicsSector::all().iter().map(|s| s.code() as i32).collect();
    let names: Vec<&str> = GicsSector::all().iter().map(|s| s.name()).collect();
    Ok(df!(
        GICS_CODE => codes,
        GICS_NAME => names,
    )?)
}

/// Folds GICS sector names and SIC division names into the normalized
/// taxonomy. Labels absent from the map fold to null.
fn normalization_frame() -> Result<DataFrame> {
    let entries: [(&str, &str); 20] = [
        ("Industrials", "Manufacturing"),
        ("Health Care", "Health"),
        ("Energy", "Utilities"),
        ("Information Technology", "Information Technology"),
        ("Wholesale Trade", "Wholesale"),
        ("Utilities", "Utilities"),
        ("Financials", "Financials"),
        ("Materials", "Manufacturing"),
        (TCEGS, TCEGS),
        ("Communication Services", "Services"),
        ("Retail Trade", "Retail"),
        ("Manufacturing", "Manufacturing"),
        ("Construction", "Construction"),
        ("Finance, Insurance, And Real Estate", "Financials"),
        ("Services", "Services"),
        ("Agriculture, Forestry, And Fishing", "Agriculture"),
        ("Public Administration", "Utilities"),
        ("Real Estate", "Financials"),
        ("Mining", "Manufacturing"),
        ("Insurance", "Financials"),
    ];
    let from: Vec<&str> = entries.iter().map(|(f, _)| *f).collect();
    let to: Vec<&str> = entries.iter().map(|(_, t)| *t).collect();
    Ok(df!(
        SECTOR => from,
        MAPPED => to,
    )?)
}

fn check_columns(df: &DataFrame, table: &str, required: &[&str]) -> Result<()> {
    for column in required {
        if df.column(column).is_err() {
            return Err(SectorError::MissingColumn {
                column: (*column).to_string(),
                table: table.to_string(),
            });
        }
    }
    Ok(())
}

//! Panel assembly.
//!
//! Sequences event linking, interval construction, the as-of join, override
//! application, sector attachment, and horizon labeling, then restricts the
//! result to the published schema. Policy filters (sector exclusion, minimum
//! default distance) run strictly after labeling so labels always reflect the
//! full rating history.

use crate::asof::AsOfJoiner;
use crate::error::Result;
use crate::events;
use crate::intervals::IntervalBuilder;
use crate::label::{HorizonConfig, HorizonLabeler};
use crate::overrides::OverrideResolver;
use crate::schema::{
    self, DATA_DATE, DAYS_TO_DEFAULT, DEFAULT_DATE, DEFAULT_FLAG, FISCAL_YEAR, GVKEY,
    RATING_COLUMNS, SECTOR,
};
use chrono::NaiveDate;
use polars::prelude::*;

/// Input tables for one panel build.
///
/// Ownership moves into the assembler; each table is consumed by exactly one
/// pipeline stage.
#[derive(Debug, Clone)]
pub struct PanelInputs {
    /// Issuer identity map (`gvkey` to `companyid`).
    pub identity: DataFrame,
    /// Raw rating event stream keyed by `companyid`.
    pub events: DataFrame,
    /// Statement observations keyed by `gvkey` and `datadate`.
    pub statements: DataFrame,
    /// Optional issuer sector table (`gvkey` to `sector`). When absent the
    /// published `sector` column is null.
    pub sectors: Option<DataFrame>,
}

/// Panel build configuration.
#[derive(Debug, Clone)]
pub struct AssemblerConfig {
    /// Acceptance window for the default flag.
    pub horizon: HorizonConfig,
    /// Far-future sentinel closing open intervals and marking no-default
    /// issuers.
    pub sentinel: NaiveDate,
    /// Sectors to drop from the published panel. Empty by default; rows with
    /// a null sector are never dropped by this filter.
    pub exclude_sectors: Vec<String>,
    /// Minimum `days2dflt` a published row must have, if set. Drops
    /// statements dated within the window of (or after) their issuer's
    /// default.
    pub min_days_to_default: Option<i64>,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            horizon: HorizonConfig::default(),
            sentinel: schema::sentinel_date(),
            exclude_sectors: Vec::new(),
            min_days_to_default: None,
        }
    }
}

/// Builds the published statement/rating panel.
#[derive(Debug, Clone, Default)]
pub struct PanelAssembler {
    config: AssemblerConfig,
}

impl PanelAssembler {
    /// Create an assembler with the given configuration.
    pub fn new(config: AssemblerConfig) -> Self {
        Self { config }
    }

    /// Run the full pipeline and return the published panel.
    ///
    /// The result has one row per (`gvkey`, `datadate`) with qualifying
    /// rating coverage, sorted by issuer and statement date, with all
    /// statement fields followed by the rating, sector, and default columns.
    pub fn assemble(&self, inputs: PanelInputs) -> Result<DataFrame> {
        schema::check_columns(
            &inputs.statements,
            "statements",
            &[GVKEY, DATA_DATE, FISCAL_YEAR],
        )?;

        let statement_columns: Vec<String> = inputs
            .statements
            .get_column_names_str()
            .iter()
            .map(|name| name.to_string())
            .collect();

        let linked = events::link_events(&inputs.identity, &inputs.events)?;
        let intervals = IntervalBuilder::with_sentinel(self.config.sentinel).build(&linked)?;
        let joined = AsOfJoiner::with_sentinel(self.config.sentinel)
            .join(&inputs.statements, &intervals)?;

        let resolver = OverrideResolver::new();
        let overrides = resolver.resolve(&linked)?;
        let overridden = resolver.apply(&joined, &overrides)?;

        let with_sector = self.attach_sectors(overridden, inputs.sectors.as_ref())?;

        let labeler =
            HorizonLabeler::with_sentinel(self.config.horizon, self.config.sentinel);
        let labeled = labeler.label(&with_sector, &linked)?;

        let mut published: Vec<String> = statement_columns;
        published.extend(RATING_COLUMNS.iter().map(|name| name.to_string()));
        published.push(SECTOR.to_string());
        published.push(DEFAULT_DATE.to_string());
        published.push(DAYS_TO_DEFAULT.to_string());
        published.push(DEFAULT_FLAG.to_string());

        let panel = labeled.select(published)?.sort(
            [GVKEY, DATA_DATE],
            SortMultipleOptions::default().with_maintain_order(true),
        )?;

        let panel = self.apply_policy_filters(panel)?;
        log::debug!(
            "assembled panel: {} rows, {} columns",
            panel.height(),
            panel.width()
        );
        Ok(panel)
    }

    fn attach_sectors(&self, panel: DataFrame, sectors: Option<&DataFrame>) -> Result<DataFrame> {
        match sectors {
            Some(sectors) => {
                schema::check_columns(sectors, "sector table", &[GVKEY, SECTOR])?;
                Ok(panel
                    .lazy()
                    .join(
                        sectors.clone().lazy(),
                        [col(GVKEY)],
                        [col(GVKEY)],
                        JoinArgs::new(JoinType::Left),
                    )
                    .collect()?)
            }
            None => {
                let mut panel = panel;
                let height = panel.height();
                panel.with_column(Series::full_null(SECTOR.into(), height, &DataType::String))?;
                Ok(panel)
            }
        }
    }

    fn apply_policy_filters(&self, panel: DataFrame) -> Result<DataFrame> {
        let mut panel = panel;

        if !self.config.exclude_sectors.is_empty() {
            let before = panel.height();
            let excluded = Series::new(SECTOR.into(), self.config.exclude_sectors.clone());
            panel = panel
                .lazy()
                .filter(
                    col(SECTOR)
                        .is_in(lit(excluded))
                        .not()
                        .or(col(SECTOR).is_null()),
                )
                .collect()?;
            log::debug!(
                "sector exclusion dropped {} rows",
                before - panel.height()
            );
        }

        if let Some(min_days) = self.config.min_days_to_default {
            let before = panel.height();
            panel = panel
                .lazy()
                .filter(col(DAYS_TO_DEFAULT).gt_eq(lit(min_days)))
                .collect()?;
            log::debug!(
                "minimum default distance dropped {} rows",
                before - panel.height()
            );
        }

        Ok(panel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{
        COMPANY_ID, ENTITY_NAME, RATING_ACTION, RATING_DATE, RATING_END_DATE, RATING_SYMBOL,
        UNSOLICITED,
    };

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn identity(rows: &[(&str, &str)]) -> DataFrame {
        let gvkeys: Vec<&str> = rows.iter().map(|r| r.0).collect();
        let companies: Vec<&str> = rows.iter().map(|r| r.1).collect();
        DataFrame::new(vec![
            Series::new(GVKEY.into(), gvkeys).into(),
            Series::new(COMPANY_ID.into(), companies).into(),
        ])
        .unwrap()
    }

    fn events(rows: &[(&str, &str, &str)]) -> DataFrame {
        let companies: Vec<&str> = rows.iter().map(|r| r.0).collect();
        let dates: Vec<NaiveDate> = rows.iter().map(|r| d(r.1)).collect();
        let symbols: Vec<&str> = rows.iter().map(|r| r.2).collect();
        let names: Vec<&str> = rows.iter().map(|_| "ACME CORP").collect();
        let actions: Vec<&str> = rows.iter().map(|_| "Affirmed").collect();
        let unsol: Vec<&str> = rows.iter().map(|_| "N").collect();
        DataFrame::new(vec![
            Series::new(COMPANY_ID.into(), companies).into(),
            Series::new(ENTITY_NAME.into(), names).into(),
            DateChunked::from_naive_date(RATING_DATE.into(), dates)
                .into_series()
                .into(),
            Series::new(RATING_SYMBOL.into(), symbols).into(),
            Series::new(RATING_ACTION.into(), actions).into(),
            Series::new(UNSOLICITED.into(), unsol).into(),
        ])
        .unwrap()
    }

    fn statements(rows: &[(&str, &str, i32, f64)]) -> DataFrame {
        let gvkeys: Vec<&str> = rows.iter().map(|r| r.0).collect();
        let dates: Vec<NaiveDate> = rows.iter().map(|r| d(r.1)).collect();
        let fyears: Vec<i32> = rows.iter().map(|r| r.2).collect();
        let assets: Vec<f64> = rows.iter().map(|r| r.3).collect();
        DataFrame::new(vec![
            Series::new(GVKEY.into(), gvkeys).into(),
            DateChunked::from_naive_date(DATA_DATE.into(), dates)
                .into_series()
                .into(),
            Series::new(FISCAL_YEAR.into(), fyears).into(),
            Series::new("at".into(), assets).into(),
        ])
        .unwrap()
    }

    fn g1_inputs() -> PanelInputs {
        PanelInputs {
            identity: identity(&[("G1", "C1")]),
            events: events(&[("C1", "2010-03-01", "BBB"), ("C1", "2012-06-15", "D")]),
            statements: statements(&[
                ("G1", "2011-01-01", 2010, 100.0),
                ("G1", "2012-02-01", 2011, 110.0),
            ]),
            sectors: None,
        }
    }

    fn strs(df: &DataFrame, name: &str) -> Vec<Option<String>> {
        df.column(name)
            .unwrap()
            .str()
            .unwrap()
            .iter()
            .map(|s| s.map(str::to_string))
            .collect()
    }

    fn dates(df: &DataFrame, name: &str) -> Vec<Option<NaiveDate>> {
        df.column(name)
            .unwrap()
            .date()
            .unwrap()
            .as_date_iter()
            .collect()
    }

    #[test]
    fn test_published_schema_and_labels() {
        let panel = PanelAssembler::default().assemble(g1_inputs()).unwrap();

        assert_eq!(
            panel.get_column_names_str(),
            vec![
                "gvkey",
                "datadate",
                "fyear",
                "at",
                "entity_pname",
                "ratingdate",
                "ratingsymbol",
                "ratingactionword",
                "unsol",
                "ratingenddate",
                "sector",
                "dflt_date",
                "days2dflt",
                "dflt_flag",
            ]
        );
        assert_eq!(panel.height(), 2);
        assert_eq!(
            strs(&panel, RATING_SYMBOL),
            vec![Some("BBB".to_string()), Some("BBB".to_string())]
        );

        let days: Vec<Option<i64>> = panel
            .column(DAYS_TO_DEFAULT)
            .unwrap()
            .i64()
            .unwrap()
            .iter()
            .collect();
        assert_eq!(days, vec![Some(531), Some(135)]);

        let flags: Vec<Option<i32>> = panel
            .column(DEFAULT_FLAG)
            .unwrap()
            .i32()
            .unwrap()
            .iter()
            .collect();
        assert_eq!(flags, vec![Some(0), Some(1)]);
    }

    #[test]
    fn test_override_rewrites_symbol_and_date_only() {
        let inputs = PanelInputs {
            identity: identity(&[("G9", "C9")]),
            events: events(&[("C9", "2015-01-10", "BB"), ("C9", "2015-09-01", "D")]),
            statements: statements(&[("G9", "2015-06-30", 2015, 50.0)]),
            sectors: None,
        };
        let panel = PanelAssembler::default().assemble(inputs).unwrap();

        assert_eq!(panel.height(), 1);
        assert_eq!(strs(&panel, RATING_SYMBOL), vec![Some("D".to_string())]);
        assert_eq!(dates(&panel, RATING_DATE), vec![Some(d("2015-09-01"))]);
        // The interval's end of validity is kept even though the symbol and
        // date were overridden.
        assert_eq!(dates(&panel, RATING_END_DATE), vec![Some(d("2015-09-01"))]);

        let days: Vec<Option<i64>> = panel
            .column(DAYS_TO_DEFAULT)
            .unwrap()
            .i64()
            .unwrap()
            .iter()
            .collect();
        assert_eq!(days, vec![Some(63)]);

        let flags: Vec<Option<i32>> = panel
            .column(DEFAULT_FLAG)
            .unwrap()
            .i32()
            .unwrap()
            .iter()
            .collect();
        assert_eq!(flags, vec![Some(0)]);
    }

    #[test]
    fn test_no_duplicate_issuer_dates() {
        let panel = PanelAssembler::default().assemble(g1_inputs()).unwrap();
        let unique = panel
            .unique_stable(
                Some(&[GVKEY.to_string(), DATA_DATE.to_string()]),
                UniqueKeepStrategy::First,
                None,
            )
            .unwrap();
        assert_eq!(panel.height(), unique.height());
    }

    #[test]
    fn test_sector_attachment_and_exclusion() {
        let sectors = DataFrame::new(vec![
            Series::new(GVKEY.into(), ["G1"]).into(),
            Series::new(SECTOR.into(), ["Financials"]).into(),
        ])
        .unwrap();

        let mut inputs = g1_inputs();
        inputs.sectors = Some(sectors.clone());
        let panel = PanelAssembler::default().assemble(inputs).unwrap();
        assert_eq!(
            strs(&panel, SECTOR),
            vec![Some("Financials".to_string()); 2]
        );

        let mut inputs = g1_inputs();
        inputs.sectors = Some(sectors);
        let config = AssemblerConfig {
            exclude_sectors: vec!["Financials".to_string()],
            ..AssemblerConfig::default()
        };
        let panel = PanelAssembler::new(config).assemble(inputs).unwrap();
        assert_eq!(panel.height(), 0);
    }

    #[test]
    fn test_null_sector_survives_exclusion() {
        let config = AssemblerConfig {
            exclude_sectors: vec!["Financials".to_string()],
            ..AssemblerConfig::default()
        };
        let panel = PanelAssembler::new(config).assemble(g1_inputs()).unwrap();

        assert_eq!(panel.height(), 2);
        assert_eq!(strs(&panel, SECTOR), vec![None, None]);
    }

    #[test]
    fn test_min_days_filter_drops_near_default_rows() {
        let config = AssemblerConfig {
            min_days_to_default: Some(200),
            ..AssemblerConfig::default()
        };
        let panel = PanelAssembler::new(config).assemble(g1_inputs()).unwrap();

        assert_eq!(panel.height(), 1);
        let days: Vec<Option<i64>> = panel
            .column(DAYS_TO_DEFAULT)
            .unwrap()
            .i64()
            .unwrap()
            .iter()
            .collect();
        assert_eq!(days, vec![Some(531)]);
    }

    #[test]
    fn test_uncovered_statements_dropped() {
        let mut inputs = g1_inputs();
        inputs.statements = statements(&[
            ("G1", "2009-06-30", 2009, 90.0),
            ("G1", "2011-01-01", 2010, 100.0),
        ]);
        let panel = PanelAssembler::default().assemble(inputs).unwrap();

        assert_eq!(panel.height(), 1);
        assert_eq!(dates(&panel, DATA_DATE), vec![Some(d("2011-01-01"))]);
    }
}

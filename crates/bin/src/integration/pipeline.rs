//! Panel build pipeline.
//!
//! Sequences the full build: open the snapshot session, fetch the SIC
//! reference tables, link rating events, derive sectors, and assemble the
//! published panel.

use crate::integration::cache_manager;
use chrono::NaiveDate;
use darwin::SectorDeriver;
use darwin::sectors::SectorError;
use darwin_data::{DataError, DataSession, FetchConfig, ReferenceClient, SessionConfig};
use darwin_output::{CoverageRecord, OutputError, missing_statements};
use darwin_panel::schema::GVKEY;
use darwin_panel::{AssemblerConfig, PanelAssembler, PanelError, PanelInputs, events};
use indicatif::ProgressBar;
use polars::prelude::*;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from the end-to-end build pipeline.
#[derive(Debug, Error)]
pub(crate) enum PipelineError {
    #[error("data access failed: {0}")]
    Data(#[from] DataError),

    #[error("panel construction failed: {0}")]
    Panel(#[from] PanelError),

    #[error("sector derivation failed: {0}")]
    Sector(#[from] SectorError),

    #[error("output failed: {0}")]
    Output(#[from] OutputError),

    #[error("dataframe operation failed: {0}")]
    Polars(#[from] PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse config file: {0}")]
    Config(#[from] serde_json::Error),
}

pub(crate) type Result<T> = std::result::Result<T, PipelineError>;

/// Resolved options for one panel build.
#[derive(Debug, Clone)]
pub(crate) struct BuildOptions {
    pub(crate) snapshot_dir: PathBuf,
    pub(crate) exclude_sectors: Vec<String>,
    pub(crate) min_days_to_default: Option<i64>,
    pub(crate) min_rating_date: Option<NaiveDate>,
    pub(crate) use_cache: bool,
    pub(crate) force_refresh: bool,
}

impl BuildOptions {
    pub(crate) fn new(snapshot_dir: PathBuf) -> Self {
        Self {
            snapshot_dir,
            exclude_sectors: Vec::new(),
            min_days_to_default: None,
            min_rating_date: None,
            use_cache: true,
            force_refresh: false,
        }
    }
}

/// Optional JSON config file mirroring the build flags.
///
/// Command-line flags win over file values when both are present.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct BuildConfigFile {
    #[serde(default)]
    pub(crate) exclude_sectors: Vec<String>,
    pub(crate) min_days_to_default: Option<i64>,
    pub(crate) min_rating_date: Option<NaiveDate>,
}

impl BuildConfigFile {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub(crate) fn apply(self, options: &mut BuildOptions) {
        if options.exclude_sectors.is_empty() {
            options.exclude_sectors = self.exclude_sectors;
        }
        if options.min_days_to_default.is_none() {
            options.min_days_to_default = self.min_days_to_default;
        }
        if options.min_rating_date.is_none() {
            options.min_rating_date = self.min_rating_date;
        }
    }
}

/// Run the full panel build.
pub(crate) async fn build_panel(
    options: &BuildOptions,
    progress: Option<&ProgressBar>,
) -> Result<DataFrame> {
    log::info!(
        "building panel from {}",
        options.snapshot_dir.display()
    );

    step(progress, "Loading snapshot tables...");
    let mut session = open_session(options)?;
    let identity = session.issuer_identity()?;
    let rating_events = session.rating_events()?;
    let statements = session.statements()?;
    let company = session.company_info()?;

    step(progress, "Fetching SIC reference tables...");
    let client = ReferenceClient::with_config(FetchConfig {
        use_cache: options.use_cache,
        force_refresh: options.force_refresh,
    })?;
    let reference = client.fetch(session.cache()).await?;

    step(progress, "Linking rating events...");
    let linked = events::link_events(&identity, &rating_events)?;
    let rated_gvkeys = linked.column(GVKEY)?.as_materialized_series().clone();

    step(progress, "Deriving issuer sectors...");
    let deriver = SectorDeriver::new(&reference);
    let sectors = deriver.derive(&company, &rated_gvkeys)?;

    step(progress, "Assembling panel...");
    let assembler = PanelAssembler::new(AssemblerConfig {
        exclude_sectors: options.exclude_sectors.clone(),
        min_days_to_default: options.min_days_to_default,
        ..AssemblerConfig::default()
    });
    let panel = assembler.assemble(PanelInputs {
        identity,
        events: rating_events,
        statements,
        sectors: Some(sectors),
    })?;

    session.close()?;
    Ok(panel)
}

/// Find rated issuers with no statement rows in the snapshot.
pub(crate) fn coverage_records(snapshot_dir: &Path) -> Result<Vec<CoverageRecord>> {
    let config = SessionConfig {
        snapshot_dir: snapshot_dir.to_path_buf(),
        ..SessionConfig::default()
    };
    let mut session = DataSession::open(config)?;

    let identity = session.issuer_identity()?;
    let rating_events = session.rating_events()?;
    let statements = session.statements()?;
    session.close()?;

    let linked = events::link_events(&identity, &rating_events)?;
    Ok(missing_statements(&linked, &statements)?)
}

fn open_session(options: &BuildOptions) -> Result<DataSession> {
    let cache_path = if options.use_cache {
        let path = cache_manager::default_cache_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Some(path)
    } else {
        None
    };

    let config = SessionConfig {
        snapshot_dir: options.snapshot_dir.clone(),
        cache_path,
        min_rating_date: options.min_rating_date,
    };
    Ok(DataSession::open(config)?)
}

fn step(progress: Option<&ProgressBar>, message: &'static str) {
    if let Some(pb) = progress {
        pb.set_message(message);
        pb.inc(1);
    }
}

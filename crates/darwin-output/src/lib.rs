#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/darwin/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod coverage;
pub mod error;
pub mod export;
pub mod summary;

pub use coverage::{COVERAGE_FILE_NAME, CoverageRecord, missing_statements, write_coverage_report};
pub use error::{OutputError, Result};
pub use export::{ExportFormat, write_panel};
pub use summary::{PanelSummary, YearBreakdown};

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/darwin/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod sectors;
pub mod taxonomy;

// Re-export main types from sub-crates
pub use darwin_data as data;
pub use darwin_output as output;
pub use darwin_panel as panel;

// Re-export common vocabulary types
pub use darwin_panel::RatingSymbol;
pub use sectors::SectorDeriver;
pub use taxonomy::{gics::GicsSector, sector::Sector};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/darwin/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cache;
pub mod error;
pub mod reference;
pub mod session;
pub mod store;

pub use cache::{CacheStats, SqliteCache};
pub use error::{DataError, Result};
pub use reference::{FetchConfig, ReferenceClient, ReferenceTables};
pub use session::{DataSession, SessionConfig};
pub use store::{Dataset, SnapshotStore};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/darwin/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod asof;
pub mod assemble;
pub mod error;
pub mod events;
pub mod intervals;
pub mod label;
pub mod overrides;
pub mod rating;
pub mod schema;

pub use asof::AsOfJoiner;
pub use assemble::{AssemblerConfig, PanelAssembler, PanelInputs};
pub use error::{PanelError, Result};
pub use intervals::IntervalBuilder;
pub use label::{HorizonConfig, HorizonLabeler};
pub use overrides::OverrideResolver;
pub use rating::RatingSymbol;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}

//! Integration layer wiring the data, sector, panel and output crates into
//! the CLI subcommands.

pub(crate) mod cache_manager;
pub(crate) mod pipeline;

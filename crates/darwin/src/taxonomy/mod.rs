//! Sector taxonomies.
//!
//! Two vocabularies meet in sector derivation: the GICS Level 1 sectors the
//! provider tags companies with, and the normalized taxonomy the panel
//! publishes.

pub mod gics;
pub mod sector;

pub use gics::GicsSector;
pub use sector::Sector;

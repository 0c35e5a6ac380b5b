//! Normalized sector taxonomy published on the panel.
//!
//! GICS sectors and SIC divisions are folded into this single vocabulary so
//! downstream models see one consistent `sector` column regardless of which
//! classification a given issuer carried.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A normalized panel sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sector {
    /// Manufacturing (absorbs GICS Industrials and Materials, SIC Mining)
    Manufacturing,

    /// Financials (absorbs Insurance and Real Estate)
    Financials,

    /// Utilities (absorbs GICS Energy and SIC Public Administration)
    Utilities,

    /// Transportation
    Transportation,

    /// Services (absorbs GICS Communication Services)
    Services,

    /// Construction
    Construction,

    /// Agriculture, forestry and fishing
    Agriculture,

    /// Wholesale trade
    Wholesale,

    /// Retail trade
    Retail,

    /// Information technology
    InformationTechnology,

    /// Health care
    Health,
}

impl Sector {
    /// Returns all normalized sectors.
    pub fn all() -> Vec<Self> {
        vec![
            Self::Manufacturing,
            Self::Financials,
            Self::Utilities,
            Self::Transportation,
            Self::Services,
            Self::Construction,
            Self::Agriculture,
            Self::Wholesale,
            Self::Retail,
            Self::InformationTechnology,
            Self::Health,
        ]
    }

    /// Returns the name used in the panel's `sector` column.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Manufacturing => "Manufacturing",
            Self::Financials => "Financials",
            Self::Utilities => "Utilities",
            Self::Transportation => "Transportation",
            Self::Services => "Services",
            Self::Construction => "Construction",
            Self::Agriculture => "Agriculture",
            Self::Wholesale => "Wholesale",
            Self::Retail => "Retail",
            Self::InformationTechnology => "Information Technology",
            Self::Health => "Health",
        }
    }

    /// Parse a sector from its panel name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Manufacturing" => Some(Self::Manufacturing),
            "Financials" => Some(Self::Financials),
            "Utilities" => Some(Self::Utilities),
            "Transportation" => Some(Self::Transportation),
            "Services" => Some(Self::Services),
            "Construction" => Some(Self::Construction),
            "Agriculture" => Some(Self::Agriculture),
            "Wholesale" => Some(Self::Wholesale),
            "Retail" => Some(Self::Retail),
            "Information Technology" => Some(Self::InformationTechnology),
            "Health" => Some(Self::Health),
            _ => None,
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

//! GICS (Global Industry Classification Standard) sector definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// GICS Level 1 sectors (11 sectors).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GicsSector {
    /// Energy
    Energy,

    /// Materials
    Materials,

    /// Industrials
    Industrials,

    /// Consumer Discretionary
    ConsumerDiscretionary,

    /// Consumer Staples
    ConsumerStaples,

    /// Health Care
    HealthCare,

    /// Financials
    Financials,

    /// Information Technology
    InformationTechnology,

    /// Communication Services
    CommunicationServices,

    /// Utilities
    Utilities,

    /// Real Estate
    RealEstate,
}

impl GicsSector {
    /// Returns all GICS sectors in code order.
    pub fn all() -> Vec<Self> {
        vec![
            Self::Energy,
            Self::Materials,
            Self::Industrials,
            Self::ConsumerDiscretionary,
            Self::ConsumerStaples,
            Self::HealthCare,
            Self::Financials,
            Self::InformationTechnology,
            Self::CommunicationServices,
            Self::Utilities,
            Self::RealEstate,
        ]
    }

    /// Returns the sector code (2-digit).
    pub const fn code(&self) -> u8 {
        match self {
            Self::Energy => 10,
            Self::Materials => 15,
            Self::Industrials => 20,
            Self::ConsumerDiscretionary => 25,
            Self::ConsumerStaples => 30,
            Self::HealthCare => 35,
            Self::Financials => 40,
            Self::InformationTechnology => 45,
            Self::CommunicationServices => 50,
            Self::Utilities => 55,
            Self::RealEstate => 60,
        }
    }

    /// Returns the full sector name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Energy => "Energy",
            Self::Materials => "Materials",
            Self::Industrials => "Industrials",
            Self::ConsumerDiscretionary => "Consumer Discretionary",
            Self::ConsumerStaples => "Consumer Staples",
            Self::HealthCare => "Health Care",
            Self::Financials => "Financials",
            Self::InformationTechnology => "Information Technology",
            Self::CommunicationServices => "Communication Services",
            Self::Utilities => "Utilities",
            Self::RealEstate => "Real Estate",
        }
    }

    /// Parse a sector from its code.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            10 => Some(Self::Energy),
            15 => Some(Self::Materials),
            20 => Some(Self::Industrials),
            25 => Some(Self::ConsumerDiscretionary),
            30 => Some(Self::ConsumerStaples),
            35 => Some(Self::HealthCare),
            40 => Some(Self::Financials),
            45 => Some(Self::InformationTechnology),
            50 => Some(Self::CommunicationServices),
            55 => Some(Self::Utilities),
            60 => Some(Self::RealEstate),
            _ => None,
        }
    }

    /// Parse a sector from the provider's `gsector` string.
    pub fn from_code_str(code: &str) -> Option<Self> {
        code.trim().parse::<u8>().ok().and_then(Self::from_code)
    }
}

impl fmt::Display for GicsSector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_sectors() {
        let sectors = GicsSector::all();
        assert_eq!(sectors.len(), 11);
    }

    #[test]
    fn test_sector_codes() {
        assert_eq!(GicsSector::Energy.code(), 10);
        assert_eq!(GicsSector::InformationTechnology.code(), 45);
        assert_eq!(GicsSector::RealEstate.code(), 60);
    }

    #[test]
    fn test_from_code() {
        assert_eq!(
            GicsSector::from_code(45),
            Some(GicsSector::InformationTechnology)
        );
        assert_eq!(GicsSector::from_code(10), Some(GicsSector::Energy));
        assert_eq!(GicsSector::from_code(99), None);
    }

    #[test]
    fn test_from_code_str() {
        assert_eq!(GicsSector::from_code_str("20"), Some(GicsSector::Industrials));
        assert_eq!(GicsSector::from_code_str("60"), Some(GicsSector::RealEstate));
        assert_eq!(GicsSector::from_code_str(""), None);
        assert_eq!(GicsSector::from_code_str("not-a-code"), None);
    }

    #[test]
    fn test_roundtrip() {
        for sector in GicsSector::all() {
            assert_eq!(GicsSector::from_code(sector.code()), Some(sector));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(
            format!("{}", GicsSector::InformationTechnology),
            "Information Technology"
        );
        assert_eq!(format!("{}", GicsSector::Energy), "Energy");
    }
}

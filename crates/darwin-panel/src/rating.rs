//! Credit rating grade definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Long-term issuer credit rating symbols (25 grades).
///
/// Ordered from the strongest grade down to the default-class grades, with
/// the two non-opinion symbols (`NR`, `R`) last. `R` marks an issuer under
/// regulatory supervision and is treated as default-class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RatingSymbol {
    /// AAA
    Aaa,

    /// AA+
    AaPlus,

    /// AA
    Aa,

    /// AA-
    AaMinus,

    /// A+
    APlus,

    /// A
    A,

    /// A-
    AMinus,

    /// BBB+
    BbbPlus,

    /// BBB
    Bbb,

    /// BBB-
    BbbMinus,

    /// BB+
    BbPlus,

    /// BB
    Bb,

    /// BB-
    BbMinus,

    /// B+
    BPlus,

    /// B
    B,

    /// B-
    BMinus,

    /// CCC+
    CccPlus,

    /// CCC
    Ccc,

    /// CCC-
    CccMinus,

    /// CC
    Cc,

    /// C
    C,

    /// D (default)
    D,

    /// SD (selective default)
    Sd,

    /// NR (not rated)
    Nr,

    /// R (regulatory supervision)
    R,
}

impl RatingSymbol {
    /// Returns all rating symbols in grade order.
    pub fn all() -> Vec<Self> {
        vec![
            Self::Aaa,
            Self::AaPlus,
            Self::Aa,
            Self::AaMinus,
            Self::APlus,
            Self::A,
            Self::AMinus,
            Self::BbbPlus,
            Self::Bbb,
            Self::BbbMinus,
            Self::BbPlus,
            Self::Bb,
            Self::BbMinus,
            Self::BPlus,
            Self::B,
            Self::BMinus,
            Self::CccPlus,
            Self::Ccc,
            Self::CccMinus,
            Self::Cc,
            Self::C,
            Self::D,
            Self::Sd,
            Self::Nr,
            Self::R,
        ]
    }

    /// The default-class grades.
    pub const fn default_class() -> [Self; 3] {
        [Self::D, Self::Sd, Self::R]
    }

    /// Returns the symbol as the provider spells it.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Aaa => "AAA",
            Self::AaPlus => "AA+",
            Self::Aa => "AA",
            Self::AaMinus => "AA-",
            Self::APlus => "A+",
            Self::A => "A",
            Self::AMinus => "A-",
            Self::BbbPlus => "BBB+",
            Self::Bbb => "BBB",
            Self::BbbMinus => "BBB-",
            Self::BbPlus => "BB+",
            Self::Bb => "BB",
            Self::BbMinus => "BB-",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::BMinus => "B-",
            Self::CccPlus => "CCC+",
            Self::Ccc => "CCC",
            Self::CccMinus => "CCC-",
            Self::Cc => "CC",
            Self::C => "C",
            Self::D => "D",
            Self::Sd => "SD",
            Self::Nr => "NR",
            Self::R => "R",
        }
    }

    /// Parse a symbol from the provider spelling.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "AAA" => Some(Self::Aaa),
            "AA+" => Some(Self::AaPlus),
            "AA" => Some(Self::Aa),
            "AA-" => Some(Self::AaMinus),
            "A+" => Some(Self::APlus),
            "A" => Some(Self::A),
            "A-" => Some(Self::AMinus),
            "BBB+" => Some(Self::BbbPlus),
            "BBB" => Some(Self::Bbb),
            "BBB-" => Some(Self::BbbMinus),
            "BB+" => Some(Self::BbPlus),
            "BB" => Some(Self::Bb),
            "BB-" => Some(Self::BbMinus),
            "B+" => Some(Self::BPlus),
            "B" => Some(Self::B),
            "B-" => Some(Self::BMinus),
            "CCC+" => Some(Self::CccPlus),
            "CCC" => Some(Self::Ccc),
            "CCC-" => Some(Self::CccMinus),
            "CC" => Some(Self::Cc),
            "C" => Some(Self::C),
            "D" => Some(Self::D),
            "SD" => Some(Self::Sd),
            "NR" => Some(Self::Nr),
            "R" => Some(Self::R),
            _ => None,
        }
    }

    /// Whether this grade denotes default, selective default, or regulatory
    /// supervision.
    pub const fn is_default_class(&self) -> bool {
        matches!(self, Self::D | Self::Sd | Self::R)
    }

    /// Whether this grade is investment grade (BBB- or better).
    pub const fn is_investment_grade(&self) -> bool {
        matches!(
            self,
            Self::Aaa
                | Self::AaPlus
                | Self::Aa
                | Self::AaMinus
                | Self::APlus
                | Self::A
                | Self::AMinus
                | Self::BbbPlus
                | Self::Bbb
                | Self::BbbMinus
        )
    }

    /// Ordinal rank of the grade, 0 = AAA through 24 = R.
    pub const fn rank(&self) -> u8 {
        match self {
            Self::Aaa => 0,
            Self::AaPlus => 1,
            Self::Aa => 2,
            Self::AaMinus => 3,
            Self::APlus => 4,
            Self::A => 5,
            Self::AMinus => 6,
            Self::BbbPlus => 7,
            Self::Bbb => 8,
            Self::BbbMinus => 9,
            Self::BbPlus => 10,
            Self::Bb => 11,
            Self::BbMinus => 12,
            Self::BPlus => 13,
            Self::B => 14,
            Self::BMinus => 15,
            Self::CccPlus => 16,
            Self::Ccc => 17,
            Self::CccMinus => 18,
            Self::Cc => 19,
            Self::C => 20,
            Self::D => 21,
            Self::Sd => 22,
            Self::Nr => 23,
            Self::R => 24,
        }
    }
}

impl fmt::Display for RatingSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

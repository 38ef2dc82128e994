//! Symbolic settings and their driver-native codes
//!
//! Each vocabulary is a closed, ordered table of `(variant, name, code)`
//! triples. Lookups in either direction walk the table; anything outside it
//! is rejected with [`CatalogError::InvalidValue`].
//!
//! | Vocabulary     | Names                                                   |
//! |----------------|---------------------------------------------------------|
//! | Mode           | AUTO ADHOC INFRA MASTER REPEAT SECOND MONITOR           |
//! | FunctionalMode | RFMON INJECT INJMON                                     |
//! | Modulation     | DEFAULT FHSS DSSS OFDM TURBO MIMO MIMOGF                |
//! | TxRate         | DEFAULT 1 2 5.5 6 9 11 24 36 48 108                     |

use std::fmt;
use std::str::FromStr;

use crate::error::{CatalogError, Vocabulary};

/// A member of one of the closed symbolic vocabularies
pub trait Symbolic: Copy + Eq + 'static {
    /// Which vocabulary this type belongs to
    const VOCABULARY: Vocabulary;

    /// Every member, in canonical order
    const ALL: &'static [Self];

    /// Canonical symbolic name
    fn name(self) -> &'static str;

    /// Driver-native code
    fn code(self) -> i32;

    /// Decode a driver-native code
    fn from_code(code: i32) -> Result<Self, CatalogError> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.code() == code)
            .ok_or_else(|| CatalogError::invalid(Self::VOCABULARY, code))
    }

    /// Look up a member by its canonical name (exact, case-sensitive)
    fn from_name(name: &str) -> Result<Self, CatalogError> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.name() == name)
            .ok_or_else(|| CatalogError::invalid(Self::VOCABULARY, format!("{:?}", name)))
    }
}

/// Declares a vocabulary enum together with its name/code table
macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $ty:ident => $vocab:ident {
            $( $(#[$vmeta:meta])* $variant:ident = ($sym:literal, $code:expr), )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum $ty {
            $(
                $(#[$vmeta])*
                #[cfg_attr(feature = "serde", serde(rename = $sym))]
                $variant,
            )+
        }

        impl Symbolic for $ty {
            const VOCABULARY: Vocabulary = Vocabulary::$vocab;
            const ALL: &'static [Self] = &[$($ty::$variant),+];

            fn name(self) -> &'static str {
                match self {
                    $($ty::$variant => $sym,)+
                }
            }

            fn code(self) -> i32 {
                match self {
                    $($ty::$variant => $code,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $ty {
            type Err = CatalogError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty as Symbolic>::from_name(s)
            }
        }

        impl TryFrom<&str> for $ty {
            type Error = CatalogError;

            fn try_from(s: &str) -> Result<Self, Self::Error> {
                <$ty as Symbolic>::from_name(s)
            }
        }

        impl TryFrom<&String> for $ty {
            type Error = CatalogError;

            fn try_from(s: &String) -> Result<Self, Self::Error> {
                <$ty as Symbolic>::from_name(s)
            }
        }
    };
}

vocabulary! {
    /// Interface operating mode
    Mode => Mode {
        /// Driver picks the mode
        Auto = ("AUTO", 0),
        /// Ad-hoc (IBSS)
        Adhoc = ("ADHOC", 1),
        /// Managed/infrastructure station
        Infra = ("INFRA", 2),
        /// Access point
        Master = ("MASTER", 3),
        /// Wireless repeater
        Repeat = ("REPEAT", 4),
        /// Secondary/backup repeater
        Second = ("SECOND", 5),
        /// Passive monitor (rfmon)
        Monitor = ("MONITOR", 6),
    }
}

vocabulary! {
    /// What the adapter is configured to do with raw frames
    FunctionalMode => FunctionalMode {
        /// Monitor only
        Rfmon = ("RFMON", 1),
        /// Inject only
        Inject = ("INJECT", 2),
        /// Monitor and inject
        Injmon = ("INJMON", 3),
    }
}

vocabulary! {
    /// Transmit modulation
    Modulation => Modulation {
        Default = ("DEFAULT", 0),
        Fhss = ("FHSS", 1),
        Dsss = ("DSSS", 2),
        Ofdm = ("OFDM", 4),
        Turbo = ("TURBO", 8),
        Mimo = ("MIMO", 16),
        /// MIMO greenfield
        MimoGf = ("MIMOGF", 32),
    }
}

vocabulary! {
    /// Transmit rate
    ///
    /// Native codes are in 500 kb/s units; `Default` asks the driver to pick.
    TxRate => TxRate {
        Default = ("DEFAULT", 0),
        Mbps1 = ("1", 2),
        Mbps2 = ("2", 4),
        Mbps5_5 = ("5.5", 11),
        Mbps6 = ("6", 12),
        Mbps9 = ("9", 18),
        Mbps11 = ("11", 22),
        Mbps24 = ("24", 48),
        Mbps36 = ("36", 72),
        Mbps48 = ("48", 96),
        Mbps108 = ("108", 216),
    }
}

impl TxRate {
    /// Rate in Mb/s as reported to callers; `Default` reports `0`
    pub fn mbps(self) -> f64 {
        f64::from(self.code()) / 2.0
    }

    /// Encode a caller-supplied rate
    ///
    /// `None` selects the driver default. Any other value must match one of
    /// the fixed rates exactly; there is no rounding to the nearest rate and
    /// an explicit `0` is rejected.
    pub fn from_mbps(mbps: Option<f64>) -> Result<Self, CatalogError> {
        let Some(mbps) = mbps else {
            return Ok(TxRate::Default);
        };

        Self::ALL
            .iter()
            .copied()
            .filter(|r| *r != TxRate::Default)
            .find(|r| r.mbps() == mbps)
            .ok_or_else(|| CatalogError::invalid(Vocabulary::TxRate, mbps))
    }
}

/// Decode a native code to its canonical name in the given vocabulary
pub fn decode(vocabulary: Vocabulary, code: i32) -> Result<&'static str, CatalogError> {
    match vocabulary {
        Vocabulary::Mode => Mode::from_code(code).map(Symbolic::name),
        Vocabulary::FunctionalMode => FunctionalMode::from_code(code).map(Symbolic::name),
        Vocabulary::Modulation => Modulation::from_code(code).map(Symbolic::name),
        Vocabulary::TxRate => TxRate::from_code(code).map(Symbolic::name),
        Vocabulary::Capability => crate::capability::CapabilityFlags::from_bits(code as u32)
            .single_name()
            .ok_or_else(|| CatalogError::invalid(vocabulary, code)),
    }
}

/// Encode a canonical name to its native code in the given vocabulary
pub fn encode(vocabulary: Vocabulary, name: &str) -> Result<i32, CatalogError> {
    match vocabulary {
        Vocabulary::Mode => Mode::from_name(name).map(Symbolic::code),
        Vocabulary::FunctionalMode => FunctionalMode::from_name(name).map(Symbolic::code),
        Vocabulary::Modulation => Modulation::from_name(name).map(Symbolic::code),
        Vocabulary::TxRate => TxRate::from_name(name).map(Symbolic::code),
        Vocabulary::Capability => {
            crate::capability::CapabilityFlags::from_name(name).map(|f| f.bits() as i32)
        }
    }
}

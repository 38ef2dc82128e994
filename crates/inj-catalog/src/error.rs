//! Error types for catalog lookups

use std::fmt;

use thiserror::Error;
use tracing::trace;

/// The closed vocabularies known to the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vocabulary {
    /// Interface operating mode (AUTO, MONITOR, ...)
    Mode,
    /// Functional mode (RFMON, INJECT, INJMON)
    FunctionalMode,
    /// Transmit modulation (DSSS, OFDM, ...)
    Modulation,
    /// Transmit rate in Mb/s
    TxRate,
    /// Capability flag bits
    Capability,
}

impl Vocabulary {
    /// Human-readable vocabulary name used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            Vocabulary::Mode => "mode",
            Vocabulary::FunctionalMode => "functional mode",
            Vocabulary::Modulation => "modulation",
            Vocabulary::TxRate => "tx rate",
            Vocabulary::Capability => "capability",
        }
    }
}

impl fmt::Display for Vocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors that can occur while translating between names and native codes
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Name, number or native code is not a member of the vocabulary
    #[error("invalid {vocabulary}: {value}")]
    InvalidValue {
        vocabulary: Vocabulary,
        value: String,
    },
}

impl CatalogError {
    pub(crate) fn invalid(vocabulary: Vocabulary, value: impl fmt::Display) -> Self {
        trace!("Rejected {} value {}", vocabulary, value);
        CatalogError::InvalidValue {
            vocabulary,
            value: value.to_string(),
        }
    }

    /// The vocabulary the rejected value was looked up in
    pub fn vocabulary(&self) -> Vocabulary {
        match self {
            CatalogError::InvalidValue { vocabulary, .. } => *vocabulary,
        }
    }
}

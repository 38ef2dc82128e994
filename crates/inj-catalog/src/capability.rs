//! Capability flags reported by the driver
//!
//! The driver hands back a bit set describing which optional operations an
//! adapter/driver pair supports. The session never synthesizes these; it
//! only tests membership before capability-gated calls.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use crate::error::{CatalogError, Vocabulary};

/// Driver-reported capability bit set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<String>", into = "Vec<String>")
)]
pub struct CapabilityFlags(u32);

impl CapabilityFlags {
    /// Explicit empty set
    pub const NONE: Self = Self(0x0000_0000);
    pub const SNIFF: Self = Self(0x0000_0001);
    pub const TRANSMIT: Self = Self(0x0000_0002);
    /// Sequence number control
    pub const SEQ: Self = Self(0x0000_0004);
    /// BSS timestamp control
    pub const BSSTIME: Self = Self(0x0000_0008);
    pub const FRAG: Self = Self(0x0000_0010);
    /// Control frame injection
    pub const CTRL: Self = Self(0x0000_0020);
    /// Duration/ID field control
    pub const DURID: Self = Self(0x0000_0040);
    pub const SNIFFACK: Self = Self(0x0000_0080);
    pub const SELFACK: Self = Self(0x0000_0100);
    pub const TXNOWAIT: Self = Self(0x0000_0200);
    pub const DSSSTX: Self = Self(0x0000_0400);
    pub const OFDMTX: Self = Self(0x0000_0800);
    pub const MIMOTX: Self = Self(0x0000_1000);
    /// Transmit rate can be changed
    pub const SETRATE: Self = Self(0x0000_2000);
    /// Transmit modulation can be changed
    pub const SETMODULATION: Self = Self(0x0000_4000);

    /// Bit vocabulary in its fixed reporting order
    pub const NAMED: [(Self, &'static str); 16] = [
        (Self::SNIFF, "SNIFF"),
        (Self::TRANSMIT, "TRANSMIT"),
        (Self::SEQ, "SEQ"),
        (Self::BSSTIME, "BSSTIME"),
        (Self::FRAG, "FRAG"),
        (Self::CTRL, "CTRL"),
        (Self::DURID, "DURID"),
        (Self::SNIFFACK, "SNIFFACK"),
        (Self::SELFACK, "SELFACK"),
        (Self::TXNOWAIT, "TXNOWAIT"),
        (Self::DSSSTX, "DSSSTX"),
        (Self::OFDMTX, "OFDMTX"),
        (Self::MIMOTX, "MIMOTX"),
        (Self::SETRATE, "SETRATE"),
        (Self::SETMODULATION, "SETMODULATION"),
        (Self::NONE, "NONE"),
    ];

    /// Wrap raw driver bits
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw driver bits
    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Tests a single bit
    ///
    /// Uses intersection, so `NONE` is never "present" in any set.
    pub const fn has(self, bit: Self) -> bool {
        self.0 & bit.0 != 0
    }

    /// Names of the set bits, in [`Self::NAMED`] order
    pub fn names(self) -> Vec<&'static str> {
        Self::NAMED
            .iter()
            .filter(|(bit, _)| self.has(*bit))
            .map(|(_, name)| *name)
            .collect()
    }

    /// Look up a single bit by name
    pub fn from_name(name: &str) -> Result<Self, CatalogError> {
        Self::NAMED
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(bit, _)| *bit)
            .ok_or_else(|| CatalogError::invalid(Vocabulary::Capability, format!("{:?}", name)))
    }

    /// Build a set from bit names
    pub fn from_names<I, S>(names: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .try_fold(Self::NONE, |acc, name| Ok(acc | Self::from_name(name.as_ref())?))
    }

    /// Name of this value when it is exactly one named bit (or `NONE`)
    pub fn single_name(self) -> Option<&'static str> {
        Self::NAMED
            .iter()
            .find(|(bit, _)| *bit == self)
            .map(|(_, name)| *name)
    }
}

/// Names of the set bits of `flags`, in fixed vocabulary order
pub fn flags_to_names(flags: CapabilityFlags) -> Vec<&'static str> {
    flags.names()
}

/// Whether `flags` has `bit` set
pub fn has_capability(flags: CapabilityFlags, bit: CapabilityFlags) -> bool {
    flags.has(bit)
}

impl BitOr for CapabilityFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for CapabilityFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for CapabilityFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Display for CapabilityFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("NONE");
        }
        f.write_str(&self.names().join("|"))
    }
}

impl TryFrom<Vec<String>> for CapabilityFlags {
    type Error = CatalogError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_names(names)
    }
}

impl From<CapabilityFlags> for Vec<String> {
    fn from(flags: CapabilityFlags) -> Self {
        flags.names().into_iter().map(String::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_follow_fixed_order() {
        let flags = CapabilityFlags::SETMODULATION
            | CapabilityFlags::SNIFF
            | CapabilityFlags::SETRATE
            | CapabilityFlags::TRANSMIT;
        assert_eq!(
            flags_to_names(flags),
            vec!["SNIFF", "TRANSMIT", "SETRATE", "SETMODULATION"]
        );
    }

    #[test]
    fn test_empty_set_has_no_names() {
        assert!(flags_to_names(CapabilityFlags::NONE).is_empty());
        assert_eq!(CapabilityFlags::NONE.to_string(), "NONE");
    }

    #[test]
    fn test_unnamed_bits_ignored() {
        let flags = CapabilityFlags::from_bits(0x8000_0000 | 0x0000_0002);
        assert_eq!(flags.names(), vec!["TRANSMIT"]);
    }

    #[test]
    fn test_has_capability() {
        let flags = CapabilityFlags::SETRATE | CapabilityFlags::TRANSMIT;
        assert!(has_capability(flags, CapabilityFlags::SETRATE));
        assert!(!has_capability(flags, CapabilityFlags::SETMODULATION));
        assert!(!has_capability(flags, CapabilityFlags::NONE));
    }

    #[test]
    fn test_from_names() {
        let flags = CapabilityFlags::from_names(["SETRATE", "SNIFF"]).unwrap();
        assert_eq!(flags, CapabilityFlags::SETRATE | CapabilityFlags::SNIFF);
        assert!(CapabilityFlags::from_names(["SETRATE", "WARP"]).is_err());
        assert_eq!(
            CapabilityFlags::from_names(Vec::<String>::new()),
            Ok(CapabilityFlags::NONE)
        );
    }

    #[test]
    fn test_all_bits_distinct() {
        let all = CapabilityFlags::NAMED
            .iter()
            .fold(CapabilityFlags::NONE, |acc, (bit, _)| acc | *bit);
        assert_eq!(all.names().len(), 15);
        assert_eq!(all.bits(), 0x7FFF);
    }
}

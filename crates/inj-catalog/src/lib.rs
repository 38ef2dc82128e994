//! Capability Catalog
//!
//! Static tables shared by every layer that talks to an 802.11 injection
//! driver:
//!
//! - **Vocabularies**: bidirectional name/native-code tables for mode,
//!   functional mode, modulation and transmit rate
//! - **Capability flags**: the driver-reported bit set and its fixed naming
//!   order
//! - **Driver contract**: the [`Driver`] trait the session layer consumes
//!
//! # Example
//!
//! ```rust
//! use inj_catalog::{decode, encode, Mode, Symbolic, TxRate, Vocabulary};
//!
//! assert_eq!(encode(Vocabulary::Mode, "MONITOR").unwrap(), 6);
//! assert_eq!(decode(Vocabulary::Modulation, 4).unwrap(), "OFDM");
//!
//! let mode: Mode = "INFRA".parse().unwrap();
//! assert_eq!(Mode::from_code(mode.code()).unwrap(), Mode::Infra);
//!
//! // Omitted rate means "driver default", reported back as 0
//! assert_eq!(TxRate::from_mbps(None).unwrap().mbps(), 0.0);
//! ```

pub mod capability;
pub mod driver;
pub mod error;
pub mod vocab;

pub use capability::{flags_to_names, has_capability, CapabilityFlags};
pub use driver::{Driver, DriverFault, DriverType, RawCard, Status};
pub use error::{CatalogError, Vocabulary};
pub use vocab::{decode, encode, FunctionalMode, Mode, Modulation, Symbolic, TxRate};

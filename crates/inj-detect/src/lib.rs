//! Injection Card Detection Library
//!
//! This crate lists the wireless adapters an injection driver library
//! supports, with their capability names.
//!
//! # Example
//!
//! ```rust
//! use inj_detect::CardDirectory;
//! use inj_sim::SimDriver;
//!
//! let driver = SimDriver::new();
//! let directory = CardDirectory::new(&driver);
//!
//! for card in directory.supported_drivers() {
//!     println!("{} - {} [{}]", card.name, card.description, card.capabilities.join(", "));
//! }
//! ```

pub mod directory;

pub use directory::{CardDirectory, CardEntry, NO_DRIVER_NAME};

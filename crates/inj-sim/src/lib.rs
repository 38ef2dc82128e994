//! Injection Driver Simulation Library
//!
//! This crate provides an in-process implementation of the
//! [`inj_catalog::Driver`] contract so sessions can be exercised without
//! an adapter:
//!
//! - **SimDriver**: resolves the `mock` drivers, tracks mode/channel/rate/
//!   modulation per context and records every transmitted frame
//! - **SimDriverConfig**: serde-loadable card list, initial state and
//!   enumeration behavior
//!
//! Every clone of a [`SimDriver`] shares one call ledger, so a test can hand
//! one clone to a session and keep another to inspect what the session did.
//!
//! # Example
//!
//! ```rust
//! use inj_catalog::{Driver, DriverType};
//! use inj_sim::{SimDriver, SimOp};
//!
//! let driver = SimDriver::new();
//! let probe = driver.clone();
//!
//! let kind = driver.resolve("mock");
//! assert_ne!(kind, DriverType::NO_DRIVER);
//!
//! let mut ctx = driver.new_context();
//! driver.init_context(&mut ctx, "wlan0mock", kind).unwrap();
//! driver.open_context(&mut ctx).unwrap();
//!
//! assert_eq!(probe.calls(SimOp::OpenContext), 1);
//! ```

pub mod config;
pub mod driver;

pub use config::{SimCardConfig, SimConfigError, SimDriverConfig};
pub use driver::{SimContext, SimDriver, SimOp, SimPacket};

//! Injection Device Session
//!
//! This crate provides the stateful handle over one 802.11 injection
//! adapter. A [`DeviceSession`] owns the driver context and packet context
//! for its adapter and exposes the configuration and transmit operations.
//!
//! # Lifecycle
//!
//! - **Unopened**: constructed, no driver resolved
//! - **Open**: driver resolved, context initialized and opened, packet
//!   context ready; every operation is available
//! - **Closed**: driver context released; every operation fails with
//!   [`SessionError::InvalidState`]
//!
//! Release happens exactly once, on explicit [`DeviceSession::close`] or on
//! drop, whichever comes first.
//!
//! # Capability gating
//!
//! `set_tx_rate` and `set_modulation` check the `SETRATE` and
//! `SETMODULATION` bits captured at open before touching the driver.
//!
//! # Example
//!
//! ```rust
//! use inj_catalog::{Mode, Modulation};
//! use inj_session::DeviceSession;
//! use inj_sim::SimDriver;
//!
//! let mut session = DeviceSession::open(SimDriver::new(), "wlan0mock", "mock").unwrap();
//!
//! session.set_functional_mode("INJECT").unwrap();
//! session.set_channel(6).unwrap();
//! session.set_modulation(Modulation::Dsss).unwrap();
//! session.set_tx_rate(2.0).unwrap();
//! session.transmit(b"\x08\x41\x0a\x00").unwrap();
//!
//! assert_eq!(session.tx_rate().unwrap().mbps(), 2.0);
//! session.set_mode(Mode::Monitor).unwrap();
//! ```

pub mod error;
pub mod session;
pub mod state;

pub use error::{Result, SessionError};
pub use session::DeviceSession;
pub use state::SessionState;

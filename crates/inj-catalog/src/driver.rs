//! Driver contract
//!
//! The radio/driver layer that performs card discovery, register
//! programming and frame I/O lives outside this workspace. [`Driver`] is the
//! fixed call contract the session layer consumes. All values crossing it
//! are driver-native codes; translation to symbolic names happens in the
//! session via the catalog.
//!
//! Fallible primitives return a [`Status`]. On failure the diagnostic text is
//! read with [`Driver::error_string`] immediately afterwards, mirroring how
//! the underlying driver libraries keep a last-error buffer per context.

use std::fmt;

use crate::capability::CapabilityFlags;

/// Native driver-type code, as produced by [`Driver::resolve`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DriverType(pub i32);

impl DriverType {
    /// Sentinel for "name did not resolve to any driver"
    pub const NO_DRIVER: Self = Self(0);

    pub fn is_none(self) -> bool {
        self == Self::NO_DRIVER
    }
}

impl fmt::Display for DriverType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Marker returned by a failing driver primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverFault;

/// Outcome of a fallible driver primitive
pub type Status = Result<(), DriverFault>;

/// One card as reported by the driver's card list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCard {
    /// Driver name, usable with [`Driver::resolve`]
    pub name: String,
    /// Human description
    pub description: String,
    /// Capabilities of this adapter/driver pair
    pub capabilities: CapabilityFlags,
}

/// The driver collaborator surface
///
/// `Context` is the per-adapter driver handle and `Packet` the per-session
/// transmit state (current rate and modulation). Both are owned by exactly
/// one session; the driver itself only borrows them for the duration of a
/// call.
pub trait Driver {
    /// Opaque driver context
    type Context;
    /// Opaque packet-transmission context
    type Packet;

    /// Driver library version, `YYYYMMRR`
    fn version(&self) -> i32;

    /// Cards the driver layer knows how to support, or `None` if the list
    /// could not be produced
    fn card_list(&self) -> Option<Vec<RawCard>>;

    /// Resolve a driver name; unknown names yield [`DriverType::NO_DRIVER`]
    fn resolve(&self, name: &str) -> DriverType;

    /// Allocate a blank driver context
    fn new_context(&self) -> Self::Context;

    /// Bind a context to an interface and driver type
    fn init_context(&self, ctx: &mut Self::Context, interface: &str, driver: DriverType)
        -> Status;

    /// Acquire the hardware handle for an initialized context
    fn open_context(&self, ctx: &mut Self::Context) -> Status;

    /// Release the hardware handle
    fn close_context(&self, ctx: &mut Self::Context);

    /// Allocate a fresh packet context
    fn init_packet(&self) -> Self::Packet;

    /// Current mode code, negative on failure
    fn get_mode(&self, ctx: &Self::Context) -> i32;

    fn set_mode(&self, ctx: &mut Self::Context, code: i32) -> Status;

    fn set_functional_mode(&self, ctx: &mut Self::Context, code: i32) -> Status;

    /// Current channel, negative on failure
    fn get_channel(&self, ctx: &Self::Context) -> i32;

    fn set_channel(&self, ctx: &mut Self::Context, channel: i32) -> Status;

    fn get_capabilities(&self, ctx: &Self::Context) -> CapabilityFlags;

    /// Rate code currently held by the packet context
    fn get_tx_rate(&self, pkt: &Self::Packet) -> i32;

    fn set_tx_rate(&self, ctx: &mut Self::Context, pkt: &mut Self::Packet, code: i32) -> Status;

    /// Modulation code currently held by the packet context
    fn get_modulation(&self, pkt: &Self::Packet) -> i32;

    fn set_modulation(&self, ctx: &mut Self::Context, pkt: &mut Self::Packet, code: i32)
        -> Status;

    /// Transmit one raw frame; `frame.len()` is the authoritative length
    fn transmit(&self, ctx: &mut Self::Context, pkt: &mut Self::Packet, frame: &[u8]) -> Status;

    /// Last error text recorded on `ctx`
    fn error_string(&self, ctx: &Self::Context) -> String;
}

//! Simulated driver
//!
//! Implements the driver contract over plain in-memory state. Each context
//! remembers its interface, mode, functional mode and channel; each packet
//! context remembers rate and modulation codes. A shared ledger counts every
//! call and keeps the frames handed to `transmit`, and lets tests script
//! one-shot failures or out-of-vocabulary codes.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use inj_catalog::{
    CapabilityFlags, Driver, DriverFault, DriverType, FunctionalMode, Mode, RawCard, Status,
    Symbolic,
};
use tracing::{debug, trace, warn};

use crate::config::{SimConfigError, SimDriverConfig};

/// Driver primitives, for call counting and failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimOp {
    Version,
    CardList,
    Resolve,
    InitContext,
    OpenContext,
    CloseContext,
    InitPacket,
    GetMode,
    SetMode,
    SetFunctionalMode,
    GetChannel,
    SetChannel,
    GetCapabilities,
    GetTxRate,
    SetTxRate,
    GetModulation,
    SetModulation,
    Transmit,
}

/// Per-adapter state held by a simulated driver context
#[derive(Debug, Clone, Default)]
pub struct SimContext {
    interface: String,
    driver: Option<DriverType>,
    capabilities: CapabilityFlags,
    mode: i32,
    functional_mode: Option<FunctionalMode>,
    channel: i32,
    open: bool,
    last_error: String,
}

impl SimContext {
    pub fn interface(&self) -> &str {
        &self.interface
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn functional_mode(&self) -> Option<FunctionalMode> {
        self.functional_mode
    }

    fn fail(&mut self, message: impl Into<String>) -> Status {
        self.last_error = message.into();
        debug!("Simulated driver failure: {}", self.last_error);
        Err(DriverFault)
    }
}

/// Per-session transmit state held by a simulated packet context
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimPacket {
    rate: i32,
    modulation: i32,
}

#[derive(Debug, Default)]
struct Ledger {
    calls: HashMap<SimOp, usize>,
    failures: HashMap<SimOp, String>,
    codes: HashMap<SimOp, i32>,
    transmitted: Vec<Vec<u8>>,
    closes: usize,
}

/// In-process driver that resolves the configured simulated cards
#[derive(Debug, Clone)]
pub struct SimDriver {
    config: Arc<SimDriverConfig>,
    ledger: Arc<Mutex<Ledger>>,
}

impl SimDriver {
    /// Simulator with the default card set (`nodriver`, `mock`, `mock-basic`)
    pub fn new() -> Self {
        Self::from_config(SimDriverConfig::default())
    }

    pub fn from_config(config: SimDriverConfig) -> Self {
        Self {
            config: Arc::new(config),
            ledger: Arc::new(Mutex::new(Ledger::default())),
        }
    }

    /// Simulator configured from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimConfigError> {
        SimDriverConfig::load(path).map(Self::from_config)
    }

    pub fn config(&self) -> &SimDriverConfig {
        &self.config
    }

    /// Number of times `op` has been called on any clone of this driver
    pub fn calls(&self, op: SimOp) -> usize {
        self.ledger().calls.get(&op).copied().unwrap_or(0)
    }

    /// Total number of driver calls
    pub fn total_calls(&self) -> usize {
        self.ledger().calls.values().sum()
    }

    /// Number of hardware handles actually released
    pub fn closes(&self) -> usize {
        self.ledger().closes
    }

    /// Frames handed to `transmit`, in order
    pub fn transmitted(&self) -> Vec<Vec<u8>> {
        self.ledger().transmitted.clone()
    }

    /// Make the next call of `op` fail with `message`
    ///
    /// Query primitives (`GetMode`, `GetChannel`) report a negative code.
    pub fn fail_next(&self, op: SimOp, message: impl Into<String>) {
        self.ledger().failures.insert(op, message.into());
    }

    /// Make the next call of a query primitive return `code` verbatim
    pub fn report_next(&self, op: SimOp, code: i32) {
        self.ledger().codes.insert(op, code);
    }

    /// Forget all counts, scripted failures and transmitted frames
    pub fn reset_ledger(&self) {
        *self.ledger() = Ledger::default();
    }

    fn ledger(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Count a call and take any scripted failure for it
    fn enter(&self, op: SimOp) -> Option<String> {
        trace!("sim {:?}", op);
        let mut ledger = self.ledger();
        *ledger.calls.entry(op).or_insert(0) += 1;
        ledger.failures.remove(&op)
    }

    fn scripted_code(&self, op: SimOp) -> Option<i32> {
        self.ledger().codes.remove(&op)
    }
}

impl Default for SimDriver {
    fn default() -> Self {
        Self::new()
    }
}

/// Channels the simulated radio can tune: 2.4 GHz 1-14 and 5 GHz 36-165
fn channel_supported(channel: i32) -> bool {
    (1..=14).contains(&channel) || (36..=165).contains(&channel)
}

impl Driver for SimDriver {
    type Context = SimContext;
    type Packet = SimPacket;

    fn version(&self) -> i32 {
        self.enter(SimOp::Version);
        self.config.version
    }

    fn card_list(&self) -> Option<Vec<RawCard>> {
        if self.enter(SimOp::CardList).is_some() || self.config.enumeration_unavailable {
            warn!("Simulated card list unavailable");
            return None;
        }

        Some(
            self.config
                .cards
                .iter()
                .map(|c| RawCard {
                    name: c.name.clone(),
                    description: c.description.clone(),
                    capabilities: c.capabilities,
                })
                .collect(),
        )
    }

    fn resolve(&self, name: &str) -> DriverType {
        self.enter(SimOp::Resolve);
        self.config
            .cards
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.driver_type())
            .unwrap_or(DriverType::NO_DRIVER)
    }

    fn new_context(&self) -> SimContext {
        SimContext {
            mode: -1,
            channel: -1,
            ..SimContext::default()
        }
    }

    fn init_context(&self, ctx: &mut SimContext, interface: &str, driver: DriverType) -> Status {
        if let Some(message) = self.enter(SimOp::InitContext) {
            return ctx.fail(message);
        }

        let Some(card) = self.config.card(driver) else {
            return ctx.fail(format!("unsupported driver type {}", driver));
        };

        if interface.is_empty() || self.config.missing_interfaces.iter().any(|i| i == interface) {
            return ctx.fail(format!("no such device: {}", interface));
        }

        ctx.interface = interface.to_string();
        ctx.driver = Some(driver);
        ctx.capabilities = card.capabilities;
        debug!("Initialized {} on {}", card.name, interface);
        Ok(())
    }

    fn open_context(&self, ctx: &mut SimContext) -> Status {
        if let Some(message) = self.enter(SimOp::OpenContext) {
            return ctx.fail(message);
        }

        if ctx.driver.is_none() {
            return ctx.fail("context not initialized");
        }

        ctx.open = true;
        ctx.mode = self.config.initial_mode.code();
        ctx.channel = self.config.initial_channel;
        debug!("Opened {}", ctx.interface);
        Ok(())
    }

    fn close_context(&self, ctx: &mut SimContext) {
        self.enter(SimOp::CloseContext);
        if ctx.open {
            ctx.open = false;
            ctx.mode = -1;
            ctx.channel = -1;
            self.ledger().closes += 1;
            debug!("Closed {}", ctx.interface);
        }
    }

    fn init_packet(&self) -> SimPacket {
        self.enter(SimOp::InitPacket);
        SimPacket::default()
    }

    fn get_mode(&self, ctx: &SimContext) -> i32 {
        if self.enter(SimOp::GetMode).is_some() {
            return -1;
        }
        if let Some(code) = self.scripted_code(SimOp::GetMode) {
            return code;
        }
        if ctx.open {
            ctx.mode
        } else {
            -1
        }
    }

    fn set_mode(&self, ctx: &mut SimContext, code: i32) -> Status {
        if let Some(message) = self.enter(SimOp::SetMode) {
            return ctx.fail(message);
        }
        if !ctx.open {
            return ctx.fail("interface not open");
        }
        if Mode::from_code(code).is_err() {
            return ctx.fail(format!("unsupported mode {}", code));
        }
        ctx.mode = code;
        Ok(())
    }

    fn set_functional_mode(&self, ctx: &mut SimContext, code: i32) -> Status {
        if let Some(message) = self.enter(SimOp::SetFunctionalMode) {
            return ctx.fail(message);
        }
        if !ctx.open {
            return ctx.fail("interface not open");
        }
        let Ok(functional) = FunctionalMode::from_code(code) else {
            return ctx.fail(format!("unsupported functional mode {}", code));
        };
        ctx.functional_mode = Some(functional);
        if matches!(functional, FunctionalMode::Rfmon | FunctionalMode::Injmon) {
            ctx.mode = Mode::Monitor.code();
        }
        Ok(())
    }

    fn get_channel(&self, ctx: &SimContext) -> i32 {
        if self.enter(SimOp::GetChannel).is_some() {
            return -1;
        }
        if let Some(code) = self.scripted_code(SimOp::GetChannel) {
            return code;
        }
        if ctx.open {
            ctx.channel
        } else {
            -1
        }
    }

    fn set_channel(&self, ctx: &mut SimContext, channel: i32) -> Status {
        if let Some(message) = self.enter(SimOp::SetChannel) {
            return ctx.fail(message);
        }
        if !ctx.open {
            return ctx.fail("interface not open");
        }
        if !channel_supported(channel) {
            return ctx.fail(format!("invalid channel {}", channel));
        }
        ctx.channel = channel;
        Ok(())
    }

    fn get_capabilities(&self, ctx: &SimContext) -> CapabilityFlags {
        self.enter(SimOp::GetCapabilities);
        if let Some(code) = self.scripted_code(SimOp::GetCapabilities) {
            return CapabilityFlags::from_bits(code as u32);
        }
        ctx.capabilities
    }

    fn get_tx_rate(&self, pkt: &SimPacket) -> i32 {
        self.enter(SimOp::GetTxRate);
        self.scripted_code(SimOp::GetTxRate).unwrap_or(pkt.rate)
    }

    fn set_tx_rate(&self, ctx: &mut SimContext, pkt: &mut SimPacket, code: i32) -> Status {
        if let Some(message) = self.enter(SimOp::SetTxRate) {
            return ctx.fail(message);
        }
        if !ctx.capabilities.has(CapabilityFlags::SETRATE) {
            return ctx.fail("driver does not support setting rate");
        }
        pkt.rate = code;
        Ok(())
    }

    fn get_modulation(&self, pkt: &SimPacket) -> i32 {
        self.enter(SimOp::GetModulation);
        self.scripted_code(SimOp::GetModulation)
            .unwrap_or(pkt.modulation)
    }

    fn set_modulation(&self, ctx: &mut SimContext, pkt: &mut SimPacket, code: i32) -> Status {
        if let Some(message) = self.enter(SimOp::SetModulation) {
            return ctx.fail(message);
        }
        if !ctx.capabilities.has(CapabilityFlags::SETMODULATION) {
            return ctx.fail("driver does not support setting modulation");
        }
        pkt.modulation = code;
        Ok(())
    }

    fn transmit(&self, ctx: &mut SimContext, _pkt: &mut SimPacket, frame: &[u8]) -> Status {
        if let Some(message) = self.enter(SimOp::Transmit) {
            return ctx.fail(message);
        }
        if !ctx.open {
            return ctx.fail("interface not open");
        }
        if !ctx.capabilities.has(CapabilityFlags::TRANSMIT) {
            return ctx.fail("driver cannot transmit");
        }
        if frame.is_empty() {
            return ctx.fail("refusing to transmit an empty frame");
        }
        trace!("Transmitting {} bytes on {}", frame.len(), ctx.interface);
        self.ledger().transmitted.push(frame.to_vec());
        Ok(())
    }

    fn error_string(&self, ctx: &SimContext) -> String {
        ctx.last_error.clone()
    }
}

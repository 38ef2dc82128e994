//! Device session
//!
//! A [`DeviceSession`] owns one driver context and one packet context for a
//! single adapter. Every operation checks the lifecycle state first, then
//! translates symbolic values through the catalog, then calls the driver.
//!
//! Capability flags are read once when the session opens and used for
//! gating `set_tx_rate`/`set_modulation` for the rest of its life. The
//! `capabilities()` query still asks the driver each time.

use std::fmt;

use inj_catalog::{
    flags_to_names, CapabilityFlags, Driver, DriverType, FunctionalMode, Mode, Modulation,
    Symbolic, TxRate, Vocabulary,
};
use tracing::{debug, info, trace, warn};

use crate::error::{Result, SessionError};
use crate::state::SessionState;

/// Driver and packet contexts, acquired and released as a pair
struct Handles<D: Driver> {
    ctx: D::Context,
    pkt: D::Packet,
}

/// Exclusive, stateful handle over one injection adapter
pub struct DeviceSession<D: Driver> {
    driver: D,
    interface: String,
    driver_name: String,
    driver_type: DriverType,
    state: SessionState,
    capabilities: CapabilityFlags,
    /// `Some` exactly while `state` is `Open`
    handles: Option<Handles<D>>,
}

impl<D: Driver> DeviceSession<D> {
    /// Create an unopened session over `driver`
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            interface: String::new(),
            driver_name: String::new(),
            driver_type: DriverType::NO_DRIVER,
            state: SessionState::Unopened,
            capabilities: CapabilityFlags::NONE,
            handles: None,
        }
    }

    /// Open `interface` with the driver named `driver_name`
    ///
    /// On failure nothing is left open and no `close` is needed.
    pub fn open(driver: D, interface: &str, driver_name: &str) -> Result<Self> {
        let mut session = Self::new(driver);
        session.attach(interface, driver_name)?;
        Ok(session)
    }

    /// Run the open sequence on an unopened session
    ///
    /// Resolve the driver name, initialize and open the driver context, then
    /// initialize a fresh packet context. If any step fails the session stays
    /// unopened and the partially initialized context is discarded.
    pub fn attach(&mut self, interface: &str, driver_name: &str) -> Result<()> {
        if self.state != SessionState::Unopened {
            return Err(SessionError::InvalidState {
                operation: "open",
                state: self.state,
            });
        }

        let driver_type = self.driver.resolve(driver_name);
        if driver_type.is_none() {
            warn!("Driver {} did not resolve", driver_name);
            return Err(SessionError::UnknownDriver(driver_name.to_string()));
        }
        debug!("Resolved driver {} to type {}", driver_name, driver_type);

        let mut ctx = self.driver.new_context();
        if self.driver.init_context(&mut ctx, interface, driver_type).is_err() {
            let message = self.driver.error_string(&ctx);
            warn!("Failed to initialize {} ({}): {}", interface, driver_name, message);
            return Err(SessionError::Driver(message));
        }

        if self.driver.open_context(&mut ctx).is_err() {
            let message = self.driver.error_string(&ctx);
            warn!("Failed to open {} ({}): {}", interface, driver_name, message);
            return Err(SessionError::Driver(message));
        }

        let pkt = self.driver.init_packet();
        let capabilities = self.driver.get_capabilities(&ctx);

        self.interface = interface.to_string();
        self.driver_name = driver_name.to_string();
        self.driver_type = driver_type;
        self.capabilities = capabilities;
        self.handles = Some(Handles { ctx, pkt });
        self.state = SessionState::Open;

        info!(
            "Opened {} with driver {} (capabilities: {})",
            interface, driver_name, capabilities
        );
        Ok(())
    }

    /// Release the driver context
    ///
    /// The hardware handle is released only if the driver still reports a
    /// valid mode for it. Safe to call any number of times; also runs on
    /// drop. Closing an unopened session does nothing.
    pub fn close(&mut self) {
        let Some(mut handles) = self.handles.take() else {
            return;
        };

        if self.driver.get_mode(&handles.ctx) >= 0 {
            self.driver.close_context(&mut handles.ctx);
            info!("Closed {}", self.interface);
        } else {
            debug!(
                "Context for {} is not live, nothing to release",
                self.interface
            );
        }
        self.state = SessionState::Closed;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    /// Interface name given at open (empty before)
    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// Driver name given at open (empty before)
    pub fn driver_name(&self) -> &str {
        &self.driver_name
    }

    /// Resolved driver type, or the no-driver sentinel before open
    pub fn driver_type(&self) -> DriverType {
        self.driver_type
    }

    /// Capability flags captured at open
    pub fn capability_flags(&self) -> CapabilityFlags {
        self.capabilities
    }

    /// The underlying driver
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Current interface mode
    pub fn mode(&mut self) -> Result<Mode> {
        let (driver, h) = self.live("get mode")?;
        let code = driver.get_mode(&h.ctx);
        if code < 0 {
            return Err(SessionError::Driver(driver.error_string(&h.ctx)));
        }
        Mode::from_code(code).map_err(|_| SessionError::ProtocolViolation {
            vocabulary: Vocabulary::Mode,
            code,
        })
    }

    /// Request a mode change, best effort
    ///
    /// A failure reported by the driver is logged and not returned. Use
    /// [`set_mode_checked`](Self::set_mode_checked) to see it.
    pub fn set_mode<M>(&mut self, mode: M) -> Result<()>
    where
        M: TryInto<Mode>,
        SessionError: From<M::Error>,
    {
        match self.set_mode_checked(mode) {
            Err(SessionError::Driver(message)) => {
                warn!("Ignoring mode change failure on {}: {}", self.interface, message);
                Ok(())
            }
            other => other,
        }
    }

    /// Change the mode, surfacing driver failures as [`SessionError::Driver`]
    pub fn set_mode_checked<M>(&mut self, mode: M) -> Result<()>
    where
        M: TryInto<Mode>,
        SessionError: From<M::Error>,
    {
        let (driver, h) = self.live("set mode")?;
        let mode: Mode = mode.try_into()?;
        debug!("Setting mode {}", mode);
        driver
            .set_mode(&mut h.ctx, mode.code())
            .map_err(|_| SessionError::Driver(driver.error_string(&h.ctx)))
    }

    /// Configure monitoring/injection behavior
    pub fn set_functional_mode<M>(&mut self, mode: M) -> Result<()>
    where
        M: TryInto<FunctionalMode>,
        SessionError: From<M::Error>,
    {
        let (driver, h) = self.live("set functional mode")?;
        let mode: FunctionalMode = mode.try_into()?;
        debug!("Setting functional mode {}", mode);
        driver
            .set_functional_mode(&mut h.ctx, mode.code())
            .map_err(|_| SessionError::Driver(driver.error_string(&h.ctx)))
    }

    pub fn channel(&mut self) -> Result<i32> {
        let (driver, h) = self.live("get channel")?;
        let channel = driver.get_channel(&h.ctx);
        if channel < 0 {
            return Err(SessionError::Driver(driver.error_string(&h.ctx)));
        }
        Ok(channel)
    }

    pub fn set_channel(&mut self, channel: i32) -> Result<()> {
        let (driver, h) = self.live("set channel")?;
        debug!("Setting channel {}", channel);
        driver
            .set_channel(&mut h.ctx, channel)
            .map_err(|_| SessionError::Driver(driver.error_string(&h.ctx)))
    }

    /// Current transmit rate; [`TxRate::Default`] reports 0 Mb/s
    pub fn tx_rate(&mut self) -> Result<TxRate> {
        let (driver, h) = self.live("get tx rate")?;
        let code = driver.get_tx_rate(&h.pkt);
        TxRate::from_code(code).map_err(|_| SessionError::ProtocolViolation {
            vocabulary: Vocabulary::TxRate,
            code,
        })
    }

    /// Set the transmit rate in Mb/s; `None` selects the driver default
    ///
    /// Requires `SETRATE`. Only the fixed rates are accepted, exactly.
    pub fn set_tx_rate(&mut self, mbps: impl Into<Option<f64>>) -> Result<()> {
        let capabilities = self.capabilities;
        let (driver, h) = self.live("set tx rate")?;
        if !capabilities.has(CapabilityFlags::SETRATE) {
            return Err(SessionError::Capability("rate setting unsupported".into()));
        }

        let rate = TxRate::from_mbps(mbps.into())?;
        debug!("Setting tx rate {} (code {})", rate, rate.code());
        driver
            .set_tx_rate(&mut h.ctx, &mut h.pkt, rate.code())
            .map_err(|_| SessionError::Driver(driver.error_string(&h.ctx)))
    }

    pub fn modulation(&mut self) -> Result<Modulation> {
        let (driver, h) = self.live("get modulation")?;
        let code = driver.get_modulation(&h.pkt);
        Modulation::from_code(code).map_err(|_| {
            debug!("Driver reported modulation code {}", code);
            SessionError::Capability("could not determine modulation".into())
        })
    }

    /// Set the transmit modulation; requires `SETMODULATION`
    pub fn set_modulation<M>(&mut self, modulation: M) -> Result<()>
    where
        M: TryInto<Modulation>,
        SessionError: From<M::Error>,
    {
        let capabilities = self.capabilities;
        let (driver, h) = self.live("set modulation")?;
        if !capabilities.has(CapabilityFlags::SETMODULATION) {
            return Err(SessionError::Capability(
                "modulation setting unsupported".into(),
            ));
        }

        let modulation: Modulation = modulation.try_into()?;
        debug!("Setting modulation {}", modulation);
        driver
            .set_modulation(&mut h.ctx, &mut h.pkt, modulation.code())
            .map_err(|_| SessionError::Driver(driver.error_string(&h.ctx)))
    }

    /// Capability names as currently reported by the driver
    pub fn capabilities(&mut self) -> Result<Vec<&'static str>> {
        let (driver, h) = self.live("get capabilities")?;
        Ok(flags_to_names(driver.get_capabilities(&h.ctx)))
    }

    /// Inject one raw frame; its exact length is passed to the driver
    pub fn transmit(&mut self, frame: &[u8]) -> Result<()> {
        let (driver, h) = self.live("transmit")?;
        trace!("Transmitting {} byte frame", frame.len());
        driver
            .transmit(&mut h.ctx, &mut h.pkt, frame)
            .map_err(|_| SessionError::Driver(driver.error_string(&h.ctx)))
    }

    /// Driver and contexts, if the session is open
    fn live(&mut self, operation: &'static str) -> Result<(&D, &mut Handles<D>)> {
        let state = self.state;
        match self.handles.as_mut() {
            Some(handles) if state == SessionState::Open => Ok((&self.driver, handles)),
            _ => Err(SessionError::InvalidState { operation, state }),
        }
    }
}

impl<D: Driver> Drop for DeviceSession<D> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<D: Driver> fmt::Debug for DeviceSession<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceSession")
            .field("interface", &self.interface)
            .field("driver_name", &self.driver_name)
            .field("driver_type", &self.driver_type)
            .field("state", &self.state)
            .field("capabilities", &self.capabilities)
            .finish()
    }
}

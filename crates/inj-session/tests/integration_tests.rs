//! Integration tests for device sessions
//!
//! These tests drive a session end to end against the simulated driver:
//! - Open/configure/transmit on a fully capable card
//! - Capability gating on a card without rate/modulation control
//! - Lifecycle enforcement before open and after close
//! - Rejected values leave driver state untouched

use inj_catalog::{CapabilityFlags, Modulation, TxRate};
use inj_session::{DeviceSession, SessionError, SessionState};
use inj_sim::{SimCardConfig, SimDriver, SimDriverConfig, SimOp};

// ============================================================================
// Helper Functions
// ============================================================================

mod helpers {
    use super::*;

    /// Simulator with a single "mock" card carrying the given capabilities
    pub fn driver_with(capabilities: CapabilityFlags) -> SimDriver {
        SimDriver::from_config(SimDriverConfig {
            cards: vec![SimCardConfig::new(
                "mock",
                "Bench card",
                1,
                CapabilityFlags::TRANSMIT | capabilities,
            )],
            ..SimDriverConfig::default()
        })
    }

    /// Open "wlan0mock" on the "mock" driver, returning a probe clone
    pub fn open(driver: SimDriver) -> (DeviceSession<SimDriver>, SimDriver) {
        let probe = driver.clone();
        let session = DeviceSession::open(driver, "wlan0mock", "mock").unwrap();
        (session, probe)
    }

    pub fn is_invalid_state(result: Result<impl Sized, SessionError>) -> bool {
        matches!(result, Err(SessionError::InvalidState { .. }))
    }
}

// ============================================================================
// End-to-End Scenarios
// ============================================================================

#[test]
fn configure_and_transmit_on_capable_card() {
    let driver =
        helpers::driver_with(CapabilityFlags::SETRATE | CapabilityFlags::SETMODULATION);
    let (mut session, probe) = helpers::open(driver);

    session.set_tx_rate(11.0).unwrap();
    assert_eq!(session.tx_rate().unwrap(), TxRate::Mbps11);
    assert_eq!(session.tx_rate().unwrap().mbps(), 11.0);

    session.set_modulation("OFDM").unwrap();
    assert_eq!(session.modulation().unwrap(), Modulation::Ofdm);
    assert_eq!(session.modulation().unwrap().to_string(), "OFDM");

    session.transmit(&[0xAA, 0xBB, 0xCC]).unwrap();
    let frames = probe.transmitted();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].len(), 3);
    assert_eq!(frames[0], vec![0xAA, 0xBB, 0xCC]);
}

#[test]
fn rejected_rate_leaves_rate_unchanged() {
    let driver = helpers::driver_with(CapabilityFlags::SETRATE);
    let (mut session, probe) = helpers::open(driver);

    session.set_tx_rate(5.5).unwrap();
    let before = session.tx_rate().unwrap();

    assert!(matches!(
        session.set_tx_rate(7.0),
        Err(SessionError::InvalidValue(_))
    ));
    assert_eq!(session.tx_rate().unwrap(), before);
    assert_eq!(probe.calls(SimOp::SetTxRate), 1);
}

#[test]
fn omitted_rate_reports_zero() {
    let driver = helpers::driver_with(CapabilityFlags::SETRATE);
    let (mut session, _) = helpers::open(driver);

    session.set_tx_rate(48.0).unwrap();
    session.set_tx_rate(None).unwrap();
    assert_eq!(session.tx_rate().unwrap().mbps(), 0.0);
}

#[test]
fn gated_setters_never_reach_driver() {
    let driver = helpers::driver_with(CapabilityFlags::NONE);
    let (mut session, probe) = helpers::open(driver);

    for rate in [None, Some(1.0), Some(7.0)] {
        assert!(matches!(
            session.set_tx_rate(rate),
            Err(SessionError::Capability(_))
        ));
    }
    for name in ["DEFAULT", "OFDM", "BOGUS"] {
        assert!(matches!(
            session.set_modulation(name),
            Err(SessionError::Capability(_))
        ));
    }

    assert_eq!(probe.calls(SimOp::SetTxRate), 0);
    assert_eq!(probe.calls(SimOp::SetModulation), 0);
}

#[test]
fn capabilities_fixed_at_open() {
    let driver = helpers::driver_with(CapabilityFlags::SETRATE);
    let (mut session, probe) = helpers::open(driver);

    // Driver starts claiming fewer bits; gating still uses the open-time set
    probe.report_next(SimOp::GetCapabilities, CapabilityFlags::TRANSMIT.bits() as i32);
    assert_eq!(session.capabilities().unwrap(), vec!["TRANSMIT"]);
    assert!(session.set_tx_rate(2.0).is_ok());
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn operations_after_close_are_invalid_state() {
    let (mut session, probe) = helpers::open(SimDriver::new());
    session.close();
    assert_eq!(session.state(), SessionState::Closed);

    let calls_after_close = probe.total_calls();

    assert!(helpers::is_invalid_state(session.mode()));
    assert!(helpers::is_invalid_state(session.set_mode("MONITOR")));
    assert!(helpers::is_invalid_state(session.set_mode_checked("MONITOR")));
    assert!(helpers::is_invalid_state(session.set_functional_mode("INJECT")));
    assert!(helpers::is_invalid_state(session.channel()));
    assert!(helpers::is_invalid_state(session.set_channel(6)));
    assert!(helpers::is_invalid_state(session.tx_rate()));
    assert!(helpers::is_invalid_state(session.set_tx_rate(None)));
    assert!(helpers::is_invalid_state(session.modulation()));
    assert!(helpers::is_invalid_state(session.set_modulation("DSSS")));
    assert!(helpers::is_invalid_state(session.capabilities()));
    assert!(helpers::is_invalid_state(session.transmit(&[0x00])));

    assert_eq!(probe.total_calls(), calls_after_close);

    // Names stay queryable
    assert_eq!(session.interface(), "wlan0mock");
    assert_eq!(session.driver_name(), "mock");
}

#[test]
fn closed_session_cannot_reopen() {
    let (mut session, _) = helpers::open(SimDriver::new());
    session.close();
    assert!(helpers::is_invalid_state(session.attach("wlan0mock", "mock")));
}

#[test]
fn failed_open_then_successful_attach() {
    let driver = SimDriver::new();
    let probe = driver.clone();
    let mut session = DeviceSession::new(driver);

    assert!(matches!(
        session.attach("wlan0mock", "madwifi"),
        Err(SessionError::UnknownDriver(_))
    ));
    assert_eq!(session.state(), SessionState::Unopened);

    session.attach("wlan0mock", "mock").unwrap();
    assert!(session.is_open());
    drop(session);
    assert_eq!(probe.closes(), 1);
}

#[test]
fn independent_sessions_do_not_interfere() {
    let driver = SimDriver::new();
    let probe = driver.clone();
    let mut a = DeviceSession::open(driver.clone(), "wlan0mock", "mock").unwrap();
    let mut b = DeviceSession::open(driver, "wlan1mock", "mock").unwrap();

    a.set_channel(1).unwrap();
    b.set_channel(11).unwrap();
    a.set_tx_rate(1.0).unwrap();

    assert_eq!(a.channel().unwrap(), 1);
    assert_eq!(b.channel().unwrap(), 11);
    assert_eq!(b.tx_rate().unwrap(), TxRate::Default);

    a.close();
    assert_eq!(b.mode().unwrap().to_string(), "INFRA");
    drop(b);
    assert_eq!(probe.closes(), 2);
}

#[test]
fn frame_length_is_exact() {
    let (mut session, probe) = helpers::open(SimDriver::new());
    let buffer = [0x08u8, 0x41, 0x0a, 0x00, 0xde, 0xad, 0xbe, 0xef];

    session.transmit(&buffer[..5]).unwrap();
    session.transmit(&buffer).unwrap();

    let lengths: Vec<usize> = probe.transmitted().iter().map(Vec::len).collect();
    assert_eq!(lengths, vec![5, 8]);
}

// ============================================================================
// Property-Based Tests
// ============================================================================

mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    fn fixed_rate() -> impl Strategy<Value = f64> {
        prop_oneof![
            Just(1.0),
            Just(2.0),
            Just(5.5),
            Just(6.0),
            Just(9.0),
            Just(11.0),
            Just(24.0),
            Just(36.0),
            Just(48.0),
            Just(108.0),
        ]
    }

    proptest! {
        #[test]
        fn accepted_rates_read_back(mbps in fixed_rate()) {
            let (mut session, _) = helpers::open(SimDriver::new());
            session.set_tx_rate(mbps).unwrap();
            prop_assert_eq!(session.tx_rate().unwrap().mbps(), mbps);
        }

        #[test]
        fn off_table_rates_never_mutate(start in fixed_rate(), attempt in 0.0f64..120.0) {
            prop_assume!(TxRate::from_mbps(Some(attempt)).is_err());

            let (mut session, probe) = helpers::open(SimDriver::new());
            session.set_tx_rate(start).unwrap();
            let applied = probe.calls(SimOp::SetTxRate);

            let rejected = matches!(
                session.set_tx_rate(attempt),
                Err(SessionError::InvalidValue(_))
            );
            prop_assert!(rejected);
            prop_assert_eq!(session.tx_rate().unwrap().mbps(), start);
            prop_assert_eq!(probe.calls(SimOp::SetTxRate), applied);
        }

        #[test]
        fn frames_pass_through_unchanged(frame in prop::collection::vec(any::<u8>(), 1..256)) {
            let (mut session, probe) = helpers::open(SimDriver::new());
            session.transmit(&frame).unwrap();
            prop_assert_eq!(probe.transmitted(), vec![frame]);
        }
    }
}

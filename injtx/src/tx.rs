//! Transmit loop
//!
//! Puts the adapter into injection mode on the requested channel, applies
//! modulation and rate where the card allows it, then injects one frame
//! repeatedly until the packet count is reached or the stop signal fires.

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use inj_catalog::{Driver, FunctionalMode, Modulation};
use inj_session::DeviceSession;
use tracing::{debug, info, warn};

/// 802.11 data frame with a WEP-encrypted body
pub const WEP_FRAME: &[u8] = &[
    0x08, 0x41, 0x0a, 0x00, 0x00, 0x03, 0x1b, 0xc2, 0x45, 0x33, 0x00, 0x1b, 0x4b, 0x29, 0x61, 0xb1,
    0xff, 0x10, 0x07, 0x00, 0x12, 0x53, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x3e,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x06, 0x00, 0x00, 0x00, 0x75, 0x41, 0x37, 0x5a, 0x4b, 0xbc, 0x55, 0x69, 0x07, 0x58, 0x4c,
    0x03, 0xf4, 0xa7, 0x69, 0xbc, 0xdf, 0x46, 0x27, 0x4d, 0xd0, 0xb6, 0xcc, 0x7c, 0x8b, 0x8b,
    0x46, 0x06, 0x30, 0x72, 0x67, 0x72, 0x5d, 0x49, 0xe6, 0x0a, 0xfb, 0x74, 0xef, 0x59, 0x1c,
    0x24, 0x0b, 0x07, 0x60, 0xee, 0x1b, 0x87, 0xf1, 0x6f, 0x3a, 0x88, 0x54, 0x25, 0x5a, 0x90,
    0xb4, 0x68,
];

/// Radio settings applied before the loop starts
#[derive(Debug, Clone, PartialEq)]
pub struct RadioPlan {
    pub channel: i32,
    pub modulation: Modulation,
    pub rate: Option<f64>,
}

/// What to send and how often
#[derive(Debug, Clone, PartialEq)]
pub struct TxPlan {
    pub frame: Vec<u8>,
    /// `None` transmits until stopped
    pub count: Option<u64>,
    pub sleep: Duration,
}

/// Enter injection mode and tune the radio
///
/// Functional mode and channel are required. Modulation and rate are best
/// effort: a card that cannot honor them only produces a warning.
pub fn prepare<D: Driver>(session: &mut DeviceSession<D>, plan: &RadioPlan) -> Result<()> {
    session
        .set_functional_mode(FunctionalMode::Inject)
        .context("Failed to enter injection mode")?;
    session
        .set_channel(plan.channel)
        .with_context(|| format!("Failed to set channel {}", plan.channel))?;

    if let Err(e) = session.set_modulation(plan.modulation) {
        warn!("Could not set modulation {}: {}", plan.modulation, e);
    }

    if let Err(e) = session.set_tx_rate(plan.rate) {
        match plan.rate {
            Some(mbps) => warn!("Could not set rate {} Mb/s: {}", mbps, e),
            None => warn!("Could not restore default rate: {}", e),
        }
    }

    info!(
        "Injecting on {} channel {}",
        session.interface(),
        plan.channel
    );
    Ok(())
}

/// Transmit until `plan.count` frames are sent or `stop` completes
///
/// Returns the number of frames handed to the driver.
pub async fn run<D, F>(session: &mut DeviceSession<D>, plan: &TxPlan, stop: F) -> Result<u64>
where
    D: Driver,
    F: Future<Output = ()>,
{
    tokio::pin!(stop);
    let mut sent: u64 = 0;

    while plan.count.map_or(true, |limit| sent < limit) {
        session
            .transmit(&plan.frame)
            .with_context(|| format!("Transmit failed after {} packets", sent))?;
        sent += 1;
        debug!("Sent packet {} ({} bytes)", sent, plan.frame.len());

        tokio::select! {
            biased;
            _ = &mut stop => {
                info!("Stop requested");
                break;
            }
            _ = tokio::time::sleep(plan.sleep) => {}
        }
    }

    Ok(sent)
}

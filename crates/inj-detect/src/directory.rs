//! Card directory
//!
//! This module lists the adapters a driver library knows about.

use inj_catalog::{flags_to_names, Driver, RawCard};
use serde::Serialize;
use tracing::{debug, info};

/// Name the driver library gives its leading "no driver" entry
pub const NO_DRIVER_NAME: &str = "nodriver";

/// Information about a supported card/driver pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardEntry {
    /// Driver name, as accepted when opening a session
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Capability names, in catalog order
    pub capabilities: Vec<&'static str>,
}

impl CardEntry {
    fn from_raw(card: RawCard) -> Self {
        Self {
            name: card.name,
            description: card.description,
            capabilities: flags_to_names(card.capabilities),
        }
    }

    /// True for the placeholder entry that stands for "no driver"
    pub fn is_placeholder(&self) -> bool {
        self.name == NO_DRIVER_NAME
    }
}

/// Stateless view over a driver's card list
pub struct CardDirectory<'a, D: Driver> {
    driver: &'a D,
}

impl<'a, D: Driver> CardDirectory<'a, D> {
    pub fn new(driver: &'a D) -> Self {
        Self { driver }
    }

    /// Enumerate every card the driver reports, in the driver's order
    ///
    /// A driver that cannot produce a list yields an empty one.
    pub fn list_cards(&self) -> Vec<CardEntry> {
        info!("Enumerating injection cards...");
        let Some(raw) = self.driver.card_list() else {
            info!("Driver reported no card list");
            return Vec::new();
        };

        let result: Vec<_> = raw.into_iter().map(CardEntry::from_raw).collect();

        if result.is_empty() {
            info!("No cards found");
        } else {
            info!("Found {} card(s)", result.len());
            for card in &result {
                debug!("  {} - {}", card.name, card.description);
            }
        }

        result
    }

    /// Cards that can actually be opened, without the placeholder
    pub fn supported_drivers(&self) -> Vec<CardEntry> {
        self.list_cards()
            .into_iter()
            .filter(|c| !c.is_placeholder())
            .collect()
    }

    /// Driver library version, `YYYYMMRR`
    pub fn version(&self) -> i32 {
        self.driver.version()
    }
}

//! Simulated driver configuration

use std::path::Path;

use inj_catalog::{CapabilityFlags, DriverType, Mode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading a simulator configuration file
#[derive(Debug, Error)]
pub enum SimConfigError {
    /// File could not be read
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// File is not a valid configuration
    #[error("invalid simulator config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Two cards share a name or driver code
    #[error("duplicate card {0}")]
    DuplicateCard(String),
}

/// One simulated card/driver pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimCardConfig {
    /// Driver name accepted by `resolve`
    pub name: String,
    /// Human description
    pub description: String,
    /// Native driver-type code; `0` marks the no-driver placeholder
    pub driver_code: i32,
    /// Reported capability bits, as names (e.g. `["SNIFF", "SETRATE"]`)
    #[serde(default)]
    pub capabilities: CapabilityFlags,
}

impl SimCardConfig {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        driver_code: i32,
        capabilities: CapabilityFlags,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            driver_code,
            capabilities,
        }
    }

    pub fn driver_type(&self) -> DriverType {
        DriverType(self.driver_code)
    }
}

/// Configuration for a [`SimDriver`](crate::SimDriver)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimDriverConfig {
    /// Version reported by `version()`, `YYYYMMRR`
    #[serde(default = "default_version")]
    pub version: i32,
    /// Cards in enumeration order
    #[serde(default = "default_cards")]
    pub cards: Vec<SimCardConfig>,
    /// Mode a context reports right after it is opened
    #[serde(default = "default_mode")]
    pub initial_mode: Mode,
    /// Channel a context reports right after it is opened
    #[serde(default = "default_channel")]
    pub initial_channel: i32,
    /// Interfaces that fail to initialize ("no such device")
    #[serde(default)]
    pub missing_interfaces: Vec<String>,
    /// When set, `card_list` reports that no list could be produced
    #[serde(default)]
    pub enumeration_unavailable: bool,
}

fn default_version() -> i32 {
    20_070_121
}

fn default_mode() -> Mode {
    Mode::Infra
}

fn default_channel() -> i32 {
    1
}

fn default_cards() -> Vec<SimCardConfig> {
    vec![
        SimCardConfig::new("nodriver", "No driver", 0, CapabilityFlags::NONE),
        SimCardConfig::new(
            "mock",
            "Simulated injection adapter",
            1,
            CapabilityFlags::SNIFF
                | CapabilityFlags::TRANSMIT
                | CapabilityFlags::SEQ
                | CapabilityFlags::DSSSTX
                | CapabilityFlags::OFDMTX
                | CapabilityFlags::SETRATE
                | CapabilityFlags::SETMODULATION,
        ),
        SimCardConfig::new(
            "mock-basic",
            "Simulated adapter without rate or modulation control",
            2,
            CapabilityFlags::SNIFF | CapabilityFlags::TRANSMIT | CapabilityFlags::DSSSTX,
        ),
    ]
}

impl Default for SimDriverConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            cards: default_cards(),
            initial_mode: default_mode(),
            initial_channel: default_channel(),
            missing_interfaces: Vec::new(),
            enumeration_unavailable: false,
        }
    }
}

impl SimDriverConfig {
    /// A configuration with no cards at all
    pub fn empty() -> Self {
        Self {
            cards: Vec::new(),
            ..Self::default()
        }
    }

    /// Load and validate a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SimConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| SimConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject duplicate card names and duplicate non-placeholder codes
    pub fn validate(&self) -> Result<(), SimConfigError> {
        for (i, card) in self.cards.iter().enumerate() {
            let clash = self.cards[..i].iter().any(|other| {
                other.name == card.name
                    || (card.driver_code != 0 && other.driver_code == card.driver_code)
            });
            if clash {
                return Err(SimConfigError::DuplicateCard(card.name.clone()));
            }
        }
        Ok(())
    }

    /// Card for a resolved driver type
    pub fn card(&self, driver: DriverType) -> Option<&SimCardConfig> {
        if driver.is_none() {
            return None;
        }
        self.cards.iter().find(|c| c.driver_type() == driver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cards_start_with_placeholder() {
        let config = SimDriverConfig::default();
        assert_eq!(config.cards[0].name, "nodriver");
        assert!(config.cards[0].driver_type().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sim.json");
        std::fs::write(
            &path,
            r#"{
                "cards": [
                    { "name": "mock", "description": "Bench card", "driver_code": 7,
                      "capabilities": ["TRANSMIT", "SETRATE"] }
                ],
                "initial_mode": "MONITOR",
                "initial_channel": 11
            }"#,
        )
        .unwrap();

        let config = SimDriverConfig::load(&path).unwrap();
        assert_eq!(config.cards.len(), 1);
        assert_eq!(
            config.cards[0].capabilities,
            CapabilityFlags::TRANSMIT | CapabilityFlags::SETRATE
        );
        assert_eq!(config.initial_mode, Mode::Monitor);
        assert_eq!(config.initial_channel, 11);
        assert_eq!(config.version, 20_070_121);
    }

    #[test]
    fn test_load_rejects_unknown_capability() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sim.json");
        std::fs::write(
            &path,
            r#"{ "cards": [ { "name": "x", "description": "", "driver_code": 3,
                 "capabilities": ["TELEPORT"] } ] }"#,
        )
        .unwrap();

        assert!(matches!(
            SimDriverConfig::load(&path),
            Err(SimConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_duplicate_cards_rejected() {
        let mut config = SimDriverConfig::default();
        config.cards.push(SimCardConfig::new(
            "mock2",
            "clash",
            1,
            CapabilityFlags::NONE,
        ));
        assert!(matches!(
            config.validate(),
            Err(SimConfigError::DuplicateCard(name)) if name == "mock2"
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            SimDriverConfig::load("/nonexistent/sim.json"),
            Err(SimConfigError::Read { .. })
        ));
    }
}

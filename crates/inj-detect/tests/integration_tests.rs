//! Integration tests for card enumeration
//!
//! Cards come from a simulated driver configured per test; entries must
//! mirror the driver's list in order and content.

use inj_catalog::CapabilityFlags;
use inj_detect::{CardDirectory, CardEntry};
use inj_session::DeviceSession;
use inj_sim::{SimCardConfig, SimDriver, SimDriverConfig, SimOp};

fn driver_with_cards(cards: Vec<SimCardConfig>) -> SimDriver {
    SimDriver::from_config(SimDriverConfig {
        cards,
        ..SimDriverConfig::default()
    })
}

#[test]
fn entries_serialize_for_listings() {
    let driver = driver_with_cards(vec![SimCardConfig::new(
        "mock",
        "Bench card",
        1,
        CapabilityFlags::TRANSMIT | CapabilityFlags::SETMODULATION,
    )]);
    let cards = CardDirectory::new(&driver).list_cards();

    let json = serde_json::to_value(&cards).unwrap();
    assert_eq!(
        json,
        serde_json::json!([{
            "name": "mock",
            "description": "Bench card",
            "capabilities": ["TRANSMIT", "SETMODULATION"],
        }])
    );
}

#[test]
fn listed_drivers_open() {
    let driver = SimDriver::new();
    let supported = CardDirectory::new(&driver).supported_drivers();

    for card in supported {
        let session = DeviceSession::open(driver.clone(), "wlan0mock", &card.name).unwrap();
        assert_eq!(
            session.capability_flags(),
            CapabilityFlags::from_names(card.capabilities.iter().copied()).unwrap()
        );
    }
}

#[test]
fn enumeration_is_one_driver_call() {
    let driver = SimDriver::new();
    let probe = driver.clone();
    CardDirectory::new(&driver).supported_drivers();
    assert_eq!(probe.calls(SimOp::CardList), 1);
    assert_eq!(probe.total_calls(), 1);
}

mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn entries_mirror_driver(bits in prop::collection::vec(0u32..0x8000, 0..8)) {
            let cards: Vec<_> = bits
                .iter()
                .enumerate()
                .map(|(i, b)| {
                    SimCardConfig::new(
                        format!("card{}", i),
                        format!("Card {}", i),
                        i as i32 + 1,
                        CapabilityFlags::from_bits(*b),
                    )
                })
                .collect();
            let driver = driver_with_cards(cards);
            let entries: Vec<CardEntry> = CardDirectory::new(&driver).list_cards();

            prop_assert_eq!(entries.len(), bits.len());
            for (entry, b) in entries.iter().zip(&bits) {
                let flags = CapabilityFlags::from_bits(*b);
                prop_assert_eq!(&entry.capabilities, &flags.names());
            }
        }
    }
}

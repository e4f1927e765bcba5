use serde::{Deserialize, Serialize};

/// Sentinel signature used when a log entry carried no topics.
pub const UNKNOWN_EVENT_SIGNATURE: &str = "Unknown Event";

/// An on-chain occurrence that should be reminded about at `next_timestamp`.
///
/// All timestamps are in unix millis. `event_args` is opaque to the rest of
/// the system and passed through verbatim (topics, data, transaction hash,
/// block number / hash).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub id: i64,
    pub contract_address: String,
    pub event_signature: String,
    pub event_args: serde_json::Value,
    pub next_timestamp: i64,
    pub created: i64,
    pub updated: i64,
}

/// The fields of an [`Event`] before the store has assigned an id.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub contract_address: String,
    pub event_signature: String,
    pub event_args: serde_json::Value,
    pub next_timestamp: i64,
    pub created: i64,
    pub updated: i64,
}

impl Event {
    /// Human readable part of the event signature, e.g.
    /// `Transfer(address,address,uint256)` -> `Transfer`
    pub fn event_name(&self) -> &str {
        self.event_signature
            .split('(')
            .next()
            .unwrap_or(&self.event_signature)
    }

    /// Shortened contract address for display, e.g. `0xAbCd...1234`
    pub fn contract_address_short(&self) -> String {
        if self.contract_address.len() < 10 {
            return self.contract_address.clone();
        }
        format!(
            "{}...{}",
            &self.contract_address[..6],
            &self.contract_address[self.contract_address.len() - 4..]
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn event_with_signature(signature: &str) -> Event {
        Event {
            id: 1,
            contract_address: "0x1113322dB8bdd75fD25d27d13023850bE1c2B1e4".into(),
            event_signature: signature.into(),
            event_args: Default::default(),
            next_timestamp: 0,
            created: 0,
            updated: 0,
        }
    }

    #[test]
    fn extracts_event_name_from_signature() {
        let e = event_with_signature("Transfer(address,address,uint256)");
        assert_eq!(e.event_name(), "Transfer");

        let e = event_with_signature(UNKNOWN_EVENT_SIGNATURE);
        assert_eq!(e.event_name(), "Unknown Event");
    }

    #[test]
    fn shortens_contract_address() {
        let e = event_with_signature("Transfer(address,address,uint256)");
        assert_eq!(e.contract_address_short(), "0x1113...B1e4");
    }
}

use builder_api::Network;
use serde::Deserialize;
use std::net::Ipv4Addr;

/// TOML-loaded configuration for one multiplexer process. Every field here
/// is an "external collaborator" per the core's scope: the core itself only
/// ever sees the already-parsed `RelayDirectory`/`HttpClients` built from it.
#[derive(Debug, Deserialize)]
pub struct Config {
    pub host: Ipv4Addr,
    pub port: u16,
    pub network: Network,
    /// `scheme://0x{pubkey}@host:port` entries, one per relay.
    pub relays: Vec<String>,
    /// Passive observers that receive a copy of every registration POST.
    #[serde(default)]
    pub relay_monitors: Vec<String>,
    /// Minimum acceptable declared bid value, in Wei, as a decimal string.
    #[serde(default = "default_minimum_bid_wei")]
    pub minimum_bid_wei: String,
    #[serde(default = "default_header_timeout_ms")]
    pub header_timeout_ms: u64,
    #[serde(default = "default_payload_timeout_ms")]
    pub payload_timeout_ms: u64,
    #[serde(default = "default_registration_timeout_ms")]
    pub registration_timeout_ms: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_minimum_bid_wei() -> String {
    "0".to_string()
}

fn default_header_timeout_ms() -> u64 {
    950
}

fn default_payload_timeout_ms() -> u64 {
    4000
}

fn default_registration_timeout_ms() -> u64 {
    3000
}

fn default_max_retries() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::UNSPECIFIED,
            port: 18550,
            network: Network::Mainnet,
            relays: vec![],
            relay_monitors: vec![],
            minimum_bid_wei: default_minimum_bid_wei(),
            header_timeout_ms: default_header_timeout_ms(),
            payload_timeout_ms: default_payload_timeout_ms(),
            registration_timeout_ms: default_registration_timeout_ms(),
            max_retries: default_max_retries(),
        }
    }
}

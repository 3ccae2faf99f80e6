use crate::{bid_cache::SWEEP_INTERVAL, config::Config, relay::RelayDirectory, relay_mux::RelayMux, server::Server};
use builder_api::Network;
use ethereum_consensus::{ssz::prelude::U256, state_transition::Context};
use std::{net::Ipv4Addr, str::FromStr, time::Duration};

pub struct Service {
    host: Ipv4Addr,
    port: u16,
    relays: RelayDirectory,
    relay_monitors: Vec<String>,
    network: Network,
    minimum_bid: U256,
    header_timeout: Duration,
    payload_timeout: Duration,
    registration_timeout: Duration,
    max_retries: u32,
}

impl Service {
    pub fn from(config: Config) -> Option<Self> {
        let relays = match RelayDirectory::new(config.relays) {
            Ok(relays) => relays,
            Err(err) => {
                tracing::error!(%err, "could not build relay directory; refusing to start");
                return None;
            }
        };
        let minimum_bid = U256::from_str(&config.minimum_bid_wei).unwrap_or_default();

        Some(Self {
            host: config.host,
            port: config.port,
            relays,
            relay_monitors: config.relay_monitors,
            network: config.network,
            minimum_bid,
            header_timeout: Duration::from_millis(config.header_timeout_ms),
            payload_timeout: Duration::from_millis(config.payload_timeout_ms),
            registration_timeout: Duration::from_millis(config.registration_timeout_ms),
            max_retries: config.max_retries,
        })
    }

    pub async fn run(self) {
        let context = match Context::try_from(&self.network) {
            Ok(context) => context,
            Err(err) => {
                tracing::error!(%err, "could not resolve network context; refusing to start");
                return;
            }
        };

        let http = crate::http_client::HttpClients::new(
            self.header_timeout,
            self.payload_timeout,
            self.registration_timeout,
            self.max_retries,
            concat!("relay-mux/", env!("CARGO_PKG_VERSION")),
        );

        let relay_mux = std::sync::Arc::new(RelayMux::new(
            self.relays,
            self.relay_monitors,
            http,
            self.minimum_bid,
            context,
            concat!("relay-mux/", env!("CARGO_PKG_VERSION")).to_string(),
        ));

        let sweeper = relay_mux.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
            loop {
                ticker.tick().await;
                sweeper.sweep_cache();
            }
        });

        let server = Server::new(self.host, self.port, relay_mux);
        if let Err(err) = server.spawn().await {
            tracing::error!(%err, "server task exited unexpectedly");
        }
    }
}

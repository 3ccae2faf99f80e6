//! C7: Registration Broadcaster — fans validator registrations out to every
//! relay, answering the caller as soon as any relay acknowledges, and fires
//! identical POSTs at the configured relay monitors without waiting on them.
use crate::{
    http_client::{CallClass, HttpClients},
    relay::RelayDirectory,
};
use builder_api::types::SignedValidatorRegistration;
use reqwest::Method;
use std::time::{SystemTime, UNIX_EPOCH};

pub struct RegistrationBroadcaster {
    relays: RelayDirectory,
    monitors: Vec<String>,
    http: HttpClients,
    user_agent: String,
}

impl RegistrationBroadcaster {
    pub fn new(relays: RelayDirectory, monitors: Vec<String>, http: HttpClients, user_agent: String) -> Self {
        Self { relays, monitors, http, user_agent }
    }

    /// Returns `Ok(())` if any relay acknowledged with 2xx; otherwise
    /// `Err(())` signals the caller should see a 502.
    pub async fn broadcast(&self, registrations: &[SignedValidatorRegistration]) -> Result<(), ()> {
        let start_time = start_time_header();

        let relay_sends = self.relays.relays().iter().map(|relay| {
            let url = relay.uri("/eth/v1/builder/validators");
            self.send_to(url, registrations, &start_time)
        });
        let results = futures::future::join_all(relay_sends).await;

        self.notify_monitors(registrations, &start_time);

        if results.into_iter().any(|ok| ok) {
            Ok(())
        } else {
            Err(())
        }
    }

    fn notify_monitors(&self, registrations: &[SignedValidatorRegistration], start_time: &str) {
        for monitor in self.monitors.clone() {
            let registrations = registrations.to_vec();
            let http = self.http.clone();
            let user_agent = self.user_agent.clone();
            let start_time = start_time.to_string();
            tokio::spawn(async move {
                let result = http
                    .send_with_headers::<Vec<SignedValidatorRegistration>, serde_json::Value>(
                        CallClass::Registration,
                        Method::POST,
                        &monitor,
                        Some(&user_agent),
                        None,
                        &[("X-Start-Time-Unix-Ms", start_time)],
                        Some(&registrations),
                    )
                    .await;
                if let Err(err) = result {
                    tracing::debug!(%monitor, %err, "relay monitor notification failed");
                }
            });
        }
    }

    async fn send_to(&self, url: String, registrations: &[SignedValidatorRegistration], start_time: &str) -> bool {
        let result = self
            .http
            .send_with_headers::<[SignedValidatorRegistration], serde_json::Value>(
                CallClass::Registration,
                Method::POST,
                &url,
                Some(&self.user_agent),
                None,
                &[("X-Start-Time-Unix-Ms", start_time.to_string())],
                Some(registrations),
            )
            .await;
        match result {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!(%url, %err, "registration broadcast to relay failed");
                false
            }
        }
    }
}

fn start_time_header() -> String {
    let millis = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis()).unwrap_or_default();
    millis.to_string()
}

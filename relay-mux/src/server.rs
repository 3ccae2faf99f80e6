//! C9: Request Router — maps the four external builder API endpoints onto
//! `BlindedBlockProvider`. Generic over the provider so tests can substitute
//! a stub implementation for the production `RelayMux`.
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, IntoMakeService},
    Router,
};
use builder_api::{
    types::{BidRequest, SignedBlindedBeaconBlock, SignedValidatorRegistration, VersionedValue},
    BlindedBlockProvider, Error,
};
use hyper::server::conn::AddrIncoming;
use std::net::{Ipv4Addr, SocketAddr};
use tokio::task::JoinHandle;

pub type RelayMuxServer = axum::Server<AddrIncoming, IntoMakeService<Router>>;

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            Error::CouldNotRegister => StatusCode::BAD_GATEWAY,
            Error::NoSuccessfulRelayResponse => StatusCode::BAD_GATEWAY,
            Error::InvalidSlot(_) | Error::InvalidHash(_) | Error::InvalidPublicKey(_) => StatusCode::BAD_REQUEST,
            Error::Consensus(_) => StatusCode::BAD_REQUEST,
        };
        let body = Json(serde_json::json!({ "code": status.as_u16(), "message": self.to_string() }));
        (status, body).into_response()
    }
}

fn decode_hex_field(value: &str) -> Option<Vec<u8>> {
    hex::decode(value.strip_prefix("0x")?).ok()
}

async fn handle_status<B: BlindedBlockProvider>(State(provider): State<std::sync::Arc<B>>) -> StatusCode {
    if provider.check_status().await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

async fn handle_register_validators<B: BlindedBlockProvider>(
    State(provider): State<std::sync::Arc<B>>,
    Json(registrations): Json<Vec<SignedValidatorRegistration>>,
) -> Result<StatusCode, Error> {
    provider.register_validators(&registrations).await?;
    Ok(StatusCode::OK)
}

async fn handle_fetch_bid<B: BlindedBlockProvider>(
    State(provider): State<std::sync::Arc<B>>,
    Path((slot, parent_hash, public_key)): Path<(String, String, String)>,
) -> Result<axum::response::Response, Error> {
    let slot = slot.parse().map_err(|_| Error::InvalidSlot(slot.clone()))?;
    let parent_hash = decode_hex_field(&parent_hash)
        .and_then(|bytes| ethereum_consensus::primitives::Hash32::try_from(bytes.as_slice()).ok())
        .ok_or_else(|| Error::InvalidHash(parent_hash.clone()))?;
    let public_key = decode_hex_field(&public_key)
        .and_then(|bytes| ethereum_consensus::primitives::BlsPublicKey::try_from(bytes.as_slice()).ok())
        .ok_or_else(|| Error::InvalidPublicKey(public_key.clone()))?;
    let bid_request = BidRequest { slot, parent_hash, public_key };

    match provider.fetch_best_bid(&bid_request).await? {
        Some(bid) => {
            let envelope = VersionedValue { version: "deneb".to_string(), data: bid };
            Ok(Json(envelope).into_response())
        }
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

async fn handle_open_bid<B: BlindedBlockProvider>(
    State(provider): State<std::sync::Arc<B>>,
    Json(signed_block): Json<SignedBlindedBeaconBlock>,
) -> Result<Json<VersionedValue<builder_api::types::ExecutionPayload>>, Error> {
    let payload = provider.open_bid(&signed_block).await?;
    let version = match &signed_block {
        SignedBlindedBeaconBlock::Capella(_) => "capella",
        SignedBlindedBeaconBlock::Deneb(_) => "deneb",
    };
    Ok(Json(VersionedValue { version: version.to_string(), data: payload }))
}

pub struct Server<B> {
    host: Ipv4Addr,
    port: u16,
    provider: std::sync::Arc<B>,
}

impl<B: BlindedBlockProvider + Send + Sync + 'static> Server<B> {
    pub fn new(host: Ipv4Addr, port: u16, provider: B) -> Self {
        Self { host, port, provider: std::sync::Arc::new(provider) }
    }

    pub fn serve(&self) -> RelayMuxServer {
        let router = Router::new()
            .route("/eth/v1/builder/status", get(handle_status::<B>))
            .route("/eth/v1/builder/validators", post(handle_register_validators::<B>))
            .route("/eth/v1/builder/header/:slot/:parent_hash/:public_key", get(handle_fetch_bid::<B>))
            .route("/eth/v1/builder/blinded_blocks", post(handle_open_bid::<B>))
            .with_state(self.provider.clone());
        let addr = SocketAddr::from((self.host, self.port));
        axum::Server::bind(&addr).serve(router.into_make_service())
    }

    pub fn spawn(&self) -> JoinHandle<()> {
        let server = self.serve();
        let address = server.local_addr();
        tokio::spawn(async move {
            tracing::info!(%address, "listening for proposer requests");
            if let Err(err) = server.await {
                tracing::error!(%err, "server exited with an error");
            }
        })
    }
}

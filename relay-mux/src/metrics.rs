//! Prometheus instrumentation for the three upstream call classes plus the
//! auction/redemption-specific counters. The exposition endpoint itself is
//! an external collaborator (§1) and is not wired up here.
use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, HistogramOpts, HistogramVec, IntCounterVec, Opts,
    DEFAULT_BUCKETS,
};

const NAMESPACE: &str = "relay_mux";
const SUBSYSTEM: &str = "builder_api";

const METHOD_LABEL: &str = "method";
const RELAY_LABEL: &str = "relay";

lazy_static! {
    pub static ref API_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        Opts::new("api_requests_total", "total upstream builder API requests issued")
            .namespace(NAMESPACE)
            .subsystem(SUBSYSTEM),
        &[METHOD_LABEL, RELAY_LABEL]
    )
    .unwrap();
    pub static ref API_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        HistogramOpts {
            common_opts: Opts::new("api_request_duration_seconds", "upstream builder API call latency")
                .namespace(NAMESPACE)
                .subsystem(SUBSYSTEM),
            buckets: DEFAULT_BUCKETS.to_vec(),
        },
        &[METHOD_LABEL, RELAY_LABEL]
    )
    .unwrap();
    pub static ref INVALID_BIDS_TOTAL: IntCounterVec = register_int_counter_vec!(
        Opts::new("auction_invalid_bids_total", "bids rejected by the validator, by relay and reason")
            .namespace(NAMESPACE)
            .subsystem(SUBSYSTEM),
        &[RELAY_LABEL, "reason"]
    )
    .unwrap();
    pub static ref WITHHOLDING_EVENTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        Opts::new("redemption_withholding_events_total", "payload requests no relay fulfilled")
            .namespace(NAMESPACE)
            .subsystem(SUBSYSTEM),
        &[RELAY_LABEL]
    )
    .unwrap();
}

#[derive(Copy, Clone, Debug)]
pub enum ApiMethod {
    Register,
    GetHeader,
    GetPayload,
}

impl ApiMethod {
    pub const fn as_str(&self) -> &str {
        match self {
            Self::Register => "register",
            Self::GetHeader => "get_header",
            Self::GetPayload => "get_payload",
        }
    }
}

pub fn observe_request(method: ApiMethod, relay: &str, duration_seconds: f64) {
    API_REQUESTS_TOTAL.with_label_values(&[method.as_str(), relay]).inc();
    API_REQUEST_DURATION_SECONDS.with_label_values(&[method.as_str(), relay]).observe(duration_seconds);
}

pub fn record_invalid_bid(relay: &str, reason: &str) {
    INVALID_BIDS_TOTAL.with_label_values(&[relay, reason]).inc();
}

pub fn record_withholding(relay: &str) {
    WITHHOLDING_EVENTS_TOTAL.with_label_values(&[relay]).inc();
}

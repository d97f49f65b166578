//! Prometheus Metrics for the JSON result encoder
//!
//! Exports metrics for:
//! - Produce call outcomes (payload, empty, soft failure, fatal)
//! - Payload sizes and rows encoded
//! - Encoder resolutions

use once_cell::sync::Lazy;
use prometheus::{
    register_counter, register_counter_vec, register_histogram, Counter, CounterVec, Encoder,
    Histogram, TextEncoder,
};
use tracing::warn;

// ═══════════════════════════════════════════════════════════════════════════
// PAYLOAD METRICS
// ═══════════════════════════════════════════════════════════════════════════

/// Produce calls by outcome
pub static JSON_PAYLOADS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "resultwire_json_payloads_total",
        "Total JSON produce calls by outcome",
        &["outcome"] // "payload", "empty", "soft_failure", "fatal"
    )
    .expect("resultwire_json_payloads_total registers once")
});

/// Size of produced payloads
pub static JSON_PAYLOAD_BYTES: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "resultwire_json_payload_bytes",
        "Size of produced JSON payloads in bytes",
        vec![256.0, 1024.0, 4096.0, 16384.0, 65536.0, 262144.0, 1048576.0, 4194304.0, 16777216.0]
    )
    .expect("resultwire_json_payload_bytes registers once")
});

/// Rows written into delivered payloads
pub static JSON_ROWS_ENCODED_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "resultwire_json_rows_encoded_total",
        "Total rows encoded into delivered JSON payloads"
    )
    .expect("resultwire_json_rows_encoded_total registers once")
});

// ═══════════════════════════════════════════════════════════════════════════
// RESOLUTION METRICS
// ═══════════════════════════════════════════════════════════════════════════

/// Encoder resolutions (one per result-set that carried rows)
pub static ENCODER_RESOLUTIONS_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "resultwire_encoder_resolutions_total",
        "Total type encoder resolutions"
    )
    .expect("resultwire_encoder_resolutions_total registers once")
});

// ═══════════════════════════════════════════════════════════════════════════
// HELPER FUNCTIONS
// ═══════════════════════════════════════════════════════════════════════════

/// Initialize all metrics (call at startup)
pub fn init_metrics() {
    let _ = &*JSON_PAYLOADS_TOTAL;
    let _ = &*JSON_PAYLOAD_BYTES;
    let _ = &*JSON_ROWS_ENCODED_TOTAL;
    let _ = &*ENCODER_RESOLUTIONS_TOTAL;

    for outcome in ["payload", "empty", "soft_failure", "fatal"] {
        JSON_PAYLOADS_TOTAL.with_label_values(&[outcome]).inc_by(0.0);
    }
}

/// Encode all metrics as Prometheus text format
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        warn!("Failed to encode metrics: {}", e);
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Record a delivered payload
pub fn record_payload(bytes: usize, rows: usize) {
    JSON_PAYLOADS_TOTAL.with_label_values(&["payload"]).inc();
    JSON_PAYLOAD_BYTES.observe(bytes as f64);
    JSON_ROWS_ENCODED_TOTAL.inc_by(rows as f64);
}

/// Record a call that delivered nothing
pub fn record_outcome(outcome: &str) {
    JSON_PAYLOADS_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn record_encoder_resolution() {
    ENCODER_RESOLUTIONS_TOTAL.inc();
}

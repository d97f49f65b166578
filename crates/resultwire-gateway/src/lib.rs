//! resultwire Gateway
//!
//! JSON encoding of query results: Arrow batches in, client-ready byte
//! payloads out, with structured logging and Prometheus metrics.

pub mod json_wire;
pub mod metrics;
pub mod telemetry;

pub use json_wire::{
    JsonBytesQueryDataProducer, JsonWireConfig, OutputColumn, QueryData, QueryDataProducer,
    QueryResultRows, RowSource,
};

//! JSON query data producer
//!
//! One producer lives for one result-set. The first call that carries rows
//! resolves the column encoders; every later call reuses them. Each call
//! encodes into its own [`JsonSink`], so a failed call never leaks a partial
//! document:
//!
//! - value-level failure → `Ok(None)` plus one report on the failure callback
//! - generation failure or broken invariant → `Err(..)`

use bytes::Bytes;
use resultwire_common::{Result, ResultWireError, ValueEncodeError};
use tracing::{debug, error, warn};

use super::column::OutputColumn;
use super::config::JsonWireConfig;
use super::resolver::{ArrowTypeResolver, EncoderResolver, ResolvedEncoders};
use super::rows::RowSource;
use super::sink::JsonSink;
use super::writer::{write_batches_to_json, EncodeError};
use crate::metrics;

/// A finished JSON payload, forwarded to the transport unmodified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryData {
    bytes: Bytes,
    row_count: usize,
}

impl QueryData {
    /// Encoding tag advertised to clients
    pub const ENCODING: &'static str = "json";

    pub fn new(bytes: Bytes, row_count: usize) -> Self {
        Self { bytes, row_count }
    }

    pub fn encoding(&self) -> &'static str {
        Self::ENCODING
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }
}

/// Turns fetched rows into client payloads, one call per batch group
pub trait QueryDataProducer {
    /// `Ok(None)` means nothing to send this round, either because there were
    /// no rows or because a value could not be encoded (reported through
    /// `on_failure`).
    fn produce(
        &mut self,
        rows: &dyn RowSource,
        on_failure: &mut dyn FnMut(&ValueEncodeError),
    ) -> Result<Option<QueryData>>;
}

/// Resolution state for one result-set
#[derive(Debug)]
enum EncoderState {
    Uninitialized,
    Resolved(ResolvedEncoders),
}

/// Result of a single encode step
#[derive(Debug)]
pub enum EncodeOutcome {
    Payload(QueryData),
    Empty,
    SoftFailure(ValueEncodeError),
    FatalFailure(ResultWireError),
}

/// Per-producer counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProducerStats {
    pub calls: u64,
    pub payloads: u64,
    pub empty: u64,
    pub soft_failures: u64,
    pub rows_encoded: u64,
    pub bytes_produced: u64,
    pub sinks_acquired: u64,
}

/// Produces JSON byte payloads: `[[v1, v2, ...], ...]`
pub struct JsonBytesQueryDataProducer<R = ArrowTypeResolver> {
    resolver: R,
    config: JsonWireConfig,
    state: EncoderState,
    stats: ProducerStats,
}

impl JsonBytesQueryDataProducer {
    pub fn new(config: JsonWireConfig) -> Self {
        Self::with_resolver(ArrowTypeResolver, config)
    }
}

impl Default for JsonBytesQueryDataProducer {
    fn default() -> Self {
        Self::new(JsonWireConfig::default())
    }
}

impl<R: EncoderResolver> JsonBytesQueryDataProducer<R> {
    pub fn with_resolver(resolver: R, config: JsonWireConfig) -> Self {
        Self {
            resolver,
            config,
            state: EncoderState::Uninitialized,
            stats: ProducerStats::default(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.state, EncoderState::Resolved(_))
    }

    pub fn stats(&self) -> ProducerStats {
        self.stats
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Resolve on first use; afterwards only verify the columns kept their shape
    fn resolve_once(&mut self, columns: &[OutputColumn]) -> Result<()> {
        match &self.state {
            EncoderState::Resolved(resolved) => resolved.check_shape(columns),
            EncoderState::Uninitialized => {
                let resolved = self.resolver.resolve(columns)?;
                debug!(
                    columns = resolved.column_count(),
                    channels = ?resolved.channels(),
                    "Resolved JSON type encoders"
                );
                metrics::record_encoder_resolution();
                self.state = EncoderState::Resolved(resolved);
                Ok(())
            }
        }
    }

    /// Encode one call's rows; `produce` owns the callback and the counters
    fn encode_rows(&mut self, rows: &dyn RowSource) -> EncodeOutcome {
        if rows.is_empty() {
            return EncodeOutcome::Empty;
        }

        let Some(columns) = rows.output_columns() else {
            return EncodeOutcome::FatalFailure(ResultWireError::invariant(
                "Data present without columns",
            ));
        };

        if let Err(e) = self.resolve_once(columns) {
            return EncodeOutcome::FatalFailure(e);
        }
        let EncoderState::Resolved(resolved) = &self.state else {
            return EncodeOutcome::FatalFailure(ResultWireError::invariant(
                "type encoders missing after resolution",
            ));
        };

        // Write to a buffer so a failed call never exposes partial output
        self.stats.sinks_acquired += 1;
        let mut sink = JsonSink::acquire(&self.config);

        match write_batches_to_json(sink.generator(), columns, resolved, rows.batches()) {
            Ok(row_count) => match sink.finish() {
                Ok(bytes) => EncodeOutcome::Payload(QueryData::new(bytes, row_count)),
                Err(e) => EncodeOutcome::FatalFailure(e.into()),
            },
            Err(EncodeError::Value(err)) => {
                let dropped = sink.discard();
                debug!(dropped_bytes = dropped, "Discarded partial JSON payload");
                EncodeOutcome::SoftFailure(err)
            }
            Err(EncodeError::Generation(e)) => EncodeOutcome::FatalFailure(e.into()),
            Err(EncodeError::MissingChannel(message)) => {
                EncodeOutcome::FatalFailure(ResultWireError::InvariantViolation(message))
            }
        }
    }
}

impl<R: EncoderResolver> QueryDataProducer for JsonBytesQueryDataProducer<R> {
    fn produce(
        &mut self,
        rows: &dyn RowSource,
        on_failure: &mut dyn FnMut(&ValueEncodeError),
    ) -> Result<Option<QueryData>> {
        self.stats.calls += 1;

        match self.encode_rows(rows) {
            EncodeOutcome::Payload(data) => {
                self.stats.payloads += 1;
                self.stats.rows_encoded += data.row_count() as u64;
                self.stats.bytes_produced += data.len() as u64;
                metrics::record_payload(data.len(), data.row_count());
                debug!(
                    rows = data.row_count(),
                    bytes = data.len(),
                    "Produced JSON payload"
                );
                Ok(Some(data))
            }
            EncodeOutcome::Empty => {
                self.stats.empty += 1;
                metrics::record_outcome("empty");
                Ok(None)
            }
            EncodeOutcome::SoftFailure(err) => {
                self.stats.soft_failures += 1;
                metrics::record_outcome("soft_failure");
                warn!(
                    batch = err.batch_index,
                    row = err.row_index,
                    column = %err.column_name,
                    code = err.kind.code(),
                    "Could not serialize data to JSON: {}",
                    err
                );
                on_failure(&err);
                Ok(None)
            }
            EncodeOutcome::FatalFailure(err) => {
                metrics::record_outcome("fatal");
                error!(code = err.code(), "JSON payload production failed: {}", err);
                Err(err)
            }
        }
    }
}

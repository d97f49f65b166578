//! JSON result encoding
//!
//! Turns Arrow record batches into compact JSON payloads of the shape
//! `[[v1, v2, ...], ...]` for query clients.
//!
//! ## Module Structure
//!
//! - `config` - Buffer sizing (environment-driven)
//! - `column` - Output column descriptions
//! - `rows` - Row sources handed over by the batching layer
//! - `generator` - Streaming JSON token writer
//! - `type_encoders` - Per-type value rendering
//! - `resolver` - One encoder per output column, resolved once per result-set
//! - `writer` - Batch → document traversal
//! - `sink` - Per-call payload buffer
//! - `producer` - Orchestration and failure policy
//!
//! ## Flow
//!
//! 1. Rows arrive → empty calls return without touching a buffer
//! 2. First non-empty call → resolve type encoders
//! 3. Acquire a sink → write all batches → freeze into a payload
//! 4. A bad cell discards the sink and reports the failure; anything else is fatal

pub mod column;
pub mod config;
pub mod generator;
pub mod producer;
pub mod resolver;
pub mod rows;
pub mod sink;
pub mod type_encoders;
pub mod writer;

pub use column::{output_columns_from_schema, OutputColumn};
pub use config::JsonWireConfig;
pub use producer::{
    EncodeOutcome, JsonBytesQueryDataProducer, ProducerStats, QueryData, QueryDataProducer,
};
pub use resolver::{create_type_encoders, ArrowTypeResolver, EncoderResolver, ResolvedEncoders};
pub use rows::{QueryResultRows, RowSource};
pub use type_encoders::TypeEncoder;

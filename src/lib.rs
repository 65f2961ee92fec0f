//! ## housing-consumer
//! Streams housing records from Kafka, scores each one against a model-serving
//! endpoint and stores the enriched record through a REST API.
//!
//! ## Configuration
//! Built-in defaults run the local demo. Override them with a TOML file passed
//! via `--config`, or with `HOUSING_*` environment variables:
//! ```toml
//! decoder = "json"
//!
//! [kafka]
//! broker = "broker:9092"
//! topic = "housing_topic"
//! consumer_group = "housing-group"
//! auto_offset_reset = "earliest"
//! poll_timeout_ms = 1000
//! connect_timeout_ms = 10000
//!
//! [prediction]
//! url = "http://127.0.0.1:5002/invocations"   # MLflow-style serving endpoint
//! timeout_ms = 10000
//!
//! [storage]
//! url = "http://127.0.0.1:5001/houses"
//! timeout_ms = 10000
//! ```
//! `HOUSING_KAFKA__BROKER=broker:9092` has the same effect as the `broker` line above.
//!
//! ## Processing
//! Messages are handled strictly one at a time, in delivery order. Each one is
//! validated by a [Decoder], turned into a [FeatureVector] and sent to the
//! model; the record plus its estimate is then posted to storage.
//! Every message gets exactly one attempt. A malformed message, an unreachable
//! model or a rejected store drops that message with a log line carrying the
//! reason, and the consumer moves on. Offsets are committed automatically while
//! polling and once more on shutdown.
//!
//! [Decoder]: decoder::Decoder
//! [FeatureVector]: record::FeatureVector

pub mod decoder;
pub mod error;
pub mod ingester;
pub mod pipeline;
pub mod predictor;
pub mod record;
pub mod settings;
pub mod storage;

//! Application config
use std::time::Duration;

use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

/// Kafka side of the consumer
#[derive(Debug, Clone, Deserialize)]
pub struct Kafka {
    /// address of bootstrap kafka broker
    pub broker: String,
    /// topic to consume
    pub topic: String,
    /// consumer group to join
    pub consumer_group: String,
    /// where to start when the group has no committed offset
    pub auto_offset_reset: String,
    /// max wait of a single poll
    pub poll_timeout_ms: u64,
    /// max wait for the broker at startup
    pub connect_timeout_ms: u64,
}

/// An HTTP collaborator
#[derive(Debug, Clone, Deserialize)]
pub struct Endpoint {
    pub url: String,
    /// whole-request timeout
    pub timeout_ms: u64,
}

impl Endpoint {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// name of decoder to use
    pub decoder: String,
    pub kafka: Kafka,
    /// model-serving endpoint
    pub prediction: Endpoint,
    /// storage API create endpoint
    pub storage: Endpoint,
}

impl Kafka {
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

impl Settings {
    /// Layers, lowest priority first: built-in defaults, `config/default`,
    /// `cfgfile` if given, then `HOUSING_*` environment variables
    /// (`HOUSING_KAFKA__BROKER=broker:9092`).
    pub fn new(cfgfile: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder =
            defaults()?.add_source(File::with_name("config/default").required(false));
        if let Some(cfgfile) = cfgfile {
            builder = builder.add_source(File::with_name(cfgfile).required(true));
        }
        builder
            .add_source(
                Environment::with_prefix("HOUSING")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}

/// Values that run the local demo out of the box
fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("decoder", "json")?
        .set_default("kafka.broker", "localhost:29092")?
        .set_default("kafka.topic", "housing_topic")?
        .set_default("kafka.consumer_group", "housing-group")?
        .set_default("kafka.auto_offset_reset", "earliest")?
        .set_default("kafka.poll_timeout_ms", 1000_i64)?
        .set_default("kafka.connect_timeout_ms", 10000_i64)?
        .set_default("prediction.url", "http://127.0.0.1:5002/invocations")?
        .set_default("prediction.timeout_ms", 10000_i64)?
        .set_default("storage.url", "http://127.0.0.1:5001/houses")?
        .set_default("storage.timeout_ms", 10000_i64)
}

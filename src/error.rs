use rdkafka::error::KafkaError;
use reqwest::StatusCode;
use thiserror::Error;

/// Payload could not be read as JSON text.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("payload is not well-formed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Payload is JSON but not a housing record.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("invalid field: {0}")]
    InvalidField(serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// The model-serving endpoint could not produce an estimate.
#[derive(Error, Debug)]
pub enum PredictionUnavailable {
    #[error("prediction request failed: {0}")]
    Request(reqwest::Error),
    #[error("prediction endpoint answered {0}")]
    Status(StatusCode),
    #[error("unreadable prediction response: {0}")]
    Response(reqwest::Error),
    #[error("prediction response contained no predictions")]
    Empty,
}

/// The storage API did not accept the record.
#[derive(Error, Debug)]
pub enum StorageUnavailable {
    #[error("storage request failed: {0}")]
    Request(reqwest::Error),
    #[error(
        "storage endpoint answered {status}: {}",
        .message.as_deref().unwrap_or("no error message")
    )]
    Rejected {
        status: StatusCode,
        message: Option<String>,
    },
}

/// Reason a single message was dropped. Never fatal to the consumer.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Prediction(#[from] PredictionUnavailable),
    #[error(transparent)]
    Storage(#[from] StorageUnavailable),
}

impl ProcessError {
    pub fn kind(&self) -> &'static str {
        match self {
            ProcessError::Validation(ValidationError::Decode(_)) => "DecodeError",
            ProcessError::Validation(ValidationError::Schema(_)) => "SchemaError",
            ProcessError::Prediction(_) => "PredictionUnavailable",
            ProcessError::Storage(_) => "StorageUnavailable",
        }
    }
}

/// Errors that stop the consumer: startup and shutdown only.
#[derive(Error, Debug)]
pub enum IngesterError {
    #[error("invalid {name} url {url:?}: {reason}")]
    InvalidUrl {
        name: &'static str,
        url: String,
        reason: String,
    },
    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("unknown decoder {0}")]
    UnknownDecoder(String),
    #[error("failed to connect to kafka: {0}")]
    Connect(KafkaError),
    #[error("kafka connection check did not finish: {0}")]
    ConnectAborted(tokio::task::JoinError),
    #[error("failed to commit offsets on shutdown: {0}")]
    Commit(KafkaError),
}

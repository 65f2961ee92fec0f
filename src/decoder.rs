//! Manages decoders
pub mod json;

use std::sync::Arc;

use crate::{error::ValidationError, record::HousingRecord};

/// Decoder converts binary message from Kafka into a validated housing record
pub trait Decoder {
    fn get_name(&self) -> String;
    fn decode(&self, message: &[u8]) -> Result<HousingRecord, ValidationError>;
}

/// Creates decoder of specified name.
/// If you add your own decoders, register them here
pub fn get_decoder(name: &str) -> Option<Arc<dyn Decoder + Send + Sync>> {
    match name {
        "json" => Some(Arc::new(json::Decoder)),
        _ => None,
    }
}

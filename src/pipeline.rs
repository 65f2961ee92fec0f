//! Single message pass: validate, predict, store
use std::sync::Arc;

use tracing::debug;

use crate::{
    decoder::Decoder,
    error::ProcessError,
    predictor::PredictionClient,
    record::EnrichedRecord,
    storage::{StorageAck, StorageClient},
};

/// A message that made it all the way to storage
#[derive(Debug)]
pub struct Stored {
    pub record: EnrichedRecord,
    pub ack: StorageAck,
}

pub struct Pipeline {
    decoder: Arc<dyn Decoder + Send + Sync>,
    predictor: PredictionClient,
    storage: StorageClient,
}

impl Pipeline {
    pub fn new(
        decoder: Arc<dyn Decoder + Send + Sync>,
        predictor: PredictionClient,
        storage: StorageClient,
    ) -> Pipeline {
        Pipeline {
            decoder,
            predictor,
            storage,
        }
    }

    /// Runs one payload through the three steps, stopping at the first failure.
    /// A record is never stored without its own estimate.
    pub async fn process(&self, payload: &[u8]) -> Result<Stored, ProcessError> {
        let record = self.decoder.decode(payload)?;
        debug!(decoder = %self.decoder.get_name(), ?record, "message validated");

        let estimate = self.predictor.predict(&record.features()).await?;
        debug!(estimate, "message scored");

        let record = record.enrich(estimate);
        let ack = self.storage.store(&record).await?;
        Ok(Stored { record, ack })
    }
}

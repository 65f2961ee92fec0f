use std::{collections::BTreeMap, time::Duration};

use rdkafka::{
    consumer::{CommitMode, Consumer, StreamConsumer},
    error::{KafkaError, KafkaResult},
    message::OwnedMessage,
    types::RDKafkaErrorCode,
    ClientConfig, Message,
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::{
    decoder::get_decoder,
    error::IngesterError,
    pipeline::Pipeline,
    predictor::PredictionClient,
    settings::Settings,
    storage::StorageClient,
};

/// Life-cycle of the consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Starting,
    Running,
    Draining,
    Closed,
}

/// Counters for a single run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Stats {
    pub stored: u64,
    /// dropped messages by reason
    pub dropped: BTreeMap<&'static str, u64>,
    pub empty: u64,
    pub transport_errors: u64,
}

impl Stats {
    pub fn dropped_total(&self) -> u64 {
        self.dropped.values().sum()
    }
}

/// Consumes one topic and pushes every message through the [Pipeline], one at a time.
pub struct Ingester {
    consumer: StreamConsumer,
    topic: String,
    poll_timeout: Duration,
    pipeline: Pipeline,
    shutdown: CancellationToken,
    state: State,
    stats: Stats,
}

impl Ingester {
    /// Builds the HTTP clients, connects to the broker and subscribes.
    /// Any failure here is fatal.
    pub async fn new(
        settings: &Settings,
        shutdown: CancellationToken,
    ) -> Result<Ingester, IngesterError> {
        info!(
            state = ?State::Starting,
            broker = %settings.kafka.broker,
            topic = %settings.kafka.topic,
            "starting consumer"
        );

        let decoder = get_decoder(&settings.decoder)
            .ok_or_else(|| IngesterError::UnknownDecoder(settings.decoder.clone()))?;
        let predictor =
            PredictionClient::new(&settings.prediction.url, settings.prediction.timeout())?;
        let storage = StorageClient::new(&settings.storage.url, settings.storage.timeout())?;

        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", &settings.kafka.broker)
            .set("group.id", &settings.kafka.consumer_group)
            .set("auto.offset.reset", &settings.kafka.auto_offset_reset)
            .set("enable.auto.commit", "true")
            .create()
            .map_err(IngesterError::Connect)?;
        // librdkafka connects lazily, a metadata round trip proves the broker is there.
        // It blocks for up to the connect timeout, so it runs off the async workers.
        let topic = settings.kafka.topic.clone();
        let connect_timeout = settings.kafka.connect_timeout();
        let consumer = tokio::task::spawn_blocking(move || -> KafkaResult<StreamConsumer> {
            consumer.fetch_metadata(Some(&topic), connect_timeout)?;
            Ok(consumer)
        })
        .await
        .map_err(IngesterError::ConnectAborted)?
        .map_err(IngesterError::Connect)?;
        consumer
            .subscribe(&[settings.kafka.topic.as_str()])
            .map_err(IngesterError::Connect)?;

        Ok(Ingester {
            consumer,
            topic: settings.kafka.topic.clone(),
            poll_timeout: settings.kafka.poll_timeout(),
            pipeline: Pipeline::new(decoder, predictor, storage),
            shutdown,
            state: State::Starting,
            stats: Stats::default(),
        })
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Polls until the shutdown token is cancelled, then drains and closes.
    /// Only a failed final commit makes this return an error; per-message
    /// failures are logged and the message is dropped.
    pub async fn run(&mut self) -> Result<(), IngesterError> {
        self.transition(State::Running);
        loop {
            let polled = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                polled = tokio::time::timeout(self.poll_timeout, self.consumer.recv()) => polled,
            };
            match polled {
                // nothing arrived within the poll window
                Err(_) => continue,
                Ok(polled) => {
                    let polled = polled.map(|msg| msg.detach());
                    self.on_poll(polled).await;
                }
            }
        }
        self.transition(State::Draining);
        self.close()
    }

    /// A broker-side error is transient: count it and keep polling.
    async fn on_poll(&mut self, polled: KafkaResult<OwnedMessage>) {
        match polled {
            Err(e) => {
                warn!(reason = "TransportError", error = %e, "error receiving message");
                self.stats.transport_errors += 1;
            }
            Ok(msg) => self.handle(msg).await,
        }
    }

    async fn handle(&mut self, msg: OwnedMessage) {
        let (partition, offset) = (msg.partition(), msg.offset());
        let payload = match msg.payload() {
            Some(p) if !p.is_empty() => p,
            _ => {
                warn!(partition, offset, "empty message, skipping");
                self.stats.empty += 1;
                return;
            }
        };

        match self.pipeline.process(payload).await {
            Ok(stored) => {
                info!(
                    partition,
                    offset,
                    estimate = stored.record.estimated_median_house_value,
                    id = ?stored.ack.id,
                    ack = ?stored.ack.message,
                    "record stored"
                );
                self.stats.stored += 1;
            }
            Err(e) => {
                warn!(
                    partition,
                    offset,
                    reason = e.kind(),
                    error = %e,
                    payload = %String::from_utf8_lossy(payload),
                    "message dropped"
                );
                *self.stats.dropped.entry(e.kind()).or_default() += 1;
            }
        }
    }

    /// Commits the consumed position and leaves the group. Unsubscribing
    /// happens whether or not the commit succeeds.
    fn close(&mut self) -> Result<(), IngesterError> {
        let committed = match self.consumer.commit_consumer_state(CommitMode::Sync) {
            Err(KafkaError::ConsumerCommit(RDKafkaErrorCode::NoOffset)) => Ok(()),
            other => other,
        };
        if let Err(e) = &committed {
            error!(error = %e, "failed to commit offsets on shutdown");
        }
        self.consumer.unsubscribe();
        self.transition(State::Closed);
        info!(
            topic = %self.topic,
            stored = self.stats.stored,
            dropped = self.stats.dropped_total(),
            empty = self.stats.empty,
            transport_errors = self.stats.transport_errors,
            "consumer closed"
        );
        committed.map_err(IngesterError::Commit)
    }

    fn transition(&mut self, next: State) {
        info!(from = ?self.state, to = ?next, "consumer state changed");
        self.state = next;
    }
}

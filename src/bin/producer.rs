//! Publishes a sample housing record to the topic, for trying the consumer locally.
use std::time::Duration;

use anyhow::{anyhow, Context};
use clap::Parser;
use housing_consumer::record::{HousingRecord, OceanProximity};
use rdkafka::{
    producer::{FutureProducer, FutureRecord, Producer},
    ClientConfig,
};
use tracing::info;

#[doc(hidden)]
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "localhost:29092")]
    broker: String,
    #[arg(short, long, default_value = "housing_topic")]
    topic: String,
    /// number of messages to send
    #[arg(short = 'n', long, default_value_t = 5)]
    count: u32,
    /// pause between messages
    #[arg(short, long, default_value_t = 1000)]
    interval_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let producer: FutureProducer = ClientConfig::new()
        .set("bootstrap.servers", &args.broker)
        .set("message.timeout.ms", "5000")
        .create()
        .context("failed to create producer")?;

    let record = HousingRecord {
        longitude: -122.23,
        latitude: 37.88,
        housing_median_age: 52,
        total_rooms: 880,
        total_bedrooms: 129,
        population: 322,
        households: 126,
        median_income: 8.3252,
        median_house_value: 358500.0,
        ocean_proximity: OceanProximity::NearBay,
    };
    let payload = serde_json::to_vec(&record)?;

    for i in 0..args.count {
        let key = i.to_string();
        let (partition, offset) = producer
            .send(
                FutureRecord::to(&args.topic).key(&key).payload(&payload),
                Duration::from_secs(5),
            )
            .await
            .map_err(|(e, _)| anyhow!("failed to send message {i}: {e}"))?;
        producer
            .flush(Duration::from_secs(5))
            .context("failed to flush producer")?;
        info!(key = %key, partition, offset, "message sent");

        if i + 1 < args.count {
            tokio::time::sleep(Duration::from_millis(args.interval_ms)).await;
        }
    }
    Ok(())
}

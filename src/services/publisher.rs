use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::config::KafkaConfig;
use crate::error::{AppError, Result};
use crate::repositories::{OutboxEntry, OutboxRepository};

/// Destination for derived work events.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn publish(&self, key: &str, payload: &[u8]) -> Result<()>;
}

pub struct KafkaEventSink {
    producer: FutureProducer,
    topic: String,
}

impl KafkaEventSink {
    pub fn new(config: &KafkaConfig) -> Result<Self> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("message.timeout.ms", "5000")
            .create()
            .map_err(|e| AppError::Kafka(format!("Failed to create producer: {}", e)))?;

        Ok(Self {
            producer,
            topic: config.work_event_topic.clone(),
        })
    }
}

#[async_trait]
impl EventSink for KafkaEventSink {
    async fn publish(&self, key: &str, payload: &[u8]) -> Result<()> {
        let record = FutureRecord::to(&self.topic).key(key).payload(payload);

        match self
            .producer
            .send(record, Timeout::After(Duration::from_secs(5)))
            .await
        {
            Ok((_partition, _offset)) => {
                debug!(topic = %self.topic, key = key, "work event published");
                Ok(())
            }
            Err((e, _message)) => Err(AppError::Kafka(format!("Publish error: {}", e))),
        }
    }
}

/// Drains pending outbox entries to the event sink. Runs detached from the
/// ingestion path: a delivery failure only marks the entry for retry.
pub struct OutboxPublisher {
    outbox: OutboxRepository,
    sink: Arc<dyn EventSink>,
    poll_interval: Duration,
    batch_size: i64,
}

impl OutboxPublisher {
    pub fn new(
        outbox: OutboxRepository,
        sink: Arc<dyn EventSink>,
        poll_interval_secs: u64,
        batch_size: i64,
    ) -> Self {
        Self {
            outbox,
            sink,
            poll_interval: Duration::from_secs(poll_interval_secs),
            batch_size,
        }
    }

    pub async fn run(self) {
        info!("Starting outbox publisher");

        loop {
            match self.process_pending().await {
                Ok(published) => {
                    if published > 0 {
                        info!("Published {} outbox entries", published);
                    }
                }
                Err(e) => {
                    error!("Error processing outbox entries: {}", e);
                }
            }

            sleep(self.poll_interval).await;
        }
    }

    pub async fn process_pending(&self) -> Result<usize> {
        let entries = self.outbox.get_pending(self.batch_size).await?;
        let mut published = 0;

        for entry in &entries {
            match self.publish_entry(entry).await {
                Ok(()) => {
                    self.outbox.mark_published(entry.id).await?;
                    published += 1;
                }
                Err(e) => {
                    if entry.retry_count + 1 >= entry.max_retries {
                        warn!(
                            entry_id = entry.id,
                            max_retries = entry.max_retries,
                            "outbox entry exceeded max retries, marking as failed"
                        );
                        self.outbox.mark_failed(entry.id, &e.to_string()).await?;
                    } else {
                        warn!(
                            entry_id = entry.id,
                            retry_count = entry.retry_count + 1,
                            "publish failed, will retry: {}",
                            e
                        );
                        self.outbox.increment_retry(entry.id, &e.to_string()).await?;
                    }
                }
            }
        }

        Ok(published)
    }

    async fn publish_entry(&self, entry: &OutboxEntry) -> Result<()> {
        let payload = serde_json::to_vec(&entry.payload)?;
        self.sink.publish(&entry.aggregate_id, &payload).await
    }
}

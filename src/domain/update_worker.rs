//! Queue workers that serialize every write into the [`MappingStore`].
//!
//! The refresh pipeline never touches the store directly. It pushes new
//! mappings and error states onto two queues, each drained by exactly one
//! worker task, so replacements are totally ordered and never race.
//!
//! Every queued item carries an acknowledgement channel; the producer can
//! await it to know the update is visible to readers.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::domain::mapping::{LastError, Mapping, MappingStore};

/// A queued store update together with its acknowledgement.
#[derive(Debug)]
pub struct Update<T> {
    pub payload: T,
    applied: oneshot::Sender<()>,
}

impl<T> Update<T> {
    fn new(payload: T) -> (Self, oneshot::Receiver<()>) {
        let (applied, rx) = oneshot::channel();
        (Self { payload, applied }, rx)
    }

    /// Splits the update; the returned sender must be fired once applied.
    pub fn into_parts(self) -> (T, oneshot::Sender<()>) {
        (self.payload, self.applied)
    }
}

/// The worker for a queue has stopped, so updates can no longer be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("update queue is closed")]
pub struct QueueClosed;

/// Producer side of the two update queues.
#[derive(Debug, Clone)]
pub struct UpdateSender {
    mappings: mpsc::Sender<Update<Mapping>>,
    errors: mpsc::Sender<Update<LastError>>,
}

impl UpdateSender {
    /// Wraps existing channel senders (the caller owns the workers).
    pub fn new(
        mappings: mpsc::Sender<Update<Mapping>>,
        errors: mpsc::Sender<Update<LastError>>,
    ) -> Self {
        Self { mappings, errors }
    }

    /// Creates both queues and spawns one worker per queue.
    pub fn spawn(store: Arc<MappingStore>, capacity: usize) -> Self {
        let (mapping_tx, mapping_rx) = mpsc::channel(capacity);
        let (error_tx, error_rx) = mpsc::channel(capacity);

        tokio::spawn(run_mapping_worker(mapping_rx, store.clone()));
        tokio::spawn(run_error_worker(error_rx, store));

        Self::new(mapping_tx, error_tx)
    }

    /// Queues a complete mapping and waits until readers can see it.
    pub async fn publish_mapping(&self, mapping: Mapping) -> Result<(), QueueClosed> {
        let (update, applied) = Update::new(mapping);
        self.mappings.send(update).await.map_err(|_| QueueClosed)?;
        applied.await.map_err(|_| QueueClosed)
    }

    /// Queues a new last-error state (`None` clears it) and waits until it
    /// is recorded.
    pub async fn record_error(&self, error: LastError) -> Result<(), QueueClosed> {
        let (update, applied) = Update::new(error);
        self.errors.send(update).await.map_err(|_| QueueClosed)?;
        applied.await.map_err(|_| QueueClosed)
    }

    /// Whether both workers are still running.
    pub fn is_open(&self) -> bool {
        !self.mappings.is_closed() && !self.errors.is_closed()
    }
}

/// Drains the mapping queue, swapping each mapping into the store.
pub async fn run_mapping_worker(mut rx: mpsc::Receiver<Update<Mapping>>, store: Arc<MappingStore>) {
    while let Some(update) = rx.recv().await {
        let (mapping, applied) = update.into_parts();
        let entries = mapping.len();
        store.update_mapping(mapping);
        info!(entries, "Updated redirect mapping");

        if applied.send(()).is_err() {
            debug!("Mapping update producer went away before acknowledgement");
        }
    }

    debug!("Mapping queue closed, worker stopping");
}

/// Drains the error queue, recording each state in the store.
pub async fn run_error_worker(mut rx: mpsc::Receiver<Update<LastError>>, store: Arc<MappingStore>) {
    while let Some(update) = rx.recv().await {
        let (error, applied) = update.into_parts();
        if let Some(err) = &error {
            warn!(error = %err, "Recording refresh error");
        }
        store.set_last_error(error);

        if applied.send(()).is_err() {
            debug!("Error update producer went away before acknowledgement");
        }
    }

    debug!("Error queue closed, worker stopping");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::data_source::SourceError;

    fn mapping(entries: &[(&str, &str)]) -> Mapping {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_published_mapping_is_visible_after_ack() {
        let store = Arc::new(MappingStore::new());
        let sender = UpdateSender::spawn(store.clone(), 4);

        sender
            .publish_mapping(mapping(&[("docs", "https://example.com/docs")]))
            .await
            .unwrap();

        assert_eq!(store.size(), 1);
        assert_eq!(
            store.get_target("docs").as_deref(),
            Some("https://example.com/docs")
        );
    }

    #[tokio::test]
    async fn test_mappings_are_applied_in_order() {
        let store = Arc::new(MappingStore::new());
        let sender = UpdateSender::spawn(store.clone(), 4);

        for generation in 0..10 {
            let target = format!("https://example.com/{generation}");
            sender
                .publish_mapping(mapping(&[("k", target.as_str())]))
                .await
                .unwrap();
        }

        assert_eq!(store.get_target("k").as_deref(), Some("https://example.com/9"));
    }

    #[tokio::test]
    async fn test_error_is_recorded_and_cleared() {
        let store = Arc::new(MappingStore::new());
        let sender = UpdateSender::spawn(store.clone(), 4);

        sender
            .record_error(Some(Arc::new(SourceError::Unavailable("down".into()))))
            .await
            .unwrap();
        assert!(store.last_error().is_some());

        sender.record_error(None).await.unwrap();
        assert!(store.last_error().is_none());
    }

    #[tokio::test]
    async fn test_closed_queue_reports_error() {
        let (mapping_tx, mapping_rx) = mpsc::channel(1);
        let (error_tx, error_rx) = mpsc::channel(1);
        drop(mapping_rx);
        drop(error_rx);

        let sender = UpdateSender::new(mapping_tx, error_tx);

        assert!(!sender.is_open());
        assert_eq!(sender.publish_mapping(Mapping::new()).await, Err(QueueClosed));
        assert_eq!(sender.record_error(None).await, Err(QueueClosed));
    }

    #[tokio::test]
    async fn test_workers_survive_abandoned_acknowledgements() {
        let store = Arc::new(MappingStore::new());
        let (mapping_tx, mapping_rx) = mpsc::channel(4);
        let (error_tx, error_rx) = mpsc::channel(4);
        tokio::spawn(run_mapping_worker(mapping_rx, store.clone()));
        tokio::spawn(run_error_worker(error_rx, store.clone()));

        // Producers that stop waiting before the update is applied.
        let (update, applied) = Update::new(mapping(&[("a", "https://a")]));
        drop(applied);
        mapping_tx.send(update).await.unwrap();
        let (update, applied) = Update::new(Some(Arc::new(SourceError::Unavailable("x".into()))));
        drop(applied);
        error_tx.send(update).await.unwrap();

        let sender = UpdateSender::new(mapping_tx, error_tx);
        sender
            .publish_mapping(mapping(&[("b", "https://b")]))
            .await
            .unwrap();
        sender.record_error(None).await.unwrap();

        assert!(sender.is_open());
        assert_eq!(store.get_target("b").as_deref(), Some("https://b"));
        assert!(store.last_error().is_none());
    }
}

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::db::{ChangeEvent, Store};

use super::loader::{DashboardData, LoadError, Loader, Snapshot};

/// Progress of a background load, as seen by the UI loop. Loads are numbered
/// in the order they start.
#[derive(Debug)]
pub enum FeedEvent {
    LoadStarted(u64),
    LoadFinished(u64, Result<Snapshot, LoadError>),
}

/// A mounted dashboard subscription.
///
/// Mounting spawns the first load and a listener that waits for the change
/// stream, then reloads everything on every change. Dropping the feed stops
/// the listener; loads already running finish but their results go nowhere.
pub struct DashboardFeed<S: Store> {
    loader: Loader<S>,
    generation: Arc<AtomicU64>,
    tx: mpsc::UnboundedSender<FeedEvent>,
    rx: mpsc::UnboundedReceiver<FeedEvent>,
    listener: JoinHandle<()>,
}

fn spawn_load<S: Store>(loader: Loader<S>, generation: &AtomicU64, tx: mpsc::UnboundedSender<FeedEvent>) {
    let generation = generation.fetch_add(1, Ordering::SeqCst) + 1;
    if tx.send(FeedEvent::LoadStarted(generation)).is_err() {
        return;
    }
    tokio::spawn(async move {
        let outcome = loader.fetch().await;
        if tx.send(FeedEvent::LoadFinished(generation, outcome)).is_err() {
            tracing::debug!(generation, "dashboard unmounted, discarding load result");
        }
    });
}

impl<S: Store> DashboardFeed<S> {
    /// `changes` resolves to the change stream, or `None` when there is
    /// none; it runs on the listener task so mounting never waits on it.
    pub fn mount<F>(loader: Loader<S>, changes: F, auto_sync: Arc<AtomicBool>) -> Self
    where
        F: Future<Output = Option<mpsc::Receiver<ChangeEvent>>> + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let generation = Arc::new(AtomicU64::new(0));

        spawn_load(loader.clone(), &generation, tx.clone());

        let listener = {
            let loader = loader.clone();
            let generation = Arc::clone(&generation);
            let tx = tx.clone();
            tokio::spawn(async move {
                let Some(mut changes) = changes.await else {
                    return;
                };
                while let Some(event) = changes.recv().await {
                    if !auto_sync.load(Ordering::Relaxed) {
                        tracing::debug!(kind = ?event.kind, "auto sync off, ignoring change");
                        continue;
                    }
                    tracing::info!(table = %event.table, kind = ?event.kind, "reloading after change");
                    spawn_load(loader.clone(), &generation, tx.clone());
                }
            })
        };

        Self {
            loader,
            generation,
            tx,
            rx,
            listener,
        }
    }

    /// Run the same full load again.
    pub fn refresh(&self) {
        spawn_load(self.loader.clone(), &self.generation, self.tx.clone());
    }

    /// Apply every event that has arrived so far. Returns how many were
    /// applied.
    pub fn drain_into(&mut self, data: &mut DashboardData) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.rx.try_recv() {
            apply(data, event);
            applied += 1;
        }
        applied
    }
}

fn apply(data: &mut DashboardData, event: FeedEvent) {
    match event {
        FeedEvent::LoadStarted(_) => data.begin_load(),
        FeedEvent::LoadFinished(generation, outcome) => data.finish_load(generation, outcome),
    }
}

impl<S: Store> Drop for DashboardFeed<S> {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::future::{pending, ready};
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use super::*;
    use crate::auth::{AuthError, Session};
    use crate::db::changes::ChangeKind;
    use crate::db::{MemoryStore, StoreError, Table};
    use crate::models::{Asset, Client, Invoice, LeadIntake, Message, Payment, Project};
    use crate::sync::collection::DataSource;
    use crate::sync::loader::{Dataset, LOAD_ERROR_MESSAGE};
    use crate::sync::seed;

    fn change() -> ChangeEvent {
        ChangeEvent {
            table: "projects".to_string(),
            kind: ChangeKind::Update,
        }
    }

    fn client(id: &str, name: &str) -> Client {
        let mut client = seed::clients()[1].clone();
        client.id = id.to_string();
        client.name = name.to_string();
        client
    }

    fn auto_sync(on: bool) -> Arc<AtomicBool> {
        Arc::new(AtomicBool::new(on))
    }

    fn mount<S: Store>(store: Arc<S>) -> DashboardFeed<S> {
        DashboardFeed::mount(Loader::new(store), ready(None), auto_sync(true))
    }

    async fn next<S: Store>(feed: &mut DashboardFeed<S>, data: &mut DashboardData) {
        let event = tokio::time::timeout(Duration::from_secs(1), feed.rx.recv())
            .await
            .expect("feed event")
            .expect("feed open");
        apply(data, event);
    }

    /// Apply one load's started and finished events.
    async fn settle<S: Store>(feed: &mut DashboardFeed<S>, data: &mut DashboardData) {
        next(feed, data).await;
        next(feed, data).await;
    }

    /// Serves "OLD" clients slowly on the first read and "NEW" ones at once
    /// afterwards.
    #[derive(Default)]
    struct SlowFirstRead {
        inner: MemoryStore,
        client_reads: AtomicUsize,
    }

    impl Store for SlowFirstRead {
        async fn fetch_projects(&self) -> Result<Vec<Project>, StoreError> {
            self.inner.fetch_projects().await
        }

        async fn fetch_clients(&self) -> Result<Vec<Client>, StoreError> {
            if self.client_reads.fetch_add(1, Ordering::SeqCst) == 0 {
                tokio::time::sleep(Duration::from_millis(200)).await;
                return Ok(vec![client("r1", "OLD")]);
            }
            Ok(vec![client("r1", "NEW")])
        }

        async fn fetch_leads(&self) -> Result<Vec<LeadIntake>, StoreError> {
            self.inner.fetch_leads().await
        }

        async fn fetch_assets(&self) -> Result<Vec<Asset>, StoreError> {
            self.inner.fetch_assets().await
        }

        async fn fetch_invoices(&self) -> Result<Vec<Invoice>, StoreError> {
            self.inner.fetch_invoices().await
        }

        async fn fetch_payments(&self) -> Result<Vec<Payment>, StoreError> {
            self.inner.fetch_payments().await
        }

        async fn fetch_messages(&self, client_id: &str) -> Result<Vec<Message>, StoreError> {
            self.inner.fetch_messages(client_id).await
        }

        async fn insert_message(&self, message: &Message) -> Result<(), StoreError> {
            self.inner.insert_message(message).await
        }

        async fn insert_payment(&self, payment: &Payment) -> Result<(), StoreError> {
            self.inner.insert_payment(payment).await
        }

        async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
            self.inner.sign_in(email, password).await
        }
    }

    #[tokio::test]
    async fn mount_runs_the_first_load() {
        let store = Arc::new(MemoryStore::new().with_projects(seed::projects()));
        let mut feed = mount(store);
        let mut data = DashboardData::default();

        next(&mut feed, &mut data).await;
        assert!(data.is_loading());

        next(&mut feed, &mut data).await;
        assert!(!data.is_loading());
        assert_eq!(data.source(Dataset::Projects), DataSource::Remote);
    }

    #[tokio::test]
    async fn empty_remote_clients_render_the_seed_list() {
        let mut feed = mount(Arc::new(MemoryStore::new()));
        let mut data = DashboardData::default();

        settle(&mut feed, &mut data).await;

        assert_eq!(data.clients(), seed::clients().as_slice());
        assert_eq!(data.source(Dataset::Clients), DataSource::SeedForEmpty);
        assert!(data.error().is_none());
        assert!(!data.is_loading());
    }

    #[tokio::test]
    async fn fallback_is_per_entity_type() {
        let remote = vec![client("r1", "Remote Artist")];
        let mut feed = mount(Arc::new(MemoryStore::new().with_clients(remote.clone())));
        let mut data = DashboardData::default();

        settle(&mut feed, &mut data).await;

        assert_eq!(data.clients(), remote.as_slice());
        assert_eq!(data.projects(), seed::projects());
        assert_eq!(data.source(Dataset::Clients), DataSource::Remote);
        assert_eq!(data.source(Dataset::Projects), DataSource::SeedForEmpty);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_collections() {
        let remote = vec![
            client("r1", "One"),
            client("r2", "Two"),
            client("r3", "Three"),
        ];
        let store = Arc::new(MemoryStore::new().with_clients(remote));
        let mut feed = mount(Arc::clone(&store));
        let mut data = DashboardData::default();

        settle(&mut feed, &mut data).await;
        assert_eq!(data.clients().len(), 3);

        store.fail(Table::Projects);
        feed.refresh();
        settle(&mut feed, &mut data).await;

        assert_eq!(data.clients().len(), 3);
        assert_eq!(data.clients()[0].name, "One");
        assert_eq!(data.error(), Some(LOAD_ERROR_MESSAGE));
        assert!(!data.is_loading());

        store.recover(Table::Projects);
        feed.refresh();
        settle(&mut feed, &mut data).await;
        assert!(data.error().is_none());
    }

    #[tokio::test]
    async fn one_rejected_read_applies_nothing() {
        let store = Arc::new(MemoryStore::new().with_clients(vec![client("r1", "One")]));
        store.fail(Table::Invoices);
        let mut feed = mount(store);
        let mut data = DashboardData::default();

        settle(&mut feed, &mut data).await;

        assert_eq!(data.source(Dataset::Clients), DataSource::SeedWhileLoading);
        assert_eq!(data.source(Dataset::Invoices), DataSource::SeedWhileLoading);
        assert!(!data.is_loading());
        assert_eq!(data.error(), Some(LOAD_ERROR_MESSAGE));
    }

    #[tokio::test]
    async fn any_change_reloads_everything() {
        let store = Arc::new(MemoryStore::new());
        let (change_tx, change_rx) = mpsc::channel(4);
        let mut feed = DashboardFeed::mount(
            Loader::new(Arc::clone(&store)),
            ready(Some(change_rx)),
            auto_sync(true),
        );
        let mut data = DashboardData::default();
        settle(&mut feed, &mut data).await;
        assert_eq!(data.source(Dataset::Clients), DataSource::SeedForEmpty);

        store.fail(Table::Leads);
        change_tx
            .send(ChangeEvent {
                table: "projects".to_string(),
                kind: ChangeKind::Unknown,
            })
            .await
            .unwrap();
        settle(&mut feed, &mut data).await;

        assert_eq!(data.error(), Some(LOAD_ERROR_MESSAGE));
        assert!(!data.is_loading());
    }

    #[tokio::test]
    async fn slow_first_load_does_not_overwrite_the_reload_after_a_change() {
        let (change_tx, change_rx) = mpsc::channel(4);
        let mut feed = DashboardFeed::mount(
            Loader::new(Arc::new(SlowFirstRead::default())),
            ready(Some(change_rx)),
            auto_sync(true),
        );
        let mut data = DashboardData::default();
        next(&mut feed, &mut data).await;
        tokio::time::sleep(Duration::from_millis(20)).await;

        change_tx.send(change()).await.unwrap();
        next(&mut feed, &mut data).await;
        settle(&mut feed, &mut data).await;

        assert_eq!(data.clients()[0].name, "NEW");
        assert!(!data.is_loading());
        assert!(data.error().is_none());
    }

    #[tokio::test]
    async fn mount_does_not_wait_for_the_change_stream() {
        let mut feed = DashboardFeed::mount(
            Loader::new(Arc::new(MemoryStore::new())),
            pending(),
            auto_sync(true),
        );
        let mut data = DashboardData::default();

        settle(&mut feed, &mut data).await;
        assert!(!data.is_loading());
    }

    #[tokio::test]
    async fn change_stream_that_arrives_late_still_drives_reloads() {
        let (change_tx, change_rx) = mpsc::channel(4);
        let late = async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Some(change_rx)
        };
        let mut feed = DashboardFeed::mount(Loader::new(Arc::new(MemoryStore::new())), late, auto_sync(true));
        let mut data = DashboardData::default();
        settle(&mut feed, &mut data).await;

        change_tx.send(change()).await.unwrap();
        next(&mut feed, &mut data).await;
        assert!(data.is_loading());
        next(&mut feed, &mut data).await;
        assert!(!data.is_loading());
    }

    #[tokio::test]
    async fn auto_sync_off_ignores_changes_but_not_refresh() {
        let (change_tx, change_rx) = mpsc::channel(4);
        let mut feed = DashboardFeed::mount(
            Loader::new(Arc::new(MemoryStore::new())),
            ready(Some(change_rx)),
            auto_sync(false),
        );
        let mut data = DashboardData::default();
        settle(&mut feed, &mut data).await;

        change_tx.send(change()).await.unwrap();
        let quiet = tokio::time::timeout(Duration::from_millis(100), feed.rx.recv()).await;
        assert!(quiet.is_err());

        feed.refresh();
        next(&mut feed, &mut data).await;
        assert!(data.is_loading());
    }

    #[tokio::test]
    async fn dropping_the_feed_stops_the_listener() {
        let (change_tx, change_rx) = mpsc::channel(4);
        let feed = DashboardFeed::mount(
            Loader::new(Arc::new(MemoryStore::new())),
            ready(Some(change_rx)),
            auto_sync(true),
        );

        drop(feed);

        let released = tokio::time::timeout(Duration::from_secs(1), change_tx.closed()).await;
        assert!(released.is_ok());
    }

    #[tokio::test]
    async fn drain_applies_everything_that_arrived() {
        let mut feed = mount(Arc::new(MemoryStore::new()));
        let mut data = DashboardData::default();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(feed.drain_into(&mut data), 2);
        assert!(!data.is_loading());
        assert_eq!(feed.drain_into(&mut data), 0);
    }
}

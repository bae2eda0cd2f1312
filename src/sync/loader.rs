use std::sync::Arc;

use crate::db::{Store, StoreError, Table};
use crate::models::{Asset, Client, Invoice, LeadIntake, Payment, Project};

use super::collection::{Collection, DataSource};
use super::seed::SeedData;

/// The one message shown for any failed batch.
pub const LOAD_ERROR_MESSAGE: &str = "Error fetching dashboard data";

/// Rows from one successful batch of six reads.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub projects: Vec<Project>,
    pub clients: Vec<Client>,
    pub leads: Vec<LeadIntake>,
    pub assets: Vec<Asset>,
    pub invoices: Vec<Invoice>,
    pub payments: Vec<Payment>,
}

/// The six collections one dashboard batch reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Projects,
    Clients,
    Leads,
    Assets,
    Invoices,
    Payments,
}

/// At least one of the six reads failed.
#[derive(Debug, thiserror::Error)]
#[error("{} of 6 dashboard reads failed", .failures.len())]
pub struct LoadError {
    pub failures: Vec<(Table, StoreError)>,
}

/// Issues the six dashboard reads.
pub struct Loader<S> {
    store: Arc<S>,
}

impl<S> Clone for Loader<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

fn settle<T>(table: Table, result: Result<Vec<T>, StoreError>, failures: &mut Vec<(Table, StoreError)>) -> Vec<T> {
    match result {
        Ok(rows) => rows,
        Err(e) => {
            failures.push((table, e));
            Vec::new()
        }
    }
}

impl<S: Store> Loader<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Run all six reads concurrently and wait for every one of them.
    ///
    /// Any failure fails the whole batch; no partial snapshot is returned.
    pub async fn fetch(&self) -> Result<Snapshot, LoadError> {
        let store = &*self.store;
        let (projects, clients, leads, assets, invoices, payments) = tokio::join!(
            store.fetch_projects(),
            store.fetch_clients(),
            store.fetch_leads(),
            store.fetch_assets(),
            store.fetch_invoices(),
            store.fetch_payments(),
        );

        let mut failures = Vec::new();
        let snapshot = Snapshot {
            projects: settle(Table::Projects, projects, &mut failures),
            clients: settle(Table::Clients, clients, &mut failures),
            leads: settle(Table::Leads, leads, &mut failures),
            assets: settle(Table::Assets, assets, &mut failures),
            invoices: settle(Table::Invoices, invoices, &mut failures),
            payments: settle(Table::Payments, payments, &mut failures),
        };

        if !failures.is_empty() {
            for (table, e) in &failures {
                tracing::warn!(table = %table, error = %e, "dashboard read failed");
            }
            return Err(LoadError { failures });
        }

        tracing::debug!(
            projects = snapshot.projects.len(),
            clients = snapshot.clients.len(),
            leads = snapshot.leads.len(),
            assets = snapshot.assets.len(),
            invoices = snapshot.invoices.len(),
            payments = snapshot.payments.len(),
            "dashboard batch loaded"
        );
        Ok(snapshot)
    }
}

/// Everything the screens read: the six collections, load status, and
/// payments logged locally that the store has not echoed back yet.
pub struct DashboardData {
    projects: Collection<Project>,
    clients: Collection<Client>,
    leads: Collection<LeadIntake>,
    assets: Collection<Asset>,
    invoices: Collection<Invoice>,
    payments: Collection<Payment>,
    in_flight: usize,
    applied: u64,
    error: Option<String>,
    local_payments: Vec<Payment>,
    seeds: SeedData,
}

impl Default for DashboardData {
    fn default() -> Self {
        Self::new(SeedData::default())
    }
}

impl DashboardData {
    pub fn new(seeds: SeedData) -> Self {
        Self {
            projects: Collection::Pending,
            clients: Collection::Pending,
            leads: Collection::Pending,
            assets: Collection::Pending,
            invoices: Collection::Pending,
            payments: Collection::Pending,
            in_flight: 0,
            applied: 0,
            error: None,
            local_payments: Vec::new(),
            seeds,
        }
    }

    pub fn begin_load(&mut self) {
        self.in_flight += 1;
    }

    /// Apply the batch started as `generation`. Failure records the error and
    /// leaves every collection as it was. A batch that started before the
    /// newest one already applied is dropped.
    pub fn finish_load(&mut self, generation: u64, outcome: Result<Snapshot, LoadError>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if generation <= self.applied {
            tracing::debug!(generation, newest = self.applied, "discarding superseded dashboard batch");
            return;
        }
        self.applied = generation;

        match outcome {
            Ok(snapshot) => {
                self.local_payments
                    .retain(|local| !snapshot.payments.iter().any(|p| p.id == local.id));
                self.projects = Collection::from_rows(snapshot.projects);
                self.clients = Collection::from_rows(snapshot.clients);
                self.leads = Collection::from_rows(snapshot.leads);
                self.assets = Collection::from_rows(snapshot.assets);
                self.invoices = Collection::from_rows(snapshot.invoices);
                self.payments = Collection::from_rows(snapshot.payments);
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "keeping previous dashboard data");
                self.error = Some(LOAD_ERROR_MESSAGE.to_string());
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn source(&self, dataset: Dataset) -> DataSource {
        match dataset {
            Dataset::Projects => self.projects.source(),
            Dataset::Clients => self.clients.source(),
            Dataset::Leads => self.leads.source(),
            Dataset::Assets => self.assets.source(),
            Dataset::Invoices => self.invoices.source(),
            Dataset::Payments => self.payments.source(),
        }
    }

    /// Projects in scope, with locally logged payments folded in.
    pub fn projects(&self) -> Vec<Project> {
        let mut projects = self.projects.rows_or(&self.seeds.projects).to_vec();
        for payment in &self.local_payments {
            if let Some(project) = projects.iter_mut().find(|p| p.id == payment.project_id) {
                if !project.payments.iter().any(|p| p.id == payment.id) {
                    project.payments.push(payment.clone());
                }
            }
        }
        projects
    }

    pub fn clients(&self) -> &[Client] {
        self.clients.rows_or(&self.seeds.clients)
    }

    pub fn leads(&self) -> &[LeadIntake] {
        self.leads.rows_or(&self.seeds.leads)
    }

    pub fn assets(&self) -> &[Asset] {
        self.assets.rows_or(&self.seeds.assets)
    }

    pub fn invoices(&self) -> &[Invoice] {
        self.invoices.rows_or(&self.seeds.invoices)
    }

    pub fn payments(&self) -> Vec<Payment> {
        let mut payments = self.payments.rows_or(&self.seeds.payments).to_vec();
        for local in &self.local_payments {
            if !payments.iter().any(|p| p.id == local.id) {
                payments.push(local.clone());
            }
        }
        payments
    }

    /// Keep an optimistically logged payment visible until a reload returns
    /// it from the store.
    pub fn record_local_payment(&mut self, payment: Payment) {
        self.local_payments.push(payment);
    }

    /// Remote client with this id, else the seed client with this id.
    pub fn find_client(&self, id: &str) -> Option<Client> {
        self.clients
            .remote()
            .iter()
            .find(|c| c.id == id)
            .or_else(|| self.seeds.clients.iter().find(|c| c.id == id))
            .cloned()
    }

    /// First project for the client among the projects in scope, then the
    /// seed projects.
    pub fn project_for_client(&self, client_id: &str) -> Option<Project> {
        self.projects()
            .into_iter()
            .find(|p| p.client_id == client_id)
            .or_else(|| self.seeds.projects.iter().find(|p| p.client_id == client_id).cloned())
    }

    /// The client's remote invoices, or the seed invoices for that client
    /// when the store has none for them.
    pub fn invoices_for_client(&self, client_id: &str) -> Vec<Invoice> {
        let remote: Vec<Invoice> = self
            .invoices
            .remote()
            .iter()
            .filter(|i| i.client_id == client_id)
            .cloned()
            .collect();
        if !remote.is_empty() {
            return remote;
        }
        self.seeds
            .invoices
            .iter()
            .filter(|i| i.client_id == client_id)
            .cloned()
            .collect()
    }

    /// Same rule as [`invoices_for_client`], for a project's vault.
    ///
    /// [`invoices_for_client`]: DashboardData::invoices_for_client
    pub fn assets_for_project(&self, project_id: &str) -> Vec<Asset> {
        let remote: Vec<Asset> = self
            .assets
            .remote()
            .iter()
            .filter(|a| a.project_id == project_id)
            .cloned()
            .collect();
        if !remote.is_empty() {
            return remote;
        }
        self.seeds
            .assets
            .iter()
            .filter(|a| a.project_id == project_id)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::sync::seed;

    fn client(id: &str, name: &str) -> Client {
        let mut client = seed::clients()[1].clone();
        client.id = id.to_string();
        client.name = name.to_string();
        client
    }

    #[tokio::test]
    async fn fetch_reports_every_failing_table() {
        let store = Arc::new(MemoryStore::new());
        let loader = Loader::new(Arc::clone(&store));
        store.fail(Table::Invoices);
        store.fail(Table::Leads);

        let err = loader.fetch().await.unwrap_err();
        let tables: Vec<Table> = err.failures.iter().map(|(t, _)| *t).collect();

        assert_eq!(tables, vec![Table::Leads, Table::Invoices]);
        assert_eq!(err.to_string(), "2 of 6 dashboard reads failed");
    }

    #[test]
    fn loading_flag_spans_overlapping_loads() {
        let mut data = DashboardData::default();
        assert!(!data.is_loading());

        data.begin_load();
        data.begin_load();
        data.finish_load(1, Ok(Snapshot::default()));
        assert!(data.is_loading());

        data.finish_load(2, Err(LoadError { failures: Vec::new() }));
        assert!(!data.is_loading());
    }

    #[test]
    fn older_batch_never_overwrites_a_newer_one() {
        let mut data = DashboardData::default();
        data.begin_load();
        data.begin_load();

        data.finish_load(2, Ok(Snapshot {
            clients: vec![client("r1", "NEW")],
            ..Snapshot::default()
        }));
        data.finish_load(1, Ok(Snapshot {
            clients: vec![client("r1", "OLD")],
            ..Snapshot::default()
        }));

        assert_eq!(data.clients()[0].name, "NEW");
        assert!(!data.is_loading());
    }

    #[test]
    fn stale_failure_does_not_raise_the_error() {
        let mut data = DashboardData::default();
        data.begin_load();
        data.begin_load();

        data.finish_load(2, Ok(Snapshot::default()));
        data.finish_load(1, Err(LoadError { failures: Vec::new() }));

        assert!(data.error().is_none());
        assert_eq!(data.source(Dataset::Clients), DataSource::SeedForEmpty);
    }

    #[test]
    fn local_payment_is_not_counted_twice_after_reload() {
        let mut data = DashboardData::default();
        let payment = Payment {
            id: "pay-1".to_string(),
            project_id: "p1".to_string(),
            amount: 1250.0,
            description: "Deposit".to_string(),
            date: chrono::Utc::now(),
        };

        data.record_local_payment(payment.clone());
        assert_eq!(data.projects()[0].payments.len(), 1);

        let mut project = seed::projects()[0].clone();
        project.payments.push(payment.clone());
        data.finish_load(1, Ok(Snapshot {
            projects: vec![project],
            payments: vec![payment],
            ..Snapshot::default()
        }));

        assert_eq!(data.projects()[0].payments.len(), 1);
        assert_eq!(data.payments().len(), 1);
    }

    #[test]
    fn client_lookups_fall_back_to_seed_records() {
        let data = DashboardData::default();

        assert_eq!(data.find_client("c1").unwrap().name, "Lil Echo");
        assert!(data.find_client("missing").is_none());
        assert_eq!(data.project_for_client("c1").unwrap().id, "p1");
        assert_eq!(data.invoices_for_client("c1").len(), 2);
        assert_eq!(data.assets_for_project("p1").len(), 2);
    }
}

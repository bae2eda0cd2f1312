use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use crate::auth::{AuthError, Session};
use crate::models::{Asset, Client, Invoice, LeadIntake, Message, Payment, Project};

use super::{Store, StoreError, Table};

#[derive(Default)]
struct Tables {
    projects: Vec<Project>,
    clients: Vec<Client>,
    leads: Vec<LeadIntake>,
    assets: Vec<Asset>,
    invoices: Vec<Invoice>,
    payments: Vec<Payment>,
    messages: Vec<Message>,
}

/// Process-local store. Backs `--demo` and the tests, which can switch any
/// table into a failing state.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    failing: Mutex<HashSet<Table>>,
    operator: Option<(String, String)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept exactly this email/password pair at sign-in.
    pub fn with_operator(mut self, email: &str, password: &str) -> Self {
        self.operator = Some((email.to_string(), password.to_string()));
        self
    }

    pub fn with_projects(self, projects: Vec<Project>) -> Self {
        self.lock().projects = projects;
        self
    }

    pub fn with_clients(self, clients: Vec<Client>) -> Self {
        self.lock().clients = clients;
        self
    }

    pub fn with_invoices(self, invoices: Vec<Invoice>) -> Self {
        self.lock().invoices = invoices;
        self
    }

    /// Make every later operation on `table` fail until [`recover`] is called.
    ///
    /// [`recover`]: MemoryStore::recover
    #[cfg(test)]
    pub fn fail(&self, table: Table) {
        self.failing_tables().insert(table);
    }

    #[cfg(test)]
    pub fn recover(&self, table: Table) {
        self.failing_tables().remove(&table);
    }

    #[cfg(test)]
    pub fn messages(&self) -> Vec<Message> {
        self.lock().messages.clone()
    }

    #[cfg(test)]
    pub fn payments(&self) -> Vec<Payment> {
        self.lock().payments.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn failing_tables(&self) -> MutexGuard<'_, HashSet<Table>> {
        self.failing.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check(&self, table: Table) -> Result<(), StoreError> {
        if self.failing_tables().contains(&table) {
            return Err(StoreError::Unavailable {
                table,
                reason: "simulated outage".to_string(),
            });
        }
        Ok(())
    }
}

impl Store for MemoryStore {
    async fn fetch_projects(&self) -> Result<Vec<Project>, StoreError> {
        self.check(Table::Projects)?;
        Ok(self.lock().projects.clone())
    }

    async fn fetch_clients(&self) -> Result<Vec<Client>, StoreError> {
        self.check(Table::Clients)?;
        Ok(self.lock().clients.clone())
    }

    async fn fetch_leads(&self) -> Result<Vec<LeadIntake>, StoreError> {
        self.check(Table::Leads)?;
        Ok(self.lock().leads.clone())
    }

    async fn fetch_assets(&self) -> Result<Vec<Asset>, StoreError> {
        self.check(Table::Assets)?;
        Ok(self.lock().assets.clone())
    }

    async fn fetch_invoices(&self) -> Result<Vec<Invoice>, StoreError> {
        self.check(Table::Invoices)?;
        Ok(self.lock().invoices.clone())
    }

    async fn fetch_payments(&self) -> Result<Vec<Payment>, StoreError> {
        self.check(Table::Payments)?;
        Ok(self.lock().payments.clone())
    }

    async fn fetch_messages(&self, client_id: &str) -> Result<Vec<Message>, StoreError> {
        self.check(Table::Messages)?;
        let mut messages: Vec<Message> = self
            .lock()
            .messages
            .iter()
            .filter(|m| m.client_id == client_id)
            .cloned()
            .collect();
        messages.sort_by_key(|m| m.timestamp);
        Ok(messages)
    }

    async fn insert_message(&self, message: &Message) -> Result<(), StoreError> {
        self.check(Table::Messages)?;
        self.lock().messages.push(message.clone());
        Ok(())
    }

    async fn insert_payment(&self, payment: &Payment) -> Result<(), StoreError> {
        self.check(Table::Payments)?;
        let mut tables = self.lock();
        tables.payments.push(payment.clone());
        // Mirror the Postgres read, which folds payments into their project.
        if let Some(project) = tables.projects.iter_mut().find(|p| p.id == payment.project_id) {
            project.payments.push(payment.clone());
        }
        Ok(())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        match &self.operator {
            Some((known_email, known_password)) if known_email == email && known_password == password => {
                Ok(Session {
                    operator_id: "operator".to_string(),
                    email: email.to_string(),
                })
            }
            _ => Err(AuthError::InvalidCredentials),
        }
    }
}

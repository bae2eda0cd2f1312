pub mod changes;
mod memory;

use std::future::Future;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::auth::{AuthError, Session};
use crate::config::Config;
use crate::models::{text_enum, Asset, Client, Invoice, LeadIntake, Message, Payment, Project};

pub use changes::{subscribe_projects, ChangeEvent};
pub use memory::MemoryStore;

text_enum! {
    /// Row collections held by the backing store.
    pub enum Table {
        Projects => "projects",
        Clients => "clients",
        Leads => "leads",
        Assets => "assets",
        Invoices => "invoices",
        Payments => "payments",
        Messages => "messages",
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{table} unavailable: {reason}")]
    Unavailable { table: Table, reason: String },
}

/// Read-all, insert and sign-in access to the studio's backing store.
///
/// Every returned future is `Send` so reads and writes can run on spawned
/// tasks while the UI keeps drawing.
pub trait Store: Send + Sync + 'static {
    fn fetch_projects(&self) -> impl Future<Output = Result<Vec<Project>, StoreError>> + Send;
    fn fetch_clients(&self) -> impl Future<Output = Result<Vec<Client>, StoreError>> + Send;
    fn fetch_leads(&self) -> impl Future<Output = Result<Vec<LeadIntake>, StoreError>> + Send;
    fn fetch_assets(&self) -> impl Future<Output = Result<Vec<Asset>, StoreError>> + Send;
    fn fetch_invoices(&self) -> impl Future<Output = Result<Vec<Invoice>, StoreError>> + Send;
    fn fetch_payments(&self) -> impl Future<Output = Result<Vec<Payment>, StoreError>> + Send;

    /// Messages for one client, oldest first
    fn fetch_messages(
        &self,
        client_id: &str,
    ) -> impl Future<Output = Result<Vec<Message>, StoreError>> + Send;

    fn insert_message(&self, message: &Message) -> impl Future<Output = Result<(), StoreError>> + Send;
    fn insert_payment(&self, payment: &Payment) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Session, AuthError>> + Send;
}

/// Database connection pool
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new Database instance with a connection pool
    pub async fn new(config: &Config) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(8)
            .connect(config.database_url()?)
            .await?;

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }
}

impl Store for Database {
    async fn fetch_projects(&self) -> Result<Vec<Project>, StoreError> {
        // Payments live in their own table and are folded into each project
        // on read.
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT
                p.id,
                p.client_id,
                p.title,
                p.package,
                p.status,
                p.progress,
                p.value::float8 AS value,
                COALESCE(
                    (SELECT json_agg(json_build_object(
                                'id', pay.id,
                                'project_id', pay.project_id,
                                'amount', pay.amount::float8,
                                'description', pay.description,
                                'date', pay.date
                            ) ORDER BY pay.date)
                     FROM payments pay
                     WHERE pay.project_id = p.id),
                    '[]'::json
                ) AS payments,
                p.checklist,
                p.start_date,
                p.target_date,
                p.genre
            FROM projects p
            "#,
        )
        .fetch_all(self.get_pool())
        .await?;

        Ok(projects)
    }

    async fn fetch_clients(&self) -> Result<Vec<Client>, StoreError> {
        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, name, alias, email, phone, instagram, tiktok, bio,
                   whatsapp_link, source, brand, genre_tags, status,
                   last_contact_date, avatar_url, conversations, timeline
            FROM clients
            "#,
        )
        .fetch_all(self.get_pool())
        .await?;

        Ok(clients)
    }

    async fn fetch_leads(&self) -> Result<Vec<LeadIntake>, StoreError> {
        let leads = sqlx::query_as::<_, LeadIntake>(
            r#"
            SELECT id, name, source, date, platform, status,
                   initial_budget::float8 AS initial_budget
            FROM leads
            "#,
        )
        .fetch_all(self.get_pool())
        .await?;

        Ok(leads)
    }

    async fn fetch_assets(&self) -> Result<Vec<Asset>, StoreError> {
        let assets = sqlx::query_as::<_, Asset>(
            "SELECT id, project_id, name, kind, url, uploaded_at, size FROM assets",
        )
        .fetch_all(self.get_pool())
        .await?;

        Ok(assets)
    }

    async fn fetch_invoices(&self) -> Result<Vec<Invoice>, StoreError> {
        let invoices = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, client_id, amount::float8 AS amount, status, due_date,
                   items, sent_at, viewed_at
            FROM invoices
            "#,
        )
        .fetch_all(self.get_pool())
        .await?;

        Ok(invoices)
    }

    async fn fetch_payments(&self) -> Result<Vec<Payment>, StoreError> {
        let payments = sqlx::query_as::<_, Payment>(
            "SELECT id, project_id, amount::float8 AS amount, description, date FROM payments",
        )
        .fetch_all(self.get_pool())
        .await?;

        Ok(payments)
    }

    async fn fetch_messages(&self, client_id: &str) -> Result<Vec<Message>, StoreError> {
        let messages = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, client_id, sender, text, created_at, platform
            FROM messages
            WHERE client_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(client_id)
        .fetch_all(self.get_pool())
        .await?;

        Ok(messages)
    }

    async fn insert_message(&self, message: &Message) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, client_id, sender, text, platform, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&message.id)
        .bind(&message.client_id)
        .bind(message.sender.as_str())
        .bind(&message.text)
        .bind(message.platform.as_str())
        .bind(message.timestamp)
        .execute(self.get_pool())
        .await?;

        Ok(())
    }

    async fn insert_payment(&self, payment: &Payment) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO payments (id, project_id, amount, description, date)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&payment.id)
        .bind(&payment.project_id)
        .bind(payment.amount)
        .bind(&payment.description)
        .bind(payment.date)
        .execute(self.get_pool())
        .await?;

        Ok(())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let row = sqlx::query_as::<_, Session>(
            r#"
            SELECT id AS operator_id, email
            FROM operators
            WHERE email = $1 AND password_hash = crypt($2, password_hash)
            "#,
        )
        .bind(email)
        .bind(password)
        .fetch_optional(self.get_pool())
        .await
        .map_err(|e| AuthError::Unavailable(e.to_string()))?;

        row.ok_or(AuthError::InvalidCredentials)
    }
}

/// The store the application runs against: Postgres, or the in-memory store
/// used by `--demo`.
pub enum Backend {
    Postgres(Database),
    Memory(MemoryStore),
}

impl Store for Backend {
    async fn fetch_projects(&self) -> Result<Vec<Project>, StoreError> {
        match self {
            Backend::Postgres(db) => db.fetch_projects().await,
            Backend::Memory(mem) => mem.fetch_projects().await,
        }
    }

    async fn fetch_clients(&self) -> Result<Vec<Client>, StoreError> {
        match self {
            Backend::Postgres(db) => db.fetch_clients().await,
            Backend::Memory(mem) => mem.fetch_clients().await,
        }
    }

    async fn fetch_leads(&self) -> Result<Vec<LeadIntake>, StoreError> {
        match self {
            Backend::Postgres(db) => db.fetch_leads().await,
            Backend::Memory(mem) => mem.fetch_leads().await,
        }
    }

    async fn fetch_assets(&self) -> Result<Vec<Asset>, StoreError> {
        match self {
            Backend::Postgres(db) => db.fetch_assets().await,
            Backend::Memory(mem) => mem.fetch_assets().await,
        }
    }

    async fn fetch_invoices(&self) -> Result<Vec<Invoice>, StoreError> {
        match self {
            Backend::Postgres(db) => db.fetch_invoices().await,
            Backend::Memory(mem) => mem.fetch_invoices().await,
        }
    }

    async fn fetch_payments(&self) -> Result<Vec<Payment>, StoreError> {
        match self {
            Backend::Postgres(db) => db.fetch_payments().await,
            Backend::Memory(mem) => mem.fetch_payments().await,
        }
    }

    async fn fetch_messages(&self, client_id: &str) -> Result<Vec<Message>, StoreError> {
        match self {
            Backend::Postgres(db) => db.fetch_messages(client_id).await,
            Backend::Memory(mem) => mem.fetch_messages(client_id).await,
        }
    }

    async fn insert_message(&self, message: &Message) -> Result<(), StoreError> {
        match self {
            Backend::Postgres(db) => db.insert_message(message).await,
            Backend::Memory(mem) => mem.insert_message(message).await,
        }
    }

    async fn insert_payment(&self, payment: &Payment) -> Result<(), StoreError> {
        match self {
            Backend::Postgres(db) => db.insert_payment(payment).await,
            Backend::Memory(mem) => mem.insert_payment(payment).await,
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        match self {
            Backend::Postgres(db) => db.sign_in(email, password).await,
            Backend::Memory(mem) => mem.sign_in(email, password).await,
        }
    }
}

/// Initialize the database connection pool
pub async fn init(config: &Config) -> Result<Database> {
    let db = Database::new(config).await?;
    tracing::info!("database connection established");

    Ok(db)
}

//! Keeping the dashboard's view of the store current: the batch loader, the
//! change feed, seed fallbacks and optimistic writes.

pub mod collection;
pub mod feed;
pub mod loader;
pub mod seed;
pub mod writes;

pub use collection::DataSource;
pub use feed::DashboardFeed;
pub use loader::{DashboardData, Dataset, Loader};
pub use seed::SeedData;
pub use writes::{log_message, log_payment};

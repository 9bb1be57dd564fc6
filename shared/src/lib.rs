pub mod auth;
pub mod codec;
pub mod debts;
pub mod error;
pub mod keys;
pub mod plan;
pub mod responses;
pub mod security;
pub mod store;
pub mod types;
pub mod users;

use std::sync::Arc;

pub use error::{Result, StoreError};
pub use store::DebtTable;

/// Shared application state
pub struct AppState {
    pub table: DebtTable,
}

impl AppState {
    pub fn new(table: DebtTable) -> Arc<Self> {
        Arc::new(Self { table })
    }
}

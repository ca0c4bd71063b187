//! Graph store adapters
//!
//! # Contract
//!
//! - One `GraphStore` handle per process, shared behind `Arc`
//! - Every unit of work runs in a `GraphTxn` obtained from `begin()`
//! - A transaction that is dropped without `commit()` leaves no writes behind
//! - Schema statements run in their own auto-commit transaction

pub mod memory;
pub mod neo4j;
mod statement;

use async_trait::async_trait;

use crate::error::StoreError;

pub use statement::{SchemaStatement, Statement, COUNT_COLUMN};

/// Shared, thread-safe handle to a property-graph database
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Open a scoped transaction.
    async fn begin(&self) -> Result<Box<dyn GraphTxn>, StoreError>;

    /// Run a schema statement in its own transaction.
    async fn apply_schema(&self, statement: SchemaStatement) -> Result<(), StoreError>;

    /// Release the handle. Later calls to `begin` fail with `StoreError::Closed`.
    async fn close(&self);
}

/// An open transaction against a `GraphStore`
#[async_trait]
pub trait GraphTxn: Send {
    /// Run a count statement and return its scalar `count` column.
    async fn count(&mut self, statement: &Statement) -> Result<i64, StoreError>;

    /// Run a write statement, discarding any rows.
    async fn run(&mut self, statement: &Statement) -> Result<(), StoreError>;

    /// Make every write of this transaction visible.
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;

    /// Discard every write of this transaction.
    async fn rollback(self: Box<Self>) -> Result<(), StoreError>;
}

//! Graph schema setup
//!
//! Run once at startup, before the engine serves its first request.

use std::sync::Arc;

use tracing::{error, info};

use crate::error::StoreError;
use crate::store::{GraphStore, SchemaStatement};

/// Constraints installed by `initialize`, in order
const SCHEMA: &[SchemaStatement] = &[SchemaStatement::PlaylistNameExists];

/// Installs the constraints the relationship engine relies on
#[derive(Clone)]
pub struct SchemaInitializer {
    store: Arc<dyn GraphStore>,
}

impl SchemaInitializer {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// Install every schema constraint.
    ///
    /// Idempotent: a constraint the store already holds counts as installed.
    ///
    /// # Errors
    ///
    /// Any other store failure is returned unchanged; startup should not
    /// continue against a store that cannot hold the constraint.
    pub async fn initialize(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            match self.store.apply_schema(*statement).await {
                Ok(()) => {
                    info!(constraint = statement.name(), "Installed constraint");
                }
                Err(e) if e.is_equivalent_constraint() => {
                    info!(
                        constraint = statement.name(),
                        "Constraint already exists (store likely already initialized), continuing"
                    );
                }
                Err(e) => {
                    error!(constraint = statement.name(), error = %e, "Schema initialization failed");
                    return Err(e);
                }
            }
        }

        Ok(())
    }
}

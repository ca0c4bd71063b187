//! Neo4j store over Bolt
//!
//! Uses the neo4rs connection pool. Each `begin()` checks out a pooled
//! connection and opens an explicit transaction on it.
//!
//! A `Neo4jTxn` dropped without `commit` or `rollback` (for example when the
//! calling future is cancelled) sends no ROLLBACK of its own. The connection
//! goes back to the pool with the transaction still open, and the pool sends
//! a Bolt RESET when it recycles the connection, which makes the server
//! discard the uncommitted writes. Until then the server keeps the
//! transaction's locks.

use async_trait::async_trait;
use neo4rs::{query, ConfigBuilder, Graph, Query, Txn};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{GraphStore, GraphTxn, SchemaStatement, Statement, COUNT_COLUMN};
use crate::config::Neo4jConfig;
use crate::error::StoreError;

/// Bind a typed statement to a driver query
fn to_query(statement: &Statement) -> Query {
    statement
        .params()
        .into_iter()
        .fold(query(statement.cypher()), |q, (name, value)| q.param(name, value))
}

/// `GraphStore` backed by a Neo4j server
pub struct Neo4jStore {
    graph: RwLock<Option<Graph>>,
}

impl Neo4jStore {
    /// Open the connection pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is rejected or the server
    /// cannot be reached.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let store = Neo4jStore::connect(&TunegraphConfig::load().neo4j).await?;
    /// ```
    pub async fn connect(config: &Neo4jConfig) -> Result<Self, StoreError> {
        let mut builder = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.user.as_str())
            .password(config.password.as_str())
            .max_connections(config.max_connections)
            .fetch_size(config.fetch_size);
        if let Some(db) = config.database.as_deref() {
            builder = builder.db(db);
        }
        let neo4j_config = builder
            .build()
            .map_err(|e| StoreError::Config(e.to_string()))?;

        let graph = Graph::connect(neo4j_config).await?;
        info!(uri = %config.uri, "Connected to Neo4j");

        Ok(Self::from_graph(graph))
    }

    /// Wrap an already connected driver handle
    pub fn from_graph(graph: Graph) -> Self {
        Self {
            graph: RwLock::new(Some(graph)),
        }
    }

    async fn graph(&self) -> Result<Graph, StoreError> {
        self.graph.read().await.clone().ok_or(StoreError::Closed)
    }
}

#[async_trait]
impl GraphStore for Neo4jStore {
    async fn begin(&self) -> Result<Box<dyn GraphTxn>, StoreError> {
        let txn = self.graph().await?.start_txn().await?;
        Ok(Box::new(Neo4jTxn { txn }))
    }

    async fn apply_schema(&self, statement: SchemaStatement) -> Result<(), StoreError> {
        debug!(constraint = statement.name(), "Applying schema statement");
        self.graph().await?.run(query(statement.cypher())).await?;
        Ok(())
    }

    async fn close(&self) {
        if self.graph.write().await.take().is_some() {
            info!("Closed Neo4j connection pool");
        }
    }
}

/// Open server transaction; see the module docs for drop behaviour
struct Neo4jTxn {
    txn: Txn,
}

#[async_trait]
impl GraphTxn for Neo4jTxn {
    async fn count(&mut self, statement: &Statement) -> Result<i64, StoreError> {
        let mut stream = self.txn.execute(to_query(statement)).await?;
        let mut count = None;

        // Drain the stream so the connection is ready for the next statement
        while let Some(row) = stream.next(self.txn.handle()).await? {
            if count.is_none() {
                count = Some(row.get::<i64>(COUNT_COLUMN).map_err(|_| {
                    StoreError::MalformedResult {
                        column: COUNT_COLUMN,
                    }
                })?);
            }
        }

        count.ok_or(StoreError::MalformedResult {
            column: COUNT_COLUMN,
        })
    }

    async fn run(&mut self, statement: &Statement) -> Result<(), StoreError> {
        self.txn.run(to_query(statement)).await?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.txn.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        self.txn.rollback().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_carries_statement_text() {
        let statement = Statement::CountLikes {
            user_name: "alice".into(),
            song_id: "s42".into(),
        };
        let q = to_query(&statement);
        assert!(q.has_param_key("userName"));
        assert!(q.has_param_key("songId"));
        assert!(!q.has_param_key("plName"));
    }
}

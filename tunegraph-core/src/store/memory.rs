//! In-process graph store
//!
//! Holds profiles, songs, playlists and the edges between them in ordered
//! sets. Transactions are serialized: `begin()` takes the store lock and
//! stages writes on a copy of the graph, which replaces the live graph only
//! on `commit()`. Dropping the transaction releases the lock and discards
//! the copy.
//!
//! Statements behave like their Cypher counterparts: a `MERGE` whose `MATCH`
//! finds no node writes nothing, and `DELETE` of a missing edge is a no-op.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use super::{GraphStore, GraphTxn, SchemaStatement, Statement};
use crate::error::{StoreError, EQUIVALENT_CONSTRAINT_MESSAGE, EQUIVALENT_SCHEMA_RULE_CODE};
use crate::models::favorites_playlist_name;

/// Status code used for injected failures
const INJECTED_FAILURE_CODE: &str = "Neo.TransientError.General.DatabaseUnavailable";

/// Point-in-time copy of the whole graph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphSnapshot {
    pub profiles: BTreeSet<String>,
    pub songs: BTreeSet<String>,
    pub playlists: BTreeSet<String>,
    /// (userName, songId)
    pub likes: BTreeSet<(String, String)>,
    /// (plName, songId)
    pub includes: BTreeSet<(String, String)>,
    /// (userName, friendUserName)
    pub follows: BTreeSet<(String, String)>,
    pub constraints: BTreeSet<&'static str>,
}

impl GraphSnapshot {
    fn count(&self, statement: &Statement) -> Result<i64, StoreError> {
        let found = match statement {
            Statement::CountSong { song_id } => self.songs.contains(song_id),
            Statement::CountProfile { user_name } => self.profiles.contains(user_name),
            Statement::CountPlaylist { pl_name } => self.playlists.contains(pl_name),
            Statement::CountLikes { user_name, song_id } => {
                self.likes.contains(&(user_name.clone(), song_id.clone()))
            }
            Statement::CountFollows {
                user_name,
                friend_user_name,
            } => self
                .follows
                .contains(&(user_name.clone(), friend_user_name.clone())),
            _ => {
                return Err(StoreError::MalformedResult {
                    column: super::COUNT_COLUMN,
                })
            }
        };
        Ok(i64::from(found))
    }

    fn apply(&mut self, statement: &Statement) {
        match statement {
            Statement::MergeLikes { user_name, song_id } => {
                if self.profiles.contains(user_name) && self.songs.contains(song_id) {
                    self.likes.insert((user_name.clone(), song_id.clone()));
                }
            }
            Statement::MergeIncludes { pl_name, song_id } => {
                if self.playlists.contains(pl_name) && self.songs.contains(song_id) {
                    self.includes.insert((pl_name.clone(), song_id.clone()));
                }
            }
            Statement::MergeFollows {
                user_name,
                friend_user_name,
            } => {
                if self.profiles.contains(user_name) && self.profiles.contains(friend_user_name) {
                    self.follows
                        .insert((user_name.clone(), friend_user_name.clone()));
                }
            }
            Statement::DeleteLikes { user_name, song_id } => {
                self.likes.remove(&(user_name.clone(), song_id.clone()));
            }
            Statement::DeleteIncludes { pl_name, song_id } => {
                self.includes.remove(&(pl_name.clone(), song_id.clone()));
            }
            Statement::DeleteFollows {
                user_name,
                friend_user_name,
            } => {
                self.follows
                    .remove(&(user_name.clone(), friend_user_name.clone()));
            }
            // Read-only statements leave the graph untouched
            _ => {}
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    graph: GraphSnapshot,
    fail_on: Option<&'static str>,
    legacy_schema_errors: bool,
}

/// In-memory `GraphStore`
#[derive(Debug, Default)]
pub struct MemoryGraph {
    inner: Arc<Mutex<Inner>>,
    closed: AtomicBool,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report duplicate constraints the way Neo4j 3.x did: a generic status
    /// code and the "equivalent constraint" wording in the message only.
    pub fn with_legacy_schema_errors(mut self) -> Self {
        if let Some(inner) = Arc::get_mut(&mut self.inner) {
            inner.get_mut().legacy_schema_errors = true;
        }
        self
    }

    /// Add a profile together with its favorites playlist.
    pub async fn add_profile(&self, user_name: &str) {
        let mut inner = self.inner.lock().await;
        inner.graph.profiles.insert(user_name.to_owned());
        inner.graph.playlists.insert(favorites_playlist_name(user_name));
    }

    /// Add a profile whose favorites playlist was never created.
    pub async fn add_profile_without_favorites(&self, user_name: &str) {
        let mut inner = self.inner.lock().await;
        inner.graph.profiles.insert(user_name.to_owned());
    }

    pub async fn add_song(&self, song_id: &str) {
        let mut inner = self.inner.lock().await;
        inner.graph.songs.insert(song_id.to_owned());
    }

    pub async fn add_playlist(&self, pl_name: &str) {
        let mut inner = self.inner.lock().await;
        inner.graph.playlists.insert(pl_name.to_owned());
    }

    /// Make every statement with this name fail until cleared.
    pub async fn fail_statement(&self, name: &'static str) {
        self.inner.lock().await.fail_on = Some(name);
    }

    pub async fn clear_failure(&self) {
        self.inner.lock().await.fail_on = None;
    }

    /// Copy of the committed graph
    pub async fn snapshot(&self) -> GraphSnapshot {
        self.inner.lock().await.graph.clone()
    }

    pub async fn has_like(&self, user_name: &str, song_id: &str) -> bool {
        let inner = self.inner.lock().await;
        inner
            .graph
            .likes
            .contains(&(user_name.to_owned(), song_id.to_owned()))
    }

    pub async fn has_include(&self, pl_name: &str, song_id: &str) -> bool {
        let inner = self.inner.lock().await;
        inner
            .graph
            .includes
            .contains(&(pl_name.to_owned(), song_id.to_owned()))
    }

    pub async fn has_follow(&self, user_name: &str, friend_user_name: &str) -> bool {
        let inner = self.inner.lock().await;
        inner
            .graph
            .follows
            .contains(&(user_name.to_owned(), friend_user_name.to_owned()))
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }
        Ok(())
    }
}

#[async_trait]
impl GraphStore for MemoryGraph {
    async fn begin(&self) -> Result<Box<dyn GraphTxn>, StoreError> {
        self.ensure_open()?;
        let guard = Arc::clone(&self.inner).lock_owned().await;
        let staged = guard.graph.clone();
        Ok(Box::new(MemoryTxn { guard, staged }))
    }

    async fn apply_schema(&self, statement: SchemaStatement) -> Result<(), StoreError> {
        self.ensure_open()?;
        let mut inner = self.inner.lock().await;
        let name = statement.name();

        if inner.graph.constraints.contains(name) {
            let message = format!(
                "{}, 'Constraint( name='{}', type='NODE PROPERTY EXISTENCE', schema=(:playlist {{plName}}) )'.",
                EQUIVALENT_CONSTRAINT_MESSAGE, name
            );
            let code = if inner.legacy_schema_errors {
                "Neo.DatabaseError.Schema.ConstraintCreationFailed"
            } else {
                EQUIVALENT_SCHEMA_RULE_CODE
            };
            return Err(StoreError::neo4j(code, message));
        }

        inner.graph.constraints.insert(name);
        debug!(constraint = name, "Installed constraint");
        Ok(())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}

/// Transaction over a `MemoryGraph`; holds the store lock while open
struct MemoryTxn {
    guard: OwnedMutexGuard<Inner>,
    staged: GraphSnapshot,
}

impl MemoryTxn {
    fn check_fault(&self, statement: &Statement) -> Result<(), StoreError> {
        match self.guard.fail_on {
            Some(name) if name == statement.name() => Err(StoreError::neo4j(
                INJECTED_FAILURE_CODE,
                format!("injected failure on {}", name),
            )),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl GraphTxn for MemoryTxn {
    async fn count(&mut self, statement: &Statement) -> Result<i64, StoreError> {
        self.check_fault(statement)?;
        self.staged.count(statement)
    }

    async fn run(&mut self, statement: &Statement) -> Result<(), StoreError> {
        self.check_fault(statement)?;
        self.staged.apply(statement);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let MemoryTxn { mut guard, staged } = *self;
        guard.graph = staged;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        Ok(())
    }
}

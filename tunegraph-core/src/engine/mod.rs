//! Relationship state machine
//!
//! Every operation follows the same shape:
//! 1. `begin()` a transaction on the shared store
//! 2. run the existence checks, stopping at the first failure
//! 3. write every edge of the operation
//! 4. commit once, or roll back on any failure
//!
//! Store failures never escape: they come back as `GenericError` outcomes.

mod follows;
mod likes;
mod validator;

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::error::EngineError;
use crate::status::QueryOutcome;
use crate::store::{GraphStore, GraphTxn};

/// Outcome messages; callers match on the kind, never on these strings
pub mod messages {
    pub const SONG_NOT_FOUND: &str = "Song does not exist";
    pub const USER_NOT_FOUND: &str = "User does not exist";
    pub const FRIEND_NOT_FOUND: &str = "Friend does not exist";
    pub const FAVORITES_NOT_FOUND: &str = "Favorites playlist does not exist";
    pub const ALREADY_LIKED: &str = "Song is already liked by user";
    pub const NOT_LIKED: &str = "Song is not liked by user";
    pub const LIKED: &str = "Song liked and added to playlist!";
    pub const UNLIKED: &str = "Song Unliked and removed from playlist!";
    pub const SELF_FOLLOW: &str = "User cannot follow themselves";
    pub const ALREADY_FOLLOWING: &str = "User already follows friend";
    pub const NOT_FOLLOWING: &str = "User does not follow friend";
    pub const FOLLOWED: &str = "User now follows friend";
    pub const UNFOLLOWED: &str = "User unfollowed friend";
}

/// One unit of work, run inside a single transaction
#[derive(Debug, Clone, Copy)]
enum Operation<'a> {
    Like { user_name: &'a str, song_id: &'a str },
    Unlike { user_name: &'a str, song_id: &'a str },
    Follow { user_name: &'a str, friend_user_name: &'a str },
    Unfollow { user_name: &'a str, friend_user_name: &'a str },
}

impl Operation<'_> {
    fn name(&self) -> &'static str {
        match self {
            Self::Like { .. } => "like_song",
            Self::Unlike { .. } => "unlike_song",
            Self::Follow { .. } => "follow_friend",
            Self::Unfollow { .. } => "unfollow_friend",
        }
    }

    async fn apply(self, txn: &mut dyn GraphTxn) -> Result<&'static str, EngineError> {
        match self {
            Self::Like { user_name, song_id } => likes::like(txn, user_name, song_id).await,
            Self::Unlike { user_name, song_id } => likes::unlike(txn, user_name, song_id).await,
            Self::Follow {
                user_name,
                friend_user_name,
            } => follows::follow(txn, user_name, friend_user_name).await,
            Self::Unfollow {
                user_name,
                friend_user_name,
            } => follows::unfollow(txn, user_name, friend_user_name).await,
        }
    }
}

/// Like/unlike and follow/unfollow over a shared graph store
#[derive(Clone)]
pub struct RelationshipEngine {
    store: Arc<dyn GraphStore>,
}

impl RelationshipEngine {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// Like a song: adds the likes edge and the favorites-playlist entry.
    #[tracing::instrument(skip(self))]
    pub async fn like_song(&self, user_name: &str, song_id: &str) -> QueryOutcome {
        self.execute(Operation::Like { user_name, song_id }).await
    }

    /// Unlike a song: removes the likes edge and the favorites-playlist entry.
    #[tracing::instrument(skip(self))]
    pub async fn unlike_song(&self, user_name: &str, song_id: &str) -> QueryOutcome {
        self.execute(Operation::Unlike { user_name, song_id }).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn follow_friend(&self, user_name: &str, friend_user_name: &str) -> QueryOutcome {
        self.execute(Operation::Follow {
            user_name,
            friend_user_name,
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn unfollow_friend(&self, user_name: &str, friend_user_name: &str) -> QueryOutcome {
        self.execute(Operation::Unfollow {
            user_name,
            friend_user_name,
        })
        .await
    }

    async fn execute(&self, op: Operation<'_>) -> QueryOutcome {
        let result = self.run_in_transaction(op).await;

        match result {
            Ok(message) => {
                info!(operation = op.name(), "{}", message);
                QueryOutcome::ok(message)
            }
            Err(err @ EngineError::Store(_)) => {
                error!(operation = op.name(), error = %err, "Operation failed");
                err.into()
            }
            Err(err @ EngineError::Conflict(_)) => {
                warn!(operation = op.name(), outcome = %err, "Operation refused");
                err.into()
            }
            Err(err) => {
                debug!(operation = op.name(), outcome = %err, "Operation refused");
                err.into()
            }
        }
    }

    async fn run_in_transaction(&self, op: Operation<'_>) -> Result<&'static str, EngineError> {
        let mut txn = self.store.begin().await?;
        let applied = op.apply(&mut *txn).await;

        match applied {
            Ok(message) => {
                txn.commit().await?;
                Ok(message)
            }
            Err(err) => {
                if let Err(rollback_err) = txn.rollback().await {
                    warn!(operation = op.name(), error = %rollback_err, "Rollback failed");
                }
                Err(err)
            }
        }
    }
}

//! Like / unlike: the likes edge and its favorites-playlist mirror
//!
//! Both edges are written in the caller's transaction; the caller commits
//! once after the last write.

use tracing::debug;

use super::messages::{ALREADY_LIKED, LIKED, NOT_LIKED, UNLIKED, USER_NOT_FOUND};
use super::validator;
use crate::error::EngineError;
use crate::store::{GraphTxn, Statement};

pub(super) async fn like(
    txn: &mut dyn GraphTxn,
    user_name: &str,
    song_id: &str,
) -> Result<&'static str, EngineError> {
    let song = validator::require_song(txn, song_id).await?;
    let user = validator::require_profile(txn, user_name, USER_NOT_FOUND).await?;
    let pl_name = validator::require_favorites(txn, &user).await?;

    if validator::likes_exists(txn, &user, &song).await? {
        return Err(EngineError::Conflict(ALREADY_LIKED));
    }

    txn.run(&Statement::MergeLikes {
        user_name: user.as_str().to_owned(),
        song_id: song.as_str().to_owned(),
    })
    .await?;
    debug!("Merged likes edge");

    txn.run(&Statement::MergeIncludes {
        pl_name,
        song_id: song.as_str().to_owned(),
    })
    .await?;
    debug!("Merged includes edge");

    Ok(LIKED)
}

pub(super) async fn unlike(
    txn: &mut dyn GraphTxn,
    user_name: &str,
    song_id: &str,
) -> Result<&'static str, EngineError> {
    let song = validator::require_song(txn, song_id).await?;
    let user = validator::require_profile(txn, user_name, USER_NOT_FOUND).await?;

    if !validator::likes_exists(txn, &user, &song).await? {
        return Err(EngineError::Conflict(NOT_LIKED));
    }

    txn.run(&Statement::DeleteIncludes {
        pl_name: user.favorites_playlist(),
        song_id: song.as_str().to_owned(),
    })
    .await?;
    debug!("Deleted includes edge");

    txn.run(&Statement::DeleteLikes {
        user_name: user.as_str().to_owned(),
        song_id: song.as_str().to_owned(),
    })
    .await?;
    debug!("Deleted likes edge");

    Ok(UNLIKED)
}

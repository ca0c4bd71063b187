//! Existence checks run at the start of every relationship operation
//!
//! Each check short-circuits with `EngineError::NotFound` when the node is
//! absent. Identifiers go to the store unchanged.

use super::messages::{FAVORITES_NOT_FOUND, SONG_NOT_FOUND};
use crate::error::EngineError;
use crate::models::{SongId, UserName};
use crate::store::{GraphTxn, Statement};

pub(super) async fn require_song(
    txn: &mut dyn GraphTxn,
    song_id: &str,
) -> Result<SongId, EngineError> {
    let song = SongId::new(song_id);

    let count = txn
        .count(&Statement::CountSong {
            song_id: song.as_str().to_owned(),
        })
        .await?;
    if count == 0 {
        return Err(EngineError::NotFound(SONG_NOT_FOUND));
    }

    Ok(song)
}

/// `missing` is the not-found message, which differs for users and friends.
pub(super) async fn require_profile(
    txn: &mut dyn GraphTxn,
    user_name: &str,
    missing: &'static str,
) -> Result<UserName, EngineError> {
    let user = UserName::new(user_name);

    let count = txn
        .count(&Statement::CountProfile {
            user_name: user.as_str().to_owned(),
        })
        .await?;
    if count == 0 {
        return Err(EngineError::NotFound(missing));
    }

    Ok(user)
}

/// Returns the favorites playlist name once it is known to exist.
pub(super) async fn require_favorites(
    txn: &mut dyn GraphTxn,
    user: &UserName,
) -> Result<String, EngineError> {
    let pl_name = user.favorites_playlist();
    let count = txn
        .count(&Statement::CountPlaylist {
            pl_name: pl_name.clone(),
        })
        .await?;
    if count == 0 {
        return Err(EngineError::NotFound(FAVORITES_NOT_FOUND));
    }

    Ok(pl_name)
}

pub(super) async fn likes_exists(
    txn: &mut dyn GraphTxn,
    user: &UserName,
    song: &SongId,
) -> Result<bool, EngineError> {
    let count = txn
        .count(&Statement::CountLikes {
            user_name: user.as_str().to_owned(),
            song_id: song.as_str().to_owned(),
        })
        .await?;
    Ok(count > 0)
}

pub(super) async fn follows_exists(
    txn: &mut dyn GraphTxn,
    user: &UserName,
    friend: &UserName,
) -> Result<bool, EngineError> {
    let count = txn
        .count(&Statement::CountFollows {
            user_name: user.as_str().to_owned(),
            friend_user_name: friend.as_str().to_owned(),
        })
        .await?;
    Ok(count > 0)
}

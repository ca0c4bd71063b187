//! Follow / unfollow between two profiles

use super::messages::{
    ALREADY_FOLLOWING, FOLLOWED, FRIEND_NOT_FOUND, NOT_FOLLOWING, SELF_FOLLOW, UNFOLLOWED,
    USER_NOT_FOUND,
};
use super::validator;
use crate::error::EngineError;
use crate::store::{GraphTxn, Statement};

pub(super) async fn follow(
    txn: &mut dyn GraphTxn,
    user_name: &str,
    friend_user_name: &str,
) -> Result<&'static str, EngineError> {
    let user = validator::require_profile(txn, user_name, USER_NOT_FOUND).await?;
    let friend = validator::require_profile(txn, friend_user_name, FRIEND_NOT_FOUND).await?;

    if user == friend {
        return Err(EngineError::Conflict(SELF_FOLLOW));
    }
    if validator::follows_exists(txn, &user, &friend).await? {
        return Err(EngineError::Conflict(ALREADY_FOLLOWING));
    }

    txn.run(&Statement::MergeFollows {
        user_name: user.into(),
        friend_user_name: friend.into(),
    })
    .await?;

    Ok(FOLLOWED)
}

pub(super) async fn unfollow(
    txn: &mut dyn GraphTxn,
    user_name: &str,
    friend_user_name: &str,
) -> Result<&'static str, EngineError> {
    let user = validator::require_profile(txn, user_name, USER_NOT_FOUND).await?;
    let friend = validator::require_profile(txn, friend_user_name, FRIEND_NOT_FOUND).await?;

    if !validator::follows_exists(txn, &user, &friend).await? {
        return Err(EngineError::Conflict(NOT_FOLLOWING));
    }

    txn.run(&Statement::DeleteFollows {
        user_name: user.into(),
        friend_user_name: friend.into(),
    })
    .await?;

    Ok(UNFOLLOWED)
}

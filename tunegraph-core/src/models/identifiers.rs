//! Profile and song identifiers
//!
//! Nodes are created by other services, which put no format limits on
//! `userName` or `songId`. Identifiers are therefore bound to queries
//! verbatim and existence is decided by the store alone.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Suffix of every user's implicit favorites playlist.
///
/// Other services create the playlist under this exact name.
pub const FAVORITES_SUFFIX: &str = "-favorites";

/// Profile user name (`profile.userName`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    /// Wrap a user name exactly as given.
    ///
    /// # Example
    /// ```
    /// use tunegraph_core::UserName;
    ///
    /// let user = UserName::new(" alice ");
    /// assert_eq!(user.as_str(), " alice ");
    /// assert_eq!(user.favorites_playlist(), " alice -favorites");
    /// ```
    pub fn new(s: &str) -> Self {
        Self(s.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of this user's favorites playlist
    pub fn favorites_playlist(&self) -> String {
        favorites_playlist_name(&self.0)
    }
}

impl From<String> for UserName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Song identifier (`song.songId`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongId(String);

impl SongId {
    pub fn new(s: &str) -> Self {
        Self(s.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SongId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<SongId> for String {
    fn from(value: SongId) -> Self {
        value.0
    }
}

impl AsRef<str> for SongId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Favorites playlist name for a user: `"{userName}-favorites"`
pub fn favorites_playlist_name(user_name: &str) -> String {
    format!("{}{}", user_name, FAVORITES_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_kept_verbatim() {
        assert_eq!(UserName::new(" bob ").as_str(), " bob ");
        assert_eq!(UserName::new("").as_str(), "");
        assert_eq!(UserName::new("ali\nce").as_str(), "ali\nce");

        let long = "x".repeat(300);
        assert_eq!(SongId::new(&long).as_str(), long);
    }

    #[test]
    fn favorites_naming_convention() {
        assert_eq!(favorites_playlist_name("alice"), "alice-favorites");
        assert_eq!(UserName::new("bob").favorites_playlist(), "bob-favorites");
        assert_eq!(UserName::new(" ").favorites_playlist(), " -favorites");
    }

    #[test]
    fn serde_is_transparent() {
        let user: UserName = serde_json::from_str("\"  \"").unwrap();
        assert_eq!(user.as_str(), "  ");
        assert_eq!(serde_json::to_string(&SongId::new("s42")).unwrap(), "\"s42\"");
    }
}

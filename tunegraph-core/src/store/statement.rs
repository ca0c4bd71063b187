//! Typed Cypher statements
//!
//! The engine only ever speaks this vocabulary. Each statement renders to a
//! parameterized Cypher query; parameter names (`userName`, `songId`,
//! `plName`, `friendUserName`) are shared with other services and must not
//! change. Count statements return a single `count` column.

/// Column read by existence checks
pub const COUNT_COLUMN: &str = "count";

/// A data statement executed inside a transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    CountSong { song_id: String },
    CountProfile { user_name: String },
    CountPlaylist { pl_name: String },
    CountLikes { user_name: String, song_id: String },
    CountFollows { user_name: String, friend_user_name: String },
    MergeLikes { user_name: String, song_id: String },
    MergeIncludes { pl_name: String, song_id: String },
    MergeFollows { user_name: String, friend_user_name: String },
    DeleteLikes { user_name: String, song_id: String },
    DeleteIncludes { pl_name: String, song_id: String },
    DeleteFollows { user_name: String, friend_user_name: String },
}

impl Statement {
    /// Stable short name, used in logs and for fault injection
    pub fn name(&self) -> &'static str {
        match self {
            Self::CountSong { .. } => "count_song",
            Self::CountProfile { .. } => "count_profile",
            Self::CountPlaylist { .. } => "count_playlist",
            Self::CountLikes { .. } => "count_likes",
            Self::CountFollows { .. } => "count_follows",
            Self::MergeLikes { .. } => "merge_likes",
            Self::MergeIncludes { .. } => "merge_includes",
            Self::MergeFollows { .. } => "merge_follows",
            Self::DeleteLikes { .. } => "delete_likes",
            Self::DeleteIncludes { .. } => "delete_includes",
            Self::DeleteFollows { .. } => "delete_follows",
        }
    }

    /// True for statements that return a `count` column
    pub fn is_count(&self) -> bool {
        matches!(
            self,
            Self::CountSong { .. }
                | Self::CountProfile { .. }
                | Self::CountPlaylist { .. }
                | Self::CountLikes { .. }
                | Self::CountFollows { .. }
        )
    }

    pub fn cypher(&self) -> &'static str {
        match self {
            Self::CountSong { .. } => "MATCH (s:song {songId: $songId}) RETURN count(s) AS count",
            Self::CountProfile { .. } => {
                "MATCH (p:profile {userName: $userName}) RETURN count(p) AS count"
            }
            Self::CountPlaylist { .. } => {
                "MATCH (pl:playlist {plName: $plName}) RETURN count(pl) AS count"
            }
            Self::CountLikes { .. } => {
                "MATCH (p:profile {userName: $userName})-[r:likes]->(s:song {songId: $songId}) \
                 RETURN count(r) AS count"
            }
            Self::CountFollows { .. } => {
                "MATCH (p:profile {userName: $userName})-[r:follows]->(f:profile {userName: $friendUserName}) \
                 RETURN count(r) AS count"
            }
            Self::MergeLikes { .. } => {
                "MATCH (p:profile {userName: $userName}), (s:song {songId: $songId}) \
                 MERGE (p)-[:likes]->(s)"
            }
            Self::MergeIncludes { .. } => {
                "MATCH (pl:playlist {plName: $plName}), (s:song {songId: $songId}) \
                 MERGE (pl)-[:includes]->(s)"
            }
            Self::MergeFollows { .. } => {
                "MATCH (p:profile {userName: $userName}), (f:profile {userName: $friendUserName}) \
                 MERGE (p)-[:follows]->(f)"
            }
            Self::DeleteLikes { .. } => {
                "MATCH (p:profile {userName: $userName})-[r:likes]->(s:song {songId: $songId}) DELETE r"
            }
            Self::DeleteIncludes { .. } => {
                "MATCH (pl:playlist {plName: $plName})-[r:includes]->(s:song {songId: $songId}) DELETE r"
            }
            Self::DeleteFollows { .. } => {
                "MATCH (p:profile {userName: $userName})-[r:follows]->(f:profile {userName: $friendUserName}) \
                 DELETE r"
            }
        }
    }

    /// Parameter bindings in query order
    pub fn params(&self) -> Vec<(&'static str, &str)> {
        match self {
            Self::CountSong { song_id } => vec![("songId", song_id.as_str())],
            Self::CountProfile { user_name } => vec![("userName", user_name.as_str())],
            Self::CountPlaylist { pl_name } => vec![("plName", pl_name.as_str())],
            Self::CountLikes { user_name, song_id }
            | Self::MergeLikes { user_name, song_id }
            | Self::DeleteLikes { user_name, song_id } => {
                vec![("userName", user_name.as_str()), ("songId", song_id.as_str())]
            }
            Self::MergeIncludes { pl_name, song_id } | Self::DeleteIncludes { pl_name, song_id } => {
                vec![("plName", pl_name.as_str()), ("songId", song_id.as_str())]
            }
            Self::CountFollows {
                user_name,
                friend_user_name,
            }
            | Self::MergeFollows {
                user_name,
                friend_user_name,
            }
            | Self::DeleteFollows {
                user_name,
                friend_user_name,
            } => vec![("userName", user_name.as_str()), ("friendUserName", friend_user_name.as_str())],
        }
    }
}

/// Schema statement run outside data transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaStatement {
    /// Every playlist node must carry `plName`
    PlaylistNameExists,
}

impl SchemaStatement {
    pub fn name(&self) -> &'static str {
        match self {
            Self::PlaylistNameExists => "playlist_plName_exists",
        }
    }

    pub fn cypher(&self) -> &'static str {
        match self {
            Self::PlaylistNameExists => {
                "CREATE CONSTRAINT playlist_plName_exists \
                 FOR (pl:playlist) REQUIRE pl.plName IS NOT NULL"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_cover_every_placeholder() {
        let statements = [
            Statement::CountSong { song_id: "s".into() },
            Statement::CountProfile { user_name: "u".into() },
            Statement::CountPlaylist { pl_name: "u-favorites".into() },
            Statement::CountLikes { user_name: "u".into(), song_id: "s".into() },
            Statement::CountFollows { user_name: "u".into(), friend_user_name: "f".into() },
            Statement::MergeLikes { user_name: "u".into(), song_id: "s".into() },
            Statement::MergeIncludes { pl_name: "p".into(), song_id: "s".into() },
            Statement::MergeFollows { user_name: "u".into(), friend_user_name: "f".into() },
            Statement::DeleteLikes { user_name: "u".into(), song_id: "s".into() },
            Statement::DeleteIncludes { pl_name: "p".into(), song_id: "s".into() },
            Statement::DeleteFollows { user_name: "u".into(), friend_user_name: "f".into() },
        ];

        for stmt in &statements {
            let cypher = stmt.cypher();
            for (name, _) in stmt.params() {
                assert!(
                    cypher.contains(&format!("${}", name)),
                    "{} does not reference ${}",
                    stmt.name(),
                    name
                );
            }
            assert_eq!(stmt.is_count(), cypher.contains("AS count"), "{}", stmt.name());
        }
    }

    #[test]
    fn edges_are_upserted() {
        let likes = Statement::MergeLikes { user_name: "u".into(), song_id: "s".into() };
        let includes = Statement::MergeIncludes { pl_name: "p".into(), song_id: "s".into() };
        assert!(likes.cypher().contains("MERGE (p)-[:likes]->(s)"));
        assert!(includes.cypher().contains("MERGE (pl)-[:includes]->(s)"));
        assert!(!includes.cypher().contains("CREATE"));
    }

    #[test]
    fn params_bind_values() {
        let stmt = Statement::DeleteIncludes {
            pl_name: "alice-favorites".into(),
            song_id: "s42".into(),
        };
        assert_eq!(
            stmt.params(),
            vec![("plName", "alice-favorites"), ("songId", "s42")]
        );
    }
}

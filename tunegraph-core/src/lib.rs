//! tunegraph-core: relationship-consistency engine for a music social graph
//!
//! Keeps per-user "liked song" edges mirrored into each user's favorites
//! playlist, inside a single store transaction per operation:
//! - `like_song` / `unlike_song` move both edges together or not at all
//! - `follow_friend` / `unfollow_friend` manage profile-to-profile edges
//! - `SchemaInitializer` installs the playlist name constraint at startup
//!
//! The store is reached through the [`GraphStore`] trait. [`Neo4jStore`]
//! talks Bolt to a Neo4j server; [`MemoryGraph`] keeps everything in process.

pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod schema;
pub mod status;
pub mod store;

pub use config::{Neo4jConfig, TunegraphConfig};
pub use engine::RelationshipEngine;
pub use error::{EngineError, StoreError};
pub use models::{favorites_playlist_name, SongId, UserName};
pub use schema::SchemaInitializer;
pub use status::{QueryOutcome, StatusKind};
pub use store::memory::MemoryGraph;
pub use store::neo4j::Neo4jStore;
pub use store::{GraphStore, GraphTxn, SchemaStatement, Statement};

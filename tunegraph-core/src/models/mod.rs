//! Identifiers for graph nodes

mod identifiers;

pub use identifiers::{favorites_playlist_name, SongId, UserName, FAVORITES_SUFFIX};

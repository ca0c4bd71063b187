//! Relationship engine behaviour against the in-memory store

use std::sync::Arc;

use tunegraph_core::engine::messages::*;
use tunegraph_core::{
    GraphStore, MemoryGraph, QueryOutcome, RelationshipEngine, SchemaInitializer, StatusKind,
};

async fn setup() -> (Arc<MemoryGraph>, RelationshipEngine) {
    let graph = Arc::new(MemoryGraph::new());
    graph.add_profile("alice").await;
    graph.add_profile("bob").await;
    graph.add_song("s42").await;
    graph.add_song("s7").await;

    let engine = RelationshipEngine::new(graph.clone());
    (graph, engine)
}

// === Like ===

#[tokio::test]
async fn like_creates_both_edges() {
    let (graph, engine) = setup().await;

    let outcome = engine.like_song("alice", "s42").await;

    assert_eq!(outcome, QueryOutcome::ok(LIKED));
    assert!(graph.has_like("alice", "s42").await);
    assert!(graph.has_include("alice-favorites", "s42").await);
}

#[tokio::test]
async fn like_twice_conflicts_and_leaves_state_unchanged() {
    let (graph, engine) = setup().await;

    assert!(engine.like_song("alice", "s42").await.is_ok());
    let after_first = graph.snapshot().await;

    let outcome = engine.like_song("alice", "s42").await;

    assert_eq!(outcome, QueryOutcome::conflict(ALREADY_LIKED));
    assert_eq!(graph.snapshot().await, after_first);
}

#[tokio::test]
async fn like_missing_song_is_not_found_regardless_of_user() {
    let (graph, engine) = setup().await;
    let before = graph.snapshot().await;

    for user in ["alice", "nobody", ""] {
        let outcome = engine.like_song(user, "missing").await;
        assert_eq!(outcome, QueryOutcome::not_found(SONG_NOT_FOUND), "user {:?}", user);
    }

    assert_eq!(graph.snapshot().await, before);
}

#[tokio::test]
async fn like_missing_user_is_not_found() {
    let (_graph, engine) = setup().await;

    let outcome = engine.like_song("nobody", "s42").await;

    assert_eq!(outcome, QueryOutcome::not_found(USER_NOT_FOUND));
}

#[tokio::test]
async fn like_without_favorites_playlist_is_not_found() {
    let (graph, engine) = setup().await;
    graph.add_profile_without_favorites("carol").await;

    let outcome = engine.like_song("carol", "s42").await;

    assert_eq!(outcome, QueryOutcome::not_found(FAVORITES_NOT_FOUND));
    assert!(!graph.has_like("carol", "s42").await);
}

#[tokio::test]
async fn unusual_identifiers_reach_the_store_verbatim() {
    let (graph, engine) = setup().await;
    let long_song = "x".repeat(300);
    graph.add_song(&long_song).await;
    graph.add_profile(" ").await;
    graph.add_song("s1").await;

    assert_eq!(engine.like_song("alice", &long_song).await, QueryOutcome::ok(LIKED));
    assert!(graph.has_include("alice-favorites", &long_song).await);

    assert_eq!(engine.like_song(" ", "s1").await, QueryOutcome::ok(LIKED));
    assert!(graph.has_like(" ", "s1").await);
    assert!(graph.has_include(" -favorites", "s1").await);

    // absent only because no such node exists
    assert_eq!(
        engine.like_song("ali\nce", "s42").await,
        QueryOutcome::not_found(USER_NOT_FOUND)
    );
    graph.add_profile("ali\nce").await;
    assert!(engine.like_song("ali\nce", "s42").await.is_ok());
}

#[tokio::test]
async fn failed_mirror_write_rolls_back_likes_edge() {
    let (graph, engine) = setup().await;
    graph.fail_statement("merge_includes").await;

    let outcome = engine.like_song("alice", "s42").await;

    assert_eq!(outcome.kind, StatusKind::GenericError);
    assert!(outcome.message.starts_with("Error: "));
    assert!(!graph.has_like("alice", "s42").await);
    assert!(!graph.has_include("alice-favorites", "s42").await);

    graph.clear_failure().await;
    assert!(engine.like_song("alice", "s42").await.is_ok());
}

// === Unlike ===

#[tokio::test]
async fn unlike_without_like_conflicts() {
    let (_graph, engine) = setup().await;

    let outcome = engine.unlike_song("alice", "s42").await;

    assert_eq!(outcome, QueryOutcome::conflict(NOT_LIKED));
}

#[tokio::test]
async fn like_then_unlike_restores_prior_graph() {
    let (graph, engine) = setup().await;
    let before = graph.snapshot().await;

    assert!(engine.like_song("alice", "s42").await.is_ok());
    let outcome = engine.unlike_song("alice", "s42").await;

    assert_eq!(outcome, QueryOutcome::ok(UNLIKED));
    assert_eq!(graph.snapshot().await, before);
}

#[tokio::test]
async fn unlike_missing_song_and_user() {
    let (_graph, engine) = setup().await;

    assert_eq!(
        engine.unlike_song("nobody", "missing").await,
        QueryOutcome::not_found(SONG_NOT_FOUND)
    );
    assert_eq!(
        engine.unlike_song("nobody", "s42").await,
        QueryOutcome::not_found(USER_NOT_FOUND)
    );
}

#[tokio::test]
async fn failed_second_delete_keeps_both_edges() {
    let (graph, engine) = setup().await;
    assert!(engine.like_song("alice", "s42").await.is_ok());
    graph.fail_statement("delete_likes").await;

    let outcome = engine.unlike_song("alice", "s42").await;

    assert_eq!(outcome.kind, StatusKind::GenericError);
    assert!(graph.has_like("alice", "s42").await);
    assert!(graph.has_include("alice-favorites", "s42").await);
}

#[tokio::test]
async fn edges_of_other_pairs_untouched() {
    let (graph, engine) = setup().await;
    assert!(engine.like_song("alice", "s42").await.is_ok());
    assert!(engine.like_song("alice", "s7").await.is_ok());
    assert!(engine.like_song("bob", "s42").await.is_ok());

    assert!(engine.unlike_song("alice", "s42").await.is_ok());

    assert!(graph.has_like("alice", "s7").await);
    assert!(graph.has_include("alice-favorites", "s7").await);
    assert!(graph.has_like("bob", "s42").await);
    assert!(graph.has_include("bob-favorites", "s42").await);
    assert!(!graph.has_include("alice-favorites", "s42").await);
}

#[tokio::test]
async fn alice_s42_scenario() {
    let (_graph, engine) = setup().await;

    let kinds = vec![
        engine.like_song("alice", "s42").await.kind,
        engine.like_song("alice", "s42").await.kind,
        engine.unlike_song("alice", "s42").await.kind,
        engine.unlike_song("alice", "s42").await.kind,
    ];

    assert_eq!(
        kinds,
        vec![
            StatusKind::Ok,
            StatusKind::Conflict,
            StatusKind::Ok,
            StatusKind::Conflict
        ]
    );
}

// === Invariant under concurrency ===

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_likes_of_same_pair_yield_one_edge() {
    let (graph, engine) = setup().await;

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let engine = engine.clone();
            tokio::spawn(async move { engine.like_song("alice", "s42").await.kind })
        })
        .collect();

    let mut ok = 0;
    for handle in handles {
        match handle.await.expect("task panicked") {
            StatusKind::Ok => ok += 1,
            StatusKind::Conflict => {}
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    assert_eq!(ok, 1);
    let snapshot = graph.snapshot().await;
    assert_eq!(snapshot.likes.len(), 1);
    assert_eq!(snapshot.includes.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn likes_and_favorites_never_diverge() {
    let (graph, engine) = setup().await;

    let handles: Vec<_> = (0..40)
        .map(|i| {
            let engine = engine.clone();
            tokio::spawn(async move {
                let user = if i % 2 == 0 { "alice" } else { "bob" };
                let song = if i % 3 == 0 { "s42" } else { "s7" };
                if i % 4 < 2 {
                    engine.like_song(user, song).await
                } else {
                    engine.unlike_song(user, song).await
                }
            })
        })
        .collect();

    for handle in handles {
        let outcome = handle.await.expect("task panicked");
        assert_ne!(outcome.kind, StatusKind::GenericError, "{}", outcome);
    }

    let snapshot = graph.snapshot().await;
    let mirrored: std::collections::BTreeSet<_> = snapshot
        .likes
        .iter()
        .map(|(user, song)| (format!("{}-favorites", user), song.clone()))
        .collect();
    assert_eq!(mirrored, snapshot.includes);
}

// === Follow ===

#[tokio::test]
async fn follow_and_unfollow_round_trip() {
    let (graph, engine) = setup().await;

    assert_eq!(engine.follow_friend("alice", "bob").await, QueryOutcome::ok(FOLLOWED));
    assert!(graph.has_follow("alice", "bob").await);
    assert!(!graph.has_follow("bob", "alice").await);

    assert_eq!(
        engine.follow_friend("alice", "bob").await,
        QueryOutcome::conflict(ALREADY_FOLLOWING)
    );

    assert_eq!(
        engine.unfollow_friend("alice", "bob").await,
        QueryOutcome::ok(UNFOLLOWED)
    );
    assert!(!graph.has_follow("alice", "bob").await);

    assert_eq!(
        engine.unfollow_friend("alice", "bob").await,
        QueryOutcome::conflict(NOT_FOLLOWING)
    );
}

#[tokio::test]
async fn follow_checks_both_profiles() {
    let (_graph, engine) = setup().await;

    assert_eq!(
        engine.follow_friend("nobody", "bob").await,
        QueryOutcome::not_found(USER_NOT_FOUND)
    );
    assert_eq!(
        engine.follow_friend("alice", "nobody").await,
        QueryOutcome::not_found(FRIEND_NOT_FOUND)
    );
    assert_eq!(
        engine.follow_friend("alice", "alice").await,
        QueryOutcome::conflict(SELF_FOLLOW)
    );
}

// === Schema and lifecycle ===

#[tokio::test]
async fn initialize_is_idempotent() {
    let (graph, _engine) = setup().await;
    let schema = SchemaInitializer::new(graph.clone());

    assert!(schema.initialize().await.is_ok());
    assert!(schema.initialize().await.is_ok());
}

#[tokio::test]
async fn closed_store_yields_generic_error() {
    let (graph, engine) = setup().await;
    graph.close().await;

    let outcome = engine.like_song("alice", "s42").await;

    assert_eq!(outcome.kind, StatusKind::GenericError);
    assert_eq!(outcome.message, "Error: graph store is closed");
}

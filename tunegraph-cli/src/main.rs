//! tunegraph CLI - drive the relationship engine from the command line
//!
//! - `init` installs the graph schema constraints (safe to repeat)
//! - `like` / `unlike` manage a user's liked songs and favorites playlist
//! - `follow` / `unfollow` manage profile-to-profile follows
//!
//! Connection settings come from ~/.tunegraph/config.toml, ./tunegraph.toml,
//! .env files and NEO4J_* environment variables.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::debug;
use tunegraph_core::config::load_dotenv;
use tunegraph_core::{
    GraphStore, Neo4jStore, QueryOutcome, RelationshipEngine, SchemaInitializer, StatusKind,
    TunegraphConfig,
};

mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "tunegraph",
    author,
    version,
    about = "Manage liked songs, favorites playlists and follows in a Neo4j music graph",
    long_about = "Transactional like/unlike and follow/unfollow operations against a Neo4j \
                  property graph. Every operation reports OK, NOT_FOUND, CONFLICT or \
                  GENERIC_ERROR."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Print outcomes as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Config file to use instead of ~/.tunegraph/config.toml and ./tunegraph.toml
    #[arg(long, global = true, env = "TUNEGRAPH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Install graph schema constraints (idempotent)
    Init,
    /// Like a song and add it to the user's favorites playlist
    Like(SongArgs),
    /// Unlike a song and remove it from the user's favorites playlist
    Unlike(SongArgs),
    /// Follow another user
    Follow(FriendArgs),
    /// Stop following another user
    Unfollow(FriendArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
struct SongArgs {
    /// User name of the profile
    user_name: String,
    /// Song id
    song_id: String,
}

#[derive(Args, Debug)]
struct FriendArgs {
    /// User name of the profile
    user_name: String,
    /// User name of the friend
    friend_user_name: String,
}

#[derive(Args, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

/// Exit status for an operation outcome
fn exit_status(outcome: &QueryOutcome) -> u8 {
    match outcome.kind {
        StatusKind::Ok => 0,
        StatusKind::NotFound | StatusKind::Conflict => 2,
        StatusKind::GenericError => 1,
    }
}

fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "tunegraph", &mut io::stdout());
}

fn print_outcome(outcome: &QueryOutcome, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(outcome)?);
    } else {
        println!("{}", outcome);
    }
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<TunegraphConfig> {
    load_dotenv()?;
    match path {
        Some(path) => TunegraphConfig::load_from(path),
        None => Ok(TunegraphConfig::load()),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Completions need neither logging nor a database
    if let Commands::Completions(args) = &cli.command {
        print_completions(args.shell);
        return Ok(ExitCode::SUCCESS);
    }

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug })?;

    let config = load_config(cli.config.as_ref())?;
    debug!(?config, "Resolved configuration");

    let store: Arc<dyn GraphStore> = Arc::new(
        Neo4jStore::connect(&config.neo4j)
            .await
            .with_context(|| format!("Failed to connect to Neo4j at {}", config.neo4j.uri))?,
    );

    let result = run(&cli, store.clone()).await;
    store.close().await;
    result
}

async fn run(cli: &Cli, store: Arc<dyn GraphStore>) -> Result<ExitCode> {
    let engine = RelationshipEngine::new(store.clone());

    let outcome = match &cli.command {
        Commands::Init => {
            SchemaInitializer::new(store)
                .initialize()
                .await
                .context("Schema initialization failed")?;
            QueryOutcome::ok("Schema initialized")
        }
        Commands::Like(args) => engine.like_song(&args.user_name, &args.song_id).await,
        Commands::Unlike(args) => engine.unlike_song(&args.user_name, &args.song_id).await,
        Commands::Follow(args) => {
            engine
                .follow_friend(&args.user_name, &args.friend_user_name)
                .await
        }
        Commands::Unfollow(args) => {
            engine
                .unfollow_friend(&args.user_name, &args.friend_user_name)
                .await
        }
        Commands::Completions(args) => {
            print_completions(args.shell);
            return Ok(ExitCode::SUCCESS);
        }
    };

    print_outcome(&outcome, cli.json)?;
    Ok(ExitCode::from(exit_status(&outcome)))
}

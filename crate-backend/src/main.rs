use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use futures::StreamExt;
use tracing_subscriber::EnvFilter;
use types::{ListingId, UserCreate};

use perch_backend::cli::{Args, Command};
use perch_backend::config::Config;
use perch_backend::data::memory::Memory;
use perch_backend::state::ServerState;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load(&args.config)?;
    let sub = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.rust_log)?)
        .finish();
    tracing::subscriber::set_global_default(sub)?;

    match args.command {
        Command::Check {} => {
            println!("config ok");
        }
        Command::Demo {} => demo(config).await?,
    }
    Ok(())
}

async fn demo(config: Config) -> Result<()> {
    let state = ServerState::init(config, Arc::new(Memory::new()));
    let srv = state.services();

    let anna = srv
        .users
        .register(UserCreate {
            display_name: "Anna".to_string(),
            email: "anna@example.com".to_string(),
        })
        .await?;
    let bruno = srv
        .users
        .register(UserCreate {
            display_name: "Bruno".to_string(),
            email: "bruno@example.com".to_string(),
        })
        .await?;
    let listing_id = ListingId::new();

    // bruno asks about anna's listing
    srv.sessions.sign_in(bruno.id).await?;
    let thread_id = srv.chats.get_or_create(listing_id, anna.id).await?;
    srv.messages
        .send(thread_id, "hi! is the flat still available?")
        .await?;
    srv.messages
        .send(thread_id, "i could come by on saturday")
        .await?;
    srv.sessions.sign_out();

    // anna checks her chats
    srv.sessions.sign_in(anna.id).await?;
    let mut previews = srv.previews.listen_for_user(anna.id);
    let list = previews.next().await.expect("preview stream ended")?;
    println!("before reading:\n{}", serde_json::to_string_pretty(&list)?);

    srv.unread.mark_as_read(thread_id).await?;
    let list = previews.next().await.expect("preview stream ended")?;
    println!("after reading:\n{}", serde_json::to_string_pretty(&list)?);
    Ok(())
}

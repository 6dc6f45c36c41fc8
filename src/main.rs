use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn, Instrument};

use user_pager::app_system::{setup_tracing, PagerConfig, UsersSystem};
use user_pager::gateway::InMemoryGateway;
use user_pager::users_actor::FetchOutcome;

/// Walks an in-memory users store the way a scrolling list would.
#[derive(Debug, Parser)]
#[command(name = "user_pager", version)]
struct Args {
    /// TOML file with `page_size`, `buffer_size` and `seed_users`.
    #[arg(long, default_value = "user_pager.toml")]
    config: PathBuf,

    /// Reject the demo edit remotely to show the rollback.
    #[arg(long)]
    fail_updates: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();
    let args = Args::parse();
    let config = PagerConfig::load(&args.config)?;

    info!(?config, "Starting users system");

    let gateway = InMemoryGateway::seeded(config.seed_users);
    let system = UsersSystem::new(&config, Arc::new(gateway.clone()));
    let client = system.users_client.clone();

    let span = tracing::info_span!("scrolling");
    async {
        loop {
            match client.load_more().await {
                Ok(FetchOutcome::Loaded { received }) => info!(received, "Page loaded"),
                Ok(FetchOutcome::Exhausted) => break,
                Ok(FetchOutcome::Skipped) => tokio::task::yield_now().await,
                Err(e) => {
                    error!(error = %e, "Fetch failed");
                    break;
                }
            }
        }
    }
    .instrument(span)
    .await;

    let view = client.view().await?;
    info!(users = view.users.len(), has_more = view.has_more, "Scrolled to the end");

    if let Some(first) = view.users.first().cloned() {
        let span = tracing::info_span!("editing", user_id = first.id);
        async {
            client.select_user(Some(first.clone())).await?;
            if args.fail_updates {
                gateway.fail_writes(first.id).await;
            }

            let edited = first.with_name("Alice");
            match client.edit_user(edited).await {
                Ok(()) => info!("Edit saved"),
                Err(e) => warn!(error = %e, "Edit rolled back"),
            }

            let shown = client.view().await?;
            info!(name = ?shown.users.first().map(|u| u.name.as_str()), "Name after edit");
            Ok::<_, user_pager::users_actor::StoreError>(())
        }
        .instrument(span)
        .await?;
    }

    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}

//! Agents Island engine - runs a demo Love Shack chat and Challenge Arena
//! battle against the configured providers and logs the results.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use island_domain::EncounterSnapshot;
use island_engine::infrastructure::config::{load_dotenv_from_repo_root, EngineConfig};
use island_engine::use_cases::encounter::EncounterHandle;
use island_engine::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root.
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "island_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Agents Island engine");

    let config = EngineConfig::from_env();
    tracing::info!(backend = ?config.dialogue_backend, "Configuration loaded");

    let app = App::from_config(&config);

    let wallet = std::env::var("DEMO_WALLET").unwrap_or_else(|_| "0xdemo-mike".into());

    let chat = app.use_cases.encounter.chat(&wallet).await?;
    let snapshot = follow(chat).await?;
    report(&snapshot);

    let battle = app.use_cases.encounter.battle(&wallet).await?;
    let snapshot = follow(battle).await?;
    report(&snapshot);

    Ok(())
}

/// Log progress until the encounter ends, or abandon it on Ctrl+C.
async fn follow(handle: EncounterHandle) -> anyhow::Result<EncounterSnapshot> {
    let mut updates = handle.subscribe();
    let mut seen = 0usize;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!(encounter_id = %handle.id(), "Interrupted, leaving encounter");
                handle.cancel();
                break;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                for turn in snapshot.transcript.iter().skip(seen) {
                    tracing::info!(
                        remaining = snapshot.clock_remaining,
                        speaker = ?turn.speaker,
                        "{}",
                        turn.content
                    );
                }
                seen = snapshot.transcript.len();
            }
        }
    }

    Ok(handle.join().await?)
}

fn report(snapshot: &EncounterSnapshot) {
    match &snapshot.outcome {
        Some(outcome) => tracing::info!(
            encounter_id = %snapshot.id,
            mode = %snapshot.mode,
            winner = ?outcome.winner,
            wins_a = outcome.wins_a,
            wins_b = outcome.wins_b,
            points = ?snapshot.points,
            "Encounter finished"
        ),
        None => tracing::info!(encounter_id = %snapshot.id, "Encounter abandoned"),
    }
}

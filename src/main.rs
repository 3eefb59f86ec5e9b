//! CLI for chatcore
//!
//! Runs a simulated chat room on an in-process broker: every participant
//! sends a mix of broadcasts and direct messages while reading its own inbox,
//! then the broker is shut down and a summary is printed.

use std::sync::Arc;

use chatcore::broker::{Broker, Message};
use chatcore::client::Client;
use chatcore::config::{Settings, load_config};
use chatcore::persistence::HistoryRecorder;
use chatcore::utils::{CancellationToken, logging};
use clap::Parser;
use tokio::task::JoinSet;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "chatcore", about = "Simulated chat room on an in-process broker")]
struct Cli {
    /// Number of simulated participants
    #[arg(long, default_value_t = 4)]
    participants: usize,

    /// Messages sent by each participant
    #[arg(long, default_value_t = 10)]
    messages: usize,

    /// Per-participant inbox capacity (defaults to broker.inbox_capacity)
    #[arg(long)]
    inbox_capacity: Option<usize>,

    /// Log level, overriding logging.level from the configuration
    #[arg(long)]
    log_level: Option<String>,

    /// Print the recorded history as JSON lines after shutdown
    #[arg(long)]
    dump_history: bool,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let settings = match load_config() {
        Ok(settings) => settings,
        Err(e) => {
            logging::init("info");
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    logging::init(cli.log_level.as_deref().unwrap_or(&settings.logging.level));

    if let Err(e) = run(cli, settings).await {
        error!("Simulation failed: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let token = CancellationToken::new();
    let broker = Arc::new(Broker::with_settings(&settings.broker, token.clone()));

    let recorder = if settings.history.enabled {
        Some(HistoryRecorder::from_settings(&broker, &settings.history).await)
    } else {
        None
    };

    let inbox_capacity = cli.inbox_capacity.unwrap_or(settings.broker.inbox_capacity);
    let names: Vec<String> = (0..cli.participants).map(|i| format!("user-{i}")).collect();

    let mut readers = JoinSet::new();
    for name in &names {
        let mut client = Client::join(&broker, name.clone(), inbox_capacity).await;
        readers.spawn(async move {
            let mut received = 0usize;
            while client.recv().await.is_some() {
                received += 1;
            }
            (client.id, received)
        });
    }
    info!(participants = names.len(), inbox_capacity, "Participants joined");

    let mut senders = JoinSet::new();
    for (i, name) in names.iter().enumerate() {
        let broker = broker.clone();
        let sender = name.clone();
        let peer = names[(i + 1) % names.len()].clone();
        let count = cli.messages;
        senders.spawn(async move {
            for n in 0..count {
                let message = if n % 2 == 0 {
                    Message::broadcast(sender.clone(), format!("{sender} says hello #{n}"))
                } else {
                    Message::direct(sender.clone(), peer.clone(), format!("psst {peer} #{n}"))
                };
                if broker.submit(message).await.is_err() {
                    break;
                }
            }
        });
    }

    tokio::select! {
        _ = async { while senders.join_next().await.is_some() {} } => {
            info!("All participants finished sending");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting gracefully.");
            token.cancel();
        }
    }

    // Let the dispatch task catch up before pulling the plug.
    let expected = (cli.participants * cli.messages) as u64;
    while broker.stats().dispatched < expected && !token.is_cancelled() {
        tokio::time::sleep(std::time::Duration::from_millis(1)).await;
    }
    broker.shutdown().await;

    let mut received = Vec::new();
    while let Some(joined) = readers.join_next().await {
        received.push(joined?);
    }
    received.sort();
    for (id, count) in &received {
        println!("{id}: received {count}");
    }

    let stats = broker.stats();
    println!(
        "dispatched={} delivered={} dropped_full={} dropped_closed={} unroutable={}",
        stats.dispatched, stats.delivered, stats.dropped_full, stats.dropped_closed, stats.unroutable
    );

    if let Some(recorder) = recorder {
        let store = recorder.store().clone();
        let recorded = recorder.finish().await;
        println!("history: recorded {recorded} of {} capacity", store.capacity());

        if cli.dump_history {
            for stored in store.get_messages(None).await {
                println!("{}", serde_json::to_string(&stored)?);
            }
        }
    }

    Ok(())
}

//! onemore - play a battle from the command line
//!
//! Heroes are played by the built-in autopilot; the battle log and
//! navigator lines are printed as they happen.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use onemore::battle::{ai, BattleEvent, InstantPacer, Pacing, Phase};
use onemore::content::Content;
use onemore::navigator::{NavigatorClient, API_KEY_ENV};
use onemore::{BattleEngine, Config};

/// Persona-style battle demo
#[derive(Parser, Debug)]
#[command(name = "onemore", version, about = "Run an auto-played battle")]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Party hero ids, comma separated (e.g. hero_1,hero_2)
    #[arg(short, long, value_delimiter = ',')]
    party: Vec<String>,

    /// RNG seed for a reproducible battle
    #[arg(short, long)]
    seed: Option<u64>,

    /// Skip all pauses
    #[arg(long)]
    instant: bool,

    /// Ask the navigator for advice at the start of each hero turn
    #[arg(long)]
    advice: bool,

    /// Print raw events as JSON lines instead of the battle log
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "onemore=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Parse CLI arguments
    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    let party = if args.party.is_empty() {
        config.party.clone()
    } else {
        args.party.clone()
    };
    let seed = args.seed.or(config.seed);

    let content = Content::shared();
    let mut engine = BattleEngine::initialize(content.clone(), party.as_slice())?.with_seed(seed);
    if args.instant {
        engine = engine
            .with_pacing(Pacing::instant())
            .with_pacer(Arc::new(InstantPacer));
    } else {
        engine = engine.with_pacing(config.pacing.clone());
    }
    if args.advice {
        let navigator = NavigatorClient::shared(config.navigator.clone())?;
        if !navigator.is_configured() {
            warn!("{} not set, navigator advice will use stock lines", API_KEY_ENV);
        }
        engine = engine.with_navigator(navigator);
    }
    let engine = engine.shared();

    // Print as it happens
    let mut events = engine.subscribe();
    let json = args.json;
    let printer = tokio::spawn(async move {
        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(missed)) => {
                    warn!("Printer fell behind, {} events dropped", missed);
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            if json {
                match serde_json::to_string(&event) {
                    Ok(line) => println!("{}", line),
                    Err(e) => warn!("Failed to encode event: {}", e),
                }
                continue;
            }
            match event {
                BattleEvent::Log(line) => println!("{}", line),
                BattleEvent::NavigatorLine { line, .. } => println!("  [Navigator] {}", line),
                BattleEvent::NavigatorAdvice(advice) => println!("  [Navigator] {}", advice),
                BattleEvent::Achievement(achievement) => {
                    println!("  ** Achievement unlocked: {} **", achievement)
                }
                _ => {}
            }
        }
    });

    let opening = engine.snapshot().await;
    match opening.log().first() {
        Some(line) if !args.json => println!("{}", line),
        _ => {}
    }

    engine.start().await?;

    loop {
        let state = engine.snapshot().await;
        match state.phase() {
            Phase::Victory | Phase::Defeat => break,
            Phase::PlayerInput => {}
            phase => {
                warn!("Engine idle in {}", phase);
                break;
            }
        }

        if args.advice {
            if let Some(handle) = engine.request_advice().await {
                handle.await?;
            }
        }

        let Some(hero) = state.current_unit() else {
            break;
        };
        let action = ai::autopilot(&state, &content, &hero.id);
        engine.submit_action(&hero.id, action).await?;
    }

    let state = engine.snapshot().await;
    info!("Battle {} ended in {}", state.id, state.phase());
    drop(engine);
    printer.await?;

    if args.json {
        println!("{}", serde_json::to_string(&state)?);
        return Ok(());
    }

    match state.phase() {
        Phase::Victory => println!("\nVICTORY!"),
        _ => println!("\nDEFEAT..."),
    }

    Ok(())
}

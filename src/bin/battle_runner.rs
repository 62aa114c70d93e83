//! Headless Battle Runner
//!
//! Runs an AI vs AI battle (the full player party against a warband) and
//! prints a JSON or text report. Useful for eyeballing rule changes.

use bloodsword::battle::{
    AiChooser, Battle, BattleCondition, BattleEngine, BattleEvent, BattleMap, EventSink, NullSink,
};
use bloodsword::character::{opponent, Archetype, Party};
use bloodsword::core::{EngineConfig, Point, Result};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// Headless Battle Runner - AI vs AI battles
#[derive(Parser, Debug)]
#[command(name = "battle_runner")]
#[command(about = "Run an AI vs AI battle and print the result")]
struct Args {
    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Round limit (battle ends in Determine when reached)
    #[arg(long)]
    rounds: Option<u32>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Engine config TOML (defaults to built-in values)
    #[arg(long)]
    config: Option<String>,

    /// Print every battle event to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct RunnerReport {
    result: String,
    rounds: u32,
    players_alive: usize,
    opponents_alive: usize,
    events: usize,
    seed: u64,
}

/// Prints events as they happen
struct StderrSink;

impl EventSink for StderrSink {
    fn on_event(&mut self, event: &BattleEvent) {
        eprintln!("  [{}] {}", event.round, event.description);
    }
}

const ARENA: [&str; 8] = [
    "E..........E",
    "............",
    "...##..##...",
    "............",
    "....~~~~....",
    "...##..##...",
    "............",
    "............",
];

fn warband() -> Party {
    Party::new(vec![
        opponent("Barbarian", 7, 6, 5, 12, 1, (1, 1)),
        opponent("Barbarian", 7, 6, 5, 12, 1, (1, 1)),
        opponent("Chieftain", 8, 7, 6, 15, 2, (2, 0)),
        opponent("Archer", 6, 8, 6, 8, 0, (1, 0)),
    ])
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let seed = args.seed.unwrap_or_else(rand::random);
    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    let players: Party = Archetype::ALL.iter().map(|a| a.create()).collect();
    let mut battle = Battle::new(BattleMap::from_layout(&ARENA), warband())
        .with_condition(BattleCondition::SurvivorsCarryOver(2))
        .with_player_start((0..4).map(|x| Point::new(4 + x, 0)).collect())
        .with_opponent_start((0..4).map(|x| Point::new(4 + x, 7)).collect());
    if let Some(rounds) = args.rounds {
        battle = battle.with_round_limit(rounds);
    }

    let mut engine = BattleEngine::new(players, battle, config, ChaCha8Rng::seed_from_u64(seed))?;

    if args.verbose {
        eprintln!("=== Battle Started (seed {}) ===", seed);
    }
    let report = if args.verbose {
        engine.run(&mut AiChooser::new(), &mut StderrSink)?
    } else {
        engine.run(&mut AiChooser::new(), &mut NullSink)?
    };

    let field = engine.field();
    let output = RunnerReport {
        result: format!("{:?}", report.result),
        rounds: report.rounds,
        players_alive: field.players.count_alive(),
        opponents_alive: field.opponents.count_alive(),
        events: engine.events().len(),
        seed,
    };

    match args.format.as_str() {
        "text" => {
            println!("Battle Result");
            println!("=============");
            println!("Result: {}", output.result);
            println!("Rounds: {}", output.rounds);
            println!("Players alive: {}", output.players_alive);
            println!("Opponents alive: {}", output.opponents_alive);
            println!("Survivors carried over: {}", report.survivors.len());
            println!("Seed: {}", output.seed);
        }
        "json" => println!("{}", serde_json::to_string_pretty(&output)?),
        other => {
            eprintln!("Unknown format '{}', defaulting to json", other);
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

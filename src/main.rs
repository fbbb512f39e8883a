//! Gridiron - Provably Fair Football Simulation CLI
//!
//! Simulate single games, publish seed commitments, verify revealed seeds
//! and run batches of independent games in parallel.

use clap::{Parser, Subcommand};
use gridiron::{
    compute_value_at_nonce,
    config::ConfigLoader,
    demo,
    engine::{GameState, Side, SimulationResult},
    simulate_game, verify_game_replay, verify_server_seed, GameType, GridironResult, SeedManager,
    SimulationConfig, SimulationRequest, TeamSheet,
};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Instant,
};
use tokio::sync::Semaphore;
use tracing::{error, info};

/// Gridiron football simulator
#[derive(Parser)]
#[command(name = "gridiron")]
#[command(about = "Provably fair play-by-play football simulation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one game and print the play-by-play
    Simulate {
        /// Home team JSON file (defaults to the sample matchup)
        #[arg(long, requires = "away")]
        home: Option<PathBuf>,

        /// Away team JSON file
        #[arg(long, requires = "home")]
        away: Option<PathBuf>,

        /// Replay with this server seed (hex)
        #[arg(long, requires = "client_seed")]
        server_seed: Option<String>,

        /// Client seed to pair with --server-seed
        #[arg(long, requires = "server_seed")]
        client_seed: Option<String>,

        /// regular, wild_card, divisional, conference or super_bowl
        #[arg(short, long, default_value = "regular")]
        game_type: GameType,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a fresh public seed commitment
    Seeds,

    /// Check revealed seeds against a commitment
    Verify {
        /// Revealed server seed (hex)
        #[arg(long)]
        server_seed: String,

        /// Published SHA-256 commitment
        #[arg(long)]
        hash: String,

        /// Client seed, needed to replay draws
        #[arg(long)]
        client_seed: Option<String>,

        /// First nonce of the replay
        #[arg(long, default_value = "0")]
        start_nonce: u64,

        /// Number of draws to replay
        #[arg(long)]
        count: Option<f64>,

        /// Print the single value at this nonce
        #[arg(long)]
        nonce: Option<u64>,
    },

    /// Run many independent games in parallel
    Batch {
        /// Number of games
        #[arg(short = 'n', long, default_value = "100")]
        games: usize,

        /// Games running at once
        #[arg(short = 'j', long, default_value = "4")]
        concurrency: usize,

        /// regular, wild_card, divisional, conference or super_bowl
        #[arg(short, long, default_value = "regular")]
        game_type: GameType,
    },
}

#[tokio::main]
async fn main() -> GridironResult<()> {
    let cli = Cli::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_path(path);
    }
    let config = loader.load()?;

    let default_filter = if cli.verbose {
        "debug"
    } else {
        config.logging.level.as_filter()
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Simulate {
            home,
            away,
            server_seed,
            client_seed,
            game_type,
            json,
        } => {
            let (home, away) = match (home, away) {
                (Some(home), Some(away)) => (load_team(&home)?, load_team(&away)?),
                _ => demo::demo_matchup(),
            };
            run_simulate(&config, home, away, server_seed.zip(client_seed), game_type, json)
        }
        Commands::Seeds => {
            let triple = SeedManager::generate_game_seeds();
            println!(
                "{}",
                serde_json::to_string_pretty(&SeedManager::get_public_seeds(&triple))?
            );
            Ok(())
        }
        Commands::Verify {
            server_seed,
            hash,
            client_seed,
            start_nonce,
            count,
            nonce,
        } => {
            run_verify(&server_seed, &hash, client_seed.as_deref(), start_nonce, count, nonce);
            Ok(())
        }
        Commands::Batch {
            games,
            concurrency,
            game_type,
        } => run_batch(config, games, concurrency, game_type).await,
    }
}

fn load_team(path: &Path) -> GridironResult<TeamSheet> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn run_simulate(
    config: &SimulationConfig,
    home: TeamSheet,
    away: TeamSheet,
    seeds: Option<(String, String)>,
    game_type: GameType,
    json: bool,
) -> GridironResult<()> {
    let request = SimulationRequest::new(home, away).with_game_type(game_type);
    let request = match seeds {
        Some((server_seed, client_seed)) => request.with_seeds(server_seed, client_seed),
        None => {
            // Publish before kickoff so the commitment predates every outcome
            let triple = SeedManager::generate_game_seeds();
            let public = triple.public_seeds();
            if !json {
                println!("Commitment: {}", public.server_seed_hash);
                println!("Client seed: {}", public.client_seed);
                println!();
            }
            request.with_commitment(triple)
        }
    };

    let (home_abbr, away_abbr) = (
        request.home.team.abbreviation.clone(),
        request.away.team.abbreviation.clone(),
    );
    let result = simulate_game(request, config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_game(&result, &home_abbr, &away_abbr);
    }
    Ok(())
}

fn game_clock(state: &GameState) -> String {
    format!("{}:{:02}", state.clock / 60, state.clock % 60)
}

fn print_game(result: &SimulationResult, home_abbr: &str, away_abbr: &str) {
    println!("Weather: {}", result.weather);
    println!();
    for event in &result.events {
        println!(
            "{:>3} {:>3} {:>5}  {}",
            event.event_number,
            event.game_state.period,
            game_clock(&event.game_state),
            event.commentary
        );
    }

    println!();
    println!(
        "Final: {} {} - {} {}{}",
        away_abbr,
        result.final_score.away,
        result.final_score.home,
        home_abbr,
        if result.overtime_periods > 0 { " (OT)" } else { "" }
    );
    match result.winner {
        Some(Side::Home) => println!("Winner: {}", home_abbr),
        Some(Side::Away) => println!("Winner: {}", away_abbr),
        None => println!("Tie"),
    }
    if let Some(mvp) = &result.mvp {
        println!("MVP: {} ({:.1})", mvp.name, mvp.score);
    }
    if result.truncated {
        println!("Stopped at the play cap after {} plays", result.total_plays);
    }

    for (abbr, stats) in [(away_abbr, &result.box_score.away), (home_abbr, &result.box_score.home)] {
        println!(
            "{:<4} yds {:>4} (pass {:>4}, rush {:>4})  1st {:>2}  3rd {}/{}  TO {}  pen {}-{}  TOP {}:{:02}",
            abbr,
            stats.total_yards,
            stats.passing_yards,
            stats.rushing_yards,
            stats.first_downs,
            stats.third_down_conversions,
            stats.third_down_attempts,
            stats.turnovers,
            stats.penalties,
            stats.penalty_yards,
            stats.time_of_possession / 60,
            stats.time_of_possession % 60
        );
    }

    println!();
    println!("Server seed: {}", result.seeds.server_seed);
    println!("Client seed: {}", result.seeds.client_seed);
    println!("Draws: {}", result.seeds.nonce);
}

fn run_verify(
    server_seed: &str,
    hash: &str,
    client_seed: Option<&str>,
    start_nonce: u64,
    count: Option<f64>,
    nonce: Option<u64>,
) {
    let committed = verify_server_seed(server_seed, hash);
    println!("Commitment: {}", if committed { "match" } else { "MISMATCH" });

    let Some(client_seed) = client_seed else {
        return;
    };
    if let Some(count) = count {
        let replay = verify_game_replay(server_seed, client_seed, start_nonce, count);
        println!(
            "Replay: {} ({} draws)",
            if replay.verified { "verified" } else { "rejected" },
            replay.total_events
        );
    }
    if let Some(nonce) = nonce {
        println!(
            "Value at nonce {}: {}",
            nonce,
            compute_value_at_nonce(server_seed, client_seed, nonce)
        );
    }
}

#[derive(Default)]
struct BatchSummary {
    home_wins: u32,
    away_wins: u32,
    ties: u32,
    overtime: u32,
    truncated: u32,
    points: u64,
    plays: u64,
    margins: std::collections::BTreeMap<u16, u32>,
}

impl BatchSummary {
    fn record(&mut self, result: &SimulationResult) {
        match result.winner {
            Some(Side::Home) => self.home_wins += 1,
            Some(Side::Away) => self.away_wins += 1,
            None => self.ties += 1,
        }
        if result.overtime_periods > 0 {
            self.overtime += 1;
        }
        if result.truncated {
            self.truncated += 1;
        }
        self.points += (result.final_score.home + result.final_score.away) as u64;
        self.plays += result.total_plays as u64;
        let margin = result.final_score.home.abs_diff(result.final_score.away);
        *self.margins.entry(margin / 7).or_default() += 1;
    }
}

async fn run_batch(
    config: SimulationConfig,
    games: usize,
    concurrency: usize,
    game_type: GameType,
) -> GridironResult<()> {
    info!("Running {} games, {} at a time", games, concurrency);
    let started = Instant::now();
    let config = Arc::new(config);
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let (home, away) = demo::demo_matchup();

    let mut handles = Vec::with_capacity(games);
    for _ in 0..games {
        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        let config = config.clone();
        let request = SimulationRequest::new(home.clone(), away.clone()).with_game_type(game_type);
        // Each game owns its stream; nothing is shared between tasks but the config
        handles.push(tokio::task::spawn_blocking(move || {
            let result = simulate_game(request, &config);
            drop(permit);
            result
        }));
    }

    let mut summary = BatchSummary::default();
    let mut completed = 0u32;
    for handle in handles {
        match handle.await {
            Ok(Ok(result)) => {
                summary.record(&result);
                completed += 1;
            }
            Ok(Err(e)) => return Err(e),
            Err(e) => error!("Simulation task failed: {}", e),
        }
    }

    let elapsed = started.elapsed();
    println!("Games: {} in {:.2?}", completed, elapsed);
    if completed == 0 {
        return Ok(());
    }
    println!(
        "Home {} / Away {} / Tie {}  (OT {}, capped {})",
        summary.home_wins, summary.away_wins, summary.ties, summary.overtime, summary.truncated
    );
    println!(
        "Avg points {:.1}, avg plays {:.1}",
        summary.points as f64 / completed as f64,
        summary.plays as f64 / completed as f64
    );
    println!("Margin distribution:");
    for (bucket, count) in &summary.margins {
        println!(
            "  {:>2}-{:<2} {:>5}  {}",
            bucket * 7,
            bucket * 7 + 6,
            count,
            "#".repeat((*count as usize * 50 / completed as usize).max(1))
        );
    }
    Ok(())
}

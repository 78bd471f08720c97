//! # Whitebox Headless Runner
//!
//! Builds an engine from the command line, plays a number of turns and optionally dumps
//! the final state as JSON.

use clap::{Parser, ValueEnum};
use std::time::Duration;
use whitebox::{
    pace_actions, GameConfig, GameState, GridTopology, MapConfig, Nation, PlayerId,
    WhiteboxError, WhiteboxResult,
};

/// Grid shape as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TopologyArg {
    Square,
    Hex,
}

impl From<TopologyArg> for GridTopology {
    fn from(arg: TopologyArg) -> Self {
        match arg {
            TopologyArg::Square => GridTopology::Square,
            TopologyArg::Hex => GridTopology::Hex,
        }
    }
}

/// Command line arguments for the Whitebox runner.
#[derive(Parser, Debug)]
#[command(name = "whitebox")]
#[command(about = "Headless runner for the Whitebox strategy simulation core")]
#[command(version)]
struct Args {
    /// Seed for map generation
    #[arg(short, long, default_value_t = whitebox::config::DEFAULT_SEED)]
    seed: u64,

    /// Map width in tiles
    #[arg(long, default_value_t = whitebox::config::DEFAULT_MAP_WIDTH)]
    width: u32,

    /// Map height in tiles
    #[arg(long, default_value_t = whitebox::config::DEFAULT_MAP_HEIGHT)]
    height: u32,

    /// Grid topology
    #[arg(long, value_enum, default_value_t = TopologyArg::Hex)]
    topology: TopologyArg,

    /// Number of full turns to play
    #[arg(short, long, default_value_t = 1)]
    turns: u32,

    /// Let the scripted controller play the human side too
    #[arg(long)]
    autoplay: bool,

    /// Nation preset (JSON) applied to the human player
    #[arg(long)]
    nation: Option<std::path::PathBuf>,

    /// Delay between replayed opponent actions, in milliseconds
    #[arg(long, default_value_t = 0)]
    pace_ms: u64,

    /// Print the final snapshot as JSON
    #[arg(long)]
    dump: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> WhiteboxResult<()> {
    let args = Args::parse();
    initialize_logging(&args.log_level)?;

    log::info!("Starting Whitebox v{}", whitebox::VERSION);

    let map = MapConfig::new(args.width, args.height, args.seed).with_topology(args.topology.into());
    let mut state = GameState::new(GameConfig::with_map(map))?;

    if let Some(path) = &args.nation {
        let nation = Nation::from_json(&std::fs::read_to_string(path)?)?;
        let spawned = state.apply_nation(PlayerId::Player, &nation);
        log::info!("Applied nation '{}', {} starting units", nation.id, spawned.len());
    }

    run_turns(&mut state, &args).await;

    if args.dump {
        println!("{}", serde_json::to_string_pretty(&state.snapshot())?);
    } else {
        print_summary(&state);
    }
    Ok(())
}

/// Plays `args.turns` full turns, replaying the opponent's actions at the requested pace.
async fn run_turns(state: &mut GameState, args: &Args) {
    let delay = Duration::from_millis(args.pace_ms);

    for _ in 0..args.turns {
        if args.autoplay {
            let actions = state.run_scripted_turn(PlayerId::Player);
            log::debug!("Autoplay took {} actions", actions.len());
        }

        let report = state.end_turn();
        pace_actions(report.ai_actions, delay, |action| match serde_json::to_string(&action) {
            Ok(line) => log::info!("{}: {}", report.ended_by.opponent(), line),
            Err(err) => log::warn!("Could not encode action: {}", err),
        })
        .await;

        if state.capital_of(PlayerId::Player).is_none() {
            log::info!("{} has no cities left", PlayerId::Player);
            break;
        }
    }
}

fn print_summary(state: &GameState) {
    println!(
        "Turn {} ({} to act)",
        state.turn_number(),
        state.active_owner()
    );
    for owner in PlayerId::ALL {
        let player = state.player_state(owner);
        println!(
            "  {:<8} stars {:>4}  income {:>3}  cities {}  units {}  techs {}",
            owner.as_str(),
            player.stars,
            player.income,
            state.cities_of(owner).count(),
            state.units_of(owner).count(),
            player.unlocked_techs.len()
        );
    }
}

/// Initializes logging based on the specified level.
fn initialize_logging(log_level: &str) -> WhiteboxResult<()> {
    env_logger::Builder::new()
        .parse_filters(log_level)
        .format_target(false)
        .try_init()
        .map_err(|err| WhiteboxError::InvalidConfig(format!("logger: {}", err)))
}

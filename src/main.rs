//! Galaxy Defender - native entry point
//!
//! Runs a headless session driven by the autopilot and reports the outcome.
//! Shop commands and the leaderboard work on the same data directory.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use galaxy_defender::audio::AudioManager;
use galaxy_defender::economy::{SKIN_CATALOG, ShopError};
use galaxy_defender::persistence::JsonFileStore;
use galaxy_defender::platform::{Autopilot, FramePacer};
use galaxy_defender::sim::{Presenter, Snapshot, SpriteKind};
use galaxy_defender::{Game, SkinId, Tuning, Upgrade};

#[derive(Parser, Debug)]
#[command(name = "galaxy-defender")]
#[command(about = "Headless Galaxy Defender: autopilot runs, shop and leaderboard")]
struct Cli {
    /// Directory holding the economy, scores, settings and tuning records
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,
    /// RNG seed (default: from the system clock)
    #[arg(long)]
    seed: Option<u64>,
    /// End the session after this many seconds of play
    #[arg(long)]
    max_seconds: Option<f32>,
    /// Pace frames to the wall clock instead of running flat out
    #[arg(long)]
    realtime: bool,
    /// Buy an upgrade (rapid_cooldown) or a skin, then exit
    #[arg(long, conflicts_with_all = ["select_skin", "scores"])]
    buy: Option<String>,
    /// Equip an owned skin, then exit
    #[arg(long, conflicts_with = "scores")]
    select_skin: Option<String>,
    /// Print the leaderboard, then exit
    #[arg(long)]
    scores: bool,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Shop(#[from] ShopError),
}

/// Logs a one-line summary of the frame about once a second
#[derive(Debug, Default)]
struct LogPresenter {
    frames: u64,
}

impl Presenter for LogPresenter {
    fn present(&mut self, snapshot: &Snapshot) {
        self.frames += 1;
        if self.frames % 60 != 0 {
            return;
        }
        log::debug!(
            "score {} | meteors {} | shots {} | pickups {} | boost {}ms",
            snapshot.score,
            snapshot.count(|k| matches!(k, SpriteKind::Meteor { .. })),
            snapshot.count(|k| matches!(k, SpriteKind::Projectile)),
            snapshot.count(|k| matches!(k, SpriteKind::Pickup)),
            snapshot.boost_remaining_ms
        );
    }
}

/// `tuning.json` from the data directory, defaults if absent or invalid
fn load_tuning(dir: &Path) -> Tuning {
    let path = dir.join(Tuning::FILE_NAME);
    match fs::read_to_string(&path) {
        Ok(json) => match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring invalid {}: {e}", path.display());
                Tuning::default()
            }
        },
        Err(_) => Tuning::default(),
    }
}

fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn buy(game: &mut Game, item: &str) -> Result<(), CliError> {
    if let Some(upgrade) = Upgrade::from_str(item) {
        game.account_mut().purchase_upgrade(upgrade)?;
        println!("Bought {} for {}", upgrade.as_str(), upgrade.price());
    } else {
        let skin = SkinId::new(item);
        game.account_mut().purchase_skin(&skin)?;
        println!("Bought skin {skin}");
    }
    println!("Balance: {}", game.account().economy().currency);
    Ok(())
}

fn run(args: Cli) -> Result<(), CliError> {
    let data_dir = args.data_dir;
    let tuning = load_tuning(&data_dir);
    let seed = args.seed.unwrap_or_else(clock_seed);
    let mut game = Game::open(JsonFileStore::new(data_dir), tuning, seed);

    if args.scores {
        if game.high_scores().is_empty() {
            println!("No high scores yet");
        }
        for (i, score) in game.high_scores().entries().iter().enumerate() {
            println!("{:>2}. {score}", i + 1);
        }
        return Ok(());
    }
    if let Some(item) = &args.buy {
        return buy(&mut game, item);
    }
    if let Some(id) = &args.select_skin {
        let skin = SkinId::new(id.as_str());
        game.account_mut().select_skin(&skin)?;
        println!("Equipped skin {skin}");
        return Ok(());
    }

    let economy = game.account().economy();
    log::info!(
        "Balance {}, skin {} (catalog: {})",
        economy.currency,
        economy.selected_skin,
        SKIN_CATALOG
            .iter()
            .map(|(id, price)| format!("{id}={price}"))
            .collect::<Vec<_>>()
            .join(", ")
    );

    let fps = game.settings().frame_rate();
    let mut pacer = if args.realtime {
        FramePacer::realtime(fps)
    } else {
        FramePacer::fixed(fps)
    };
    let mut audio = AudioManager::from_settings(game.settings());
    let mut presenter = LogPresenter::default();
    let mut input = Autopilot::new();

    let outcome = game.play_session(
        &mut input,
        &mut pacer,
        &mut audio,
        &mut presenter,
        args.max_seconds,
    );

    println!("Score: {}", outcome.score);
    if let Some(rank) = outcome.rank {
        println!("New high score! Rank #{rank}");
    }
    println!("Balance: {}", outcome.balance);
    log::info!("{} cues played over {} frames", audio.played(), pacer.frames());
    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    log::info!("Galaxy Defender (native) starting...");

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(2);
    }
}

use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use clap::Parser;
use power_snake::config::{Difficulty, GameConfig, GridSize, WallPolicy};
use power_snake::feedback::{Feedback, Silent, TerminalBell};
use power_snake::input::{GameInput, spawn_input_thread};
use power_snake::ledger::{FileScoreStore, MemoryScoreStore, ScoreLedger, scores_path};
use power_snake::logging;
use power_snake::renderer;
use power_snake::scheduler::Ticker;
use power_snake::session::{Control, GameSession};
use power_snake::settings::Settings;
use power_snake::terminal_runtime::{TerminalSession, install_panic_hook};
use power_snake::ui::hud::HudInfo;

/// Redraw interval while no tick is due (menus, pause, effect countdowns).
const FRAME_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Skip the speed menu and start at this difficulty.
    #[arg(long, value_enum)]
    difficulty: Option<Difficulty>,

    /// Whether hitting the border ends the game or clamps the head.
    #[arg(long = "wall", value_enum)]
    wall_policy: Option<WallPolicy>,

    /// Board width in cells.
    #[arg(long)]
    width: Option<u16>,

    /// Board height in cells.
    #[arg(long)]
    height: Option<u16>,

    /// Seed for food and power-up placement.
    #[arg(long)]
    seed: Option<u64>,

    /// High score file (one score per line).
    #[arg(long = "scores-file")]
    scores_file: Option<PathBuf>,

    /// Keep high scores in memory only.
    #[arg(long = "no-persist")]
    no_persist: bool,

    /// Disable the terminal bell.
    #[arg(long)]
    mute: bool,

    /// Erase the saved high scores and exit.
    #[arg(long = "reset-scores")]
    reset_scores: bool,

    /// Log file; verbosity follows RUST_LOG.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_path = cli.log_file.clone().unwrap_or_else(logging::default_log_path);
    if let Err(error) = logging::init(&log_path) {
        eprintln!("Logging disabled ({}): {error}", log_path.display());
    }

    let settings = Settings::load_or_default();
    let config = game_config(&cli, &settings);
    config.validate()?;

    let mut ledger = load_ledger(&cli);
    if cli.reset_scores {
        ledger.reset()?;
        println!("High scores cleared.");
        return Ok(());
    }

    let sound = !cli.mute && settings.sound.unwrap_or(true);
    let feedback: Box<dyn Feedback> = if sound {
        Box::new(TerminalBell::stdout())
    } else {
        Box::new(Silent)
    };

    let mut session = GameSession::new(config, ledger, feedback);
    if let Some(difficulty) = settings.difficulty {
        session.select_difficulty(difficulty);
    }
    if let Some(difficulty) = cli.difficulty {
        session.start(difficulty);
    }

    install_panic_hook();
    log::info!("power-snake {} starting", env!("CARGO_PKG_VERSION"));
    run(&mut session)?;
    Ok(())
}

fn game_config(cli: &Cli, settings: &Settings) -> GameConfig {
    let difficulty = cli.difficulty.or(settings.difficulty).unwrap_or_default();
    let mut config = GameConfig::for_difficulty(difficulty);
    let grid = settings.grid.unwrap_or_default();
    config.grid = GridSize {
        width: cli.width.unwrap_or(grid.width),
        height: cli.height.unwrap_or(grid.height),
    };
    config.wall_policy = cli
        .wall_policy
        .or(settings.wall_policy)
        .unwrap_or_default();
    config.seed = cli.seed;
    config
}

fn load_ledger(cli: &Cli) -> ScoreLedger {
    if cli.no_persist {
        return ScoreLedger::load(MemoryScoreStore::default());
    }
    let store = FileScoreStore::new(cli.scores_file.clone().unwrap_or_else(scores_path));
    log::debug!("high scores at {}", store.path().display());
    ScoreLedger::load(store)
}

fn run(session: &mut GameSession) -> io::Result<()> {
    let mut terminal = TerminalSession::enter()?;
    let (sender, inputs) = mpsc::channel();
    let _input_thread = spawn_input_thread(sender)?;
    let mut ticker = Ticker::new(session.scheduler().clone(), Instant::now());

    loop {
        let hud_info = HudInfo {
            top_three: session.ledger().top_three(),
            previous_best: session.previous_best(),
            ledger_error: session.ledger_error().map(str::to_owned),
        };
        let snapshot = session.snapshot();
        terminal.terminal_mut().draw(|frame| {
            renderer::render(
                frame,
                snapshot.as_ref(),
                session.selected_difficulty(),
                &hud_info,
            )
        })?;

        let wait = ticker
            .time_until_due(Instant::now())
            .map_or(FRAME_INTERVAL, |due| due.min(FRAME_INTERVAL));
        let first = match inputs.recv_timeout(wait) {
            Ok(input) => Some(input),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => break,
        };

        let was_scheduled = ticker.handle().is_running();
        let mut quit = false;
        for input in first.into_iter().chain(inputs.try_iter()) {
            if session.handle_input(input) == Control::Quit {
                quit = true;
                break;
            }
        }
        if quit {
            break;
        }
        if !was_scheduled && ticker.handle().is_running() {
            ticker.reset(Instant::now());
        }

        if ticker.poll_due(Instant::now()) {
            session.tick();
        }
    }

    log::info!("quitting");
    terminal.restore()
}

use clap::ValueEnum;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::snake::Position;

/// Logical grid dimensions passed through the game as a named type.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl Default for GridSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
        }
    }
}

/// Default board width in cells (600 px at 25 px per cell).
pub const DEFAULT_GRID_WIDTH: u16 = 24;

/// Default board height in cells.
pub const DEFAULT_GRID_HEIGHT: u16 = 24;

/// Largest accepted board edge.
pub const MAX_GRID_EDGE: u16 = 255;

/// Segment count of a freshly spawned snake.
pub const INITIAL_SNAKE_LENGTH: usize = 3;

/// Column of the head at spawn.
pub const START_COLUMN: i32 = 5;

/// Tick delay never drops below this by score milestones.
pub const MIN_TICK_DELAY_MS: u64 = 50;

/// Delay reduction applied at every score milestone.
pub const TICK_DELAY_STEP_MS: u64 = 10;

/// A milestone is reached whenever the score is a multiple of this value.
pub const POINTS_PER_SPEED_STEP: u32 = 5;

/// Lifetime of an uncollected power-up and of every activated effect.
pub const EFFECT_DURATION_MS: u64 = 5_000;

/// Chance of a power-up being rolled each time food is eaten.
pub const POWER_UP_SPAWN_PROBABILITY: f64 = 0.3;

/// Random draws tried before placement falls back to a full board scan.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 1024;

/// Number of scores kept by the ledger.
pub const LEDGER_CAPACITY: usize = 3;

/// Speed presets offered on the start screen.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    /// All presets in menu order.
    pub const ALL: [Self; 3] = [Self::Easy, Self::Normal, Self::Hard];

    /// Initial tick delay for this preset.
    #[must_use]
    pub fn initial_delay_ms(self) -> u64 {
        match self {
            Self::Easy => 150,
            Self::Normal => 100,
            Self::Hard => 65,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Normal => "Normal",
            Self::Hard => "Hard",
        }
    }
}

/// What happens when the head is driven into the border.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallPolicy {
    /// The move is refused and the game ends on that tick.
    #[default]
    Collide,
    /// The head is clamped into the grid and runs into its own neck.
    Clamp,
}

/// Validation failures for [`GameConfig`].
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    #[error("grid {width}x{height} is too small, need at least {min_width}x1")]
    GridTooSmall {
        width: u16,
        height: u16,
        min_width: usize,
    },
    #[error("grid {width}x{height} exceeds the {max} cell limit", max = MAX_GRID_EDGE)]
    GridTooLarge { width: u16, height: u16 },
    #[error("initial delay {0} ms is below the {floor} ms floor", floor = MIN_TICK_DELAY_MS)]
    DelayTooShort(u64),
}

/// Parameters fixed for the lifetime of one game session.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GameConfig {
    pub grid: GridSize,
    pub initial_delay_ms: u64,
    pub wall_policy: WallPolicy,
    /// Seed for food/power-up placement and coin flips; `None` draws one.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::for_difficulty(Difficulty::default())
    }
}

impl GameConfig {
    #[must_use]
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self {
            grid: GridSize::default(),
            initial_delay_ms: difficulty.initial_delay_ms(),
            wall_policy: WallPolicy::default(),
            seed: None,
        }
    }

    /// Checks the grid and delay bounds the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let GridSize { width, height } = self.grid;
        if usize::from(width) < INITIAL_SNAKE_LENGTH || height == 0 {
            return Err(ConfigError::GridTooSmall {
                width,
                height,
                min_width: INITIAL_SNAKE_LENGTH,
            });
        }
        if width > MAX_GRID_EDGE || height > MAX_GRID_EDGE {
            return Err(ConfigError::GridTooLarge { width, height });
        }
        if self.initial_delay_ms < MIN_TICK_DELAY_MS {
            return Err(ConfigError::DelayTooShort(self.initial_delay_ms));
        }
        Ok(())
    }

    /// Head cell of a freshly spawned snake; the body trails to the left.
    #[must_use]
    pub fn start_position(&self) -> Position {
        let last_len = INITIAL_SNAKE_LENGTH as i32 - 1;
        let max_x = i32::from(self.grid.width) - 1;
        Position {
            x: START_COLUMN.min(max_x).max(last_len),
            y: i32::from(self.grid.height / 2),
        }
    }
}

/// Colors used by the renderer.
#[derive(Debug)]
pub struct Theme {
    pub snake_head: Color,
    /// Head color while the speed boost is active.
    pub snake_head_boosted: Color,
    pub snake_body: Color,
    pub food: Color,
    pub power_up: Color,
    pub grid_bg: Color,
    pub border_fg: Color,
    pub hud_score: Color,
    pub hud_effect: Color,
    pub menu_title: Color,
    pub menu_footer: Color,
}

pub const THEME: Theme = Theme {
    snake_head: Color::Green,
    snake_head_boosted: Color::Blue,
    snake_body: Color::Rgb(45, 180, 0),
    food: Color::Red,
    power_up: Color::Yellow,
    grid_bg: Color::Rgb(20, 40, 80),
    border_fg: Color::Rgb(30, 60, 100),
    hud_score: Color::Cyan,
    hud_effect: Color::Yellow,
    menu_title: Color::Cyan,
    menu_footer: Color::DarkGray,
};

/// Glyph pair drawn for one logical cell (terminal cells are about twice as tall as wide).
pub const GLYPH_CELL: &str = "██";
pub const GLYPH_FOOD: &str = "●●";
pub const GLYPH_POWER_UP: &str = "◆◆";

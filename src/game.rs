use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::clock::{Clock, SystemClock};
use crate::config::{
    EFFECT_DURATION_MS, GameConfig, GridSize, INITIAL_SNAKE_LENGTH, MIN_TICK_DELAY_MS,
    POINTS_PER_SPEED_STEP, POWER_UP_SPAWN_PROBABILITY, TICK_DELAY_STEP_MS, WallPolicy,
};
use crate::effects::{Effect, EffectTimers, TimerKind};
use crate::food::{PowerUp, spawn_position};
use crate::input::{Direction, direction_change_is_valid};
use crate::scheduler::SchedulerHandle;
use crate::snake::{Position, Snake};

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    Running,
    Paused,
    GameOver,
}

/// Why the last game ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeathReason {
    WallCollision,
    SelfCollision,
}

/// Notifications for collaborators that react to gameplay (sound, ledger).
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameEvent {
    GameStarted,
    FoodEaten { score: u32 },
    PowerUpCollected(Effect),
    EffectExpired(Effect),
    GameOver { score: u32, reason: DeathReason },
}

/// Everything the presentation layer needs to draw one frame.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snapshot {
    pub grid: GridSize,
    /// Body cells, head first.
    pub snake: Vec<Position>,
    pub food: Option<Position>,
    pub power_up: Option<Position>,
    pub score: u32,
    pub running: bool,
    pub status: GameStatus,
    pub death_reason: Option<DeathReason>,
    pub speed_boost_active: bool,
    pub score_multiplier_active: bool,
    pub speed_boost_remaining_ms: Option<u64>,
    pub score_multiplier_remaining_ms: Option<u64>,
    pub tick_delay_ms: u64,
}

/// Complete mutable game state for one session, advanced by [`GameState::tick`].
#[derive(Debug)]
pub struct GameState {
    pub snake: Snake,
    pub food: Option<Position>,
    pub power_up: Option<PowerUp>,
    pub score: u32,
    pub status: GameStatus,
    pub death_reason: Option<DeathReason>,
    pub tick_count: u64,
    pending_direction: Option<Direction>,
    timers: EffectTimers,
    base_delay_ms: u64,
    paused_at_ms: Option<u64>,
    events: Vec<GameEvent>,
    config: GameConfig,
    scheduler: SchedulerHandle,
    clock: Box<dyn Clock>,
    rng: StdRng,
}

impl GameState {
    /// Creates a running game driven by wall-clock time.
    #[must_use]
    pub fn new(config: GameConfig, scheduler: SchedulerHandle) -> Self {
        Self::with_clock(config, scheduler, SystemClock::new())
    }

    /// Creates a running game with an injected time source.
    #[must_use]
    pub fn with_clock(
        config: GameConfig,
        scheduler: SchedulerHandle,
        clock: impl Clock + 'static,
    ) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let snake = Snake::new(
            config.start_position(),
            Direction::Right,
            INITIAL_SNAKE_LENGTH,
        );

        let mut state = Self {
            snake,
            food: None,
            power_up: None,
            score: 0,
            status: GameStatus::Running,
            death_reason: None,
            tick_count: 0,
            pending_direction: None,
            timers: EffectTimers::default(),
            base_delay_ms: config.initial_delay_ms,
            paused_at_ms: None,
            events: Vec::new(),
            config,
            scheduler,
            clock: Box::new(clock),
            rng,
        };
        state.start_session();
        state
    }

    /// Advances the simulation by one tick and returns the resulting frame.
    ///
    /// Does nothing but report state while paused or after game over.
    pub fn tick(&mut self) -> Snapshot {
        if self.status == GameStatus::Running {
            self.step();
        }
        self.snapshot()
    }

    /// Queues a turn for the next tick, replacing any turn already queued.
    ///
    /// Reversals of the current heading and input outside a running game
    /// are dropped.
    pub fn set_pending_direction(&mut self, direction: Direction) {
        if self.status != GameStatus::Running {
            log::debug!("ignoring {direction:?}: game is {:?}", self.status);
            return;
        }
        if !direction_change_is_valid(self.snake.direction(), direction) {
            log::debug!(
                "ignoring reversal {direction:?} while heading {:?}",
                self.snake.direction()
            );
            return;
        }
        self.pending_direction = Some(direction);
    }

    /// Starts a fresh session. Only valid after game over; returns whether
    /// the restart happened.
    pub fn restart(&mut self) -> bool {
        if self.status != GameStatus::GameOver {
            log::debug!("ignoring restart while {:?}", self.status);
            return false;
        }

        self.snake = Snake::new(
            self.config.start_position(),
            Direction::Right,
            INITIAL_SNAKE_LENGTH,
        );
        self.score = 0;
        self.tick_count = 0;
        self.death_reason = None;
        self.pending_direction = None;
        self.power_up = None;
        self.timers.clear();
        self.base_delay_ms = self.config.initial_delay_ms;
        self.paused_at_ms = None;
        self.status = GameStatus::Running;
        self.start_session();
        true
    }

    /// Toggles between running and paused; effect lifetimes are frozen
    /// while paused.
    pub fn toggle_pause(&mut self) {
        let now = self.clock.now_ms();
        match self.status {
            GameStatus::Running => {
                self.status = GameStatus::Paused;
                self.paused_at_ms = Some(now);
                self.scheduler.stop();
            }
            GameStatus::Paused => {
                let paused_for = self
                    .paused_at_ms
                    .take()
                    .map_or(0, |paused_at| now.saturating_sub(paused_at));
                self.timers.postpone(paused_for);
                self.status = GameStatus::Running;
                self.scheduler.resume();
            }
            GameStatus::GameOver => {}
        }
    }

    /// Drains events raised since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Builds the frame the presentation layer draws.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let now = self.paused_at_ms.unwrap_or_else(|| self.clock.now_ms());
        Snapshot {
            grid: self.config.grid,
            snake: self.snake.segments().copied().collect(),
            food: self.food,
            power_up: self.power_up.map(|power_up| power_up.position),
            score: self.score,
            running: self.status == GameStatus::Running,
            status: self.status,
            death_reason: self.death_reason,
            speed_boost_active: self.effect_active(Effect::SpeedBoost),
            score_multiplier_active: self.effect_active(Effect::ScoreMultiplier),
            speed_boost_remaining_ms: self
                .timers
                .remaining_ms(TimerKind::Effect(Effect::SpeedBoost), now),
            score_multiplier_remaining_ms: self
                .timers
                .remaining_ms(TimerKind::Effect(Effect::ScoreMultiplier), now),
            tick_delay_ms: self.effective_delay_ms(),
        }
    }

    #[must_use]
    pub fn effect_active(&self, effect: Effect) -> bool {
        self.timers.effect_active(effect)
    }

    /// Delay between ticks without the speed boost.
    #[must_use]
    pub fn base_delay_ms(&self) -> u64 {
        self.base_delay_ms
    }

    /// Delay between ticks currently in force.
    #[must_use]
    pub fn effective_delay_ms(&self) -> u64 {
        if self.effect_active(Effect::SpeedBoost) {
            (self.base_delay_ms / 2).max(1)
        } else {
            self.base_delay_ms
        }
    }

    #[must_use]
    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending_direction
    }

    #[must_use]
    pub fn bounds(&self) -> GridSize {
        self.config.grid
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn scheduler(&self) -> &SchedulerHandle {
        &self.scheduler
    }

    fn start_session(&mut self) {
        self.food = spawn_position(&mut self.rng, self.config.grid, &self.snake, &[]);
        self.scheduler.set_period(self.base_delay_ms);
        self.scheduler.resume();
        self.events.push(GameEvent::GameStarted);
        log::info!(
            "game started: {}x{} grid, {} ms delay, {:?} walls",
            self.config.grid.width,
            self.config.grid.height,
            self.base_delay_ms,
            self.config.wall_policy
        );
    }

    fn step(&mut self) {
        self.tick_count += 1;
        let now = self.clock.now_ms();

        if let Some(direction) = self.pending_direction.take() {
            if direction_change_is_valid(self.snake.direction(), direction) {
                self.snake.set_direction(direction);
            }
        }

        let bounds = self.config.grid;
        let mut next_head = self.snake.next_head_position();
        let mut clamped = false;
        if !next_head.is_within_bounds(bounds) {
            match self.config.wall_policy {
                WallPolicy::Collide => {
                    self.end_game(DeathReason::WallCollision);
                    return;
                }
                WallPolicy::Clamp => {
                    next_head = next_head.clamped(bounds);
                    clamped = true;
                }
            }
        }
        self.snake.advance_to(next_head);

        let head = self.snake.head();
        if self.food == Some(head) {
            self.eat_food(now);
        }

        if self
            .power_up
            .is_some_and(|power_up| power_up.position == head)
        {
            self.collect_power_up(now);
        }

        self.expire_timers(now);

        if self.snake.head_overlaps_body() {
            let reason = if clamped {
                DeathReason::WallCollision
            } else {
                DeathReason::SelfCollision
            };
            self.end_game(reason);
        }
    }

    fn eat_food(&mut self, now: u64) {
        self.snake.grow();
        self.score += if self.effect_active(Effect::ScoreMultiplier) {
            2
        } else {
            1
        };

        let power_up: Vec<Position> = self.power_up.map(|p| p.position).into_iter().collect();
        self.food = spawn_position(&mut self.rng, self.config.grid, &self.snake, &power_up);
        if self.food.is_none() {
            log::warn!("no free cell left for food");
        }
        self.roll_power_up(now);

        if self.score % POINTS_PER_SPEED_STEP == 0 {
            let next_delay = self
                .base_delay_ms
                .saturating_sub(TICK_DELAY_STEP_MS)
                .max(MIN_TICK_DELAY_MS);
            if next_delay < self.base_delay_ms {
                self.base_delay_ms = next_delay;
                log::debug!("score {} reached, delay now {next_delay} ms", self.score);
                self.publish_delay();
            }
        }

        self.events.push(GameEvent::FoodEaten { score: self.score });
    }

    fn roll_power_up(&mut self, now: u64) {
        if !self.rng.gen_bool(POWER_UP_SPAWN_PROBABILITY) {
            return;
        }

        let food: Vec<Position> = self.food.into_iter().collect();
        match spawn_position(&mut self.rng, self.config.grid, &self.snake, &food) {
            Some(position) => {
                self.power_up = Some(PowerUp { position });
                self.timers.start(TimerKind::PowerUpPresence, now);
            }
            None => log::warn!("no free cell left for a power-up, skipping spawn"),
        }
    }

    fn collect_power_up(&mut self, now: u64) {
        self.power_up = None;
        self.timers.cancel(TimerKind::PowerUpPresence);

        let effect = if self.rng.gen_bool(0.5) {
            Effect::SpeedBoost
        } else {
            Effect::ScoreMultiplier
        };
        self.activate_effect(effect, now);
        self.events.push(GameEvent::PowerUpCollected(effect));
    }

    /// Grants `effect` for the full effect duration starting at `now`.
    pub(crate) fn activate_effect(&mut self, effect: Effect, now: u64) {
        self.timers.start(TimerKind::Effect(effect), now);
        log::debug!("{effect:?} active until {} ms", now + EFFECT_DURATION_MS);
        if effect == Effect::SpeedBoost {
            self.publish_delay();
        }
    }

    fn expire_timers(&mut self, now: u64) {
        for kind in self.timers.expire(now) {
            match kind {
                TimerKind::PowerUpPresence => self.power_up = None,
                TimerKind::Effect(effect) => {
                    if effect == Effect::SpeedBoost {
                        self.publish_delay();
                    }
                    self.events.push(GameEvent::EffectExpired(effect));
                }
            }
        }
    }

    fn publish_delay(&self) {
        self.scheduler.set_period(self.effective_delay_ms());
    }

    fn end_game(&mut self, reason: DeathReason) {
        self.status = GameStatus::GameOver;
        self.death_reason = Some(reason);
        self.pending_direction = None;
        self.scheduler.stop();
        self.events.push(GameEvent::GameOver {
            score: self.score,
            reason,
        });
        log::info!(
            "game over after {} ticks: {reason:?}, score {}",
            self.tick_count,
            self.score
        );
    }
}

#[cfg(test)]
mod tests {
    use crate::clock::ManualClock;
    use crate::config::{EFFECT_DURATION_MS, GameConfig, GridSize, WallPolicy};
    use crate::effects::{Effect, TimerKind};
    use crate::food::PowerUp;
    use crate::input::Direction;
    use crate::scheduler::SchedulerHandle;
    use crate::snake::{Position, Snake};

    use super::{DeathReason, GameEvent, GameState, GameStatus};

    fn state_with_clock(width: u16, height: u16, seed: u64) -> (GameState, ManualClock) {
        let mut config = GameConfig::default();
        config.grid = GridSize { width, height };
        config.seed = Some(seed);
        let clock = ManualClock::new();
        let state = GameState::with_clock(
            config,
            SchedulerHandle::new(config.initial_delay_ms),
            clock.clone(),
        );
        (state, clock)
    }

    fn place_food_ahead(state: &mut GameState) {
        state.food = Some(state.snake.next_head_position());
        state.power_up = None;
    }

    #[test]
    fn snake_grows_one_tick_after_eating_food() {
        let (mut state, _) = state_with_clock(20, 20, 1);
        place_food_ahead(&mut state);

        state.tick();
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.snake.target_len(), 4);

        state.power_up = None;
        state.food = None;
        state.tick();
        assert_eq!(state.snake.len(), 4);
    }

    #[test]
    fn reversal_request_is_dropped() {
        let (mut state, _) = state_with_clock(20, 20, 2);
        let head = state.snake.head();

        state.set_pending_direction(Direction::Left);
        assert_eq!(state.pending_direction(), None);

        state.food = None;
        state.tick();
        assert_eq!(state.snake.head(), Position { x: head.x + 1, y: head.y });
    }

    #[test]
    fn last_valid_turn_between_ticks_wins() {
        let (mut state, _) = state_with_clock(20, 20, 3);
        let head = state.snake.head();

        state.set_pending_direction(Direction::Up);
        state.set_pending_direction(Direction::Down);
        state.food = None;
        state.tick();

        assert_eq!(state.snake.head(), Position { x: head.x, y: head.y + 1 });
        assert_eq!(state.pending_direction(), None);
    }

    #[test]
    fn wall_collision_ends_game_without_moving() {
        let (mut state, _) = state_with_clock(6, 6, 4);
        state.snake = Snake::new(Position { x: 5, y: 2 }, Direction::Right, 3);
        state.food = None;

        let frame = state.tick();

        assert_eq!(state.status, GameStatus::GameOver);
        assert_eq!(state.death_reason, Some(DeathReason::WallCollision));
        assert_eq!(state.snake.head(), Position { x: 5, y: 2 });
        assert!(!frame.running);
        assert!(!state.scheduler().is_running());
    }

    #[test]
    fn clamped_head_runs_into_its_neck() {
        let mut config = GameConfig::default();
        config.grid = GridSize {
            width: 6,
            height: 6,
        };
        config.seed = Some(5);
        config.wall_policy = WallPolicy::Clamp;
        let mut state = GameState::with_clock(config, SchedulerHandle::new(100), ManualClock::new());
        state.snake = Snake::new(Position { x: 5, y: 2 }, Direction::Right, 3);
        state.food = None;

        state.tick();

        assert_eq!(state.snake.head(), Position { x: 5, y: 2 });
        assert_eq!(state.status, GameStatus::GameOver);
        assert_eq!(state.death_reason, Some(DeathReason::WallCollision));
    }

    #[test]
    fn self_collision_sets_game_over() {
        let (mut state, _) = state_with_clock(6, 6, 6);
        state.snake = Snake::from_segments(
            vec![
                Position { x: 2, y: 2 },
                Position { x: 2, y: 3 },
                Position { x: 1, y: 3 },
                Position { x: 1, y: 2 },
                Position { x: 1, y: 1 },
                Position { x: 0, y: 1 },
            ],
            Direction::Left,
        );
        state.food = None;

        state.tick();

        assert_eq!(state.status, GameStatus::GameOver);
        assert_eq!(state.death_reason, Some(DeathReason::SelfCollision));
        let events = state.take_events();
        assert!(events.contains(&GameEvent::GameOver {
            score: 0,
            reason: DeathReason::SelfCollision,
        }));
    }

    #[test]
    fn score_multiplier_doubles_points() {
        let (mut state, _) = state_with_clock(20, 20, 7);
        state.activate_effect(Effect::ScoreMultiplier, 0);
        place_food_ahead(&mut state);

        state.tick();

        assert_eq!(state.score, 2);
    }

    #[test]
    fn fifth_point_shortens_delay() {
        let (mut state, _) = state_with_clock(20, 20, 8);
        state.score = 4;
        place_food_ahead(&mut state);

        state.tick();

        assert_eq!(state.score, 5);
        assert_eq!(state.base_delay_ms(), 90);
        assert_eq!(state.scheduler().period_ms(), 90);
    }

    #[test]
    fn delay_never_drops_below_floor() {
        let (mut state, _) = state_with_clock(20, 20, 9);
        state.base_delay_ms = 50;
        state.score = 9;
        place_food_ahead(&mut state);

        state.tick();

        assert_eq!(state.base_delay_ms(), 50);
    }

    #[test]
    fn speed_boost_halves_then_restores_delay() {
        let (mut state, clock) = state_with_clock(40, 20, 10);
        state.food = None;
        state.activate_effect(Effect::SpeedBoost, 0);

        assert_eq!(state.effective_delay_ms(), 50);
        assert_eq!(state.scheduler().period_ms(), 50);

        clock.set(EFFECT_DURATION_MS - 1);
        state.tick();
        assert!(state.effect_active(Effect::SpeedBoost));

        clock.set(EFFECT_DURATION_MS);
        state.tick();
        assert!(!state.effect_active(Effect::SpeedBoost));
        assert_eq!(state.scheduler().period_ms(), 100);
        assert!(
            state
                .take_events()
                .contains(&GameEvent::EffectExpired(Effect::SpeedBoost))
        );
    }

    #[test]
    fn uncollected_power_up_vanishes() {
        let (mut state, clock) = state_with_clock(40, 20, 11);
        state.food = None;
        state.power_up = Some(PowerUp {
            position: Position { x: 0, y: 0 },
        });
        state.timers.start(TimerKind::PowerUpPresence, 0);

        clock.set(EFFECT_DURATION_MS);
        state.tick();

        assert_eq!(state.power_up, None);
    }

    #[test]
    fn collecting_power_up_grants_one_effect() {
        let (mut state, _) = state_with_clock(20, 20, 12);
        state.food = None;
        state.power_up = Some(PowerUp {
            position: state.snake.next_head_position(),
        });

        state.tick();

        assert_eq!(state.power_up, None);
        let granted: Vec<Effect> = state
            .take_events()
            .into_iter()
            .filter_map(|event| match event {
                GameEvent::PowerUpCollected(effect) => Some(effect),
                _ => None,
            })
            .collect();
        assert_eq!(granted.len(), 1);
        assert!(state.effect_active(granted[0]));
        let other = match granted[0] {
            Effect::SpeedBoost => Effect::ScoreMultiplier,
            Effect::ScoreMultiplier => Effect::SpeedBoost,
        };
        assert!(!state.effect_active(other));
    }

    #[test]
    fn restart_only_from_game_over() {
        let (mut state, _) = state_with_clock(6, 6, 13);
        assert!(!state.restart());

        state.snake = Snake::new(Position { x: 5, y: 2 }, Direction::Right, 3);
        state.food = None;
        state.tick();
        assert_eq!(state.status, GameStatus::GameOver);

        assert!(state.restart());
        assert_eq!(state.status, GameStatus::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.snake.direction(), Direction::Right);
        assert!(state.food.is_some());
        assert!(state.scheduler().is_running());
        assert_eq!(state.scheduler().period_ms(), 100);
    }

    #[test]
    fn input_is_ignored_after_game_over() {
        let (mut state, _) = state_with_clock(6, 6, 14);
        state.snake = Snake::new(Position { x: 5, y: 2 }, Direction::Right, 3);
        state.food = None;
        state.tick();

        state.set_pending_direction(Direction::Up);

        assert_eq!(state.pending_direction(), None);
    }

    #[test]
    fn pause_freezes_effect_lifetimes() {
        let (mut state, clock) = state_with_clock(40, 20, 15);
        state.food = None;
        state.activate_effect(Effect::ScoreMultiplier, 0);

        clock.set(1_000);
        state.toggle_pause();
        assert_eq!(state.status, GameStatus::Paused);
        let head = state.snake.head();
        clock.set(9_000);
        state.tick();
        assert_eq!(state.snake.head(), head);

        state.toggle_pause();
        state.tick();
        assert!(state.effect_active(Effect::ScoreMultiplier));

        clock.set(9_000 + EFFECT_DURATION_MS - 1_000);
        state.tick();
        assert!(!state.effect_active(Effect::ScoreMultiplier));
    }
}

use crate::clock::{Clock, SystemClock};
use crate::config::{Difficulty, GameConfig};
use crate::feedback::Feedback;
use crate::game::{GameEvent, GameState, GameStatus, Snapshot};
use crate::input::{Direction, GameInput};
use crate::ledger::ScoreLedger;
use crate::scheduler::SchedulerHandle;

/// What the outer loop should do after an input.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Control {
    Continue,
    Quit,
}

/// Ties one engine to the score ledger, feedback sink and tick scheduler.
///
/// With no game in progress the session sits on the speed selection screen.
/// Ledger writes happen here, after a tick returns, never inside the engine.
pub struct GameSession<C: Clock + Clone + 'static = SystemClock> {
    config: GameConfig,
    selected: Difficulty,
    state: Option<GameState>,
    ledger: ScoreLedger,
    feedback: Box<dyn Feedback>,
    scheduler: SchedulerHandle,
    clock: C,
    previous_best: Option<u32>,
    ledger_error: Option<String>,
}

impl GameSession<SystemClock> {
    #[must_use]
    pub fn new(
        config: GameConfig,
        ledger: ScoreLedger,
        feedback: impl Feedback + 'static,
    ) -> Self {
        Self::with_clock(config, ledger, feedback, SystemClock::new())
    }
}

impl<C: Clock + Clone + 'static> GameSession<C> {
    #[must_use]
    pub fn with_clock(
        config: GameConfig,
        ledger: ScoreLedger,
        feedback: impl Feedback + 'static,
        clock: C,
    ) -> Self {
        let scheduler = SchedulerHandle::new(config.initial_delay_ms);
        scheduler.stop();
        Self {
            config,
            selected: Difficulty::default(),
            state: None,
            ledger,
            feedback: Box::new(feedback),
            scheduler,
            clock,
            previous_best: None,
            ledger_error: None,
        }
    }

    /// Leaves the speed selection screen and starts a game at `difficulty`.
    pub fn start(&mut self, difficulty: Difficulty) {
        self.selected = difficulty;
        let mut config = self.config;
        config.initial_delay_ms = difficulty.initial_delay_ms();
        self.state = Some(GameState::with_clock(
            config,
            self.scheduler.clone(),
            self.clock.clone(),
        ));
        self.dispatch_events();
    }

    /// Advances the game if one is in progress.
    pub fn tick(&mut self) -> Option<Snapshot> {
        let snapshot = self.state.as_mut()?.tick();
        self.dispatch_events();
        Some(snapshot)
    }

    /// Routes one input to the menu or the running game.
    pub fn handle_input(&mut self, input: GameInput) -> Control {
        if input == GameInput::Quit {
            return Control::Quit;
        }

        let Some(state) = self.state.as_mut() else {
            self.handle_menu_input(input);
            return Control::Continue;
        };

        let game_over = state.status == GameStatus::GameOver;
        match input {
            GameInput::Direction(direction) => state.set_pending_direction(direction),
            GameInput::Pause => state.toggle_pause(),
            GameInput::Restart => {
                state.restart();
            }
            GameInput::Confirm if game_over => {
                self.state = None;
                self.scheduler.stop();
            }
            GameInput::ResetScores if game_over => self.reset_scores(),
            GameInput::Confirm | GameInput::ResetScores | GameInput::SelectDifficulty(_) => {
                log::debug!("ignoring {input:?} during play");
            }
            GameInput::Quit => {}
        }
        self.dispatch_events();
        Control::Continue
    }

    fn handle_menu_input(&mut self, input: GameInput) {
        match input {
            GameInput::SelectDifficulty(difficulty) => self.start(difficulty),
            GameInput::Confirm => self.start(self.selected),
            GameInput::Direction(direction @ (Direction::Up | Direction::Down)) => {
                self.selected = step_selection(self.selected, direction);
            }
            GameInput::ResetScores => self.reset_scores(),
            _ => {}
        }
    }

    /// Clears the ledger and its persisted copy.
    pub fn reset_scores(&mut self) {
        self.previous_best = None;
        match self.ledger.reset() {
            Ok(()) => {
                self.ledger_error = None;
                log::info!("high scores reset");
            }
            Err(error) => {
                log::warn!("{error}");
                self.ledger_error = Some(error.to_string());
            }
        }
    }

    fn dispatch_events(&mut self) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        for event in state.take_events() {
            self.feedback.notify(&event);
            if let GameEvent::GameOver { score, .. } = event {
                self.previous_best = self.ledger.best();
                if self.ledger.would_rank(score) {
                    log::info!("score {score} enters the high score table");
                }
                match self.ledger.record(score) {
                    Ok(()) => self.ledger_error = None,
                    Err(error) => {
                        log::warn!("score {score} kept in memory only: {error}");
                        self.ledger_error = Some(error.to_string());
                    }
                }
            }
        }
    }

    /// Current frame, `None` on the speed selection screen.
    #[must_use]
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.state.as_ref().map(GameState::snapshot)
    }

    #[must_use]
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    #[must_use]
    pub fn state_mut(&mut self) -> Option<&mut GameState> {
        self.state.as_mut()
    }

    #[must_use]
    pub fn selected_difficulty(&self) -> Difficulty {
        self.selected
    }

    pub fn select_difficulty(&mut self, difficulty: Difficulty) {
        self.selected = difficulty;
    }

    #[must_use]
    pub fn ledger(&self) -> &ScoreLedger {
        &self.ledger
    }

    /// Best ledger score before the most recent game over was recorded.
    #[must_use]
    pub fn previous_best(&self) -> Option<u32> {
        self.previous_best
    }

    /// Message of the last failed ledger write, if it has not since succeeded.
    #[must_use]
    pub fn ledger_error(&self) -> Option<&str> {
        self.ledger_error.as_deref()
    }

    #[must_use]
    pub fn scheduler(&self) -> &SchedulerHandle {
        &self.scheduler
    }
}

fn step_selection(current: Difficulty, direction: Direction) -> Difficulty {
    let all = Difficulty::ALL;
    let index = all.iter().position(|d| *d == current).unwrap_or(0);
    let next = match direction {
        Direction::Up => index.saturating_sub(1),
        _ => (index + 1).min(all.len() - 1),
    };
    all[next]
}

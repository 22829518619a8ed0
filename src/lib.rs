//! Terminal Snake with timed power-ups.
//!
//! [`game::GameState`] is the tick engine; everything else either feeds it
//! (input, clock, scheduler) or consumes what it reports (renderer,
//! feedback, score ledger).

pub mod clock;
pub mod config;
pub mod effects;
pub mod feedback;
pub mod food;
pub mod game;
pub mod input;
pub mod ledger;
pub mod logging;
pub mod renderer;
pub mod scheduler;
pub mod session;
pub mod settings;
pub mod snake;
pub mod terminal_runtime;
pub mod ui;

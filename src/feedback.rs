use std::io::{self, Write};

use crate::game::GameEvent;

/// Fire-and-forget reaction to gameplay events (sound, vibration, ...).
///
/// Implementations may drop events; the game never depends on them.
pub trait Feedback {
    fn notify(&mut self, event: &GameEvent);
}

impl<F: Feedback + ?Sized> Feedback for Box<F> {
    fn notify(&mut self, event: &GameEvent) {
        (**self).notify(event);
    }
}

/// Ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Feedback for Silent {
    fn notify(&mut self, _event: &GameEvent) {}
}

/// Rings the terminal bell on pickups and game over.
#[derive(Debug)]
pub struct TerminalBell<W: Write> {
    out: W,
}

impl TerminalBell<io::Stdout> {
    #[must_use]
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> TerminalBell<W> {
    #[must_use]
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Feedback for TerminalBell<W> {
    fn notify(&mut self, event: &GameEvent) {
        let rings = match event {
            GameEvent::FoodEaten { .. } | GameEvent::PowerUpCollected(_) => 1,
            GameEvent::GameOver { .. } => 2,
            GameEvent::GameStarted | GameEvent::EffectExpired(_) => 0,
        };
        if rings == 0 {
            return;
        }

        let result = self
            .out
            .write_all(&b"\x07\x07"[..rings])
            .and_then(|()| self.out.flush());
        if let Err(error) = result {
            log::debug!("bell dropped: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Feedback, TerminalBell};
    use crate::effects::Effect;
    use crate::game::{DeathReason, GameEvent};

    #[test]
    fn bell_rings_for_pickups_and_game_over_only() {
        let mut bell = TerminalBell::new(Vec::new());

        bell.notify(&GameEvent::GameStarted);
        bell.notify(&GameEvent::FoodEaten { score: 1 });
        bell.notify(&GameEvent::PowerUpCollected(Effect::SpeedBoost));
        bell.notify(&GameEvent::EffectExpired(Effect::SpeedBoost));
        bell.notify(&GameEvent::GameOver {
            score: 1,
            reason: DeathReason::WallCollision,
        });

        assert_eq!(bell.into_inner(), b"\x07\x07\x07\x07".to_vec());
    }
}

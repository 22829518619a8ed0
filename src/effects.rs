use crate::config::EFFECT_DURATION_MS;

/// Gameplay modifier granted by a collected power-up.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Effect {
    /// Halves the tick delay.
    SpeedBoost,
    /// Doubles points per food.
    ScoreMultiplier,
}

impl Effect {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::SpeedBoost => "Speed x2",
            Self::ScoreMultiplier => "Score x2",
        }
    }
}

/// Every independently expiring timer the engine tracks.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum TimerKind {
    /// An uncollected power-up is on the board.
    PowerUpPresence,
    Effect(Effect),
}

impl TimerKind {
    const ALL: [Self; 3] = [
        Self::PowerUpPresence,
        Self::Effect(Effect::SpeedBoost),
        Self::Effect(Effect::ScoreMultiplier),
    ];

    fn slot(self) -> usize {
        match self {
            Self::PowerUpPresence => 0,
            Self::Effect(Effect::SpeedBoost) => 1,
            Self::Effect(Effect::ScoreMultiplier) => 2,
        }
    }
}

/// Expiry table keyed by [`TimerKind`], in engine clock milliseconds.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct EffectTimers {
    expiries: [Option<u64>; 3],
}

impl EffectTimers {
    /// Starts (or restarts) `kind` so it expires [`EFFECT_DURATION_MS`] after `now_ms`.
    pub fn start(&mut self, kind: TimerKind, now_ms: u64) {
        self.expiries[kind.slot()] = Some(now_ms.saturating_add(EFFECT_DURATION_MS));
    }

    pub fn cancel(&mut self, kind: TimerKind) {
        self.expiries[kind.slot()] = None;
    }

    #[must_use]
    pub fn is_active(&self, kind: TimerKind) -> bool {
        self.expiries[kind.slot()].is_some()
    }

    #[must_use]
    pub fn effect_active(&self, effect: Effect) -> bool {
        self.is_active(TimerKind::Effect(effect))
    }

    /// Milliseconds left on `kind`, `None` when inactive.
    #[must_use]
    pub fn remaining_ms(&self, kind: TimerKind, now_ms: u64) -> Option<u64> {
        self.expiries[kind.slot()].map(|expiry| expiry.saturating_sub(now_ms))
    }

    /// Clears every timer whose lifetime has fully elapsed and returns them.
    pub fn expire(&mut self, now_ms: u64) -> Vec<TimerKind> {
        let mut expired = Vec::new();
        for kind in TimerKind::ALL {
            let slot = &mut self.expiries[kind.slot()];
            if slot.is_some_and(|expiry| now_ms >= expiry) {
                *slot = None;
                expired.push(kind);
            }
        }
        expired
    }

    /// Pushes every running expiry back by `delta_ms` (time spent paused).
    pub fn postpone(&mut self, delta_ms: u64) {
        for expiry in self.expiries.iter_mut().flatten() {
            *expiry = expiry.saturating_add(delta_ms);
        }
    }

    pub fn clear(&mut self) {
        self.expiries = [None; 3];
    }
}

#[cfg(test)]
mod tests {
    use super::{Effect, EffectTimers, TimerKind};
    use crate::config::EFFECT_DURATION_MS;

    #[test]
    fn timers_expire_independently() {
        let mut timers = EffectTimers::default();
        timers.start(TimerKind::Effect(Effect::SpeedBoost), 0);
        timers.start(TimerKind::Effect(Effect::ScoreMultiplier), 2_000);

        assert!(timers.expire(EFFECT_DURATION_MS - 1).is_empty());

        assert_eq!(
            timers.expire(EFFECT_DURATION_MS),
            vec![TimerKind::Effect(Effect::SpeedBoost)]
        );
        assert!(timers.effect_active(Effect::ScoreMultiplier));

        assert_eq!(
            timers.expire(EFFECT_DURATION_MS + 2_000),
            vec![TimerKind::Effect(Effect::ScoreMultiplier)]
        );
    }

    #[test]
    fn restarting_a_timer_extends_it() {
        let mut timers = EffectTimers::default();
        let kind = TimerKind::Effect(Effect::SpeedBoost);
        timers.start(kind, 0);
        timers.start(kind, 3_000);

        assert!(timers.expire(EFFECT_DURATION_MS).is_empty());
        assert_eq!(timers.remaining_ms(kind, EFFECT_DURATION_MS), Some(3_000));
    }

    #[test]
    fn postpone_shifts_only_running_timers() {
        let mut timers = EffectTimers::default();
        timers.start(TimerKind::PowerUpPresence, 100);
        timers.postpone(1_000);

        assert!(!timers.is_active(TimerKind::Effect(Effect::SpeedBoost)));
        assert_eq!(
            timers.remaining_ms(TimerKind::PowerUpPresence, 100),
            Some(EFFECT_DURATION_MS + 1_000)
        );
    }
}

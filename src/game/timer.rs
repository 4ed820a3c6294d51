//! One-shot round deadlines.
//!
//! Deadlines are never cancelled. Each carries the game and round it was armed
//! for, and the session re-checks both when it fires; a deadline whose session
//! is gone or has moved on does nothing.

use std::time::Duration;

use crate::config::Timing;
use crate::util::id::GameId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Closes the description phase with whatever was submitted.
    DescriptionDeadline,
    /// Ends the pause after scoring and opens the next round.
    RoundPause,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deadline {
    pub game_id: GameId,
    pub round: u8,
    pub kind: TimerKind,
}

impl Deadline {
    pub fn description(game_id: GameId, round: u8) -> Self {
        Self { game_id, round, kind: TimerKind::DescriptionDeadline }
    }

    pub fn round_pause(game_id: GameId, round: u8) -> Self {
        Self { game_id, round, kind: TimerKind::RoundPause }
    }

    /// How long after arming this deadline fires.
    pub fn delay(&self, timing: &Timing) -> Duration {
        match self.kind {
            TimerKind::DescriptionDeadline => timing.description_deadline,
            TimerKind::RoundPause => timing.round_pause,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_follows_kind() {
        let timing = Timing::default();
        assert_eq!(Deadline::description("g".into(), 1).delay(&timing), Duration::from_secs(30));
        assert_eq!(Deadline::round_pause("g".into(), 2).delay(&timing), Duration::from_secs(3));
    }
}

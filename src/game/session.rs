//! Per-session state: roster, phase, round, secret colors and submissions.
//!
//! Every rule that moves a session between phases lives here. Callers get back
//! plain data describing what happened and decide whom to tell; nothing in this
//! module knows about sockets or timers.

use std::collections::HashMap;

use rand::Rng;
use serde::Serialize;

use crate::game::palette::{random_color, Color};
use crate::util::id::{GameId, PlayerId};

pub const PLAYERS_PER_GAME: usize = 3;
pub const ROUNDS_PER_GAME: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Waiting,
    Describing,
    Guessing,
    /// Scored, waiting out the pause before the next round's colors go out.
    Intermission,
    Ended,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub is_host: bool,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Guess {
    /// The describer whose color is being guessed.
    pub player_id: PlayerId,
    pub guessed_color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Score {
    pub id: PlayerId,
    pub score: u32,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinError {
    #[error("game not found")]
    NotFound,
    #[error("game full")]
    Full,
    #[error("game already started")]
    NotWaiting,
    #[error("already in this game")]
    AlreadyJoined,
}

/// Everything revealed when the description phase closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionsClosed {
    pub descriptions: HashMap<PlayerId, String>,
    pub colors: HashMap<PlayerId, Color>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescribeResult {
    Ignored,
    Recorded,
    /// Last missing description arrived; the session moved to `Guessing`.
    Closed(DescriptionsClosed),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextRound {
    /// Fresh colors are assigned and held back until the pause elapses.
    Round(u8),
    GameOver { winners: Vec<Player> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundOutcome {
    pub scores: Vec<Score>,
    pub guesses: HashMap<PlayerId, Guess>,
    pub correct_colors: HashMap<PlayerId, Color>,
    pub next: NextRound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessResult {
    Ignored,
    Recorded,
    Resolved(RoundOutcome),
}

#[derive(Debug, Clone)]
pub struct Session {
    id: GameId,
    players: Vec<Player>,
    phase: Phase,
    round: u8,
    colors: HashMap<PlayerId, Color>,
    descriptions: HashMap<PlayerId, String>,
    guesses: HashMap<PlayerId, Guess>,
}

impl Session {
    pub fn new(id: GameId, host: PlayerId) -> Self {
        Self {
            id,
            players: vec![Player { id: host, is_host: true, score: 0 }],
            phase: Phase::Waiting,
            round: 0,
            colors: HashMap::new(),
            descriptions: HashMap::new(),
            guesses: HashMap::new(),
        }
    }

    pub fn id(&self) -> &GameId { &self.id }
    pub fn players(&self) -> &[Player] { &self.players }
    pub fn phase(&self) -> Phase { self.phase }
    pub fn round(&self) -> u8 { self.round }
    pub fn color_of(&self, pid: PlayerId) -> Option<Color> { self.colors.get(&pid).copied() }

    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.iter().map(|p| p.id)
    }

    pub fn is_member(&self, pid: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == pid)
    }

    pub fn is_host(&self, pid: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == pid && p.is_host)
    }

    pub fn scores(&self) -> Vec<Score> {
        self.players.iter().map(|p| Score { id: p.id, score: p.score }).collect()
    }

    pub fn join(&mut self, pid: PlayerId) -> Result<(), JoinError> {
        if self.is_member(pid) { return Err(JoinError::AlreadyJoined); }
        if self.players.len() >= PLAYERS_PER_GAME { return Err(JoinError::Full); }
        if self.phase != Phase::Waiting { return Err(JoinError::NotWaiting); }
        self.players.push(Player { id: pid, is_host: false, score: 0 });
        Ok(())
    }

    /// Starts round 1 if the host asks with a full table. Returns whether it started.
    pub fn start<R: Rng>(&mut self, by: PlayerId, rng: &mut R) -> bool {
        if self.phase != Phase::Waiting || self.players.len() != PLAYERS_PER_GAME || !self.is_host(by) {
            return false;
        }
        self.round = 1;
        self.phase = Phase::Describing;
        self.assign_colors(rng);
        true
    }

    fn assign_colors<R: Rng>(&mut self, rng: &mut R) {
        self.colors = self.players.iter().map(|p| (p.id, random_color(rng))).collect();
    }

    pub fn submit_description(&mut self, pid: PlayerId, text: String) -> DescribeResult {
        if self.phase != Phase::Describing || !self.is_member(pid) {
            return DescribeResult::Ignored;
        }
        self.descriptions.insert(pid, text);
        if self.descriptions.len() == self.players.len() {
            DescribeResult::Closed(self.close_descriptions())
        } else {
            DescribeResult::Recorded
        }
    }

    /// Deadline path: closes the description phase with whatever was collected,
    /// but only if the session is still describing the round the deadline was armed for.
    pub fn expire_descriptions(&mut self, round: u8) -> Option<DescriptionsClosed> {
        if self.phase != Phase::Describing || self.round != round {
            return None;
        }
        Some(self.close_descriptions())
    }

    fn close_descriptions(&mut self) -> DescriptionsClosed {
        self.phase = Phase::Guessing;
        DescriptionsClosed {
            descriptions: self.descriptions.clone(),
            colors: self.colors.clone(),
        }
    }

    pub fn submit_guess<R: Rng>(
        &mut self,
        guesser: PlayerId,
        target: PlayerId,
        guessed_color: String,
        rng: &mut R,
    ) -> GuessResult {
        if self.phase != Phase::Guessing
            || !self.is_member(guesser)
            || !self.is_member(target)
            || guesser == target
        {
            return GuessResult::Ignored;
        }
        self.guesses.insert(guesser, Guess { player_id: target, guessed_color });
        if self.guesses.len() == self.players.len() {
            GuessResult::Resolved(self.resolve_round(rng))
        } else {
            GuessResult::Recorded
        }
    }

    fn resolve_round<R: Rng>(&mut self, rng: &mut R) -> RoundOutcome {
        for (guesser, guess) in &self.guesses {
            let correct = self
                .colors
                .get(&guess.player_id)
                .map(|c| c.matches(&guess.guessed_color))
                .unwrap_or(false);
            if !correct { continue; }
            for p in self.players.iter_mut() {
                if p.id == *guesser { p.score += 1; }
                if p.id == guess.player_id { p.score += 1; }
            }
        }

        let guesses = std::mem::take(&mut self.guesses);
        let correct_colors = self.colors.clone();
        let scores = self.scores();
        self.descriptions.clear();
        self.round += 1;

        let next = if self.round <= ROUNDS_PER_GAME {
            self.assign_colors(rng);
            self.phase = Phase::Intermission;
            NextRound::Round(self.round)
        } else {
            self.phase = Phase::Ended;
            NextRound::GameOver { winners: self.winners() }
        };
        RoundOutcome { scores, guesses, correct_colors, next }
    }

    /// Pause path: opens the description phase of `round` if the session is
    /// still waiting for it.
    pub fn begin_round(&mut self, round: u8) -> bool {
        if self.phase != Phase::Intermission || self.round != round {
            return false;
        }
        self.phase = Phase::Describing;
        true
    }

    /// Every player holding the top score, in join order.
    pub fn winners(&self) -> Vec<Player> {
        let Some(best) = self.players.iter().map(|p| p.score).max() else { return Vec::new(); };
        self.players.iter().filter(|p| p.score == best).cloned().collect()
    }
}

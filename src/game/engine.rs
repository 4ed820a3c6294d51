//! Applies player actions and timer firings to the session registry.
//!
//! `Engine::handle` is synchronous and deterministic for a given RNG: it
//! mutates sessions and returns the messages to deliver and the deadlines to
//! arm. The hub owns the engine and carries those effects out.

use std::time::Duration;

use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info};

use crate::config::Timing;
use crate::game::registry::SessionRegistry;
use crate::game::session::{
    DescribeResult, DescriptionsClosed, GuessResult, JoinError, NextRound, RoundOutcome, Session,
};
use crate::game::timer::{Deadline, TimerKind};
use crate::util::id::PlayerId;
use crate::ws::protocol::{ClientMsg, ServerMsg};

/// Input to the engine, already attributed to a player where it came from one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Client { player: PlayerId, msg: ClientMsg },
    Disconnected { player: PlayerId },
    TimerFired(Deadline),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Send { to: PlayerId, msg: ServerMsg },
    Schedule { after: Duration, deadline: Deadline },
}

#[derive(Debug, Default)]
pub struct Effects(Vec<Effect>);

impl Effects {
    fn send_to(&mut self, to: PlayerId, msg: ServerMsg) {
        self.0.push(Effect::Send { to, msg });
    }

    fn broadcast(&mut self, session: &Session, msg: ServerMsg) {
        for pid in session.player_ids() {
            self.send_to(pid, msg.clone());
        }
    }

    fn schedule(&mut self, timing: &Timing, deadline: Deadline) {
        let after = deadline.delay(timing);
        self.0.push(Effect::Schedule { after, deadline });
    }

    pub fn into_vec(self) -> Vec<Effect> { self.0 }
}

impl IntoIterator for Effects {
    type Item = Effect;
    type IntoIter = std::vec::IntoIter<Effect>;
    fn into_iter(self) -> Self::IntoIter { self.0.into_iter() }
}

pub struct Engine {
    sessions: SessionRegistry,
    rng: StdRng,
    timing: Timing,
}

impl Engine {
    pub fn new(timing: Timing) -> Self {
        Self::with_rng(timing, StdRng::from_entropy())
    }

    pub fn with_rng(timing: Timing, rng: StdRng) -> Self {
        Self { sessions: SessionRegistry::new(), rng, timing }
    }

    pub fn sessions(&self) -> &SessionRegistry { &self.sessions }

    pub fn handle(&mut self, event: Event) -> Effects {
        let mut fx = Effects::default();
        match event {
            Event::Client { player, msg } => match msg {
                ClientMsg::CreateGame => self.handle_create(player, &mut fx),
                ClientMsg::JoinGame { game_id } => self.handle_join(player, &game_id, &mut fx),
                ClientMsg::StartGame { game_id } => self.handle_start(player, &game_id, &mut fx),
                ClientMsg::SubmitDescription { game_id, description } => {
                    self.handle_description(player, &game_id, description, &mut fx)
                }
                ClientMsg::SubmitGuess { game_id, player_id, guessed_color } => {
                    self.handle_guess(player, &game_id, player_id, guessed_color, &mut fx)
                }
                ClientMsg::Ping => fx.send_to(player, ServerMsg::Pong),
            },
            Event::Disconnected { player } => self.on_disconnect(player, &mut fx),
            Event::TimerFired(deadline) => self.on_timer(deadline, &mut fx),
        }
        fx
    }

    fn handle_create(&mut self, player: PlayerId, fx: &mut Effects) {
        if !self.sessions.sessions_of(player).is_empty() {
            debug!(%player, "create ignored: already seated");
            return;
        }
        let game_id = self.sessions.create(player, &mut self.rng);
        info!(%game_id, host = %player, "game created");
        fx.send_to(player, ServerMsg::GameCreated { game_id: game_id.clone() });
        if let Some(session) = self.sessions.get(&game_id) {
            fx.broadcast(session, ServerMsg::PlayersUpdate { players: session.players().to_vec() });
        }
    }

    fn handle_join(&mut self, player: PlayerId, game_id: &str, fx: &mut Effects) {
        let seated_elsewhere = self.sessions.sessions_of(player).iter().any(|id| id != game_id);
        let joined = match self.sessions.get_mut(game_id) {
            None => Err(JoinError::NotFound),
            Some(_) if seated_elsewhere => Err(JoinError::AlreadyJoined),
            Some(session) => session.join(player),
        };
        if let Err(reason) = joined {
            debug!(%game_id, %player, %reason, "join rejected");
            fx.send_to(player, ServerMsg::cannot_join());
            return;
        }
        if let Some(session) = self.sessions.get(game_id) {
            info!(%game_id, %player, seats = session.players().len(), "player joined");
            fx.broadcast(session, ServerMsg::PlayersUpdate { players: session.players().to_vec() });
        }
    }

    fn handle_start(&mut self, player: PlayerId, game_id: &str, fx: &mut Effects) {
        let Some(session) = self.sessions.get_mut(game_id) else { return; };
        if !session.start(player, &mut self.rng) {
            debug!(%game_id, %player, "start ignored");
            return;
        }
        info!(%game_id, "game started");
        for pid in session.player_ids() {
            if let Some(color) = session.color_of(pid) {
                fx.send_to(pid, ServerMsg::GameStarted { color });
            }
        }
        fx.schedule(&self.timing, Deadline::description(game_id.to_string(), session.round()));
    }

    fn handle_description(&mut self, player: PlayerId, game_id: &str, text: String, fx: &mut Effects) {
        let Some(session) = self.sessions.get_mut(game_id) else { return; };
        match session.submit_description(player, text) {
            DescribeResult::Ignored => debug!(%game_id, %player, "description ignored"),
            DescribeResult::Recorded => {}
            DescribeResult::Closed(closed) => {
                info!(%game_id, round = session.round(), "all descriptions in");
                announce_descriptions(session, closed, fx);
            }
        }
    }

    fn handle_guess(
        &mut self,
        player: PlayerId,
        game_id: &str,
        target: PlayerId,
        guessed_color: String,
        fx: &mut Effects,
    ) {
        let Some(session) = self.sessions.get_mut(game_id) else { return; };
        let outcome = match session.submit_guess(player, target, guessed_color, &mut self.rng) {
            GuessResult::Ignored => {
                debug!(%game_id, %player, "guess ignored");
                return;
            }
            GuessResult::Recorded => return,
            GuessResult::Resolved(outcome) => outcome,
        };
        let RoundOutcome { scores, guesses, correct_colors, next } = outcome;
        info!(%game_id, round = session.round() - 1, "round resolved");
        fx.broadcast(session, ServerMsg::RoundEnd { scores: scores.clone(), guesses, correct_colors });
        match next {
            NextRound::Round(round) => {
                fx.schedule(&self.timing, Deadline::round_pause(game_id.to_string(), round));
            }
            NextRound::GameOver { winners } => {
                info!(%game_id, winners = winners.len(), "game ended");
                fx.broadcast(session, ServerMsg::GameEnd { winners, scores });
                self.sessions.remove(game_id);
            }
        }
    }

    fn on_disconnect(&mut self, player: PlayerId, fx: &mut Effects) {
        for game_id in self.sessions.sessions_of(player) {
            let Some(session) = self.sessions.remove(&game_id) else { continue; };
            info!(%game_id, %player, "player left, session closed");
            for pid in session.player_ids().filter(|pid| *pid != player) {
                fx.send_to(pid, ServerMsg::PlayerLeft);
            }
        }
    }

    fn on_timer(&mut self, deadline: Deadline, fx: &mut Effects) {
        let Some(session) = self.sessions.get_mut(&deadline.game_id) else {
            debug!(game_id = %deadline.game_id, "timer for closed session");
            return;
        };
        match deadline.kind {
            TimerKind::DescriptionDeadline => {
                let Some(closed) = session.expire_descriptions(deadline.round) else {
                    debug!(game_id = %deadline.game_id, round = deadline.round, "stale description deadline");
                    return;
                };
                info!(game_id = %deadline.game_id, round = deadline.round, submitted = closed.descriptions.len(), "description deadline hit");
                announce_descriptions(session, closed, fx);
            }
            TimerKind::RoundPause => {
                if !session.begin_round(deadline.round) {
                    debug!(game_id = %deadline.game_id, round = deadline.round, "stale round pause");
                    return;
                }
                info!(game_id = %deadline.game_id, round = deadline.round, "round started");
                for pid in session.player_ids() {
                    if let Some(color) = session.color_of(pid) {
                        fx.send_to(pid, ServerMsg::NewRound { round: deadline.round, color });
                    }
                }
                fx.schedule(&self.timing, Deadline::description(deadline.game_id, deadline.round));
            }
        }
    }
}

fn announce_descriptions(session: &Session, closed: DescriptionsClosed, fx: &mut Effects) {
    let DescriptionsClosed { descriptions, colors } = closed;
    fx.broadcast(session, ServerMsg::DescriptionPhaseEnd { descriptions, colors });
}

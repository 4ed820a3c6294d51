//! Registry of live sessions keyed by game id.

use std::collections::HashMap;

use rand::Rng;

use crate::game::session::Session;
use crate::util::id::{new_game_id, GameId, PlayerId};

#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<GameId, Session>,
}

impl SessionRegistry {
    pub fn new() -> Self { Self { sessions: HashMap::new() } }

    /// Inserts a waiting session with `host` as its only player and returns its id.
    pub fn create<R: Rng>(&mut self, host: PlayerId, rng: &mut R) -> GameId {
        let id = loop {
            let candidate = new_game_id(rng);
            if !self.sessions.contains_key(&candidate) { break candidate; }
        };
        self.sessions.insert(id.clone(), Session::new(id.clone(), host));
        id
    }

    pub fn get(&self, id: &str) -> Option<&Session> {
        self.sessions.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Session> {
        self.sessions.get_mut(id)
    }

    /// Removes a session; removing an unknown id is a no-op.
    pub fn remove(&mut self, id: &str) -> Option<Session> {
        self.sessions.remove(id)
    }

    /// Ids of every session that lists `player`.
    pub fn sessions_of(&self, player: PlayerId) -> Vec<GameId> {
        self.sessions
            .values()
            .filter(|s| s.is_member(player))
            .map(|s| s.id().clone())
            .collect()
    }

    pub fn len(&self) -> usize { self.sessions.len() }
    pub fn is_empty(&self) -> bool { self.sessions.is_empty() }
}

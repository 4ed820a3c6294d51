//! JSON messages exchanged over the game socket, tagged by `type`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::game::palette::Color;
use crate::game::session::{Guess, Player, Score};
use crate::util::id::{GameId, PlayerId};

/// Text of the only error a player ever sees.
pub const CANNOT_JOIN: &str = "Cannot join game";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMsg {
    CreateGame,
    #[serde(rename_all = "camelCase")]
    JoinGame { game_id: GameId },
    #[serde(rename_all = "camelCase")]
    StartGame { game_id: GameId },
    #[serde(rename_all = "camelCase")]
    SubmitDescription { game_id: GameId, description: String },
    /// `player_id` is the describer being guessed, not the sender.
    #[serde(rename_all = "camelCase")]
    SubmitGuess { game_id: GameId, player_id: PlayerId, guessed_color: String },
    Ping,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMsg {
    #[serde(rename_all = "camelCase")]
    Connected { player_id: PlayerId },
    #[serde(rename_all = "camelCase")]
    GameCreated { game_id: GameId },
    PlayersUpdate { players: Vec<Player> },
    Error { message: String },
    /// Private: the recipient's own color only.
    GameStarted { color: Color },
    DescriptionPhaseEnd {
        descriptions: HashMap<PlayerId, String>,
        colors: HashMap<PlayerId, Color>,
    },
    #[serde(rename_all = "camelCase")]
    RoundEnd {
        scores: Vec<Score>,
        guesses: HashMap<PlayerId, Guess>,
        correct_colors: HashMap<PlayerId, Color>,
    },
    /// Private: the recipient's color for the new round.
    NewRound { round: u8, color: Color },
    GameEnd { winners: Vec<Player>, scores: Vec<Score> },
    PlayerLeft,
    Pong,
}

impl ServerMsg {
    pub fn cannot_join() -> Self {
        ServerMsg::Error { message: CANNOT_JOIN.to_string() }
    }
}

//! ID utilities (short game codes, player ids).

use rand::{distributions::Alphanumeric, Rng};
use uuid::Uuid;

/// Length of a game code. 62^10 codes keeps collisions negligible for the
/// number of live sessions one process holds; the registry still re-rolls on a hit.
pub const GAME_ID_LEN: usize = 10;

pub type GameId = String;
pub type PlayerId = Uuid;

/// Generate a short game code (URL-safe alphanumeric).
pub fn new_game_id<R: Rng>(rng: &mut R) -> GameId {
    (0..GAME_ID_LEN)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect()
}

/// Identity for one connection's lifetime.
pub fn new_player_id() -> PlayerId {
    Uuid::new_v4()
}

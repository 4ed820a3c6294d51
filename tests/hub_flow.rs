use std::time::Duration;

use hue_guess::config::Timing;
use hue_guess::game::engine::{Engine, Event};
use hue_guess::game::hub::{self, HubHandle};
use hue_guess::util::id::PlayerId;
use hue_guess::ws::protocol::{ClientMsg, ServerMsg};
use rand::{rngs::StdRng, SeedableRng};
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout, Instant};
use uuid::Uuid;

struct Peer {
    id: PlayerId,
    rx: mpsc::UnboundedReceiver<ServerMsg>,
}

impl Peer {
    fn connect(hub: &HubHandle) -> Self {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        hub.connect(id, tx);
        Peer { id, rx }
    }

    async fn next_where<T>(&mut self, mut pick: impl FnMut(ServerMsg) -> Option<T>) -> T {
        loop {
            let msg = timeout(Duration::from_secs(3600), self.rx.recv())
                .await
                .expect("timed out waiting for message")
                .expect("hub dropped peer");
            if let Some(v) = pick(msg) {
                return v;
            }
        }
    }

    fn drain(&mut self) -> Vec<ServerMsg> {
        let mut out = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            out.push(msg);
        }
        out
    }
}

struct Table {
    hub: HubHandle,
    game_id: String,
    peers: Vec<Peer>,
}

impl Table {
    fn act(&self, who: usize, msg: ClientMsg) {
        self.hub.send(Event::Client { player: self.peers[who].id, msg });
    }

    fn describe(&self, who: usize, text: &str) {
        self.act(who, ClientMsg::SubmitDescription { game_id: self.game_id.clone(), description: text.into() });
    }

    fn guess(&self, who: usize, target: usize, color: &str) {
        self.act(who, ClientMsg::SubmitGuess {
            game_id: self.game_id.clone(),
            player_id: self.peers[target].id,
            guessed_color: color.into(),
        });
    }

    fn wrong_guesses(&self) {
        self.guess(0, 1, "nope");
        self.guess(1, 2, "nope");
        self.guess(2, 0, "nope");
    }
}

async fn started_table(seed: u64) -> Table {
    let hub = hub::spawn(Engine::with_rng(Timing::default(), StdRng::seed_from_u64(seed)));
    let mut peers: Vec<Peer> = (0..3).map(|_| Peer::connect(&hub)).collect();

    hub.send(Event::Client { player: peers[0].id, msg: ClientMsg::CreateGame });
    let game_id = peers[0]
        .next_where(|m| match m {
            ServerMsg::GameCreated { game_id } => Some(game_id),
            _ => None,
        })
        .await;
    for p in &peers[1..] {
        hub.send(Event::Client { player: p.id, msg: ClientMsg::JoinGame { game_id: game_id.clone() } });
    }
    hub.send(Event::Client { player: peers[0].id, msg: ClientMsg::StartGame { game_id: game_id.clone() } });
    for p in peers.iter_mut() {
        p.next_where(|m| matches!(m, ServerMsg::GameStarted { .. }).then_some(())).await;
    }
    Table { hub, game_id, peers }
}

fn phase_ends(msgs: &[ServerMsg]) -> usize {
    msgs.iter().filter(|m| matches!(m, ServerMsg::DescriptionPhaseEnd { .. })).count()
}

#[tokio::test(start_paused = true)]
async fn welcome_carries_player_id() {
    let hub = hub::spawn(Engine::with_rng(Timing::default(), StdRng::seed_from_u64(1)));
    let mut peer = Peer::connect(&hub);
    let me = peer.id;
    let got = peer
        .next_where(|m| match m {
            ServerMsg::Connected { player_id } => Some(player_id),
            _ => None,
        })
        .await;
    assert_eq!(got, me);
}

#[tokio::test(start_paused = true)]
async fn deadline_closes_descriptions_with_what_arrived() {
    let mut t = started_table(2).await;
    let began = Instant::now();
    t.describe(0, "ripe tomato");

    let descriptions = t.peers[1]
        .next_where(|m| match m {
            ServerMsg::DescriptionPhaseEnd { descriptions, colors } => {
                assert_eq!(colors.len(), 3);
                Some(descriptions)
            }
            _ => None,
        })
        .await;
    assert!(began.elapsed() >= Duration::from_secs(30));
    assert_eq!(descriptions.len(), 1);
    assert_eq!(descriptions[&t.peers[0].id], "ripe tomato");

    // late descriptions change nothing
    t.describe(1, "too late");
    sleep(Duration::from_secs(60)).await;
    assert_eq!(phase_ends(&t.peers[1].drain()), 0);
}

#[tokio::test(start_paused = true)]
async fn early_completion_beats_deadline_exactly_once() {
    let mut t = started_table(3).await;
    let began = Instant::now();
    t.describe(0, "sky");
    t.describe(1, "grass");
    t.describe(2, "brick");

    for p in t.peers.iter_mut() {
        p.next_where(|m| matches!(m, ServerMsg::DescriptionPhaseEnd { .. }).then_some(())).await;
    }
    assert!(began.elapsed() < Duration::from_secs(30));

    sleep(Duration::from_secs(45)).await;
    for p in t.peers.iter_mut() {
        assert_eq!(phase_ends(&p.drain()), 0);
    }
}

#[tokio::test(start_paused = true)]
async fn three_rounds_with_pauses_then_game_end() {
    let mut t = started_table(4).await;

    for round in 2..=3u8 {
        t.describe(0, "a");
        t.describe(1, "b");
        t.describe(2, "c");
        t.wrong_guesses();
        t.peers[0].next_where(|m| matches!(m, ServerMsg::RoundEnd { .. }).then_some(())).await;
        let paused_at = Instant::now();
        for p in t.peers.iter_mut() {
            let got = p
                .next_where(|m| match m {
                    ServerMsg::NewRound { round, .. } => Some(round),
                    _ => None,
                })
                .await;
            assert_eq!(got, round);
        }
        assert!(paused_at.elapsed() >= Duration::from_secs(3));
    }

    t.describe(0, "a");
    t.describe(1, "b");
    t.describe(2, "c");
    t.wrong_guesses();
    for p in t.peers.iter_mut() {
        let (winners, scores) = p
            .next_where(|m| match m {
                ServerMsg::GameEnd { winners, scores } => Some((winners, scores)),
                _ => None,
            })
            .await;
        assert_eq!(winners.len(), 3);
        assert!(scores.iter().all(|s| s.score == 0));
    }

    // the game is gone: actions and leftover timers are silent
    t.describe(0, "again");
    sleep(Duration::from_secs(60)).await;
    for p in t.peers.iter_mut() {
        assert!(p.drain().is_empty());
    }
}

#[tokio::test(start_paused = true)]
async fn disconnect_ends_game_for_everyone() {
    let mut t = started_table(5).await;
    let gone = t.peers[1].id;
    t.hub.send(Event::Disconnected { player: gone });

    for who in [0, 2] {
        t.peers[who].next_where(|m| (m == ServerMsg::PlayerLeft).then_some(())).await;
    }

    t.describe(0, "still here");
    sleep(Duration::from_secs(60)).await;
    for who in [0, 2] {
        let rest = t.peers[who].drain();
        assert!(!rest.contains(&ServerMsg::PlayerLeft), "exactly one playerLeft");
        assert_eq!(phase_ends(&rest), 0);
    }
    assert!(t.peers[1].drain().is_empty());
}

#[tokio::test(start_paused = true)]
async fn fourth_player_gets_cannot_join() {
    let mut t = started_table(6).await;
    let mut late = Peer::connect(&t.hub);
    t.hub.send(Event::Client { player: late.id, msg: ClientMsg::JoinGame { game_id: t.game_id.clone() } });
    let message = late
        .next_where(|m| match m {
            ServerMsg::Error { message } => Some(message),
            _ => None,
        })
        .await;
    assert_eq!(message, "Cannot join game");
    for p in t.peers.iter_mut() {
        assert!(!p.drain().iter().any(|m| matches!(m, ServerMsg::PlayersUpdate { .. })));
    }
}

//! The single task that owns the engine.
//!
//! Connections and timers talk to it over one unbounded channel, so every
//! action and timer firing is applied one at a time in arrival order and no
//! session state is ever shared between tasks.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::game::engine::{Effect, Engine, Event};
use crate::util::id::PlayerId;
use crate::ws::protocol::ServerMsg;

/// Outbound queue of one connected player.
pub type PeerTx = mpsc::UnboundedSender<ServerMsg>;

#[derive(Debug)]
pub enum HubMsg {
    Connect { player: PlayerId, tx: PeerTx },
    Event(Event),
}

/// Cloneable handle used by connections to reach the hub.
#[derive(Clone, Debug)]
pub struct HubHandle {
    tx: mpsc::UnboundedSender<HubMsg>,
}

impl HubHandle {
    pub fn connect(&self, player: PlayerId, tx: PeerTx) {
        let _ = self.tx.send(HubMsg::Connect { player, tx });
    }

    pub fn send(&self, event: Event) {
        let _ = self.tx.send(HubMsg::Event(event));
    }
}

/// Spawns the hub loop on the current runtime.
pub fn spawn(engine: Engine) -> HubHandle {
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = HubHandle { tx };
    tokio::spawn(run(engine, rx, handle.clone()));
    handle
}

async fn run(mut engine: Engine, mut rx: mpsc::UnboundedReceiver<HubMsg>, handle: HubHandle) {
    let mut peers: HashMap<PlayerId, PeerTx> = HashMap::new();
    while let Some(msg) = rx.recv().await {
        let event = match msg {
            HubMsg::Connect { player, tx } => {
                let _ = tx.send(ServerMsg::Connected { player_id: player });
                peers.insert(player, tx);
                continue;
            }
            HubMsg::Event(event) => event,
        };
        let departed = match &event {
            Event::Disconnected { player } => Some(*player),
            _ => None,
        };
        for effect in engine.handle(event) {
            match effect {
                Effect::Send { to, msg } => send_to(&peers, to, msg),
                Effect::Schedule { after, deadline } => {
                    let handle = handle.clone();
                    trace!(?deadline, ?after, "timer armed");
                    tokio::spawn(async move {
                        tokio::time::sleep(after).await;
                        handle.send(Event::TimerFired(deadline));
                    });
                }
            }
        }
        if let Some(player) = departed {
            peers.remove(&player);
        }
    }
}

fn send_to(peers: &HashMap<PlayerId, PeerTx>, to: PlayerId, msg: ServerMsg) {
    match peers.get(&to) {
        Some(tx) => {
            let _ = tx.send(msg);
        }
        None => debug!(player = %to, "no peer for outbound message"),
    }
}

//! World ownership and the authoritative tick loop

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::time::interval;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::util::time::{SIMULATION_TPS, SNAPSHOT_TPS, TICK_DURATION_MICROS};
use crate::ws::protocol::{ClientMsg, ServerMsg};

use super::grid::Direction;
use super::player::Action;
use super::snapshot::SnapshotBuilder;
use super::world::GameWorld;
use super::PlayerIntent;

/// Handle to the running world
#[derive(Clone)]
pub struct WorldHandle {
    pub input_tx: mpsc::Sender<PlayerIntent>,
    pub update_tx: broadcast::Sender<ServerMsg>,
    player_count: Arc<AtomicUsize>,
    tick: Arc<AtomicU64>,
}

impl WorldHandle {
    pub fn player_count(&self) -> usize {
        self.player_count.load(Ordering::Relaxed)
    }

    pub fn current_tick(&self) -> u64 {
        self.tick.load(Ordering::Relaxed)
    }
}

/// Owns the `GameWorld` and serializes all access to it: intents drain and
/// ticks run on this single task, so the core is never re-entered.
pub struct WorldServer {
    world: GameWorld,
    input_rx: mpsc::Receiver<PlayerIntent>,
    update_tx: broadcast::Sender<ServerMsg>,
    snapshot_builder: SnapshotBuilder,
    player_count: Arc<AtomicUsize>,
    tick: Arc<AtomicU64>,
}

impl WorldServer {
    /// Create the world from configuration
    pub fn new(config: &Config) -> (Self, WorldHandle) {
        let (input_tx, input_rx) = mpsc::channel(256);
        let (update_tx, _) = broadcast::channel(64);
        let player_count = Arc::new(AtomicUsize::new(0));
        let tick = Arc::new(AtomicU64::new(0));

        let handle = WorldHandle {
            input_tx,
            update_tx: update_tx.clone(),
            player_count: player_count.clone(),
            tick: tick.clone(),
        };

        let seed = config.world_seed.unwrap_or_else(rand::random);
        let layout = config.world_layout.builder();
        let world = GameWorld::new(
            config.world_width,
            config.world_height,
            seed,
            layout.as_ref(),
        );

        info!(
            width = config.world_width,
            height = config.world_height,
            seed,
            layout = ?config.world_layout,
            "World constructed"
        );

        let snapshot_interval = SIMULATION_TPS / SNAPSHOT_TPS;
        let server = Self {
            world,
            input_rx,
            update_tx,
            snapshot_builder: SnapshotBuilder::new(snapshot_interval),
            player_count,
            tick,
        };

        (server, handle)
    }

    /// Run the authoritative tick loop
    pub async fn run(mut self) {
        info!("World server started");

        let tick_duration = Duration::from_micros(TICK_DURATION_MICROS);
        let mut tick_interval = interval(tick_duration);
        tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tick_interval.tick().await;

            // Drain intent queue
            self.process_intents();

            // Run simulation tick
            self.world.tick();
            self.tick.store(self.world.time(), Ordering::Relaxed);

            // Build and broadcast per-player updates if needed
            if self.snapshot_builder.should_send() {
                for update in self.snapshot_builder.build(&self.world) {
                    let _ = self.update_tx.send(update);
                }
            }
        }
    }

    /// Process all pending intents from players
    fn process_intents(&mut self) {
        while let Ok(intent) = self.input_rx.try_recv() {
            match intent.msg {
                ClientMsg::Join { name } => {
                    self.handle_join(intent.user_id, name);
                }
                ClientMsg::Move { direction } => {
                    self.handle_move(intent.user_id, direction);
                }
                ClientMsg::Ping { t } => {
                    let _ = self.update_tx.send(ServerMsg::Pong { t });
                }
                ClientMsg::Leave => {
                    self.handle_leave(intent.user_id);
                }
            }
        }
    }

    /// Handle player join request
    fn handle_join(&mut self, user_id: Uuid, name: String) {
        if self.world.player(&user_id).is_some() {
            warn!(user_id = %user_id, "Player already in world");
            return;
        }

        let player = self.world.add_player(user_id, name.clone());
        let (x, y) = (player.x(), player.y());

        self.player_count
            .store(self.world.player_count(), Ordering::Relaxed);

        // Notify all players of the new player
        let _ = self
            .update_tx
            .send(ServerMsg::PlayerJoined { user_id, name });

        // The newcomer should see its surroundings without waiting a full
        // snapshot interval
        self.snapshot_builder.force_next();

        info!(
            user_id = %user_id,
            x,
            y,
            player_count = self.world.player_count(),
            "Player joined world"
        );
    }

    /// Handle a movement intent. The step is queued; bounds are checked
    /// when the tick drains the queue.
    fn handle_move(&mut self, user_id: Uuid, direction: Direction) {
        if !self.world.queue_action(&user_id, Action::Move(direction)) {
            warn!(user_id = %user_id, "Move intent for unknown player");
        }
    }

    /// Handle player leave
    fn handle_leave(&mut self, user_id: Uuid) {
        if let Some(player) = self.world.remove_player(&user_id) {
            self.player_count
                .store(self.world.player_count(), Ordering::Relaxed);

            let _ = self.update_tx.send(ServerMsg::PlayerLeft {
                user_id,
                reason: "disconnected".to_string(),
            });

            self.snapshot_builder.force_next();

            info!(
                user_id = %user_id,
                discarded_actions = player.pending_actions(),
                "Player left world"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::layout::LayoutKind;
    use tokio::time::{timeout, Duration};

    fn test_config() -> Config {
        Config {
            server_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
            client_origin: "http://localhost:8080".to_string(),
            world_width: 5,
            world_height: 5,
            world_seed: Some(42),
            world_layout: LayoutKind::Empty,
        }
    }

    async fn recv_until<F>(rx: &mut broadcast::Receiver<ServerMsg>, mut pred: F) -> ServerMsg
    where
        F: FnMut(&ServerMsg) -> bool,
    {
        timeout(Duration::from_secs(5), async {
            loop {
                let msg = rx.recv().await.expect("update channel closed");
                if pred(&msg) {
                    return msg;
                }
            }
        })
        .await
        .expect("timed out waiting for server message")
    }

    #[tokio::test]
    async fn join_move_leave_round_trip() {
        let (server, handle) = WorldServer::new(&test_config());
        let mut update_rx = handle.update_tx.subscribe();
        tokio::spawn(server.run());

        let user_id = Uuid::new_v4();
        let intent = |msg| PlayerIntent {
            user_id,
            msg,
            received_at: 0,
        };

        handle
            .input_tx
            .send(intent(ClientMsg::Join {
                name: "tester".to_string(),
            }))
            .await
            .unwrap();

        let joined = recv_until(&mut update_rx, |m| {
            matches!(m, ServerMsg::PlayerJoined { .. })
        })
        .await;
        assert!(matches!(
            joined,
            ServerMsg::PlayerJoined { user_id: id, .. } if id == user_id
        ));

        // An update frame addressed to the player eventually arrives
        let update = recv_until(&mut update_rx, |m| {
            matches!(m, ServerMsg::WorldUpdate { user_id: id, .. } if *id == user_id)
        })
        .await;
        if let ServerMsg::WorldUpdate { surroundings, .. } = update {
            assert_eq!(surroundings.chars().count(), 9);
        }

        handle
            .input_tx
            .send(intent(ClientMsg::Move {
                direction: Direction::North,
            }))
            .await
            .unwrap();

        handle.input_tx.send(intent(ClientMsg::Leave)).await.unwrap();
        let left = recv_until(&mut update_rx, |m| {
            matches!(m, ServerMsg::PlayerLeft { .. })
        })
        .await;
        assert!(matches!(
            left,
            ServerMsg::PlayerLeft { user_id: id, .. } if id == user_id
        ));
        assert_eq!(handle.player_count(), 0);
    }

    #[tokio::test]
    async fn ping_is_answered_with_pong() {
        let (server, handle) = WorldServer::new(&test_config());
        let mut update_rx = handle.update_tx.subscribe();
        tokio::spawn(server.run());

        handle
            .input_tx
            .send(PlayerIntent {
                user_id: Uuid::new_v4(),
                msg: ClientMsg::Ping { t: 99 },
                received_at: 0,
            })
            .await
            .unwrap();

        let pong = recv_until(&mut update_rx, |m| matches!(m, ServerMsg::Pong { .. })).await;
        assert!(matches!(pong, ServerMsg::Pong { t: 99 }));
    }
}

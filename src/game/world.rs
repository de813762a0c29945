//! The authoritative world: grid, player set, and discrete time

use std::collections::HashMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

use super::grid::{Coord, Direction, Grid};
use super::layout::LayoutBuilder;
use super::player::{Action, Player};

/// The world owns one grid and the player set, and advances simulation
/// time in discrete ticks. Single-threaded by construction: the server
/// loop owns it exclusively and never re-enters `tick`.
pub struct GameWorld {
    grid: Grid,
    players: HashMap<Uuid, Player>,
    /// Monotonically increasing, +1 per tick, never reset
    time: u64,
    rng: ChaCha8Rng,
}

impl GameWorld {
    /// Construct the grid, run the layout builder once, then go live.
    /// No player can join before the layout is in place.
    pub fn new(width: i32, height: i32, seed: u64, layout: &dyn LayoutBuilder) -> Self {
        let mut grid = Grid::new(width, height);
        layout.build_layout(&mut grid);

        Self {
            grid,
            players: HashMap::new(),
            time: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn time(&self) -> u64 {
        self.time
    }

    pub fn player(&self, id: &Uuid) -> Option<&Player> {
        self.players.get(id)
    }

    /// Iterate players in unspecified order.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Add a player at a uniformly random in-bounds position. Display
    /// names may collide; identity is the id.
    pub fn add_player(&mut self, id: Uuid, display_name: impl Into<String>) -> &Player {
        let position = Coord::new(
            self.rng.gen_range(0..self.grid.width()),
            self.rng.gen_range(0..self.grid.height()),
        );
        self.players
            .entry(id)
            .or_insert_with(|| Player::new(id, display_name.into(), position))
    }

    /// Remove a player. Queued-but-undrained actions are discarded with it.
    pub fn remove_player(&mut self, id: &Uuid) -> Option<Player> {
        self.players.remove(id)
    }

    /// Queue an action for a player. Returns false when the player is not
    /// in the world.
    pub fn queue_action(&mut self, id: &Uuid, action: Action) -> bool {
        match self.players.get_mut(id) {
            Some(player) => {
                player.queue_action(action);
                true
            }
            None => false,
        }
    }

    /// Apply one step in `direction` iff the proposed position stays
    /// in-bounds. An out-of-bounds move is a silent no-op, not an error.
    pub fn move_player(&mut self, id: &Uuid, direction: Direction) {
        let Some(player) = self.players.get_mut(id) else {
            return;
        };
        let (dx, dy) = direction.unit();
        let proposed = player.position.offset(dx, dy);
        if self.grid.is_in_bounds(proposed) {
            player.position = proposed;
        }
    }

    /// Advance time by one step and drain every player's action queue to
    /// empty, in strict FIFO order per player. Player iteration order is
    /// unspecified. Actions enqueued while a queue is draining run within
    /// the same tick. After this returns every queue is empty and world
    /// state reflects everything submitted before the call.
    pub fn tick(&mut self) {
        self.time += 1;

        let ids: Vec<Uuid> = self.players.keys().copied().collect();
        for id in ids {
            while let Some(action) = self.players.get_mut(&id).and_then(Player::next_action) {
                self.dispatch(&id, action);
            }
        }
    }

    fn dispatch(&mut self, id: &Uuid, action: Action) {
        match action {
            Action::Move(direction) => self.move_player(id, direction),
        }
    }
}

//! World-update building: broadcast cadence and the per-player surroundings view

use super::grid::{Coord, Terrain};
use super::player::Player;
use super::world::GameWorld;
use crate::ws::protocol::ServerMsg;

/// Terrain codes the client's indicator color table understands.
/// 'c' is reserved in the client table for a future terrain type.
pub const CODE_EMPTY: char = ' ';
pub const CODE_WALL: char = 'w';
pub const CODE_VOID: char = 'v';
pub const CODE_PLAYER: char = 'p';

/// Total over the closed terrain enum, so no square can render as an
/// unmapped character.
pub fn terrain_code(terrain: Terrain) -> char {
    match terrain {
        Terrain::Empty => CODE_EMPTY,
        Terrain::Wall => CODE_WALL,
    }
}

/// Build the 3x3 view centered on `viewer`: row-major, north row first,
/// nine characters. Out-of-bounds cells read as void; a cell occupied by
/// another player reads as a player marker.
pub fn surroundings(world: &GameWorld, viewer: &Player) -> String {
    let mut view = String::with_capacity(9);
    for dy in -1..=1 {
        for dx in -1..=1 {
            view.push(cell_code(world, viewer, viewer.position.offset(dx, dy)));
        }
    }
    view
}

fn cell_code(world: &GameWorld, viewer: &Player, coord: Coord) -> char {
    let Some(square) = world.grid().square_at(coord) else {
        return CODE_VOID;
    };
    if world
        .players()
        .any(|p| p.id != viewer.id && p.position == coord)
    {
        return CODE_PLAYER;
    }
    terrain_code(square.terrain)
}

/// Paces world-update broadcasts relative to simulation ticks
pub struct SnapshotBuilder {
    /// Tick counter since last snapshot
    ticks_since_snapshot: u32,
    /// Snapshot interval in ticks
    snapshot_interval: u32,
}

impl SnapshotBuilder {
    pub fn new(snapshot_interval: u32) -> Self {
        Self {
            ticks_since_snapshot: 0,
            snapshot_interval,
        }
    }

    /// Check if it's time to send a snapshot
    pub fn should_send(&mut self) -> bool {
        self.ticks_since_snapshot += 1;
        if self.ticks_since_snapshot >= self.snapshot_interval {
            self.ticks_since_snapshot = 0;
            true
        } else {
            false
        }
    }

    /// Force snapshot on next check (used after joins and leaves)
    pub fn force_next(&mut self) {
        self.ticks_since_snapshot = self.snapshot_interval;
    }

    /// Build one world-update frame per player.
    pub fn build(&mut self, world: &GameWorld) -> Vec<ServerMsg> {
        world
            .players()
            .map(|p| ServerMsg::WorldUpdate {
                user_id: p.id,
                tick: world.time(),
                surroundings: surroundings(world, p),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::grid::Direction;
    use crate::game::layout::{EmptyLayout, PerimeterLayout};
    use uuid::Uuid;

    /// Add a player and drive it to (0, 0) via the clamping no-ops.
    fn parked_player(world: &mut GameWorld, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        world.add_player(id, name);
        for _ in 0..8 {
            world.move_player(&id, Direction::West);
            world.move_player(&id, Direction::North);
        }
        id
    }

    fn step(world: &mut GameWorld, id: &Uuid, dx: i32, dy: i32) {
        for _ in 0..dx {
            world.move_player(id, Direction::East);
        }
        for _ in 0..dy {
            world.move_player(id, Direction::South);
        }
    }

    #[test]
    fn open_ground_reads_as_all_empty() {
        let mut world = GameWorld::new(9, 9, 1, &EmptyLayout);
        let id = parked_player(&mut world, "a");
        step(&mut world, &id, 4, 4);

        let viewer = world.player(&id).unwrap().clone();
        assert_eq!(surroundings(&world, &viewer), "         ");
    }

    #[test]
    fn edges_read_as_void() {
        let mut world = GameWorld::new(5, 5, 1, &EmptyLayout);
        let id = parked_player(&mut world, "a");

        // Viewer at (0, 0): north row and west column are out of bounds
        let viewer = world.player(&id).unwrap().clone();
        assert_eq!(surroundings(&world, &viewer), "vvvv  v  ");
    }

    #[test]
    fn other_players_read_as_player_marker() {
        let mut world = GameWorld::new(9, 9, 1, &EmptyLayout);
        let a = parked_player(&mut world, "a");
        let b = parked_player(&mut world, "b");
        step(&mut world, &a, 4, 4);
        step(&mut world, &b, 5, 4); // directly east of a

        let viewer = world.player(&a).unwrap().clone();
        let view = surroundings(&world, &viewer);
        // Center row is (west, self, east)
        assert_eq!(&view[3..6], "  p");
        // The viewer's own square renders as terrain, not a marker
        assert_eq!(view.chars().nth(4), Some(CODE_EMPTY));
    }

    #[test]
    fn walls_read_with_wall_code() {
        let mut world = GameWorld::new(5, 5, 1, &PerimeterLayout);
        let id = parked_player(&mut world, "a");
        step(&mut world, &id, 1, 1);

        // Viewer at (1, 1): north row and west column touch the wall ring
        let viewer = world.player(&id).unwrap().clone();
        assert_eq!(surroundings(&world, &viewer), "wwww  w  ");
    }

    #[test]
    fn cadence_fires_every_interval() {
        let mut builder = SnapshotBuilder::new(2);
        assert!(!builder.should_send());
        assert!(builder.should_send());
        assert!(!builder.should_send());
        assert!(builder.should_send());
    }

    #[test]
    fn force_next_short_circuits_cadence() {
        let mut builder = SnapshotBuilder::new(5);
        builder.force_next();
        assert!(builder.should_send());
        assert!(!builder.should_send());
    }

    #[test]
    fn build_emits_one_frame_per_player() {
        let mut world = GameWorld::new(5, 5, 1, &EmptyLayout);
        let a = parked_player(&mut world, "a");
        let b = parked_player(&mut world, "b");

        let mut builder = SnapshotBuilder::new(1);
        let frames = builder.build(&world);
        assert_eq!(frames.len(), 2);

        let mut ids: Vec<Uuid> = frames
            .iter()
            .map(|msg| match msg {
                ServerMsg::WorldUpdate { user_id, .. } => *user_id,
                other => panic!("unexpected frame: {other:?}"),
            })
            .collect();
        ids.sort();
        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(ids, expected);
    }
}

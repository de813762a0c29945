//! Player state: identity, position, and the pending-action queue

use std::collections::VecDeque;

use uuid::Uuid;

use super::grid::{Coord, Direction};

/// An intent a player has submitted but the world has not yet applied.
/// Immutable once queued. Closed for now, with room to grow (attack,
/// interact) without changing the queue's element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Move(Direction),
}

/// A player in the world (authoritative)
#[derive(Debug, Clone)]
pub struct Player {
    pub id: Uuid,
    pub display_name: String,
    pub position: Coord,
    /// Insertion order is execution order
    action_queue: VecDeque<Action>,
}

impl Player {
    pub fn new(id: Uuid, display_name: String, position: Coord) -> Self {
        Self {
            id,
            display_name,
            position,
            action_queue: VecDeque::new(),
        }
    }

    pub fn x(&self) -> i32 {
        self.position.x
    }

    pub fn y(&self) -> i32 {
        self.position.y
    }

    /// Append an action. No validation here; bounds are checked when the
    /// tick drains the queue.
    pub fn queue_action(&mut self, action: Action) {
        self.action_queue.push_back(action);
    }

    /// Convenience: queue one step in `direction`.
    pub fn queue_move(&mut self, direction: Direction) {
        self.queue_action(Action::Move(direction));
    }

    pub(crate) fn next_action(&mut self) -> Option<Action> {
        self.action_queue.pop_front()
    }

    pub fn pending_actions(&self) -> usize {
        self.action_queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_preserves_insertion_order() {
        let mut player = Player::new(Uuid::new_v4(), "a".to_string(), Coord::new(0, 0));
        player.queue_move(Direction::East);
        player.queue_move(Direction::North);
        player.queue_action(Action::Move(Direction::South));

        assert_eq!(player.pending_actions(), 3);
        assert_eq!(player.next_action(), Some(Action::Move(Direction::East)));
        assert_eq!(player.next_action(), Some(Action::Move(Direction::North)));
        assert_eq!(player.next_action(), Some(Action::Move(Direction::South)));
        assert_eq!(player.next_action(), None);
    }

    #[test]
    fn position_accessors_track_coordinate() {
        let player = Player::new(Uuid::new_v4(), "b".to_string(), Coord::new(3, 7));
        assert_eq!(player.x(), 3);
        assert_eq!(player.y(), 7);
    }
}

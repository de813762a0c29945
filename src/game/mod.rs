//! Game simulation modules

pub mod grid;
pub mod layout;
pub mod player;
pub mod server;
pub mod snapshot;
pub mod world;

pub use server::{WorldHandle, WorldServer};
pub use world::GameWorld;

use crate::ws::protocol::ClientMsg;
use uuid::Uuid;

/// Player intent received from the WebSocket boundary
#[derive(Debug, Clone)]
pub struct PlayerIntent {
    pub user_id: Uuid,
    pub msg: ClientMsg,
    pub received_at: u64,
}

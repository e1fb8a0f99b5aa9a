//! World-connection contract and shared world types.
//!
//! The controller never talks to the game directly. Everything goes through
//! the [`World`] trait; `agent` provides the production implementation that
//! forwards requests to a world-agent sidecar.

pub mod agent;

use crate::error::WorldError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::SystemTime;

pub use agent::{connect_agent, AgentConnection, AgentWorld};

/// Entity position snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl WorldPosition {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Block containing this position.
    pub fn block(self) -> BlockPos {
        BlockPos {
            x: self.x.floor() as i64,
            y: self.y.floor() as i64,
            z: self.z.floor() as i64,
        }
    }
}

/// Whole-block coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl BlockPos {
    pub fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// One inbound chat line.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatEvent {
    /// Player name, empty for server/system lines.
    pub sender: String,
    pub text: String,
    pub timestamp: SystemTime,
}

impl ChatEvent {
    pub fn new(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            text: text.into(),
            timestamp: SystemTime::now(),
        }
    }
}

/// Events fanned out through the event bridge.
#[derive(Debug, Clone, PartialEq)]
pub enum WorldEvent {
    Chat(ChatEvent),
    Position(WorldPosition),
}

/// One inventory stack.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InventoryItem {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub count: u32,
}

impl InventoryItem {
    /// Name shown to the operator.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// Capability surface of the world connection.
#[async_trait]
pub trait World: Send + Sync {
    /// Identity of the controlled account.
    fn username(&self) -> String;

    /// Send one chat line or slash command. Fire-and-forget on the world side.
    async fn chat(&self, text: &str) -> Result<(), WorldError>;

    /// Current entity position.
    async fn position(&self) -> Result<WorldPosition, WorldError>;

    /// Set a navigation goal without waiting for arrival.
    async fn set_goal(&self, target: BlockPos) -> Result<(), WorldError>;

    /// Navigate to `target` and wait until arrival or failure.
    async fn goto(&self, target: BlockPos) -> Result<(), WorldError>;

    /// Up to `count` positions of `block` within `max_distance`, nearest first.
    async fn find_blocks(
        &self,
        block: &str,
        max_distance: u32,
        count: usize,
    ) -> Result<Vec<BlockPos>, WorldError>;

    /// Equip the best tool for the block at `target`.
    async fn equip_for_block(&self, target: BlockPos) -> Result<(), WorldError>;

    /// Dig the block at `target`.
    async fn dig(&self, target: BlockPos) -> Result<(), WorldError>;

    async fn inventory(&self) -> Result<Vec<InventoryItem>, WorldError>;

    /// Close the connection. Idempotent.
    async fn disconnect(&self);
}

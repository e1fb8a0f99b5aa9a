//! Walk a fixed distance along one horizontal axis.

use super::{TaskContext, TaskKind, TaskReport};
use crate::error::InputError;
use crate::world::{BlockPos, WorldPosition};
use std::fmt;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
}

impl Direction {
    /// Accepts the menu number (1-4) or the direction name.
    pub fn parse(raw: &str) -> Result<Self, InputError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "forward" => Ok(Self::Forward),
            "2" | "backward" => Ok(Self::Backward),
            "3" | "left" => Ok(Self::Left),
            "4" | "right" => Ok(Self::Right),
            other => Err(InputError::InvalidDirection(other.to_string())),
        }
    }

    /// Unit step on the (x, z) plane.
    pub fn vector(self) -> (f64, f64) {
        match self {
            Self::Forward => (0.0, 1.0),
            Self::Backward => (0.0, -1.0),
            Self::Left => (-1.0, 0.0),
            Self::Right => (1.0, 0.0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
            Self::Left => "left",
            Self::Right => "right",
        };
        f.write_str(label)
    }
}

/// Block reached by moving `distance` blocks from `from` in `direction`.
pub fn walk_target(from: WorldPosition, direction: Direction, distance: u32) -> BlockPos {
    let (dx, dz) = direction.vector();
    let distance = f64::from(distance);
    WorldPosition::new(from.x + dx * distance, from.y, from.z + dz * distance).block()
}

pub(super) async fn run(ctx: TaskContext, direction: Direction, distance: u32) -> TaskReport {
    let failed = |message: String| TaskReport::Failed {
        kind: TaskKind::Walking,
        message,
    };

    let from = match ctx.world.position().await {
        Ok(pos) => pos,
        Err(err) => return failed(err.to_string()),
    };
    let target = walk_target(from, direction, distance);
    if ctx.stop.is_stopped() {
        return failed("stopped before the goal was set".to_string());
    }
    if let Err(err) = ctx.world.set_goal(target).await {
        return failed(err.to_string());
    }
    info!(%direction, distance, %target, "walk goal set");
    TaskReport::Walking { distance, target }
}

//! Background automation routines.
//!
//! Each routine is a plain async function that owns its counters and its
//! event subscription for its whole lifetime. The supervisor spawns exactly one
//! of them at a time and talks to it only through the stop signal and the
//! returned [`TaskReport`].

mod chat_view;
mod farming;
mod mining;
mod spamming;
mod stop;
mod walking;

use crate::bridge::Subscription;
use crate::config::AutomationConfig;
use crate::ui::RenderSink;
use crate::world::{BlockPos, World};
use std::fmt;
use std::sync::Arc;

pub use chat_view::{classify_chat, is_private_message, ChatClass};
pub use farming::parse_collected;
pub use stop::{stop_pair, StopHandle, StopSignal};
pub use walking::{walk_target, Direction};

/// Kind tag for a background task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Farming,
    Mining,
    Walking,
    Spamming,
    ChatView,
}

impl TaskKind {
    /// Tasks that finish as soon as their single request is issued.
    pub fn is_instant(self) -> bool {
        matches!(self, Self::Walking)
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Farming => "farming",
            Self::Mining => "mining",
            Self::Walking => "walking",
            Self::Spamming => "spamming",
            Self::ChatView => "live chat view",
        };
        f.write_str(label)
    }
}

/// Request to start one task, with its kind-specific parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskSpec {
    Farming,
    Mining { block: String, amount: u32 },
    Walking { direction: Direction, distance: u32 },
    Spamming,
    ChatView,
}

impl TaskSpec {
    pub fn kind(&self) -> TaskKind {
        match self {
            Self::Farming => TaskKind::Farming,
            Self::Mining { .. } => TaskKind::Mining,
            Self::Walking { .. } => TaskKind::Walking,
            Self::Spamming => TaskKind::Spamming,
            Self::ChatView => TaskKind::ChatView,
        }
    }

    /// Whether the task consumes world events.
    pub fn needs_events(&self) -> bool {
        matches!(self, Self::Farming | Self::ChatView)
    }
}

/// Final outcome of a task, shown to the operator once it is torn down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskReport {
    Farmed {
        shards: u64,
    },
    Mined {
        block: String,
        mined: u32,
        requested: u32,
        /// Candidates attempted, successful or not.
        consumed: usize,
        failed: usize,
        stopped: bool,
    },
    NoCandidates {
        block: String,
    },
    Walking {
        distance: u32,
        target: BlockPos,
    },
    Spammed {
        command: String,
        sends: u64,
    },
    ChatClosed,
    Failed {
        kind: TaskKind,
        message: String,
    },
}

impl fmt::Display for TaskReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Farmed { shards } => {
                write!(f, "Stopped farming. Total shards collected: {shards}")
            }
            Self::Mined {
                block,
                mined,
                stopped: false,
                ..
            } => write!(f, "Finished mining {mined} {block}."),
            Self::Mined {
                block,
                mined,
                requested,
                stopped: true,
                ..
            } => write!(f, "Stopped mining after {mined}/{requested} {block}."),
            Self::NoCandidates { block } => write!(f, "No '{block}' blocks found nearby."),
            Self::Walking { distance, target } => {
                write!(f, "Walking {distance} blocks to {target}...")
            }
            Self::Spammed { command, .. } => write!(f, "Stopped spamming {command}."),
            Self::ChatClosed => write!(f, "Closed live chat view."),
            Self::Failed { kind, message } => write!(f, "{kind} failed: {message}"),
        }
    }
}

/// Everything a running task may touch besides its own state.
pub struct TaskContext {
    pub world: Arc<dyn World>,
    pub renderer: Arc<dyn RenderSink>,
    pub settings: AutomationConfig,
    pub stop: StopSignal,
}

/// Run one task to completion.
///
/// `events` must be present exactly when [`TaskSpec::needs_events`] is true.
/// It is dropped when this future completes, which releases the bridge slot.
pub async fn run_task(
    spec: TaskSpec,
    ctx: TaskContext,
    events: Option<Subscription>,
) -> TaskReport {
    let kind = spec.kind();
    match (spec, events) {
        (TaskSpec::Farming, Some(events)) => farming::run(ctx, events).await,
        (TaskSpec::ChatView, Some(events)) => chat_view::run(ctx, events).await,
        (TaskSpec::Mining { block, amount }, None) => mining::run(ctx, block, amount).await,
        (
            TaskSpec::Walking {
                direction,
                distance,
            },
            None,
        ) => walking::run(ctx, direction, distance).await,
        (TaskSpec::Spamming, None) => spamming::run(ctx).await,
        (_, events) => TaskReport::Failed {
            kind,
            message: if events.is_some() {
                "unexpected event subscription".to_string()
            } else {
                "missing event subscription".to_string()
            },
        },
    }
}

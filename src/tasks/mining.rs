//! Mine a number of blocks of one type near the bot.

use super::{StopSignal, TaskContext, TaskKind, TaskReport};
use crate::error::WorldError;
use crate::world::{BlockPos, World};
use std::future::Future;
use tracing::{debug, info, warn};

enum StepOutcome {
    Mined,
    Stopped,
}

/// Await one world step unless a stop arrives first. `Ok(false)` means stopped.
///
/// The request is abandoned on stop; the world may still finish it.
async fn unless_stopped(
    stop: &mut StopSignal,
    step: impl Future<Output = Result<(), WorldError>>,
) -> Result<bool, WorldError> {
    tokio::select! {
        biased;
        _ = stop.stopped() => Ok(false),
        result = step => result.map(|()| true),
    }
}

/// Walk to `pos`, equip the right tool and dig.
async fn mine_one(
    world: &dyn World,
    stop: &mut StopSignal,
    pos: BlockPos,
) -> Result<StepOutcome, WorldError> {
    if !unless_stopped(stop, world.goto(pos)).await? {
        return Ok(StepOutcome::Stopped);
    }
    if !unless_stopped(stop, world.equip_for_block(pos)).await? {
        return Ok(StepOutcome::Stopped);
    }
    if !unless_stopped(stop, world.dig(pos)).await? {
        return Ok(StepOutcome::Stopped);
    }
    Ok(StepOutcome::Mined)
}

pub(super) async fn run(ctx: TaskContext, block: String, amount: u32) -> TaskReport {
    let TaskContext {
        world,
        renderer,
        settings,
        mut stop,
    } = ctx;

    let wanted = (amount as usize).saturating_mul(2);
    renderer.activity(&format!(
        "Searching for {block} within {} blocks...",
        settings.mine_search_radius
    ));
    let candidates = match world
        .find_blocks(&block, settings.mine_search_radius, wanted)
        .await
    {
        Ok(candidates) => candidates,
        Err(err) => {
            return TaskReport::Failed {
                kind: TaskKind::Mining,
                message: err.to_string(),
            }
        }
    };
    if candidates.is_empty() {
        return TaskReport::NoCandidates { block };
    }
    info!(block = %block, amount, candidates = candidates.len(), "mining started");

    let mut mined: u32 = 0;
    let mut consumed = 0usize;
    let mut failed = 0usize;
    let mut stopped = false;

    for pos in candidates {
        if mined >= amount {
            break;
        }
        if stop.is_stopped() {
            stopped = true;
            break;
        }
        consumed += 1;
        match mine_one(world.as_ref(), &mut stop, pos).await {
            Ok(StepOutcome::Mined) => {
                mined += 1;
                debug!(%pos, mined, "block mined");
                renderer.progress(&format!("Mined {mined}/{amount} {block}"));
            }
            Ok(StepOutcome::Stopped) => {
                stopped = true;
                break;
            }
            Err(err) if err.is_fatal() => {
                return TaskReport::Failed {
                    kind: TaskKind::Mining,
                    message: err.to_string(),
                };
            }
            Err(err) => {
                failed += 1;
                warn!(%pos, error = %err, "skipping mining candidate");
                renderer.warn(&format!("Failed to mine {block} at {pos}: {err}"));
            }
        }
    }

    TaskReport::Mined {
        block,
        mined,
        requested: amount,
        consumed,
        failed,
        stopped,
    }
}

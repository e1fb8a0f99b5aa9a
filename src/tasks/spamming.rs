//! Repeat one chat command in bursts: a send every interval for the burst
//! window, then a pause, until stopped.

use super::{TaskContext, TaskKind, TaskReport};
use tokio::time::Instant;
use tracing::{debug, info, warn};

pub(super) async fn run(ctx: TaskContext) -> TaskReport {
    let TaskContext {
        world,
        renderer,
        settings,
        mut stop,
    } = ctx;

    let command = settings.spam_command.clone();
    let interval = settings.spam_interval();
    let per_burst = (settings.spam_burst_ms / settings.spam_interval_ms.max(1)).max(1);
    let cycle_len = settings.spam_burst() + settings.spam_pause();

    info!(command = %command, per_burst, "spamming started");
    renderer.activity(&format!(
        "Spamming {command} every {}ms for {}ms, then waiting {}ms.",
        settings.spam_interval_ms, settings.spam_burst_ms, settings.spam_pause_ms
    ));

    let mut sends: u64 = 0;
    let mut cycle_start = Instant::now();
    'cycles: loop {
        let mut deadline = cycle_start;
        for _ in 0..per_burst {
            deadline += interval;
            if !stop.sleep_until(deadline).await {
                break 'cycles;
            }
            match world.chat(&command).await {
                Ok(()) => {
                    sends += 1;
                    debug!(sends, "spam command sent");
                    renderer.progress(&format!("Sent {command} x{sends}"));
                }
                Err(err) if err.is_fatal() => {
                    return TaskReport::Failed {
                        kind: TaskKind::Spamming,
                        message: err.to_string(),
                    };
                }
                Err(err) => warn!(error = %err, "spam command rejected"),
            }
        }
        cycle_start += cycle_len;
        if !stop.sleep_until(cycle_start).await {
            break;
        }
    }

    TaskReport::Spammed { command, sends }
}

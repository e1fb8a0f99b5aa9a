//! Shard farming: warp, start the farm, then tally "you collected N shards"
//! chat lines until stopped.

use super::{TaskContext, TaskKind, TaskReport};
use crate::bridge::Subscription;
use crate::world::WorldEvent;
use regex::Regex;
use std::sync::OnceLock;
use tokio::time::{interval, sleep_until, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

fn collected_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)you collected (\d+) shards?").expect("shard pattern is valid")
    })
}

/// Extract the shard count from a server chat line, if it reports one.
pub fn parse_collected(text: &str) -> Option<u64> {
    collected_pattern()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|count| count.as_str().parse().ok())
}

pub(super) async fn run(ctx: TaskContext, mut events: Subscription) -> TaskReport {
    let TaskContext {
        world,
        renderer,
        settings,
        mut stop,
    } = ctx;

    if stop.is_stopped() {
        return TaskReport::Farmed { shards: 0 };
    }
    if let Err(err) = world.chat(&settings.farm_warp_command).await {
        return TaskReport::Failed {
            kind: TaskKind::Farming,
            message: err.to_string(),
        };
    }
    renderer.activity(&format!(
        "Warped with {}. Starting farm in {}s...",
        settings.farm_warp_command,
        settings.farm_start_delay().as_secs_f64()
    ));

    let mut start_at = Some(Instant::now() + settings.farm_start_delay());
    let mut ticker = interval(settings.poll_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut total: u64 = 0;

    loop {
        tokio::select! {
            biased;
            _ = stop.stopped() => break,
            _ = sleep_until(start_at.unwrap_or_else(Instant::now)), if start_at.is_some() => {
                start_at = None;
                if stop.is_stopped() {
                    break;
                }
                match world.chat(&settings.farm_start_command).await {
                    Ok(()) => {
                        info!(command = %settings.farm_start_command, "farm started");
                        renderer.activity("Farm started. Collecting shards...");
                    }
                    Err(err) if err.is_fatal() => {
                        return TaskReport::Failed {
                            kind: TaskKind::Farming,
                            message: err.to_string(),
                        };
                    }
                    Err(err) => {
                        warn!(error = %err, "farm start command rejected");
                        renderer.warn(&format!("Could not start farm: {err}"));
                    }
                }
            }
            event = events.recv() => match event {
                Some(WorldEvent::Chat(chat)) => {
                    if let Some(count) = parse_collected(&chat.text) {
                        if stop.is_stopped() {
                            break;
                        }
                        total = total.saturating_add(count);
                        debug!(count, total, "shards collected");
                        renderer.progress(&format!("Total shards collected: {total}"));
                    }
                }
                Some(_) => {}
                None => break,
            },
            _ = ticker.tick() => {
                if stop.is_stopped() {
                    break;
                }
            }
        }
    }

    TaskReport::Farmed { shards: total }
}

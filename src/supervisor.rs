//! Background task lifecycle: at most one automation runs at a time.
//!
//! The supervisor owns the only [`StopHandle`] and [`JoinHandle`] for the
//! active task. A second start while one is running is rejected; the operator
//! must stop the current task first. Event-driven tasks get their bridge
//! subscription before they are spawned, so a failed subscribe leaves the
//! supervisor idle with nothing to clean up.

use crate::bridge::EventBridge;
use crate::config::AutomationConfig;
use crate::error::StartError;
use crate::tasks::{run_task, stop_pair, StopHandle, TaskContext, TaskKind, TaskReport, TaskSpec};
use crate::ui::RenderSink;
use crate::world::World;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, warn};

/// Bookkeeping for the running task.
struct ActiveTask {
    kind: TaskKind,
    started_at: Instant,
    stop: StopHandle,
    join: JoinHandle<TaskReport>,
}

enum SessionState {
    Idle,
    Running(ActiveTask),
}

pub struct Supervisor {
    world: Arc<dyn World>,
    bridge: EventBridge,
    renderer: Arc<dyn RenderSink>,
    settings: AutomationConfig,
    state: SessionState,
}

impl Supervisor {
    pub fn new(
        world: Arc<dyn World>,
        bridge: EventBridge,
        renderer: Arc<dyn RenderSink>,
        settings: AutomationConfig,
    ) -> Self {
        Self {
            world,
            bridge,
            renderer,
            settings,
            state: SessionState::Idle,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, SessionState::Running(_))
    }

    /// Kind of the attached task, if any.
    pub fn active_kind(&self) -> Option<TaskKind> {
        match &self.state {
            SessionState::Running(active) => Some(active.kind),
            SessionState::Idle => None,
        }
    }

    /// Spawn the task described by `spec`.
    pub fn start(&mut self, spec: TaskSpec) -> Result<TaskKind, StartError> {
        if let SessionState::Running(active) = &self.state {
            return Err(StartError::AlreadyRunning(active.kind));
        }
        let kind = spec.kind();
        let events = if spec.needs_events() {
            Some(self.bridge.subscribe()?)
        } else {
            None
        };

        let (stop, signal) = stop_pair();
        let ctx = TaskContext {
            world: self.world.clone(),
            renderer: self.renderer.clone(),
            settings: self.settings.clone(),
            stop: signal,
        };
        let join = tokio::spawn(run_task(spec, ctx, events));
        info!(%kind, "task started");
        self.state = SessionState::Running(ActiveTask {
            kind,
            started_at: Instant::now(),
            stop,
            join,
        });
        Ok(kind)
    }

    /// Request the active task to stop. Does not wait.
    ///
    /// Returns `true` only for the request that actually set the signal.
    pub fn stop(&self) -> bool {
        let SessionState::Running(active) = &self.state else {
            return false;
        };
        let first = active.stop.stop();
        if first {
            info!(kind = %active.kind, "stop requested");
        }
        first
    }

    /// Wait for the active task to finish and return to idle.
    ///
    /// Cancel-safe: dropping the future before completion leaves the task
    /// attached.
    pub async fn finished(&mut self) -> Option<TaskReport> {
        let SessionState::Running(active) = &mut self.state else {
            return None;
        };
        let result = (&mut active.join).await;
        let kind = active.kind;
        let elapsed = active.started_at.elapsed();
        self.state = SessionState::Idle;
        let report = report_from_join(kind, result);
        debug!(%kind, elapsed_ms = elapsed.as_millis() as u64, "task finished");
        Some(report)
    }

    /// Collect the report of a task that already ended on its own.
    pub async fn reap(&mut self) -> Option<TaskReport> {
        match &self.state {
            SessionState::Running(active) if active.join.is_finished() => self.finished().await,
            _ => None,
        }
    }

    /// Stop and await whatever is running.
    pub async fn shutdown(&mut self) -> Option<TaskReport> {
        self.stop();
        self.finished().await
    }
}

fn report_from_join(kind: TaskKind, result: Result<TaskReport, JoinError>) -> TaskReport {
    match result {
        Ok(report) => report,
        Err(err) => {
            warn!(%kind, error = %err, "task did not complete cleanly");
            let message = if err.is_panic() {
                "task panicked".to_string()
            } else {
                "task was cancelled".to_string()
            };
            TaskReport::Failed { kind, message }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::Direction;
    use crate::testsupport::{FakeWorld, RecordingSink};
    use crate::world::{BlockPos, ChatEvent, WorldEvent, WorldPosition};
    use std::time::Duration;

    fn supervisor(world: &Arc<FakeWorld>) -> (Supervisor, EventBridge) {
        let bridge = EventBridge::new();
        let sup = Supervisor::new(
            world.clone(),
            bridge.clone(),
            Arc::new(RecordingSink::new()),
            AutomationConfig::default(),
        );
        (sup, bridge)
    }

    #[tokio::test]
    async fn stop_when_idle_is_a_no_op() {
        let world = Arc::new(FakeWorld::new("bot"));
        let (mut sup, _bridge) = supervisor(&world);
        assert!(!sup.stop());
        assert!(sup.finished().await.is_none());
        assert!(sup.reap().await.is_none());
        assert!(!sup.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn second_start_is_rejected() {
        let world = Arc::new(FakeWorld::new("bot"));
        let (mut sup, bridge) = supervisor(&world);
        assert_eq!(sup.start(TaskSpec::Spamming).unwrap(), TaskKind::Spamming);

        let err = sup.start(TaskSpec::ChatView).unwrap_err();
        assert!(matches!(err, StartError::AlreadyRunning(TaskKind::Spamming)));
        assert!(!bridge.has_subscriber());
        assert_eq!(sup.active_kind(), Some(TaskKind::Spamming));

        assert!(sup.stop());
        assert!(!sup.stop());
        assert!(matches!(
            sup.finished().await,
            Some(TaskReport::Spammed { .. })
        ));
        assert!(!sup.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn no_side_effects_after_stop() {
        let world = Arc::new(FakeWorld::new("bot"));
        let (mut sup, _bridge) = supervisor(&world);
        sup.start(TaskSpec::Spamming).unwrap();
        tokio::time::sleep(Duration::from_millis(1700)).await;
        sup.stop();
        let report = sup.finished().await.expect("report");
        let sent = world.chats().len();
        assert!(matches!(report, TaskReport::Spammed { sends, .. } if sends as usize == sent));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(world.chats().len(), sent);
    }

    #[tokio::test(start_paused = true)]
    async fn handoff_moves_bridge_to_new_task() {
        let world = Arc::new(FakeWorld::new("bot"));
        let (mut sup, bridge) = supervisor(&world);

        sup.start(TaskSpec::ChatView).unwrap();
        assert!(bridge.has_subscriber());
        sup.stop();
        assert_eq!(sup.finished().await, Some(TaskReport::ChatClosed));
        assert!(!bridge.has_subscriber());

        sup.start(TaskSpec::Farming).unwrap();
        tokio::time::sleep(Duration::from_millis(2100)).await;
        assert!(bridge.publish(WorldEvent::Chat(ChatEvent::new(
            "",
            "You collected 4 shards"
        ))));
        tokio::time::sleep(Duration::from_millis(10)).await;
        sup.stop();
        assert_eq!(
            sup.finished().await,
            Some(TaskReport::Farmed { shards: 4 })
        );
    }

    #[tokio::test]
    async fn busy_bridge_refuses_start() {
        let world = Arc::new(FakeWorld::new("bot"));
        let (mut sup, bridge) = supervisor(&world);
        let _held = bridge.subscribe().unwrap();

        let err = sup.start(TaskSpec::ChatView).unwrap_err();
        assert!(matches!(err, StartError::BridgeBusy));
        assert!(!sup.is_running());
    }

    #[tokio::test]
    async fn self_completing_task_is_reaped() {
        let world = Arc::new(
            FakeWorld::new("bot").with_position(WorldPosition::new(10.0, 64.0, 20.0)),
        );
        let (mut sup, _bridge) = supervisor(&world);
        sup.start(TaskSpec::Walking {
            direction: Direction::Right,
            distance: 5,
        })
        .unwrap();

        let report = sup.finished().await;
        assert_eq!(
            report,
            Some(TaskReport::Walking {
                distance: 5,
                target: BlockPos::new(15, 64, 20)
            })
        );
        assert!(sup.reap().await.is_none());
    }

    #[tokio::test]
    async fn panicking_task_becomes_failed_report() {
        let join = tokio::spawn(async { panic!("boom") });
        let err = join.await.unwrap_err();
        let report = report_from_join(TaskKind::Mining, Err(err));
        assert_eq!(
            report,
            TaskReport::Failed {
                kind: TaskKind::Mining,
                message: "task panicked".into()
            }
        );
    }
}

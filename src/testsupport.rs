//! Shared test fixtures: scripted world, recording renderer, canned API.

use crate::api::RemoteApi;
use crate::config::AutomationConfig;
use crate::error::{ApiError, WorldError};
use crate::tasks::{stop_pair, StopHandle, TaskContext};
use crate::ui::RenderSink;
use crate::world::{BlockPos, InventoryItem, World, WorldPosition};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

static TEST_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temporary directory fixture with best-effort cleanup.
#[derive(Debug)]
pub struct TestTempDir {
    path: PathBuf,
}

impl TestTempDir {
    /// Create a unique temporary directory with a readable prefix.
    pub fn new(prefix: &str) -> Self {
        let suffix = TEST_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let dir = std::env::temp_dir().join(format!("donutbot-{prefix}-{millis}-{suffix}"));
        fs::create_dir_all(&dir).expect("failed to create temporary fixture directory");
        Self { path: dir }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build a child path under the fixture root.
    pub fn child(&self, relative: &str) -> PathBuf {
        self.path.join(relative)
    }
}

impl Drop for TestTempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// One call made against [`FakeWorld`].
#[derive(Debug, Clone, PartialEq)]
pub enum WorldCall {
    Chat(String),
    Position,
    SetGoal(BlockPos),
    Goto(BlockPos),
    FindBlocks {
        block: String,
        max_distance: u32,
        count: usize,
    },
    Equip(BlockPos),
    Dig(BlockPos),
    Inventory,
    Disconnect,
}

/// Scripted in-memory world.
pub struct FakeWorld {
    username: String,
    position: Mutex<WorldPosition>,
    candidates: Mutex<Vec<BlockPos>>,
    failing_gotos: Mutex<HashSet<BlockPos>>,
    failing_digs: Mutex<HashSet<BlockPos>>,
    inventory: Mutex<Vec<InventoryItem>>,
    goto_delay: Mutex<Duration>,
    calls: Mutex<Vec<WorldCall>>,
    chat_times: Mutex<Vec<tokio::time::Instant>>,
}

impl FakeWorld {
    pub fn new(username: &str) -> Self {
        Self {
            username: username.to_string(),
            position: Mutex::new(WorldPosition::new(0.0, 64.0, 0.0)),
            candidates: Mutex::new(Vec::new()),
            failing_gotos: Mutex::new(HashSet::new()),
            failing_digs: Mutex::new(HashSet::new()),
            inventory: Mutex::new(Vec::new()),
            goto_delay: Mutex::new(Duration::ZERO),
            calls: Mutex::new(Vec::new()),
            chat_times: Mutex::new(Vec::new()),
        }
    }

    pub fn with_position(self, position: WorldPosition) -> Self {
        *self.position.lock().unwrap() = position;
        self
    }

    pub fn with_candidates(self, candidates: Vec<BlockPos>) -> Self {
        *self.candidates.lock().unwrap() = candidates;
        self
    }

    pub fn with_inventory(self, items: Vec<InventoryItem>) -> Self {
        *self.inventory.lock().unwrap() = items;
        self
    }

    /// Every `goto` takes this long (on the tokio clock).
    pub fn with_goto_delay(self, delay: Duration) -> Self {
        *self.goto_delay.lock().unwrap() = delay;
        self
    }

    pub fn fail_goto(self, pos: BlockPos) -> Self {
        self.failing_gotos.lock().unwrap().insert(pos);
        self
    }

    pub fn fail_dig(self, pos: BlockPos) -> Self {
        self.failing_digs.lock().unwrap().insert(pos);
        self
    }

    pub fn calls(&self) -> Vec<WorldCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn chats(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                WorldCall::Chat(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn chat_times(&self) -> Vec<tokio::time::Instant> {
        self.chat_times.lock().unwrap().clone()
    }

    fn record(&self, call: WorldCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl World for FakeWorld {
    fn username(&self) -> String {
        self.username.clone()
    }

    async fn chat(&self, text: &str) -> Result<(), WorldError> {
        self.chat_times
            .lock()
            .unwrap()
            .push(tokio::time::Instant::now());
        self.record(WorldCall::Chat(text.to_string()));
        Ok(())
    }

    async fn position(&self) -> Result<WorldPosition, WorldError> {
        self.record(WorldCall::Position);
        Ok(*self.position.lock().unwrap())
    }

    async fn set_goal(&self, target: BlockPos) -> Result<(), WorldError> {
        self.record(WorldCall::SetGoal(target));
        Ok(())
    }

    async fn goto(&self, target: BlockPos) -> Result<(), WorldError> {
        self.record(WorldCall::Goto(target));
        let delay = *self.goto_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.failing_gotos.lock().unwrap().contains(&target) {
            return Err(WorldError::Rejected("no path".into()));
        }
        Ok(())
    }

    async fn find_blocks(
        &self,
        block: &str,
        max_distance: u32,
        count: usize,
    ) -> Result<Vec<BlockPos>, WorldError> {
        self.record(WorldCall::FindBlocks {
            block: block.to_string(),
            max_distance,
            count,
        });
        let mut found = self.candidates.lock().unwrap().clone();
        found.truncate(count);
        Ok(found)
    }

    async fn equip_for_block(&self, target: BlockPos) -> Result<(), WorldError> {
        self.record(WorldCall::Equip(target));
        Ok(())
    }

    async fn dig(&self, target: BlockPos) -> Result<(), WorldError> {
        self.record(WorldCall::Dig(target));
        if self.failing_digs.lock().unwrap().contains(&target) {
            return Err(WorldError::Rejected("block is not diggable".into()));
        }
        Ok(())
    }

    async fn inventory(&self) -> Result<Vec<InventoryItem>, WorldError> {
        self.record(WorldCall::Inventory);
        Ok(self.inventory.lock().unwrap().clone())
    }

    async fn disconnect(&self) {
        self.record(WorldCall::Disconnect);
    }
}

/// Renderer that records every call as a tagged string.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    /// True if any recorded event contains `needle`.
    pub fn saw(&self, needle: &str) -> bool {
        self.events().iter().any(|event| event.contains(needle))
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl RenderSink for RecordingSink {
    fn clear(&self) {
        self.push("clear".into());
    }

    fn menu(&self, title: &str, entries: &[&str]) {
        self.push(format!("menu:{title}:{}", entries.len()));
    }

    fn prompt(&self, label: &str) {
        self.push(format!("prompt:{label}"));
    }

    fn line(&self, text: &str) {
        self.push(format!("line:{text}"));
    }

    fn section(&self, title: &str) {
        self.push(format!("section:{title}"));
    }

    fn field(&self, key: &str, value: &str) {
        self.push(format!("field:{key}={value}"));
    }

    fn activity(&self, text: &str) {
        self.push(format!("activity:{text}"));
    }

    fn progress(&self, text: &str) {
        self.push(format!("progress:{text}"));
    }

    fn warn(&self, msg: &str) {
        self.push(format!("warn:{msg}"));
    }

    fn error(&self, msg: &str) {
        self.push(format!("error:{msg}"));
    }

    fn chat_public(&self, sender: &str, text: &str) {
        self.push(format!("chat:[{sender}]: {text}"));
    }

    fn chat_private(&self, text: &str) {
        self.push(format!("private:{text}"));
    }
}

/// Remote API stub answering from a fixed path → response table.
#[derive(Default)]
pub struct StaticApi {
    responses: BTreeMap<String, Result<Value, (u16, String)>>,
    requested: Mutex<Vec<String>>,
}

impl StaticApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, body: Value) -> Self {
        self.responses.insert(path.to_string(), Ok(body));
        self
    }

    pub fn with_status(mut self, path: &str, status: u16, message: &str) -> Self {
        self.responses
            .insert(path.to_string(), Err((status, message.to_string())));
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteApi for StaticApi {
    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.requested.lock().unwrap().push(path.to_string());
        match self.responses.get(path) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err((status, message))) => Err(ApiError::Status(*status, message.clone())),
            None => Err(ApiError::Status(404, "Not Found".to_string())),
        }
    }
}

/// Build a task context over the fixtures, with default automation timings.
pub fn task_context(
    world: &Arc<FakeWorld>,
    sink: &Arc<RecordingSink>,
) -> (StopHandle, TaskContext) {
    let (handle, stop) = stop_pair();
    let ctx = TaskContext {
        world: world.clone(),
        renderer: sink.clone(),
        settings: AutomationConfig::default(),
        stop,
    };
    (handle, ctx)
}

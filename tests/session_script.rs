//! End-to-end menu scripts against an in-memory world.
//!
//! The operator's keystrokes go through a duplex pipe so a test can wait for
//! output before typing the next line, the way a person at the prompt would.

use async_trait::async_trait;
use donutbot::api::RemoteApi;
use donutbot::bridge::EventBridge;
use donutbot::config::Config;
use donutbot::error::{ApiError, WorldError};
use donutbot::session::Session;
use donutbot::ui::RenderSink;
use donutbot::world::{BlockPos, InventoryItem, World, WorldPosition};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncWriteExt, BufReader, DuplexStream};

#[derive(Default)]
struct Recorder {
    lines: Mutex<Vec<String>>,
}

impl Recorder {
    fn push(&self, text: String) {
        self.lines.lock().unwrap().push(text);
    }

    fn saw(&self, needle: &str) -> bool {
        self.lines.lock().unwrap().iter().any(|l| l.contains(needle))
    }
}

impl RenderSink for Recorder {
    fn clear(&self) {}
    fn menu(&self, title: &str, _entries: &[&str]) {
        self.push(format!("menu {title}"));
    }
    fn prompt(&self, label: &str) {
        self.push(format!("prompt {label}"));
    }
    fn line(&self, text: &str) {
        self.push(text.to_string());
    }
    fn section(&self, title: &str) {
        self.push(title.to_string());
    }
    fn field(&self, key: &str, value: &str) {
        self.push(format!("{key}: {value}"));
    }
    fn activity(&self, text: &str) {
        self.push(text.to_string());
    }
    fn progress(&self, text: &str) {
        self.push(text.to_string());
    }
    fn warn(&self, msg: &str) {
        self.push(format!("warn {msg}"));
    }
    fn error(&self, msg: &str) {
        self.push(format!("error {msg}"));
    }
    fn chat_public(&self, sender: &str, text: &str) {
        self.push(format!("[{sender}] {text}"));
    }
    fn chat_private(&self, text: &str) {
        self.push(format!("private {text}"));
    }
}

/// A quarry of stone along the x axis; every walk takes `step`.
struct Quarry {
    step: Duration,
    chats: Mutex<Vec<String>>,
    dug: Mutex<Vec<BlockPos>>,
}

impl Quarry {
    fn new(step: Duration) -> Self {
        Self {
            step,
            chats: Mutex::new(Vec::new()),
            dug: Mutex::new(Vec::new()),
        }
    }

    fn dug(&self) -> Vec<BlockPos> {
        self.dug.lock().unwrap().clone()
    }
}

#[async_trait]
impl World for Quarry {
    fn username(&self) -> String {
        "DonutBot".into()
    }

    async fn chat(&self, text: &str) -> Result<(), WorldError> {
        self.chats.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn position(&self) -> Result<WorldPosition, WorldError> {
        Ok(WorldPosition::new(0.5, 64.0, 0.5))
    }

    async fn set_goal(&self, _target: BlockPos) -> Result<(), WorldError> {
        Ok(())
    }

    async fn goto(&self, _target: BlockPos) -> Result<(), WorldError> {
        tokio::time::sleep(self.step).await;
        Ok(())
    }

    async fn find_blocks(
        &self,
        block: &str,
        _max_distance: u32,
        count: usize,
    ) -> Result<Vec<BlockPos>, WorldError> {
        if block != "stone" {
            return Ok(Vec::new());
        }
        Ok((1..=count as i64).map(|x| BlockPos::new(x, 63, 0)).collect())
    }

    async fn equip_for_block(&self, _target: BlockPos) -> Result<(), WorldError> {
        Ok(())
    }

    async fn dig(&self, target: BlockPos) -> Result<(), WorldError> {
        self.dug.lock().unwrap().push(target);
        Ok(())
    }

    async fn inventory(&self) -> Result<Vec<InventoryItem>, WorldError> {
        Ok(Vec::new())
    }

    async fn disconnect(&self) {}
}

struct OfflineApi;

#[async_trait]
impl RemoteApi for OfflineApi {
    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        match path {
            "stats/DonutBot" => Ok(json!({"result": {"money": "2500000.5"}})),
            _ => Err(ApiError::Status(503, "Service Unavailable".into())),
        }
    }
}

struct Operator {
    keys: DuplexStream,
    screen: Arc<Recorder>,
    session: tokio::task::JoinHandle<Result<(), donutbot::error::AppError>>,
}

impl Operator {
    fn start(world: Arc<Quarry>) -> Self {
        let (keys, input) = tokio::io::duplex(256);
        let screen = Arc::new(Recorder::default());
        let mut session = Session::new(
            BufReader::new(input),
            world,
            Arc::new(OfflineApi),
            screen.clone(),
            EventBridge::new(),
            &Config::default(),
        );
        let session = tokio::spawn(async move { session.run().await });
        Self {
            keys,
            screen,
            session,
        }
    }

    async fn type_line(&mut self, line: &str) {
        self.keys
            .write_all(format!("{line}\n").as_bytes())
            .await
            .unwrap();
    }

    async fn wait_for(&self, needle: &str) {
        for _ in 0..500 {
            if self.screen.saw(needle) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("never saw {needle:?}");
    }

    async fn finish(mut self) {
        self.type_line("15").await;
        self.session.await.unwrap().unwrap();
        assert!(self.screen.saw("Goodbye!"));
    }
}

#[tokio::test(start_paused = true)]
async fn mining_runs_to_completion() {
    let world = Arc::new(Quarry::new(Duration::from_millis(50)));
    let mut op = Operator::start(world.clone());

    op.type_line("22").await;
    op.type_line("stone").await;
    op.type_line("2").await;
    op.wait_for("Finished mining 2 stone.").await;
    assert!(op.screen.saw("Mined 2/2 stone"));
    assert_eq!(world.dug(), vec![BlockPos::new(1, 63, 0), BlockPos::new(2, 63, 0)]);

    op.type_line("").await;
    op.finish().await;
}

#[tokio::test(start_paused = true)]
async fn enter_stops_mining_between_blocks() {
    let world = Arc::new(Quarry::new(Duration::from_secs(1)));
    let mut op = Operator::start(world.clone());

    op.type_line("22").await;
    op.type_line("stone").await;
    op.type_line("3").await;
    op.wait_for("Press Enter to stop mining").await;
    tokio::time::sleep(Duration::from_millis(1500)).await;

    op.type_line("").await;
    op.wait_for("Stopped mining after 1/3 stone.").await;
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(world.dug(), vec![BlockPos::new(1, 63, 0)]);

    op.type_line("").await;
    op.finish().await;
}

#[tokio::test(start_paused = true)]
async fn unknown_block_reports_nothing_found() {
    let world = Arc::new(Quarry::new(Duration::ZERO));
    let mut op = Operator::start(world.clone());

    op.type_line("22").await;
    op.type_line("obsidian").await;
    op.type_line("4").await;
    op.wait_for("No 'obsidian' blocks found nearby.").await;
    assert!(world.dug().is_empty());

    op.type_line("").await;
    op.finish().await;
}

#[tokio::test]
async fn balance_and_api_failure_then_exit() {
    let world = Arc::new(Quarry::new(Duration::ZERO));
    let mut op = Operator::start(world);

    op.type_line("1").await;
    op.wait_for("Balance: $2,500,000.50").await;
    op.type_line("").await;

    op.type_line("2").await;
    op.wait_for("API request error: status 503: Service Unavailable")
        .await;
    op.type_line("").await;

    op.type_line("nope").await;
    op.wait_for("Invalid choice.").await;
    op.type_line("").await;
    op.finish().await;
}

#[tokio::test]
async fn closed_input_ends_the_session() {
    let world = Arc::new(Quarry::new(Duration::ZERO));
    let op = Operator::start(world);
    drop(op.keys);
    op.session.await.unwrap().unwrap();
    assert!(op.screen.saw("Goodbye!"));
}

//! World-agent sidecar client.
//!
//! The sidecar owns the real game session (login, pathfinding, digging). This
//! client speaks newline-delimited JSON with it over TCP:
//!
//! - requests: `{"id": 7, "op": "goto", "x": 1, "y": 64, "z": 3}`
//! - responses: `{"type": "response", "id": 7, "ok": true, "data": ...}`
//! - events: `{"type": "chat", "sender": "...", "text": "..."}`,
//!   `{"type": "position", ...}`, `{"type": "end", "reason": "..."}`,
//!   `{"type": "error", "message": "..."}`
//!
//! Events are published into the [`EventBridge`]; `end`, `error` and EOF are
//! fatal and resolve [`AgentConnection::closed`].

use super::{BlockPos, ChatEvent, InventoryItem, World, WorldEvent, WorldPosition};
use crate::bridge::EventBridge;
use crate::error::WorldError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{oneshot, watch};

/// Outbound request payloads.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Request {
    Hello { host: String },
    Chat { text: String },
    Position,
    SetGoal(BlockPos),
    Goto(BlockPos),
    FindBlocks {
        block: String,
        max_distance: u32,
        count: usize,
    },
    EquipForBlock(BlockPos),
    Dig(BlockPos),
    Inventory,
    Quit,
}

#[derive(Serialize)]
struct Envelope<'a> {
    id: u64,
    #[serde(flatten)]
    request: &'a Request,
}

/// Inbound line shapes.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Inbound {
    Response {
        id: u64,
        ok: bool,
        #[serde(default)]
        data: Value,
        #[serde(default)]
        error: Option<String>,
    },
    Chat {
        #[serde(default)]
        sender: String,
        text: String,
    },
    Position {
        x: f64,
        y: f64,
        z: f64,
    },
    End {
        #[serde(default)]
        reason: Option<String>,
    },
    Error {
        message: String,
    },
}

type Reply = oneshot::Sender<Result<Value, WorldError>>;

#[derive(Default)]
struct PendingRequests {
    closed: Option<String>,
    waiting: HashMap<u64, Reply>,
}

struct Shared {
    pending: Mutex<PendingRequests>,
    next_id: AtomicU64,
}

impl Shared {
    fn pending(&self) -> MutexGuard<'_, PendingRequests> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fail every outstanding request and refuse new ones.
    fn close(&self, reason: &str) {
        let mut pending = self.pending();
        if pending.closed.is_none() {
            pending.closed = Some(reason.to_string());
        }
        for (_, reply) in pending.waiting.drain() {
            let _ = reply.send(Err(WorldError::Disconnected(reason.to_string())));
        }
    }
}

/// [`World`] implementation backed by the sidecar connection.
pub struct AgentWorld {
    shared: Arc<Shared>,
    writer: tokio::sync::Mutex<Option<OwnedWriteHalf>>,
    username: String,
}

/// Live sidecar connection plus its fatal-close notification.
pub struct AgentConnection {
    world: Arc<AgentWorld>,
    closed_rx: watch::Receiver<Option<String>>,
}

impl AgentConnection {
    pub fn world(&self) -> Arc<AgentWorld> {
        Arc::clone(&self.world)
    }

    /// Resolve once the connection is lost, with the reason.
    pub async fn closed(&mut self) -> String {
        match self.closed_rx.wait_for(Option::is_some).await {
            Ok(reason) => reason.clone().unwrap_or_default(),
            Err(_) => "connection reader stopped".to_string(),
        }
    }
}

/// Connect to the sidecar at `agent_addr` and ask it to join `host`.
pub async fn connect_agent(
    agent_addr: &str,
    host: &str,
    bridge: EventBridge,
) -> Result<AgentConnection, WorldError> {
    let stream = TcpStream::connect(agent_addr).await?;
    stream.set_nodelay(true)?;
    let (read_half, write_half) = stream.into_split();

    let shared = Arc::new(Shared {
        pending: Mutex::new(PendingRequests::default()),
        next_id: AtomicU64::new(1),
    });
    let (closed_tx, closed_rx) = watch::channel(None);
    spawn_reader(read_half, Arc::clone(&shared), bridge, closed_tx);

    let mut world = AgentWorld {
        shared,
        writer: tokio::sync::Mutex::new(Some(write_half)),
        username: String::new(),
    };
    let hello = world
        .request(Request::Hello {
            host: host.to_string(),
        })
        .await?;
    world.username = hello
        .get("username")
        .and_then(Value::as_str)
        .ok_or_else(|| WorldError::Protocol("hello response has no username".into()))?
        .to_string();
    tracing::info!(agent = agent_addr, host, username = %world.username, "world agent connected");

    Ok(AgentConnection {
        world: Arc::new(world),
        closed_rx,
    })
}

fn spawn_reader(
    read_half: OwnedReadHalf,
    shared: Arc<Shared>,
    bridge: EventBridge,
    closed_tx: watch::Sender<Option<String>>,
) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(read_half).lines();
        let reason = loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break "world agent closed the connection".to_string(),
                Err(err) => break format!("read failed: {err}"),
            };
            if line.trim().is_empty() {
                continue;
            }
            let inbound = match serde_json::from_str::<Inbound>(&line) {
                Ok(inbound) => inbound,
                Err(err) => {
                    tracing::warn!(%err, "ignoring malformed line from world agent");
                    continue;
                }
            };
            match inbound {
                Inbound::Response {
                    id,
                    ok,
                    data,
                    error,
                } => {
                    let reply = shared.pending().waiting.remove(&id);
                    let Some(reply) = reply else {
                        tracing::warn!(id, "response for unknown request");
                        continue;
                    };
                    let result = if ok {
                        Ok(data)
                    } else {
                        Err(WorldError::Rejected(
                            error.unwrap_or_else(|| "request failed".to_string()),
                        ))
                    };
                    let _ = reply.send(result);
                }
                Inbound::Chat { sender, text } => {
                    bridge.publish(WorldEvent::Chat(ChatEvent::new(sender, text)));
                }
                Inbound::Position { x, y, z } => {
                    bridge.publish(WorldEvent::Position(WorldPosition::new(x, y, z)));
                }
                Inbound::End { reason } => {
                    break reason.unwrap_or_else(|| "disconnected".to_string());
                }
                Inbound::Error { message } => break format!("error: {message}"),
            }
        };
        tracing::warn!(%reason, "world connection lost");
        shared.close(&reason);
        let _ = closed_tx.send(Some(reason));
    });
}

impl AgentWorld {
    async fn request(&self, request: Request) -> Result<Value, WorldError> {
        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);
        let (reply_tx, reply_rx) = oneshot::channel();
        {
            let mut pending = self.shared.pending();
            if let Some(reason) = &pending.closed {
                return Err(WorldError::Disconnected(reason.clone()));
            }
            pending.waiting.insert(id, reply_tx);
        }

        if let Err(err) = self.write(id, &request).await {
            self.shared.pending().waiting.remove(&id);
            return Err(err);
        }
        tracing::debug!(id, ?request, "world request sent");

        reply_rx
            .await
            .map_err(|_| WorldError::Disconnected("reply channel dropped".into()))?
    }

    async fn write(&self, id: u64, request: &Request) -> Result<(), WorldError> {
        let mut line = serde_json::to_vec(&Envelope { id, request })?;
        line.push(b'\n');
        let mut writer = self.writer.lock().await;
        let Some(writer) = writer.as_mut() else {
            return Err(WorldError::Disconnected("connection closed locally".into()));
        };
        writer.write_all(&line).await?;
        Ok(())
    }

    async fn request_unit(&self, request: Request) -> Result<(), WorldError> {
        self.request(request).await.map(|_| ())
    }
}

#[async_trait]
impl World for AgentWorld {
    fn username(&self) -> String {
        self.username.clone()
    }

    async fn chat(&self, text: &str) -> Result<(), WorldError> {
        self.request_unit(Request::Chat {
            text: text.to_string(),
        })
        .await
    }

    async fn position(&self) -> Result<WorldPosition, WorldError> {
        let data = self.request(Request::Position).await?;
        Ok(serde_json::from_value(data)?)
    }

    async fn set_goal(&self, target: BlockPos) -> Result<(), WorldError> {
        self.request_unit(Request::SetGoal(target)).await
    }

    async fn goto(&self, target: BlockPos) -> Result<(), WorldError> {
        self.request_unit(Request::Goto(target)).await
    }

    async fn find_blocks(
        &self,
        block: &str,
        max_distance: u32,
        count: usize,
    ) -> Result<Vec<BlockPos>, WorldError> {
        let data = self
            .request(Request::FindBlocks {
                block: block.to_string(),
                max_distance,
                count,
            })
            .await?;
        let mut found: Vec<BlockPos> = serde_json::from_value(data)?;
        found.truncate(count);
        Ok(found)
    }

    async fn equip_for_block(&self, target: BlockPos) -> Result<(), WorldError> {
        self.request_unit(Request::EquipForBlock(target)).await
    }

    async fn dig(&self, target: BlockPos) -> Result<(), WorldError> {
        self.request_unit(Request::Dig(target)).await
    }

    async fn inventory(&self) -> Result<Vec<InventoryItem>, WorldError> {
        let data = self.request(Request::Inventory).await?;
        Ok(serde_json::from_value(data)?)
    }

    async fn disconnect(&self) {
        // Quit is not acknowledged; the agent just closes its end.
        let _ = self.write(0, &Request::Quit).await;
        let mut writer = self.writer.lock().await;
        if let Some(mut half) = writer.take() {
            let _ = half.shutdown().await;
        }
        self.shared.close("disconnected by operator");
    }
}

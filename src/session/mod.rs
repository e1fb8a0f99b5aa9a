//! Interactive menu loop.
//!
//! One prompt is outstanding at any time. One-shot actions print their result
//! and wait for Enter; background tasks stay attached to the prompt until the
//! operator stops them or they finish on their own.

pub mod menu;

use crate::api::queries::{self, Answer, LIST_LIMIT, PREVIEW_LIMIT};
use crate::api::RemoteApi;
use crate::bridge::EventBridge;
use crate::config::Config;
use crate::error::{ApiError, AppError, InputError};
use crate::quantity::{group_thousands, parse_quantity};
use crate::supervisor::Supervisor;
use crate::tasks::{Direction, TaskKind, TaskReport, TaskSpec};
use crate::ui::settings::PROMPT_CONTINUE;
use crate::ui::RenderSink;
use crate::world::World;
use menu::{
    parse_page, parse_positive, ApiCommand, MainCommand, API_ENTRIES, API_TITLE, MAIN_ENTRIES,
    MAIN_TITLE, WALK_ENTRIES, WALK_TITLE,
};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    /// Input ended; leave every menu.
    Exit,
}

pub struct Session<R> {
    input: Lines<R>,
    world: Arc<dyn World>,
    api: Arc<dyn RemoteApi>,
    renderer: Arc<dyn RenderSink>,
    supervisor: Supervisor,
    /// Account used for balance lookups.
    account: String,
}

impl<R: AsyncBufRead + Unpin> Session<R> {
    pub fn new(
        input: R,
        world: Arc<dyn World>,
        api: Arc<dyn RemoteApi>,
        renderer: Arc<dyn RenderSink>,
        bridge: EventBridge,
        config: &Config,
    ) -> Self {
        let account = match config.world.username.trim() {
            "" => world.username(),
            name => name.to_string(),
        };
        let supervisor = Supervisor::new(
            world.clone(),
            bridge,
            renderer.clone(),
            config.automation.clone(),
        );
        Self {
            input: input.lines(),
            world,
            api,
            renderer,
            supervisor,
            account,
        }
    }

    /// Run until the operator exits or input ends, then disconnect.
    pub async fn run(&mut self) -> Result<(), AppError> {
        let result = self.main_menu().await;
        if let Some(report) = self.supervisor.shutdown().await {
            self.show_report(&report);
        }
        self.world.disconnect().await;
        self.renderer.line("Goodbye!");
        result
    }

    async fn main_menu(&mut self) -> Result<(), AppError> {
        loop {
            self.renderer.clear();
            self.renderer.menu(MAIN_TITLE, &MAIN_ENTRIES);
            let Some(choice) = self.ask("Choose an option: ").await? else {
                return Ok(());
            };
            let flow = match MainCommand::parse(&choice) {
                Some(MainCommand::Exit) => return Ok(()),
                Some(cmd) => {
                    debug!(?cmd, "main menu action");
                    self.dispatch(cmd).await?
                }
                None => self.done(&InputError::InvalidChoice.to_string()).await?,
            };
            if flow == Flow::Exit {
                return Ok(());
            }
        }
    }

    async fn dispatch(&mut self, cmd: MainCommand) -> Result<Flow, AppError> {
        match cmd {
            MainCommand::Balance => {
                let result = queries::balance(self.api.as_ref(), &self.account).await;
                self.answer(result).await
            }
            MainCommand::Playtime => {
                let result = queries::playtime(self.api.as_ref()).await;
                self.answer(result).await
            }
            MainCommand::MyStats => {
                let result = queries::my_stats(self.api.as_ref()).await;
                self.answer(result).await
            }
            MainCommand::WarpSpawn => self.command("/warp spawn", "Warped to spawn...").await,
            MainCommand::OpenCrate => self.command("/crate open", "Crate opened.").await,
            MainCommand::Home => {
                let Some(home) = self.ask("Which home? 1, 2?: ").await? else {
                    return Ok(Flow::Exit);
                };
                if home.is_empty() {
                    return self.done(&InputError::EmptyField("home").to_string()).await;
                }
                self.command(&format!("/home {home}"), &format!("Teleported to home {home}."))
                    .await
            }
            MainCommand::FarmShards => self.start_task(TaskSpec::Farming).await,
            MainCommand::DailyReward => self.command("/daily", "Claimed daily reward.").await,
            MainCommand::TogglePvp => self.command("/pvp", "Toggled PvP.").await,
            MainCommand::AuctionHouse => self.command("/ah", "Opened Auction House.").await,
            MainCommand::AuctionPreview => {
                let result = queries::auction_list(self.api.as_ref(), 1, PREVIEW_LIMIT).await;
                self.answer(result).await
            }
            MainCommand::Broadcast => {
                let Some(message) = self.ask("Enter message to broadcast: ").await? else {
                    return Ok(Flow::Exit);
                };
                if message.is_empty() {
                    return self.done("No message entered.").await;
                }
                self.command(&message, "Broadcasted message.").await
            }
            MainCommand::Inventory => self.show_inventory().await,
            MainCommand::ApiMenu => self.api_menu().await,
            MainCommand::Exit => Ok(Flow::Exit),
            MainCommand::ChatView => self.start_task(TaskSpec::ChatView).await,
            MainCommand::Pay => self.pay().await,
            MainCommand::TeleportTo => {
                let Some(player) = self.ask("Enter player name to teleport to: ").await? else {
                    return Ok(Flow::Exit);
                };
                if player.is_empty() {
                    return self
                        .done(&InputError::EmptyField("player name").to_string())
                        .await;
                }
                self.command(
                    &format!("/tpa {player}"),
                    &format!("Sent teleport request to {player}."),
                )
                .await
            }
            MainCommand::TeleportAccept => {
                let Some(player) = self
                    .ask("Enter username to accept teleport from: ")
                    .await?
                else {
                    return Ok(Flow::Exit);
                };
                if player.is_empty() {
                    return self
                        .done(&InputError::EmptyField("username").to_string())
                        .await;
                }
                self.command(
                    &format!("/tpaccept {player}"),
                    &format!("Accepted teleport request from {player}."),
                )
                .await
            }
            MainCommand::Spam => self.start_task(TaskSpec::Spamming).await,
            MainCommand::Walk => self.walk().await,
            MainCommand::Mine => self.mine().await,
        }
    }

    async fn api_menu(&mut self) -> Result<Flow, AppError> {
        loop {
            self.renderer.clear();
            self.renderer.menu(API_TITLE, &API_ENTRIES);
            let Some(choice) = self.ask("Select API command: ").await? else {
                return Ok(Flow::Exit);
            };
            let Some(cmd) = ApiCommand::parse(&choice) else {
                if self.done(&InputError::InvalidChoice.to_string()).await? == Flow::Exit {
                    return Ok(Flow::Exit);
                }
                continue;
            };
            debug!(?cmd, "api menu action");

            let api = self.api.clone();
            let result = match cmd {
                ApiCommand::Back => return Ok(Flow::Continue),
                ApiCommand::AuctionList => {
                    let Some(page) = self.ask_page().await? else {
                        return Ok(Flow::Exit);
                    };
                    queries::auction_list(api.as_ref(), page, LIST_LIMIT).await
                }
                ApiCommand::Transactions => {
                    let Some(page) = self.ask_page().await? else {
                        return Ok(Flow::Exit);
                    };
                    queries::auction_transactions(api.as_ref(), page).await
                }
                ApiCommand::Leaderboard(board) => {
                    let Some(page) = self.ask_page().await? else {
                        return Ok(Flow::Exit);
                    };
                    queries::leaderboard(api.as_ref(), board, page).await
                }
                ApiCommand::Lookup | ApiCommand::PlayerStats | ApiCommand::ShieldMetrics => {
                    let (label, field) = if cmd == ApiCommand::ShieldMetrics {
                        ("Enter shield service name: ", "service name")
                    } else {
                        ("Enter player username: ", "username")
                    };
                    let Some(name) = self.ask(label).await? else {
                        return Ok(Flow::Exit);
                    };
                    if name.is_empty() {
                        self.renderer
                            .warn(&InputError::EmptyField(field).to_string());
                        if self.pause().await? == Flow::Exit {
                            return Ok(Flow::Exit);
                        }
                        continue;
                    }
                    match cmd {
                        ApiCommand::Lookup => queries::lookup(api.as_ref(), &name).await,
                        ApiCommand::PlayerStats => queries::player_stats(api.as_ref(), &name).await,
                        _ => queries::shield_metrics(api.as_ref(), &name).await,
                    }
                }
            };
            if self.answer(result).await? == Flow::Exit {
                return Ok(Flow::Exit);
            }
        }
    }

    async fn pay(&mut self) -> Result<Flow, AppError> {
        let Some(player) = self.ask("Enter player name to pay: ").await? else {
            return Ok(Flow::Exit);
        };
        if player.is_empty() {
            return self
                .done(&InputError::EmptyField("player name").to_string())
                .await;
        }
        let Some(raw) = self
            .ask("Enter amount to pay (e.g., 5k, 3.5m): $")
            .await?
        else {
            return Ok(Flow::Exit);
        };
        let Some(amount) = parse_quantity(&raw) else {
            return self.done(&InputError::InvalidAmount(raw).to_string()).await;
        };
        let command = format!("/pay {player} {amount}");
        self.renderer.line(&format!("Sending command: {command}"));
        self.command(
            &command,
            &format!(
                "Attempted to pay {player} ${}.",
                group_thousands(i128::from(amount))
            ),
        )
        .await
    }

    async fn walk(&mut self) -> Result<Flow, AppError> {
        self.renderer.clear();
        self.renderer.menu(WALK_TITLE, &WALK_ENTRIES);
        let Some(raw) = self.ask("Choose direction (1-4): ").await? else {
            return Ok(Flow::Exit);
        };
        let direction = match Direction::parse(&raw) {
            Ok(direction) => direction,
            Err(err) => return self.done(&err.to_string()).await,
        };
        let Some(raw) = self.ask("How many blocks? ").await? else {
            return Ok(Flow::Exit);
        };
        let Some(distance) = parse_positive(&raw) else {
            return self
                .done(&InputError::InvalidDistance(raw).to_string())
                .await;
        };
        self.start_task(TaskSpec::Walking {
            direction,
            distance,
        })
        .await
    }

    async fn mine(&mut self) -> Result<Flow, AppError> {
        let Some(block) = self
            .ask("Enter block type to mine (e.g., 'stone', 'oak_log'): ")
            .await?
        else {
            return Ok(Flow::Exit);
        };
        if block.is_empty() {
            return self
                .done(&InputError::EmptyField("block name").to_string())
                .await;
        }
        let Some(raw) = self.ask("Enter amount to mine: ").await? else {
            return Ok(Flow::Exit);
        };
        let Some(amount) = parse_positive(&raw) else {
            return self.done(&InputError::InvalidAmount(raw).to_string()).await;
        };
        self.start_task(TaskSpec::Mining { block, amount }).await
    }

    async fn show_inventory(&mut self) -> Result<Flow, AppError> {
        let items = match self.world.inventory().await {
            Ok(items) => items,
            Err(err) if err.is_fatal() => return Err(err.into()),
            Err(err) => {
                self.renderer.error(&format!("Could not read inventory: {err}"));
                return self.pause().await;
            }
        };
        if items.is_empty() {
            return self.done("Your inventory is empty!").await;
        }
        self.renderer.section("Your Inventory");
        for (i, item) in items.iter().enumerate() {
            self.renderer
                .line(&format!("{}. {} x{}", i + 1, item.label(), item.count));
        }
        self.done("Inventory displayed.").await
    }

    async fn start_task(&mut self, spec: TaskSpec) -> Result<Flow, AppError> {
        match self.supervisor.start(spec) {
            Ok(kind) => self.attach(kind).await,
            Err(err) => {
                warn!(error = %err, "task not started");
                self.renderer.warn(&err.to_string());
                self.pause().await
            }
        }
    }

    /// Hold the prompt while a task runs.
    ///
    /// Farming only stops on `s`; every other task stops on any line. A task
    /// that finishes first releases the prompt by itself.
    async fn attach(&mut self, kind: TaskKind) -> Result<Flow, AppError> {
        if kind.is_instant() {
            if let Some(report) = self.supervisor.finished().await {
                self.show_report(&report);
            }
            return self.pause().await;
        }
        let needs_s = kind == TaskKind::Farming;
        let hint = if needs_s {
            "Type 's' then Enter to stop farming...\n".to_string()
        } else {
            format!("Press Enter to stop {kind}...\n")
        };
        self.renderer.prompt(&hint);

        loop {
            let line = tokio::select! {
                report = self.supervisor.finished() => {
                    if let Some(report) = report {
                        self.show_report(&report);
                    }
                    return self.pause().await;
                }
                line = self.input.next_line() => line.map_err(AppError::Input)?,
            };
            match line {
                Some(text) if needs_s && !text.trim().eq_ignore_ascii_case("s") => {
                    self.renderer.prompt(&hint);
                }
                Some(_) => {
                    self.stop_attached().await;
                    return self.pause().await;
                }
                None => {
                    self.stop_attached().await;
                    return Ok(Flow::Exit);
                }
            }
        }
    }

    async fn stop_attached(&mut self) {
        self.supervisor.stop();
        if let Some(report) = self.supervisor.finished().await {
            self.show_report(&report);
        }
    }

    fn show_report(&self, report: &TaskReport) {
        info!(%report, "task report");
        match report {
            TaskReport::Failed { .. } => self.renderer.error(&report.to_string()),
            _ => self.renderer.line(&report.to_string()),
        }
    }

    /// Send one chat line, then confirm it.
    async fn command(&mut self, text: &str, confirmation: &str) -> Result<Flow, AppError> {
        match self.world.chat(text).await {
            Ok(()) => self.done(confirmation).await,
            Err(err) if err.is_fatal() => Err(err.into()),
            Err(err) => {
                warn!(command = text, error = %err, "chat command rejected");
                self.renderer.error(&format!("Could not send {text}: {err}"));
                self.pause().await
            }
        }
    }

    async fn answer(&mut self, result: Result<Answer, ApiError>) -> Result<Flow, AppError> {
        match result {
            Ok(answer) => self.show_answer(&answer),
            Err(err) => {
                warn!(error = %err, "api request failed");
                self.renderer.error(&format!("API request error: {err}"));
            }
        }
        self.pause().await
    }

    fn show_answer(&self, answer: &Answer) {
        match answer {
            Answer::Section { title, lines } => {
                self.renderer.section(title);
                for line in lines {
                    self.renderer.line(line);
                }
            }
            Answer::Fields { title, fields } => {
                self.renderer.section(title);
                for (key, value) in fields {
                    self.renderer.field(key, value);
                }
            }
            Answer::Line(text) => self.renderer.line(text),
        }
    }

    async fn done(&mut self, message: &str) -> Result<Flow, AppError> {
        self.renderer.line(message);
        self.pause().await
    }

    async fn pause(&mut self) -> Result<Flow, AppError> {
        self.renderer.prompt(PROMPT_CONTINUE);
        Ok(match self.read_line().await? {
            Some(_) => Flow::Continue,
            None => Flow::Exit,
        })
    }

    async fn ask_page(&mut self) -> Result<Option<u32>, AppError> {
        Ok(self
            .ask("Enter page number (default 1): ")
            .await?
            .map(|raw| parse_page(&raw)))
    }

    /// Prompt and read one trimmed line. `None` at end of input.
    async fn ask(&mut self, label: &str) -> Result<Option<String>, AppError> {
        self.renderer.prompt(label);
        Ok(self.read_line().await?.map(|line| line.trim().to_string()))
    }

    async fn read_line(&mut self) -> Result<Option<String>, AppError> {
        self.input.next_line().await.map_err(AppError::Input)
    }
}

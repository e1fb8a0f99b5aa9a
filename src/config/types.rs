//! Configuration data model.
//!
//! Struct definitions plus default values. Source discovery, env overrides and
//! validation live in the sibling modules so precedence stays in one place.

use serde::Deserialize;
use std::time::Duration;

use super::defaults::{
    DEFAULT_AGENT_ADDR, DEFAULT_API_BASE_URL, DEFAULT_API_TIMEOUT_SECS, DEFAULT_FARM_START_COMMAND,
    DEFAULT_FARM_START_DELAY_MS, DEFAULT_FARM_WARP_COMMAND, DEFAULT_MINE_SEARCH_RADIUS,
    DEFAULT_POLL_INTERVAL_MS, DEFAULT_SPAM_BURST_MS, DEFAULT_SPAM_COMMAND,
    DEFAULT_SPAM_INTERVAL_MS, DEFAULT_SPAM_PAUSE_MS,
};

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub api: ApiConfig,
    pub world: WorldConfig,
    pub automation: AutomationConfig,
    pub display: DisplayConfig,
}

/// Remote statistics API settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    /// Bearer credential sent with every request.
    pub key: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            key: String::new(),
            base_url: DEFAULT_API_BASE_URL.into(),
            timeout_secs: DEFAULT_API_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// World connection settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// Game server the agent should join.
    pub host: String,
    /// TCP address of the world-agent sidecar.
    pub agent_addr: String,
    /// Account name used for balance lookups. Empty means "ask the agent".
    pub username: String,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            agent_addr: DEFAULT_AGENT_ADDR.into(),
            username: String::new(),
        }
    }
}

/// Background task timings and commands.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutomationConfig {
    /// Upper bound on how long a task may take to notice a stop request.
    pub poll_interval_ms: u64,
    pub farm_warp_command: String,
    pub farm_start_command: String,
    pub farm_start_delay_ms: u64,
    pub spam_command: String,
    pub spam_interval_ms: u64,
    pub spam_burst_ms: u64,
    pub spam_pause_ms: u64,
    pub mine_search_radius: u32,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            farm_warp_command: DEFAULT_FARM_WARP_COMMAND.into(),
            farm_start_command: DEFAULT_FARM_START_COMMAND.into(),
            farm_start_delay_ms: DEFAULT_FARM_START_DELAY_MS,
            spam_command: DEFAULT_SPAM_COMMAND.into(),
            spam_interval_ms: DEFAULT_SPAM_INTERVAL_MS,
            spam_burst_ms: DEFAULT_SPAM_BURST_MS,
            spam_pause_ms: DEFAULT_SPAM_PAUSE_MS,
            mine_search_radius: DEFAULT_MINE_SEARCH_RADIUS,
        }
    }
}

impl AutomationConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn farm_start_delay(&self) -> Duration {
        Duration::from_millis(self.farm_start_delay_ms)
    }

    pub fn spam_interval(&self) -> Duration {
        Duration::from_millis(self.spam_interval_ms)
    }

    pub fn spam_burst(&self) -> Duration {
        Duration::from_millis(self.spam_burst_ms)
    }

    pub fn spam_pause(&self) -> Duration {
        Duration::from_millis(self.spam_pause_ms)
    }
}

/// Terminal output settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    pub color: bool,
    /// Clear the screen before drawing a menu.
    pub clear_screen: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: true,
            clear_screen: true,
        }
    }
}

/// Outcome of `donutbot init`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigInitResult {
    Created { path: std::path::PathBuf },
    AlreadyInitialized { path: std::path::PathBuf },
}

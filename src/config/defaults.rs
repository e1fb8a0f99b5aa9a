//! Default configuration constants.

/// Embedded `donutbot.toml` template written by `donutbot init`.
pub(super) const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("../templates/donutbot.toml");
/// Config file name searched locally and under the config root.
pub(super) const CONFIG_FILE_NAME: &str = "donutbot.toml";
/// Directory under the config root holding the global config.
pub(super) const CONFIG_DIR_NAME: &str = "donutbot";

pub(super) const DEFAULT_API_BASE_URL: &str = "https://api.donutsmp.net/v1";
pub(super) const DEFAULT_API_TIMEOUT_SECS: u64 = 15;
pub(super) const DEFAULT_AGENT_ADDR: &str = "127.0.0.1:25580";

pub(super) const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;
pub(super) const DEFAULT_FARM_WARP_COMMAND: &str = "/warp shards";
pub(super) const DEFAULT_FARM_START_COMMAND: &str = "/farm start";
pub(super) const DEFAULT_FARM_START_DELAY_MS: u64 = 2_000;
pub(super) const DEFAULT_SPAM_COMMAND: &str = "/tpahere drdonutt";
pub(super) const DEFAULT_SPAM_INTERVAL_MS: u64 = 500;
pub(super) const DEFAULT_SPAM_BURST_MS: u64 = 2_000;
pub(super) const DEFAULT_SPAM_PAUSE_MS: u64 = 1_000;
pub(super) const DEFAULT_MINE_SEARCH_RADIUS: u32 = 64;

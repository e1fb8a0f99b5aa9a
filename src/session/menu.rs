//! Menu tables and choice parsing.

use crate::api::queries::Leaderboard;

pub const MAIN_TITLE: &str = "DonutSMP CLI Bot";
pub const API_TITLE: &str = "DonutSMP API Commands Page 2";

pub const MAIN_ENTRIES: [&str; 22] = [
    "Check Balance",
    "View Playtime",
    "Check Stats",
    "Warp to Spawn",
    "Open Crate",
    "Teleport to Home",
    "Warp to Shards",
    "Claim Daily Reward",
    "Toggle PvP",
    "Open Auction House",
    "View Auction Listings",
    "Broadcast Message",
    "View Inventory",
    "More API Commands (Page 2)",
    "Exit",
    "Live Chat View",
    "Pay Player",
    "Teleport to Player (/tpa)",
    "Accept Teleport Request (/tpaccept)",
    "Spam Teleport-Here Requests",
    "Walk Bot",
    "Mine Blocks by Type and Amount",
];

pub const API_ENTRIES: [&str; 16] = [
    "Auction List (page)",
    "Auction Transactions (page)",
    "Leaderboard Broken Blocks (page)",
    "Leaderboard Deaths (page)",
    "Leaderboard Kills (page)",
    "Leaderboard Mobs Killed (page)",
    "Leaderboard Money (page)",
    "Leaderboard Placed Blocks (page)",
    "Leaderboard Playtime (page)",
    "Leaderboard Sell (page)",
    "Leaderboard Shards (page)",
    "Leaderboard Shop (page)",
    "Lookup Player (username)",
    "Shield Metrics (service)",
    "Player Stats (username)",
    "Back to Main Menu",
];

pub const WALK_TITLE: &str = "Walk Bot";
pub const WALK_ENTRIES: [&str; 4] = ["Forward", "Backward", "Left", "Right"];

/// Primary menu actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainCommand {
    Balance,
    Playtime,
    MyStats,
    WarpSpawn,
    OpenCrate,
    Home,
    FarmShards,
    DailyReward,
    TogglePvp,
    AuctionHouse,
    AuctionPreview,
    Broadcast,
    Inventory,
    ApiMenu,
    Exit,
    ChatView,
    Pay,
    TeleportTo,
    TeleportAccept,
    Spam,
    Walk,
    Mine,
}

impl MainCommand {
    pub fn parse(choice: &str) -> Option<Self> {
        let cmd = match choice.trim() {
            "1" => Self::Balance,
            "2" => Self::Playtime,
            "3" => Self::MyStats,
            "4" => Self::WarpSpawn,
            "5" => Self::OpenCrate,
            "6" => Self::Home,
            "7" => Self::FarmShards,
            "8" => Self::DailyReward,
            "9" => Self::TogglePvp,
            "10" => Self::AuctionHouse,
            "11" => Self::AuctionPreview,
            "12" => Self::Broadcast,
            "13" => Self::Inventory,
            "14" => Self::ApiMenu,
            "15" => Self::Exit,
            "16" => Self::ChatView,
            "17" => Self::Pay,
            "18" => Self::TeleportTo,
            "19" => Self::TeleportAccept,
            "20" => Self::Spam,
            "21" => Self::Walk,
            "22" => Self::Mine,
            _ => return None,
        };
        Some(cmd)
    }
}

/// Secondary (API) menu actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiCommand {
    AuctionList,
    Transactions,
    Leaderboard(Leaderboard),
    Lookup,
    ShieldMetrics,
    PlayerStats,
    Back,
}

impl ApiCommand {
    pub fn parse(choice: &str) -> Option<Self> {
        let n: usize = choice.trim().parse().ok()?;
        match n {
            1 => Some(Self::AuctionList),
            2 => Some(Self::Transactions),
            3..=12 => Some(Self::Leaderboard(Leaderboard::ALL[n - 3])),
            13 => Some(Self::Lookup),
            14 => Some(Self::ShieldMetrics),
            15 => Some(Self::PlayerStats),
            16 => Some(Self::Back),
            _ => None,
        }
    }
}

/// Page number from operator input; anything unusable means page 1.
pub fn parse_page(raw: &str) -> u32 {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|page| *page >= 1)
        .unwrap_or(1)
}

/// Positive whole number (distance, amount).
pub fn parse_positive(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|n| *n >= 1)
}

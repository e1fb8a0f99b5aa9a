//! Menu queries against the statistics API.
//!
//! Every query fetches one path and turns the `result` payload into an
//! [`Answer`]. A missing or null `result` is not an error: it becomes the
//! query's "not found" line.

use super::RemoteApi;
use crate::error::ApiError;
use crate::quantity::group_thousands;
use serde_json::Value;
use std::fmt;
use std::time::{Duration, UNIX_EPOCH};
use urlencoding::encode;

/// Rows shown for list queries.
pub const LIST_LIMIT: usize = 10;
/// Rows shown for the main-menu auction preview.
pub const PREVIEW_LIMIT: usize = 5;

/// Display-ready query output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Section { title: String, lines: Vec<String> },
    Fields {
        title: String,
        fields: Vec<(String, String)>,
    },
    Line(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leaderboard {
    BrokenBlocks,
    Deaths,
    Kills,
    MobsKilled,
    Money,
    PlacedBlocks,
    Playtime,
    Sell,
    Shards,
    Shop,
}

impl Leaderboard {
    /// Secondary-menu order.
    pub const ALL: [Leaderboard; 10] = [
        Self::BrokenBlocks,
        Self::Deaths,
        Self::Kills,
        Self::MobsKilled,
        Self::Money,
        Self::PlacedBlocks,
        Self::Playtime,
        Self::Sell,
        Self::Shards,
        Self::Shop,
    ];

    pub fn path_segment(self) -> &'static str {
        match self {
            Self::BrokenBlocks => "brokenblocks",
            Self::Deaths => "deaths",
            Self::Kills => "kills",
            Self::MobsKilled => "mobskilled",
            Self::Money => "money",
            Self::PlacedBlocks => "placedblocks",
            Self::Playtime => "playtime",
            Self::Sell => "sell",
            Self::Shards => "shards",
            Self::Shop => "shop",
        }
    }
}

impl fmt::Display for Leaderboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

fn result(body: &Value) -> Option<&Value> {
    body.get("result").filter(|value| !value.is_null())
}

fn rows(body: &Value) -> Option<&Vec<Value>> {
    result(body)?.as_array()
}

/// Plain text for a scalar JSON value.
fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

/// Thousands-grouped amount, keeping up to two decimals. Accepts numbers or
/// numeric strings.
fn amount(value: &Value) -> Option<String> {
    if let Some(n) = value.as_i64() {
        return Some(group_thousands(n.into()));
    }
    if let Some(n) = value.as_u64() {
        return Some(group_thousands(n.into()));
    }
    let n = value
        .as_f64()
        .or_else(|| value.as_str()?.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite())?;
    let cents = (n.abs() * 100.0).round() as i128;
    let sign = if n < 0.0 && cents > 0 { "-" } else { "" };
    let whole = group_thousands(cents / 100);
    Some(match cents % 100 {
        0 => format!("{sign}{whole}"),
        frac => format!("{sign}{whole}.{frac:02}"),
    })
}

fn amount_or(value: Option<&Value>, fallback: &str) -> String {
    value
        .and_then(amount)
        .unwrap_or_else(|| fallback.to_string())
}

fn item_name(entry: &Value) -> String {
    let item = entry.get("item");
    ["display_name", "name", "type"]
        .iter()
        .find_map(|key| item?.get(key)?.as_str().filter(|s| !s.is_empty()))
        .unwrap_or("(Unnamed Item)")
        .to_string()
}

fn seller_name(entry: &Value) -> String {
    entry
        .get("seller")
        .and_then(|seller| seller.get("name"))
        .and_then(Value::as_str)
        .unwrap_or("Unknown")
        .to_string()
}

/// HTTP-date rendering of a unix-millis timestamp.
fn sold_at(entry: &Value) -> String {
    entry
        .get("unixMillisDateSold")
        .and_then(Value::as_u64)
        .map(|millis| httpdate::fmt_http_date(UNIX_EPOCH + Duration::from_millis(millis)))
        .unwrap_or_else(|| "unknown time".to_string())
}

pub fn format_auction_list(body: &Value, page: u32, limit: usize) -> Answer {
    let Some(entries) = rows(body) else {
        return Answer::Line("No auction data found.".into());
    };
    let lines = entries
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, entry)| {
            format!(
                "{}. {} - ${} - Seller: {}",
                i + 1,
                item_name(entry),
                amount_or(entry.get("price"), "???"),
                seller_name(entry)
            )
        })
        .collect();
    Answer::Section {
        title: format!("Auction List Page {page}"),
        lines,
    }
}

pub fn format_transactions(body: &Value, page: u32) -> Answer {
    let Some(entries) = rows(body) else {
        return Answer::Line("No transaction data found.".into());
    };
    let lines = entries
        .iter()
        .take(LIST_LIMIT)
        .enumerate()
        .map(|(i, entry)| {
            format!(
                "{}. {} sold for ${} by {} at {}",
                i + 1,
                item_name(entry),
                amount_or(entry.get("price"), "???"),
                seller_name(entry),
                sold_at(entry)
            )
        })
        .collect();
    Answer::Section {
        title: format!("Auction Transactions Page {page}"),
        lines,
    }
}

pub fn format_leaderboard(body: &Value, board: Leaderboard, page: u32) -> Answer {
    let Some(entries) = rows(body) else {
        return Answer::Line("No leaderboard data found.".into());
    };
    let lines = entries
        .iter()
        .take(LIST_LIMIT)
        .enumerate()
        .map(|(i, entry)| {
            let name = entry.get("username").map(text).unwrap_or_default();
            let value = entry.get("value").map(text).unwrap_or_default();
            format!("{}. {name} - {value}", i + 1)
        })
        .collect();
    Answer::Section {
        title: format!("Leaderboard for {board} - Page {page}"),
        lines,
    }
}

pub fn format_lookup(body: &Value, username: &str) -> Answer {
    let Some(player) = result(body) else {
        return Answer::Line("Player not found.".into());
    };
    let field = |key: &str| player.get(key).map(text).unwrap_or_else(|| "-".into());
    Answer::Fields {
        title: format!("Player Info for {username}"),
        fields: vec![
            ("Location".into(), field("location")),
            ("Rank".into(), field("rank")),
            ("Username".into(), field("username")),
        ],
    }
}

pub fn format_shield_metrics(body: &Value, service: &str) -> Answer {
    let Some(metrics) = result(body) else {
        return Answer::Line("No shield metrics found.".into());
    };
    let pretty = serde_json::to_string_pretty(metrics).unwrap_or_else(|_| metrics.to_string());
    Answer::Section {
        title: format!("Shield Metrics for {service}"),
        lines: pretty.lines().map(str::to_string).collect(),
    }
}

pub fn format_player_stats(body: &Value, username: &str) -> Answer {
    let Some(stats) = result(body) else {
        return Answer::Line("Player stats not found.".into());
    };
    let plain = |key: &str| stats.get(key).map(text).unwrap_or_else(|| "-".into());
    let money = |key: &str| format!("${}", amount_or(stats.get(key), "-"));
    Answer::Fields {
        title: format!("Stats for {username}"),
        fields: vec![
            ("Kills".into(), plain("kills")),
            ("Deaths".into(), plain("deaths")),
            ("Broken Blocks".into(), plain("broken_blocks")),
            ("Placed Blocks".into(), plain("placed_blocks")),
            ("Money".into(), money("money")),
            ("Money Made from Sell".into(), money("money_made_from_sell")),
            ("Money Spent on Shop".into(), money("money_spent_on_shop")),
            ("Playtime".into(), plain("playtime")),
            ("Shards".into(), plain("shards")),
        ],
    }
}

pub fn format_balance(body: &Value) -> Answer {
    match result(body).and_then(|stats| stats.get("money")).and_then(amount) {
        Some(money) => Answer::Line(format!("Balance: ${money}")),
        None => Answer::Line("Could not get balance data.".into()),
    }
}

fn number(value: Option<&Value>) -> Option<f64> {
    let value = value?;
    value
        .as_f64()
        .or_else(|| value.as_str()?.trim().parse().ok())
}

pub fn format_my_stats(body: &Value) -> Answer {
    let Some(stats) = result(body) else {
        return Answer::Line("Could not get stats data.".into());
    };
    let kills = number(stats.get("kills")).unwrap_or(0.0);
    let deaths = number(stats.get("deaths")).unwrap_or(0.0);
    let ratio = kills / if deaths == 0.0 { 1.0 } else { deaths };
    Answer::Line(format!(
        "Kills: {}, Deaths: {}, KD: {ratio:.2}",
        stats.get("kills").map(text).unwrap_or_else(|| "0".into()),
        stats.get("deaths").map(text).unwrap_or_else(|| "0".into()),
    ))
}

pub async fn auction_list(
    api: &dyn RemoteApi,
    page: u32,
    limit: usize,
) -> Result<Answer, ApiError> {
    let body = api.get(&format!("auction/list/{page}")).await?;
    Ok(format_auction_list(&body, page, limit))
}

pub async fn auction_transactions(api: &dyn RemoteApi, page: u32) -> Result<Answer, ApiError> {
    let body = api.get(&format!("auction/transactions/{page}")).await?;
    Ok(format_transactions(&body, page))
}

pub async fn leaderboard(
    api: &dyn RemoteApi,
    board: Leaderboard,
    page: u32,
) -> Result<Answer, ApiError> {
    let body = api.get(&format!("leaderboards/{board}/{page}")).await?;
    Ok(format_leaderboard(&body, board, page))
}

pub async fn lookup(api: &dyn RemoteApi, username: &str) -> Result<Answer, ApiError> {
    let body = api.get(&format!("lookup/{}", encode(username))).await?;
    Ok(format_lookup(&body, username))
}

pub async fn shield_metrics(api: &dyn RemoteApi, service: &str) -> Result<Answer, ApiError> {
    let body = api.get(&format!("shield/metrics/{}", encode(service))).await?;
    Ok(format_shield_metrics(&body, service))
}

pub async fn player_stats(api: &dyn RemoteApi, username: &str) -> Result<Answer, ApiError> {
    let body = api.get(&format!("stats/{}", encode(username))).await?;
    Ok(format_player_stats(&body, username))
}

pub async fn balance(api: &dyn RemoteApi, username: &str) -> Result<Answer, ApiError> {
    let body = api.get(&format!("stats/{}", encode(username))).await?;
    Ok(format_balance(&body))
}

pub async fn playtime(api: &dyn RemoteApi) -> Result<Answer, ApiError> {
    leaderboard(api, Leaderboard::Playtime, 1).await
}

pub async fn my_stats(api: &dyn RemoteApi) -> Result<Answer, ApiError> {
    let body = api.get("stats/me").await?;
    Ok(format_my_stats(&body))
}

use anyhow::{anyhow, Result};
use chrono::NaiveTime;
use std::collections::HashSet;
use std::env;
use teloxide::types::{ChatId, Recipient};

use crate::utils::validation::validate_telegram_chat_id;

pub const DEFAULT_CLIST_API_URL: &str = "https://clist.by/api/v2/contest/";

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub clist_api_key: String,
    pub channel: Recipient,
    pub admins: HashSet<i64>,
    pub debug: bool,
    pub http_port: u16,
    pub clist_api_url: String,
    pub clist_timeout_secs: u64,
    pub fetch_window_days: i64,
    pub long_contest_resource: Option<String>,
    pub alarm_exempt_resources: Vec<String>,
    pub daily_announce_time: NaiveTime,
    pub startup_delay_secs: u64,
}

fn required(name: &str) -> Result<String> {
    let value = env::var(name).map_err(|_| anyhow!("{} must be set", name))?;
    if value.trim().is_empty() {
        return Err(anyhow!("{} must be set", name));
    }
    Ok(value)
}

/// Unset and blank variables both fall back to `None`.
fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match optional(name) {
        Some(value) => value.trim().parse().map_err(|_| anyhow!("Invalid {}", name)),
        None => Ok(default),
    }
}

/// `@username` for public channels, otherwise a numeric chat id.
pub fn parse_channel(value: &str) -> Result<Recipient> {
    let value = value.trim();
    if value.starts_with('@') {
        return Ok(Recipient::ChannelUsername(value.to_string()));
    }
    let id: i64 = value.parse().map_err(|_| anyhow!("Invalid CHANNEL"))?;
    validate_telegram_chat_id(id).map_err(|e| anyhow!("Invalid CHANNEL: {}", e))?;
    Ok(Recipient::Id(ChatId(id)))
}

/// Colon separated list of user ids, e.g. `111:222`.
pub fn parse_admins(value: &str) -> Result<HashSet<i64>> {
    value
        .split(':')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse().map_err(|_| anyhow!("Invalid ADMINS entry '{}'", s)))
        .collect()
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let token = required("TELEGRAM_BOT_TOKEN")?;
        let api_key = required("CLIST_API_KEY")?;
        let channel = parse_channel(&required("CHANNEL")?)?;

        let admins = match optional("ADMINS") {
            Some(value) => parse_admins(&value)?,
            None => HashSet::new(),
        };

        let debug = optional("DEBUG")
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let http_port = parse_or("HTTP_PORT", 3000u16)?;
        let clist_api_url = optional("CLIST_API_URL").unwrap_or_else(|| DEFAULT_CLIST_API_URL.to_string());
        let clist_timeout_secs = parse_or("CLIST_TIMEOUT_SECS", 30u64)?;

        let fetch_window_days = parse_or("FETCH_WINDOW_DAYS", 2i64)?;
        if fetch_window_days < 1 {
            return Err(anyhow!("Invalid FETCH_WINDOW_DAYS"));
        }

        let long_contest_resource = match env::var("LONG_CONTEST_RESOURCE") {
            Ok(value) if value.trim().is_empty() => None,
            Ok(value) => Some(value.trim().to_string()),
            Err(_) => Some("atcoder.jp".to_string()),
        };

        let alarm_exempt_resources = optional("ALARM_EXEMPT_RESOURCES")
            .unwrap_or_else(|| "codeforces.com".to_string())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        let daily_announce_time = match optional("DAILY_ANNOUNCE_TIME") {
            Some(value) => NaiveTime::parse_from_str(value.trim(), "%H:%M")
                .map_err(|_| anyhow!("Invalid DAILY_ANNOUNCE_TIME"))?,
            None => NaiveTime::from_hms_opt(11, 0, 0).ok_or_else(|| anyhow!("Invalid DAILY_ANNOUNCE_TIME"))?,
        };

        let startup_delay_secs = parse_or("STARTUP_DELAY_SECS", 10u64)?;

        Ok(Config {
            telegram_bot_token: token,
            clist_api_key: api_key,
            channel,
            admins,
            debug,
            http_port,
            clist_api_url,
            clist_timeout_secs,
            fetch_window_days,
            long_contest_resource,
            alarm_exempt_resources,
            daily_announce_time,
            startup_delay_secs,
        })
    }
}

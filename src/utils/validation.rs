use anyhow::{anyhow, Result};

use crate::error::ManualContestError;
use crate::models::Contest;
use crate::utils::datetime::parse_datetime;

/// Field order of the `/manual` command body, one per line.
pub const MANUAL_FIELDS: [&str; 4] = ["event", "href", "start", "end"];

/// Parses the `/manual` command text into a contest.
///
/// The first line holds the command itself; the following lines carry
/// `event`, `href`, `start` and `end`. Manual contests have no resource, so
/// they are never alarm-exempt.
pub fn parse_manual_contest(text: &str) -> Result<Contest, ManualContestError> {
    let mut lines = text.lines().skip(1).map(str::trim);
    let mut fields: [&str; 4] = [""; 4];

    for (slot, name) in fields.iter_mut().zip(MANUAL_FIELDS) {
        let value = lines.next().ok_or(ManualContestError::MissingField(name))?;
        if value.is_empty() {
            return Err(ManualContestError::EmptyField(name));
        }
        *slot = value;
    }

    let [event, href, start, end] = fields;
    if !(href.starts_with("http://") || href.starts_with("https://")) {
        return Err(ManualContestError::InvalidUrl(href.to_string()));
    }

    let start = parse_datetime(start)?;
    let end = parse_datetime(end)?;
    Ok(Contest::new(event, "", href, start, end)?)
}

pub fn validate_telegram_chat_id(chat_id: i64) -> Result<()> {
    // Telegram chat IDs should be non-zero
    if chat_id == 0 {
        return Err(anyhow!("Chat ID cannot be zero"));
    }

    // Channels and supergroups sit around -100xxxxxxxxxx
    if chat_id < -2_000_000_000_000 {
        return Err(anyhow!("Chat ID out of valid range"));
    }

    Ok(())
}

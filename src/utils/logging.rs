use tracing::{error, info, warn};

use crate::error::FetchError;

/// Logs command start with consistent format
pub fn log_command_start(command: &str, user: &str, user_id: i64, chat_id: i64) {
    info!(
        "CMD_START: {} by {}({}) in chat {}",
        command, user, user_id, chat_id
    );
}

/// Logs command completion with consistent format
pub fn log_command_success(command: &str, user: &str, user_id: i64, chat_id: i64, details: Option<&str>) {
    match details {
        Some(d) => info!(
            "CMD_SUCCESS: {} by {}({}) in chat {} - {}",
            command, user, user_id, chat_id, d
        ),
        None => info!(
            "CMD_SUCCESS: {} by {}({}) in chat {}",
            command, user, user_id, chat_id
        ),
    }
}

/// Logs a privileged command ignored for a non-admin sender
pub fn log_command_denied(command: &str, user: &str, user_id: i64, chat_id: i64) {
    warn!(
        "CMD_DENIED: {} by {}({}) in chat {} - not an admin",
        command, user, user_id, chat_id
    );
}

/// Logs validation errors with consistent format
pub fn log_validation_error(command: &str, error: &str, user: &str, user_id: i64, chat_id: i64) {
    warn!(
        "VALIDATION_ERROR: {} - {} - user {}({}) in chat {}",
        command, error, user, user_id, chat_id
    );
}

/// Logs a failed contest API call with the full request context
pub fn log_fetch_error(url: &str, params: &[(&'static str, String)], err: &FetchError) {
    match err {
        FetchError::Status { status, body } => error!(
            "FETCH_ERROR: failed to fetch contests from {} [params={:?}, status={}, response={}]",
            url, params, status, body
        ),
        other => error!(
            "FETCH_ERROR: failed to fetch contests from {} [params={:?}, error={}]",
            url, params, other
        ),
    }
}

/// Logs alarm bookkeeping with consistent format
pub fn log_alarm(action: &str, event: &str, details: Option<&str>) {
    match details {
        Some(d) => info!("ALARM: {} '{}' - {}", action, event, d),
        None => info!("ALARM: {} '{}'", action, event),
    }
}

/// Logs system events with consistent format
pub fn log_system_event(event: &str, details: Option<&str>) {
    match details {
        Some(d) => info!("SYSTEM: {} - {}", event, d),
        None => info!("SYSTEM: {}", event),
    }
}

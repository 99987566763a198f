#![allow(dead_code, clippy::unwrap_used)]

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex};

use contest_announcer_bot::models::Contest;
use contest_announcer_bot::services::alarm::AlarmScheduler;
use contest_announcer_bot::services::clist::{ClistClient, ClistSettings};
use contest_announcer_bot::services::publisher::ChannelPublisher;
use tokio_cron_scheduler::JobScheduler;

/// A message the bot tried to post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posted {
    pub id: i32,
    pub reply_to: Option<i32>,
    pub silent: bool,
    pub text: String,
}

/// Publisher double that keeps everything in memory.
#[derive(Default)]
pub struct RecordingPublisher {
    next_id: AtomicI32,
    posted: Mutex<Vec<Posted>>,
}

impl RecordingPublisher {
    pub fn posted(&self) -> Vec<Posted> {
        self.posted.lock().unwrap().clone()
    }

    fn record(&self, reply_to: Option<i32>, silent: bool, text: &str) -> i32 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 100;
        self.posted.lock().unwrap().push(Posted {
            id,
            reply_to,
            silent,
            text: text.to_string(),
        });
        id
    }
}

#[async_trait]
impl ChannelPublisher for RecordingPublisher {
    async fn send(&self, text: &str, silent: bool) -> Result<i32> {
        Ok(self.record(None, silent, text))
    }

    async fn reply(&self, to_message_id: i32, text: &str) -> Result<i32> {
        Ok(self.record(Some(to_message_id), false, text))
    }
}

/// Saturday 2024-10-19 11:00 in Tehran.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 19, 7, 30, 0).unwrap()
}

pub fn contest(event: &str, resource: &str, start: DateTime<Utc>, length: Duration) -> Contest {
    Contest::new(
        event,
        resource,
        format!("https://{}/{}", resource, event.len()),
        start,
        start + length,
    )
    .unwrap()
}

/// One row in the contest API's wire format, with `resource` and `host` both set
/// the way the live API sends them.
pub fn api_row(event: &str, resource: &str, href: &str, start: DateTime<Utc>, length: Duration) -> serde_json::Value {
    serde_json::json!({
        "id": event.len(),
        "event": event,
        "resource": resource,
        "resource_id": resource.len(),
        "host": resource,
        "href": href,
        "start": start.format("%Y-%m-%dT%H:%M:%S").to_string(),
        "end": (start + length).format("%Y-%m-%dT%H:%M:%S").to_string(),
        "duration": length.num_seconds(),
    })
}

pub fn clist_client(api_url: String) -> ClistClient {
    ClistClient::new(ClistSettings {
        api_url,
        api_key: "tester:secret".to_string(),
        timeout: std::time::Duration::from_secs(5),
        fetch_window: Duration::days(2),
        long_contest_resource: Some("atcoder.jp".to_string()),
    })
    .unwrap()
}

pub async fn alarm_scheduler(publisher: Arc<RecordingPublisher>, exempt: &[&str]) -> AlarmScheduler {
    let scheduler = JobScheduler::new().await.unwrap();
    AlarmScheduler::new(
        scheduler,
        publisher,
        exempt.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
    )
}

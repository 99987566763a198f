#![allow(clippy::unwrap_used)]

mod common;

use chrono::Duration;
use common::{alarm_scheduler, api_row, clist_client, contest, fixed_now, RecordingPublisher};
use contest_announcer_bot::services::announcer::Announcer;
use contest_announcer_bot::services::filter::ContestFilter;
use contest_announcer_bot::utils::format::{format_announcement, DAILY_GREETING};
use httpmock::prelude::*;
use std::sync::Arc;

const API_PATH: &str = "/api/v2/contest/";

async fn announcer_for(server: &MockServer, publisher: Arc<RecordingPublisher>) -> Announcer {
    let alarms = alarm_scheduler(publisher.clone(), &["codeforces.com"]).await;
    Announcer::new(
        clist_client(server.url(API_PATH)),
        ContestFilter::default(),
        alarms,
        publisher,
    )
}

async fn mock_listing(server: &MockServer) {
    let now = fixed_now();
    server
        .mock_async(|when, then| {
            when.method(GET).path(API_PATH).query_param("duration__lte", "18000");
            then.status(200).json_body(serde_json::json!({
                "objects": [
                    api_row("Codeforces Round 900 (Div. 2)", "codeforces.com", "https://codeforces.com/contests/1875",
                        now + Duration::hours(30), Duration::hours(2)),
                    api_row("Kotlin Heroes: Episode 10", "codeforces.com", "https://codeforces.com/contests/1877",
                        now + Duration::hours(6), Duration::hours(2)),
                    api_row("AtCoder Beginner Contest 300", "atcoder.jp", "https://atcoder.jp/contests/abc300",
                        now + Duration::hours(5), Duration::minutes(100)),
                ]
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(API_PATH).query_param("resource", "atcoder.jp");
            then.status(200).json_body(serde_json::json!({
                "objects": [
                    api_row("AtCoder Grand Contest 065", "atcoder.jp", "https://atcoder.jp/contests/agc065",
                        now + Duration::minutes(30), Duration::hours(6)),
                ]
            }));
        })
        .await;
}

async fn mock_empty_listing(server: &MockServer) {
    server
        .mock_async(|when, then| {
            when.method(GET).path(API_PATH);
            then.status(200).json_body(serde_json::json!({ "objects": [] }));
        })
        .await;
}

#[tokio::test]
async fn test_daily_announces_desired_contests_in_order() {
    let server = MockServer::start_async().await;
    mock_listing(&server).await;
    let publisher = Arc::new(RecordingPublisher::default());
    let announcer = announcer_for(&server, publisher.clone()).await;

    let announced = announcer.announce_daily(fixed_now()).await.unwrap();
    assert_eq!(announced, 3);

    let posted = publisher.posted();
    assert_eq!(posted.len(), 4);

    assert_eq!(posted[0].text, DAILY_GREETING);
    assert!(posted[0].silent);

    let titles: Vec<&str> = posted[1..]
        .iter()
        .map(|p| p.text.lines().nth(3).unwrap())
        .collect();
    assert_eq!(
        titles,
        vec![
            "AtCoder Grand Contest 065",
            "AtCoder Beginner Contest 300",
            "Codeforces Round 900 (Div. 2)",
        ]
    );
    assert!(posted[1..].iter().all(|p| !p.silent && p.reply_to.is_none()));
}

#[tokio::test]
async fn test_daily_links_alarms_to_announcements() {
    let server = MockServer::start_async().await;
    mock_listing(&server).await;
    let publisher = Arc::new(RecordingPublisher::default());
    let announcer = announcer_for(&server, publisher.clone()).await;

    announcer.announce_daily(fixed_now()).await.unwrap();
    let posted = publisher.posted();
    let alarms = announcer.alarms();

    // AGC starts in 30 minutes and Codeforces is exempt, so only ABC is armed
    assert_eq!(alarms.pending_count().await, 1);
    let abc = alarms.pending("AtCoder Beginner Contest 300").await.unwrap();
    let abc_message = posted
        .iter()
        .find(|p| p.text.contains("AtCoder Beginner Contest 300"))
        .unwrap();
    assert_eq!(abc.payload.reply_to, Some(abc_message.id));
    assert_eq!(abc.fire_at, fixed_now() + Duration::hours(4));
}

#[tokio::test]
async fn test_daily_with_nothing_upcoming_stays_silent() {
    let server = MockServer::start_async().await;
    mock_empty_listing(&server).await;
    let publisher = Arc::new(RecordingPublisher::default());
    let announcer = announcer_for(&server, publisher.clone()).await;

    assert_eq!(announcer.announce_daily(fixed_now()).await.unwrap(), 0);
    assert!(publisher.posted().is_empty());
    assert_eq!(announcer.alarms().pending_count().await, 0);
}

#[tokio::test]
async fn test_daily_with_api_down_stays_silent() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(API_PATH);
            then.status(500).body("boom");
        })
        .await;
    let publisher = Arc::new(RecordingPublisher::default());
    let announcer = announcer_for(&server, publisher.clone()).await;

    assert_eq!(announcer.announce_daily(fixed_now()).await.unwrap(), 0);
    assert!(publisher.posted().is_empty());
}

#[tokio::test]
async fn test_startup_restores_alarms_without_posting() {
    let server = MockServer::start_async().await;
    mock_listing(&server).await;
    let publisher = Arc::new(RecordingPublisher::default());
    let announcer = announcer_for(&server, publisher.clone()).await;

    let armed = announcer.restore_alarms(fixed_now()).await;

    assert_eq!(armed, 1);
    assert!(publisher.posted().is_empty());
    let abc = announcer
        .alarms()
        .pending("AtCoder Beginner Contest 300")
        .await
        .unwrap();
    assert_eq!(abc.payload.reply_to, None);
}

#[tokio::test]
async fn test_startup_then_daily_keeps_one_alarm_per_contest() {
    let server = MockServer::start_async().await;
    mock_listing(&server).await;
    let publisher = Arc::new(RecordingPublisher::default());
    let announcer = announcer_for(&server, publisher.clone()).await;

    announcer.restore_alarms(fixed_now()).await;
    announcer.announce_daily(fixed_now()).await.unwrap();

    assert_eq!(announcer.alarms().pending_count().await, 1);
    let abc = announcer
        .alarms()
        .pending("AtCoder Beginner Contest 300")
        .await
        .unwrap();
    assert!(abc.payload.reply_to.is_some());
}

#[tokio::test]
async fn test_manual_contest_is_announced_and_armed() {
    let server = MockServer::start_async().await;
    let publisher = Arc::new(RecordingPublisher::default());
    let announcer = announcer_for(&server, publisher.clone()).await;
    let now = fixed_now();
    let icpc = contest("Iran ICPC Regional", "", now + Duration::hours(20), Duration::hours(5));

    announcer.announce_manual(&icpc, now).await.unwrap();

    let posted = publisher.posted();
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0].text, format_announcement(&icpc, &now));

    let pending = announcer.alarms().pending("Iran ICPC Regional").await.unwrap();
    assert_eq!(pending.payload.reply_to, Some(posted[0].id));
}

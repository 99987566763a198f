use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tracing::{error, warn};
use uuid::Uuid;

use crate::models::Contest;
use crate::services::publisher::ChannelPublisher;
use crate::utils::format::format_alarm;
use crate::utils::logging::log_alarm;

/// What a pending alarm delivers when it fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmPayload {
    /// Announcement to reply to. `None` posts the alarm on its own.
    pub reply_to: Option<i32>,
    pub contest: Contest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAlarm {
    pub job_id: Uuid,
    pub fire_at: DateTime<Utc>,
    pub payload: AlarmPayload,
}

/// One-shot reminders keyed by contest title.
///
/// At most one alarm is pending per key; setting it again replaces the
/// previous job. The registry is the only state shared between jobs.
#[derive(Clone)]
pub struct AlarmScheduler {
    scheduler: JobScheduler,
    publisher: Arc<dyn ChannelPublisher>,
    alarms: Arc<Mutex<HashMap<String, PendingAlarm>>>,
    exempt: Arc<HashSet<String>>,
}

impl AlarmScheduler {
    pub fn new<I>(scheduler: JobScheduler, publisher: Arc<dyn ChannelPublisher>, exempt: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            scheduler,
            publisher,
            alarms: Arc::new(Mutex::new(HashMap::new())),
            exempt: Arc::new(exempt.into_iter().collect()),
        }
    }

    /// Sources whose own platform already reminds participants.
    pub fn is_exempt(&self, resource: &str) -> bool {
        self.exempt.contains(resource)
    }

    /// Schedules the one-hour reminder for `contest`.
    ///
    /// Returns `true` when a timer is now pending. Any earlier alarm for the
    /// same event is dropped first, so a moved start time never leaves a stale
    /// reminder behind.
    pub async fn set_alarm(
        &self,
        now: DateTime<Utc>,
        contest: &Contest,
        reply_to: Option<i32>,
    ) -> Result<bool, JobSchedulerError> {
        if self.is_exempt(&contest.resource) {
            log_alarm("exempt", &contest.event, Some(&contest.resource));
            return Ok(false);
        }

        self.cancel(&contest.event).await;

        let fire_at = contest.alarm_time();
        if fire_at <= now {
            log_alarm("skipped", &contest.event, Some("starts within the hour"));
            return Ok(false);
        }

        let payload = AlarmPayload {
            reply_to,
            contest: contest.clone(),
        };
        self.upsert(&contest.event, now, fire_at, payload).await?;
        Ok(true)
    }

    /// Registers a job firing at `fire_at`, replacing whatever `key` held.
    pub async fn upsert(
        &self,
        key: &str,
        now: DateTime<Utc>,
        fire_at: DateTime<Utc>,
        payload: AlarmPayload,
    ) -> Result<Uuid, JobSchedulerError> {
        let mut alarms = self.alarms.lock().await;
        if let Some(old) = alarms.remove(key) {
            self.remove_job(key, old.job_id).await;
        }

        let delay = (fire_at - now).to_std().unwrap_or_default();
        let this = self.clone();
        let job_key = key.to_string();
        let job = Job::new_one_shot_async(delay, move |job_id, _l| {
            let this = this.clone();
            let key = job_key.clone();
            Box::pin(async move {
                this.fire(&key, job_id).await;
            })
        })?;
        let job_id = self.scheduler.add(job).await?;

        alarms.insert(
            key.to_string(),
            PendingAlarm {
                job_id,
                fire_at,
                payload,
            },
        );
        log_alarm("scheduled", key, Some(&fire_at.to_rfc3339()));
        Ok(job_id)
    }

    /// Drops the pending alarm for `key`, if any.
    pub async fn cancel(&self, key: &str) -> Option<PendingAlarm> {
        let removed = self.alarms.lock().await.remove(key);
        if let Some(old) = &removed {
            self.remove_job(key, old.job_id).await;
            log_alarm("cancelled", key, None);
        }
        removed
    }

    pub async fn pending(&self, key: &str) -> Option<PendingAlarm> {
        self.alarms.lock().await.get(key).cloned()
    }

    pub async fn pending_count(&self) -> usize {
        self.alarms.lock().await.len()
    }

    async fn remove_job(&self, key: &str, job_id: Uuid) {
        if let Err(e) = self.scheduler.remove(&job_id).await {
            warn!("Failed to remove alarm job {} for '{}': {}", job_id, key, e);
        }
    }

    /// Delivers the alarm registered under `key` if it still belongs to `job_id`.
    async fn fire(&self, key: &str, job_id: Uuid) {
        let pending = {
            let mut alarms = self.alarms.lock().await;
            match alarms.get(key) {
                Some(alarm) if alarm.job_id == job_id => alarms.remove(key),
                _ => None,
            }
        };

        let Some(alarm) = pending else {
            warn!("Alarm job {} for '{}' fired after being replaced", job_id, key);
            return;
        };

        let text = format_alarm(&alarm.payload.contest);
        let result = match alarm.payload.reply_to {
            Some(message_id) => self.publisher.reply(message_id, &text).await,
            None => self.publisher.send(&text, false).await,
        };

        match result {
            Ok(_) => log_alarm("sent", key, None),
            Err(e) => error!("Failed to send alarm for '{}': {}", key, e),
        }
    }
}

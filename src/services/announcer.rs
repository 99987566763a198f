use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Duration, NaiveTime, Timelike, Utc};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::models::Contest;
use crate::services::alarm::AlarmScheduler;
use crate::services::clist::ClistClient;
use crate::services::filter::ContestFilter;
use crate::services::publisher::ChannelPublisher;
use crate::utils::datetime::tehran;
use crate::utils::format::{format_announcement, DAILY_GREETING};
use crate::utils::logging::log_system_event;

/// Fetch, filter, publish and alarm procedures.
#[derive(Clone)]
pub struct Announcer {
    clist: Arc<ClistClient>,
    filter: Arc<ContestFilter>,
    alarms: AlarmScheduler,
    publisher: Arc<dyn ChannelPublisher>,
}

impl Announcer {
    pub fn new(
        clist: ClistClient,
        filter: ContestFilter,
        alarms: AlarmScheduler,
        publisher: Arc<dyn ChannelPublisher>,
    ) -> Self {
        Self {
            clist: Arc::new(clist),
            filter: Arc::new(filter),
            alarms,
            publisher,
        }
    }

    pub fn alarms(&self) -> &AlarmScheduler {
        &self.alarms
    }

    /// Re-arms alarms for upcoming contests without posting anything.
    ///
    /// Alarms live in memory only, so this runs after every restart.
    pub async fn restore_alarms(&self, now: DateTime<Utc>) -> usize {
        let contests = self.clist.fetch_upcoming(now, &self.filter).await;
        let mut armed = 0;
        for contest in &contests {
            match self.alarms.set_alarm(now, contest, None).await {
                Ok(true) => armed += 1,
                Ok(false) => {}
                Err(e) => error!("Failed to restore alarm for '{}': {}", contest.event, e),
            }
        }
        log_system_event(
            "Alarms restored",
            Some(&format!("{} of {} upcoming contests", armed, contests.len())),
        );
        armed
    }

    /// The daily post: a greeting followed by one message per desired contest.
    ///
    /// Stays silent when nothing is coming up. Returns how many contests were
    /// announced.
    pub async fn announce_daily(&self, now: DateTime<Utc>) -> Result<usize> {
        let contests = self.clist.fetch_upcoming(now, &self.filter).await;
        if contests.is_empty() {
            info!("No desired contests in the upcoming window, nothing to announce");
            return Ok(0);
        }

        self.publisher.send(DAILY_GREETING, true).await?;

        let mut announced = 0;
        for contest in &contests {
            match self.announce(contest, now).await {
                Ok(()) => announced += 1,
                Err(e) => error!("Failed to announce '{}': {}", contest.event, e),
            }
        }
        log_system_event(
            "Daily announcement sent",
            Some(&format!("{} of {} contests", announced, contests.len())),
        );
        Ok(announced)
    }

    /// Announces an operator supplied contest, skipping fetch and filter.
    pub async fn announce_manual(&self, contest: &Contest, now: DateTime<Utc>) -> Result<()> {
        self.announce(contest, now).await?;
        log_system_event("Manual contest announced", Some(&contest.event));
        Ok(())
    }

    async fn announce(&self, contest: &Contest, now: DateTime<Utc>) -> Result<()> {
        info!("Announcing {}", contest);
        let message_id = self
            .publisher
            .send(&format_announcement(contest, &now), false)
            .await?;
        self.alarms.set_alarm(now, contest, Some(message_id)).await?;
        Ok(())
    }
}

/// When the recurring and startup jobs run.
#[derive(Debug, Clone)]
pub struct AnnounceSchedule {
    /// Local (Tehran) wall-clock time of the daily post.
    pub daily_at: NaiveTime,
    pub startup_delay: std::time::Duration,
    /// Post a full announcement at startup instead of only restoring alarms.
    pub announce_on_startup: bool,
}

impl AnnounceSchedule {
    /// Six-field cron expression for `daily_at`, in UTC.
    ///
    /// Tehran has a fixed offset, so the local time maps to one UTC time all
    /// year round.
    pub fn daily_cron(&self) -> String {
        let offset = Duration::seconds(i64::from(tehran().local_minus_utc()));
        let utc = self.daily_at - offset;
        format!("{} {} {} * * *", utc.second(), utc.minute(), utc.hour())
    }
}

/// Owns the job scheduler driving the daily post, the startup run and all alarms.
pub struct AnnouncerService {
    announcer: Announcer,
    scheduler: JobScheduler,
    schedule: AnnounceSchedule,
}

impl AnnouncerService {
    pub fn new(announcer: Announcer, scheduler: JobScheduler, schedule: AnnounceSchedule) -> Self {
        Self {
            announcer,
            scheduler,
            schedule,
        }
    }

    pub async fn start(&mut self) -> Result<()> {
        let cron = self.schedule.daily_cron();

        let announcer = self.announcer.clone();
        let daily_job = Job::new_async(cron.as_str(), move |_uuid, _l| {
            let announcer = announcer.clone();
            Box::pin(async move {
                if let Err(e) = announcer.announce_daily(Utc::now()).await {
                    error!("Daily announcement failed: {}", e);
                }
            })
        })?;

        let announcer = self.announcer.clone();
        let announce_on_startup = self.schedule.announce_on_startup;
        let startup_job = Job::new_one_shot_async(self.schedule.startup_delay, move |_uuid, _l| {
            let announcer = announcer.clone();
            Box::pin(async move {
                if announce_on_startup {
                    if let Err(e) = announcer.announce_daily(Utc::now()).await {
                        error!("Startup announcement failed: {}", e);
                    }
                } else {
                    announcer.restore_alarms(Utc::now()).await;
                }
            })
        })?;

        self.scheduler.add(daily_job).await?;
        self.scheduler.add(startup_job).await?;
        self.scheduler.start().await?;

        log_system_event(
            "Announcer started",
            Some(&format!(
                "daily at {} local (cron '{}' UTC), startup run in {}s",
                self.schedule.daily_at.format("%H:%M"),
                cron,
                self.schedule.startup_delay.as_secs()
            )),
        );
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<()> {
        self.scheduler.shutdown().await?;
        Ok(())
    }
}

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::error::ContestError;
use crate::utils::datetime::parse_datetime;

/// A contest as announced to the channel.
///
/// `event` doubles as the alarm identity: two contests with the same title are
/// treated as the same scheduled alarm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contest {
    pub event: String,
    pub resource: String,
    pub href: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Contest {
    pub fn new(
        event: impl Into<String>,
        resource: impl Into<String>,
        href: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self, ContestError> {
        let event = event.into();
        if end < start {
            return Err(ContestError::InvalidInterval { event });
        }

        Ok(Self {
            event,
            resource: resource.into(),
            href: href.into(),
            start,
            end,
        })
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Instant at which the one-hour reminder goes out.
    pub fn alarm_time(&self) -> DateTime<Utc> {
        self.start - Duration::hours(1)
    }
}

impl std::fmt::Display for Contest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<Contest \"{}\" {} {}>", self.event, self.start, self.resource)
    }
}

/// One row of the contest API's `objects` array.
///
/// Rows carry `resource`, `host` or both; `resource` wins when present.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiContest {
    pub event: String,
    #[serde(default)]
    pub resource: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    pub href: String,
    pub start: String,
    pub end: String,
}

impl TryFrom<ApiContest> for Contest {
    type Error = ContestError;

    fn try_from(row: ApiContest) -> Result<Self, Self::Error> {
        let resource = row
            .resource
            .or(row.host)
            .ok_or_else(|| ContestError::MissingResource { event: row.event.clone() })?;
        let start = parse_datetime(&row.start)?;
        let end = parse_datetime(&row.end)?;
        Contest::new(row.event, resource, row.href, start, end)
    }
}

/// Envelope returned by the contest listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ContestPage {
    pub objects: Vec<ApiContest>,
}

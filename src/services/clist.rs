use chrono::{DateTime, Duration, SubsecRound, Utc};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::models::{Contest, ContestPage};
use crate::services::filter::ContestFilter;
use crate::utils::datetime::format_api_timestamp;
use crate::utils::logging::log_fetch_error;

/// Longest contest the general query returns.
pub const MAX_GENERAL_DURATION_SECS: i64 = 5 * 60 * 60;
pub const GENERAL_QUERY_LIMIT: u32 = 200;

/// Parameters of one contest listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContestQuery {
    pub start_gte: DateTime<Utc>,
    pub start_lte: DateTime<Utc>,
    pub duration_lte: Option<Duration>,
    pub resource: Option<String>,
    pub limit: Option<u32>,
}

impl ContestQuery {
    pub fn window(from: DateTime<Utc>, length: Duration) -> Self {
        Self {
            start_gte: from,
            start_lte: from + length,
            duration_lte: None,
            resource: None,
            limit: None,
        }
    }

    pub fn max_duration(mut self, duration: Duration) -> Self {
        self.duration_lte = Some(duration);
        self
    }

    pub fn resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("start__gte", format_api_timestamp(&self.start_gte)),
            ("start__lte", format_api_timestamp(&self.start_lte)),
            ("order_by", "start".to_string()),
        ];
        if let Some(duration) = self.duration_lte {
            params.push(("duration__lte", duration.num_seconds().to_string()));
        }
        if let Some(resource) = &self.resource {
            params.push(("resource", resource.clone()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

#[derive(Debug, Clone)]
pub struct ClistSettings {
    pub api_url: String,
    pub api_key: String,
    pub timeout: std::time::Duration,
    /// How far ahead the general query looks.
    pub fetch_window: Duration,
    /// Source whose contests may run longer than five hours and are fetched separately.
    pub long_contest_resource: Option<String>,
}

/// Client for the clist.by contest listing API.
#[derive(Debug, Clone)]
pub struct ClistClient {
    client: Client,
    settings: ClistSettings,
}

impl ClistClient {
    pub fn new(settings: ClistSettings) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self { client, settings })
    }

    /// Runs one query. Any failure is logged and yields no contests.
    pub async fn fetch(&self, query: &ContestQuery) -> Vec<Contest> {
        let params = query.params();
        match self.request(&params).await {
            Ok(page) => {
                let total = page.objects.len();
                let contests: Vec<Contest> = page
                    .objects
                    .into_iter()
                    .filter_map(|row| {
                        let event = row.event.clone();
                        Contest::try_from(row)
                            .map_err(|e| warn!("Skipping contest '{}': {}", event, e))
                            .ok()
                    })
                    .collect();
                debug!("Fetched {} of {} contest rows", contests.len(), total);
                contests
            }
            Err(e) => {
                log_fetch_error(&self.settings.api_url, &params, &e);
                Vec::new()
            }
        }
    }

    async fn request(&self, params: &[(&'static str, String)]) -> Result<ContestPage, FetchError> {
        let response = self
            .client
            .get(&self.settings.api_url)
            .header("Authorization", format!("ApiKey {}", self.settings.api_key))
            .query(params)
            .send()
            .await
            .map_err(FetchError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        response.json::<ContestPage>().await.map_err(FetchError::Decode)
    }

    /// Desired contests starting within the fetch window, sorted by start.
    ///
    /// Combines the capped general query with an uncapped one-day query for
    /// the long contest source.
    pub async fn fetch_upcoming(&self, now: DateTime<Utc>, filter: &ContestFilter) -> Vec<Contest> {
        let now = now.trunc_subsecs(0);

        let general = ContestQuery::window(now, self.settings.fetch_window)
            .max_duration(Duration::seconds(MAX_GENERAL_DURATION_SECS))
            .limit(GENERAL_QUERY_LIMIT);
        let mut contests = self.fetch(&general).await;

        if let Some(resource) = &self.settings.long_contest_resource {
            let long = ContestQuery::window(now, Duration::days(1)).resource(resource.clone());
            contests.extend(self.fetch(&long).await);
        }

        let mut desired: Vec<Contest> = Vec::with_capacity(contests.len());
        for contest in contests.into_iter().filter(|c| filter.is_desired(c)) {
            if !desired
                .iter()
                .any(|d| d.event == contest.event && d.href == contest.href)
            {
                desired.push(contest);
            }
        }
        desired.sort_by_key(|c| c.start);

        info!("Found {} desired upcoming contests", desired.len());
        desired
    }
}

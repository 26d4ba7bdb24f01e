//! Curation schedule: the daily UTC boundary, the staged run that
//! follows it, and the period windows anchored on it.

use crate::{config::ScheduleParams, period::Window, types::Timestamp};
use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CurationStage {
    Ingest,
    Extract,
    Score,
    Adapt,
}

impl CurationStage {
    pub const ALL: [CurationStage; 4] = [Self::Ingest, Self::Extract, Self::Score, Self::Adapt];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Ingest => "INGEST",
            Self::Extract => "EXTRACT",
            Self::Score => "SCORE",
            Self::Adapt => "ADAPT",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleStatus {
    pub in_run: bool,
    pub stage: Option<CurationStage>,
    pub title: String,
    pub last_boundary: Timestamp,
    pub next_run: Timestamp,
    pub next_in_secs: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurationSchedule {
    boundary: NaiveTime,
    stage: Duration,
}

impl CurationSchedule {
    pub fn new(params: &ScheduleParams) -> Self {
        let boundary = NaiveTime::from_hms_opt(params.boundary_hour, params.boundary_minute, 0)
            .unwrap_or(NaiveTime::MIN);
        Self {
            boundary,
            stage: Duration::milliseconds(params.stage_millis.max(0)),
        }
    }

    /// Most recent boundary at or before `now`.
    pub fn last_boundary(&self, now: Timestamp) -> Timestamp {
        let today = now.date_naive().and_time(self.boundary).and_utc();
        if now < today {
            today - Duration::days(1)
        } else {
            today
        }
    }

    pub fn run_length(&self) -> Duration {
        self.stage * CurationStage::ALL.len() as i32
    }

    /// Stage in progress at `now`, if a run is underway.
    pub fn stage_at(&self, now: Timestamp) -> Option<CurationStage> {
        let elapsed = now - self.last_boundary(now);
        if elapsed >= self.run_length() || self.stage <= Duration::zero() {
            return None;
        }
        let idx = (elapsed.num_milliseconds() / self.stage.num_milliseconds()) as usize;
        Some(CurationStage::ALL[idx.min(CurationStage::ALL.len() - 1)])
    }

    pub fn status(&self, now: Timestamp) -> ScheduleStatus {
        let last_boundary = self.last_boundary(now);
        let next_run = last_boundary + Duration::days(1);
        let stage = self.stage_at(now);
        ScheduleStatus {
            in_run: stage.is_some(),
            stage,
            title: stage
                .map(|s| s.title().to_string())
                .unwrap_or_else(|| "WAITING FOR NEXT CURATION".into()),
            last_boundary,
            next_run,
            next_in_secs: (next_run - now).num_seconds().max(0),
        }
    }

    /// `(previous, current)`: the full day before the last boundary, and
    /// everything since it.
    pub fn windows(&self, now: Timestamp) -> (Window, Window) {
        let boundary = self.last_boundary(now);
        (
            Window { start: boundary - Duration::days(1), end: boundary },
            Window { start: boundary, end: now },
        )
    }
}

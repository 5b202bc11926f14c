use serde::Serialize;

use crate::core::repository::DataOrigin;
use crate::core::session::PlanningSession;
use crate::domain::model::{Centre, MonthlyTarget, Track};
use crate::domain::month::MonthKey;
use crate::domain::ports::TargetStore;
use crate::utils::error::{PlannerError, Result};

pub const CSV_REPORT: &str = "target_plan.csv";
pub const JSON_REPORT: &str = "target_plan.json";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSummary {
    pub track: Track,
    pub total: u64,
    /// Work order target minus the track total; negative when over-planned.
    pub remaining: i64,
    pub rows: Vec<MonthlyTarget>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanReport {
    pub work_order_id: String,
    pub total_target: u32,
    pub centre: Option<Centre>,
    pub centres_from_fixture: bool,
    pub window_first: MonthKey,
    pub window_last: MonthKey,
    pub tracks: Vec<TrackSummary>,
    pub frozen_months: Vec<MonthKey>,
    pub ready_to_save: bool,
    pub blocking_reason: Option<String>,
    pub saved: bool,
}

#[derive(Serialize)]
struct CsvRow<'a> {
    track: &'a str,
    id: String,
    month: String,
    target: u32,
    frozen: bool,
}

impl PlanReport {
    pub fn from_session<S: TargetStore>(session: &PlanningSession<S>, origin: DataOrigin) -> Self {
        let plan = session.plan();
        let total_target = session.work_order().total_target;

        let tracks = Track::ALL
            .iter()
            .map(|&track| {
                let total = plan.total(track);
                TrackSummary {
                    track,
                    total,
                    remaining: i64::from(total_target) - total as i64,
                    rows: plan.rows(track).to_vec(),
                }
            })
            .collect();

        let check = session.check();

        Self {
            work_order_id: session.work_order().id.clone(),
            total_target,
            centre: session.selected_centre().cloned(),
            centres_from_fixture: origin == DataOrigin::Fixture,
            window_first: plan.window().first(),
            window_last: plan.window().last(),
            tracks,
            frozen_months: plan
                .frozen_months(Track::Enrolment)
                .map(|f| f.iter().copied().collect())
                .unwrap_or_default(),
            ready_to_save: check.is_ok(),
            blocking_reason: check.err().map(|r| r.to_string()),
            saved: false,
        }
    }

    pub fn track(&self, track: Track) -> Option<&TrackSummary> {
        self.tracks.iter().find(|t| t.track == track)
    }

    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for summary in &self.tracks {
            for row in &summary.rows {
                writer.serialize(CsvRow {
                    track: summary.track.as_str(),
                    id: row.id.to_string(),
                    month: row.month.map(|m| m.to_string()).unwrap_or_default(),
                    target: row.target,
                    frozen: row.is_frozen,
                })?;
            }
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| PlannerError::IoError(e.into_error()))?;
        String::from_utf8(bytes).map_err(|e| PlannerError::ValidationError {
            message: e.to_string(),
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

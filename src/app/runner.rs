use crate::adapters::fixtures::default_centres;
use crate::adapters::{HttpCentreSource, HttpTargetStore};
use crate::app::report::{PlanReport, CSV_REPORT, JSON_REPORT};
use crate::core::repository::FallbackRepository;
use crate::core::session::PlanningSession;
use crate::core::target_list::TargetPlan;
use crate::domain::model::{EditOutcome, PlanDraft, RowField, Track};
use crate::domain::month::MonthWindow;
use crate::domain::ports::{SettingsProvider, Storage};
use crate::utils::error::{PlannerError, Result};

/// Loads centres, replays a draft, exports the report and optionally saves.
pub struct PlanRunner<St: Storage, P: SettingsProvider> {
    storage: St,
    settings: P,
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Plan against this centre instead of the draft's.
    pub centre_id: Option<String>,
    pub save: bool,
}

impl<St: Storage, P: SettingsProvider> PlanRunner<St, P> {
    pub fn new(storage: St, settings: P) -> Self {
        Self { storage, settings }
    }

    pub async fn run(&self, draft: &PlanDraft, options: &RunOptions) -> Result<PlanReport> {
        let work_order = draft.work_order.clone();
        tracing::info!(
            "Planning work order {} (total target {})",
            work_order.id,
            work_order.total_target
        );

        let timeout = self.settings.request_timeout_secs();
        let source = HttpCentreSource::new(self.settings.api_base_url(), timeout)?;
        let centres = FallbackRepository::new(source, default_centres)
            .with_fallback_on_error(self.settings.fallback_on_error())
            .load(work_order.id.as_str())
            .await?;
        tracing::info!("Loaded {} centres ({:?})", centres.data.len(), centres.origin);

        let window = draft
            .window_start
            .map(MonthWindow::starting_at)
            .unwrap_or_else(MonthWindow::current);
        let store = HttpTargetStore::new(self.settings.api_base_url(), timeout)?;
        let mut session = PlanningSession::new(work_order, centres.data, store, window);

        if let Some(centre_id) = options.centre_id.as_ref().or(draft.centre_id.as_ref()) {
            session.select_centre(centre_id)?;
        } else {
            tracing::warn!("No centre chosen; enrolment months will not freeze");
        }

        replay_draft(session.plan_mut(), draft)?;

        let frozen = session
            .plan()
            .frozen_months(Track::Enrolment)
            .map_or(0, |f| f.len());
        if frozen > 0 {
            tracing::info!("{} enrolment months frozen by centre capacity", frozen);
        }

        let saved = if options.save {
            Some(session.save().await)
        } else {
            None
        };

        let mut report = PlanReport::from_session(&session, centres.origin);
        report.saved = matches!(saved, Some(Ok(_)));
        self.export(&report).await?;

        match saved {
            Some(Err(e)) => Err(e),
            _ => Ok(report),
        }
    }

    async fn export(&self, report: &PlanReport) -> Result<()> {
        self.storage
            .write_file(CSV_REPORT, report.to_csv()?.as_bytes())
            .await?;
        self.storage
            .write_file(JSON_REPORT, report.to_json()?.as_bytes())
            .await?;
        tracing::debug!(
            "Wrote {} and {} to {}",
            CSV_REPORT,
            JSON_REPORT,
            self.settings.output_path()
        );
        Ok(())
    }
}

/// Types the draft rows into the plan one edit at a time, in entry order.
///
/// Going through `update_row` means a row may not pick a month that the rows
/// before it have already frozen.
pub fn replay_draft(plan: &mut TargetPlan, draft: &PlanDraft) -> Result<()> {
    for track in Track::ALL {
        for (i, row) in draft.rows(track).iter().enumerate() {
            let id = if i == 0 {
                plan.rows(track)[0].id
            } else {
                plan.add_row(track)
            };

            for (field, value) in [
                (RowField::Month, row.month.clone()),
                (RowField::Target, row.target.to_string()),
            ] {
                if plan.update_row(track, id, field, &value)? != EditOutcome::Applied {
                    return Err(PlannerError::ValidationError {
                        message: format!("{} row {} could not be edited", track, i + 1),
                    });
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{DraftRow, WorkOrder};

    fn draft(enrolment: Vec<(u32, &str)>) -> PlanDraft {
        PlanDraft {
            work_order: WorkOrder {
                id: "WO-1".to_string(),
                total_target: 500,
            },
            centre_id: None,
            window_start: Some("2025-01".parse().unwrap()),
            mobilisation: vec![],
            enrolment: enrolment
                .into_iter()
                .map(|(target, month)| DraftRow {
                    target,
                    month: month.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_replay_keeps_entry_order() {
        let mut plan = TargetPlan::new(MonthWindow::starting_at("2025-01".parse().unwrap()));
        replay_draft(&mut plan, &draft(vec![(60, "2025-03"), (40, "2025-01")])).unwrap();

        let rows = plan.rows(Track::Enrolment);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].target, 60);
        assert_eq!(rows[1].month.unwrap().to_string(), "2025-01");
        assert_eq!(plan.rows(Track::Mobilisation).len(), 1);
    }

    #[test]
    fn test_replay_rejects_frozen_month() {
        let mut plan = TargetPlan::new(MonthWindow::starting_at("2025-01".parse().unwrap()));
        plan.select_centre(Some(crate::domain::model::CentreCapacity::new(100, 2).unwrap()));

        let result = replay_draft(&mut plan, &draft(vec![(100, "2025-01"), (10, "2025-02")]));
        assert!(matches!(result, Err(PlannerError::MonthFrozen { .. })));
    }
}

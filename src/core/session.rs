use std::sync::atomic::{AtomicBool, Ordering};

use crate::core::gate::{can_save, SaveRejection};
use crate::core::target_list::TargetPlan;
use crate::domain::model::{Centre, SaveTargetsRequest, Track, WorkOrder};
use crate::domain::month::MonthWindow;
use crate::domain::ports::TargetStore;
use crate::utils::error::{PlannerError, Result};

/// One open target-planning editor for a work order.
pub struct PlanningSession<S: TargetStore> {
    work_order: WorkOrder,
    centres: Vec<Centre>,
    selected: Option<String>,
    plan: TargetPlan,
    store: S,
    saving: AtomicBool,
}

/// Clears the in-flight flag however the save ends.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<S: TargetStore> PlanningSession<S> {
    pub fn new(work_order: WorkOrder, centres: Vec<Centre>, store: S, window: MonthWindow) -> Self {
        Self {
            work_order,
            centres,
            selected: None,
            plan: TargetPlan::new(window),
            store,
            saving: AtomicBool::new(false),
        }
    }

    pub fn work_order(&self) -> &WorkOrder {
        &self.work_order
    }

    pub fn centres(&self) -> &[Centre] {
        &self.centres
    }

    pub fn selected_centre(&self) -> Option<&Centre> {
        let id = self.selected.as_deref()?;
        self.centres.iter().find(|c| c.id == id)
    }

    pub fn select_centre(&mut self, centre_id: &str) -> Result<&Centre> {
        let centre = self
            .centres
            .iter()
            .find(|c| c.id == centre_id)
            .ok_or_else(|| PlannerError::UnknownCentre {
                work_order_id: self.work_order.id.clone(),
                centre_id: centre_id.to_string(),
            })?;

        self.plan.select_centre(Some(centre.capacity_limits()?));
        self.selected = Some(centre.id.clone());
        tracing::info!(
            "Selected centre {} ({}), capacity {} over {} months",
            centre.name,
            centre.id,
            centre.capacity,
            centre.course_duration
        );
        Ok(centre)
    }

    pub fn clear_centre(&mut self) {
        self.selected = None;
        self.plan.select_centre(None);
    }

    pub fn plan(&self) -> &TargetPlan {
        &self.plan
    }

    pub fn plan_mut(&mut self) -> &mut TargetPlan {
        &mut self.plan
    }

    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::Acquire)
    }

    pub fn check(&self) -> std::result::Result<(), SaveRejection> {
        can_save(
            self.work_order.total_target,
            self.plan.total(Track::Mobilisation),
            self.plan.total(Track::Enrolment),
            self.selected.is_some(),
        )
    }

    pub fn save_request(&self) -> Result<SaveTargetsRequest> {
        self.check().map_err(PlannerError::SaveRejected)?;
        let centre_id = self.selected.clone().ok_or(PlannerError::SaveRejected(
            SaveRejection::CentreNotSelected,
        ))?;

        Ok(SaveTargetsRequest {
            work_order_id: self.work_order.id.clone(),
            centre_id,
            mobilisation: self.plan.rows(Track::Mobilisation).to_vec(),
            enrolment: self.plan.rows(Track::Enrolment).to_vec(),
        })
    }

    /// Validates and stores both tracks in one request.
    ///
    /// Only one save runs at a time; a second call while one is outstanding
    /// fails with [`PlannerError::SaveInFlight`]. Store failures are returned
    /// as-is.
    pub async fn save(&self) -> Result<SaveTargetsRequest> {
        let request = self.save_request().inspect_err(|e| {
            tracing::warn!("Save blocked: {}", e);
        })?;

        let _guard = InFlight::acquire(&self.saving).ok_or(PlannerError::SaveInFlight)?;

        tracing::info!(
            "Saving {} mobilisation and {} enrolment rows for work order {} / centre {}",
            request.mobilisation.len(),
            request.enrolment.len(),
            request.work_order_id,
            request.centre_id
        );

        match self.store.save_targets(&request).await {
            Ok(()) => {
                tracing::info!("Targets saved");
                Ok(request)
            }
            Err(e) => {
                tracing::error!("Saving targets failed: {}", e);
                Err(e)
            }
        }
    }
}

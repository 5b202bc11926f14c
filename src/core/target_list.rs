use std::collections::BTreeSet;

use crate::core::freeze::frozen_months;
use crate::domain::model::{CentreCapacity, EditOutcome, MonthlyTarget, RowField, RowId, Track};
use crate::domain::month::{MonthKey, MonthWindow};
use crate::utils::error::{PlannerError, Result};

/// The two month-by-month target tracks of one (work order, centre) pair.
///
/// Every mutation recomputes the enrolment freeze and refreshes the
/// `is_frozen` flag of each enrolment row, so reads never see a stale lock.
#[derive(Debug, Clone)]
pub struct TargetPlan {
    mobilisation: Vec<MonthlyTarget>,
    enrolment: Vec<MonthlyTarget>,
    window: MonthWindow,
    centre: Option<CentreCapacity>,
    frozen: BTreeSet<MonthKey>,
}

impl TargetPlan {
    pub fn new(window: MonthWindow) -> Self {
        Self {
            mobilisation: vec![MonthlyTarget::empty()],
            enrolment: vec![MonthlyTarget::empty()],
            window,
            centre: None,
            frozen: BTreeSet::new(),
        }
    }

    pub fn window(&self) -> &MonthWindow {
        &self.window
    }

    pub fn centre(&self) -> Option<&CentreCapacity> {
        self.centre.as_ref()
    }

    pub fn select_centre(&mut self, centre: Option<CentreCapacity>) {
        self.centre = centre;
        self.refresh_freeze();
    }

    pub fn rows(&self, track: Track) -> &[MonthlyTarget] {
        match track {
            Track::Mobilisation => &self.mobilisation,
            Track::Enrolment => &self.enrolment,
        }
    }

    fn rows_mut(&mut self, track: Track) -> &mut Vec<MonthlyTarget> {
        match track {
            Track::Mobilisation => &mut self.mobilisation,
            Track::Enrolment => &mut self.enrolment,
        }
    }

    /// Frozen months of `track`. Only enrolment is ever frozen.
    pub fn frozen_months(&self, track: Track) -> Option<&BTreeSet<MonthKey>> {
        match track {
            Track::Mobilisation => None,
            Track::Enrolment => Some(&self.frozen),
        }
    }

    pub fn is_month_frozen(&self, track: Track, month: &MonthKey) -> bool {
        self.frozen_months(track)
            .is_some_and(|frozen| frozen.contains(month))
    }

    pub fn total(&self, track: Track) -> u64 {
        self.rows(track).iter().map(|r| u64::from(r.target)).sum()
    }

    pub fn add_row(&mut self, track: Track) -> RowId {
        let row = MonthlyTarget::empty();
        let id = row.id;
        self.rows_mut(track).push(row);
        tracing::debug!("Added {} row {}", track, id);
        id
    }

    pub fn remove_row(&mut self, track: Track, id: RowId) -> Result<EditOutcome> {
        let index = self.index_of(track, id)?;
        if self.is_locked(track, &self.rows(track)[index]) {
            return Ok(EditOutcome::Locked);
        }
        if self.rows(track).len() == 1 {
            return Ok(EditOutcome::LastRemainingRow);
        }

        self.rows_mut(track).remove(index);
        self.refresh_freeze();
        tracing::debug!("Removed {} row {}", track, id);
        Ok(EditOutcome::Applied)
    }

    /// Applies a raw form value to one field of a row.
    ///
    /// Targets are coerced (see [`coerce_target`]). Months must be empty or
    /// inside the window, and enrolment rows may not pick a frozen month.
    pub fn update_row(
        &mut self,
        track: Track,
        id: RowId,
        field: RowField,
        value: &str,
    ) -> Result<EditOutcome> {
        let index = self.index_of(track, id)?;
        if self.is_locked(track, &self.rows(track)[index]) {
            return Ok(EditOutcome::Locked);
        }

        match field {
            RowField::Target => {
                self.rows_mut(track)[index].target = coerce_target(value);
            }
            RowField::Month => {
                let month = self.parse_month(track, value)?;
                self.rows_mut(track)[index].month = month;
            }
        }

        self.refresh_freeze();
        Ok(EditOutcome::Applied)
    }

    fn parse_month(&self, track: Track, value: &str) -> Result<Option<MonthKey>> {
        if value.trim().is_empty() {
            return Ok(None);
        }

        let month: MonthKey = value.parse()?;
        if !self.window.contains(&month) {
            return Err(PlannerError::MonthOutOfWindow {
                month: month.to_string(),
                first: self.window.first().to_string(),
                last: self.window.last().to_string(),
            });
        }
        if self.is_month_frozen(track, &month) {
            return Err(PlannerError::MonthFrozen {
                month: month.to_string(),
            });
        }
        Ok(Some(month))
    }

    fn index_of(&self, track: Track, id: RowId) -> Result<usize> {
        self.rows(track)
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| PlannerError::UnknownRow {
                track: track.to_string(),
                id: id.to_string(),
            })
    }

    fn is_locked(&self, track: Track, row: &MonthlyTarget) -> bool {
        row.month
            .is_some_and(|month| self.is_month_frozen(track, &month))
    }

    fn refresh_freeze(&mut self) {
        self.frozen = frozen_months(&self.enrolment, self.centre.as_ref(), &self.window);
        for row in &mut self.enrolment {
            row.is_frozen = row.month.is_some_and(|m| self.frozen.contains(&m));
        }
    }
}

/// Reads a target the way a numeric form field would.
///
/// The leading integer is used, so `"12abc"` is 12. Anything without one, and
/// any negative number, becomes 0. Values past `u32::MAX` saturate.
pub fn coerce_target(raw: &str) -> u32 {
    let raw = raw.trim();
    let (negative, digits) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if digits.is_empty() || negative {
        return 0;
    }

    digits.parse::<u64>().map_or(u32::MAX, |v| u32::try_from(v).unwrap_or(u32::MAX))
}

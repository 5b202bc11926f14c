use std::collections::BTreeSet;

use crate::domain::model::{CentreCapacity, MonthlyTarget};
use crate::domain::month::{MonthKey, MonthWindow, WINDOW_MONTHS};

/// Months in which no further enrolment may be planned.
///
/// Rows are walked in entry order, not calendar order. Every row with a month
/// and a positive target adds to a running total; once that total has reached
/// the centre capacity, the row blocks the `course_duration_months` window
/// months that follow its own month. The total is never reset, so every later
/// row triggers again and the result is the union of all blocked ranges.
///
/// Rows that already sit on a frozen month still count toward the total.
pub fn frozen_months(
    enrolment: &[MonthlyTarget],
    centre: Option<&CentreCapacity>,
    window: &MonthWindow,
) -> BTreeSet<MonthKey> {
    let mut frozen = BTreeSet::new();
    let Some(centre) = centre else {
        return frozen;
    };

    let capacity = u64::from(centre.capacity());
    let duration = centre.course_duration_months() as usize;
    let mut accumulated: u64 = 0;

    for row in enrolment {
        let Some(month) = row.month else { continue };
        if row.target == 0 {
            continue;
        }

        accumulated += u64::from(row.target);
        if accumulated < capacity {
            continue;
        }

        let Some(position) = window.position(&month) else {
            tracing::debug!("Trigger month {} lies outside the planning window", month);
            continue;
        };
        let end = position.saturating_add(duration).min(WINDOW_MONTHS - 1);
        frozen.extend((position + 1..=end).filter_map(|i| window.get(i)));
    }

    frozen
}

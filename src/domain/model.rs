use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::month::MonthKey;
use crate::utils::error::{PlannerError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_positive_number, Validate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Track {
    Mobilisation,
    Enrolment,
}

impl Track {
    pub const ALL: [Track; 2] = [Track::Mobilisation, Track::Enrolment];

    pub fn as_str(&self) -> &'static str {
        match self {
            Track::Mobilisation => "mobilisation",
            Track::Enrolment => "enrolment",
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(Uuid);

impl RowId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One month row of a track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTarget {
    pub id: RowId,
    pub target: u32,
    #[serde(with = "month_or_empty")]
    pub month: Option<MonthKey>,
    pub is_frozen: bool,
}

impl MonthlyTarget {
    pub fn empty() -> Self {
        Self {
            id: RowId::generate(),
            target: 0,
            month: None,
            is_frozen: false,
        }
    }
}

/// Unset months travel as `""`.
mod month_or_empty {
    use super::MonthKey;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(month: &Option<MonthKey>, s: S) -> Result<S::Ok, S::Error> {
        match month {
            Some(m) => s.collect_str(m),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<MonthKey>, D::Error> {
        let raw = String::deserialize(d)?;
        if raw.trim().is_empty() {
            return Ok(None);
        }
        raw.parse().map(Some).map_err(serde::de::Error::custom)
    }
}

/// The editable fields of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowField {
    Target,
    Month,
}

/// What happened to an edit addressed to an existing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Applied,
    /// The row points at a frozen month and cannot change.
    Locked,
    /// Removal refused: a track always keeps one row.
    LastRemainingRow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CentreCapacity {
    capacity: u32,
    course_duration_months: u32,
}

impl CentreCapacity {
    pub fn new(capacity: u32, course_duration_months: u32) -> Result<Self> {
        validate_positive_number("centre.capacity", capacity as usize, 1)?;
        validate_positive_number("centre.course_duration", course_duration_months as usize, 1)?;
        Ok(Self {
            capacity,
            course_duration_months,
        })
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn course_duration_months(&self) -> u32 {
        self.course_duration_months
    }
}

/// A training centre attached to a work order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawCentre")]
pub struct Centre {
    pub id: String,
    pub name: String,
    pub capacity: u32,
    pub job_role: String,
    pub course_duration: u32,
}

impl Centre {
    pub fn capacity_limits(&self) -> Result<CentreCapacity> {
        CentreCapacity::new(self.capacity, self.course_duration)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCentre {
    id: String,
    name: String,
    capacity: u32,
    #[serde(default)]
    job_role: String,
    course_duration: u32,
}

impl TryFrom<RawCentre> for Centre {
    type Error = PlannerError;

    fn try_from(raw: RawCentre) -> Result<Self> {
        CentreCapacity::new(raw.capacity, raw.course_duration)?;
        Ok(Centre {
            id: raw.id,
            name: raw.name,
            capacity: raw.capacity,
            job_role: raw.job_role,
            course_duration: raw.course_duration,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrder {
    pub id: String,
    pub total_target: u32,
}

impl Validate for WorkOrder {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("work_order.id", &self.id)?;
        validate_positive_number("work_order.total_target", self.total_target as usize, 1)
    }
}

/// Payload stored atomically by the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveTargetsRequest {
    pub work_order_id: String,
    pub centre_id: String,
    pub mobilisation: Vec<MonthlyTarget>,
    pub enrolment: Vec<MonthlyTarget>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftRow {
    #[serde(default)]
    pub target: u32,
    #[serde(default)]
    pub month: String,
}

/// A plan as typed into a file, replayed row by row into a [`TargetPlan`].
///
/// [`TargetPlan`]: crate::core::target_list::TargetPlan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanDraft {
    pub work_order: WorkOrder,
    #[serde(default)]
    pub centre_id: Option<String>,
    #[serde(default)]
    pub window_start: Option<MonthKey>,
    #[serde(default)]
    pub mobilisation: Vec<DraftRow>,
    #[serde(default)]
    pub enrolment: Vec<DraftRow>,
}

impl PlanDraft {
    pub fn from_json(content: &str) -> Result<Self> {
        let draft: PlanDraft = serde_json::from_str(content)?;
        draft.work_order.validate()?;
        Ok(draft)
    }

    pub fn rows(&self, track: Track) -> &[DraftRow] {
        match track {
            Track::Mobilisation => &self.mobilisation,
            Track::Enrolment => &self.enrolment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_target_wire_shape() {
        let mut row = MonthlyTarget::empty();
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["month"], "");
        assert_eq!(json["target"], 0);
        assert_eq!(json["isFrozen"], false);

        row.month = Some("2025-04".parse().unwrap());
        let json = serde_json::to_string(&row).unwrap();
        let back: MonthlyTarget = serde_json::from_str(&json).unwrap();
        assert_eq!(back, row);
    }

    #[test]
    fn test_row_ids_are_unique() {
        let a = MonthlyTarget::empty();
        let b = MonthlyTarget::empty();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_centre_rejects_zero_capacity() {
        let ok = serde_json::json!({
            "id": "C-1", "name": "Ranchi", "capacity": 120,
            "jobRole": "Sewing Machine Operator", "courseDuration": 3
        });
        let centre: Centre = serde_json::from_value(ok).unwrap();
        assert_eq!(centre.capacity_limits().unwrap().course_duration_months(), 3);

        let zero = serde_json::json!({
            "id": "C-2", "name": "Dumka", "capacity": 0, "courseDuration": 3
        });
        assert!(serde_json::from_value::<Centre>(zero).is_err());
        assert!(CentreCapacity::new(10, 0).is_err());
    }

    #[test]
    fn test_plan_draft_requires_positive_total() {
        let json = r#"{"workOrder": {"id": "WO-1", "totalTarget": 0}}"#;
        assert!(PlanDraft::from_json(json).is_err());

        let json = r#"{
            "workOrder": {"id": "WO-1", "totalTarget": 300},
            "centreId": "C-1",
            "enrolment": [{"target": 100, "month": "2025-01"}]
        }"#;
        let draft = PlanDraft::from_json(json).unwrap();
        assert_eq!(draft.rows(Track::Enrolment).len(), 1);
        assert!(draft.rows(Track::Mobilisation).is_empty());
        assert!(draft.window_start.is_none());
    }
}

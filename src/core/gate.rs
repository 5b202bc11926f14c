use std::fmt;

/// Why a save attempt was refused. Checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveRejection {
    CentreNotSelected,
    MobilisationMismatch { expected: u32, actual: u64 },
    EnrolmentMismatch { expected: u32, actual: u64 },
}

impl SaveRejection {
    pub fn hint(&self) -> &'static str {
        match self {
            SaveRejection::CentreNotSelected => "Select a centre before saving",
            SaveRejection::MobilisationMismatch { .. } => {
                "Adjust the mobilisation months until they add up to the work order target"
            }
            SaveRejection::EnrolmentMismatch { .. } => {
                "Adjust the enrolment months until they add up to the work order target"
            }
        }
    }
}

impl fmt::Display for SaveRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveRejection::CentreNotSelected => write!(f, "Please select a centre"),
            SaveRejection::MobilisationMismatch { expected, actual } => write!(
                f,
                "Total mobilisation target ({}) must equal the work order target ({})",
                actual, expected
            ),
            SaveRejection::EnrolmentMismatch { expected, actual } => write!(
                f,
                "Total enrolment target ({}) must equal the work order target ({})",
                actual, expected
            ),
        }
    }
}

impl std::error::Error for SaveRejection {}

/// Decides whether a save may go ahead. Pure; the caller reports the reason.
pub fn can_save(
    work_order_total: u32,
    mobilisation_total: u64,
    enrolment_total: u64,
    centre_selected: bool,
) -> Result<(), SaveRejection> {
    if !centre_selected {
        return Err(SaveRejection::CentreNotSelected);
    }
    if mobilisation_total != u64::from(work_order_total) {
        return Err(SaveRejection::MobilisationMismatch {
            expected: work_order_total,
            actual: mobilisation_total,
        });
    }
    if enrolment_total != u64::from(work_order_total) {
        return Err(SaveRejection::EnrolmentMismatch {
            expected: work_order_total,
            actual: enrolment_total,
        });
    }
    Ok(())
}

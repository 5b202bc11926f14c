use crate::domain::model::Centre;

/// Centres used when the API has none for a work order.
pub fn default_centres() -> Vec<Centre> {
    [
        ("CTR-001", "Ranchi Skill Centre", 120, "Sewing Machine Operator", 3),
        ("CTR-002", "Hazaribagh Skill Centre", 90, "Retail Sales Associate", 2),
        ("CTR-003", "Dumka Skill Centre", 60, "Assistant Electrician", 4),
    ]
    .into_iter()
    .map(|(id, name, capacity, job_role, course_duration)| Centre {
        id: id.to_string(),
        name: name.to_string(),
        capacity,
        job_role: job_role.to_string(),
        course_duration,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_centres_are_valid() {
        let centres = default_centres();
        assert_eq!(centres.len(), 3);
        assert!(centres.iter().all(|c| c.capacity_limits().is_ok()));
    }
}

use tabled::{Table, Tabled};

use crate::terraform::PlanResult;

#[derive(Tabled)]
struct DriftRow {
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Resource")]
    address: String,
}

/// Table of resources Terraform would change, or `None` when the plan lists none.
///
/// `applyable` can be true with no resource changes (output-only changes), so
/// an empty summary does not contradict a drift verdict.
pub fn drift_summary(plan: &PlanResult) -> Option<String> {
    let rows: Vec<DriftRow> = plan
        .drifted_resources()
        .map(|rc| DriftRow {
            action: rc.action_label(),
            address: rc.address.clone(),
        })
        .collect();

    if rows.is_empty() {
        return None;
    }

    Some(Table::new(rows).to_string())
}

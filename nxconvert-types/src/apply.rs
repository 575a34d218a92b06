use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of applying a [`ConversionPlan`](crate::plan::ConversionPlan).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyReport {
    pub schema: String,
    pub plan_id: String,

    /// False for a dry run.
    pub applied: bool,

    pub summary: ApplySummary,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

impl ApplyReport {
    pub fn new(plan_id: impl Into<String>) -> Self {
        Self {
            schema: crate::schema::NXCONVERT_APPLY_V1.to_string(),
            plan_id: plan_id.into(),
            applied: false,
            summary: ApplySummary::default(),
            ended_at: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplySummary {
    pub moved: u64,
    pub written: u64,
    pub unchanged: u64,
}

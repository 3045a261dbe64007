//! Raw intake form payload.

use serde::{Deserialize, Serialize};

use super::{Category, HistoryFlags, PaidTo, PaymentMode, ReportFlags, Sex};

/// A completed intake form as handed over by the UI collaborator,
/// before any validation or derivation.
///
/// Numeric fields are deliberately wider than their stored ranges so that
/// out-of-range input reaches the intake processor and is rejected there
/// rather than silently truncated at the boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntakeForm {
    pub name: String,
    pub age: i64,
    pub sex: Sex,
    #[serde(default)]
    pub place: String,
    pub phone: String,
    #[serde(default)]
    pub alternate_phone: String,
    #[serde(default)]
    pub relative: String,
    pub category: Category,
    #[serde(default)]
    pub reports: ReportFlags,
    #[serde(default)]
    pub reports_other: String,
    #[serde(default)]
    pub lab_name: String,
    #[serde(default)]
    pub history: HistoryFlags,
    #[serde(default)]
    pub history_other: String,
    pub pain_score: i64,
    pub severity_score: i64,
    pub risk_score: i64,
    /// Client-side total, if the form computed one. Never trusted; the
    /// intake processor always recomputes the sum itself.
    #[serde(default)]
    pub total_score: Option<i64>,
    #[serde(default)]
    pub clinical_notes: String,
    #[serde(default)]
    pub payment_amount: f64,
    #[serde(default)]
    pub payment_mode: PaymentMode,
    #[serde(default = "default_paid_to")]
    pub paid_to: PaidTo,
    #[serde(default)]
    pub payment_notes: String,
}

fn default_paid_to() -> PaidTo {
    PaidTo::Reception
}

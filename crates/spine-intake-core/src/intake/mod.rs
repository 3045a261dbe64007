//! Intake processor: turns a raw form payload into a valid, scored
//! record ready for append.
//!
//! Validation is pure and has no side effects: a rejected submission
//! consumes no identity and writes nothing, so the caller can correct
//! the form and resubmit.

use thiserror::Error;

use crate::models::{
    registration_stamp, Category, HistoryFlags, IntakeForm, PaidTo, PatientRecord, PaymentMode,
    ReportFlags, Sex,
};
use crate::store::{CsvStore, StoreError};

/// User-correctable rejection of a submitted form.
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("{field} out of range: {value} (allowed {min}..={max})")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("payment amount must be a non-negative number, got {0}")]
    BadPaymentAmount(f64),
}

/// Intake failures: either the form was invalid or the store could not
/// be consulted for identity assignment.
#[derive(Error, Debug)]
pub enum IntakeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A validated, scored submission awaiting identity and timestamp.
///
/// Only constructible through [`IntakeProcessor::validate`], so holding
/// one implies every range check passed and the total is the true sum.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedIntake {
    name: String,
    age: u32,
    sex: Sex,
    place: String,
    phone: String,
    alternate_phone: Option<String>,
    relative: Option<String>,
    category: Category,
    reports: ReportFlags,
    reports_other: Option<String>,
    lab_name: Option<String>,
    history: HistoryFlags,
    history_other: Option<String>,
    pain_score: u8,
    severity_score: u8,
    risk_score: u8,
    total_score: u8,
    clinical_notes: String,
    payment_amount: f64,
    payment_mode: PaymentMode,
    paid_to: PaidTo,
    payment_notes: Option<String>,
}

impl ValidatedIntake {
    /// Bind store-assigned identity and a registration timestamp,
    /// producing the immutable record.
    pub fn into_record(self, id: u64, registered_at: String) -> PatientRecord {
        PatientRecord {
            id,
            name: self.name,
            age: self.age,
            sex: self.sex,
            place: self.place,
            phone: self.phone,
            alternate_phone: self.alternate_phone,
            relative: self.relative,
            category: self.category,
            reports: self.reports,
            reports_other: self.reports_other,
            lab_name: self.lab_name,
            history: self.history,
            history_other: self.history_other,
            pain_score: self.pain_score,
            severity_score: self.severity_score,
            risk_score: self.risk_score,
            total_score: self.total_score,
            clinical_notes: self.clinical_notes,
            payment_amount: self.payment_amount,
            payment_mode: self.payment_mode,
            paid_to: self.paid_to,
            payment_notes: self.payment_notes,
            registered_at,
        }
    }

    /// Derived total, pain + severity + risk.
    pub fn total_score(&self) -> u8 {
        self.total_score
    }
}

/// Stateless intake processor.
pub struct IntakeProcessor;

impl IntakeProcessor {
    /// Validate a raw form payload. Pure: no identity consumption, no
    /// store access, no partial effect on failure.
    pub fn validate(form: &IntakeForm) -> Result<ValidatedIntake, ValidationError> {
        let name = form.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        let phone = form.phone.trim();
        if phone.is_empty() {
            return Err(ValidationError::MissingField("phone"));
        }

        let age = in_range("age", form.age, 1, 120)? as u32;
        let pain_score = in_range("pain_score", form.pain_score, 0, 10)? as u8;
        let severity_score = in_range("severity_score", form.severity_score, 0, 10)? as u8;
        let risk_score = in_range("risk_score", form.risk_score, 0, 10)? as u8;

        if !form.payment_amount.is_finite() || form.payment_amount < 0.0 {
            return Err(ValidationError::BadPaymentAmount(form.payment_amount));
        }

        // Always recomputed; a client-supplied total is ignored.
        let total_score = pain_score + severity_score + risk_score;

        Ok(ValidatedIntake {
            name: name.to_string(),
            age,
            sex: form.sex,
            place: form.place.trim().to_string(),
            phone: phone.to_string(),
            alternate_phone: opt_trim(&form.alternate_phone),
            relative: opt_trim(&form.relative),
            category: form.category,
            reports: form.reports,
            reports_other: opt_trim(&form.reports_other),
            lab_name: opt_trim(&form.lab_name),
            history: form.history,
            history_other: opt_trim(&form.history_other),
            pain_score,
            severity_score,
            risk_score,
            total_score,
            clinical_notes: form.clinical_notes.clone(),
            payment_amount: form.payment_amount,
            payment_mode: form.payment_mode,
            paid_to: form.paid_to,
            payment_notes: opt_trim(&form.payment_notes),
        })
    }

    /// Validate a payload and bind identity from the store plus the
    /// current wall-clock minute. Does not append; the returned record
    /// is ready for [`CsvStore::append`].
    ///
    /// Prefer the service facade's atomic registration for multi-caller
    /// deployments; this two-step path can race between id assignment
    /// and append.
    pub fn process(form: &IntakeForm, store: &CsvStore) -> Result<PatientRecord, IntakeError> {
        let validated = Self::validate(form)?;
        let id = store.next_id()?;
        Ok(validated.into_record(id, registration_stamp()))
    }
}

fn in_range(
    field: &'static str,
    value: i64,
    min: i64,
    max: i64,
) -> Result<i64, ValidationError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

fn opt_trim(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_form() -> IntakeForm {
        IntakeForm {
            name: "A. Sharma".into(),
            age: 40,
            sex: Sex::Male,
            place: "Vijayawada".into(),
            phone: "9876543210".into(),
            alternate_phone: String::new(),
            relative: String::new(),
            category: Category::Surgery,
            reports: ReportFlags::default(),
            reports_other: String::new(),
            lab_name: String::new(),
            history: HistoryFlags::default(),
            history_other: String::new(),
            pain_score: 7,
            severity_score: 5,
            risk_score: 3,
            total_score: None,
            clinical_notes: String::new(),
            payment_amount: 0.0,
            payment_mode: PaymentMode::default(),
            paid_to: PaidTo::Reception,
            payment_notes: String::new(),
        }
    }

    #[test]
    fn test_validate_ok() {
        let validated = IntakeProcessor::validate(&sample_form()).unwrap();
        assert_eq!(validated.total_score(), 15);
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut form = sample_form();
        form.name = "   ".into();
        assert_eq!(
            IntakeProcessor::validate(&form),
            Err(ValidationError::MissingField("name"))
        );
    }

    #[test]
    fn test_empty_phone_rejected() {
        let mut form = sample_form();
        form.phone = String::new();
        assert_eq!(
            IntakeProcessor::validate(&form),
            Err(ValidationError::MissingField("phone"))
        );
    }

    #[test]
    fn test_age_bounds() {
        let mut form = sample_form();
        form.age = 0;
        assert!(matches!(
            IntakeProcessor::validate(&form),
            Err(ValidationError::OutOfRange { field: "age", .. })
        ));
        form.age = 121;
        assert!(matches!(
            IntakeProcessor::validate(&form),
            Err(ValidationError::OutOfRange { field: "age", .. })
        ));
        form.age = 120;
        assert!(IntakeProcessor::validate(&form).is_ok());
    }

    #[test]
    fn test_score_bounds() {
        let mut form = sample_form();
        form.severity_score = 11;
        assert!(matches!(
            IntakeProcessor::validate(&form),
            Err(ValidationError::OutOfRange {
                field: "severity_score",
                ..
            })
        ));
        form.severity_score = 10;
        assert!(IntakeProcessor::validate(&form).is_ok());
    }

    #[test]
    fn test_negative_payment_rejected() {
        let mut form = sample_form();
        form.payment_amount = -1.0;
        assert!(matches!(
            IntakeProcessor::validate(&form),
            Err(ValidationError::BadPaymentAmount(_))
        ));
    }

    #[test]
    fn test_client_total_ignored() {
        let mut form = sample_form();
        form.total_score = Some(999);
        let validated = IntakeProcessor::validate(&form).unwrap();
        assert_eq!(validated.total_score(), 15);
    }

    #[test]
    fn test_optional_fields_trimmed_to_none() {
        let mut form = sample_form();
        form.alternate_phone = "  ".into();
        form.relative = " Sunita ".into();
        let record = IntakeProcessor::validate(&form)
            .unwrap()
            .into_record(1, "2025-11-03 10:41".into());
        assert_eq!(record.alternate_phone, None);
        assert_eq!(record.relative, Some("Sunita".into()));
    }

    proptest! {
        #[test]
        fn prop_total_is_component_sum(pain in 0i64..=10, severity in 0i64..=10, risk in 0i64..=10) {
            let mut form = sample_form();
            form.pain_score = pain;
            form.severity_score = severity;
            form.risk_score = risk;

            let validated = IntakeProcessor::validate(&form).unwrap();
            prop_assert_eq!(validated.total_score() as i64, pain + severity + risk);
            prop_assert!(validated.total_score() <= 30);
        }
    }
}

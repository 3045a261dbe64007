//! Spine Intake Core Library
//!
//! Append-only patient registration for a spine clinic: validated intake,
//! server-side clinical scoring, and a flat CSV record store.
//!
//! # Architecture
//!
//! ```text
//! Intake form (UI collaborator)
//!         │  IntakeForm payload
//!         ▼
//! ┌───────────────────────┐
//! │   Intake Processor    │  required fields, range checks,
//! │  validate + derive    │  total = pain + severity + risk
//! └───────────┬───────────┘
//!             │ ValidatedIntake
//!             ▼
//! ┌───────────────────────┐
//! │     Record Store      │  assign id, stamp time,
//! │  append-only CSV file │  append one line
//! └───────────┬───────────┘
//!             │ read_all()
//!      ┌──────┴──────┐
//!      ▼             ▼
//!  Dashboard      WhatsApp
//!  + export       message/link
//! ```
//!
//! # Core Principle
//!
//! **The store never trusts the caller's arithmetic.** The total score is
//! recomputed at intake and identity is assigned by the store, atomically
//! with the append on the [`IntakeService`] path.
//!
//! # Modules
//!
//! - [`models`]: Domain types (PatientRecord, IntakeForm, enums/flags)
//! - [`intake`]: Validation and score derivation
//! - [`store`]: CSV-backed append-only record store
//! - [`export`]: Verbatim download snapshot
//! - [`messaging`]: WhatsApp message/link construction

pub mod export;
pub mod intake;
pub mod messaging;
pub mod models;
pub mod store;

// Re-export commonly used types
pub use export::StoreExport;
pub use intake::{IntakeProcessor, ValidatedIntake, ValidationError};
pub use models::{
    Category, HistoryFlags, IntakeForm, PaidTo, PatientRecord, PaymentMode, ReportFlags, Sex,
};
pub use store::{CsvStore, StoreError};

use std::path::Path;
use std::sync::Mutex;

/// Top-level failures surfaced to the UI collaborator.
#[derive(Debug, thiserror::Error)]
pub enum ClinicError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("lock poisoned: {0}")]
    Lock(String),
}

impl<T> From<std::sync::PoisonError<T>> for ClinicError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        ClinicError::Lock(e.to_string())
    }
}

/// The registration service the UI collaborator talks to.
///
/// Wraps the store behind a mutex so identity assignment and append run
/// as one atomic operation per submission; two racing submissions can
/// never observe the same id through this interface.
pub struct IntakeService {
    store: Mutex<CsvStore>,
}

impl IntakeService {
    /// Open (or create) the record store at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ClinicError> {
        let store = CsvStore::open(path)?;
        Ok(Self {
            store: Mutex::new(store),
        })
    }

    /// Register one submission end-to-end: validate, assign identity,
    /// stamp, append. On any failure nothing is written and no identity
    /// is consumed; the caller may correct the form and resubmit.
    pub fn register(&self, form: &IntakeForm) -> Result<PatientRecord, ClinicError> {
        let validated = IntakeProcessor::validate(form)?;
        let store = self.store.lock()?;
        Ok(store.register(validated)?)
    }

    /// All registered patients in submission order. An absent store
    /// reads as "no patients yet"; row-level corruption is surfaced so
    /// existing records are never silently hidden.
    pub fn patients(&self) -> Result<Vec<PatientRecord>, ClinicError> {
        let store = self.store.lock()?;
        match store.read_all() {
            Ok(records) => Ok(records),
            Err(StoreError::EmptyOrMissing) => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Verbatim download snapshot of the store.
    pub fn export(&self) -> Result<StoreExport, ClinicError> {
        let store = self.store.lock()?;
        Ok(StoreExport::from_store(&store)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_register_and_list() {
        let dir = tempfile::tempdir().unwrap();
        let service = IntakeService::open(dir.path().join("patients.csv")).unwrap();

        let record = service.register(&sample_form()).unwrap();
        assert_eq!(record.id, 1);
        assert_eq!(record.total_score, 15);

        let patients = service.patients().unwrap();
        assert_eq!(patients.len(), 1);
        assert_eq!(patients[0], record);
    }

    #[test]
    fn test_validation_failure_is_surfaced() {
        let dir = tempfile::tempdir().unwrap();
        let service = IntakeService::open(dir.path().join("patients.csv")).unwrap();

        let mut form = sample_form();
        form.name = String::new();
        assert!(matches!(
            service.register(&form),
            Err(ClinicError::Validation(ValidationError::MissingField(
                "name"
            )))
        ));
        assert!(service.patients().unwrap().is_empty());
    }
}

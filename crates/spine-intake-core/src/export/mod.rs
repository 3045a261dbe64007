//! Dashboard export: the store as a downloadable file.
//!
//! Export is a verbatim copy of the backing CSV, byte for byte, not a
//! transform. The dashboard hands these bytes straight to the browser's
//! download button.

use crate::store::{CsvStore, StoreResult};

/// A downloadable snapshot of the record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreExport {
    /// Suggested download filename
    pub filename: String,
    /// Verbatim UTF-8 CSV bytes, header included
    pub bytes: Vec<u8>,
}

impl StoreExport {
    /// Snapshot the store's current contents.
    pub fn from_store(store: &CsvStore) -> StoreResult<Self> {
        let filename = store
            .path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "patients.csv".to_string());
        Ok(Self {
            filename,
            bytes: store.raw_csv()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::IntakeProcessor;
    use crate::models::*;

    fn sample_form() -> IntakeForm {
        IntakeForm {
            name: "A. Sharma".into(),
            age: 40,
            sex: Sex::Male,
            place: String::new(),
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
    fn test_export_is_verbatim_copy() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::open(dir.path().join("patients.csv")).unwrap();
        store
            .register(IntakeProcessor::validate(&sample_form()).unwrap())
            .unwrap();

        let export = StoreExport::from_store(&store).unwrap();
        assert_eq!(export.filename, "patients.csv");
        assert_eq!(export.bytes, std::fs::read(store.path()).unwrap());
    }
}

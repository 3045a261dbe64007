//! Patient record models.

use serde::{Deserialize, Serialize};

/// Patient sex.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
    Other,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
            Sex::Other => "Other",
        }
    }

    /// Parse a stored label back into the enum.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Male" => Some(Sex::Male),
            "Female" => Some(Sex::Female),
            "Other" => Some(Sex::Other),
            _ => None,
        }
    }
}

/// Visit category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Category {
    Surgery,
    Injection,
    FollowUp,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Surgery => "Surgery",
            Category::Injection => "Injection",
            Category::FollowUp => "Follow Up",
            Category::Other => "Other",
        }
    }

    /// Parse a stored label. Tolerates the numbered labels older
    /// registration forms used ("1. Surgery", "4. Others").
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let s = match s.split_once(". ") {
            Some((prefix, rest)) if prefix.chars().all(|c| c.is_ascii_digit()) => rest,
            _ => s,
        };
        match s {
            "Surgery" => Some(Category::Surgery),
            "Injection" => Some(Category::Injection),
            "Follow Up" | "FollowUp" => Some(Category::FollowUp),
            "Other" | "Others" => Some(Category::Other),
            _ => None,
        }
    }
}

/// Who received a payment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaidTo {
    Vishnu,
    Reception,
    Doctor,
    Other,
}

impl PaidTo {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaidTo::Vishnu => "Vishnu",
            PaidTo::Reception => "Reception",
            PaidTo::Doctor => "Doctor",
            PaidTo::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Vishnu" => Some(PaidTo::Vishnu),
            "Reception" => Some(PaidTo::Reception),
            "Doctor" => Some(PaidTo::Doctor),
            "Other" => Some(PaidTo::Other),
            _ => None,
        }
    }
}

/// Imaging/lab reports the patient brought along.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportFlags {
    pub mri: bool,
    pub ct: bool,
    pub xray: bool,
    pub blood: bool,
}

/// Pre-existing disease history.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryFlags {
    pub diabetes: bool,
    pub hypertension: bool,
    pub cardiac: bool,
}

/// How a payment was made. Multiple modes can apply to one visit
/// (e.g. part cash, part QR).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentMode {
    pub cash: bool,
    pub qr: bool,
}

/// One immutable row: a single clinic visit/registration.
///
/// Created exactly once by the intake processor, appended to the record
/// store, and never updated or deleted in this system.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientRecord {
    /// Positive, unique, assigned in insertion order by the store
    pub id: u64,
    /// Patient name (required, non-empty)
    pub name: String,
    /// Age in years, 1..=120
    pub age: u32,
    pub sex: Sex,
    pub place: String,
    /// Primary phone (required, non-empty)
    pub phone: String,
    pub alternate_phone: Option<String>,
    /// Relative / emergency contact
    pub relative: Option<String>,
    pub category: Category,
    pub reports: ReportFlags,
    /// Free-text reports not covered by the flags
    pub reports_other: Option<String>,
    pub lab_name: Option<String>,
    pub history: HistoryFlags,
    pub history_other: Option<String>,
    /// Pain sub-score, 0..=10
    pub pain_score: u8,
    /// Severity sub-score, 0..=10
    pub severity_score: u8,
    /// Risk sub-score, 0..=10
    pub risk_score: u8,
    /// pain + severity + risk, derived at intake, stored as-is
    pub total_score: u8,
    /// Doctor notes, unbounded free text
    pub clinical_notes: String,
    /// Amount collected for the visit, >= 0
    pub payment_amount: f64,
    pub payment_mode: PaymentMode,
    pub paid_to: PaidTo,
    pub payment_notes: Option<String>,
    /// Registration timestamp, local time at minute precision
    /// ("YYYY-MM-DD HH:MM")
    pub registered_at: String,
}

/// Current wall-clock time formatted the way `registered_at` is stored.
pub fn registration_stamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sex_round_trip() {
        for sex in [Sex::Male, Sex::Female, Sex::Other] {
            assert_eq!(Sex::parse(sex.as_str()), Some(sex));
        }
        assert_eq!(Sex::parse("unknown"), None);
    }

    #[test]
    fn test_category_round_trip() {
        for cat in [
            Category::Surgery,
            Category::Injection,
            Category::FollowUp,
            Category::Other,
        ] {
            assert_eq!(Category::parse(cat.as_str()), Some(cat));
        }
    }

    #[test]
    fn test_category_numbered_labels() {
        assert_eq!(Category::parse("1. Surgery"), Some(Category::Surgery));
        assert_eq!(Category::parse("3. Follow Up"), Some(Category::FollowUp));
        assert_eq!(Category::parse("4. Others"), Some(Category::Other));
    }

    #[test]
    fn test_paid_to_round_trip() {
        for p in [
            PaidTo::Vishnu,
            PaidTo::Reception,
            PaidTo::Doctor,
            PaidTo::Other,
        ] {
            assert_eq!(PaidTo::parse(p.as_str()), Some(p));
        }
    }
}

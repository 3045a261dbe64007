//! Canonical store schema.
//!
//! Earlier revisions of the registration sheet shipped four mutually
//! incompatible column sets. This crate writes exactly one of them, the
//! fullest (notes + payment block), versioned below. A file created by an
//! older revision must be converted externally before this store will
//! append to it; the store refuses appends against a different header.

/// Schema version written by this crate.
pub const SCHEMA_VERSION: &str = "v4";

/// Column set, in file order. Fixed at store creation; every append must
/// match it exactly.
pub const COLUMNS: [&str; 30] = [
    "ID",
    "Name",
    "Age",
    "Sex",
    "Place",
    "Phone_No",
    "Alternate_Phone",
    "Relative",
    "Category",
    "Reports_MRI",
    "Reports_CT",
    "Reports_Xray",
    "Reports_Blood",
    "Reports_Other",
    "Lab_Name",
    "Old_Disease_DM",
    "Old_Disease_HTN",
    "Old_Disease_Cardiac",
    "Old_Disease_Other",
    "Pain_Score",
    "Severity_Points",
    "Risk_Points",
    "Total_Points",
    "Notes",
    "Payment_Amount",
    "Payment_Cash",
    "Payment_QR",
    "Paid_To",
    "Payment_Notes",
    "Date_Registered",
];

/// The header line as written to a fresh store (no trailing newline).
pub fn header_line() -> String {
    COLUMNS.join(",")
}

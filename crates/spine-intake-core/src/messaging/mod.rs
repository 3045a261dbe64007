//! WhatsApp message construction for registered patients.
//!
//! The core never sends anything; it only builds the templated text and
//! the chat link. The dashboard collaborator iterates `read_all()` and
//! opens the link for the selected row.

use crate::models::PatientRecord;

/// Longest notes excerpt included in a message.
const NOTES_EXCERPT_CHARS: usize = 60;

/// Normalize a phone number for the chat-link opener: digits only,
/// leading country-code prefix ("91") or trunk zeros stripped, then
/// "91" prepended.
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let national = if digits.len() > 10 && digits.starts_with("91") {
        &digits[2..]
    } else {
        digits.trim_start_matches('0')
    };
    format!("91{national}")
}

/// Templated registration message for one patient.
pub fn registration_message(record: &PatientRecord) -> String {
    let mut msg = format!(
        "Dear {name}, your registration at Spine Clinic is confirmed.\n\
         Patient ID: {id}\n\
         Category: {category}\n\
         Amount paid: Rs. {amount} (to {paid_to})\n\
         Date: {date}",
        name = record.name,
        id = record.id,
        category = record.category.as_str(),
        amount = record.payment_amount,
        paid_to = record.paid_to.as_str(),
        date = record.registered_at,
    );
    if !record.clinical_notes.is_empty() {
        msg.push_str("\nNotes: ");
        msg.push_str(&notes_excerpt(&record.clinical_notes));
    }
    msg
}

/// `wa.me` link carrying the registration message, addressed by the
/// normalized phone number.
pub fn whatsapp_link(record: &PatientRecord) -> String {
    format!(
        "https://wa.me/{}?text={}",
        normalize_phone(&record.phone),
        percent_encode(&registration_message(record))
    )
}

fn notes_excerpt(notes: &str) -> String {
    if notes.chars().count() <= NOTES_EXCERPT_CHARS {
        notes.to_string()
    } else {
        let cut: String = notes.chars().take(NOTES_EXCERPT_CHARS).collect();
        format!("{cut}...")
    }
}

/// Minimal percent-encoding for the `text=` query value.
fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

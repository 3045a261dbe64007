//! CSV row encoding/decoding for the record store.
//!
//! Wire format: comma-separated, UTF-8, one record per line. Fields
//! containing commas, quotes or newlines are double-quoted with `""`
//! escaping. Booleans are the literals `True`/`False`, numerics decimal
//! text, timestamps `YYYY-MM-DD HH:MM`.

use thiserror::Error;

use crate::models::{
    Category, HistoryFlags, PaidTo, PatientRecord, PaymentMode, ReportFlags, Sex,
};

use super::schema::COLUMNS;

/// A row that could not be decoded against the canonical schema.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("expected {expected} fields, got {got}")]
    FieldCount { expected: usize, got: usize },

    #[error("bad value in column {column}: {value:?}")]
    BadField { column: &'static str, value: String },
}

/// Escape a field for CSV output.
pub fn escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn fmt_bool(b: bool) -> &'static str {
    if b {
        "True"
    } else {
        "False"
    }
}

fn opt(s: &Option<String>) -> String {
    escape(s.as_deref().unwrap_or(""))
}

/// Encode one record as a single CSV line (with trailing newline), in
/// canonical column order.
///
/// Optional fields are stored as empty cells, so `Some("")` and `None`
/// are indistinguishable on disk and both read back as `None`. The
/// intake processor never produces `Some("")` (blank input trims to
/// `None`), keeping the append → read_all round trip an identity for
/// every validator-produced record.
pub fn encode_record(r: &PatientRecord) -> String {
    let fields: [String; COLUMNS.len()] = [
        r.id.to_string(),
        escape(&r.name),
        r.age.to_string(),
        r.sex.as_str().to_string(),
        escape(&r.place),
        escape(&r.phone),
        opt(&r.alternate_phone),
        opt(&r.relative),
        r.category.as_str().to_string(),
        fmt_bool(r.reports.mri).to_string(),
        fmt_bool(r.reports.ct).to_string(),
        fmt_bool(r.reports.xray).to_string(),
        fmt_bool(r.reports.blood).to_string(),
        opt(&r.reports_other),
        opt(&r.lab_name),
        fmt_bool(r.history.diabetes).to_string(),
        fmt_bool(r.history.hypertension).to_string(),
        fmt_bool(r.history.cardiac).to_string(),
        opt(&r.history_other),
        r.pain_score.to_string(),
        r.severity_score.to_string(),
        r.risk_score.to_string(),
        r.total_score.to_string(),
        escape(&r.clinical_notes),
        r.payment_amount.to_string(),
        fmt_bool(r.payment_mode.cash).to_string(),
        fmt_bool(r.payment_mode.qr).to_string(),
        r.paid_to.as_str().to_string(),
        opt(&r.payment_notes),
        escape(&r.registered_at),
    ];
    let mut line = fields.join(",");
    line.push('\n');
    line
}

fn parse_bool(column: &'static str, s: &str) -> Result<bool, DecodeError> {
    match s.trim() {
        "True" | "true" | "TRUE" => Ok(true),
        "False" | "false" | "FALSE" | "" => Ok(false),
        _ => Err(DecodeError::BadField {
            column,
            value: s.to_string(),
        }),
    }
}

fn parse_num<T: std::str::FromStr>(column: &'static str, s: &str) -> Result<T, DecodeError> {
    s.trim().parse().map_err(|_| DecodeError::BadField {
        column,
        value: s.to_string(),
    })
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Decode one row (already split into fields) against the canonical schema.
pub fn decode_record(fields: &[String]) -> Result<PatientRecord, DecodeError> {
    if fields.len() != COLUMNS.len() {
        return Err(DecodeError::FieldCount {
            expected: COLUMNS.len(),
            got: fields.len(),
        });
    }

    let sex = Sex::parse(&fields[3]).ok_or_else(|| DecodeError::BadField {
        column: "Sex",
        value: fields[3].clone(),
    })?;
    let category = Category::parse(&fields[8]).ok_or_else(|| DecodeError::BadField {
        column: "Category",
        value: fields[8].clone(),
    })?;
    let paid_to = PaidTo::parse(&fields[27]).ok_or_else(|| DecodeError::BadField {
        column: "Paid_To",
        value: fields[27].clone(),
    })?;

    Ok(PatientRecord {
        id: parse_num("ID", &fields[0])?,
        name: fields[1].clone(),
        age: parse_num("Age", &fields[2])?,
        sex,
        place: fields[4].clone(),
        phone: fields[5].clone(),
        alternate_phone: non_empty(&fields[6]),
        relative: non_empty(&fields[7]),
        category,
        reports: ReportFlags {
            mri: parse_bool("Reports_MRI", &fields[9])?,
            ct: parse_bool("Reports_CT", &fields[10])?,
            xray: parse_bool("Reports_Xray", &fields[11])?,
            blood: parse_bool("Reports_Blood", &fields[12])?,
        },
        reports_other: non_empty(&fields[13]),
        lab_name: non_empty(&fields[14]),
        history: HistoryFlags {
            diabetes: parse_bool("Old_Disease_DM", &fields[15])?,
            hypertension: parse_bool("Old_Disease_HTN", &fields[16])?,
            cardiac: parse_bool("Old_Disease_Cardiac", &fields[17])?,
        },
        history_other: non_empty(&fields[18]),
        pain_score: parse_num("Pain_Score", &fields[19])?,
        severity_score: parse_num("Severity_Points", &fields[20])?,
        risk_score: parse_num("Risk_Points", &fields[21])?,
        total_score: parse_num("Total_Points", &fields[22])?,
        clinical_notes: fields[23].clone(),
        payment_amount: parse_num("Payment_Amount", &fields[24])?,
        payment_mode: PaymentMode {
            cash: parse_bool("Payment_Cash", &fields[25])?,
            qr: parse_bool("Payment_QR", &fields[26])?,
        },
        paid_to,
        payment_notes: non_empty(&fields[28]),
        registered_at: fields[29].clone(),
    })
}

/// Split CSV text into rows of unescaped fields. Quote-aware: a quoted
/// field may contain commas, `""` escapes and embedded newlines, so rows
/// are delimited here rather than by naive line splitting.
pub fn split_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\r' => {} // tolerate CRLF
            '\n' => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            _ => field.push(c),
        }
    }
    // final row without trailing newline
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }
    rows
}

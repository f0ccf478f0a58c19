//! Turns retrieved records into the user-facing reply text.

use crate::knowledge::KnowledgeRecord;

/// Literal every reply must carry so the user always has a next step.
pub const HELPLINE_MARKER: &str = "NDMA Helpline: 1078";

pub const HELPLINE_FOOTER: &str =
    "For verified help, contact NDMA Helpline: 1078 or local authorities.";

pub const NO_MATCH_FALLBACK: &str = "I understand you need help. Please contact NDMA Helpline: 1078 or local authorities for immediate assistance.";

const SEPARATOR: &str = " | ";

const REPEATED_HELPLINE: &str = "the NDMA helpline (1078)";

/// How many first-aid steps are quoted in a reply.
const FIRST_AID_STEPS: usize = 2;

pub fn assemble(records: &[KnowledgeRecord]) -> String {
    if records.is_empty() {
        return NO_MATCH_FALLBACK.to_string();
    }

    let body = records
        .iter()
        .map(format_record)
        .collect::<Vec<_>>()
        .join(SEPARATOR);

    match body.find(HELPLINE_MARKER) {
        Some(first) => keep_first_helpline(&body, first),
        None => format!("{}{}{}", body, SEPARATOR, HELPLINE_FOOTER),
    }
}

/// Later quotes of the helpline are reworded so the marker stays unique.
fn keep_first_helpline(body: &str, first: usize) -> String {
    let (head, tail) = body.split_at(first + HELPLINE_MARKER.len());
    format!("{}{}", head, tail.replace(HELPLINE_MARKER, REPEATED_HELPLINE))
}

pub fn format_record(record: &KnowledgeRecord) -> String {
    match record {
        KnowledgeRecord::EmergencyContact {
            service,
            number,
            description,
        } => format!("{}: {} - {}", service, number, description),
        KnowledgeRecord::SafetyGuideline {
            disaster,
            phase,
            details,
            ..
        } => format!("{} ({}): {}", title_case(disaster), phase, details),
        KnowledgeRecord::FirstAid { situation, steps } => {
            let quoted = steps
                .iter()
                .take(FIRST_AID_STEPS)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(SEPARATOR);
            format!("{}: {}", situation, quoted)
        }
    }
}

pub fn context_labels(records: &[KnowledgeRecord]) -> Vec<String> {
    records.iter().map(KnowledgeRecord::context_label).collect()
}

/// Uppercases the first letter of every alphabetic run and lowercases the
/// rest, so `heat_wave` becomes `Heat_Wave`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for ch in text.chars() {
        if in_word {
            out.extend(ch.to_lowercase());
        } else {
            out.extend(ch.to_uppercase());
        }
        in_word = ch.is_alphabetic();
    }
    out
}

//! Source dataset parsing for the offline indexer.
//!
//! Expected shape:
//! - `emergency_contacts.national_numbers`: list of `{service, number, description}`
//! - `disaster_safety_guidelines`: `{disaster: {phase: [{step, details}]}}`
//! - `basic_first_aid.common_emergencies`: list of `{situation, steps}`
//!
//! Missing fields become empty strings; phases that are not lists are skipped.

use serde_json::Value;

use super::record::KnowledgeRecord;

/// Flattens the dataset into records: contacts, then guidelines in document
/// order, then first aid.
pub fn records_from_dataset(data: &Value) -> Vec<KnowledgeRecord> {
    let mut records = Vec::new();

    for contact in array_at(data, &["emergency_contacts", "national_numbers"]) {
        records.push(KnowledgeRecord::EmergencyContact {
            service: string_field(contact, "service"),
            number: string_field(contact, "number"),
            description: string_field(contact, "description"),
        });
    }

    if let Some(guidelines) = data
        .get("disaster_safety_guidelines")
        .and_then(|v| v.as_object())
    {
        for (disaster, phases) in guidelines {
            let Some(phases) = phases.as_object() else {
                continue;
            };
            for (phase, steps) in phases {
                let Some(steps) = steps.as_array() else {
                    continue;
                };
                for step in steps.iter().filter(|s| s.is_object()) {
                    records.push(KnowledgeRecord::SafetyGuideline {
                        disaster: disaster.clone(),
                        phase: phase.clone(),
                        step: string_field(step, "step"),
                        details: string_field(step, "details"),
                    });
                }
            }
        }
    }

    for emergency in array_at(data, &["basic_first_aid", "common_emergencies"]) {
        let steps = emergency
            .get("steps")
            .and_then(|v| v.as_array())
            .map(|items| items.iter().filter_map(scalar_to_string).collect())
            .unwrap_or_default();
        records.push(KnowledgeRecord::FirstAid {
            situation: string_field(emergency, "situation"),
            steps,
        });
    }

    records
}

fn array_at<'a>(data: &'a Value, path: &[&str]) -> impl Iterator<Item = &'a Value> {
    let mut current = Some(data);
    for key in path {
        current = current.and_then(|v| v.get(*key));
    }
    current
        .and_then(|v| v.as_array())
        .into_iter()
        .flatten()
        .filter(|item| item.is_object())
}

fn string_field(item: &Value, key: &str) -> String {
    item.get(key).and_then(scalar_to_string).unwrap_or_default()
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

use serde::{Deserialize, Serialize};

/// One entry of the disaster-guidance knowledge base.
///
/// Records are immutable once loaded and are identified only by their
/// position in the backing sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KnowledgeRecord {
    EmergencyContact {
        service: String,
        number: String,
        description: String,
    },
    SafetyGuideline {
        disaster: String,
        phase: String,
        step: String,
        details: String,
    },
    FirstAid {
        situation: String,
        steps: Vec<String>,
    },
}

impl KnowledgeRecord {
    /// Text fed to the keyword tokenizer when building the index.
    pub fn keyword_text(&self) -> String {
        match self {
            KnowledgeRecord::EmergencyContact {
                service,
                description,
                ..
            } => format!("{} {}", service, description),
            KnowledgeRecord::SafetyGuideline {
                disaster,
                phase,
                step,
                details,
            } => format!("{} {} {} {}", disaster, phase, step, details),
            KnowledgeRecord::FirstAid { situation, steps } => {
                format!("{} {}", situation, steps.join(" "))
            }
        }
    }

    /// Text sent to the embedding provider when building the vector store.
    pub fn embedding_text(&self) -> String {
        match self {
            KnowledgeRecord::EmergencyContact {
                service,
                number,
                description,
            } => format!(
                "Emergency Service: {}\nNumber: {}\nDescription: {}",
                service, number, description
            ),
            KnowledgeRecord::SafetyGuideline {
                disaster,
                phase,
                step,
                details,
            } => format!(
                "Disaster: {}\nPhase: {}\nStep: {}\nDetails: {}",
                disaster, phase, step, details
            ),
            KnowledgeRecord::FirstAid { situation, steps } => {
                format!("First Aid: {}\nSteps: {}", situation, steps.join(" | "))
            }
        }
    }

    /// Short label returned to clients as retrieved context.
    pub fn context_label(&self) -> String {
        match self {
            KnowledgeRecord::EmergencyContact {
                service, number, ..
            } => format!("{}: {}", service, number),
            KnowledgeRecord::SafetyGuideline { disaster, step, .. } => {
                format!("{}: {}", disaster, step)
            }
            KnowledgeRecord::FirstAid { situation, .. } => format!("First Aid: {}", situation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_tagged_entries() {
        let record: KnowledgeRecord = serde_json::from_value(json!({
            "type": "first_aid",
            "situation": "Burns",
            "steps": ["Cool the burn", "Cover loosely"]
        }))
        .unwrap();

        assert_eq!(
            record,
            KnowledgeRecord::FirstAid {
                situation: "Burns".to_string(),
                steps: vec!["Cool the burn".to_string(), "Cover loosely".to_string()],
            }
        );
    }

    #[test]
    fn context_labels_follow_record_kind() {
        let contact = KnowledgeRecord::EmergencyContact {
            service: "Police".to_string(),
            number: "100".to_string(),
            description: "Law enforcement".to_string(),
        };
        let guideline = KnowledgeRecord::SafetyGuideline {
            disaster: "flood".to_string(),
            phase: "during".to_string(),
            step: "Move to higher ground".to_string(),
            details: "Avoid walking through moving water.".to_string(),
        };

        assert_eq!(contact.context_label(), "Police: 100");
        assert_eq!(guideline.context_label(), "flood: Move to higher ground");
        assert_eq!(
            guideline.keyword_text(),
            "flood during Move to higher ground Avoid walking through moving water."
        );
        assert!(contact.embedding_text().starts_with("Emergency Service: Police\nNumber: 100"));
    }
}

//! Message → intent, with prediction requests taking precedence.

use crate::rag::assembler::title_case;

const PREDICTION_PHRASES: &[&str] = &[
    "heat wave prediction",
    "weather prediction",
    "predict heat wave",
    "predict weather",
    "weather forecast",
];

/// Checked in order; the first one found in the message wins.
const KNOWN_CITIES: &[&str] = &[
    "delhi",
    "mumbai",
    "chennai",
    "bangalore",
    "kolkata",
    "hyderabad",
    "pune",
    "ahmedabad",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    HeatWavePrediction { city: String },
    GeneralQuery,
}

#[derive(Debug, Clone)]
pub struct IntentClassifier {
    default_city: String,
}

impl IntentClassifier {
    pub fn new(default_city: impl Into<String>) -> Self {
        Self {
            default_city: default_city.into(),
        }
    }

    pub fn classify(&self, message: &str) -> Intent {
        let lowered = message.to_lowercase();
        if is_prediction_request(&lowered) {
            Intent::HeatWavePrediction {
                city: self.city_in(&lowered),
            }
        } else {
            Intent::GeneralQuery
        }
    }

    fn city_in(&self, lowered: &str) -> String {
        let city = KNOWN_CITIES
            .iter()
            .find(|city| lowered.contains(*city))
            .copied()
            .unwrap_or(self.default_city.as_str());
        title_case(city)
    }
}

fn is_prediction_request(lowered: &str) -> bool {
    if PREDICTION_PHRASES
        .iter()
        .any(|phrase| lowered.contains(phrase))
    {
        return true;
    }
    let mentions_weather = lowered.contains("weather");
    (lowered.contains("predict") && (lowered.contains("heat") || mentions_weather))
        || (lowered.contains("forecast") && mentions_weather)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> IntentClassifier {
        IntentClassifier::new("Delhi")
    }

    #[test]
    fn prediction_phrases_are_recognised() {
        for message in [
            "Heat wave prediction for Mumbai",
            "weather forecast please",
            "can you predict heat in chennai?",
            "Predict the weather tomorrow",
        ] {
            assert!(
                matches!(
                    classifier().classify(message),
                    Intent::HeatWavePrediction { .. }
                ),
                "{message}"
            );
        }
    }

    #[test]
    fn prediction_wins_over_general_keywords() {
        let intent = classifier().classify("emergency heat wave prediction for Pune hospital");
        assert_eq!(
            intent,
            Intent::HeatWavePrediction {
                city: "Pune".to_string()
            }
        );
    }

    #[test]
    fn first_known_city_in_list_order_wins() {
        let intent = classifier().classify("weather forecast mumbai or delhi");
        assert_eq!(
            intent,
            Intent::HeatWavePrediction {
                city: "Delhi".to_string()
            }
        );
    }

    #[test]
    fn falls_back_to_default_city() {
        let intent = IntentClassifier::new("jaipur").classify("weather prediction");
        assert_eq!(
            intent,
            Intent::HeatWavePrediction {
                city: "Jaipur".to_string()
            }
        );
    }

    #[test]
    fn other_messages_are_general_queries() {
        assert_eq!(
            classifier().classify("what to do during an earthquake"),
            Intent::GeneralQuery
        );
        assert_eq!(classifier().classify("heat stroke first aid"), Intent::GeneralQuery);
        assert_eq!(classifier().classify("forecast"), Intent::GeneralQuery);
    }
}

use serde::{Deserialize, Serialize};

/// A rule as authored in a rule document: one or more match phrases that all
/// share a single response template.
///
/// ```json
/// { "match": ["where am i", "tell me my location"], "response": "You are at {player_location}." }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRecord {
    #[serde(rename = "match")]
    pub match_phrases: Vec<String>,
    #[serde(rename = "response")]
    pub response_template: String,
}

impl RuleRecord {
    pub fn new<I, S>(match_phrases: I, response_template: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            match_phrases: match_phrases.into_iter().map(Into::into).collect(),
            response_template: response_template.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uses_document_field_names() {
        let rec: RuleRecord = serde_json::from_str(r#"{"match": ["hi there"], "response": "Hello!"}"#).unwrap();
        assert_eq!(rec, RuleRecord::new(["hi there"], "Hello!"));

        let json = serde_json::to_string(&rec).unwrap();
        assert!(json.contains("\"match\""));
        assert!(json.contains("\"response\""));
    }

    #[test]
    fn missing_response_is_rejected() {
        assert!(serde_json::from_str::<RuleRecord>(r#"{"match": ["hi"]}"#).is_err());
    }
}

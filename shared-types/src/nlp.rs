use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NerRequest {
    #[serde(default)]
    pub text: String,
}

/// A named entity span, in the aggregated shape token-classification
/// pipelines return
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Entity {
    pub entity_group: String,
    pub word: String,
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub start: Option<usize>,
    #[serde(default)]
    pub end: Option<usize>,
}

impl Entity {
    /// True for spans labelled as dates, with or without a BIO prefix
    pub fn is_date(&self) -> bool {
        let label = self.entity_group.trim();
        let label = label
            .strip_prefix("B-")
            .or_else(|| label.strip_prefix("I-"))
            .unwrap_or(label);
        label.eq_ignore_ascii_case("DATE")
    }
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NerResponse {
    pub entities: Vec<Entity>,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExtractDatesRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExtractDatesResponse {
    pub dates: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(label: &str) -> Entity {
        Entity {
            entity_group: label.to_string(),
            word: "tomorrow".to_string(),
            score: 0.9,
            start: None,
            end: None,
        }
    }

    #[test]
    fn test_date_labels() {
        assert!(entity("DATE").is_date());
        assert!(entity("date").is_date());
        assert!(entity("B-DATE").is_date());
        assert!(entity("I-DATE").is_date());
        assert!(!entity("PER").is_date());
        assert!(!entity("MISC").is_date());
        assert!(!entity("B-DATETIME").is_date());
    }

    #[test]
    fn test_entity_from_pipeline_output() {
        let body = r#"[{"entity_group":"PER","score":0.998,"word":"Maria","start":0,"end":5}]"#;
        let entities: Vec<Entity> = serde_json::from_str(body).unwrap();

        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].word, "Maria");
        assert_eq!(entities[0].end, Some(5));
    }
}

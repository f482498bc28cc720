mod parser;
mod patterns;
mod recognizer;
mod weekday;

pub use parser::{DateOrder, DateParser, Locale, LocaleDateParser};
pub use recognizer::{EntityRecognizer, NoopRecognizer, RecognizerError};

use chrono::{Local, NaiveDate};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Finds calendar dates in free text.
///
/// Candidates come from the entity recognizer (spans labelled as dates) and
/// from a fixed set of regex patterns. Each candidate goes through the date
/// parser; the ones that parse are kept as `YYYY-MM-DD`. When nothing parses,
/// the first weekday name found in the text resolves to its next occurrence.
pub struct DateExtractor {
    recognizer: Arc<dyn EntityRecognizer>,
    parser: Box<dyn DateParser>,
}

impl DateExtractor {
    pub fn new(recognizer: Arc<dyn EntityRecognizer>, parser: Box<dyn DateParser>) -> Self {
        Self { recognizer, parser }
    }

    /// English and Greek parser, month-first for ambiguous numeric dates
    pub fn with_default_parser(recognizer: Arc<dyn EntityRecognizer>) -> Self {
        Self::new(recognizer, Box::new(LocaleDateParser::default()))
    }

    /// Dates in `text`, resolved against the local calendar date
    pub async fn extract_dates(&self, text: &str) -> BTreeSet<String> {
        self.extract_dates_on(text, Local::now().date_naive()).await
    }

    pub async fn extract_dates_on(&self, text: &str, today: NaiveDate) -> BTreeSet<String> {
        let mut dates = BTreeSet::new();
        if text.trim().is_empty() {
            return dates;
        }

        let mut candidates = self.entity_candidates(text).await;
        candidates.extend(patterns::regex_candidates(text));

        for candidate in &candidates {
            match self.parser.parse(candidate, today) {
                Some(date) => {
                    dates.insert(format_date(date));
                }
                None => debug!(candidate = %candidate, "Discarding unparseable date candidate"),
            }
        }

        if dates.is_empty() {
            if let Some(target) = weekday::find_weekday(text) {
                let date = weekday::next_occurrence(today, target);
                debug!(weekday = %target, date = %date, "Resolved date from weekday name");
                dates.insert(format_date(date));
            }
        }

        dates
    }

    async fn entity_candidates(&self, text: &str) -> Vec<String> {
        match self.recognizer.recognize(text).await {
            Ok(entities) => entities
                .into_iter()
                .filter(|entity| entity.is_date())
                .map(|entity| entity.word)
                .collect(),
            Err(e) => {
                warn!("Entity recognizer failed, continuing with pattern matching: {}", e);
                Vec::new()
            }
        }
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

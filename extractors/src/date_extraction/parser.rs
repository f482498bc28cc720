use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use std::panic::{catch_unwind, AssertUnwindSafe};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Turns a date candidate into a calendar date. `today` anchors relative
/// expressions and supplies the year when the candidate omits it.
pub trait DateParser: Send + Sync {
    fn parse(&self, candidate: &str, today: NaiveDate) -> Option<NaiveDate>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    En,
    El,
}

/// Reading order of the first two fields of a numeric date like `3/4/25`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOrder {
    MonthFirst,
    DayFirst,
}

impl Locale {
    fn date_order(self) -> DateOrder {
        match self {
            Locale::En => DateOrder::MonthFirst,
            Locale::El => DateOrder::DayFirst,
        }
    }
}

static NUMERIC_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,4})[/.\-](\d{1,2})[/.\-](\d{1,4})$").expect("numeric date pattern must compile")
});

const ENGLISH_MONTHS: [&str; 12] = [
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december",
];

/// Accent-free stems of the Greek month names, matching nominative and genitive
const GREEK_MONTH_STEMS: [&str; 12] = [
    "ιανουαρ", "φεβρουαρ", "μαρτ", "απριλ", "μαι", "ιουν", "ιουλ", "αυγουστ", "σεπτεμβρ",
    "οκτωβρ", "νοεμβρ", "δεκεμβρ",
];

const GREEK_MONTH_ABBREVIATIONS: [&str; 12] = [
    "ιαν", "φεβ", "μαρ", "απρ", "μαι", "ιουν", "ιουλ", "αυγ", "σεπ", "οκτ", "νοε", "δεκ",
];

const ENGLISH_WEEKDAYS: [&str; 7] = [
    "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
];

const FILLER_WORDS: [&str; 6] = ["of", "the", "on", "του", "τησ", "την"];

/// Locale-aware parser for English and Greek date expressions.
///
/// Tries, in order: relative words, numeric dates, month-name dates. Free-form
/// phrases that none of those understand go to `fuzzydate`.
#[derive(Debug, Clone)]
pub struct LocaleDateParser {
    locales: Vec<Locale>,
}

impl Default for LocaleDateParser {
    fn default() -> Self {
        Self::new(vec![Locale::En, Locale::El])
    }
}

impl LocaleDateParser {
    pub fn new(locales: Vec<Locale>) -> Self {
        Self { locales }
    }

    /// Order tried first for ambiguous numeric dates: the first locale's
    fn primary_order(&self) -> DateOrder {
        self.locales
            .first()
            .map(|locale| locale.date_order())
            .unwrap_or(DateOrder::MonthFirst)
    }

    fn accepts(&self, locale: Locale) -> bool {
        self.locales.contains(&locale)
    }

    fn parse_relative(&self, input: &str, today: NaiveDate) -> Option<NaiveDate> {
        if self.accepts(Locale::En) {
            match input {
                "today" => return Some(today),
                "tomorrow" => return Some(today + Duration::days(1)),
                "yesterday" => return Some(today - Duration::days(1)),
                "day after tomorrow" | "the day after tomorrow" => {
                    return Some(today + Duration::days(2))
                }
                _ => {}
            }
        }

        if self.accepts(Locale::El) {
            match input {
                "σημερα" => return Some(today),
                "αυριο" => return Some(today + Duration::days(1)),
                "μεθαυριο" => return Some(today + Duration::days(2)),
                "χθεσ" | "εχθεσ" => return Some(today - Duration::days(1)),
                _ => {}
            }
        }

        None
    }

    fn parse_numeric(&self, input: &str) -> Option<NaiveDate> {
        let captures = NUMERIC_DATE.captures(input)?;
        let first = captures.get(1)?.as_str();
        let second: u32 = captures.get(2)?.as_str().parse().ok()?;
        let last = captures.get(3)?.as_str();

        if first.len() == 4 {
            let year: i32 = first.parse().ok()?;
            let day: u32 = last.parse().ok()?;
            return NaiveDate::from_ymd_opt(year, second, day);
        }
        if first.len() > 2 {
            return None;
        }

        let first: u32 = first.parse().ok()?;
        let year = expand_year(last)?;

        let (month_first, day_first) = (
            NaiveDate::from_ymd_opt(year, first, second),
            NaiveDate::from_ymd_opt(year, second, first),
        );

        match self.primary_order() {
            DateOrder::MonthFirst => month_first.or(day_first),
            DateOrder::DayFirst => day_first.or(month_first),
        }
    }

    fn parse_month_name(&self, input: &str, today: NaiveDate) -> Option<NaiveDate> {
        let mut month = None;
        let mut day = None;
        let mut year = None;

        for token in input.split(|c: char| c.is_whitespace() || c == ',') {
            let token = token.trim_end_matches('.');
            if token.is_empty() || FILLER_WORDS.contains(&token) || ENGLISH_WEEKDAYS.contains(&token) {
                continue;
            }

            if let Some(number) = strip_ordinal(token) {
                match number.len() {
                    1 | 2 if day.is_none() => day = number.parse::<u32>().ok(),
                    4 if year.is_none() => year = number.parse::<i32>().ok(),
                    _ => return None,
                }
                continue;
            }

            match self.month_from_word(token) {
                Some(m) if month.is_none() => month = Some(m),
                _ => return None,
            }
        }

        NaiveDate::from_ymd_opt(year.unwrap_or(today.year()), month?, day?)
    }

    fn month_from_word(&self, word: &str) -> Option<u32> {
        if self.accepts(Locale::En) && word.len() >= 3 && word.is_ascii() {
            if let Some(index) = ENGLISH_MONTHS.iter().position(|m| m.starts_with(word)) {
                return Some(index as u32 + 1);
            }
        }

        if self.accepts(Locale::El) {
            if let Some(index) = GREEK_MONTH_STEMS.iter().position(|stem| word.starts_with(stem)) {
                return Some(index as u32 + 1);
            }
            if let Some(index) = GREEK_MONTH_ABBREVIATIONS.iter().position(|abbr| word == *abbr) {
                return Some(index as u32 + 1);
            }
        }

        None
    }
}

impl DateParser for LocaleDateParser {
    fn parse(&self, candidate: &str, today: NaiveDate) -> Option<NaiveDate> {
        let input = normalize(candidate);
        if input.is_empty() {
            return None;
        }

        if let Some(date) = self.parse_relative(&input, today) {
            return Some(date);
        }

        if let Some(date) = self.parse_numeric(&input) {
            return Some(date);
        }

        if let Some(date) = self.parse_month_name(&input, today) {
            return Some(date);
        }

        // fuzzydate only understands English phrases
        if !self.accepts(Locale::En) || !input.chars().any(|c| c.is_ascii_alphabetic()) {
            return None;
        }

        parse_fuzzy(&input, today)
    }
}

/// Counts above this overflow chrono inside fuzzydate ("99999999 weeks ago")
const MAX_FUZZY_NUMBER_DIGITS: usize = 4;

/// Free-form English phrase resolved against `today`. fuzzydate panics on
/// date arithmetic overflow, so oversized counts are rejected up front and
/// any remaining panic is contained.
fn parse_fuzzy(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let longest_number = input
        .split(|c: char| !c.is_ascii_digit())
        .map(str::len)
        .max()
        .unwrap_or(0);
    if longest_number > MAX_FUZZY_NUMBER_DIGITS {
        debug!(input = %input, "Rejected date candidate with an oversized number");
        return None;
    }

    let anchor = today.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN));
    match catch_unwind(AssertUnwindSafe(|| fuzzydate::parse_relative_to(input, anchor))) {
        Ok(Ok(datetime)) => {
            let date = datetime.date();
            debug!(input = %input, date = %date, "Parsed with fuzzydate");
            Some(date)
        }
        Ok(Err(_)) => {
            debug!(input = %input, "Failed to parse date candidate");
            None
        }
        Err(_) => {
            debug!(input = %input, "fuzzydate panicked on date candidate");
            None
        }
    }
}

/// Lowercases, drops Greek accents and final sigma, trims trailing punctuation
fn normalize(candidate: &str) -> String {
    candidate
        .trim()
        .trim_end_matches(['.', ',', ';', '!', '?'])
        .to_lowercase()
        .chars()
        .map(fold_greek)
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn fold_greek(c: char) -> char {
    match c {
        'ά' => 'α',
        'έ' => 'ε',
        'ή' => 'η',
        'ί' | 'ϊ' | 'ΐ' => 'ι',
        'ό' => 'ο',
        'ύ' | 'ϋ' | 'ΰ' => 'υ',
        'ώ' => 'ω',
        'ς' => 'σ',
        other => other,
    }
}

/// `5th` -> `5`; plain digit strings pass through
fn strip_ordinal(token: &str) -> Option<&str> {
    let digits = ["st", "nd", "rd", "th", "η"]
        .iter()
        .find_map(|suffix| token.strip_suffix(suffix))
        .unwrap_or(token);

    (!digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())).then_some(digits)
}

/// Two-digit years pivot like chrono's `%y`: 00-68 is 20xx, 69-99 is 19xx
fn expand_year(year: &str) -> Option<i32> {
    let value: i32 = year.parse().ok()?;
    match year.len() {
        2 if value <= 68 => Some(2000 + value),
        2 => Some(1900 + value),
        4 => Some(value),
        _ => None,
    }
}

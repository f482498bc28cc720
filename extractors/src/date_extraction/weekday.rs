use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Bilingual weekday names, lowercase. Scanned in this order and the first
/// entry contained in the text wins, whatever its position in the text.
pub(crate) const WEEKDAY_NAMES: &[(&str, Weekday)] = &[
    ("saturday", Weekday::Sat),
    ("σάββατο", Weekday::Sat),
    ("σαββατο", Weekday::Sat),
    ("σαββάτου", Weekday::Sat),
    ("σαββατου", Weekday::Sat),
    ("sunday", Weekday::Sun),
    ("κυριακή", Weekday::Sun),
    ("κυριακη", Weekday::Sun),
    ("monday", Weekday::Mon),
    ("δευτέρα", Weekday::Mon),
    ("δευτερα", Weekday::Mon),
    ("tuesday", Weekday::Tue),
    ("τρίτη", Weekday::Tue),
    ("τριτη", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("τετάρτη", Weekday::Wed),
    ("τεταρτη", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("πέμπτη", Weekday::Thu),
    ("πεμπτη", Weekday::Thu),
    ("friday", Weekday::Fri),
    ("παρασκευή", Weekday::Fri),
    ("παρασκευη", Weekday::Fri),
];

/// First weekday from the table contained in `text`. Plain substring match
/// on the lowercased text.
pub(crate) fn find_weekday(text: &str) -> Option<Weekday> {
    let lowered = text.to_lowercase();
    WEEKDAY_NAMES
        .iter()
        .find(|(name, _)| lowered.contains(name))
        .map(|(_, weekday)| *weekday)
}

/// Next occurrence of `target` strictly after `today`; the same weekday
/// resolves to a week later.
pub(crate) fn next_occurrence(today: NaiveDate, target: Weekday) -> NaiveDate {
    let current = today.weekday().num_days_from_monday();
    let wanted = target.num_days_from_monday();

    let days_ahead = match (wanted + 7 - current) % 7 {
        0 => 7,
        days => days,
    };

    today + Duration::days(i64::from(days_ahead))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn friday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn test_same_weekday_is_next_week() {
        assert_eq!(
            next_occurrence(friday(), Weekday::Fri),
            NaiveDate::from_ymd_opt(2024, 3, 22).unwrap()
        );
    }

    #[test]
    fn test_next_occurrence_within_week() {
        assert_eq!(
            next_occurrence(friday(), Weekday::Sat),
            NaiveDate::from_ymd_opt(2024, 3, 16).unwrap()
        );
        assert_eq!(
            next_occurrence(friday(), Weekday::Thu),
            NaiveDate::from_ymd_opt(2024, 3, 21).unwrap()
        );
    }

    #[test]
    fn test_find_weekday_english_and_greek() {
        assert_eq!(find_weekday("Let's meet on FRIDAY"), Some(Weekday::Fri));
        assert_eq!(find_weekday("Ραντεβού την Παρασκευή"), Some(Weekday::Fri));
        assert_eq!(find_weekday("τα λέμε την Τεταρτη"), Some(Weekday::Wed));
        assert_eq!(find_weekday("μέχρι το βράδυ του Σαββάτου"), Some(Weekday::Sat));
        assert_eq!(find_weekday("no day mentioned"), None);
    }

    #[test]
    fn test_table_order_wins_over_text_order() {
        // monday precedes friday in the table
        assert_eq!(find_weekday("friday or monday"), Some(Weekday::Mon));
        assert_eq!(find_weekday("Sunday, then Saturday"), Some(Weekday::Sat));
    }

    #[test]
    fn test_substring_match_inside_words() {
        assert_eq!(find_weekday("fridays are for pizza"), Some(Weekday::Fri));
    }
}

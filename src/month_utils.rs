use std::cmp::Ordering;

use chrono::NaiveDate;

/// Parse a `YYYY-MM` month key into the first day of that month.
pub fn parse_month_key(key: &str) -> Option<NaiveDate> {
    let key = key.trim();
    if key.len() != 7 {
        return None;
    }
    NaiveDate::parse_from_str(&format!("{}-01", key), "%Y-%m-%d").ok()
}

/// Human readable label for a month key, e.g. "January 2024".
/// Keys that are not valid months are returned unchanged.
pub fn month_label(key: &str) -> String {
    parse_month_key(key)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|| key.to_string())
}

/// Chronological order for month keys. Valid months come first; anything
/// that does not parse sorts lexicographically after them.
pub fn compare_month_keys(a: &str, b: &str) -> Ordering {
    match (parse_month_key(a), parse_month_key(b)) {
        (Some(da), Some(db)) => da.cmp(&db).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Sort and deduplicate month keys.
pub fn sorted_months<I, S>(keys: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut months: Vec<String> = keys.into_iter().map(Into::into).collect();
    months.sort_by(|a, b| compare_month_keys(a, b));
    months.dedup();
    months
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month_key() {
        assert_eq!(
            parse_month_key("2024-02"),
            NaiveDate::from_ymd_opt(2024, 2, 1)
        );
        assert!(parse_month_key("2024-13").is_none());
        assert!(parse_month_key("2024-2").is_none());
        assert!(parse_month_key("2024-02-01").is_none());
        assert!(parse_month_key("latest").is_none());
    }

    #[test]
    fn test_month_label() {
        assert_eq!(month_label("2024-01"), "January 2024");
        assert_eq!(month_label("bogus"), "bogus");
    }

    #[test]
    fn test_sorted_months_chronological() {
        let months = sorted_months(["2024-10", "2023-12", "2024-02", "2024-02"]);
        assert_eq!(months, vec!["2023-12", "2024-02", "2024-10"]);
    }

    #[test]
    fn test_sorted_months_invalid_keys_last() {
        let months = sorted_months(["zzz", "2024-01", "abc", "2023-05"]);
        assert_eq!(months, vec!["2023-05", "2024-01", "abc", "zzz"]);
    }
}

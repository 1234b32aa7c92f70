/// Utilities for date formatting
///
/// Dates are shown in the Russian DD.MM.YYYY form across the application
use chrono::{DateTime, NaiveDate, Utc};

/// Example: 2024-03-15 -> "15.03.2024"
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// Example: 2024-03-15T14:02:26Z -> "15.03.2024 14:02"
pub fn format_datetime(datetime: DateTime<Utc>) -> String {
    datetime.format("%d.%m.%Y %H:%M").to_string()
}

/// Годы жизни для карточки мемориала; неизвестная дата выводится как "?"
pub fn format_life_span(birth: Option<NaiveDate>, death: Option<NaiveDate>) -> String {
    match (birth, death) {
        (None, None) => String::new(),
        (b, d) => format!(
            "{} - {}",
            b.map(format_date).unwrap_or_else(|| "?".into()),
            d.map(format_date).unwrap_or_else(|| "?".into())
        ),
    }
}

/// Parse an `<input type="date">` value
pub fn parse_input_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_life_span() {
        let birth = NaiveDate::from_ymd_opt(1940, 3, 12);
        let death = NaiveDate::from_ymd_opt(2015, 11, 5);
        assert_eq!(format_life_span(birth, death), "12.03.1940 - 05.11.2015");
        assert_eq!(format_life_span(None, death), "? - 05.11.2015");
        assert_eq!(format_life_span(None, None), "");
    }

    #[test]
    fn test_parse_input_date() {
        assert_eq!(parse_input_date("2015-11-05"), NaiveDate::from_ymd_opt(2015, 11, 5));
        assert_eq!(parse_input_date(""), None);
        assert_eq!(parse_input_date("05.11.2015"), None);
    }
}

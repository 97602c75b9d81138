use time::{macros::format_description, Date, Duration};

use crate::error::AppError;

/// Monday of the week containing `date`. Sunday counts as the last day of
/// the previous Monday-start week, so it maps back six days.
pub fn week_start(date: Date) -> Date {
    let days_past_monday = date.weekday().number_days_from_monday() as i64;
    date - Duration::days(days_past_monday)
}

/// Canonical `YYYY-MM-DD` key for the week containing `date`.
pub fn week_key(date: Date) -> String {
    let monday = week_start(date);
    format!(
        "{:04}-{:02}-{:02}",
        monday.year(),
        u8::from(monday.month()),
        monday.day()
    )
}

/// Strict `YYYY-MM-DD` parse. Callers normalize the result through
/// [`week_start`] so any date within a week keys that week.
pub fn parse_week_key(key: &str) -> Result<Date, AppError> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(key, &format)
        .map_err(|_| AppError::validation(format!("invalid week date '{key}', expected YYYY-MM-DD")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;
    use time::Weekday;

    #[test]
    fn week_start_is_idempotent() {
        let d = date!(2026 - 02 - 05); // Thursday
        assert_eq!(week_start(week_start(d)), week_start(d));
    }

    #[test]
    fn week_start_always_lands_on_monday() {
        let mut d = date!(2026 - 01 - 01);
        for _ in 0..60 {
            assert_eq!(week_start(d).weekday(), Weekday::Monday);
            d = d.next_day().expect("in range");
        }
    }

    #[test]
    fn monday_maps_to_itself() {
        let monday = date!(2026 - 02 - 02);
        assert_eq!(week_start(monday), monday);
    }

    #[test]
    fn sunday_maps_to_previous_monday() {
        let sunday = date!(2026 - 02 - 08);
        assert_eq!(week_start(sunday), date!(2026 - 02 - 02));
    }

    #[test]
    fn week_key_is_zero_padded() {
        assert_eq!(week_key(date!(2026 - 02 - 05)), "2026-02-02");
        assert_eq!(week_key(date!(2026 - 01 - 07)), "2026-01-05");
    }

    #[test]
    fn parse_round_trips_through_key() {
        let d = parse_week_key("2026-02-02").expect("valid key");
        assert_eq!(week_key(d), "2026-02-02");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_week_key("02/02/2026").is_err());
        assert!(parse_week_key("2026-13-40").is_err());
        assert!(parse_week_key("generate").is_err());
    }

    #[test]
    fn year_boundary_week() {
        // 2026-01-01 is a Thursday; its week starts Monday 2025-12-29.
        assert_eq!(week_key(date!(2026 - 01 - 01)), "2025-12-29");
    }
}

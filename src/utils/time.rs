use chrono::NaiveTime;

/// Elapsed working hours between HH:MM check-in/check-out wall-clock times,
/// rounded to two decimals. A checkout earlier than the checkin is read as
/// crossing midnight. Missing or malformed input yields 0.0 rather than an
/// error so report generation stays non-fatal.
pub fn working_hours(check_in: Option<&str>, check_out: Option<&str>) -> f64 {
    let (Some(check_in), Some(check_out)) = (check_in, check_out) else {
        return 0.0;
    };
    let (Ok(start), Ok(end)) = (
        NaiveTime::parse_from_str(check_in, "%H:%M"),
        NaiveTime::parse_from_str(check_out, "%H:%M"),
    ) else {
        return 0.0;
    };

    let mut minutes = end.signed_duration_since(start).num_minutes();
    if minutes < 0 {
        minutes += 24 * 60;
    }
    round2(minutes as f64 / 60.0)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_day() {
        assert_eq!(working_hours(Some("08:00"), Some("17:30")), 9.5);
        assert_eq!(working_hours(Some("09:00"), Some("17:00")), 8.0);
    }

    #[test]
    fn overnight_wraps_past_midnight() {
        assert_eq!(working_hours(Some("23:00"), Some("06:00")), 7.0);
        assert_eq!(working_hours(Some("23:30"), Some("06:00")), 6.5);
    }

    #[test]
    fn identical_times_are_zero() {
        assert_eq!(working_hours(Some("09:00"), Some("09:00")), 0.0);
    }

    #[test]
    fn missing_input_is_zero_not_an_error() {
        assert_eq!(working_hours(None, None), 0.0);
        assert_eq!(working_hours(Some("08:00"), None), 0.0);
        assert_eq!(working_hours(None, Some("17:00")), 0.0);
    }

    #[test]
    fn malformed_input_is_zero_not_an_error() {
        assert_eq!(working_hours(Some("8am"), Some("5pm")), 0.0);
        assert_eq!(working_hours(Some("25:99"), Some("17:00")), 0.0);
        assert_eq!(working_hours(Some("08:00:00"), Some("17:00")), 0.0);
        assert_eq!(working_hours(Some(""), Some("17:00")), 0.0);
    }

    #[test]
    fn rounds_to_two_decimals() {
        // 500 minutes = 8.3333... hours
        assert_eq!(working_hours(Some("09:00"), Some("17:20")), 8.33);
    }
}
